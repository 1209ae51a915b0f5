//! Price maintenance tools

pub mod rescale;

pub use rescale::{
    RescaleError, RescaleReport, FileOutcome,
    rescale_prices, rescale_file, rescale_files,
    backup_path, parse_price_text, round2, is_price_key, BACKUP_SUFFIX,
};
