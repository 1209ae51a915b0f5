//! UI widgets

pub mod item_card;

pub use item_card::{format_coins, item_card_lines, name_color, rarity_color, render_help, render_item_details, tier_color};
