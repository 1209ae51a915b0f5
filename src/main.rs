//! Valheim Marketplace - Entry Point
//!
//! `browse` runs the terminal catalog browser; `rescale` rewrites the prices
//! in the data files.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use valheim_marketplace::config::MarketConfig;
use valheim_marketplace::data::DataManager;
use valheim_marketplace::pricing::{rescale_files, FileOutcome};
use valheim_marketplace::ui::App;

/// How long to wait for input before redrawing
const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Config file (RON)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Browse the catalog in the terminal
    Browse {
        /// Directory holding the item JSON files
        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,
    },
    /// Multiply every price-like field in the data files by a factor
    Rescale {
        /// Directory holding the item JSON files
        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,
        /// Multiplier applied to each price
        #[arg(long)]
        factor: Option<f64>,
        /// File names to rewrite, relative to the data directory
        #[arg(value_name = "FILE")]
        files: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = MarketConfig::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Browse { data_dir: None }) {
        Command::Browse { data_dir } => {
            if let Some(dir) = data_dir {
                config.data_dir = dir;
            }
            run_browser(&config)
        }
        Command::Rescale { data_dir, factor, files } => {
            if let Some(dir) = data_dir {
                config.data_dir = dir;
            }
            if let Some(factor) = factor {
                config.price_factor = factor;
            }
            if !files.is_empty() {
                config.files = files;
            }
            run_rescale(&config)
        }
    }
}

fn run_rescale(config: &MarketConfig) -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!(
        "Rescaling prices by {} in {}",
        config.price_factor,
        config.data_dir.display()
    );
    let report = rescale_files(&config.data_files(), config.price_factor);

    let skipped: Vec<&FileOutcome> = report
        .outcomes
        .iter()
        .filter(|o| !matches!(o, FileOutcome::Updated { .. }))
        .collect();
    if !skipped.is_empty() {
        log::warn!("{} of {} files were skipped:", skipped.len(), report.outcomes.len());
        for outcome in skipped {
            log::warn!("  {}", outcome.path().display());
        }
    }
    Ok(())
}

fn run_browser(config: &MarketConfig) -> Result<()> {
    // Log to a file so output does not interfere with the TUI
    if let Ok(log_file) = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("marketplace.log")
    {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .target(env_logger::Target::Pipe(Box::new(log_file)))
            .init();
    }

    log::info!("Starting Valheim Marketplace v{}", env!("CARGO_PKG_VERSION"));

    let data = DataManager::load(&config.data_dir);
    if data.is_empty() {
        log::warn!("No items loaded from {}", config.data_dir.display());
    }
    let mut app = App::new(data.catalog(), config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        log::error!("Browser exited with error: {}", e);
        eprintln!("Error: {}", e);
    }

    log::info!("Valheim Marketplace shut down cleanly");
    result
}

/// Draw, wait for a key, repeat until the app asks to quit
fn run_event_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events, not releases
                if key.kind == KeyEventKind::Press {
                    match app.handle_input(key) {
                        Ok(true) => break,
                        Ok(false) => {}
                        Err(e) => log::warn!("Input handling error: {}", e),
                    }
                }
            }
        }
    }

    Ok(())
}
