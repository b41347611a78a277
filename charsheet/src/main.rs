//! Character builder TUI.
//!
//! A keyboard-driven terminal interface for building a party of characters
//! under the attribute cap and skill point budget.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a line-oriented interface on stdin, suitable for
//! scripting and automated testing:
//!
//! ```bash
//! echo "attr int +" | cargo run -p charsheet -- --headless --seed 7
//! ```

mod app;
mod events;
mod headless;
mod ui;

use std::fs::OpenOptions;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use charsheet_core::headless::HeadlessConfig;
use charsheet_core::RulesConfig;
use clap::Parser;
use crossterm::{
    event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use app::App;
use events::{handle_event, EventResult};
use ui::render::render;

/// Build characters under a shared attribute cap and skill point budget
#[derive(Parser, Debug)]
#[command(name = "charsheet")]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML file overriding the default rules
    #[arg(long = "rules", value_name = "FILE")]
    rules: Option<PathBuf>,

    /// Read commands from stdin instead of opening the TUI
    #[arg(long = "headless")]
    headless: bool,

    /// Number of characters to start with
    #[arg(short = 'n', long = "characters", default_value_t = 1)]
    characters: usize,

    /// Log file (the terminal belongs to the UI)
    #[arg(long = "log-file", value_name = "FILE", default_value = "charsheet.log")]
    log_file: PathBuf,

    /// Seed for skill-check dice
    #[arg(long = "seed")]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    let rules = match &args.rules {
        Some(path) => RulesConfig::load(path)?,
        None => RulesConfig::default(),
    };
    rules.validate()?;

    let mut config = HeadlessConfig::default()
        .with_rules(rules)
        .with_characters(args.characters);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    if args.headless {
        return headless::run_headless(config);
    }

    tracing::info!("Starting charsheet v{}", env!("CARGO_PKG_VERSION"));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, App::new(config));

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!("exited with error: {e}");
    }
    result.map_err(Into::into)
}

/// Send `tracing` output to a file so it does not fight the TUI for the screen.
fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("charsheet=info,charsheet_core=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, mut app: App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render(f, &app))?;

        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            match handle_event(&mut app, ev) {
                EventResult::Quit => return Ok(()),
                EventResult::NeedsRedraw | EventResult::Continue => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
