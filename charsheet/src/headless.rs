//! Headless mode for the character builder.
//!
//! A line-oriented interface on stdin, designed for scripting and automated
//! testing. Each line is one command; see `help` for the list.

use anyhow::Result;
use charsheet_core::headless::{sheet_lines, HeadlessConfig, HeadlessSession};
use std::io::{self, BufRead, Write};

/// Run the builder in headless mode until `quit` or end of input.
pub fn run_headless(config: HeadlessConfig) -> Result<()> {
    let mut session = HeadlessSession::new(config)?;

    println!("=== Character Builder Headless Mode ===");
    if let Some(index) = session.selected() {
        for line in sheet_lines(session.engine(), session.store().get(index), index) {
            println!("{line}");
        }
    }
    println!();
    println!("Enter commands (one per line, 'help' for the list):");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match session.send(line) {
            Ok(reply) => {
                for text in &reply.lines {
                    println!("{text}");
                }
                if reply.quit {
                    println!("Goodbye!");
                    break;
                }
            }
            Err(e) => {
                tracing::debug!(line, "rejected command: {e}");
                println!("[ERROR] {e}");
            }
        }
        stdout.flush()?;
    }

    Ok(())
}
