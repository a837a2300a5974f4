use anyhow::{bail, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use wxdash::app::run_app;
use wxdash::cli::Args;
use wxdash::directory;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Resolve the starting city before touching the terminal so a bad
    // argument fails with a plain message instead of a mangled screen.
    let initial = match &args.city {
        Some(city) => match directory::lookup(city) {
            Some(record) => Some(record.clone()),
            None => bail!(
                "no weather data for \"{city}\"; \
                 try \"San Francisco\", \"New York\", or \"London\""
            ),
        },
        None => None,
    };

    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // run the dashboard
    let res = run_app(&mut terminal, initial).await;

    // restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}
