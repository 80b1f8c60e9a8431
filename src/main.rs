use std::io;
use std::time::Duration;

use crossterm::event::KeyEventKind;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

mod analysis;
mod app;
mod config;
mod data;
mod error;
mod models;
mod tui;

use analysis::sentiment;
use app::App;
use config::Config;
use data::{ChartBundle, Dataset};
use error::Result;
use models::ReviewRecord;
use tui::{draw, handle_key_event};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (only show warnings and errors by default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    // Load configuration
    let config = Config::load()?;

    // Check for --export flag (headless traceability export)
    if args.len() >= 2 && args[1] == "--export" {
        let path = args
            .get(2)
            .cloned()
            .unwrap_or_else(|| config.export_path.clone());
        let dataset = Dataset::load(&config.data_path)?;
        let records: Vec<&ReviewRecord> = dataset.records.iter().collect();
        let rows = data::traceability_rows(&records, &sentiment::DETAIL);
        data::write_csv_file(&path, &rows)?;
        println!("Exported {} rows to {}", rows.len(), path);
        return Ok(());
    }

    // Check for --charts flag (headless chart-table dump for a renderer)
    if args.len() >= 2 && args[1] == "--charts" {
        let path = args.get(2).cloned().unwrap_or_else(|| "charts.json".to_string());
        let dataset = Dataset::load(&config.data_path)?;
        let bundle = ChartBundle::compute(&dataset, config.gantt_limit);
        std::fs::write(&path, serde_json::to_string_pretty(&bundle)?)?;
        println!("Wrote chart tables to {path}");
        return Ok(());
    }

    // Initialize app
    let mut app = App::new(&config).await?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        // Poll for completed background reloads
        app.poll_reload_result();

        // Poll for events with timeout to allow async operations
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) =
                        handle_key_event(key, app.date_input_active, app.show_help)
                    {
                        let should_quit = app.handle_action(action).await?;
                        if should_quit {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}
