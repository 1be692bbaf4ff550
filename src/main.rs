// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use config::{Config, Environment, File};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tracing_subscriber::EnvFilter;

mod api;
mod app;
mod data;
mod events;
mod poll;
mod ui;

use api::ApiClient;
use app::{App, View};
use data::NewSite;
use poll::Poller;

#[derive(Parser, Debug)]
#[command(name = "sitewatch")]
#[command(about = "Terminal dashboard for an uptime-monitoring backend")]
struct Args {
    /// Backend endpoint (e.g. http://localhost:5000)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Refresh interval in seconds
    #[arg(short, long)]
    refresh: Option<u64>,

    /// Request timeout in seconds
    #[arg(long, default_value = "10")]
    timeout: u64,

    /// Path to a config file with endpoint/refresh settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Append logs to this file (the TUI owns the terminal)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Register a new site with the backend and exit
    #[arg(long, value_name = "URL", conflicts_with = "delete")]
    add: Option<String>,

    /// Display name for the site being added
    #[arg(long, requires = "add")]
    name: Option<String>,

    /// Check interval in seconds for the site being added
    #[arg(long, default_value = "60", requires = "add")]
    interval: u64,

    /// Delete a site by id and exit
    #[arg(long, value_name = "ID")]
    delete: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(ref path) = args.log_file {
        init_logging(path)?;
    }

    let (endpoint, refresh) = load_settings(&args)?;

    let client = ApiClient::builder()
        .endpoint(endpoint)
        .timeout(Duration::from_secs(args.timeout))
        .build();

    // All network work runs on a tokio runtime; the TUI loop itself stays
    // on the main thread
    let rt = tokio::runtime::Runtime::new()?;

    // Handle one-shot modes (non-interactive)
    if let Some(ref url) = args.add {
        return rt.block_on(add_site(&client, url, args.name.clone(), args.interval));
    }
    if let Some(id) = args.delete {
        return rt.block_on(async {
            client.delete_site(id).await?;
            println!("Deleted site {}", id);
            Ok(())
        });
    }

    // Default: interactive dashboard
    let _guard = rt.enter();
    run_tui(client, refresh)
}

/// Resolve settings with CLI flags taking precedence over the config file
/// and SITEWATCH_* environment variables.
fn load_settings(args: &Args) -> Result<(String, Duration)> {
    let mut builder = Config::builder()
        .set_default("endpoint", "http://localhost:5000")?
        .set_default("refresh", 30_i64)?;

    if let Some(ref path) = args.config {
        builder = builder.add_source(File::from(path.clone()));
    }

    let config = builder
        .add_source(Environment::with_prefix("SITEWATCH"))
        .build()?;

    let endpoint = match args.endpoint {
        Some(ref e) => e.clone(),
        None => config.get_string("endpoint")?,
    };
    let refresh = match args.refresh {
        Some(r) => r,
        None => config.get_int("refresh")? as u64,
    };

    Ok((endpoint, Duration::from_secs(refresh.max(1))))
}

/// Log to a file so tracing output never corrupts the alternate screen.
fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(file)
        .with_ansi(false)
        .init();

    Ok(())
}

/// Register a new site and print the backend's record of it.
async fn add_site(
    client: &ApiClient,
    url: &str,
    name: Option<String>,
    interval: u64,
) -> Result<()> {
    let site = client
        .create_site(&NewSite {
            url: url.to_string(),
            name,
            check_interval: interval,
        })
        .await?;

    println!("Added site {} ({}) checking every {}s", site.id, site.name, site.check_interval);
    Ok(())
}

/// Run the TUI against the given backend client
fn run_tui(client: ApiClient, refresh: Duration) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    // Create app and start the periodic poll (the first fetch fires
    // immediately)
    let (poller, updates) = Poller::new(client);
    let mut app = App::new(poller, updates);
    app.start_polling(refresh);

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(0, area.height / 2 - 2, area.width, 5);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            // Render header with fleet health
            ui::common::render_header(frame, app, chunks[0]);

            // Render tabs
            ui::common::render_tabs(frame, app, chunks[1]);

            // Render current view
            match app.current_view {
                View::Sites => ui::sites::render(frame, app, chunks[2]),
                View::Chart => ui::chart::render(frame, app, chunks[2]),
            }

            // Render status bar
            ui::common::render_status_bar(frame, app, chunks[3]);

            // Render detail overlay if active
            if app.session.is_open() {
                ui::detail::render_overlay(frame, app, area);
            }

            // Render help overlay if active
            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    // Content starts after header (1) + tabs (1) + table header (1)
                    events::handle_mouse_event(app, mouse, 3);
                }
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Apply whatever the poller delivered since the last frame
        app.drain_updates();
    }

    Ok(())
}
