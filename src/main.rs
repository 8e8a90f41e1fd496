//! Immutable Deepin Tools
//!
//! Terminal front end for the deepin immutable system CLIs.

mod app;
mod commands;
mod config;
mod constants;
mod headless;
mod i18n;
mod panels;
mod paths;
mod ui;

use anyhow::Result;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;
use commands::CommandEvent;
use config::Settings;
use i18n::Language;

/// Immutable system status, deployments and snapshots for deepin
#[derive(Parser)]
#[command(name = "immutable-tools")]
#[command(version)]
#[command(about = "Immutable deepin tools - status, deployments and snapshots")]
struct Cli {
    /// Interface language (overrides the saved setting)
    #[arg(long, global = true, value_enum)]
    lang: Option<Language>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the immutable/writable status and exit
    Status,
    /// List snapshots and exit
    Snapshots,
    /// Run one command with elevation and cancellation, streaming its output
    Run {
        /// Report that a reboot is needed when the command succeeds
        #[arg(long)]
        reboot: bool,
        /// Command line to run
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        command: Vec<String>,
    },
    /// Show the settings file path and current settings
    Config,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Set up logging to file
    let log_dir = paths::data_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, paths::LOG_FILE);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    tracing::info!("Immutable tools starting");

    let cli = Cli::parse();

    let settings_path = paths::settings_path();
    let mut settings = Settings::load(&settings_path);
    if let Some(lang) = cli.lang {
        settings.language = lang;
    }

    match cli.command {
        Some(Commands::Status) => headless::status(&settings).await,
        Some(Commands::Snapshots) => headless::snapshots(&settings).await,
        Some(Commands::Run { reboot, command }) => {
            headless::run(&settings, &command.join(" "), reboot).await
        }
        Some(Commands::Config) => headless::config(&settings, &settings_path),
        None => {
            run_tui(settings, settings_path).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_tui(settings: Settings, settings_path: PathBuf) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<CommandEvent>();
    let mut app = App::new(settings, settings_path, paths::console_log_path(), cmd_tx);

    let result = run_app(&mut terminal, &mut app, &mut cmd_rx).await;

    // Nothing may outlive the UI
    if app.supervisor.cancel().await {
        tracing::info!("Cancelled running command on exit");
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    println!("Console log: {}", app.transcript_path.display());

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
        return Err(err);
    }

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    cmd_rx: &mut mpsc::UnboundedReceiver<CommandEvent>,
) -> Result<()> {
    // First frame before the initial queries so the window appears at once
    terminal.draw(|frame| ui::draw(frame, app))?;
    app.refresh_all().await;

    let mut event_stream = EventStream::new();

    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        let timeout = Duration::from_millis(constants::EVENT_POLL_TIMEOUT_MS);

        tokio::select! {
            biased;  // Prioritize in order: keys, command events, timeout

            Some(Ok(event)) = event_stream.next() => {
                if let Event::Key(key) = event {
                    if key.kind == KeyEventKind::Press {
                        app.handle_key(key.code).await?;
                    }
                }
            }
            Some(event) = cmd_rx.recv() => {
                app.handle_command_event(event).await;
            }
            // Timeout for spinner animation and redraw
            _ = tokio::time::sleep(timeout) => {}
        }

        app.tick();
        app.refresh_if_due().await;

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
