//! UpDown TUI: guess whether a stock's next close is up or down.
//!
//! Layout:
//! 1. Ticker input line
//! 2. HUD: ticker, "today", close, score
//! 3. Chart of revealed closes beside the guess history
//! 4. Round result
//! 5. Status bar, with a help overlay on `?`

mod app;
mod input;
mod theme;
mod ui;
mod worker;

use std::fs::{self, File};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use updown_core::config::AppConfig;
use updown_core::controller::GameController;
use updown_core::data::provider_from_config;
use updown_core::game::SystemClock;
use updown_core::rng::RngSource;

use crate::app::AppState;

#[derive(Parser)]
#[command(
    name = "updown",
    version,
    about = "UpDown: guess tomorrow's close from the last 100 trading days"
)]
struct Args {
    /// Path to a TOML config file. Defaults to <config dir>/updown/config.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Master seed for reproducible start days.
    #[arg(long)]
    seed: Option<u64>,

    /// Serve `{SYMBOL}.json` Alpha Vantage responses from this directory
    /// instead of the network.
    #[arg(long)]
    fixtures: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.game.seed = Some(seed);
    }
    if let Some(dir) = args.fixtures {
        config.provider.fixture_dir = Some(dir);
    }

    init_logging(&config.log.level);

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        error!(%info, "panic");
        default_hook(info);
    }));

    let provider =
        provider_from_config(&config.provider).context("failed to build market data client")?;

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let worker_handle = worker::spawn_worker(provider, cmd_rx, resp_tx)
        .context("failed to spawn worker thread")?;

    let controller = GameController::new(
        config.game.rules(),
        Box::new(SystemClock),
        RngSource::from_seed(config.game.seed),
    );
    let mut app = AppState::new(controller, cmd_tx.clone(), resp_rx);
    if config.provider.uses_demo_key() && config.provider.fixture_dir.is_none() {
        app.view.status = Some((
            "Using the demo API key: only IBM is served. Set ALPHAVANTAGE_API_KEY for other symbols."
                .to_string(),
            updown_core::presenter::Tone::Neutral,
        ));
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the main event loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Shutdown worker
    let fetch_in_flight = app.is_loading();
    drop(app);
    worker::shutdown_worker(&cmd_tx, worker_handle, fetch_in_flight);

    info!("exit");
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain worker responses (non-blocking)
        while let Ok(resp) = app.worker_rx.try_recv() {
            app.handle_worker_response(resp);
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}

/// Log to `<data dir>/updown/updown.log`; the terminal belongs to the UI.
/// `RUST_LOG` overrides the configured level. Logging is skipped when the
/// file cannot be opened.
fn init_logging(level: &str) {
    let Some(dir) = dirs::data_local_dir().map(|d| d.join("updown")) else {
        return;
    };
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = File::options()
        .create(true)
        .append(true)
        .open(dir.join("updown.log"))
    else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
}
