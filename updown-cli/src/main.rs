//! UpDown CLI: fetch, play and config commands.
//!
//! Commands:
//! - `fetch`: download and print the parsed daily series for a symbol
//! - `play`: line-mode game on stdin/stdout (`u` / `d` / `s`)
//! - `config`: show where configuration came from and its effective values

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use updown_core::config::AppConfig;
use updown_core::controller::{normalize_ticker, GameController, LoadOutcome};
use updown_core::data::{provider_from_config, MarketDataProvider};
use updown_core::domain::DayBar;
use updown_core::format::format_usd;
use updown_core::game::{FinalSummary, Guess, Phase, RevealOutcome, SystemClock};
use updown_core::presenter::{Presenter, Tone};
use updown_core::rng::RngSource;

#[derive(Parser)]
#[command(
    name = "updown-cli",
    version,
    about = "UpDown CLI: daily closes from Alpha Vantage and a line-mode guessing game"
)]
struct Cli {
    /// Path to a TOML config file. Defaults to <config dir>/updown/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Serve `{SYMBOL}.json` Alpha Vantage responses from this directory.
    #[arg(long, global = true)]
    fixtures: Option<PathBuf>,

    /// Log filter (e.g. `debug`, `updown_core=trace`). RUST_LOG wins when set.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the compact daily series for a symbol and print it, newest first.
    Fetch {
        /// Ticker symbol (e.g., IBM).
        symbol: String,

        /// Print JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Play one game on stdin/stdout.
    Play {
        /// Ticker symbol (e.g., IBM).
        symbol: String,

        /// Master seed for a reproducible start day.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the configuration source and effective values (API key masked).
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.fixtures {
        config.provider.fixture_dir = Some(dir);
    }
    let level = cli.log_level.as_deref().unwrap_or(&config.log.level);
    init_logging(level);

    match cli.command {
        Commands::Fetch { symbol, json } => run_fetch(&config, &symbol, json),
        Commands::Play { symbol, seed } => {
            if let Some(seed) = seed {
                config.game.seed = Some(seed);
            }
            run_play(&config, &symbol)
        }
        Commands::Config => run_config(&config, cli.config.as_deref()),
    }
}

/// Logs go to stderr so stdout stays clean for output.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_fetch(config: &AppConfig, symbol: &str, json: bool) -> Result<()> {
    let symbol = normalize_ticker(symbol);
    if symbol.is_empty() {
        bail!("Please enter a stock ticker symbol.");
    }

    let provider = provider_from_config(&config.provider)?;
    let series = provider.fetch_daily(&symbol)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&series)?);
        return Ok(());
    }

    println!("{symbol}: {} daily closes (newest first)", series.len());
    println!("{:<12} {:>14}", "Date", "Close");
    for bar in series.iter() {
        println!("{:<12} {:>14}", bar.label(), format_usd(bar.close));
    }
    Ok(())
}

fn run_play(config: &AppConfig, symbol: &str) -> Result<()> {
    let provider = provider_from_config(&config.provider)?;
    let controller = GameController::new(
        config.game.rules(),
        Box::new(SystemClock),
        RngSource::from_seed(config.game.seed),
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    match play_session(controller, provider.as_ref(), symbol, stdin.lock(), &mut stdout)? {
        Some(summary) => {
            debug!(score = summary.score, rounds = summary.rounds, "session over");
            Ok(())
        }
        None => std::process::exit(1),
    }
}

fn run_config(config: &AppConfig, explicit: Option<&Path>) -> Result<()> {
    let source = match explicit {
        Some(path) => path.display().to_string(),
        None => match AppConfig::default_path().filter(|p| p.is_file()) {
            Some(path) => path.display().to_string(),
            None => "built-in defaults".to_string(),
        },
    };
    println!("# source: {source}");

    let mut shown = config.clone();
    shown.provider.api_key = config.provider.masked_api_key();
    print!("{}", shown.to_toml()?);
    Ok(())
}

/// One line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Guess(Guess),
    Stop,
}

fn parse_command(line: &str) -> Option<Command> {
    match line.trim().to_ascii_lowercase().as_str() {
        "u" | "up" | "k" => Some(Command::Guess(Guess::Up)),
        "d" | "down" | "j" => Some(Command::Guess(Guess::Down)),
        "s" | "stop" | "q" | "quit" => Some(Command::Stop),
        _ => None,
    }
}

/// Load `symbol` and play until the game ends or input runs out.
///
/// Returns `None` when the load failed; end of input stops the game.
fn play_session<R: BufRead, W: Write>(
    mut controller: GameController,
    provider: &dyn MarketDataProvider,
    symbol: &str,
    input: R,
    out: &mut W,
) -> Result<Option<FinalSummary>> {
    let mut view = LinePresenter::default();

    let outcome = controller.load_with(symbol, provider, &mut view);
    view.flush(out)?;
    if !matches!(outcome, LoadOutcome::Started { .. }) {
        return Ok(None);
    }

    let mut summary = None;
    let mut lines = input.lines();
    while controller.state().phase() == Phase::Playing {
        write!(out, "[u]p / [d]own / [s]top > ")?;
        out.flush()?;

        let Some(line) = lines.next().transpose()? else {
            writeln!(out)?;
            break;
        };

        match parse_command(&line) {
            Some(Command::Guess(guess)) => match controller.guess(guess, &mut view)? {
                RevealOutcome::Revealed { finished, .. } => summary = finished,
                RevealOutcome::NoMoreDays(s) => summary = Some(s),
            },
            Some(Command::Stop) => summary = Some(controller.stop(&mut view)?),
            None => writeln!(out, "Type u, d or s.")?,
        }
        view.flush(out)?;
    }

    let summary = match summary {
        Some(summary) => summary,
        None => controller.stop(&mut view)?,
    };
    view.flush(out)?;
    Ok(Some(summary))
}

/// Presenter that turns presenter calls into lines of text.
#[derive(Debug, Default)]
struct LinePresenter {
    pending: Vec<String>,
    shown_score: Option<u32>,
    shown_result: Option<String>,
}

impl LinePresenter {
    fn flush<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        for line in self.pending.drain(..) {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    fn bar_line(bar: &DayBar) -> String {
        format!("  {}  ${}", bar.label(), format_usd(bar.close))
    }
}

impl Presenter for LinePresenter {
    fn reset(&mut self) {
        self.shown_score = None;
        self.shown_result = None;
    }

    fn set_game_visible(&mut self, _visible: bool) {}

    fn render(&mut self, ticker: &str, window: &[DayBar]) {
        self.pending.push(format!("{ticker} Close"));
        self.pending.extend(window.iter().map(Self::bar_line));
    }

    fn append_point(&mut self, bar: &DayBar) {
        self.pending.push(Self::bar_line(bar));
    }

    fn set_today(&mut self, ticker: &str, today: Option<&DayBar>) {
        if let Some(bar) = today {
            self.pending.push(format!(
                "{ticker} today {}: ${}",
                bar.label(),
                format_usd(bar.close)
            ));
        }
    }

    fn set_score(&mut self, score: u32) {
        if self.shown_score != Some(score) && (score > 0 || self.shown_score.is_some()) {
            self.pending.push(format!("Score: {score}"));
        }
        self.shown_score = Some(score);
    }

    fn set_status(&mut self, message: &str, tone: Tone) {
        match tone {
            Tone::Negative => self.pending.push(format!("! {message}")),
            _ => self.pending.push(message.to_string()),
        }
    }

    fn set_round_result(&mut self, message: &str, _tone: Tone) {
        // Stopping an ended game repeats the same message.
        if message.is_empty() || self.shown_result.as_deref() == Some(message) {
            return;
        }
        self.shown_result = Some(message.to_string());
        self.pending.push(message.to_string());
    }

    fn set_controls_enabled(&mut self, _enabled: bool) {}
}
