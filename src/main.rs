use std::fs::{self, OpenOptions};
use std::io::stdin;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::tty::IsTty;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use typemaster::{
    app::{App, Launch},
    app_dirs::AppDirs,
    clock::SystemClock,
    config::{ConfigStore, FileConfigStore},
    content::SnippetLibrary,
    history::JsonHistoryStore,
    runtime::{CrosstermInput, SessionRequest},
    session::Mode,
    ui::TerminalRenderer,
};

const LOG_ENV: &str = "TYPEMASTER_LOG";

/// terminal typing trainer for code, prose, logs and shell commands
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal typing trainer with live WPM and accuracy, five kinds of practice text and a local history of every finished test."
)]
pub struct Cli {
    /// skip the menus and run a single test of this content type
    #[clap(short = 'm', long, value_enum)]
    mode: Option<Mode>,

    /// time limit in seconds for a single test, 0 to type the full text
    #[clap(short = 's', long, requires = "mode")]
    secs: Option<u64>,

    /// show the stats dashboard and exit
    #[clap(long, conflicts_with_all = ["mode", "secs"])]
    stats: bool,

    /// history file to read and append to
    #[clap(long)]
    history: Option<PathBuf>,

    /// config file to use instead of the platform default
    #[clap(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn launch(&self, last_time_limit_secs: u64) -> Launch {
        if self.stats {
            Launch::Stats
        } else if let Some(mode) = self.mode {
            Launch::Single(SessionRequest {
                mode,
                time_limit_secs: self.secs.unwrap_or(last_time_limit_secs),
            })
        } else {
            Launch::Interactive
        }
    }
}

/// Log to a file since the terminal belongs to the UI. Logging is silently
/// off when the file cannot be opened.
fn init_logging() {
    let log_path = AppDirs::log_path();
    if let Some(parent) = log_path.parent() {
        let _ = fs::create_dir_all(parent);
    }

    let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) else {
        return;
    };

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging();
    info!(version = env!("CARGO_PKG_VERSION"), "typemaster starting");

    let config_store = match &cli.config {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new(),
    };
    let config = config_store.load();
    let history_path = cli.history.clone().unwrap_or_else(|| config.history_path());
    let launch = cli.launch(config.last_time_limit_secs);

    let mut content = SnippetLibrary::load().context("failed to load practice text")?;
    let mut history = JsonHistoryStore::open(&history_path);
    let mut input = CrosstermInput::new();
    let clock = SystemClock;

    let record_errors = {
        let mut renderer = TerminalRenderer::stdout().context("failed to set up the terminal")?;
        App::new(
            &mut input,
            &clock,
            &mut renderer,
            &mut history,
            &mut content,
            config,
            &config_store,
        )
        .run(launch)?
    };

    // the terminal is restored by now
    for err in &record_errors {
        eprintln!("warning: {err}");
    }

    info!("typemaster exiting");
    Ok(())
}
