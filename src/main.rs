mod ui;

use std::{
    fs::OpenOptions,
    io::{self, stdin},
    sync::{mpsc::Sender, Arc, Mutex},
    time::Duration,
};

use anyhow::Context;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tokio::runtime::Handle;
use tracing_subscriber::EnvFilter;

use monkeywords::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    input::{translate_key, KeyAction},
    language::Language,
    provider::{
        submit_and_log, BundledWordProvider, CsvResultSink, HttpResultSink, HttpWordProvider,
        ResultSink, WordProvider,
    },
    runtime::{AppEvent, AppEventSource, CrosstermEventSource, FixedTicker, Runner, Ticker},
    session::{Effect, LoadOutcome, LoadTicket, Session, SessionConfig},
};

const TICK_RATE_MS: u64 = 100;

/// vocabulary typing practice in the terminal
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    version,
    about,
    long_about = "Type the pronunciation of sampled vocabulary words and get speed and accuracy feedback. Japanese is typed in romaji and converted to kana as you go."
)]
pub struct Cli {
    /// language to practice
    #[clap(short = 'l', long, value_enum)]
    language: Option<Language>,

    /// vocabulary level
    #[clap(long, value_parser = clap::value_parser!(u32).range(1..))]
    level: Option<u32>,

    /// number of words per page
    #[clap(short = 'n', long)]
    page_size: Option<usize>,

    /// base URL of the word API
    #[clap(long)]
    api_base_url: Option<String>,

    /// use the bundled word lists and log results to a local CSV file
    #[clap(long)]
    offline: bool,

    /// seed for page sampling, for reproducible pages
    #[clap(long)]
    seed: Option<u64>,

    /// write the effective settings back to the config file
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Layer CLI flags over the stored config
    fn apply(&self, mut config: Config) -> Config {
        if let Some(language) = self.language {
            config.language = language;
        }
        if let Some(level) = self.level {
            config.level = level;
        }
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        if let Some(url) = &self.api_base_url {
            config.api_base_url = url.clone();
        }
        config.offline |= self.offline;
        config
    }
}

/// Word provider and result sink picked from the config
#[derive(Clone)]
pub struct Services {
    pub provider: Arc<dyn WordProvider>,
    pub sink: Arc<dyn ResultSink>,
}

impl Services {
    fn from_config(config: &Config) -> anyhow::Result<Self> {
        if config.offline {
            let log_path = AppDirs::results_log_path()
                .context("no state directory for the offline results log")?;
            Ok(Self {
                provider: Arc::new(BundledWordProvider),
                sink: Arc::new(CsvResultSink::new(log_path)),
            })
        } else {
            Ok(Self {
                provider: Arc::new(HttpWordProvider::new(&config.api_base_url)),
                sink: Arc::new(HttpResultSink::new(&config.api_base_url)),
            })
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub session: Session,
    /// Last load failure, cleared when a load lands
    pub notice: Option<String>,
}

impl App {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            notice: None,
        }
    }

    fn on_pool_loaded(&mut self, outcome: LoadOutcome, error: Option<String>) {
        match outcome {
            LoadOutcome::Applied => self.notice = None,
            LoadOutcome::Failed => self.notice = error,
            LoadOutcome::Stale => {}
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("monkeywords=info"));

    // stdout belongs to the terminal UI, so logs go to a file or nowhere
    let Some(path) = AppDirs::log_file_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_tracing();

    let store = FileConfigStore::new();
    let config = cli
        .apply(store.load().with_env(|key| std::env::var(key).ok()))
        .sanitized();
    if cli.save_config {
        store
            .save(&config)
            .with_context(|| format!("saving config to {}", store.path().display()))?;
    }
    tracing::info!(
        lang = config.language.code(),
        level = config.level,
        offline = config.offline,
        "starting"
    );

    let services = Services::from_config(&config)?;
    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;

    let mut session = Session::new(
        config.language,
        config.level,
        SessionConfig {
            page_size: config.page_size,
        },
    );
    if let Some(seed) = cli.seed {
        session = session.with_rng(StdRng::seed_from_u64(seed));
    }
    let mut app = App::new(session);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let event_source = CrosstermEventSource::new();
    let tx = event_source.sender();
    let runner = Runner::new(event_source, FixedTicker::new(Duration::from_millis(TICK_RATE_MS)));

    let first = app.session.request_load(config.language, config.level);
    spawn_fetch(runtime.handle(), &services, &tx, first);

    let res = start_tui(&mut terminal, &mut app, &runner, &services, runtime.handle(), &tx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // let in-flight submissions finish before exiting
    runtime.shutdown_timeout(Duration::from_secs(2));

    res
}

fn spawn_fetch(handle: &Handle, services: &Services, tx: &Sender<AppEvent>, ticket: LoadTicket) {
    let provider = Arc::clone(&services.provider);
    let tx = tx.clone();
    handle.spawn(async move {
        let result = provider.fetch(ticket.language, ticket.level).await;
        // the receiver is gone once the UI has quit
        let _ = tx.send(AppEvent::PoolLoaded { ticket, result });
    });
}

fn run_effect(effect: Effect, handle: &Handle, services: &Services, tx: &Sender<AppEvent>) {
    match effect {
        Effect::None => {}
        Effect::Load(ticket) => spawn_fetch(handle, services, tx, ticket),
        Effect::Submit(result) => {
            let sink = Arc::clone(&services.sink);
            handle.spawn(async move {
                submit_and_log(sink.as_ref(), result).await;
            });
        }
    }
}

fn start_tui<B: Backend, E: AppEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
    services: &Services,
    handle: &Handle,
    tx: &Sender<AppEvent>,
) -> anyhow::Result<()> {
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        match runner.step() {
            AppEvent::Tick => {
                // keep the elapsed timer moving while typing
                if app.session.has_started() && !app.session.is_finished() {
                    terminal.draw(|f| f.render_widget(&*app, f.area()))?;
                }
            }
            AppEvent::Resize => {
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
            AppEvent::PoolLoaded { ticket, result } => {
                let error = result.as_ref().err().map(|e| e.to_string());
                let outcome = app.session.complete_load(ticket, result);
                app.on_pool_loaded(outcome, error);
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
            AppEvent::Key(key) => {
                match translate_key(&key, app.session.raw_input(), app.session.selection()) {
                    KeyAction::Quit => break,
                    KeyAction::Ignore => continue,
                    KeyAction::Command(command) => {
                        let effect = app.session.dispatch(command);
                        run_effect(effect, handle, services, tx);
                    }
                }
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use monkeywords::page::WORDS_PER_PAGE;

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::try_parse_from([
            "monkeywords",
            "-l",
            "de",
            "--level",
            "2",
            "-n",
            "6",
            "--offline",
            "--seed",
            "7",
        ])
        .unwrap();

        assert_eq!(cli.language, Some(Language::German));
        assert_eq!(cli.level, Some(2));
        assert_eq!(cli.page_size, Some(6));
        assert!(cli.offline);
        assert_eq!(cli.seed, Some(7));
    }

    #[test]
    fn test_cli_accepts_language_names() {
        let cli = Cli::try_parse_from(["monkeywords", "--language", "japanese"]).unwrap();
        assert_eq!(cli.language, Some(Language::Japanese));
    }

    #[test]
    fn test_cli_rejects_level_zero() {
        assert!(Cli::try_parse_from(["monkeywords", "--level", "0"]).is_err());
        assert!(Cli::try_parse_from(["monkeywords", "-l", "xx"]).is_err());
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli {
            language: Some(Language::French),
            api_base_url: Some("http://localhost:9000/api".into()),
            ..Cli::default()
        };
        let config = cli.apply(Config {
            level: 2,
            ..Config::default()
        });

        assert_eq!(config.language, Language::French);
        assert_eq!(config.level, 2);
        assert_eq!(config.page_size, WORDS_PER_PAGE);
        assert_eq!(config.api_base_url, "http://localhost:9000/api");
        assert!(!config.offline);
    }

    #[test]
    fn test_offline_flag_cannot_be_unset_by_cli() {
        let config = Cli::default().apply(Config {
            offline: true,
            ..Config::default()
        });
        assert!(config.offline);
    }

    #[test]
    fn test_app_notice_follows_load_outcome() {
        let mut app = App::new(Session::new(Language::German, 1, SessionConfig::default()));

        app.on_pool_loaded(LoadOutcome::Failed, Some("word request timed out after 10s".into()));
        assert!(app.notice.is_some());

        app.on_pool_loaded(LoadOutcome::Stale, None);
        assert!(app.notice.is_some());

        app.on_pool_loaded(LoadOutcome::Applied, None);
        assert!(app.notice.is_none());
    }
}
