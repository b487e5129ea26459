use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use tokio::runtime::Handle;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use services::proctoring::CameraDevice;
use services::{AppServices, Clock, HistoryStore, QuizConfig, QuizOrigin, QuizSession, Renderer};
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidDuration { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidDuration { raw } => {
                write!(f, "invalid --duration value: {raw} (expected whole seconds > 0)")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: AppServices,
    runtime: Handle,
}

impl UiApp for DesktopApp {
    fn new_session(
        &self,
        renderer: Arc<dyn Renderer>,
        camera: Arc<dyn CameraDevice>,
    ) -> QuizSession {
        self.services.session(self.runtime.clone(), renderer, camera)
    }

    fn history(&self) -> HistoryStore {
        self.services.history()
    }

    fn duration_secs(&self) -> u32 {
        self.services.config().duration_secs
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    db_url: String,
    config: QuizConfig,
    quiz_file: Option<PathBuf>,
    log_filter: String,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- [--db <sqlite_url>] [--endpoint <url> | --quiz-file <path>]"
    );
    eprintln!("                      [--duration <secs>] [--history-key <key>] [--log <filter>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:quiz.sqlite3");
    eprintln!("  --endpoint http://localhost:2003/Quiz");
    eprintln!("  --duration 300");
    eprintln!("  --history-key quizHistory");
    eprintln!("  --log info");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_ENDPOINT, QUIZ_DURATION_SECS, QUIZ_HISTORY_KEY, RUST_LOG");
}

impl Args {
    fn from_env() -> Self {
        Self {
            db_url: normalize_sqlite_url(
                std::env::var("QUIZ_DB_URL")
                    .ok()
                    .filter(|value| !value.trim().is_empty())
                    .unwrap_or_else(|| "sqlite:quiz.sqlite3".into()),
            ),
            config: QuizConfig::from_env(),
            quiz_file: None,
            log_filter: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        }
    }

    fn parse(mut self, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    self.db_url = normalize_sqlite_url(value);
                }
                "--endpoint" => self.config.endpoint = require_value(args, "--endpoint")?,
                "--quiz-file" => {
                    self.quiz_file = Some(PathBuf::from(require_value(args, "--quiz-file")?));
                }
                "--duration" => {
                    let value = require_value(args, "--duration")?;
                    self.config.duration_secs = value
                        .trim()
                        .parse()
                        .ok()
                        .filter(|secs| *secs > 0)
                        .ok_or(ArgsError::InvalidDuration { raw: value })?;
                }
                "--history-key" => self.config.history_key = require_value(args, "--history-key")?,
                "--log" => self.log_filter = require_value(args, "--log")?,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(self)
    }

    fn origin(&self) -> QuizOrigin {
        self.quiz_file.clone().map_or_else(
            || QuizOrigin::Http(self.config.endpoint.clone()),
            QuizOrigin::File,
        )
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::from_env().parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    init_tracing(&args.log_filter);

    // Session timers and storage run here; the desktop event loop owns the main thread.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("quiz-runtime")
        .build()?;

    prepare_sqlite_file(&args.db_url)?;
    let services = runtime.block_on(AppServices::new_sqlite(
        &args.db_url,
        args.config.clone(),
        args.origin(),
        Clock::system(),
    ))?;
    info!(
        db = %args.db_url,
        origin = ?args.origin(),
        duration_secs = args.config.duration_secs,
        "launching quiz window"
    );

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        services,
        runtime: runtime.handle().clone(),
    });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Quiz")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
