use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use gaps_core::quiz::QuizTiming;
use services::{
    ApiConfig, AppServices, AuthService, AuthoringService, Clock, DashboardService, QuizWorkflow,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use ui::{App, UiApp, build_app_context};

const DB_URL_ENV: &str = "GAPS_DB_URL";
const FAST_SECS_ENV: &str = "GAPS_FAST_SECS";
const SLOW_SECS_ENV: &str = "GAPS_SLOW_SECS";
const LIVE_REFRESH_ENV: &str = "GAPS_LIVE_REFRESH_SECS";
const EXPORT_DIR_ENV: &str = "GAPS_EXPORT_DIR";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidApiUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidApiUrl { raw } => write!(f, "invalid --api-url value: {raw}"),
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
    timing: QuizTiming,
    live_refresh: Duration,
    export_dir: PathBuf,
}

impl UiApp for DesktopApp {
    fn quiz(&self) -> Arc<QuizWorkflow> {
        self.services.quiz()
    }

    fn dashboard(&self) -> Arc<DashboardService> {
        self.services.dashboard()
    }

    fn auth(&self) -> Arc<AuthService> {
        self.services.auth()
    }

    fn authoring(&self) -> Arc<AuthoringService> {
        self.services.authoring()
    }

    fn timing(&self) -> QuizTiming {
        self.timing
    }

    fn live_refresh(&self) -> Duration {
        self.live_refresh
    }

    fn export_dir(&self) -> PathBuf {
        self.export_dir.clone()
    }
}

struct Args {
    api: ApiConfig,
    db_url: String,
    timing: QuizTiming,
    live_refresh: Duration,
    export_dir: PathBuf,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui [--api-url <url>] [--db <sqlite_url>]");
    eprintln!("                         [--export-dir <dir>]");
    eprintln!();
    eprintln!("Defaults for ui:");
    eprintln!("  --api-url {}", services::api::DEFAULT_API_URL);
    eprintln!("  --db sqlite:gaps.sqlite3");
    eprintln!("  --export-dir .");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  {}, {DB_URL_ENV}, {EXPORT_DIR_ENV}", services::api::API_URL_ENV);
    eprintln!("  {FAST_SECS_ENV}, {SLOW_SECS_ENV}, {LIVE_REFRESH_ENV}");
    eprintln!("  RUST_LOG (default: info)");
}

fn env_secs(name: &str) -> Option<f64> {
    std::env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<f64>().ok())
}

/// Live refresh period; anything under a second or out of range falls back.
fn refresh_period(secs: Option<f64>) -> Duration {
    secs.filter(|secs| *secs >= 1.0)
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .unwrap_or(ui::context::DEFAULT_LIVE_REFRESH)
}

impl Args {
    fn parse_ui(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut api = ApiConfig::from_env();
        let mut db_url = std::env::var(DB_URL_ENV).ok().map_or_else(
            || normalize_sqlite_url("sqlite:gaps.sqlite3".into()),
            normalize_sqlite_url,
        );
        let mut export_dir = std::env::var(EXPORT_DIR_ENV)
            .ok()
            .map_or_else(|| PathBuf::from("."), PathBuf::from);

        let defaults = QuizTiming::default();
        let timing = QuizTiming::new(
            env_secs(FAST_SECS_ENV).unwrap_or(defaults.fast_secs),
            env_secs(SLOW_SECS_ENV).unwrap_or(defaults.slow_secs),
        );
        let live_refresh = refresh_period(env_secs(LIVE_REFRESH_ENV));

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api-url" => {
                    let value = require_value(args, "--api-url")?;
                    if !value.starts_with("http://") && !value.starts_with("https://") {
                        return Err(ArgsError::InvalidApiUrl { raw: value });
                    }
                    api = ApiConfig::new(value);
                }
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--export-dir" => {
                    export_dir = PathBuf::from(require_value(args, "--export-dir")?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            api,
            db_url,
            timing,
            live_refresh,
            export_dir,
        })
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

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    match argv.first().map(String::as_str) {
        None => {}
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => {}
        Some("ui") => {
            argv.remove(0);
        }
        Some(first) => {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            return Err(
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand").into(),
            );
        }
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse_ui(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // The session store lives next to the binary's working directory.
    prepare_sqlite_file(&parsed.db_url)?;
    let services =
        AppServices::new_sqlite(parsed.api, &parsed.db_url, Clock::default_clock()).await?;

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        services,
        timing: parsed.timing,
        live_refresh: parsed.live_refresh,
        export_dir: parsed.export_dir,
    });
    let context = build_app_context(&app);
    tracing::info!(
        fast_secs = parsed.timing.fast_secs,
        slow_secs = parsed.timing.slow_secs,
        live_refresh_secs = parsed.live_refresh.as_secs(),
        "launching desktop ui"
    );

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Learning Gaps Detector")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
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

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_logging();
    if let Err(err) = run().await {
        tracing::error!(error = %err, "startup failed");
        eprintln!("{err}");
        std::process::exit(2);
    }
}
