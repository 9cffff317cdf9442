use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use selector_core::Clock;
use selector_core::model::Taxonomy;
use selector_core::scorm::{ParseVersionError, ScormVersion};
use services::{AppServices, ChecklistService, LaunchOptions, ScormConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

const CLOSE_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingTaxonomy,
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidScormVersion(ParseVersionError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingTaxonomy => {
                write!(f, "a taxonomy file is required (--taxonomy or SELECTOR_TAXONOMY)")
            }
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidScormVersion(err) => write!(f, "invalid --scorm value: {err}"),
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
}

impl UiApp for DesktopApp {
    fn taxonomy(&self) -> Arc<Taxonomy> {
        self.services.taxonomy()
    }

    fn checklist(&self) -> Arc<ChecklistService> {
        self.services.checklist()
    }

    fn desktop_window(&self) -> bool {
        true
    }

    fn flush(&self) {
        if !self.services.flush(CLOSE_FLUSH_TIMEOUT) {
            warn!("pending commits were not saved before close");
        }
    }
}

struct Args {
    taxonomy: PathBuf,
    db_url: String,
    launch: LaunchOptions,
    debug: bool,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- --taxonomy data/competencies.json [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>     default sqlite:selector.sqlite3");
    eprintln!("  --course <id>         default competency-selector");
    eprintln!("  --learner <id>        default local");
    eprintln!("  --scorm <1.2|2004>    default 1.2");
    eprintln!("  --no-lms              do not host a local LMS");
    eprintln!("  --restart             discard the stored attempt and start over");
    eprintln!("  --strict              fail instead of falling back to a no-op API");
    eprintln!("  --debug               verbose session logging");
    eprintln!("  --no-auto-status      leave completion status alone at terminate");
    eprintln!("  --no-auto-exit        leave exit mode alone at terminate");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  SELECTOR_TAXONOMY, SELECTOR_DB_URL, SELECTOR_COURSE_ID, SELECTOR_LEARNER_ID");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut taxonomy = std::env::var("SELECTOR_TAXONOMY").ok().map(PathBuf::from);
        let mut db_url = std::env::var("SELECTOR_DB_URL").ok().map_or_else(
            || normalize_sqlite_url("sqlite:selector.sqlite3".into()),
            normalize_sqlite_url,
        );
        let mut launch = LaunchOptions::default();
        if let Ok(course) = std::env::var("SELECTOR_COURSE_ID") {
            launch.course_id = course;
        }
        if let Ok(learner) = std::env::var("SELECTOR_LEARNER_ID") {
            launch.learner_id = learner;
        }
        let mut scorm = ScormConfig::default().with_debug(false);
        let mut debug = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--taxonomy" => taxonomy = Some(PathBuf::from(require_value(args, "--taxonomy")?)),
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--course" => launch.course_id = require_value(args, "--course")?,
                "--learner" => launch.learner_id = require_value(args, "--learner")?,
                "--scorm" => {
                    launch.version = require_value(args, "--scorm")?
                        .parse::<ScormVersion>()
                        .map_err(ArgsError::InvalidScormVersion)?;
                }
                "--no-lms" => launch.bind_local_lms = false,
                "--restart" => launch.restart_attempt = true,
                "--strict" => scorm = scorm.with_strict_find_api(true),
                "--debug" => {
                    debug = true;
                    scorm = scorm.with_debug(true);
                }
                "--no-auto-status" => scorm = scorm.with_completion_status_handling(false),
                "--no-auto-exit" => scorm = scorm.with_exit_mode_handling(false),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        launch.scorm = scorm;
        Ok(Self {
            taxonomy: taxonomy.ok_or(ArgsError::MissingTaxonomy)?,
            db_url,
            launch,
            debug,
        })
    }
}

fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("info,app=debug,services=debug,ui=debug,storage=debug")
        } else {
            EnvFilter::new("info")
        }
    });
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
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

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    init_tracing(parsed.debug);

    let raw = std::fs::read_to_string(&parsed.taxonomy)?;
    let taxonomy = Taxonomy::from_json_str(&raw)?;
    info!(
        path = %parsed.taxonomy.display(),
        indicators = taxonomy.indicator_count(),
        "taxonomy loaded"
    );

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let (services, writer) =
        AppServices::new_sqlite(&parsed.db_url, taxonomy, parsed.launch, Clock::System).await?;
    if let Some(writer) = writer {
        tokio::spawn(writer.run());
    }

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Competency Selector")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
