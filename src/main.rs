use anyhow::Result;
use clap::{Parser, ValueEnum};
use ocifn::config::ConfigSource;
use ocifn::oci::client::OciClients;
use ocifn::{FunctionPath, FunctionResolver};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "ocifn.log";

/// Invoke an OCI Function by compartment, application and function name
#[derive(Parser, Debug)]
#[command(name = "ocifn", version, about, long_about = None)]
struct Args {
    /// Compartment holding the application
    compartment: String,

    /// Application holding the function
    app: String,

    /// Function to invoke
    function: String,

    /// Request payload, sent as is; omit to invoke with no payload
    #[arg(allow_hyphen_values = true)]
    payload: Option<String>,

    /// Config profile (overrides OCI_CONFIG_PROFILE)
    #[arg(long)]
    profile: Option<String>,

    /// Config file (overrides OCI_CONFIG_PATH)
    #[arg(long)]
    config_file: Option<PathBuf>,

    /// Log level for debugging (overrides RUST_LOG)
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

/// Build the log filter. An explicit `--log-level` wins over `RUST_LOG`;
/// with neither, logging stays off.
fn log_filter(level: Option<LogLevel>, rust_log: Option<&str>) -> Option<EnvFilter> {
    if let Some(level) = level {
        let level = level.to_tracing_level()?;
        return Some(EnvFilter::default().add_directive(LevelFilter::from_level(level).into()));
    }

    let directives = rust_log.map(str::trim).filter(|d| !d.is_empty())?;
    match EnvFilter::try_new(directives) {
        Ok(filter) => Some(filter),
        Err(e) => {
            eprintln!("Logging disabled, invalid RUST_LOG {directives:?}: {e}");
            None
        }
    }
}

/// Log to `ocifn.log` under the user config dir; stdout and stderr carry
/// only the response and the error report
fn setup_logging(filter: EnvFilter) -> Option<WorkerGuard> {
    let dir = log_dir();
    let appender = match RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE)
        .build(&dir)
    {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Logging disabled, could not open {}: {}", dir.join(LOG_FILE).display(), e);
            return None;
        }
    };

    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Logging to {}", dir.join(LOG_FILE).display());

    Some(guard)
}

fn log_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("ocifn"))
        .or_else(|| dirs::home_dir().map(|home| home.join(".ocifn")))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// `DEBUG` counts as set unless empty, `0` or `false`
fn debug_enabled(value: Option<&str>) -> bool {
    match value {
        Some(v) => {
            let v = v.trim();
            !(v.is_empty() || v == "0" || v.eq_ignore_ascii_case("false"))
        }
        None => false,
    }
}

/// The one-line report, followed under `DEBUG` by the typed error, its
/// cause chain and a backtrace
fn error_report(err: &anyhow::Error, debug: bool) -> String {
    let mut report = format!("An error occurred: {err}");
    if !debug {
        return report;
    }

    if let Some(detail) = err.downcast_ref::<ocifn::Error>() {
        report.push_str(&format!("\n\nError detail: {detail:?}"));
    }

    let causes: Vec<String> = err.chain().skip(1).map(|cause| cause.to_string()).collect();
    if !causes.is_empty() {
        report.push_str("\n\nCaused by:");
        for (i, cause) in causes.iter().enumerate() {
            report.push_str(&format!("\n    {i}: {cause}"));
        }
    }

    let captured = err.backtrace();
    let backtrace = if captured.status() == BacktraceStatus::Captured {
        captured.to_string()
    } else {
        Backtrace::force_capture().to_string()
    };
    report.push_str(&format!("\n\nStack backtrace:\n{backtrace}"));
    report
}

/// Write the response body verbatim, ending with a newline
fn write_response(out: &mut impl Write, data: &[u8]) -> io::Result<()> {
    out.write_all(data)?;
    if !data.ends_with(b"\n") {
        out.write_all(b"\n")?;
    }
    out.flush()
}

async fn run(args: Args) -> Result<()> {
    let source = ConfigSource::from_env(args.config_file, args.profile);
    let config = source.load()?;
    tracing::info!("Using profile {} in region {}", config.profile, config.region);

    let clients = OciClients::new(&config)?;
    let resolver = FunctionResolver::new(clients);

    let path = FunctionPath {
        compartment: args.compartment,
        application: args.app,
        function: args.function,
    };

    let payload = match args.payload {
        Some(payload) => payload.into_bytes(),
        None => {
            eprintln!("Invocation with no payload");
            Vec::new()
        }
    };

    let result = resolver.resolve_and_invoke(&path, payload).await?;
    tracing::info!(
        "Invocation returned {} ({} bytes, opc-request-id: {:?})",
        result.status,
        result.data.len(),
        result.request_id
    );

    write_response(&mut io::stdout().lock(), &result.data)?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Errors only capture a backtrace when asked to before they are built
    let debug = debug_enabled(std::env::var("DEBUG").ok().as_deref());
    if debug && std::env::var_os("RUST_LIB_BACKTRACE").is_none() {
        std::env::set_var("RUST_LIB_BACKTRACE", "1");
    }

    let _log_guard = log_filter(args.log_level, std::env::var("RUST_LOG").ok().as_deref())
        .and_then(setup_logging);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:?}", err);
            eprintln!("{}", error_report(&err, debug));
            ExitCode::FAILURE
        }
    }
}
