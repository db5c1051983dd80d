use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// Console level: warnings only unless verbose, so per-line records do not
/// interleave with the progress bar on stderr.
fn console_level(verbose: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

/// Install console logging on stderr and an append-only log file.
///
/// `RUST_LOG` overrides the console level. The file always records INFO and
/// above, with timestamps, so each translation attempt can be traced later.
/// Returns `false` when another subscriber was already installed, in which
/// case the log file receives nothing.
pub fn init(verbose: bool, log_file: &Path) -> std::io::Result<bool> {
    let level = console_level(verbose);

    let console_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .with_filter(console_filter);

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_filter(LevelFilter::INFO);

    match tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .try_init()
    {
        Ok(()) => Ok(true),
        Err(e) => {
            eprintln!(
                "warning: logging already initialised, {} will not be written: {}",
                log_file.display(),
                e
            );
            Ok(false)
        }
    }
}
