use std::{fs::OpenOptions, io, path::PathBuf, sync::Mutex};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

/// Environment variable naming the log file.
pub const LOG_FILE_ENV: &str = "KOSPI_CHART_LOG";

/// Install a global fmt subscriber appending to the file named by [`LOG_FILE_ENV`].
///
/// The terminal belongs to the UI, so nothing is installed when the variable is unset. Returns
/// whether a subscriber was installed.
pub fn init_logging() -> io::Result<bool> {
    let Some(path) = log_file(|key| std::env::var(key).ok()) else {
        return Ok(false);
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let installed = tracing_subscriber::fmt()
        // Filter messages based on the INFO level
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        // Plain text for a file
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .is_ok();

    Ok(installed)
}

fn log_file(lookup: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    lookup(LOG_FILE_ENV)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
