use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::error::Result;

pub const LOG_ENV: &str = "KEYSPRINT_LOG";

/// Installs a file-backed subscriber; the terminal itself belongs to the UI.
///
/// The returned guard flushes buffered lines when dropped and must be held
/// until the program exits. Returns `Ok(None)` if a global subscriber was
/// already installed.
pub fn init(log_path: &Path) -> Result<Option<WorkerGuard>> {
    let dir = log_path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;
    let file_name = log_path
        .file_name()
        .map(|f| f.to_os_string())
        .unwrap_or_else(|| "keysprint.log".into());

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
    {
        Ok(()) => Ok(Some(guard)),
        // already installed, dropping the guard shuts the unused writer down
        Err(_) => Ok(None),
    }
}
