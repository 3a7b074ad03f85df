pub mod formats;

use std::path::Path;

use flexi_logger::{FileSpec, Logger, LoggerHandle};

use crate::Error;

/// Starts file logging. Keep the returned handle alive for the whole run.
pub fn init(log_file: &Path) -> Result<LoggerHandle, Error> {
    let handle = Logger::try_with_env_or_str("info")?
        .format(formats::file_format)
        .log_to_file(FileSpec::try_from(log_file)?)
        .append()
        .start()?;

    Ok(handle)
}
