use env_logger::Env;
use log::{debug, error, info, log_enabled, warn, Level};

/// Initializes the logger with the `env_logger` crate.
///
/// The filter is taken from `RUST_LOG`.
pub fn init_logger() {
    env_logger::init();
}

/// Initializes the logger, defaulting to `debug` when verbose output was requested.
///
/// `RUST_LOG` still takes precedence over the default. Calling this twice is harmless.
pub fn init_logger_with_verbosity(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_secs()
        .try_init();
}

/// Logs an error message.
pub fn log_error(message: &str) {
    if log_enabled!(Level::Error) {
        error!("{message}");
    }
}

/// Logs a warning message.
pub fn log_warn(message: &str) {
    if log_enabled!(Level::Warn) {
        warn!("{message}");
    }
}

/// Logs an informational message.
pub fn log_info(message: &str) {
    if log_enabled!(Level::Info) {
        info!("{message}");
    }
}

/// Logs a debug message.
pub fn log_debug(message: &str) {
    if log_enabled!(Level::Debug) {
        debug!("{message}");
    }
}

/// Logs a frame as hex at trace level.
pub fn log_frame_hex(label: &str, frame: &[u8]) {
    if log_enabled!(Level::Trace) {
        log::trace!("{label} ({} bytes): {}", frame.len(), hex::encode_upper(frame));
    }
}
