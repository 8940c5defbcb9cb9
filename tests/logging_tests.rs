//! Unit tests for the logging functionality in the `tic-rs` crate.

use tic_rs::logging::{
    init_logger_with_verbosity, log_debug, log_error, log_frame_hex, log_info, log_warn,
};

/// Tests that the logging helpers work after initialization.
#[test]
fn test_logging() {
    init_logger_with_verbosity(true);
    log_error("This is an error message");
    log_warn("This is a warning message");
    log_info("This is an info message");
    log_debug("This is a debug message");
    log_frame_hex("frame", b"\nIINST 002 Y\r");
}

/// Tests that initializing twice does not panic.
#[test]
fn test_init_twice() {
    init_logger_with_verbosity(false);
    init_logger_with_verbosity(true);
}
