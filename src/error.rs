//! # TIC Error Handling
//!
//! This module defines the TicError enum, which represents the different error
//! types that can occur in the tic-rs crate.

use thiserror::Error;

/// Represents the different error types that can occur in the TIC crate.
#[derive(Debug, Error)]
pub enum TicError {
    /// No start-of-frame byte arrived before the link stalled.
    #[error("Start of TIC frame not received")]
    FrameStartTimeout,

    /// The link stalled in the middle of a frame.
    #[error("End of TIC frame not received")]
    FrameEndTimeout,

    /// The frame body outgrew the reader buffer before its end marker.
    #[error("TIC frame longer than {capacity} bytes")]
    FrameTooLong { capacity: usize },

    /// Indicates a group checksum mismatch.
    #[error("Invalid checksum: expected 0x{expected:02X}, calculated 0x{calculated:02X}")]
    ChecksumMismatch { expected: u8, calculated: u8 },

    /// Indicates an error related to the serial port communication.
    #[error("Serial port error: {0}")]
    SerialPortError(String),

    /// Two field descriptors share the same tag.
    #[error("Duplicate tag in field table: {0}")]
    DuplicateTag(String),

    /// Invalid configuration or field table.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Indicates an error reported by the MQTT client.
    #[error("Broker error: {0}")]
    BrokerError(String),

    /// A catch‑all error for uncategorized cases.
    #[error("Other error: {0}")]
    Other(String),
}

impl TicError {
    /// Returns true when the pipeline may simply move on to the next frame or group.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TicError::FrameStartTimeout
                | TicError::FrameEndTimeout
                | TicError::FrameTooLong { .. }
                | TicError::ChecksumMismatch { .. }
        )
    }
}

impl From<std::io::Error> for TicError {
    fn from(err: std::io::Error) -> Self {
        TicError::SerialPortError(err.to_string())
    }
}

impl From<tokio_serial::Error> for TicError {
    fn from(err: tokio_serial::Error) -> Self {
        TicError::SerialPortError(err.to_string())
    }
}

impl From<serde_json::Error> for TicError {
    fn from(err: serde_json::Error) -> Self {
        TicError::ConfigError(err.to_string())
    }
}

impl From<rumqttc::ClientError> for TicError {
    fn from(err: rumqttc::ClientError) -> Self {
        TicError::BrokerError(err.to_string())
    }
}
