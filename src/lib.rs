//! # tic-rs - Electricity Meter Teleinformation to MQTT
//!
//! French electricity meters push their indexes and status over a serial "teleinformation"
//! (TIC) link, one frame every second or two. Each frame is a list of `TAG DATA CHECKSUM`
//! groups. The tic-rs crate reads these frames, validates every group, and republishes to an
//! MQTT broker only the values that changed since the previous frame.
//!
//! ## Features
//!
//! - Frame acquisition from a 1200 baud 7E1 serial link, resynchronising after any error
//! - Group decoding and per-group checksum validation
//! - Change detection per tag, so consumers only see transitions
//! - Homie 3.0.0 device advertisement over MQTT
//! - Support for logging and error handling
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tic_rs::{connect, historic_single_phase_fields, RecordingSink, TagRegistry, TicBridge};
//!
//! # async fn run() -> Result<(), tic_rs::TicError> {
//! let reader = connect("/dev/ttyS0")?;
//! let registry = TagRegistry::new(historic_single_phase_fields())?;
//! let mut bridge = TicBridge::new(reader, registry, RecordingSink::new());
//! bridge.run().await
//! # }
//! ```

pub mod bridge;
pub mod config;
pub mod constants;
pub mod error;
pub mod homie;
pub mod logging;
pub mod mqtt;
pub mod signals;
pub mod sink;
pub mod tic;

pub use crate::error::TicError;
pub use crate::logging::{init_logger, init_logger_with_verbosity, log_info};

pub use bridge::{BridgeStats, TicBridge};
pub use config::{BridgeConfig, BrokerConfig, SerialConfig};
pub use homie::{HomieDevice, HomieMessage};
pub use mqtt::MqttSink;
pub use signals::ShutdownSignals;
pub use sink::{close_sink, DispatchSink, RecordingSink};
pub use tic::{
    historic_single_phase_fields, ByteSource, Detection, FieldDescriptor, FrameReader,
    HomieDatatype, SerialLink, TagRegistry, TicFrame, TicGroup,
};

/// Open the teleinformation link on a serial port with the default settings.
///
/// # Arguments
/// * `port` - Serial port path (e.g., "/dev/ttyS0" or "/dev/ttyAMA0")
///
/// # Returns
/// * `Ok(FrameReader<SerialLink>)` - Reader ready to acquire frames
/// * `Err(TicError)` - The port could not be opened
pub fn connect(port: &str) -> Result<FrameReader<SerialLink>, TicError> {
    let config = SerialConfig {
        port_name: port.to_string(),
        ..SerialConfig::default()
    };
    Ok(FrameReader::new(SerialLink::open(&config)?))
}

/// Receive the next complete frame.
pub async fn recv_frame<S: ByteSource>(reader: &mut FrameReader<S>) -> Result<TicFrame, TicError> {
    reader.read_frame().await
}
