//! TIC Protocol Constants
//!
//! This module defines the framing bytes, buffer sizes and link defaults used by the
//! historic ("legacy") teleinformation output of French electricity meters.

use std::time::Duration;

/// Start of frame (STX)
pub const TIC_FRAME_START: u8 = 0x02;

/// End of frame (ETX)
pub const TIC_FRAME_END: u8 = 0x03;

/// Line feed opening every group line
pub const TIC_GROUP_START: u8 = b'\n';

/// Separator between tag, data and checksum
pub const TIC_GROUP_SEPARATOR: u8 = b' ';

/// Carriage return closing every group line
pub const TIC_GROUP_END: u8 = b'\r';

/// Seed and offset of the group checksum
pub const TIC_CHECKSUM_BASE: u8 = b' ';

/// Only the low 6 bits of the sum are kept
pub const TIC_CHECKSUM_MASK: u8 = 0x3F;

/// Largest frame body accepted between STX and ETX
pub const TIC_FRAME_MAX: usize = 512;

// ----------------------------------------------------------------------------
// Serial link
// ----------------------------------------------------------------------------

pub const DEFAULT_TTY: &str = "/dev/ttyS0";
pub const TIC_BAUDRATE: u32 = 1200;

/// A frame is emitted every 1-2 s; no byte for this long means the link stalled
pub const TIC_READ_TIMEOUT: Duration = Duration::from_secs(8);

/// Bytes pulled from the link per read call
pub const TIC_READ_CHUNK: usize = 64;

// ----------------------------------------------------------------------------
// Broker
// ----------------------------------------------------------------------------

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 1883;
pub const DEFAULT_KEEPALIVE: u64 = 60;

/// Capacity of the outgoing MQTT request queue
pub const MQTT_REQUEST_CAPACITY: usize = 256;

/// Pause before polling the event loop again after a connection error
pub const MQTT_RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// How long closing the sink waits for the event loop to flush and stop
pub const MQTT_CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

// ----------------------------------------------------------------------------
// Homie convention
// ----------------------------------------------------------------------------

pub const HOMIE_BASE_TOPIC: &str = "homie/";
pub const HOMIE_DEVICE_ID: &str = "linky";
pub const HOMIE_DEVICE_CONVENTION_VERSION: &str = "3.0.0";
pub const HOMIE_DEVICE_NAME: &str = "Linky";
pub const HOMIE_DEVICE_EXTENSIONS: &str = "";
pub const HOMIE_DEVICE_IMPLEMENTATION: &str = "RPi";

pub const HOMIE_NODE_ID: &str = "tic";
pub const HOMIE_NODE_NAME: &str = "TIC output";
pub const HOMIE_NODE_TYPE: &str = "Electricity meter";
