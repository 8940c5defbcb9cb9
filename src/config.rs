//! # Bridge Configuration
//!
//! Settings for the serial link and the broker, and loading of the field descriptor table
//! from JSON.
//!
//! A field table file is a JSON array of descriptors:
//!
//! ```json
//! [
//!   { "tag": "PAPP", "len": 5, "name": "Puissance apparente", "datatype": "integer", "unit": "VA" },
//!   { "tag": "PTEC", "len": 4, "name": "Période tarifaire", "datatype": "enum", "values": ["HC..", "HP.."] }
//! ]
//! ```

use crate::constants::{
    DEFAULT_HOST, DEFAULT_KEEPALIVE, DEFAULT_PORT, DEFAULT_TTY, TIC_BAUDRATE, TIC_GROUP_SEPARATOR,
    TIC_READ_TIMEOUT,
};
use crate::error::TicError;
use crate::tic::fields::{historic_single_phase_fields, FieldDescriptor, HomieDatatype};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for serial connection.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub port_name: String,
    pub baudrate: u32,
    /// Silence after which a read reports a stall
    pub timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        SerialConfig {
            port_name: DEFAULT_TTY.to_string(),
            baudrate: TIC_BAUDRATE,
            timeout: TIC_READ_TIMEOUT,
        }
    }
}

/// Configuration for the MQTT connection.
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    pub host: String,
    pub port: u16,
    /// Keep-alive interval in seconds
    pub keepalive: u64,
    pub client_id: String,
    /// QoS of value publications (0, 1 or 2)
    pub qos: u8,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        BrokerConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            keepalive: DEFAULT_KEEPALIVE,
            client_id: format!("tic-rs-{}", std::process::id()),
            qos: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BridgeConfig {
    pub serial: SerialConfig,
    pub broker: BrokerConfig,
    /// JSON field table replacing the built-in one
    pub fields_path: Option<PathBuf>,
    pub verbose: bool,
}

impl BridgeConfig {
    /// Field table to run with: the configured file, or the built-in historic table.
    pub fn field_table(&self) -> Result<Vec<FieldDescriptor>, TicError> {
        match &self.fields_path {
            Some(path) => load_field_table(path),
            None => Ok(historic_single_phase_fields()),
        }
    }
}

/// Reads and validates a JSON field table.
pub fn load_field_table(path: impl AsRef<Path>) -> Result<Vec<FieldDescriptor>, TicError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .map_err(|e| TicError::ConfigError(format!("Cannot read {}: {e}", path.display())))?;
    parse_field_table(&json)
}

pub fn parse_field_table(json: &str) -> Result<Vec<FieldDescriptor>, TicError> {
    let fields: Vec<FieldDescriptor> = serde_json::from_str(json)?;
    validate_field_table(fields)
}

/// Checks a field table and fills in missing property ids.
pub fn validate_field_table(
    mut fields: Vec<FieldDescriptor>,
) -> Result<Vec<FieldDescriptor>, TicError> {
    if fields.is_empty() {
        return Err(TicError::ConfigError("Field table is empty".into()));
    }

    let mut seen = HashSet::new();
    for field in &mut fields {
        if field.tag.is_empty() || field.tag.as_bytes().contains(&TIC_GROUP_SEPARATOR) {
            return Err(TicError::ConfigError(format!("Invalid tag {:?}", field.tag)));
        }
        if field.len == 0 {
            return Err(TicError::ConfigError(format!("Tag {} has zero length", field.tag)));
        }
        if field.datatype == HomieDatatype::Enum && field.values.is_empty() {
            return Err(TicError::ConfigError(format!("Enum tag {} has no values", field.tag)));
        }
        if !seen.insert(field.tag.clone()) {
            return Err(TicError::DuplicateTag(field.tag.clone()));
        }
        if field.prop_id.is_empty() {
            field.prop_id = field.tag.to_lowercase();
        }
    }

    Ok(fields)
}
