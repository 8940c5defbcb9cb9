//! # TIC Serial Link
//!
//! The teleinformation output is a 1200 baud, 7 data bits, even parity, 1 stop bit link.
//! This module opens it with `tokio-serial` and exposes it as a [`ByteSource`].

use crate::config::SerialConfig;
use crate::error::TicError;
use crate::tic::reader::ByteSource;
use log::info;
use tokio::io::AsyncReadExt;
use tokio::time::timeout;
use tokio_serial::{
    ClearBuffer, DataBits, FlowControl, Parity, SerialPort, SerialPortBuilderExt, StopBits,
};

/// Handle on the open teleinformation tty. The port is closed when the handle is dropped.
pub struct SerialLink {
    port: tokio_serial::SerialStream,
    config: SerialConfig,
}

impl SerialLink {
    /// Opens and configures the tty, then discards whatever was already buffered.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(config: &SerialConfig) -> Result<SerialLink, TicError> {
        let port = tokio_serial::new(&config.port_name, config.baudrate)
            .data_bits(DataBits::Seven)
            .parity(Parity::Even)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(config.timeout)
            .open_native_async()
            .map_err(|e| TicError::SerialPortError(format!("Cannot open {}: {e}", config.port_name)))?;
        port.clear(ClearBuffer::Input)?;

        info!("Opened {} at {} baud", config.port_name, config.baudrate);
        Ok(SerialLink {
            port,
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &SerialConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl ByteSource for SerialLink {
    async fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, TicError> {
        match timeout(self.config.timeout, self.port.read(buf)).await {
            Err(_elapsed) => Ok(0),
            Ok(res) => res.map_err(|e| TicError::SerialPortError(e.to_string())),
        }
    }

    fn discard_input(&mut self) -> Result<(), TicError> {
        self.port.clear(ClearBuffer::Input).map_err(TicError::from)
    }
}
