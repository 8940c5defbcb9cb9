//! Mock serial port implementation for testing
//!
//! This module provides a scriptable byte source that can be used to test
//! frame acquisition without requiring actual hardware.
//!
//! Queued data models bytes that arrive on the line *after* the reader flushed its input.
//! Each queued chunk is delivered on its own; once the script runs dry, reads return 0 the
//! way a real link does when its read timeout elapses. Stale data models bytes already
//! sitting in the driver buffer and is lost on the next flush.

use crate::error::TicError;
use crate::tic::reader::ByteSource;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MockState {
    /// Bytes received by the driver but not read yet
    pending: VecDeque<u8>,
    /// Chunks still to arrive on the line
    script: VecDeque<Vec<u8>>,
    /// Simulated device failure
    next_error: Option<io::Error>,
    /// Number of input flushes requested
    discards: usize,
    /// Report a device failure instead of a stall once the script is exhausted
    fail_when_drained: bool,
}

/// Mock serial port fed from a script of incoming chunks
#[derive(Clone, Default)]
pub struct MockSerialPort {
    state: Arc<Mutex<MockState>>,
}

impl MockSerialPort {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queue a chunk of data to arrive on the line
    pub fn queue_rx_data(&self, data: &[u8]) {
        self.state().script.push_back(data.to_vec());
    }

    /// Queue a stall: the next read that reaches it returns 0 bytes
    pub fn queue_stall(&self) {
        self.state().script.push_back(Vec::new());
    }

    /// Put data straight into the driver buffer, where the next flush discards it
    pub fn queue_stale_data(&self, data: &[u8]) {
        self.state().pending.extend(data);
    }

    /// Set an error to be returned on the next read
    pub fn set_next_error(&self, error: io::Error) {
        self.state().next_error = Some(error);
    }

    /// Simulate the device going away once every queued chunk has been read
    pub fn disconnect_when_drained(&self) {
        self.state().fail_when_drained = true;
    }

    /// Number of times the input was flushed
    pub fn discard_count(&self) -> usize {
        self.state().discards
    }

    /// Bytes still pending or scripted
    pub fn remaining(&self) -> usize {
        let state = self.state();
        state.pending.len() + state.script.iter().map(Vec::len).sum::<usize>()
    }

    /// Clear all buffers
    pub fn clear(&self) {
        let mut state = self.state();
        state.pending.clear();
        state.script.clear();
    }
}

#[async_trait::async_trait]
impl ByteSource for MockSerialPort {
    async fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, TicError> {
        let mut state = self.state();
        if let Some(error) = state.next_error.take() {
            return Err(error.into());
        }

        if state.pending.is_empty() {
            match state.script.pop_front() {
                Some(chunk) => state.pending.extend(chunk),
                None if state.fail_when_drained => {
                    return Err(TicError::SerialPortError("device disconnected".into()));
                }
                None => return Ok(0),
            }
        }

        let n = state.pending.len().min(buf.len());
        for (slot, byte) in buf.iter_mut().zip(state.pending.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn discard_input(&mut self) -> Result<(), TicError> {
        let mut state = self.state();
        state.pending.clear();
        state.discards += 1;
        Ok(())
    }
}
