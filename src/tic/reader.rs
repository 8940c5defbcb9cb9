//! # TIC Frame Reader
//!
//! Recovers frame boundaries from the continuous byte stream of the teleinformation link.
//!
//! Every call to [`FrameReader::read_frame`] starts from scratch: pending input is discarded,
//! bytes are dropped until a start marker, and the body is accumulated until the end marker.
//! Nothing read by one call is ever seen by the next one.

use crate::constants::{TIC_FRAME_END, TIC_FRAME_MAX, TIC_FRAME_START, TIC_READ_CHUNK};
use crate::error::TicError;
use crate::logging::log_frame_hex;
use crate::tic::frame::TicFrame;
use bytes::{BufMut, BytesMut};
use log::{debug, trace};

/// Trait for the raw byte supply of the link.
#[async_trait::async_trait]
pub trait ByteSource: Send {
    /// Reads up to `buf.len()` bytes. `Ok(0)` means nothing arrived in time or the stream ended.
    async fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, TicError>;

    /// Drops any input received but not yet read.
    fn discard_input(&mut self) -> Result<(), TicError>;
}

#[async_trait::async_trait]
impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    async fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, TicError> {
        (**self).read_bytes(buf).await
    }

    fn discard_input(&mut self) -> Result<(), TicError> {
        (**self).discard_input()
    }
}

/// Assembles complete frames out of a [`ByteSource`].
pub struct FrameReader<S: ByteSource> {
    source: S,
    capacity: usize,
}

impl<S: ByteSource> FrameReader<S> {
    /// Create a reader with the default frame capacity.
    pub fn new(source: S) -> Self {
        Self::with_capacity(source, TIC_FRAME_MAX)
    }

    pub fn with_capacity(source: S, capacity: usize) -> Self {
        FrameReader { source, capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    /// Blocks until one complete frame has been read.
    ///
    /// Fails with `FrameStartTimeout` or `FrameEndTimeout` when the source stalls before the
    /// start or end marker, and with `FrameTooLong` when the body outgrows the capacity.
    /// All three leave the reader ready for the next call. A start marker seen inside a frame
    /// restarts the body.
    pub async fn read_frame(&mut self) -> Result<TicFrame, TicError> {
        self.source.discard_input()?;

        let mut chunk = [0u8; TIC_READ_CHUNK];
        let mut body = BytesMut::with_capacity(self.capacity);
        let mut in_frame = false;
        let mut dropped = 0usize;

        loop {
            let n = self.source.read_bytes(&mut chunk).await?;
            if n == 0 {
                return Err(if in_frame {
                    TicError::FrameEndTimeout
                } else {
                    TicError::FrameStartTimeout
                });
            }

            for &byte in &chunk[..n] {
                if byte == TIC_FRAME_START {
                    if in_frame {
                        debug!("Start marker inside frame, restarting after {} bytes", body.len());
                        body.clear();
                    } else if dropped > 0 {
                        trace!("Dropped {dropped} bytes before start marker");
                    }
                    in_frame = true;
                    continue;
                }
                if !in_frame {
                    dropped += 1;
                    continue;
                }
                if byte == TIC_FRAME_END {
                    log_frame_hex("TIC frame", &body);
                    return Ok(TicFrame::new(body.freeze()));
                }
                if body.len() >= self.capacity {
                    return Err(TicError::FrameTooLong {
                        capacity: self.capacity,
                    });
                }
                body.put_u8(byte);
            }
        }
    }
}
