//! # TIC Bridge
//!
//! Ties the pipeline together: frame reader, group decoder and checksum check, tag registry,
//! dispatch sink. One [`TicBridge`] owns all of them for the lifetime of the process.

use crate::error::TicError;
use crate::sink::DispatchSink;
use crate::tic::frame::{verify_group, TicFrame};
use crate::tic::reader::{ByteSource, FrameReader};
use crate::tic::registry::{Detection, TagRegistry};
use log::{debug, error, warn};
use serde::Serialize;

/// Counters of the pipeline since startup.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BridgeStats {
    pub frames: u64,
    pub groups: u64,
    pub checksum_errors: u64,
    pub unknown_tags: u64,
    pub dispatches: u64,
    pub publish_errors: u64,
    pub start_timeouts: u64,
    pub end_timeouts: u64,
    pub overlong_frames: u64,
}

impl BridgeStats {
    /// Renders the counters as a JSON object.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

pub struct TicBridge<S: ByteSource, K: DispatchSink> {
    reader: FrameReader<S>,
    registry: TagRegistry,
    sink: K,
    stats: BridgeStats,
}

impl<S: ByteSource, K: DispatchSink> TicBridge<S, K> {
    pub fn new(reader: FrameReader<S>, registry: TagRegistry, sink: K) -> Self {
        TicBridge {
            reader,
            registry,
            sink,
            stats: BridgeStats::default(),
        }
    }

    pub fn stats(&self) -> &BridgeStats {
        &self.stats
    }

    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    pub fn reader_mut(&mut self) -> &mut FrameReader<S> {
        &mut self.reader
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Decodes a frame and dispatches the values that changed. Returns the number of
    /// dispatches.
    ///
    /// Groups failing their checksum are dropped one by one; they never reach the registry.
    pub async fn process_frame(&mut self, frame: &TicFrame) -> usize {
        let mut dispatched = 0;
        self.stats.frames += 1;

        for group in frame.groups() {
            self.stats.groups += 1;

            if let Err(e) = verify_group(&group) {
                self.stats.checksum_errors += 1;
                debug!(
                    "Dropping group {}: {e}",
                    String::from_utf8_lossy(group.tag)
                );
                continue;
            }

            let update = match self.registry.process(group.tag, group.data) {
                Detection::Changed(update) => update,
                Detection::Unchanged => continue,
                Detection::Unknown => {
                    self.stats.unknown_tags += 1;
                    continue;
                }
            };

            let field = &update.descriptor;
            debug!("{}={} {}", field.tag, update.value, field.unit);
            if let Err(e) = self.sink.publish(field, &update.value).await {
                self.stats.publish_errors += 1;
                error!("{e}");
            }
            self.stats.dispatches += 1;
            dispatched += 1;
        }

        dispatched
    }

    /// Reads and processes one frame.
    ///
    /// Timeouts and overlong frames are counted and reported as zero dispatches; only a
    /// failure of the byte source itself is returned.
    pub async fn run_once(&mut self) -> Result<usize, TicError> {
        match self.reader.read_frame().await {
            Ok(frame) => Ok(self.process_frame(&frame).await),
            Err(e) if e.is_recoverable() => {
                match e {
                    TicError::FrameStartTimeout => self.stats.start_timeouts += 1,
                    TicError::FrameEndTimeout => self.stats.end_timeouts += 1,
                    TicError::FrameTooLong { .. } => self.stats.overlong_frames += 1,
                    _ => {}
                }
                warn!("{e}");
                Ok(0)
            }
            Err(e) => Err(e),
        }
    }

    /// Processes frames until the byte source fails.
    pub async fn run(&mut self) -> Result<(), TicError> {
        loop {
            self.run_once().await?;
        }
    }

    /// Closes the sink and hands back the final counters. The byte source is dropped.
    pub async fn shutdown(mut self) -> Result<BridgeStats, TicError> {
        self.sink.close().await?;
        Ok(self.stats)
    }
}
