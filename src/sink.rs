//! # Dispatch Sinks
//!
//! Receivers of changed field values. The bridge treats a publication as fire-and-forget:
//! a failing sink is logged and never stops frame processing.

use crate::error::TicError;
use crate::logging::log_error;
use crate::tic::fields::FieldDescriptor;
use std::sync::{Arc, Mutex};

/// Trait for consumers of changed field values
#[async_trait::async_trait]
pub trait DispatchSink: Send {
    async fn publish(&mut self, field: &FieldDescriptor, value: &str) -> Result<(), TicError>;

    /// Best-effort goodbye before the process exits.
    async fn close(&mut self) -> Result<(), TicError> {
        Ok(())
    }
}

#[async_trait::async_trait]
impl<K: DispatchSink + ?Sized> DispatchSink for Box<K> {
    async fn publish(&mut self, field: &FieldDescriptor, value: &str) -> Result<(), TicError> {
        (**self).publish(field, value).await
    }

    async fn close(&mut self) -> Result<(), TicError> {
        (**self).close().await
    }
}

/// Closes `sink`, logging a failure instead of returning it. Returns true on a clean close.
pub async fn close_sink<K: DispatchSink + ?Sized>(sink: &mut K) -> bool {
    match sink.close().await {
        Ok(()) => true,
        Err(e) => {
            log_error(&format!("Cannot close sink: {e}"));
            false
        }
    }
}

/// In-memory sink keeping every (tag, value) it receives.
///
/// Clones share the same record, so a test can keep one while the bridge owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    published: Arc<Mutex<Vec<(String, String)>>>,
    closed: Arc<Mutex<bool>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<(String, String)> {
        self.published
            .lock()
            .map(|p| p.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Drains the record.
    pub fn take(&self) -> Vec<(String, String)> {
        match self.published.lock() {
            Ok(mut p) => std::mem::take(&mut *p),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.lock().map(|c| *c).unwrap_or(false)
    }
}

#[async_trait::async_trait]
impl DispatchSink for RecordingSink {
    async fn publish(&mut self, field: &FieldDescriptor, value: &str) -> Result<(), TicError> {
        self.published
            .lock()
            .map_err(|_| TicError::Other("recording sink poisoned".into()))?
            .push((field.tag.clone(), value.to_string()));
        Ok(())
    }

    async fn close(&mut self) -> Result<(), TicError> {
        if let Ok(mut closed) = self.closed.lock() {
            *closed = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenSink;

    #[async_trait::async_trait]
    impl DispatchSink for BrokenSink {
        async fn publish(&mut self, _: &FieldDescriptor, _: &str) -> Result<(), TicError> {
            Ok(())
        }

        async fn close(&mut self) -> Result<(), TicError> {
            Err(TicError::BrokerError("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn test_close_sink_reports_failure() {
        assert!(!close_sink(&mut BrokenSink).await);

        let mut sink = RecordingSink::new();
        assert!(close_sink(&mut sink).await);
        assert!(sink.is_closed());
    }
}
