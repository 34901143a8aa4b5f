//! Output sinks owned by each channel.
//!
//! The decode core never looks anything up ambiently; the sinks a channel
//! writes to are handed to it explicitly when the context is built.

use std::sync::Mutex;

use crate::feed::StreamMetrics;

/// Receives a channel's transcript text in strict arrival order.
pub trait TranscriptSink: Send + Sync {
    /// Appends one unit of text (a content delta, echo, or error notice).
    fn append(&self, text: &str);
    /// Discards all accumulated text.
    fn clear(&self);
}

/// Receives a channel's terminal metrics record.
pub trait MetricsPanel: Send + Sync {
    /// Replaces the panel contents with the given record.
    fn show(&self, metrics: &StreamMetrics);
    /// Discards the currently shown record.
    fn clear(&self);
}

/// In-memory transcript, usable from tests and terminal front-ends.
#[derive(Default)]
pub struct TranscriptBuffer {
    inner: Mutex<String>,
}

impl TranscriptBuffer {
    /// Creates an empty transcript buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the accumulated transcript text.
    pub fn contents(&self) -> String {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl TranscriptSink for TranscriptBuffer {
    fn append(&self, text: &str) {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_str(text);
    }

    fn clear(&self) {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

/// In-memory metrics panel holding the latest record.
#[derive(Default)]
pub struct MetricsCell {
    inner: Mutex<Option<StreamMetrics>>,
}

impl MetricsCell {
    /// Creates an empty metrics cell.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the most recently shown record, if any.
    pub fn latest(&self) -> Option<StreamMetrics> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl MetricsPanel for MetricsCell {
    fn show(&self, metrics: &StreamMetrics) {
        *self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(metrics.clone());
    }

    fn clear(&self) {
        *self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }
}
