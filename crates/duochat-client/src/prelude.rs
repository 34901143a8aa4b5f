//! Common imports for typical client usage.
//!
//! This module intentionally exports the most frequently used builder/runtime
//! types so examples and application code need fewer import lines.
pub use crate::{
    ChannelConfig, ChannelFailure, ChannelReport, ChatContext, ChatTransport, ClientConfig,
    ClientError, HttpTransport, MetricsCell, MetricsPanel, OutcomeSet, StreamMetrics,
    TranscriptBuffer, TranscriptSink, UploadClient,
};
