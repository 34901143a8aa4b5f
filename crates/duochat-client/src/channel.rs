//! Channel decode loop.
//!
//! One loop drives one network stream end-to-end: read chunks, split frames,
//! classify payloads, forward content to the transcript, stop on the terminal
//! metrics record. The single-bot, dual-bot, and augmented deployment
//! variants all instantiate the same loop with a different [`ChannelConfig`].

use std::sync::Arc;

use futures::StreamExt as _;
use tracing::debug;

use crate::errors::{ChannelFailure, TransportError};
use crate::feed::{FeedEvent, StreamMetrics, classify};
use crate::frame::FeedDecoder;
use crate::sink::{MetricsPanel, TranscriptSink};
use crate::transport::{ChatTransport, StreamRequest};

/// Synthetic notice appended to a transcript when its transport fails.
const TRANSPORT_ERROR_NOTICE: &str = "\nError: failed to get response\n";

/// Per-channel parametrization of the decode loop.
#[derive(Clone, Debug, Default)]
pub struct ChannelConfig {
    /// Channel identity, sent as `bot_id` (1 or 2).
    pub channel_id: u8,
    /// Extra fields merged into the request body for this channel.
    pub extra_request_fields: serde_json::Map<String, serde_json::Value>,
}

impl ChannelConfig {
    /// Creates a config for the given channel id.
    pub fn new(channel_id: u8) -> Self {
        Self {
            channel_id,
            extra_request_fields: serde_json::Map::new(),
        }
    }

    /// Adds an extra request body field, for example `use_rag: true`.
    pub fn extra_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra_request_fields.insert(key.into(), value);
        self
    }
}

/// Lifecycle states of one channel's decode loop.
///
/// `Completed` and `Failed` are terminal; no transition skips `Streaming`
/// except a transport fault while opening the stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelState {
    Idle,
    Sending,
    Streaming,
    Completed,
    Failed,
}

/// Successful settlement of one channel.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelReport {
    /// Channel this report belongs to.
    pub channel_id: u8,
    /// Terminal metrics, or `None` when the stream closed cleanly without a
    /// metrics record (a valid outcome, for example an empty response).
    pub metrics: Option<StreamMetrics>,
}

/// One logical conversation stream bound to its own sinks.
pub struct ChatChannel {
    config: ChannelConfig,
    transcript: Arc<dyn TranscriptSink>,
    metrics: Arc<dyn MetricsPanel>,
}

impl ChatChannel {
    /// Binds a channel config to its transcript and metrics sinks.
    pub fn new(
        config: ChannelConfig,
        transcript: Arc<dyn TranscriptSink>,
        metrics: Arc<dyn MetricsPanel>,
    ) -> Self {
        Self {
            config,
            transcript,
            metrics,
        }
    }

    /// Returns this channel's id.
    pub fn channel_id(&self) -> u8 {
        self.config.channel_id
    }

    pub(crate) fn clear(&self) {
        self.transcript.clear();
        self.metrics.clear();
    }

    pub(crate) fn echo_user(&self, message: &str) {
        self.transcript.append(&format!("You: {message}\n"));
    }

    fn request_for(&self, message: &str) -> StreamRequest {
        StreamRequest {
            message: message.to_string(),
            bot_id: self.config.channel_id,
            extra: self.config.extra_request_fields.clone(),
        }
    }

    fn transition(&self, state: ChannelState) {
        debug!(channel = self.config.channel_id, state = ?state, "channel state");
    }

    fn fail(&self, error: TransportError) -> ChannelFailure {
        // Partial output already in the transcript is preserved.
        self.transcript.append(TRANSPORT_ERROR_NOTICE);
        self.transition(ChannelState::Failed);
        ChannelFailure {
            channel_id: self.config.channel_id,
            error,
        }
    }

    /// Runs the decode loop to settlement.
    ///
    /// Exits when a metrics record is classified (remaining transport bytes
    /// are intentionally abandoned; the metrics record is by protocol
    /// convention the single final frame, and dropping the stream handle
    /// closes the underlying connection), when the transport completes with
    /// no further bytes, or when the transport faults.
    pub async fn run(
        &self,
        transport: &dyn ChatTransport,
        message: &str,
    ) -> Result<ChannelReport, ChannelFailure> {
        let channel_id = self.config.channel_id;
        let request = self.request_for(message);

        self.transition(ChannelState::Sending);
        let mut stream = match transport.open_stream(&request).await {
            Ok(stream) => stream,
            Err(error) => return Err(self.fail(error)),
        };
        self.transition(ChannelState::Streaming);

        let mut decoder = FeedDecoder::default();
        while let Some(next) = stream.next().await {
            let chunk = match next {
                Ok(chunk) => chunk,
                Err(error) => return Err(self.fail(error)),
            };
            for payload in decoder.push_chunk(&chunk) {
                match classify(&payload) {
                    Some(FeedEvent::Content(text)) => {
                        debug!(channel = channel_id, len = text.len(), "content delta");
                        self.transcript.append(&text);
                    }
                    Some(FeedEvent::Metrics(metrics)) => {
                        self.metrics.show(&metrics);
                        self.transition(ChannelState::Completed);
                        return Ok(ChannelReport {
                            channel_id,
                            metrics: Some(metrics),
                        });
                    }
                    None => {}
                }
            }
        }

        // Clean close without a metrics record is a valid completion.
        self.transition(ChannelState::Completed);
        Ok(ChannelReport {
            channel_id,
            metrics: None,
        })
    }
}
