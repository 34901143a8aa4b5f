//! Typed feed payloads and frame classification.

use std::fmt;

use serde::Deserialize;
use tracing::warn;

/// Terminal per-channel performance summary reported by the server.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct StreamMetrics {
    /// Total prediction latency in milliseconds.
    pub predicted_ms: f64,
    /// Per-token latency in milliseconds.
    pub predicted_per_token_ms: f64,
    /// Tokens per second.
    pub predicted_per_second: f64,
    /// Generated token count.
    pub predicted_n: u64,
}

impl StreamMetrics {
    /// Total prediction time in seconds.
    pub fn prediction_seconds(&self) -> f64 {
        self.predicted_ms / 1000.0
    }
}

impl fmt::Display for StreamMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Latency: {:.2} ms | Throughput: {:.2}",
            self.predicted_per_token_ms, self.predicted_per_second
        )?;
        writeln!(f, "Output tokens: {}", self.predicted_n)?;
        write!(f, "Prediction time: {:.2} seconds", self.prediction_seconds())
    }
}

/// One classified frame of the feed.
#[derive(Clone, Debug, PartialEq)]
pub enum FeedEvent {
    /// Incremental unit of generated text.
    Content(String),
    /// Terminal metrics record; ends the channel's decode loop.
    Metrics(StreamMetrics),
}

#[derive(Deserialize)]
struct FeedPayload {
    content: Option<String>,
    // Termination predicate: presence of `timings` alone. One upstream
    // variant also sends a `stop` flag on the same record; it carries no
    // extra information and is ignored with the rest of the unknown fields.
    timings: Option<StreamMetrics>,
}

/// Classifies one frame payload.
///
/// Priority order: a `timings` field makes the frame a terminal
/// [`FeedEvent::Metrics`]; otherwise a non-empty `content` field makes it a
/// [`FeedEvent::Content`]; anything else is ignored. Malformed JSON is
/// dropped with a warning — a single bad frame never ends the channel.
pub fn classify(payload: &str) -> Option<FeedEvent> {
    let parsed: FeedPayload = match serde_json::from_str(payload) {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!(%err, "dropping malformed feed frame");
            return None;
        }
    };
    if let Some(timings) = parsed.timings {
        return Some(FeedEvent::Metrics(timings));
    }
    parsed
        .content
        .filter(|content| !content.is_empty())
        .map(FeedEvent::Content)
}
