/// Errors raised by a transport while opening or reading a stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Endpoint answered with a non-success status before streaming began.
    #[error("stream request failed with status {status}: {body}")]
    Http { status: u16, body: String },
    /// Connection or read-level I/O failure.
    #[error("transport I/O error: {0}")]
    Io(String),
    /// Request could not be constructed.
    #[error("transport config error: {0}")]
    Config(String),
}

/// Terminal failure of a single channel's decode loop.
///
/// A failed channel never affects its sibling; the orchestrator records the
/// failure in the [`OutcomeSet`](crate::orchestrator::OutcomeSet) and moves on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("channel {channel_id} failed: {error}")]
pub struct ChannelFailure {
    /// Channel the failure belongs to.
    pub channel_id: u8,
    /// Underlying transport fault.
    #[source]
    pub error: TransportError,
}

/// Top-level error type for the public client API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Invalid client or context configuration.
    #[error("config error: {0}")]
    Config(String),
    /// Invalid user input, rejected before any network activity.
    #[error("validation error: {0}")]
    Validation(String),
    /// A send is already in flight on this context.
    #[error("a send is already in flight")]
    Busy,
    /// Outgoing request body could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// Document upload failed after validation.
    #[error("upload error: {0}")]
    Upload(String),
    /// Transport error surfaced outside a channel decode loop.
    #[error(transparent)]
    Transport(#[from] TransportError),
}
