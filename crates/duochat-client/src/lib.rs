//! Client for a dual-chatbot streaming chat server.
//!
//! The server answers each message with a `text/event-stream`-shaped feed of
//! `data:`-prefixed JSON lines: zero or more incremental content deltas
//! followed by one terminal `timings` metrics record. This crate decodes that
//! feed incrementally and can drive one or two such streams concurrently
//! while keeping their outputs, errors, and settlement fully isolated.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use duochat_client::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), ClientError> {
//! let config = ClientConfig::new("http://localhost:5000", "csrf-token");
//! let transport = Arc::new(HttpTransport::new(config)?);
//!
//! let plain = Arc::new(TranscriptBuffer::new());
//! let augmented = Arc::new(TranscriptBuffer::new());
//!
//! let context = ChatContext::builder()
//!     .transport(transport)
//!     .channel(ChannelConfig::new(1), plain.clone(), Arc::new(MetricsCell::new()))
//!     .channel(
//!         ChannelConfig::new(2).extra_field("use_rag", serde_json::Value::Bool(true)),
//!         augmented.clone(),
//!         Arc::new(MetricsCell::new()),
//!     )
//!     .build()?;
//!
//! let outcomes = context.send_message("What is in the knowledge base?").await?;
//! println!("plain bot said: {}", plain.contents());
//! println!("all completed: {}", outcomes.all_completed());
//! # Ok(())
//! # }
//! ```

/// Deterministic JSON encoding for request bodies.
pub mod canonical;
/// Channel decode loop and per-channel configuration.
pub mod channel;
/// Client configuration shared by the streaming and upload endpoints.
pub mod config;
/// Public error types.
pub mod errors;
/// Typed feed payloads and frame classification.
pub mod feed;
/// Line-frame splitter for the streaming feed.
pub mod frame;
/// Dual-channel orchestration and settlement.
pub mod orchestrator;
/// Common imports for typical usage.
pub mod prelude;
/// Output sinks owned by each channel.
pub mod sink;
/// Transport seam and HTTP implementation.
pub mod transport;
/// Document upload collaborator.
pub mod upload;

pub use canonical::{canonical_body, to_canonical_string};
pub use channel::{ChannelConfig, ChannelReport, ChannelState, ChatChannel};
pub use config::ClientConfig;
pub use errors::{ChannelFailure, ClientError, TransportError};
pub use feed::{FeedEvent, StreamMetrics, classify};
pub use frame::FeedDecoder;
pub use orchestrator::{ChatContext, ChatContextBuilder, OutcomeSet};
pub use sink::{MetricsCell, MetricsPanel, TranscriptBuffer, TranscriptSink};
pub use transport::{ByteStream, ChatTransport, HttpTransport, StreamRequest};
pub use upload::{DocumentUpload, PDF_MIME, UploadClient, UploadResponse};
