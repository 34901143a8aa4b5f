//! Transport seam between the decode loops and the network.

use std::pin::Pin;

use bytes::Bytes;
use futures::TryStreamExt as _;
use tracing::debug;

use crate::canonical::canonical_body;
use crate::config::ClientConfig;
use crate::errors::{ClientError, TransportError};

pub(crate) const CSRF_HEADER: &str = "X-CSRFToken";

/// Raw chunk stream handed to a channel decode loop.
pub type ByteStream =
    Pin<Box<dyn futures::Stream<Item = Result<Bytes, TransportError>> + Send + 'static>>;

/// Outgoing request body for one channel's stream.
#[derive(Clone, Debug, serde::Serialize)]
pub struct StreamRequest {
    /// The user's message.
    pub message: String,
    /// Channel identity (1 or 2).
    pub bot_id: u8,
    /// Deployment-variant fields merged into the body, for example
    /// `use_rag: true` for the augmented channel.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl StreamRequest {
    /// Canonical body text for this request (stable key ordering).
    pub fn body(&self) -> Result<String, ClientError> {
        canonical_body(self)
    }
}

/// Opens one byte stream per request.
///
/// The production implementation is [`HttpTransport`]; tests substitute fakes
/// built from in-memory chunk sequences.
#[async_trait::async_trait]
pub trait ChatTransport: Send + Sync {
    /// Sends the request and returns the response byte stream.
    async fn open_stream(&self, req: &StreamRequest) -> Result<ByteStream, TransportError>;
}

/// HTTP transport POSTing to the chat server's `/stream` endpoint.
pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    /// Creates a transport from explicit client configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }
}

#[async_trait::async_trait]
impl ChatTransport for HttpTransport {
    async fn open_stream(&self, req: &StreamRequest) -> Result<ByteStream, TransportError> {
        let body = req
            .body()
            .map_err(|e| TransportError::Config(e.to_string()))?;
        debug!(bot_id = req.bot_id, "opening chat stream");

        let response = self
            .client
            .post(self.config.stream_url())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(CSRF_HEADER, &self.config.csrf_token)
            .body(body)
            .send()
            .await
            .map_err(|e| TransportError::Io(format!("stream request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(TransportError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let stream = response
            .bytes_stream()
            .map_err(|e| TransportError::Io(format!("stream read failed: {e}")));
        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_is_canonical() {
        let req = StreamRequest {
            message: "hi".into(),
            bot_id: 2,
            extra: serde_json::Map::new(),
        };
        assert_eq!(req.body().expect("body"), r#"{"bot_id":2,"message":"hi"}"#);
    }

    #[test]
    fn extra_fields_are_flattened_into_the_body() {
        let mut extra = serde_json::Map::new();
        extra.insert("use_rag".into(), json!(true));
        let req = StreamRequest {
            message: "hi".into(),
            bot_id: 2,
            extra,
        };
        assert_eq!(
            req.body().expect("body"),
            r#"{"bot_id":2,"message":"hi","use_rag":true}"#
        );
    }
}
