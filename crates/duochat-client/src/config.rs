use std::time::Duration;

/// Configuration shared by the streaming and upload clients.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the chat server.
    pub base_url: String,
    /// CSRF token sent as `X-CSRFToken` on every request.
    ///
    /// Read once at construction; the server publishes it out of band (the
    /// browser front-end reads it from a page-level meta tag).
    pub csrf_token: String,
    /// Optional overall timeout per HTTP exchange.
    ///
    /// Applies to the whole request including the streamed body, so leave it
    /// unset for long-running generations. There is no per-read timeout: a
    /// hung transport read suspends its channel indefinitely.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Creates a config for the given server base URL and CSRF token.
    pub fn new(base_url: impl Into<String>, csrf_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            csrf_token: csrf_token.into(),
            timeout: None,
        }
    }

    /// Sets an overall per-exchange timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub(crate) fn stream_url(&self) -> String {
        format!("{}/stream", self.base_url.trim_end_matches('/'))
    }

    pub(crate) fn upload_url(&self) -> String {
        format!("{}/upload", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_tolerate_trailing_slash() {
        let config = ClientConfig::new("http://localhost:5000/", "tok");
        assert_eq!(config.stream_url(), "http://localhost:5000/stream");
        assert_eq!(config.upload_url(), "http://localhost:5000/upload");
    }
}
