//! Document upload collaborator.
//!
//! Entirely outside the decode core: a single multipart POST to `/upload`,
//! gated client-side to PDF documents before any network call.

use tracing::debug;

use crate::config::ClientConfig;
use crate::errors::ClientError;
use crate::transport::CSRF_HEADER;

/// The only MIME type accepted for upload.
pub const PDF_MIME: &str = "application/pdf";

/// A document selected for upload.
#[derive(Clone, Debug)]
pub struct DocumentUpload {
    /// File name reported to the server.
    pub file_name: String,
    /// MIME type of the document; must be [`PDF_MIME`].
    pub mime_type: String,
    /// Raw document bytes.
    pub bytes: Vec<u8>,
}

/// Server response to an upload.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
pub struct UploadResponse {
    /// Whether the server accepted the document.
    pub success: bool,
    /// Optional status message, present on failure.
    #[serde(default)]
    pub message: Option<String>,
}

/// Client for the upload endpoint.
pub struct UploadClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl UploadClient {
    /// Creates an upload client from explicit configuration.
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

    /// Uploads one document.
    ///
    /// Non-PDF documents are rejected before any network activity. There is
    /// no retry; a transport or server failure surfaces as a single
    /// [`ClientError::Upload`].
    pub async fn upload_document(
        &self,
        upload: DocumentUpload,
    ) -> Result<UploadResponse, ClientError> {
        if upload.mime_type != PDF_MIME {
            return Err(ClientError::Validation(format!(
                "only PDF uploads are accepted, got {}",
                upload.mime_type
            )));
        }
        debug!(file_name = %upload.file_name, size = upload.bytes.len(), "uploading document");

        let part = reqwest::multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(PDF_MIME)
            .map_err(|e| ClientError::Upload(format!("invalid upload part: {e}")))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.config.upload_url())
            .header(CSRF_HEADER, &self.config.csrf_token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClientError::Upload(format!("upload request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Upload(format!(
                "upload failed with status {status}"
            )));
        }
        response
            .json::<UploadResponse>()
            .await
            .map_err(|e| ClientError::Upload(format!("invalid upload response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn non_pdf_is_rejected_before_any_network_call() {
        // Config points nowhere; validation must fire first.
        let client =
            UploadClient::new(ClientConfig::new("http://invalid.localdomain", "tok")).expect("client");
        let err = client
            .upload_document(DocumentUpload {
                file_name: "notes.txt".into(),
                mime_type: "text/plain".into(),
                bytes: b"hello".to_vec(),
            })
            .await
            .expect_err("rejected");
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[test]
    fn upload_response_decodes_with_and_without_message() {
        let ok: UploadResponse = serde_json::from_str(r#"{"success":true}"#).expect("decode");
        assert_eq!(
            ok,
            UploadResponse {
                success: true,
                message: None
            }
        );
        let failed: UploadResponse =
            serde_json::from_str(r#"{"success":false,"message":"too large"}"#).expect("decode");
        assert_eq!(failed.message.as_deref(), Some("too large"));
    }
}
