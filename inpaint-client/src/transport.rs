//! Upload transport for the inpainting service.
//!
//! Bundles the original image and the encoded mask into one multipart
//! request, sends it once, and interprets the JSON response. The HTTP layer
//! sits behind [`HttpTransport`] so tests can substitute it.

use std::sync::Arc;

use async_trait::async_trait;
use inpaint_core::{SourceImage, UploadResult};
use inpaint_renderer::{MaskArtifact, RenderError};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use url::Url;

/// Path appended to the configured base URL.
pub const UPLOAD_PATH: &str = "upload/";
/// Text sent in the `description` field.
pub const DEFAULT_DESCRIPTION: &str = "Example inpainting image";

/// Errors that can occur while exporting and uploading a mask.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The configured base URL is invalid.
    #[error("invalid upload base URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed (connection, timeout, etc.).
    #[error("upload HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Response body was not the expected JSON.
    #[error("failed to parse upload response: {0}")]
    Json(#[from] serde_json::Error),
    /// The service answered with a non-2xx status.
    #[error("upload rejected with HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, lossily decoded as text.
        body: String,
    },
    /// The response parsed but did not match the expected structure.
    #[error("unexpected upload response: {0}")]
    UnexpectedResponse(String),
    /// Mask encoding failed before anything was sent.
    #[error("mask export failed: {0}")]
    Encode(#[from] RenderError),
}

impl UploadError {
    /// HTTP status of a rejected upload, if that is what happened.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A file attached to the multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// File name reported to the server.
    pub file_name: String,
    /// MIME type.
    pub mime: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// The three fields of an upload request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadForm {
    /// `original_image`: the user's file as selected.
    pub original_image: FilePart,
    /// `mask_image`: the encoded mask, always `mask.png`.
    pub mask_image: FilePart,
    /// `description`: fixed text.
    pub description: String,
}

impl UploadForm {
    /// Multipart field names, in send order.
    pub const FIELD_NAMES: [&'static str; 3] = ["original_image", "mask_image", "description"];

    /// Assemble a form, consuming the mask artifact.
    #[must_use]
    pub fn new(source: &SourceImage, mask: MaskArtifact, description: &str) -> Self {
        let mask_image = FilePart {
            file_name: mask.file_name().to_string(),
            mime: mask.mime().to_string(),
            bytes: mask.into_bytes(),
        };

        Self {
            original_image: FilePart {
                file_name: source.file_name().to_string(),
                mime: source.mime().to_string(),
                bytes: source.bytes().to_vec(),
            },
            mask_image,
            description: description.to_string(),
        }
    }
}

/// Status and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Whether the status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound HTTP capability used by [`Uploader`].
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST `form` as `multipart/form-data` to `url`.
    ///
    /// Implementations send exactly one request and never retry. Non-2xx
    /// responses are returned, not turned into errors.
    async fn post_multipart(&self, url: &Url, form: UploadForm) -> Result<HttpResponse, UploadError>;
}

/// [`HttpTransport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Create a transport with a fresh HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::Http`] if the HTTP client fails to build.
    pub fn new() -> Result<Self, UploadError> {
        let http = Client::builder()
            .user_agent(concat!("inpaint-mask/", env!("CARGO_PKG_VERSION")))
            // Disable proxy detection to avoid macOS system-configuration panic
            .no_proxy()
            .build()?;
        Ok(Self { http })
    }

    fn file_part(file: FilePart) -> Result<Part, UploadError> {
        Ok(Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.mime)?)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_multipart(&self, url: &Url, form: UploadForm) -> Result<HttpResponse, UploadError> {
        let [original_field, mask_field, description_field] = UploadForm::FIELD_NAMES;
        let body = Form::new()
            .part(original_field, Self::file_part(form.original_image)?)
            .part(mask_field, Self::file_part(form.mask_image)?)
            .text(description_field, form.description);

        let response = self.http.post(url.clone()).multipart(body).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse { status, body })
    }
}

/// Build `{base_url}upload/`.
///
/// A missing trailing slash on `base_url` is added so the path
/// concatenates cleanly.
///
/// # Errors
///
/// Returns [`UploadError::InvalidUrl`] if the result is not an absolute
/// http(s) URL.
pub fn upload_endpoint(base_url: &str) -> Result<Url, UploadError> {
    let base_url = base_url.trim();
    let endpoint = if base_url.ends_with('/') {
        format!("{base_url}{UPLOAD_PATH}")
    } else {
        tracing::warn!("Base URL {base_url} has no trailing slash; appending one");
        format!("{base_url}/{UPLOAD_PATH}")
    };

    let url = Url::parse(&endpoint).map_err(|e| UploadError::InvalidUrl(format!("{endpoint}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(UploadError::InvalidUrl(format!(
            "{endpoint}: unsupported scheme {}",
            url.scheme()
        )));
    }
    Ok(url)
}

/// Sends image/mask pairs to the inpainting service.
pub struct Uploader<T> {
    inner: Arc<InnerUploader<T>>,
}

struct InnerUploader<T> {
    transport: T,
    endpoint: Url,
    description: String,
}

impl<T> Clone for Uploader<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: HttpTransport> Uploader<T> {
    /// Create an uploader for `base_url` using the given transport.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::InvalidUrl`] if the URL is malformed.
    pub fn new(base_url: &str, transport: T) -> Result<Self, UploadError> {
        Self::with_description(base_url, transport, DEFAULT_DESCRIPTION)
    }

    /// Create an uploader that sends a custom `description`.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::InvalidUrl`] if the URL is malformed.
    pub fn with_description(
        base_url: &str,
        transport: T,
        description: &str,
    ) -> Result<Self, UploadError> {
        let endpoint = upload_endpoint(base_url)?;
        Ok(Self {
            inner: Arc::new(InnerUploader {
                transport,
                endpoint,
                description: description.to_string(),
            }),
        })
    }

    /// The full upload URL.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// The description sent with every upload.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.inner.description
    }

    /// Upload `source` with its mask. Exactly one request is sent.
    ///
    /// The mask artifact is consumed; it does not outlive the request.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, a non-2xx status, or a response
    /// body that is not `{"data": {...}}` with both URLs.
    pub async fn upload(
        &self,
        source: &SourceImage,
        mask: MaskArtifact,
    ) -> Result<UploadResult, UploadError> {
        let form = UploadForm::new(source, mask, &self.inner.description);
        tracing::debug!(
            "POST {} ({} + {} bytes)",
            self.inner.endpoint,
            form.original_image.bytes.len(),
            form.mask_image.bytes.len()
        );

        let response = self
            .inner
            .transport
            .post_multipart(&self.inner.endpoint, form)
            .await?;

        Self::interpret(&response)
    }

    fn interpret(response: &HttpResponse) -> Result<UploadResult, UploadError> {
        if !response.is_success() {
            return Err(UploadError::Status {
                status: response.status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }

        let payload: Value = serde_json::from_slice(&response.body)?;
        let data = payload.get("data").cloned().ok_or_else(|| {
            UploadError::UnexpectedResponse("response did not contain a data object".to_string())
        })?;

        Ok(serde_json::from_value(data)?)
    }
}
