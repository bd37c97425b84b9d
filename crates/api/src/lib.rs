//! Generation service client.
//!
//! This crate talks to the remote cover-letter generation service. It focuses on:
//!
//! - Constructing an HTTP client with sensible defaults
//! - Validating the configured endpoint URL
//! - Encoding a [`GenerationRequest`] as a multipart body
//! - Branching on the response status before decoding the body
//!
//! The protocol convention is "success is a binary PDF; failure is JSON". The
//! body is always read as raw bytes, and only a non-2xx status causes it to be
//! reinterpreted as a JSON error document (see [`response::decode_error_body`]).
//!
//! # Example
//!
//! ```ignore
//! use coverletter_api::{GenerationClient, GenerationService};
//!
//! async fn run(request: coverletter_types::GenerationRequest) -> anyhow::Result<()> {
//!     let client = GenerationClient::new("http://localhost:8000/generate")?;
//!     let pdf = client.generate(request).await?;
//!     println!("received {} bytes", pdf.bytes.len());
//!     Ok(())
//! }
//! ```

pub mod response;

use std::env;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use coverletter_types::{GeneratedPdf, GenerationRequest, SubmitError};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, header};
use tracing::{debug, warn};
use url::Url;

pub use coverletter_types::DEFAULT_ENDPOINT;
pub use response::decode_error_body;

const PDF_MIME: &str = "application/pdf";
/// Hostnames treated as local development servers.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1", "::1", "[::1]"];

/// Anything able to turn a [`GenerationRequest`] into a PDF.
///
/// The submission workflow depends on this trait rather than on
/// [`GenerationClient`] directly so it can run against in-memory fakes.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<GeneratedPdf, SubmitError>;
}

/// Thin wrapper around a configured `reqwest::Client` for the generation endpoint.
///
/// No overall request timeout is configured: generation may legitimately take
/// a long time. Only the connection attempt is bounded, so an unreachable
/// host settles as [`SubmitError::Connectivity`].
#[derive(Debug, Clone)]
pub struct GenerationClient {
    endpoint: Url,
    http: Client,
    user_agent: String,
}

impl GenerationClient {
    /// Builds a client for the given endpoint after validating it.
    pub fn new(endpoint: &str) -> Result<Self> {
        let endpoint = validate_endpoint(endpoint)?;

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/pdf, application/json"),
        );

        let http = Client::builder()
            .default_headers(default_headers)
            .connect_timeout(Duration::from_secs(30))
            .build()
            .context("build http client")?;

        Ok(Self {
            endpoint,
            http,
            user_agent: format!("coverletter/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }
}

#[async_trait]
impl GenerationService for GenerationClient {
    async fn generate(&self, request: GenerationRequest) -> Result<GeneratedPdf, SubmitError> {
        let mode = request.mode;
        let form = build_multipart(request)
            .map_err(|error| SubmitError::validation(format!("Could not attach the resume: {error}")))?;
        debug!(endpoint = %self.endpoint, use_ai = mode.as_flag(), "sending generation request");

        let response = match self
            .http
            .post(self.endpoint.clone())
            .header(header::USER_AGENT, &self.user_agent)
            .multipart(form)
            .send()
            .await
        {
            Ok(response) => response,
            Err(error) => {
                warn!(endpoint = %self.endpoint, error = %error, "generation request failed without a response");
                return Err(SubmitError::Connectivity);
            }
        };

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let body = response.bytes().await;
        if status.is_success() {
            let bytes = body.map_err(|error| {
                warn!(%status, error = %error, "generation response body was interrupted");
                SubmitError::Connectivity
            })?;
            if content_type.as_deref().is_some_and(|value| !value.starts_with(PDF_MIME)) {
                warn!(?content_type, "generation service returned a non-PDF content type on success");
            }
            debug!(%status, len = bytes.len(), "received generated PDF");
            return Ok(GeneratedPdf {
                bytes: bytes.to_vec(),
                content_type,
            });
        }

        let error = match body {
            Ok(bytes) => decode_error_body(&bytes),
            Err(error) => {
                warn!(%status, error = %error, "failed to read error body");
                SubmitError::Parse
            }
        };
        warn!(%status, message = %error, "generation service rejected the request");
        Err(error)
    }
}

/// Encodes the request as `multipart/form-data`.
///
/// Text fields keep their order; the resume part (when present) and the
/// `use_ai` flag follow them.
pub fn build_multipart(request: GenerationRequest) -> Result<Form, reqwest::Error> {
    let mut form = Form::new();
    for field in request.fields {
        form = form.text(field.name, field.value);
    }
    if let Some(resume) = request.resume {
        let part = Part::bytes(resume.bytes).file_name(resume.file_name).mime_str(PDF_MIME)?;
        form = form.part("resume", part);
    }
    Ok(form.text("use_ai", request.mode.as_flag()))
}

/// Validate that an endpoint URL is acceptable for use by the client.
///
/// Rules:
/// - the scheme must be `http` or `https`
/// - a host is required
/// - plain `http` to a non-local host is accepted but logged
fn validate_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint.trim()).map_err(|e| anyhow!("Invalid generation endpoint '{}': {}", endpoint, e))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(anyhow!(
            "Generation endpoint must use http or https; got '{}://'",
            url.scheme()
        ));
    }

    let host = url
        .host_str()
        .ok_or_else(|| anyhow!("Generation endpoint '{}' must include a host", endpoint))?;

    let is_local = LOCALHOST_DOMAINS.iter().any(|&local| host.eq_ignore_ascii_case(local));
    if url.scheme() == "http" && !is_local {
        warn!(%host, "generation endpoint uses plain http for a non-local host");
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coverletter_types::{ContentMode, FormField, ResumeAttachment, SERVER_FALLBACK_MESSAGE};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn field(name: &'static str, value: &str) -> FormField {
        FormField {
            name,
            value: value.to_string(),
        }
    }

    fn ai_request() -> GenerationRequest {
        GenerationRequest {
            fields: vec![
                field("name", "Ada Lovelace"),
                field("email", "ada@example.com"),
                field("phone", "555-0100"),
                field("employer", "Analytical Engines Ltd"),
                field("job_title", "Senior Engineer"),
                field("job_description", "Senior Engineer role..."),
            ],
            resume: Some(ResumeAttachment {
                file_name: "resume.pdf".into(),
                bytes: b"%PDF-1.4 resume".to_vec(),
            }),
            mode: ContentMode::Ai,
        }
    }

    async fn client_for(server: &MockServer) -> GenerationClient {
        GenerationClient::new(&format!("{}/generate", server.uri())).expect("valid endpoint")
    }

    #[test]
    fn endpoint_validation_rejects_unsupported_schemes() {
        assert!(validate_endpoint("http://localhost:8000/generate").is_ok());
        assert!(validate_endpoint("https://letters.example.com/generate").is_ok());
        assert!(validate_endpoint("ftp://localhost/generate").is_err());
        assert!(validate_endpoint("not a url").is_err());
    }

    #[tokio::test]
    async fn success_returns_raw_pdf_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/pdf")
                    .set_body_bytes(b"%PDF-1.7 letter".to_vec()),
            )
            .expect(1)
            .mount(&server)
            .await;

        let pdf = client_for(&server).await.generate(ai_request()).await.expect("pdf");
        assert_eq!(pdf.bytes, b"%PDF-1.7 letter");
        assert_eq!(pdf.content_type.as_deref(), Some("application/pdf"));
    }

    #[tokio::test]
    async fn multipart_body_carries_fields_resume_and_mode_flag() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF".to_vec()))
            .mount(&server)
            .await;

        client_for(&server).await.generate(ai_request()).await.expect("pdf");

        let requests = server.received_requests().await.expect("recording enabled");
        assert_eq!(requests.len(), 1);
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains("name=\"employer\"\r\n\r\nAnalytical Engines Ltd"));
        assert!(body.contains("name=\"job_title\"\r\n\r\nSenior Engineer"));
        assert!(body.contains("name=\"use_ai\"\r\n\r\ntrue"));
        assert!(body.contains("name=\"resume\"; filename=\"resume.pdf\""));
        assert!(body.contains("Content-Type: application/pdf"));
        assert!(!body.contains("name=\"linkedin\""));
        assert!(!body.contains("name=\"custom_content\""));
    }

    #[tokio::test]
    async fn failure_with_detail_is_reinterpreted_as_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400)
                    .insert_header("content-type", "application/json")
                    .set_body_string(r#"{"detail":"Invalid resume format"}"#),
            )
            .mount(&server)
            .await;

        let error = client_for(&server).await.generate(ai_request()).await.unwrap_err();
        assert_eq!(error, SubmitError::Server("Invalid resume format".into()));
    }

    #[tokio::test]
    async fn failure_with_unparseable_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let error = client_for(&server).await.generate(ai_request()).await.unwrap_err();
        assert_eq!(error, SubmitError::Parse);
    }

    #[tokio::test]
    async fn failure_without_detail_uses_fallback_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string(r#"{"message":"nope"}"#))
            .mount(&server)
            .await;

        let error = client_for(&server).await.generate(ai_request()).await.unwrap_err();
        assert_eq!(error, SubmitError::Server(SERVER_FALLBACK_MESSAGE.into()));
    }

    #[tokio::test]
    async fn unreachable_service_is_connectivity_error() {
        // Port 1 is reserved and refuses connections on loopback.
        let client = GenerationClient::new("http://127.0.0.1:1/generate").expect("valid endpoint");
        let error = client.generate(ai_request()).await.unwrap_err();
        assert_eq!(error, SubmitError::Connectivity);
    }
}
