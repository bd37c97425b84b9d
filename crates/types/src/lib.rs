//! Shared type definitions for Cover Letter Studio.
//!
//! These types travel between the form engine, the generation client, the
//! download sink, and the terminal UI. They carry no behavior beyond small
//! conveniences so every crate can depend on them without pulling in I/O.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Generation endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/generate";

/// Name of the file the generated letter is saved under.
pub const COVER_LETTER_FILE_NAME: &str = "cover_letter.pdf";

/// Extension accepted by the resume picker.
pub const RESUME_EXTENSION: &str = "pdf";

/// Fallback shown when the server returns JSON without a `detail` string.
pub const SERVER_FALLBACK_MESSAGE: &str = "An unexpected error occurred from the server.";

/// Which of the two mutually exclusive content paths a submission uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentMode {
    /// The user supplies the complete letter text.
    #[default]
    Custom,
    /// The service writes the letter from a resume and a job description.
    Ai,
}

impl ContentMode {
    /// String-encoded boolean sent as the `use_ai` multipart field.
    pub fn as_flag(self) -> &'static str {
        match self {
            ContentMode::Custom => "false",
            ContentMode::Ai => "true",
        }
    }

    pub fn is_ai(self) -> bool {
        matches!(self, ContentMode::Ai)
    }

    pub fn toggled(self) -> Self {
        match self {
            ContentMode::Custom => ContentMode::Ai,
            ContentMode::Ai => ContentMode::Custom,
        }
    }
}

/// A resume chosen by the user. Only the location is held until submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Absolute or user-supplied path of the file.
    pub path: PathBuf,
    /// Display name (the final path component).
    pub file_name: String,
}

impl SelectedFile {
    /// Builds a selection from a path, returning `None` when the path has no file name.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let file_name = path.file_name()?.to_string_lossy().into_owned();
        Some(Self { path, file_name })
    }

    /// Returns `true` when the file carries the `.pdf` extension (case-insensitive).
    pub fn is_pdf(&self) -> bool {
        has_pdf_extension(&self.path)
    }
}

/// Returns `true` when `path` ends in `.pdf`, ignoring case.
pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(RESUME_EXTENSION))
}

/// One text field of the multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub value: String,
}

/// Resume bytes read at submission time.
#[derive(Clone, PartialEq, Eq)]
pub struct ResumeAttachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for ResumeAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResumeAttachment")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Fully assembled payload for the generation endpoint.
///
/// `fields` only holds non-empty values, in form order. The mode flag and the
/// resume part are kept separate so the transport decides how to encode them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub fields: Vec<FormField>,
    pub resume: Option<ResumeAttachment>,
    pub mode: ContentMode,
}

impl GenerationRequest {
    /// Looks up a text field by its multipart name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|field| field.name == name).map(|field| field.value.as_str())
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}

/// Binary body returned by a successful generation call.
#[derive(Clone, PartialEq, Eq)]
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    /// `Content-Type` reported by the service, if any.
    pub content_type: Option<String>,
}

impl fmt::Debug for GeneratedPdf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedPdf")
            .field("len", &self.bytes.len())
            .field("content_type", &self.content_type)
            .finish()
    }
}

/// Everything that can end a submission attempt without a saved letter.
///
/// The `Display` text of each variant is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Client-side check failed; no request was sent.
    #[error("{0}")]
    Validation(String),
    /// The service answered with an error and a readable `detail`.
    #[error("{0}")]
    Server(String),
    /// The service answered with an error body that could not be decoded.
    #[error("An unexpected error occurred. Could not parse server error message.")]
    Parse,
    /// No response was received at all.
    #[error("Something went wrong. Please check your network connection and the server status.")]
    Connectivity,
    /// Another submission is still running.
    #[error("A cover letter is already being generated. Please wait for it to finish.")]
    InFlight,
    /// The PDF arrived but could not be written to disk.
    #[error("The cover letter could not be saved: {0}")]
    Delivery(String),
}

impl SubmitError {
    pub fn validation(message: impl Into<String>) -> Self {
        SubmitError::Validation(message.into())
    }

    /// Returns `true` for errors raised before any network traffic.
    pub fn is_client_side(&self) -> bool {
        matches!(self, SubmitError::Validation(_) | SubmitError::InFlight)
    }
}

/// Final result of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The PDF was saved at the given location.
    Delivered(PathBuf),
    Failed(SubmitError),
}

/// A single entry in a directory listing shown by the file picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub path: PathBuf,
    pub is_directory: bool,
}
