//! Form engine for Cover Letter Studio.
//!
//! Holds the mode-tagged form state, the submit-time validation rules, the
//! payload builder, and the Idle/Submitting state machine that drives one
//! submission through a [`coverletter_api::GenerationService`] and a
//! [`coverletter_util::DownloadSink`].

pub mod form;
pub mod payload;
pub mod submission;
pub mod validation;

pub use form::{FieldName, FormState, LetterContent};
pub use payload::{build_request, collect_fields};
pub use submission::{SubmissionForm, SubmissionStatus, SubmissionTicket, run_submission};
pub use validation::validate;
