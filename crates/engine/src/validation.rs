//! Submit-time checks. The first failing rule wins and nothing is sent.

use coverletter_types::SubmitError;

use crate::form::{FieldName, FormState, LetterContent};

pub const RESUME_REQUIRED: &str = "Please upload your resume PDF.";
pub const JOB_DESCRIPTION_REQUIRED: &str = "Please enter the job description.";
pub const CUSTOM_CONTENT_REQUIRED: &str = "Please enter your custom cover letter content or enable AI generation.";
pub const EMAIL_MISSING_AT: &str = "Please include an '@' in the email address.";

/// Message for a required contact field left blank.
pub fn required_field_message(field: FieldName) -> String {
    format!("Please fill out the {} field.", field.label())
}

/// Validates `form` for submission.
///
/// Mode rules run before the contact rules so the content-specific message
/// is what the user sees first.
pub fn validate(form: &FormState) -> Result<(), SubmitError> {
    match &form.content {
        LetterContent::Ai {
            job_description,
            resume,
        } => {
            // The picker only offers PDFs; a typed path can still point elsewhere.
            if !resume.as_ref().is_some_and(|file| file.is_pdf()) {
                return Err(SubmitError::validation(RESUME_REQUIRED));
            }
            if is_blank(job_description) {
                return Err(SubmitError::validation(JOB_DESCRIPTION_REQUIRED));
            }
        }
        LetterContent::Custom { custom_content } => {
            if is_blank(custom_content) {
                return Err(SubmitError::validation(CUSTOM_CONTENT_REQUIRED));
            }
        }
    }

    for field in FieldName::CONTACT.into_iter().filter(|field| field.is_required_contact()) {
        if form.value(field).is_none_or(is_blank) {
            return Err(SubmitError::validation(required_field_message(field)));
        }
    }

    if !form.email.contains('@') {
        return Err(SubmitError::validation(EMAIL_MISSING_AT));
    }
    Ok(())
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
