//! Turns a validated [`FormState`] into a [`GenerationRequest`].

use coverletter_types::{FormField, GenerationRequest, ResumeAttachment, SubmitError};
use tracing::{debug, warn};

use crate::form::FormState;

/// Non-empty fields of the active mode, in form order. Values are not trimmed.
pub fn collect_fields(form: &FormState) -> Vec<FormField> {
    form.active_fields()
        .filter_map(|field| {
            let value = form.value(field)?;
            (!value.is_empty()).then(|| FormField {
                name: field.as_str(),
                value: value.to_string(),
            })
        })
        .collect()
}

/// Builds the request, reading the resume bytes from disk when one is attached.
pub async fn build_request(form: &FormState) -> Result<GenerationRequest, SubmitError> {
    let resume = match form.resume() {
        Some(file) => {
            let bytes = tokio::fs::read(&file.path).await.map_err(|error| {
                warn!(path = %file.path.display(), error = %error, "failed to read resume");
                SubmitError::validation(format!("Could not read {}: {error}", file.file_name))
            })?;
            debug!(file = %file.file_name, len = bytes.len(), "attached resume");
            Some(ResumeAttachment {
                file_name: file.file_name.clone(),
                bytes,
            })
        }
        None => None,
    };

    Ok(GenerationRequest {
        fields: collect_fields(form),
        resume,
        mode: form.mode(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldName;
    use coverletter_types::{ContentMode, SelectedFile};

    #[test]
    fn empty_optional_fields_are_omitted() {
        let mut form = FormState::new(ContentMode::Custom);
        form.name = "Ada".into();
        form.github = "https://github.com/ada".into();
        form.employer = "Initech".into();
        form.job_title = "Engineer".into();
        form.set_value(FieldName::CustomContent, " Dear team ");

        let names: Vec<&str> = collect_fields(&form).iter().map(|field| field.name).collect();
        assert_eq!(names, vec!["name", "github", "employer", "job_title", "custom_content"]);

        let fields = collect_fields(&form);
        assert_eq!(fields.last().map(|field| field.value.as_str()), Some(" Dear team "));
    }

    #[tokio::test]
    async fn resume_bytes_are_read_at_build_time() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("resume.pdf");
        std::fs::write(&path, b"%PDF-1.4 resume").expect("write resume");

        let mut form = FormState::new(ContentMode::Ai);
        form.set_value(FieldName::JobDescription, "Senior Engineer role...");
        form.set_resume(SelectedFile::from_path(&path));

        let request = build_request(&form).await.expect("request");
        assert_eq!(request.mode, ContentMode::Ai);
        assert_eq!(request.field("job_description"), Some("Senior Engineer role..."));
        assert!(!request.has_field("custom_content"));
        let resume = request.resume.expect("resume attached");
        assert_eq!(resume.file_name, "resume.pdf");
        assert_eq!(resume.bytes, b"%PDF-1.4 resume");
    }

    #[tokio::test]
    async fn unreadable_resume_is_a_validation_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut form = FormState::new(ContentMode::Ai);
        form.set_resume(SelectedFile::from_path(dir.path().join("gone.pdf")));

        let error = build_request(&form).await.expect_err("missing file");
        assert!(matches!(error, SubmitError::Validation(message) if message.starts_with("Could not read gone.pdf")));
    }
}
