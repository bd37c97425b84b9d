//! The submission workflow: Idle → Submitting → Idle.
//!
//! [`SubmissionForm`] owns the form, the visible error, and the busy status.
//! A submission is split in two so a UI can keep handling input while the
//! request runs: [`SubmissionForm::begin_submit`] validates and hands out a
//! [`SubmissionTicket`] (a snapshot of the form), [`run_submission`] drives the
//! network call and the download, and [`SubmissionForm::settle`] always
//! returns the form to Idle.

use std::path::{Path, PathBuf};

use coverletter_api::GenerationService;
use coverletter_types::{COVER_LETTER_FILE_NAME, ContentMode, SelectedFile, SubmissionOutcome, SubmitError};
use coverletter_util::DownloadSink;
use tracing::{debug, info, warn};

use crate::form::{FieldName, FormState};
use crate::payload::build_request;
use crate::validation::validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
}

/// Permission to run one submission, carrying the form as it was when submitted.
#[derive(Debug, Clone)]
pub struct SubmissionTicket {
    id: u64,
    form: FormState,
}

impl SubmissionTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }
}

#[derive(Debug, Default)]
pub struct SubmissionForm {
    state: FormState,
    error: Option<SubmitError>,
    status: SubmissionStatus,
    last_delivery: Option<PathBuf>,
    next_ticket: u64,
    in_flight: Option<u64>,
}

impl SubmissionForm {
    pub fn new(mode: ContentMode) -> Self {
        Self {
            state: FormState::new(mode),
            ..Default::default()
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn mode(&self) -> ContentMode {
        self.state.mode()
    }

    pub fn error(&self) -> Option<&SubmitError> {
        self.error.as_ref()
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn is_busy(&self) -> bool {
        self.status == SubmissionStatus::Submitting
    }

    /// Where the most recent letter was saved, if the last attempt succeeded.
    pub fn last_delivery(&self) -> Option<&Path> {
        self.last_delivery.as_deref()
    }

    /// Edits are accepted while a request runs; the request uses its own snapshot.
    pub fn set_field(&mut self, field: FieldName, value: impl Into<String>) -> bool {
        self.state.set_value(field, value)
    }

    pub fn attach_resume(&mut self, file: Option<SelectedFile>) -> bool {
        self.state.set_resume(file)
    }

    /// Switches modes, dropping the abandoned path's data and any visible message.
    pub fn toggle_mode(&mut self) {
        self.state.toggle_mode();
        self.error = None;
        self.last_delivery = None;
        debug!(mode = ?self.state.mode(), "toggled content mode");
    }

    /// Validates the form and enters Submitting.
    ///
    /// Rejected with [`SubmitError::InFlight`] while another submission runs;
    /// that rejection leaves the current error and status untouched. Any other
    /// failure is recorded as the visible error and the form stays Idle.
    pub fn begin_submit(&mut self) -> Result<SubmissionTicket, SubmitError> {
        if self.in_flight.is_some() {
            debug!("submission rejected; another request is in flight");
            return Err(SubmitError::InFlight);
        }

        self.error = None;
        self.last_delivery = None;
        if let Err(error) = validate(&self.state) {
            debug!(message = %error, "form failed validation");
            self.error = Some(error.clone());
            return Err(error);
        }

        self.next_ticket += 1;
        let id = self.next_ticket;
        self.in_flight = Some(id);
        self.status = SubmissionStatus::Submitting;
        Ok(SubmissionTicket {
            id,
            form: self.state.clone(),
        })
    }

    /// Records the result of ticket `id` and returns to Idle.
    ///
    /// Outcomes for tickets other than the one in flight are ignored.
    pub fn settle(&mut self, id: u64, outcome: SubmissionOutcome) {
        if self.in_flight != Some(id) {
            warn!(id, "ignoring outcome for a stale submission");
            return;
        }
        self.in_flight = None;
        self.status = SubmissionStatus::Idle;
        match outcome {
            SubmissionOutcome::Delivered(path) => {
                self.error = None;
                self.last_delivery = Some(path);
            }
            SubmissionOutcome::Failed(error) => {
                self.last_delivery = None;
                self.error = Some(error);
            }
        }
    }

    /// Runs a whole submission in place. Used by the headless CLI.
    pub async fn submit(&mut self, service: &dyn GenerationService, sink: &dyn DownloadSink) -> SubmissionOutcome {
        let ticket = match self.begin_submit() {
            Ok(ticket) => ticket,
            Err(error) => return SubmissionOutcome::Failed(error),
        };
        let id = ticket.id();
        let outcome = run_submission(ticket, service, sink).await;
        self.settle(id, outcome.clone());
        outcome
    }
}

/// Sends the ticket's form and saves the returned PDF as `cover_letter.pdf`.
pub async fn run_submission(
    ticket: SubmissionTicket,
    service: &dyn GenerationService,
    sink: &dyn DownloadSink,
) -> SubmissionOutcome {
    let request = match build_request(&ticket.form).await {
        Ok(request) => request,
        Err(error) => return SubmissionOutcome::Failed(error),
    };

    let pdf = match service.generate(request).await {
        Ok(pdf) => pdf,
        Err(error) => return SubmissionOutcome::Failed(error),
    };

    match sink.deliver(COVER_LETTER_FILE_NAME, &pdf.bytes) {
        Ok(path) => {
            info!(ticket = ticket.id, path = %path.display(), "cover letter delivered");
            SubmissionOutcome::Delivered(path)
        }
        Err(error) => {
            warn!(ticket = ticket.id, error = %error, "failed to save cover letter");
            SubmissionOutcome::Failed(SubmitError::Delivery(error.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use coverletter_types::{GeneratedPdf, GenerationRequest, SERVER_FALLBACK_MESSAGE};
    use coverletter_util::DeliveryError;
    use std::sync::Mutex;

    use crate::validation::{CUSTOM_CONTENT_REQUIRED, JOB_DESCRIPTION_REQUIRED, RESUME_REQUIRED};

    struct FakeService {
        response: Result<GeneratedPdf, SubmitError>,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    impl FakeService {
        fn returning(response: Result<GeneratedPdf, SubmitError>) -> Self {
            Self {
                response,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn pdf() -> Self {
            Self::returning(Ok(GeneratedPdf {
                bytes: b"%PDF-1.7 letter".to_vec(),
                content_type: Some("application/pdf".into()),
            }))
        }

        fn calls(&self) -> usize {
            self.requests.lock().expect("lock").len()
        }
    }

    #[async_trait]
    impl GenerationService for FakeService {
        async fn generate(&self, request: GenerationRequest) -> Result<GeneratedPdf, SubmitError> {
            self.requests.lock().expect("lock").push(request);
            self.response.clone()
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        deliveries: Mutex<Vec<(String, Vec<u8>)>>,
    }

    impl DownloadSink for RecordingSink {
        fn deliver(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, DeliveryError> {
            self.deliveries
                .lock()
                .expect("lock")
                .push((file_name.to_string(), bytes.to_vec()));
            Ok(PathBuf::from("/downloads").join(file_name))
        }
    }

    fn with_contact(mode: ContentMode) -> SubmissionForm {
        let mut form = SubmissionForm::new(mode);
        form.set_field(FieldName::Name, "Ada Lovelace");
        form.set_field(FieldName::Email, "ada@example.com");
        form.set_field(FieldName::Phone, "555-0100");
        form.set_field(FieldName::Employer, "Analytical Engines Ltd");
        form.set_field(FieldName::JobTitle, "Senior Engineer");
        form
    }

    fn valid_custom() -> SubmissionForm {
        let mut form = with_contact(ContentMode::Custom);
        form.set_field(FieldName::CustomContent, "Dear hiring team");
        form
    }

    fn valid_ai(dir: &Path) -> SubmissionForm {
        let resume = dir.join("resume.pdf");
        std::fs::write(&resume, b"%PDF-1.4 resume").expect("write resume");
        let mut form = with_contact(ContentMode::Ai);
        form.set_field(FieldName::JobDescription, "Senior Engineer role...");
        form.attach_resume(SelectedFile::from_path(resume));
        form
    }

    #[tokio::test]
    async fn ai_mode_without_resume_never_calls_the_service() {
        let service = FakeService::pdf();
        let sink = RecordingSink::default();
        let mut form = with_contact(ContentMode::Ai);
        form.set_field(FieldName::JobDescription, "Senior Engineer role...");

        let outcome = form.submit(&service, &sink).await;

        assert_eq!(outcome, SubmissionOutcome::Failed(SubmitError::validation(RESUME_REQUIRED)));
        assert_eq!(form.error().map(ToString::to_string).as_deref(), Some(RESUME_REQUIRED));
        assert_eq!(service.calls(), 0);
        assert!(!form.is_busy());
    }

    #[tokio::test]
    async fn blank_content_never_calls_the_service() {
        let dir = tempfile::tempdir().expect("tempdir");
        let service = FakeService::pdf();
        let sink = RecordingSink::default();

        let mut ai = valid_ai(dir.path());
        ai.set_field(FieldName::JobDescription, "   ");
        assert_eq!(
            ai.submit(&service, &sink).await,
            SubmissionOutcome::Failed(SubmitError::validation(JOB_DESCRIPTION_REQUIRED))
        );

        let mut custom = valid_custom();
        custom.set_field(FieldName::CustomContent, "\n");
        assert_eq!(
            custom.submit(&service, &sink).await,
            SubmissionOutcome::Failed(SubmitError::validation(CUSTOM_CONTENT_REQUIRED))
        );
        assert_eq!(service.calls(), 0);
        assert_eq!(custom.status(), SubmissionStatus::Idle);
    }

    #[tokio::test]
    async fn successful_ai_submission_delivers_one_cover_letter() {
        let dir = tempfile::tempdir().expect("tempdir");
        let service = FakeService::pdf();
        let sink = RecordingSink::default();
        let mut form = valid_ai(dir.path());

        let outcome = form.submit(&service, &sink).await;

        assert_eq!(
            outcome,
            SubmissionOutcome::Delivered(PathBuf::from("/downloads/cover_letter.pdf"))
        );
        let deliveries = sink.deliveries.lock().expect("lock");
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].0, COVER_LETTER_FILE_NAME);
        assert_eq!(deliveries[0].1, b"%PDF-1.7 letter");
        assert!(form.error().is_none());
        assert!(!form.is_busy());
        assert_eq!(form.last_delivery(), Some(Path::new("/downloads/cover_letter.pdf")));

        let requests = service.requests.lock().expect("lock");
        let request = &requests[0];
        assert_eq!(request.field("employer"), Some("Analytical Engines Ltd"));
        assert_eq!(request.field("job_title"), Some("Senior Engineer"));
        assert!(!request.has_field("linkedin"));
        assert_eq!(request.resume.as_ref().map(|resume| resume.file_name.as_str()), Some("resume.pdf"));
    }

    #[tokio::test]
    async fn server_detail_is_shown_verbatim_and_busy_clears() {
        let service = FakeService::returning(Err(SubmitError::Server("Invalid resume format".into())));
        let sink = RecordingSink::default();
        let mut form = valid_custom();

        form.submit(&service, &sink).await;

        assert_eq!(form.error().map(ToString::to_string).as_deref(), Some("Invalid resume format"));
        assert!(!form.is_busy());
        assert!(sink.deliveries.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn parse_connectivity_and_fallback_errors_surface_their_messages() {
        for error in [
            SubmitError::Parse,
            SubmitError::Connectivity,
            SubmitError::Server(SERVER_FALLBACK_MESSAGE.into()),
        ] {
            let service = FakeService::returning(Err(error.clone()));
            let mut form = valid_custom();
            form.submit(&service, &RecordingSink::default()).await;
            assert_eq!(form.error(), Some(&error));
            assert_eq!(form.status(), SubmissionStatus::Idle);
        }
    }

    #[test]
    fn second_submit_while_in_flight_is_rejected() {
        let mut form = valid_custom();
        let ticket = form.begin_submit().expect("first submit");
        assert!(form.is_busy());

        assert_eq!(form.begin_submit().unwrap_err(), SubmitError::InFlight);
        assert!(form.is_busy());
        assert!(form.error().is_none());

        form.settle(ticket.id(), SubmissionOutcome::Failed(SubmitError::Connectivity));
        assert!(!form.is_busy());
        assert!(form.begin_submit().is_ok());
    }

    #[test]
    fn stale_outcomes_are_ignored() {
        let mut form = valid_custom();
        let ticket = form.begin_submit().expect("submit");
        form.settle(ticket.id() + 1, SubmissionOutcome::Failed(SubmitError::Parse));
        assert!(form.is_busy());
        assert!(form.error().is_none());
    }

    #[test]
    fn ticket_snapshots_the_form_at_submit_time() {
        let mut form = valid_custom();
        let ticket = form.begin_submit().expect("submit");
        form.set_field(FieldName::CustomContent, "edited while sending");
        assert_eq!(ticket.form().value(FieldName::CustomContent), Some("Dear hiring team"));
    }

    #[test]
    fn toggle_clears_content_resume_and_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut form = valid_ai(dir.path());
        form.set_field(FieldName::Email, "no-at-sign");
        assert!(form.begin_submit().is_err());
        assert!(form.error().is_some());

        form.toggle_mode();
        assert_eq!(form.mode(), ContentMode::Custom);
        assert!(form.error().is_none());
        assert!(form.state().resume().is_none());
        assert_eq!(form.state().value(FieldName::CustomContent), Some(""));

        form.toggle_mode();
        assert_eq!(form.state().value(FieldName::JobDescription), Some(""));
    }

    #[tokio::test]
    async fn delivery_failure_is_reported() {
        struct FullDisk;
        impl DownloadSink for FullDisk {
            fn deliver(&self, file_name: &str, _bytes: &[u8]) -> Result<PathBuf, DeliveryError> {
                Err(DeliveryError::InvalidFileName(file_name.to_string()))
            }
        }

        let service = FakeService::pdf();
        let mut form = valid_custom();
        let outcome = form.submit(&service, &FullDisk).await;
        assert!(matches!(outcome, SubmissionOutcome::Failed(SubmitError::Delivery(_))));
        assert!(form.last_delivery().is_none());
    }
}
