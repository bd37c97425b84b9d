//! Application state and messages for the cover letter TUI.
//!
//! `App` owns the submission form (the single source of truth for what will
//! be sent), the view state of each component, and the shared context with
//! the generation service, the download sink, and the theme. Components
//! never talk to the service directly; they return [`Effect`]s that the
//! command layer in `cmd` turns into background jobs.

use std::path::PathBuf;
use std::sync::Arc;

use coverletter_api::GenerationService;
use coverletter_engine::SubmissionForm;
use coverletter_types::{ContentMode, DirectoryEntry, SelectedFile, SubmissionOutcome, SubmitError};
use coverletter_util::DownloadSink;
use rat_focus::{Focus, FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use tracing::{debug, warn};

use crate::ui::components::common::FilePickerState;
use crate::ui::components::form::FormViewState;
use crate::ui::theme::{LoadedTheme, Theme};

/// Throbber frames shown on the submit button while generating.
pub const THROBBER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Side effects requested by components.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Flip between custom content and AI generation.
    ToggleMode,
    /// Validate and, when valid, send the form.
    SubmitRequested,
    ShowModal(Modal),
    CloseModal,
    /// List a directory for the file picker.
    ListDirectoryContents(PathBuf),
    /// The resume picker reported a choice (or a cancellation).
    ResumeSelected(Option<SelectedFile>),
    /// Leave the event loop and restore the terminal.
    Quit,
}

/// Modal overlays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    /// File chooser restricted to the given extensions.
    FilePicker(Vec<&'static str>),
}

/// Messages delivered to the component tree.
#[derive(Debug, Clone)]
pub enum Msg {
    Tick,
    Resize(u16, u16),
    ExecCompleted(Box<ExecOutcome>),
}

/// Result of a background job.
#[derive(Debug, Clone)]
pub enum ExecOutcome {
    DirectoryContents {
        entries: Vec<DirectoryEntry>,
        root_path: PathBuf,
    },
    DirectoryError {
        root_path: PathBuf,
        message: String,
    },
    Submission {
        ticket_id: u64,
        outcome: SubmissionOutcome,
    },
    /// A background task ended without producing a result.
    TaskFailed(String),
}

/// Runtime-wide collaborators.
pub struct SharedCtx {
    pub theme: Box<dyn Theme>,
    pub theme_id: &'static str,
    pub service: Arc<dyn GenerationService>,
    pub sink: Arc<dyn DownloadSink>,
    /// Endpoint shown in the header.
    pub endpoint: String,
    /// Directory letters are saved into.
    pub output_dir: PathBuf,
}

impl std::fmt::Debug for SharedCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedCtx")
            .field("theme_id", &self.theme_id)
            .field("endpoint", &self.endpoint)
            .field("output_dir", &self.output_dir)
            .finish_non_exhaustive()
    }
}

impl SharedCtx {
    pub fn new(
        theme: LoadedTheme,
        service: Arc<dyn GenerationService>,
        sink: Arc<dyn DownloadSink>,
        endpoint: String,
        output_dir: PathBuf,
    ) -> Self {
        debug!(theme = theme.definition.label, "loaded theme");
        Self {
            theme: theme.theme,
            theme_id: theme.definition.id,
            service,
            sink,
            endpoint,
            output_dir,
        }
    }
}

pub struct App {
    pub ctx: SharedCtx,
    /// Form data, visible error, and the Idle/Submitting state.
    pub form: SubmissionForm,
    /// Inputs, toggle, resume trigger, and submit button.
    pub form_view: FormViewState,
    /// Present while the file picker modal is open.
    pub file_picker: Option<FilePickerState>,
    pub open_modal_kind: Option<Modal>,
    pub focus: Focus,
    /// Whether any background job is running.
    pub executing: bool,
    /// Animation frame for the execution throbber
    pub throbber_idx: usize,
    pub should_quit: bool,
    container_focus: FocusFlag,
}

impl App {
    pub fn new(ctx: SharedCtx) -> Self {
        let form = SubmissionForm::new(ContentMode::default());
        let form_view = FormViewState::new(form.state());
        let mut app = Self {
            ctx,
            form,
            form_view,
            file_picker: None,
            open_modal_kind: None,
            focus: Focus::default(),
            executing: false,
            throbber_idx: 0,
            should_quit: false,
            container_focus: FocusFlag::new().with_name("app"),
        };
        app.focus = FocusBuilder::build_for(&app);
        app.focus.first();
        app
    }

    /// Applies app-wide message handling. Returns follow-up effects.
    pub fn update(&mut self, msg: &Msg) -> Vec<Effect> {
        match msg {
            Msg::Tick => {
                if self.executing {
                    self.throbber_idx = (self.throbber_idx + 1) % THROBBER_FRAMES.len();
                }
            }
            Msg::Resize(..) => {}
            Msg::ExecCompleted(outcome) => match outcome.as_ref() {
                ExecOutcome::Submission { ticket_id, outcome } => {
                    self.form.settle(*ticket_id, outcome.clone());
                }
                ExecOutcome::TaskFailed(message) => {
                    warn!(%message, "background task failed");
                }
                ExecOutcome::DirectoryContents { .. } | ExecOutcome::DirectoryError { .. } => {}
            },
        }
        Vec::new()
    }

    /// Switches modes and rebuilds the view state for the new path.
    ///
    /// The resume picker is re-created, so its local label is reset too.
    pub fn toggle_mode(&mut self) {
        self.form.toggle_mode();
        self.form_view.reset_for(self.form.state());
    }

    /// Stores the picker's choice on the form and mirrors it in the trigger label.
    pub fn resume_selected(&mut self, file: Option<SelectedFile>) {
        self.form_view.resume_picker.set_file_name(file.as_ref().map(|f| f.file_name.clone()));
        if !self.form.attach_resume(file) {
            debug!("resume selection ignored outside AI mode");
        }
    }

    /// Visible error banner text, if any. `InFlight` never reaches the banner.
    pub fn error_message(&self) -> Option<String> {
        self.form
            .error()
            .filter(|error| !matches!(error, SubmitError::InFlight))
            .map(ToString::to_string)
    }

    pub fn throbber(&self) -> &'static str {
        THROBBER_FRAMES[self.throbber_idx % THROBBER_FRAMES.len()]
    }
}

impl HasFocus for App {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        if let Some(file_picker) = self.file_picker.as_ref() {
            builder.widget(file_picker);
        } else {
            builder.widget(&self.form_view);
        }
        builder.end(tag);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::app;
    use super::*;
    use coverletter_engine::FieldName;

    #[test]
    fn toggling_resets_the_resume_label_and_error() {
        let mut app = app();
        app.toggle_mode();
        app.resume_selected(SelectedFile::from_path("/tmp/resume.pdf"));
        assert_eq!(app.form_view.resume_picker.file_name(), Some("resume.pdf"));
        assert!(app.form.state().resume().is_some());

        assert!(app.form.begin_submit().is_err());
        assert!(app.error_message().is_some());

        app.toggle_mode();
        assert_eq!(app.form.mode(), ContentMode::Custom);
        assert!(app.form_view.resume_picker.file_name().is_none());
        assert!(app.error_message().is_none());
        assert!(app.form_view.input(FieldName::CustomContent).is_some());
        assert!(app.form_view.input(FieldName::JobDescription).is_none());
    }

    #[test]
    fn cancelled_picker_clears_the_resume() {
        let mut app = app();
        app.toggle_mode();
        app.resume_selected(SelectedFile::from_path("/tmp/resume.pdf"));
        app.resume_selected(None);
        assert!(app.form.state().resume().is_none());
        assert!(app.form_view.resume_picker.file_name().is_none());
    }

    #[test]
    fn submission_outcome_settles_the_form() {
        let mut app = app();
        app.form.set_field(FieldName::Name, "Ada");
        app.form.set_field(FieldName::Email, "ada@example.com");
        app.form.set_field(FieldName::Phone, "555");
        app.form.set_field(FieldName::Employer, "Initech");
        app.form.set_field(FieldName::JobTitle, "Engineer");
        app.form.set_field(FieldName::CustomContent, "Dear team");
        let ticket = app.form.begin_submit().expect("valid form");

        let outcome = ExecOutcome::Submission {
            ticket_id: ticket.id(),
            outcome: SubmissionOutcome::Failed(SubmitError::Server("Invalid resume format".into())),
        };
        app.update(&Msg::ExecCompleted(Box::new(outcome)));

        assert!(!app.form.is_busy());
        assert_eq!(app.error_message().as_deref(), Some("Invalid resume format"));
    }
}
