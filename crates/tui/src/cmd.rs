//! # Command Execution Layer
//!
//! Translates [`Effect`]s into commands and runs them. This is the boundary
//! where pure state updates meet side effects:
//! - sending the form to the generation service
//! - listing directories for the file picker
//!
//! Effects that only touch state (mode toggles, resume selection, quitting)
//! are applied to the [`App`] directly. Everything else becomes a [`Cmd`],
//! and [`run_cmds`] spawns it, collecting the join handles in a
//! [`CommandBatch`] for the runtime to poll.

use std::path::PathBuf;
use std::sync::Arc;

use coverletter_engine::{SubmissionTicket, run_submission};
use coverletter_types::{SubmissionOutcome, SubmitError};
use coverletter_util::list_directory;
use tokio::task::{JoinHandle, spawn, spawn_blocking};
use tracing::{debug, info, warn};

use crate::app::{App, Effect, ExecOutcome};

/// Side-effectful work executed outside of pure state updates.
#[derive(Debug)]
pub enum Cmd {
    /// Send a validated snapshot of the form.
    Submit(SubmissionTicket),
    /// List a directory for the file picker.
    ListDirectory(PathBuf),
}

/// Work started by one round of effects.
#[derive(Debug, Default)]
pub struct CommandBatch {
    /// Background jobs; each resolves to an [`ExecOutcome`].
    pub pending: Vec<JoinHandle<ExecOutcome>>,
}

/// Applies state-only effects and returns the commands for the rest.
///
/// Navigation effects (`ShowModal`, `CloseModal`) are owned by the runtime
/// and ignored here.
pub fn from_effects(app: &mut App, effects: Vec<Effect>) -> Vec<Cmd> {
    let mut commands = Vec::new();
    for effect in effects {
        match effect {
            Effect::ToggleMode => app.toggle_mode(),
            Effect::ResumeSelected(file) => app.resume_selected(file),
            Effect::SubmitRequested => commands.extend(handle_submit_requested(app)),
            Effect::ListDirectoryContents(path) => commands.push(Cmd::ListDirectory(path)),
            Effect::Quit => app.should_quit = true,
            Effect::ShowModal(_) | Effect::CloseModal => {}
        }
    }
    commands
}

/// Validates and snapshots the form. Failures stay on the form as its error.
fn handle_submit_requested(app: &mut App) -> Option<Cmd> {
    match app.form.begin_submit() {
        Ok(ticket) => {
            info!(ticket = ticket.id(), mode = ?app.form.mode(), "submitting form");
            Some(Cmd::Submit(ticket))
        }
        Err(SubmitError::InFlight) => {
            debug!("submission already in flight");
            None
        }
        Err(error) => {
            debug!(%error, "form rejected before sending");
            None
        }
    }
}

/// Spawns every command and marks the app as executing when anything started.
pub fn run_cmds(app: &mut App, commands: Vec<Cmd>) -> CommandBatch {
    let mut batch = CommandBatch::default();
    for command in commands {
        let handle = match command {
            Cmd::Submit(ticket) => spawn_submission(app, ticket),
            Cmd::ListDirectory(path) => spawn_directory_listing(path),
        };
        batch.pending.push(handle);
    }
    if !batch.pending.is_empty() {
        app.executing = true;
    }
    batch
}

/// Convenience wrapper: [`from_effects`] followed by [`run_cmds`].
pub fn run_from_effects(app: &mut App, effects: Vec<Effect>) -> CommandBatch {
    let commands = from_effects(app, effects);
    run_cmds(app, commands)
}

/// Runs the submission on its own task.
///
/// The outer task always reports back with the ticket id, even when the
/// inner one panics, so the form never stays stuck in `Submitting`.
fn spawn_submission(app: &App, ticket: SubmissionTicket) -> JoinHandle<ExecOutcome> {
    let service = Arc::clone(&app.ctx.service);
    let sink = Arc::clone(&app.ctx.sink);
    let ticket_id = ticket.id();
    let inner = spawn(async move { run_submission(ticket, service.as_ref(), sink.as_ref()).await });
    spawn(async move {
        let outcome = match inner.await {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(ticket = ticket_id, %error, "submission task ended abnormally");
                SubmissionOutcome::Failed(SubmitError::Connectivity)
            }
        };
        ExecOutcome::Submission { ticket_id, outcome }
    })
}

fn spawn_directory_listing(root_path: PathBuf) -> JoinHandle<ExecOutcome> {
    spawn_blocking(move || match list_directory(&root_path) {
        Ok(entries) => ExecOutcome::DirectoryContents { entries, root_path },
        Err(error) => ExecOutcome::DirectoryError {
            message: format!("Could not open {}: {error}", root_path.display()),
            root_path,
        },
    })
}
