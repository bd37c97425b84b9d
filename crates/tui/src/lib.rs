//! # Cover Letter Studio TUI
//!
//! A terminal front end for the cover letter generation service, built on
//! Ratatui. The user fills in contact and job details, picks custom content
//! or AI generation (job description plus a resume PDF), and submits. The
//! returned PDF is saved into the configured output directory.
//!
//! ## Architecture
//!
//! State lives on [`app::App`]; components in `ui::components` render it and
//! translate input into effects; `cmd` turns effects into background jobs;
//! `ui::runtime` owns the terminal and the event loop.

mod app;
mod cmd;
mod ui;

use std::sync::Arc;

use anyhow::Result;
use coverletter_api::GenerationClient;
use coverletter_util::{DownloadsFolder, Settings};

use crate::app::SharedCtx;

/// Runs the interactive form until the user quits.
///
/// # Errors
///
/// Fails when the endpoint in `settings` is not a valid URL, or when the
/// terminal cannot be set up.
pub async fn run(settings: Settings) -> Result<()> {
    let client = GenerationClient::new(&settings.endpoint)?;
    let sink = DownloadsFolder::new(settings.output_dir.clone());
    let theme = ui::theme::load(settings.theme.as_deref());
    let ctx = SharedCtx::new(
        theme,
        Arc::new(client),
        Arc::new(sink),
        settings.endpoint,
        settings.output_dir,
    );
    ui::runtime::run_app(ctx).await
}
