use std::env;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{ArgGroup, Args, Parser, Subcommand};
use coverletter_api::GenerationClient;
use coverletter_engine::{FieldName, SubmissionForm};
use coverletter_types::{ContentMode, SelectedFile, SubmissionOutcome};
use coverletter_util::{DownloadsFolder, Settings, SettingsOverrides, default_config_dir};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Environment variable overriding where the TUI writes its log file.
const LOG_PATH_ENV: &str = "COVERLETTER_LOG_PATH";
const LOG_FILE_NAME: &str = "coverletter.log";

/// Generate cover letters from the terminal.
///
/// Without a subcommand the interactive form opens.
#[derive(Debug, Parser)]
#[command(name = "coverletter", version, about)]
struct Cli {
    /// Generation endpoint (overrides COVERLETTER_ENDPOINT and the settings file)
    #[arg(long, global = true, value_name = "URL")]
    endpoint: Option<String>,

    /// Directory generated letters are saved into
    #[arg(long, global = true, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Submit the form once without the TUI and print where the PDF was saved
    Generate(GenerateArgs),
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("content").required(true).args(["custom_content", "ai"])))]
struct GenerateArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    linkedin: Option<String>,
    #[arg(long)]
    github: Option<String>,
    #[arg(long)]
    portfolio: Option<String>,
    #[arg(long)]
    employer: Option<String>,
    #[arg(long)]
    job_title: Option<String>,

    /// Full text of the letter (custom mode)
    #[arg(long, value_name = "TEXT")]
    custom_content: Option<String>,

    /// Let the service write the letter from a resume and a job description
    #[arg(long, requires = "job_description", requires = "resume")]
    ai: bool,

    #[arg(long, value_name = "TEXT", requires = "ai")]
    job_description: Option<String>,

    /// Resume PDF uploaded in AI mode
    #[arg(long, value_name = "PATH", requires = "ai")]
    resume: Option<PathBuf>,
}

impl GenerateArgs {
    fn mode(&self) -> ContentMode {
        if self.ai { ContentMode::Ai } else { ContentMode::Custom }
    }

    /// Builds a form holding the arguments. Validation happens on submit.
    fn into_form(self) -> SubmissionForm {
        let mut form = SubmissionForm::new(self.mode());
        let values = [
            (FieldName::Name, self.name),
            (FieldName::Email, self.email),
            (FieldName::Phone, self.phone),
            (FieldName::Linkedin, self.linkedin),
            (FieldName::Github, self.github),
            (FieldName::Portfolio, self.portfolio),
            (FieldName::Employer, self.employer),
            (FieldName::JobTitle, self.job_title),
            (FieldName::CustomContent, self.custom_content),
            (FieldName::JobDescription, self.job_description),
        ];
        for (field, value) in values {
            if let Some(value) = value {
                form.set_field(field, value);
            }
        }
        form.attach_resume(self.resume.and_then(SelectedFile::from_path));
        form
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let overrides = SettingsOverrides {
        endpoint: cli.endpoint,
        output_dir: cli.output_dir,
    };

    match cli.command {
        None => {
            init_file_tracing();
            let settings = Settings::load(overrides).context("failed to load settings")?;
            coverletter_tui::run(settings).await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Generate(args)) => {
            init_stderr_tracing();
            let settings = Settings::load(overrides).context("failed to load settings")?;
            run_generate(settings, args).await
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_stderr_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .try_init();
}

fn log_file_path() -> PathBuf {
    env::var(LOG_PATH_ENV)
        .ok()
        .filter(|path| !path.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| default_config_dir().join(LOG_FILE_NAME))
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// The TUI owns the terminal, so logs go to a file instead.
fn init_file_tracing() {
    let path = log_file_path();
    match open_log_file(&path) {
        Ok(file) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        Err(error) => {
            // Printed before the alternate screen is entered.
            eprintln!("coverletter: logging disabled, cannot open {}: {error}", path.display());
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(io::sink)
                .try_init();
        }
    }
}

async fn run_generate(settings: Settings, args: GenerateArgs) -> Result<ExitCode> {
    let client = GenerationClient::new(&settings.endpoint)?;
    let sink = DownloadsFolder::new(settings.output_dir);
    let mut form = args.into_form();
    info!(endpoint = %settings.endpoint, mode = ?form.mode(), "submitting form");

    match form.submit(&client, &sink).await {
        SubmissionOutcome::Delivered(path) => {
            println!("{}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        SubmissionOutcome::Failed(error) => {
            warn!(%error, "generation failed");
            eprintln!("Error! {error}");
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("coverletter").chain(args.iter().copied()))
    }

    #[test]
    fn no_subcommand_opens_the_tui() {
        let cli = parse(&["--endpoint", "http://example.test/generate"]).expect("parses");
        assert!(cli.command.is_none());
        assert_eq!(cli.endpoint.as_deref(), Some("http://example.test/generate"));
    }

    #[test]
    fn generate_requires_a_content_path() {
        assert!(parse(&["generate", "--name", "Ada"]).is_err());
        assert!(parse(&["generate", "--ai", "--job-description", "Role"]).is_err());
        assert!(parse(&["generate", "--resume", "cv.pdf", "--custom-content", "Hi"]).is_err());
    }

    #[test]
    fn ai_arguments_fill_the_ai_path() {
        let cli = parse(&[
            "generate",
            "--name",
            "Ada",
            "--ai",
            "--job-description",
            "Senior Engineer role",
            "--resume",
            "/tmp/resume.pdf",
            "--output-dir",
            "/tmp/out",
        ])
        .expect("parses");
        assert_eq!(cli.output_dir, Some(PathBuf::from("/tmp/out")));
        let Some(Command::Generate(args)) = cli.command else {
            panic!("expected generate");
        };
        let form = args.into_form();
        assert_eq!(form.mode(), ContentMode::Ai);
        assert_eq!(form.state().value(FieldName::Name), Some("Ada"));
        assert_eq!(form.state().value(FieldName::JobDescription), Some("Senior Engineer role"));
        assert_eq!(form.state().resume().map(|f| f.file_name.as_str()), Some("resume.pdf"));
    }

    #[test]
    fn log_path_can_be_overridden() {
        temp_env::with_var(LOG_PATH_ENV, Some("/tmp/custom.log"), || {
            assert_eq!(log_file_path(), PathBuf::from("/tmp/custom.log"));
        });
        temp_env::with_var(LOG_PATH_ENV, None::<&str>, || {
            assert!(log_file_path().ends_with(LOG_FILE_NAME));
        });
    }

    #[test]
    fn log_file_errors_are_reported_not_swallowed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"").expect("seed");

        assert!(open_log_file(&blocker.join("coverletter.log")).is_err());

        let nested = dir.path().join("logs").join("coverletter.log");
        open_log_file(&nested).expect("creates parent and file");
        assert!(nested.exists());
    }
}
