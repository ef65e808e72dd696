//! CLI logic for the archform tool.
//!
//! Builds the demo workspace and dispatches on the parsed [`Command`].

pub mod demo;

mod args;

pub use args::{Args, Command};

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use log::info;
use thiserror::Error;

use archform_core::rules::{review, HintSeverity};
use archform_core::storage::{self, StorageError};
use archform_core::{ModelError, Workspace};
use archform_upload::{read_settings, upload, FileSink, HttpSink, UploadError, UploadSettings};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Run a command, writing its output to stdout.
pub async fn run(args: &Args) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    run_with_output(args, &mut stdout).await
}

/// Run a command, writing its output to `out`.
///
/// # Errors
///
/// Returns `CliError` for:
/// - an invalid demo model
/// - file and storage I/O failures
/// - missing upload configuration or a rejected upload
pub async fn run_with_output<W: Write>(args: &Args, out: &mut W) -> Result<(), CliError> {
    let workspace = demo::inplacer()?;

    match &args.command {
        Command::Outline => write!(out, "{}", workspace.outline())?,
        Command::Review => print_review(&workspace, out)?,
        Command::Export { output } => {
            let json = workspace.to_json()?;
            match output {
                Some(path) => export_to(path, &json)?,
                None => writeln!(out, "{json}")?,
            }
        }
        Command::Schema => {
            let schema = serde_json::to_string_pretty(&Workspace::json_schema())?;
            writeln!(out, "{schema}")?;
        }
        Command::Save { name, dir } => {
            match dir {
                Some(dir) => storage::write_workspace_in(dir, name, &workspace)?,
                None => storage::write_workspace(name, &workspace)?,
            }
            info!(name = name.as_str(); "Workspace saved");
            writeln!(out, "saved {name}")?;
        }
        Command::Upload {
            workspace_id,
            api_key,
            api_secret,
            url,
            dir,
        } => {
            let mut settings = read_settings();
            apply_overrides(
                &mut settings,
                *workspace_id,
                api_key.as_deref(),
                api_secret.as_deref(),
                url.as_deref(),
            );
            let id = settings.workspace_id;
            match dir {
                Some(dir) => upload(&FileSink::new(dir), id, &workspace).await?,
                None => upload(&HttpSink::new(settings)?, id, &workspace).await?,
            }
            writeln!(out, "uploaded workspace {id}")?;
        }
    }
    Ok(())
}

fn print_review<W: Write>(workspace: &Workspace, out: &mut W) -> io::Result<()> {
    let hints = review(workspace);
    if hints.is_empty() {
        return writeln!(out, "no hints");
    }
    for hint in hints {
        let severity = match hint.severity {
            HintSeverity::Warning => "warning",
            HintSeverity::Info => "info",
        };
        writeln!(out, "[{severity}] {}: {}", hint.subject_id, hint.message)?;
    }
    Ok(())
}

fn export_to(path: &Path, json: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)?;
    info!(output_file = path.display().to_string().as_str(); "Workspace exported");
    Ok(())
}

fn apply_overrides(
    settings: &mut UploadSettings,
    workspace_id: Option<u64>,
    api_key: Option<&str>,
    api_secret: Option<&str>,
    url: Option<&str>,
) {
    if let Some(id) = workspace_id {
        settings.workspace_id = id;
    }
    if let Some(key) = api_key {
        settings.api_key = key.to_string();
    }
    if let Some(secret) = api_secret {
        settings.api_secret = secret.to_string();
    }
    if let Some(url) = url {
        settings.url = url.to_string();
    }
}
