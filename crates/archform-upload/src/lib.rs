//! Destinations for finalized workspaces.
//!
//! A [`WorkspaceSink`] receives a finished [`Workspace`] under a numeric
//! workspace id. Credentials and endpoints travel in [`UploadSettings`],
//! passed in by the caller.

pub mod file;
pub mod http;
mod settings;

pub use file::FileSink;
pub use http::HttpSink;
pub use settings::{
    read_settings, read_settings_from, upload_configured, write_settings, write_settings_to,
    UploadSettings,
};

use async_trait::async_trait;
use thiserror::Error;

use archform_core::{ModelError, Workspace};

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("upload is not configured: {0}")]
    NotConfigured(&'static str),

    #[error("workspace is not valid: {0}")]
    Invalid(#[from] ModelError),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings file is not valid JSON: {0}")]
    Settings(#[from] serde_json::Error),
}

#[async_trait]
pub trait WorkspaceSink: Send + Sync {
    /// Store or publish `workspace` under `workspace_id`.
    async fn put_workspace(&self, workspace_id: u64, workspace: &Workspace)
        -> Result<(), UploadError>;
}

/// Validate `workspace` and hand it to `sink`.
pub async fn upload(
    sink: &dyn WorkspaceSink,
    workspace_id: u64,
    workspace: &Workspace,
) -> Result<(), UploadError> {
    workspace.validate()?;
    log::info!(
        workspace = workspace.name(),
        workspace_id = workspace_id;
        "Uploading workspace"
    );
    sink.put_workspace(workspace_id, workspace).await
}
