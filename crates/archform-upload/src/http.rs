//! Plain JSON transport to a workspace API.
//!
//! The document is sent with `PUT {url}/workspace/{id}` and the API key and
//! secret as request headers. Request signing schemes of specific services
//! are left to a dedicated sink.

use async_trait::async_trait;

use archform_core::Workspace;

use crate::settings::{upload_configured, UploadSettings};
use crate::{UploadError, WorkspaceSink};

pub const API_KEY_HEADER: &str = "X-Api-Key";
pub const API_SECRET_HEADER: &str = "X-Api-Secret";

pub struct HttpSink {
    client: reqwest::Client,
    settings: UploadSettings,
}

impl HttpSink {
    pub fn new(settings: UploadSettings) -> Result<Self, UploadError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("archform/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_client(client, settings)
    }

    /// Use a preconfigured client, e.g. one with custom proxy or TLS settings.
    pub fn with_client(
        client: reqwest::Client,
        settings: UploadSettings,
    ) -> Result<Self, UploadError> {
        if !upload_configured(&settings) {
            return Err(UploadError::NotConfigured(
                "url, workspace id, API key and API secret are all required",
            ));
        }
        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &UploadSettings {
        &self.settings
    }

    pub fn endpoint(&self, workspace_id: u64) -> String {
        format!(
            "{}/workspace/{}",
            self.settings.url.trim_end_matches('/'),
            workspace_id
        )
    }
}

#[async_trait]
impl WorkspaceSink for HttpSink {
    async fn put_workspace(
        &self,
        workspace_id: u64,
        workspace: &Workspace,
    ) -> Result<(), UploadError> {
        let url = self.endpoint(workspace_id);
        log::debug!(url = url.as_str(); "Sending workspace");

        let response = self
            .client
            .put(&url)
            .header(API_KEY_HEADER, &self.settings.api_key)
            .header(API_SECRET_HEADER, &self.settings.api_secret)
            .json(workspace)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Status {
                status: status.as_u16(),
                body,
            });
        }
        log::info!(url = url.as_str(), status = status.as_u16(); "Workspace uploaded");
        Ok(())
    }
}
