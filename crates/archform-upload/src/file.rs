use async_trait::async_trait;
use std::path::PathBuf;

use archform_core::Workspace;

use crate::{UploadError, WorkspaceSink};

/// Writes `workspace-<id>.json` into a directory.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, workspace_id: u64) -> PathBuf {
        self.dir.join(format!("workspace-{workspace_id}.json"))
    }
}

#[async_trait]
impl WorkspaceSink for FileSink {
    async fn put_workspace(
        &self,
        workspace_id: u64,
        workspace: &Workspace,
    ) -> Result<(), UploadError> {
        if workspace_id == 0 {
            return Err(UploadError::NotConfigured("a non-zero workspace id is required"));
        }
        let json = workspace.to_json()?;
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(workspace_id);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;
        log::debug!(path = path.display().to_string().as_str(); "Workspace stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload;
    use archform_core::{Location, WorkspaceBuilder};
    use tempfile::tempdir;

    fn workspace() -> Workspace {
        let mut builder = WorkspaceBuilder::new("Files", "");
        let user = builder.add_person("User", "").unwrap();
        let system = builder
            .add_software_system(Location::Internal, "System", "")
            .unwrap();
        builder.uses(&user, &system, "Uses").unwrap();
        builder.finalize()
    }

    #[tokio::test]
    async fn writes_workspace_document() {
        let dir = tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("out"));
        upload(&sink, 7, &workspace()).await.unwrap();

        let raw = std::fs::read_to_string(sink.path_for(7)).unwrap();
        let loaded = Workspace::from_json(&raw).unwrap();
        assert_eq!(loaded.name(), "Files");
        assert_eq!(loaded.relationships().len(), 1);
        assert!(!dir.path().join("out").join("workspace-7.json.tmp").exists());
    }

    #[tokio::test]
    async fn zero_workspace_id_is_rejected() {
        let dir = tempdir().unwrap();
        let sink = FileSink::new(dir.path());
        let err = upload(&sink, 0, &workspace()).await.unwrap_err();
        assert!(matches!(err, UploadError::NotConfigured(_)));
        assert!(!sink.path_for(0).exists());
    }
}
