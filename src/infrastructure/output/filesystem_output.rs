//! Filesystem-based output service implementation

use async_trait::async_trait;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::application::{ApplicationError, OutputService};
use crate::generation::Artifact;

/// Output service that writes artifacts to the filesystem
///
/// Files whose content is already identical are left untouched, so
/// regenerating an unchanged document does not bump modification times.
#[derive(Debug, Clone, Default)]
pub struct FileSystemOutputService;

impl FileSystemOutputService {
    pub fn new() -> Self {
        Self
    }

    async fn write_artifact(&self, artifact: &Artifact) -> Result<bool, ApplicationError> {
        let path = &artifact.path;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| output_error("create directory", parent, e))?;
        }

        if let Ok(existing) = fs::read(path).await {
            if existing == artifact.content.as_bytes() {
                return Ok(false);
            }
        }

        let mut file = fs::File::create(path)
            .await
            .map_err(|e| output_error("create file", path, e))?;
        file.write_all(artifact.content.as_bytes())
            .await
            .map_err(|e| output_error("write file", path, e))?;
        file.flush()
            .await
            .map_err(|e| output_error("flush file", path, e))?;

        #[cfg(unix)]
        if let Some(mode) = artifact.permissions {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
                .await
                .map_err(|e| output_error("set permissions on", path, e))?;
        }

        Ok(true)
    }
}

fn output_error(action: &str, path: &Path, error: std::io::Error) -> ApplicationError {
    ApplicationError::OutputError(format!("Failed to {action} {}: {error}", path.display()))
}

#[async_trait]
impl OutputService for FileSystemOutputService {
    async fn write_artifacts(&self, artifacts: &[Artifact]) -> Result<usize, ApplicationError> {
        let mut written = 0;
        for artifact in artifacts {
            if self.write_artifact(artifact).await? {
                written += 1;
            } else {
                tracing::debug!(path = %artifact.path.display(), "unchanged, skipped");
            }
        }
        Ok(written)
    }

    async fn ensure_directory(&self, path: &Path) -> Result<(), ApplicationError> {
        fs::create_dir_all(path)
            .await
            .map_err(|e| output_error("create directory", path, e))
    }
}
