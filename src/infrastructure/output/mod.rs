//! Output service implementations

pub mod filesystem_output;

pub use filesystem_output::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::OutputService;
    use crate::generation::Artifact;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_filesystem_output_write_artifacts() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let output_service = FileSystemOutputService::new();

        let artifacts = vec![
            Artifact::new(temp_dir.path().join("src/client.rs"), "pub struct Client;"),
            Artifact::new(
                temp_dir.path().join("Cargo.toml"),
                "[package]\nname = \"pets\"\nversion = \"0.1.0\"",
            ),
        ];

        let written = output_service.write_artifacts(&artifacts).await.unwrap();
        assert_eq!(written, 2);

        let client = std::fs::read_to_string(temp_dir.path().join("src/client.rs"))
            .expect("Failed to read client.rs");
        assert_eq!(client, "pub struct Client;");
        assert!(temp_dir.path().join("Cargo.toml").exists());
    }

    #[tokio::test]
    async fn test_filesystem_output_skips_unchanged_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let output_service = FileSystemOutputService::new();
        let path = temp_dir.path().join("src/lib.rs");

        let first = vec![Artifact::new(&path, "pub mod client;")];
        assert_eq!(output_service.write_artifacts(&first).await.unwrap(), 1);
        assert_eq!(output_service.write_artifacts(&first).await.unwrap(), 0);

        let changed = vec![Artifact::new(&path, "pub mod server;")];
        assert_eq!(output_service.write_artifacts(&changed).await.unwrap(), 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "pub mod server;");
    }

    #[tokio::test]
    async fn test_filesystem_output_ensure_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let nested_path = temp_dir.path().join("deeply/nested/directory");

        FileSystemOutputService::new()
            .ensure_directory(&nested_path)
            .await
            .unwrap();
        assert!(nested_path.is_dir());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_filesystem_output_with_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut artifact = Artifact::new(temp_dir.path().join("regen.sh"), "#!/bin/sh\n");
        artifact.permissions = Some(0o755);

        FileSystemOutputService::new()
            .write_artifacts(&[artifact])
            .await
            .unwrap();

        let mode = std::fs::metadata(temp_dir.path().join("regen.sh"))
            .expect("Failed to get metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
