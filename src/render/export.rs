//! Writing returned artifacts to disk.

use std::path::{Path, PathBuf};

use crate::client::types::{Artifact, UploadResult};

/// Write each artifact present as `<stem>-embedded.<ext>` /
/// `<stem>-extracted.<ext>` under `dir`, returning the paths written.
pub async fn write_artifacts(result: &UploadResult, dir: &Path, stem: &str) -> std::io::Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(dir).await?;

    let mut written = Vec::new();
    for (label, artifact) in [("embedded", &result.embedded), ("extracted", &result.extracted)] {
        if let Some(artifact) = artifact {
            let path = dir.join(artifact_file_name(stem, label, artifact));
            tokio::fs::write(&path, &artifact.bytes).await?;
            tracing::debug!(path = ?path, size = artifact.bytes.len(), "Artifact written");
            written.push(path);
        }
    }
    Ok(written)
}

fn artifact_file_name(stem: &str, label: &str, artifact: &Artifact) -> String {
    format!("{}-{}.{}", stem, label, artifact.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[tokio::test]
    async fn test_writes_present_artifacts_only() {
        let dir = tempfile::tempdir().unwrap();
        let result = UploadResult {
            embedded: Some(Artifact {
                bytes: Bytes::from_static(b"A"),
                mime_type: "image/png".into(),
            }),
            ..UploadResult::default()
        };

        let written = write_artifacts(&result, &dir.path().join("out"), "cat").await.unwrap();
        assert_eq!(written, vec![dir.path().join("out").join("cat-embedded.png")]);
        assert_eq!(std::fs::read(&written[0]).unwrap(), b"A");
    }
}
