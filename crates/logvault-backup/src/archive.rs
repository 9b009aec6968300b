//! On-disk index archiving.
//!
//! Archiving is delegated to the external `tar` binary wrapped in `nice`,
//! so the compression runs at a bounded scheduling priority and never
//! starves the live engine process. Entries are stored relative to the
//! data directory (`logstash-YYYY.mm.dd/...`), so extracting the archive at
//! the original root reconstructs the index tree verbatim.

use std::path::{Path, PathBuf};

use logvault_core::{Error, IndexIdentity, Result};
use tokio::process::Command;
use tracing::{debug, info};

/// Path of the per-index subdirectory under the engine data directory.
pub fn index_dir(data_dir: &Path, identity: &IndexIdentity) -> PathBuf {
    data_dir.join(&identity.name)
}

/// Verify the index's on-disk directory exists.
///
/// Runs before any network call so a mistyped date or data directory fails
/// immediately without touching the engine or the transfer tool.
pub fn ensure_index_dir(data_dir: &Path, identity: &IndexIdentity) -> Result<PathBuf> {
    let dir = index_dir(data_dir, identity);
    if !dir.is_dir() {
        return Err(Error::IndexNotFound(dir));
    }
    Ok(dir)
}

/// Produce `<temp_dir>/<name>.tgz` from the index's subdirectory.
pub async fn create_archive(
    data_dir: &Path,
    identity: &IndexIdentity,
    temp_dir: &Path,
    niceness: i32,
) -> Result<PathBuf> {
    ensure_index_dir(data_dir, identity)?;

    let archive_path = temp_dir.join(identity.archive_file_name());
    info!(
        "archiving {} into {} (niceness {})",
        identity.name,
        archive_path.display(),
        niceness
    );

    let status = Command::new("nice")
        .arg("-n")
        .arg(niceness.to_string())
        .arg("tar")
        .arg("czf")
        .arg(&archive_path)
        .arg("-C")
        .arg(data_dir)
        .arg(&identity.name)
        .status()
        .await
        .map_err(|e| Error::ArchiveFailed(format!("failed to spawn tar: {}", e)))?;

    if !status.success() {
        return Err(Error::ArchiveFailed(format!(
            "tar exited with {} while archiving {}",
            status, identity.name
        )));
    }

    debug!("archive written: {}", archive_path.display());

    Ok(archive_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_index_dir_short_circuits() {
        let root = tempfile::tempdir().unwrap();
        let identity = IndexIdentity::resolve(Some("2013.07.01")).unwrap();

        match ensure_index_dir(root.path(), &identity) {
            Err(Error::IndexNotFound(dir)) => {
                assert_eq!(dir, root.path().join("logstash-2013.07.01"));
            }
            other => panic!("expected IndexNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_existing_index_dir_resolves() {
        let root = tempfile::tempdir().unwrap();
        let identity = IndexIdentity::resolve(Some("2013.07.01")).unwrap();
        std::fs::create_dir(root.path().join(&identity.name)).unwrap();

        let dir = ensure_index_dir(root.path(), &identity).unwrap();
        assert!(dir.is_dir());
    }
}
