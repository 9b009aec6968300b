//! Artifact transfer via the external object-storage tool.
//!
//! The transfer tool is a black box invoked as `<cmd> <local> <remote>
//! [-e]` for uploads and `<cmd> <remote> <local>` for downloads. Any
//! non-zero exit surfaces as `TransferFailed` with no automatic retry;
//! re-running the whole operation is idempotent at the object level because
//! uploads and downloads simply overwrite.

use std::ffi::OsStr;
use std::path::Path;

use logvault_core::{Error, IndexIdentity, Result};
use tokio::process::Command;
use tracing::info;

/// Remote directory the artifact pair for one index lives under.
pub fn remote_target(bucket: &str, identity: &IndexIdentity) -> String {
    format!(
        "{}/{}/",
        bucket.trim_end_matches('/'),
        identity.date_partition_key
    )
}

/// Wrapper around the configured transfer tool.
#[derive(Debug)]
pub struct Transport {
    /// Program plus leading arguments, split from the configured string
    argv: Vec<String>,
}

impl Transport {
    pub fn new(transfer_cmd: &str) -> Result<Self> {
        let argv: Vec<String> = transfer_cmd
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if argv.is_empty() {
            return Err(Error::InvalidInput(
                "transfer command must not be empty".to_string(),
            ));
        }
        Ok(Self { argv })
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.argv[0]);
        cmd.args(&self.argv[1..]);
        cmd
    }

    async fn run(&self, args: &[&OsStr], what: &str) -> Result<()> {
        let mut cmd = self.command();
        cmd.args(args);

        let status = cmd
            .status()
            .await
            .map_err(|e| Error::TransferFailed(format!("failed to spawn {}: {}", what, e)))?;

        if !status.success() {
            return Err(Error::TransferFailed(format!(
                "{} exited with {}",
                what, status
            )));
        }
        Ok(())
    }

    /// Upload a local file to a remote object, optionally requesting
    /// server-side encryption from the provider.
    pub async fn upload(&self, local: &Path, remote: &str, encrypt: bool) -> Result<()> {
        info!("uploading {} to {}", local.display(), remote);
        let mut args = vec![local.as_os_str(), OsStr::new(remote)];
        if encrypt {
            args.push(OsStr::new("-e"));
        }
        self.run(&args, "upload").await
    }

    /// Download a remote object to a local file.
    pub async fn download(&self, remote: &str, local: &Path) -> Result<()> {
        info!("downloading {} to {}", remote, local.display());
        self.run(&[OsStr::new(remote), local.as_os_str()], "download")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_target_layout() {
        let identity = IndexIdentity::resolve(Some("2013.07.01")).unwrap();
        assert_eq!(
            remote_target("s3://bucket", &identity),
            "s3://bucket/2013-07/"
        );
        // Trailing slash on the bucket is tolerated.
        assert_eq!(
            remote_target("s3://bucket/backups/", &identity),
            "s3://bucket/backups/2013-07/"
        );
    }

    #[test]
    fn test_empty_transfer_command_rejected() {
        match Transport::new("   ") {
            Err(Error::InvalidInput(_)) => {}
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_transfer_failure() {
        let temp = tempfile::tempdir().unwrap();
        let local = temp.path().join("artifact");
        std::fs::write(&local, b"data").unwrap();

        let transport = Transport::new("false").unwrap();
        match transport.upload(&local, "s3://nowhere/", false).await {
            Err(Error::TransferFailed(_)) => {}
            other => panic!("expected TransferFailed, got {:?}", other),
        }
    }
}
