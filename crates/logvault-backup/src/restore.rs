//! The restore orchestrator.
//!
//! Restore downloads the artifact pair for one index, verifies the restore
//! script actually arrived, and hands control to it. The script is owned by
//! the backup run that synthesized it and is treated here as opaque and
//! trusted; the archive's absence is the script's own check, not ours.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use logvault_core::{Error, IndexIdentity, RestoreConfig, Result};
use tokio::process::Command;
use tracing::{info, warn};

use crate::pipeline::cleanup;
use crate::{transport, Transport};

/// Run one restore end to end.
///
/// Both temporary files are removed afterwards regardless of how the script
/// run turned out.
pub async fn run_restore(config: &RestoreConfig) -> Result<()> {
    let identity = IndexIdentity::resolve(Some(&config.date))?;
    info!("starting restore of {}", identity.name);

    let archive_local = config.temp_dir.join(identity.archive_file_name());
    let script_local = config.temp_dir.join(identity.script_file_name());

    let result = fetch_and_execute(config, &identity, &archive_local, &script_local).await;

    cleanup(&[&archive_local, &script_local]);

    result
}

async fn fetch_and_execute(
    config: &RestoreConfig,
    identity: &IndexIdentity,
    archive_local: &Path,
    script_local: &Path,
) -> Result<()> {
    if !config.data_dir.is_dir() {
        warn!(
            "data directory {} does not exist on this node; the script extracts into the root captured at backup time",
            config.data_dir.display()
        );
    }

    let transport = Transport::new(&config.transfer_cmd)?;
    let remote_target = transport::remote_target(&config.bucket, identity);

    // A failed archive download is not fatal here: the script reports the
    // missing archive itself, with the index already checked for conflicts.
    let archive_remote = format!("{}{}", remote_target, identity.archive_file_name());
    if let Err(e) = transport.download(&archive_remote, archive_local).await {
        warn!("archive download failed: {}", e);
    }

    let script_remote = format!("{}{}", remote_target, identity.script_file_name());
    if let Err(e) = transport.download(&script_remote, script_local).await {
        warn!("restore script download failed: {}", e);
    }

    // The script is the one artifact we cannot proceed without.
    if !script_local.is_file() {
        return Err(Error::ArtifactMissing(format!(
            "restore script {} not found after download from {}",
            script_local.display(),
            remote_target
        )));
    }

    execute_script(script_local, &config.temp_dir).await
}

/// Grant the script execute permission and run it synchronously, with the
/// temp dir as working directory so it finds the archive alongside itself.
async fn execute_script(script_local: &Path, temp_dir: &Path) -> Result<()> {
    std::fs::set_permissions(script_local, std::fs::Permissions::from_mode(0o755))?;

    let script_abs: PathBuf = script_local.canonicalize()?;
    info!("executing restore script {}", script_abs.display());

    let status = Command::new(&script_abs)
        .current_dir(temp_dir)
        .status()
        .await?;

    if !status.success() {
        return Err(Error::RestoreFailed(status.code().unwrap_or(-1)));
    }

    info!("restore script completed");
    Ok(())
}
