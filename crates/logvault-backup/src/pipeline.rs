//! The backup pipeline.

use std::path::Path;

use logvault_core::{BackupConfig, IndexIdentity, Result, SettingsDocument};
use tracing::{info, warn};

use crate::{archive, script, transport, MetadataCapturer, Transport};

/// What a completed backup produced.
#[derive(Debug)]
pub struct BackupOutcome {
    pub identity: IndexIdentity,
    /// Remote directory both artifacts were uploaded under
    pub remote_target: String,
}

/// Run one backup end to end.
///
/// Steps, in order: resolve the identity, verify the index directory on
/// disk (before any network call), capture the mapping, archive the index,
/// synthesize the restore script, upload both artifacts, clean up the
/// scratch files. The first failing step aborts the run; cleanup still runs
/// after an upload failure unless `persist` is set.
pub async fn run_backup(config: &BackupConfig) -> Result<BackupOutcome> {
    let identity = IndexIdentity::resolve(config.date.as_deref())?;
    info!("starting backup of {}", identity.name);

    archive::ensure_index_dir(&config.data_dir, &identity)?;

    let capturer = MetadataCapturer::new(&config.engine_url)?;
    let settings = capturer
        .capture(&identity, config.shard_count, config.replica_count)
        .await?;

    let transport = Transport::new(&config.transfer_cmd)?;
    let remote_target = transport::remote_target(&config.bucket, &identity);

    // Scratch paths are fixed by the identity, so a failed archive or
    // synthesis step still leaves something cleanup knows how to remove.
    let archive_path = config.temp_dir.join(identity.archive_file_name());
    let script_path = config.temp_dir.join(identity.script_file_name());

    let produced =
        produce_and_upload(config, &identity, &settings, &transport, &remote_target).await;

    if config.persist {
        info!(
            "persisting scratch artifacts: {} {}",
            archive_path.display(),
            script_path.display()
        );
    } else {
        cleanup(&[&archive_path, &script_path]);
    }

    produced?;
    info!("backup of {} uploaded under {}", identity.name, remote_target);

    Ok(BackupOutcome {
        identity,
        remote_target,
    })
}

/// Create both scratch artifacts and upload them. Split out so the caller
/// can run cleanup no matter which step failed.
async fn produce_and_upload(
    config: &BackupConfig,
    identity: &IndexIdentity,
    settings: &SettingsDocument,
    transport: &Transport,
    remote_target: &str,
) -> Result<()> {
    let archive_path = archive::create_archive(
        &config.data_dir,
        identity,
        &config.temp_dir,
        config.niceness,
    )
    .await?;

    let script_path = script::write(
        identity,
        settings,
        &config.engine_url,
        &config.data_dir,
        &config.restart_cmd,
        &config.temp_dir,
    )?;

    let archive_remote = format!("{}{}", remote_target, identity.archive_file_name());
    transport
        .upload(&archive_path, &archive_remote, config.encrypt)
        .await?;

    let script_remote = format!("{}{}", remote_target, identity.script_file_name());
    transport
        .upload(&script_path, &script_remote, config.encrypt)
        .await?;

    Ok(())
}

/// Best-effort removal of scratch files.
pub(crate) fn cleanup(paths: &[&Path]) {
    for path in paths {
        match std::fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("failed to remove {}: {}", path.display(), e),
        }
    }
}
