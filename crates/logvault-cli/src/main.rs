//! Logvault command-line tool.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use logvault_core::{BackupConfig, RestoreConfig};
use tracing_subscriber::EnvFilter;

/// Backup and restore for date-partitioned search indices
#[derive(Parser, Debug)]
#[command(name = "logvault")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Back up one index (data files + live mapping) to object storage
    Backup(BackupArgs),

    /// Fetch a backed-up index and replay its restore procedure
    Restore(RestoreArgs),
}

#[derive(Args, Debug)]
struct BackupArgs {
    /// Object-storage base path, e.g. s3://bucket/backups
    #[arg(long)]
    bucket: String,

    /// Engine data directory holding one subdirectory per index
    #[arg(long)]
    data_dir: PathBuf,

    /// Index date (YYYY.mm.dd); defaults to yesterday in host-local time
    #[arg(long)]
    date: Option<String>,

    /// Transfer tool invocation prefix, run as `<cmd> <local> <remote> [-e]`
    #[arg(long, default_value = "s3cmd put")]
    transfer_cmd: String,

    /// Scratch directory for the archive and restore script
    #[arg(long, default_value = "/tmp")]
    temp_dir: PathBuf,

    /// Keep the scratch artifacts after upload instead of deleting them
    #[arg(long)]
    persist: bool,

    /// Shard count frozen into the restore procedure
    #[arg(long, default_value_t = 5)]
    shards: u32,

    /// Replica count frozen into the restore procedure
    #[arg(long, default_value_t = 0)]
    replicas: u32,

    /// Base URL of the source index engine
    #[arg(long, default_value = "http://localhost:9200")]
    engine_url: String,

    /// Scheduling niceness for the archiving step
    #[arg(long, default_value_t = 19)]
    niceness: i32,

    /// Shell command the restore procedure runs to restart the target engine
    #[arg(long, default_value = "service elasticsearch restart")]
    restart_cmd: String,

    /// Request server-side encryption on upload
    #[arg(long)]
    encrypt: bool,
}

#[derive(Args, Debug)]
struct RestoreArgs {
    /// Object-storage base path the backup was uploaded under
    #[arg(long)]
    bucket: String,

    /// Engine data directory on the target node
    #[arg(long)]
    data_dir: PathBuf,

    /// Index date (YYYY.mm.dd) of the backup to restore
    #[arg(long)]
    date: String,

    /// Transfer tool invocation prefix, run as `<cmd> <remote> <local>`
    #[arg(long, default_value = "s3cmd get")]
    transfer_cmd: String,

    /// Scratch directory the artifacts are downloaded into
    #[arg(long, default_value = "/tmp")]
    temp_dir: PathBuf,

    /// Accepted for symmetry with backup; the engine URL that matters is the
    /// one frozen into the restore script at backup time
    #[arg(long, hide = true)]
    engine_url: Option<String>,

    /// Accepted for symmetry with backup; restore has no archiving step to
    /// deprioritize
    #[arg(long, hide = true)]
    niceness: Option<i32>,
}

#[tokio::main]
async fn main() {
    init_tracing();

    // Exit 1 for missing or malformed arguments (clap defaults to 2), but
    // keep --help and --version as successes.
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        let _ = e.print();
        std::process::exit(parse_error_exit_code(&e))
    });

    if let Err(e) = run(cli).await {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn parse_error_exit_code(e: &clap::Error) -> i32 {
    use clap::error::ErrorKind;

    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Backup(args) => {
            let config = BackupConfig {
                bucket: args.bucket,
                data_dir: args.data_dir,
                date: args.date,
                transfer_cmd: args.transfer_cmd,
                temp_dir: args.temp_dir,
                persist: args.persist,
                shard_count: args.shards,
                replica_count: args.replicas,
                engine_url: args.engine_url,
                niceness: args.niceness,
                restart_cmd: args.restart_cmd,
                encrypt: args.encrypt,
            };
            let outcome = logvault_backup::run_backup(&config).await?;
            println!(
                "backed up {} to {}",
                outcome.identity.name, outcome.remote_target
            );
        }
        Commands::Restore(args) => {
            if args.engine_url.is_some() {
                tracing::warn!(
                    "--engine-url is ignored on restore; the script uses the URL captured at backup time"
                );
            }
            if args.niceness.is_some() {
                tracing::warn!("--niceness is ignored on restore; only backup archives");
            }
            let config = RestoreConfig {
                bucket: args.bucket,
                data_dir: args.data_dir,
                date: args.date,
                transfer_cmd: args.transfer_cmd,
                temp_dir: args.temp_dir,
            };
            logvault_backup::run_restore(&config).await?;
            println!("restore completed");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_help_and_version_exit_zero() {
        let err = Cli::try_parse_from(["logvault", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert_eq!(parse_error_exit_code(&err), 0);

        let err = Cli::try_parse_from(["logvault", "--version"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
        assert_eq!(parse_error_exit_code(&err), 0);
    }

    #[test]
    fn test_missing_required_args_exit_one() {
        let err = Cli::try_parse_from(["logvault", "backup"]).unwrap_err();
        assert_eq!(parse_error_exit_code(&err), 1);

        let err = Cli::try_parse_from(["logvault"]).unwrap_err();
        assert_eq!(parse_error_exit_code(&err), 1);
    }

    #[test]
    fn test_restore_accepts_full_flag_surface() {
        let cli = Cli::try_parse_from([
            "logvault",
            "restore",
            "--bucket",
            "s3://bucket/backups",
            "--data-dir",
            "/var/lib/engine/data",
            "--date",
            "2013.07.01",
            "--temp-dir",
            "/tmp",
            "--transfer-cmd",
            "s3cmd get",
            "--engine-url",
            "http://localhost:9200",
            "--niceness",
            "10",
        ])
        .unwrap();

        match cli.command {
            Commands::Restore(args) => {
                assert_eq!(args.date, "2013.07.01");
                assert_eq!(args.niceness, Some(10));
                assert_eq!(args.engine_url.as_deref(), Some("http://localhost:9200"));
            }
            _ => panic!("expected the restore subcommand"),
        }
    }
}
