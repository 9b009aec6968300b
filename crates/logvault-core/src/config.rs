//! Per-run configuration.
//!
//! Operator flags are collected into one immutable value at startup and
//! passed explicitly into each pipeline step; nothing reads ambient process
//! state after argument parsing.

use std::path::PathBuf;

/// Configuration for one backup run.
#[derive(Debug, Clone)]
pub struct BackupConfig {
    /// Object-storage base path, e.g. `s3://bucket/backups`
    pub bucket: String,
    /// Engine data directory holding one subdirectory per index
    pub data_dir: PathBuf,
    /// Explicit index date (`YYYY.mm.dd`); `None` means yesterday
    pub date: Option<String>,
    /// Transfer tool invocation prefix, run as `<cmd> <local> <remote> [-e]`
    pub transfer_cmd: String,
    /// Scratch directory for the archive and restore script
    pub temp_dir: PathBuf,
    /// Keep scratch artifacts after the run instead of deleting them
    pub persist: bool,
    /// Shard count frozen into the restore procedure
    pub shard_count: u32,
    /// Replica count frozen into the restore procedure
    pub replica_count: u32,
    /// Base URL of the source index engine
    pub engine_url: String,
    /// Scheduling niceness for the archiving step
    pub niceness: i32,
    /// Shell command the restore procedure runs to restart the target engine
    pub restart_cmd: String,
    /// Request server-side encryption on upload
    pub encrypt: bool,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            data_dir: PathBuf::new(),
            date: None,
            transfer_cmd: "s3cmd put".to_string(),
            temp_dir: PathBuf::from("/tmp"),
            persist: false,
            shard_count: 5,
            replica_count: 0,
            engine_url: "http://localhost:9200".to_string(),
            niceness: 19,
            restart_cmd: "service elasticsearch restart".to_string(),
            encrypt: false,
        }
    }
}

/// Configuration for one restore run.
#[derive(Debug, Clone)]
pub struct RestoreConfig {
    /// Object-storage base path the backup was uploaded under
    pub bucket: String,
    /// Engine data directory on the target node
    pub data_dir: PathBuf,
    /// Index date (`YYYY.mm.dd`); required, a restore never guesses
    pub date: String,
    /// Transfer tool invocation prefix, run as `<cmd> <remote> <local>`
    pub transfer_cmd: String,
    /// Scratch directory the artifacts are downloaded into
    pub temp_dir: PathBuf,
}

impl Default for RestoreConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            data_dir: PathBuf::new(),
            date: String::new(),
            transfer_cmd: "s3cmd get".to_string(),
            temp_dir: PathBuf::from("/tmp"),
        }
    }
}
