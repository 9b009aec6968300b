//! Backup and restore pipeline for date-partitioned search indices.
//!
//! One backup invocation captures an index's on-disk files and its live
//! mapping into a paired archive + executable restore script, then ships
//! both to object storage through an external transfer tool. The restore
//! invocation pulls the pair back and replays the script against a target
//! node. Every run is a finite, sequential list of steps with a single
//! success/failure outcome; the first failing step halts the run.

pub mod archive;
pub mod metadata;
pub mod pipeline;
pub mod restore;
pub mod script;
pub mod transport;

pub use metadata::MetadataCapturer;
pub use pipeline::{run_backup, BackupOutcome};
pub use restore::run_restore;
pub use transport::Transport;
