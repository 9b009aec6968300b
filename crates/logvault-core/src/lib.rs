//! Shared types for logvault.
//!
//! This crate holds the leaf vocabulary of the backup/restore pipeline:
//! the date-derived index identity, the captured settings document, the
//! immutable per-run configuration, and the error taxonomy.

pub mod config;
pub mod error;
pub mod identity;
pub mod settings;

pub use config::{BackupConfig, RestoreConfig};
pub use error::{Error, Result};
pub use identity::IndexIdentity;
pub use settings::SettingsDocument;
