//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors raised while locating and parsing the JSON descriptor.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Tunnel options folder does not exist: {}", .0.display())]
    FolderNotFound(PathBuf),

    #[error("Config file does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Config file {} is malformed: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },
}

// ── Key errors ────────────────────────────────────────────────────────────────

/// Errors raised during key material resolution.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error(
        "Public/private keys not found or malformed in {}: missing {missing}",
        folder.display()
    )]
    MissingKeyMaterial {
        folder: PathBuf,
        missing: &'static str,
    },
}

// ── Relay errors ──────────────────────────────────────────────────────────────

/// Errors raised while preparing the relay client.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("No relay release asset found for platform '{platform}'")]
    Unavailable { platform: String },

    #[error("Relay archive did not contain a top-level directory")]
    EmptyArchive,
}

// ── Command errors ────────────────────────────────────────────────────────────

/// Errors raised by external processes when exit codes are enforced.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("'{program}' exited with status {code}")]
    Failed { program: String, code: i32 },
}
