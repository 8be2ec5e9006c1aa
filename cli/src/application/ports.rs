//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};

use anyhow::Result;

use crate::domain::release::Release;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with inherited stdio and return only its exit status.
    ///
    /// Used for long-running, attached processes (package installs, the
    /// tunnel clients) whose output belongs on the operator's terminal.
    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Release Port ──────────────────────────────────────────────────────────────

/// Abstracts the relay release endpoint and asset downloads.
pub trait ReleaseSource {
    /// Fetch metadata of the latest release.
    fn latest(&self) -> Result<Release>;
    /// Download an asset and return its bytes.
    fn download(&self, url: &str) -> Result<Vec<u8>>;
}

// ── Asset Port ────────────────────────────────────────────────────────────────

/// Abstracts the templates bundled with the binary.
pub trait AssetSource {
    /// Get the raw bytes of a bundled template.
    fn get_asset(&self, name: &str) -> Result<&'static [u8]>;
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Abstracts host filesystem operations.
pub trait LocalFs {
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    /// Entries of a directory, sorted by file name.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;
    fn read(&self, path: &Path) -> Result<Vec<u8>>;
    fn read_to_string(&self, path: &Path) -> Result<String>;
    /// Write `content`, creating parent directories as needed.
    fn write(&self, path: &Path, content: &[u8]) -> Result<()>;
    /// Append `content`, creating the file and its parents as needed.
    fn append(&self, path: &Path, content: &[u8]) -> Result<()>;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    /// Remove a directory tree; a missing directory is not an error.
    fn remove_dir_all(&self, path: &Path) -> Result<()>;
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;
    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()>;
    /// Unpack a gzip-compressed tar archive into `dest` and return the
    /// top-level entries it created, sorted by name.
    fn unpack_tar_gz(&self, archive: &[u8], dest: &Path) -> Result<Vec<PathBuf>>;
}
