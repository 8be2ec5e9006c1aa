//! Shared mock infrastructure for unit tests.
//!
//! Provides a recording [`CommandRunner`], a recording [`ProgressReporter`]
//! and an in-memory [`ReleaseSource`] so each test file doesn't have to
//! re-define the same boilerplate.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::process::{ExitStatus, Output};

use anyhow::Result;
use colab_tunnel::application::ports::{CommandRunner, ProgressReporter, ReleaseSource};
use colab_tunnel::domain::release::{Release, ReleaseAsset};

use crate::helpers::{exit_status, ok_output};

// ── Mock: command runner ─────────────────────────────────────────────────────

/// Records every command line and answers with configurable exit codes.
#[derive(Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<String>>,
    exit_codes: HashMap<String, i32>,
    unspawnable: Vec<String>,
    version_output: Vec<u8>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self {
            version_output: b"0.61.0\n".to_vec(),
            ..Self::default()
        }
    }

    /// Make every invocation of `program` exit with `code`.
    #[must_use]
    pub fn exiting(mut self, program: &str, code: i32) -> Self {
        self.exit_codes.insert(program.to_string(), code);
        self
    }

    /// Make every invocation of `program` fail to spawn.
    #[must_use]
    pub fn unspawnable(mut self, program: &str) -> Self {
        self.unspawnable.push(program.to_string());
        self
    }

    /// Command lines seen so far, as `program arg1 arg2 ...`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, program: &str, args: &[&str]) -> Result<ExitStatus> {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        self.calls.borrow_mut().push(line);

        if self.unspawnable.iter().any(|p| p == program) {
            anyhow::bail!("failed to spawn {program}: No such file or directory");
        }
        let name = program.rsplit('/').next().unwrap_or(program);
        let code = self
            .exit_codes
            .get(program)
            .or_else(|| self.exit_codes.get(name))
            .copied()
            .unwrap_or(0);
        Ok(exit_status(code))
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        let status = self.record(program, args)?;
        let mut output = ok_output(&self.version_output);
        output.status = status;
        Ok(output)
    }

    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus> {
        self.record(program, args)
    }
}

// ── Mock: progress reporter ──────────────────────────────────────────────────

/// Collects progress events as `step: ...`, `ok: ...` and `warn: ...`.
#[derive(Default)]
pub struct RecordingReporter {
    events: RefCell<Vec<String>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| e.strip_prefix("warn: ").map(String::from))
            .collect()
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.events.borrow_mut().push(format!("step: {message}"));
    }
    fn success(&self, message: &str) {
        self.events.borrow_mut().push(format!("ok: {message}"));
    }
    fn warn(&self, message: &str) {
        self.events.borrow_mut().push(format!("warn: {message}"));
    }
}

// ── Mock: release source ─────────────────────────────────────────────────────

/// Serves a fixed release and answers every download with the same archive.
pub struct FakeReleases {
    release: Release,
    archive: Vec<u8>,
    downloads: RefCell<Vec<String>>,
}

impl FakeReleases {
    pub fn new(asset_names: &[&str], archive: Vec<u8>) -> Self {
        let assets = asset_names
            .iter()
            .map(|name| ReleaseAsset {
                name: (*name).to_string(),
                browser_download_url: format!("https://dl.example.com/{name}"),
            })
            .collect();
        Self {
            release: Release {
                tag_name: Some("v0.61.0".to_string()),
                assets,
            },
            archive,
            downloads: RefCell::new(Vec::new()),
        }
    }

    pub fn downloads(&self) -> Vec<String> {
        self.downloads.borrow().clone()
    }
}

impl ReleaseSource for FakeReleases {
    fn latest(&self) -> Result<Release> {
        Ok(self.release.clone())
    }

    fn download(&self, url: &str) -> Result<Vec<u8>> {
        self.downloads.borrow_mut().push(url.to_string());
        Ok(self.archive.clone())
    }
}
