//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, filesystem
//! access, embedded templates, and release downloads.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod assets;
pub mod command_runner;
pub mod fs;
pub mod release;

pub use assets::EmbeddedAssets;
pub use command_runner::TokioCommandRunner;
pub use fs::HostFs;
pub use release::GithubReleaseSource;
