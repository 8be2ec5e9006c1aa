//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod ini;
pub mod layout;
pub mod release;
pub mod ssh;
pub mod tunnel;

pub use config::{Descriptor, TunnelOptions};
pub use error::{CommandError, ConfigError, KeyError, RelayError};
pub use layout::HostLayout;
pub use ssh::KeyPair;
