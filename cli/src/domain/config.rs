//! Domain types for the JSON descriptor (`user_config.json`).
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use serde::Deserialize;

// ── Constants ────────────────────────────────────────────────────────────────

/// File name of the descriptor inside the tunnel options folder.
pub const CONFIG_FILE_NAME: &str = "user_config.json";

/// Package that every run installs before any caller-specified package.
pub const MANDATORY_OS_PACKAGE: &str = "openssh-server";

// ── Descriptor schema ────────────────────────────────────────────────────────

/// Parsed `user_config.json`. Read-only after loading.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Descriptor {
    /// Packages installed with `pip`.
    #[serde(default)]
    pub python_packages: Vec<String>,
    /// Packages installed with the OS package manager.
    #[serde(default)]
    pub os_packages: Vec<String>,
    /// Relay connection parameters.
    pub tunnel_options: TunnelOptions,
}

/// Connection parameters for the relay server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TunnelOptions {
    /// Host name or address of the relay server.
    pub service_url: String,
    /// Port on the relay server that forwards back to this instance.
    pub service_port: u16,
    /// Port the operator's client opens locally (direct) or the port the
    /// relay exposes for this instance (relay).
    pub local_port: u16,
}

/// Parse descriptor JSON text.
///
/// # Errors
///
/// Returns the `serde_json` error if the text is not valid JSON or does not
/// match the descriptor schema.
pub fn parse_descriptor(text: &str) -> Result<Descriptor, serde_json::Error> {
    serde_json::from_str(text)
}

// ── Unit tests ───────────────────────────────────────────────────────────────
