//! Host filesystem layout written by a provisioning run.
//!
//! All fixed paths hang off one value so tests and dry runs can re-root them
//! under a scratch directory.

use std::path::{Path, PathBuf};

pub const SSHD_CONFIG_PATH: &str = "etc/ssh/sshd_config";
pub const SSH_DIR: &str = "root/.ssh";
pub const SHELL_PROFILE_PATH: &str = "root/.bashrc";
pub const RELAY_DIR: &str = "root/frp";

pub const AUTHORIZED_KEYS_FILE: &str = "authorized_keys";
pub const PRIVATE_KEY_FILE: &str = "private_key.pem";
pub const RELAY_BINARY: &str = "frpc";
pub const RELAY_CONFIG_FILE: &str = "frpc.ini";

/// Paths of the host-side artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostLayout {
    /// SSH daemon configuration, overwritten with the bundled template.
    pub sshd_config: PathBuf,
    /// SSH configuration directory of the login user (mode 0700).
    pub ssh_dir: PathBuf,
    /// Shell startup file that receives the environment exports.
    pub shell_profile: PathBuf,
    /// Install directory of the relay client.
    pub relay_dir: PathBuf,
}

impl HostLayout {
    /// The real host paths.
    #[must_use]
    pub fn system() -> Self {
        Self::under(Path::new("/"))
    }

    /// Every path re-rooted beneath `root`.
    #[must_use]
    pub fn under(root: &Path) -> Self {
        Self {
            sshd_config: root.join(SSHD_CONFIG_PATH),
            ssh_dir: root.join(SSH_DIR),
            shell_profile: root.join(SHELL_PROFILE_PATH),
            relay_dir: root.join(RELAY_DIR),
        }
    }

    #[must_use]
    pub fn authorized_keys(&self) -> PathBuf {
        self.ssh_dir.join(AUTHORIZED_KEYS_FILE)
    }

    #[must_use]
    pub fn private_key(&self) -> PathBuf {
        self.ssh_dir.join(PRIVATE_KEY_FILE)
    }

    #[must_use]
    pub fn relay_binary(&self) -> PathBuf {
        self.relay_dir.join(RELAY_BINARY)
    }

    #[must_use]
    pub fn relay_config(&self) -> PathBuf {
        self.relay_dir.join(RELAY_CONFIG_FILE)
    }
}
