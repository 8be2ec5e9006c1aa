//! Application service: key material resolution and SSH server setup.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{AssetSource, CommandRunner, LocalFs, ProgressReporter};
use crate::application::services::provision::EnvironmentProvisioner;
use crate::domain::layout::HostLayout;
use crate::domain::ssh::{KeyPair, find_key_pair};

/// Bundled SSH daemon configuration.
pub const SSHD_CONFIG_ASSET: &str = "sshd_config";
/// Bundled shell environment exports.
pub const ENV_EXPORTS_ASSET: &str = "env_exports";

/// Sniff every entry of `folder` for the key pair.
///
/// Entries that cannot be read (directories, unreadable files) are skipped.
///
/// # Errors
///
/// Returns an error if the folder cannot be listed, or
/// [`crate::domain::KeyError::MissingKeyMaterial`] if either half is missing.
pub fn resolve_key_pair(fs: &impl LocalFs, folder: &Path) -> Result<KeyPair> {
    let entries = fs.read_dir(folder)?;
    let candidates = entries
        .into_iter()
        .filter_map(|path| fs.read(&path).ok().map(|bytes| (path, bytes)));
    Ok(find_key_pair(folder, candidates)?)
}

/// Write the normalized key pair into the SSH configuration directory.
///
/// # Errors
///
/// Returns an error if any file or directory cannot be written.
pub fn write_key_pair(fs: &impl LocalFs, layout: &HostLayout, pair: &KeyPair) -> Result<()> {
    fs.create_dir_all(&layout.ssh_dir)?;
    fs.set_permissions(&layout.ssh_dir, 0o700)?;

    let authorized_keys = layout.authorized_keys();
    fs.write(&authorized_keys, format!("{}\n", pair.public_text).as_bytes())?;
    fs.set_permissions(&authorized_keys, 0o600)?;

    let private_key = layout.private_key();
    fs.write(&private_key, pair.private_text.as_bytes())?;
    fs.set_permissions(&private_key, 0o600)?;
    Ok(())
}

/// Resolve the key pair from `folder` and turn the host into an SSH server
/// that accepts it.
///
/// Keys are resolved before the host is touched, so a folder without usable
/// keys leaves the SSH configuration as it was.
///
/// # Errors
///
/// Returns an error if key resolution fails, a bundled template is missing,
/// a file cannot be written, or the SSH restart fails under the strict policy.
pub async fn install_key_material<R: CommandRunner, P: ProgressReporter>(
    fs: &impl LocalFs,
    assets: &impl AssetSource,
    provisioner: &EnvironmentProvisioner<'_, R, P>,
    reporter: &P,
    layout: &HostLayout,
    folder: &Path,
) -> Result<KeyPair> {
    reporter.step("looking for key material...");
    let pair = resolve_key_pair(fs, folder)?;
    reporter.success(&format!(
        "found public key {} and private key {}",
        display_name(&pair.public_source_path),
        display_name(&pair.private_source_path),
    ));

    reporter.step("configuring ssh server...");
    fs.write(&layout.sshd_config, assets.get_asset(SSHD_CONFIG_ASSET)?)
        .context("installing sshd_config")?;
    provisioner.restart_service("ssh").await?;

    fs.append(&layout.shell_profile, assets.get_asset(ENV_EXPORTS_ASSET)?)
        .context("appending environment exports")?;

    write_key_pair(fs, layout, &pair)?;
    reporter.success("ssh keys installed");
    Ok(pair)
}

fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    )
}
