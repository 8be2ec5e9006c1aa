//! Embedded assets: the templates compiled into the binary.
//!
//! At compile time, `include_dir!` embeds everything under `assets/`:
//!   - `sshd_config`: replaces the host's SSH daemon configuration
//!   - `env_exports`: appended to the shell startup file
//!   - `frpc.ini`:    relay client config for releases that ship none

use anyhow::Result;
use include_dir::{Dir, include_dir};

use crate::application::ports::AssetSource;

static EMBEDDED_ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets");

/// Production `AssetSource` backed by the embedded templates.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedAssets;

impl AssetSource for EmbeddedAssets {
    fn get_asset(&self, name: &str) -> Result<&'static [u8]> {
        get_asset(name)
    }
}

/// Return the raw bytes of a single embedded asset.
///
/// # Errors
///
/// Returns an error if no asset with the given `name` exists.
pub fn get_asset(name: &str) -> Result<&'static [u8]> {
    EMBEDDED_ASSETS
        .get_file(name)
        .map(|f| f.contents())
        .ok_or_else(|| anyhow::anyhow!("embedded asset not found: {name}"))
}
