//! Application service: descriptor loading.

use std::path::Path;

use anyhow::Result;

use crate::application::ports::LocalFs;
use crate::domain::config::{CONFIG_FILE_NAME, Descriptor, parse_descriptor};
use crate::domain::error::ConfigError;

/// Load `user_config.json` from the tunnel options folder.
///
/// # Errors
///
/// Returns [`ConfigError::FolderNotFound`] or [`ConfigError::NotFound`] when
/// the folder or file is missing, and [`ConfigError::Malformed`] when the file
/// does not parse.
pub fn load_descriptor(fs: &impl LocalFs, folder: &Path) -> Result<Descriptor> {
    if !fs.is_dir(folder) {
        return Err(ConfigError::FolderNotFound(folder.to_path_buf()).into());
    }

    let path = folder.join(CONFIG_FILE_NAME);
    if !fs.exists(&path) {
        return Err(ConfigError::NotFound(path).into());
    }

    let text = fs.read_to_string(&path)?;
    parse_descriptor(&text).map_err(|e| {
        ConfigError::Malformed {
            path,
            reason: e.to_string(),
        }
        .into()
    })
}
