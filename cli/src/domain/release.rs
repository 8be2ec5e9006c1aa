//! Relay release metadata and asset selection.

use serde::Deserialize;

/// Latest-release endpoint of the relay project.
pub const DEFAULT_RELEASES_URL: &str = "https://api.github.com/repos/fatedier/frp/releases/latest";

/// Platform tag the notebook instances run on.
pub const RELAY_PLATFORM: &str = "linux_amd64";

/// Release metadata as returned by the releases endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    #[serde(default)]
    pub tag_name: Option<String>,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// One downloadable file of a release.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
}

/// Pick the asset built for `platform`. When several match, the last one wins.
#[must_use]
pub fn select_asset<'a>(assets: &'a [ReleaseAsset], platform: &str) -> Option<&'a ReleaseAsset> {
    assets.iter().rev().find(|a| a.name.contains(platform))
}
