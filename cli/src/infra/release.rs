//! Release infrastructure: implements `ReleaseSource` over HTTP.

use std::io::Read;

use anyhow::{Context, Result};

use crate::application::ports::ReleaseSource;
use crate::domain::release::{DEFAULT_RELEASES_URL, Release};

/// Largest archive accepted from the download endpoint.
const MAX_ARCHIVE_BYTES: u64 = 100 * 1024 * 1024;

/// Reads relay releases from a GitHub-style `releases/latest` endpoint.
pub struct GithubReleaseSource {
    url: String,
}

impl GithubReleaseSource {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Default for GithubReleaseSource {
    fn default() -> Self {
        Self::new(DEFAULT_RELEASES_URL)
    }
}

impl ReleaseSource for GithubReleaseSource {
    fn latest(&self) -> Result<Release> {
        tracing::debug!(url = %self.url, "fetching release metadata");
        let body = ureq::get(&self.url)
            .set("Accept", "application/vnd.github+json")
            .call()
            .with_context(|| format!("failed to query {}", self.url))?
            .into_string()
            .context("failed to read release metadata")?;
        parse_release(&body)
    }

    fn download(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!(url, "downloading release asset");
        let response = ureq::get(url)
            .call()
            .with_context(|| format!("failed to download {url}"))?;

        let mut data = Vec::new();
        response
            .into_reader()
            .take(MAX_ARCHIVE_BYTES)
            .read_to_end(&mut data)
            .context("failed to read release asset")?;
        Ok(data)
    }
}

pub(crate) fn parse_release(body: &str) -> Result<Release> {
    serde_json::from_str(body).context("invalid release metadata")
}
