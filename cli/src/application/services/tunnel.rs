//! Application service: tunnel strategies.
//!
//! Both strategies plug into the same setup skeleton through
//! [`TunnelStrategy`]: `configure` prepares whatever the tunnel needs on the
//! host, `launch` starts it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{
    AssetSource, CommandRunner, LocalFs, ProgressReporter, ReleaseSource,
};
use crate::application::services::provision::ExitPolicy;
use crate::domain::config::TunnelOptions;
use crate::domain::error::RelayError;
use crate::domain::ini::IniDocument;
use crate::domain::layout::HostLayout;
use crate::domain::release::{RELAY_PLATFORM, select_asset};
use crate::domain::ssh::KeyPair;
use crate::domain::tunnel::{
    apply_relay_options, client_command, relay_args, render_command, reverse_tunnel_args,
};

/// Bundled relay client configuration, used when a release ships none.
pub const FRPC_INI_ASSET: &str = "frpc.ini";

/// Everything a strategy may read about the current run.
pub struct TunnelContext<'a> {
    pub options: &'a TunnelOptions,
    pub keys: &'a KeyPair,
    pub layout: &'a HostLayout,
    pub policy: ExitPolicy,
}

/// How the tunnel process ended up running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The tunnel runs in the background; `client_command` is what the
    /// operator runs locally to connect.
    Detached { client_command: String },
    /// The tunnel client exited: the relay client after running attached, or
    /// `ssh` when it failed before detaching.
    Exited { code: Option<i32> },
}

/// A way of connecting the notebook instance to the relay server.
#[allow(async_fn_in_trait)]
pub trait TunnelStrategy {
    /// Short name used in progress messages.
    fn name(&self) -> &'static str;

    /// Prepare the host for the tunnel.
    async fn configure(
        &self,
        ctx: &TunnelContext<'_>,
        reporter: &impl ProgressReporter,
    ) -> Result<()>;

    /// Start the tunnel.
    async fn launch(
        &self,
        ctx: &TunnelContext<'_>,
        reporter: &impl ProgressReporter,
    ) -> Result<LaunchOutcome>;
}

// ── Direct SSH ────────────────────────────────────────────────────────────────

/// Reverse port-forward with the stock ssh client.
pub struct DirectStrategy<'a, R: CommandRunner> {
    runner: &'a R,
}

impl<'a, R: CommandRunner> DirectStrategy<'a, R> {
    pub fn new(runner: &'a R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> TunnelStrategy for DirectStrategy<'_, R> {
    fn name(&self) -> &'static str {
        "ssh"
    }

    async fn configure(
        &self,
        _ctx: &TunnelContext<'_>,
        _reporter: &impl ProgressReporter,
    ) -> Result<()> {
        Ok(())
    }

    async fn launch(
        &self,
        ctx: &TunnelContext<'_>,
        reporter: &impl ProgressReporter,
    ) -> Result<LaunchOutcome> {
        let key_file_name = ctx
            .keys
            .private_source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let client = client_command(ctx.options, &key_file_name);

        let user = ctx.keys.login_user();
        let args = reverse_tunnel_args(ctx.options, &user, &ctx.layout.private_key());
        tracing::debug!(command = %render_command("ssh", &args), "starting reverse tunnel");

        reporter.step(&format!(
            "opening reverse tunnel to {user}@{}...",
            ctx.options.service_url
        ));
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        let status = self
            .runner
            .run_status("ssh", &arg_refs)
            .await
            .context("starting reverse tunnel")?;
        ctx.policy.check("ssh", status, reporter)?;
        if !status.success() {
            return Ok(LaunchOutcome::Exited {
                code: status.code(),
            });
        }

        reporter.success("tunnel running in the background");
        Ok(LaunchOutcome::Detached {
            client_command: client,
        })
    }
}

// ── Relay client ──────────────────────────────────────────────────────────────

/// Tunnel brokered by the frp relay client.
pub struct RelayStrategy<'a, R, S, F, A>
where
    R: CommandRunner,
    S: ReleaseSource,
    F: LocalFs,
    A: AssetSource,
{
    runner: &'a R,
    releases: &'a S,
    fs: &'a F,
    assets: &'a A,
}

impl<'a, R, S, F, A> RelayStrategy<'a, R, S, F, A>
where
    R: CommandRunner,
    S: ReleaseSource,
    F: LocalFs,
    A: AssetSource,
{
    pub fn new(runner: &'a R, releases: &'a S, fs: &'a F, assets: &'a A) -> Self {
        Self {
            runner,
            releases,
            fs,
            assets,
        }
    }

    /// Download the latest release and install it as `layout.relay_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Unavailable`] when no asset matches the platform,
    /// or an error if the download or unpacking fails.
    pub fn install(&self, layout: &HostLayout, reporter: &impl ProgressReporter) -> Result<()> {
        reporter.step("fetching latest relay release...");
        let release = self.releases.latest()?;
        let asset = select_asset(&release.assets, RELAY_PLATFORM).ok_or_else(|| {
            RelayError::Unavailable {
                platform: RELAY_PLATFORM.to_string(),
            }
        })?;

        reporter.step(&format!("downloading {}...", asset.name));
        let archive = self.releases.download(&asset.browser_download_url)?;

        self.fs.remove_dir_all(&layout.relay_dir)?;
        let staging = staging_dir(&layout.relay_dir);
        self.fs.remove_dir_all(&staging)?;
        self.fs.create_dir_all(&staging)?;

        let entries = self
            .fs
            .unpack_tar_gz(&archive, &staging)
            .with_context(|| format!("unpacking {}", asset.name))?;
        let top = entries
            .into_iter()
            .find(|p| self.fs.is_dir(p))
            .ok_or(RelayError::EmptyArchive)?;
        self.fs.rename(&top, &layout.relay_dir)?;
        self.fs.remove_dir_all(&staging)?;

        reporter.success(&format!(
            "relay {} installed",
            release.tag_name.as_deref().unwrap_or(&asset.name)
        ));
        Ok(())
    }

    /// Point `frpc.ini` at the relay server, starting from the bundled
    /// template when the release ships no INI file.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be read or written.
    pub fn write_config(&self, layout: &HostLayout, options: &TunnelOptions) -> Result<PathBuf> {
        let path = layout.relay_config();
        let text = if self.fs.exists(&path) {
            self.fs.read_to_string(&path)?
        } else {
            String::from_utf8_lossy(self.assets.get_asset(FRPC_INI_ASSET)?).into_owned()
        };

        let mut doc = IniDocument::parse(&text);
        apply_relay_options(&mut doc, options);
        self.fs
            .write(&path, doc.to_string().as_bytes())
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }
}

impl<R, S, F, A> TunnelStrategy for RelayStrategy<'_, R, S, F, A>
where
    R: CommandRunner,
    S: ReleaseSource,
    F: LocalFs,
    A: AssetSource,
{
    fn name(&self) -> &'static str {
        "frp"
    }

    async fn configure(
        &self,
        ctx: &TunnelContext<'_>,
        reporter: &impl ProgressReporter,
    ) -> Result<()> {
        self.install(ctx.layout, reporter)?;

        let binary = ctx.layout.relay_binary().display().to_string();
        let version_check = self
            .runner
            .run(&binary, &["-v"])
            .await
            .context("checking relay client")?;
        if version_check.status.success() {
            let version = String::from_utf8_lossy(&version_check.stdout);
            reporter.success(&format!("relay client {} ready", version.trim()));
        } else {
            reporter.warn("relay client did not report a version");
        }

        let path = self.write_config(ctx.layout, ctx.options)?;
        reporter.success(&format!("relay configured ({})", path.display()));
        Ok(())
    }

    async fn launch(
        &self,
        ctx: &TunnelContext<'_>,
        reporter: &impl ProgressReporter,
    ) -> Result<LaunchOutcome> {
        let binary = ctx.layout.relay_binary();
        let program = binary.display().to_string();
        let args = relay_args(&ctx.layout.relay_config());
        tracing::debug!(command = %render_command(&program, &args), "starting relay client");

        reporter.step(&format!(
            "relay client connecting to {}:{}...",
            ctx.options.service_url, ctx.options.service_port
        ));
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        let status = self
            .runner
            .run_status(&program, &arg_refs)
            .await
            .context("running relay client")?;
        ctx.policy.check(&program, status, reporter)?;

        Ok(LaunchOutcome::Exited {
            code: status.code(),
        })
    }
}

fn staging_dir(relay_dir: &Path) -> PathBuf {
    relay_dir.with_extension("download")
}
