//! Application service: the shared setup skeleton.
//!
//! `load → provision → resolve keys → configure → launch`, identical for every
//! tunnel strategy. Imports only from `crate::domain` and
//! `crate::application`.

use std::path::Path;

use anyhow::Result;

use crate::application::ports::{AssetSource, CommandRunner, LocalFs, ProgressReporter};
use crate::application::services::config::load_descriptor;
use crate::application::services::keys::install_key_material;
use crate::application::services::provision::{EnvironmentProvisioner, ExitPolicy};
use crate::application::services::tunnel::{LaunchOutcome, TunnelContext, TunnelStrategy};
use crate::domain::layout::HostLayout;

/// Inputs of one provisioning run.
pub struct SetupOptions<'a> {
    /// Mounted folder holding `user_config.json` and the key pair.
    pub folder: &'a Path,
    pub layout: &'a HostLayout,
    pub policy: ExitPolicy,
    /// Interpreter used for `-m pip`.
    pub python: &'a str,
}

/// Run the full setup and start the tunnel with `strategy`.
///
/// The descriptor is loaded before anything is installed, so a missing or
/// malformed config leaves the host untouched.
///
/// # Errors
///
/// Returns the first error of any step; nothing is retried or rolled back.
pub async fn setup_tunnel<R: CommandRunner, P: ProgressReporter>(
    strategy: &impl TunnelStrategy,
    runner: &R,
    fs: &impl LocalFs,
    assets: &impl AssetSource,
    reporter: &P,
    opts: SetupOptions<'_>,
) -> Result<LaunchOutcome> {
    let SetupOptions {
        folder,
        layout,
        policy,
        python,
    } = opts;

    let descriptor = load_descriptor(fs, folder)?;
    reporter.success(&format!(
        "loaded config for {}:{}",
        descriptor.tunnel_options.service_url, descriptor.tunnel_options.service_port
    ));

    let provisioner = EnvironmentProvisioner::new(runner, reporter, policy, python);
    provisioner.provision(&descriptor).await?;

    let keys = install_key_material(fs, assets, &provisioner, reporter, layout, folder).await?;

    let ctx = TunnelContext {
        options: &descriptor.tunnel_options,
        keys: &keys,
        layout,
        policy,
    };
    reporter.step(&format!("configuring {} tunnel...", strategy.name()));
    strategy.configure(&ctx, reporter).await?;
    strategy.launch(&ctx, reporter).await
}
