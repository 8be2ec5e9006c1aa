//! `colab-tunnel keys`: install key material without touching packages or
//! tunnels. Used to rotate keys on a live instance.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::application::services::keys::install_key_material;
use crate::application::services::provision::{DEFAULT_PYTHON, EnvironmentProvisioner};
use crate::commands::HostArgs;
use crate::infra::{EmbeddedAssets, HostFs, TokioCommandRunner};
use crate::output::{OutputContext, TerminalReporter};

/// Arguments for the keys command.
#[derive(Args, Debug)]
pub struct KeysArgs {
    /// Folder holding the key pair
    pub folder: PathBuf,

    #[command(flatten)]
    pub host: HostArgs,
}

/// Run `colab-tunnel keys <folder>`.
///
/// # Errors
///
/// Returns an error if the key pair cannot be found or installed.
pub async fn run(ctx: &OutputContext, args: &KeysArgs) -> Result<()> {
    let layout = args.host.layout();
    let runner = TokioCommandRunner;
    let reporter = TerminalReporter::new(ctx);
    let provisioner =
        EnvironmentProvisioner::new(&runner, &reporter, args.host.policy(), DEFAULT_PYTHON);

    let pair = install_key_material(
        &HostFs,
        &EmbeddedAssets,
        &provisioner,
        &reporter,
        &layout,
        &args.folder,
    )
    .await?;

    ctx.kv("Login user:", &pair.login_user());
    ctx.kv("Private key:", &layout.private_key().display().to_string());
    Ok(())
}
