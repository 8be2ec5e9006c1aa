//! `colab-tunnel relay`: tunnel brokered by the frp relay client.

use anyhow::Result;
use clap::Args;

use crate::application::services::setup::setup_tunnel;
use crate::application::services::tunnel::RelayStrategy;
use crate::commands::{TunnelArgs, render_outcome};
use crate::domain::release::DEFAULT_RELEASES_URL;
use crate::infra::{EmbeddedAssets, GithubReleaseSource, HostFs, TokioCommandRunner};
use crate::output::{OutputContext, TerminalReporter};

/// Arguments for the relay command.
#[derive(Args, Debug)]
pub struct RelayArgs {
    #[command(flatten)]
    pub tunnel: TunnelArgs,

    /// Endpoint returning the latest relay release metadata
    #[arg(
        long,
        env = "COLAB_TUNNEL_RELEASES_URL",
        default_value = DEFAULT_RELEASES_URL,
        value_name = "URL"
    )]
    pub releases_url: String,
}

/// Run `colab-tunnel relay <folder>`. Blocks while the relay client runs.
///
/// # Errors
///
/// Returns an error if any setup step fails or no relay build exists for
/// this platform.
pub async fn run(ctx: &OutputContext, args: &RelayArgs) -> Result<()> {
    let layout = args.tunnel.host.layout();
    let runner = TokioCommandRunner;
    let releases = GithubReleaseSource::new(args.releases_url.as_str());
    let reporter = TerminalReporter::new(ctx);
    let strategy = RelayStrategy::new(&runner, &releases, &HostFs, &EmbeddedAssets);

    let outcome = setup_tunnel(
        &strategy,
        &runner,
        &HostFs,
        &EmbeddedAssets,
        &reporter,
        args.tunnel.setup_options(&layout),
    )
    .await?;

    render_outcome(ctx, &outcome);
    Ok(())
}
