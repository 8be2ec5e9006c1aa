//! `colab-tunnel direct`: reverse tunnel with the stock ssh client.

use anyhow::Result;

use crate::application::services::setup::setup_tunnel;
use crate::application::services::tunnel::DirectStrategy;
use crate::commands::{TunnelArgs, render_outcome};
use crate::infra::{EmbeddedAssets, HostFs, TokioCommandRunner};
use crate::output::{OutputContext, TerminalReporter};

/// Run `colab-tunnel direct <folder>`.
///
/// # Errors
///
/// Returns an error if any setup step fails.
pub async fn run(ctx: &OutputContext, args: &TunnelArgs) -> Result<()> {
    let layout = args.host.layout();
    let runner = TokioCommandRunner;
    let reporter = TerminalReporter::new(ctx);
    let strategy = DirectStrategy::new(&runner);

    let outcome = setup_tunnel(
        &strategy,
        &runner,
        &HostFs,
        &EmbeddedAssets,
        &reporter,
        args.setup_options(&layout),
    )
    .await?;

    render_outcome(ctx, &outcome);
    Ok(())
}
