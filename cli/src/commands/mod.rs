//! Command implementations

pub mod direct;
pub mod keys;
pub mod relay;
pub mod version;

use std::path::PathBuf;

use clap::Args;

use crate::application::services::provision::{DEFAULT_PYTHON, ExitPolicy};
use crate::application::services::setup::SetupOptions;
use crate::application::services::tunnel::LaunchOutcome;
use crate::domain::layout::HostLayout;
use crate::output::OutputContext;

/// Arguments shared by every command that touches the host.
#[derive(Args, Debug)]
pub struct HostArgs {
    /// Re-root /etc/ssh and /root under this directory (dry runs, tests)
    #[arg(long, env = "COLAB_TUNNEL_ROOT", value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Abort when a package install, service restart or tunnel launch fails
    #[arg(long)]
    pub strict: bool,
}

impl HostArgs {
    /// Host layout selected by `--root`.
    #[must_use]
    pub fn layout(&self) -> HostLayout {
        self.root
            .as_deref()
            .map_or_else(HostLayout::system, HostLayout::under)
    }

    #[must_use]
    pub fn policy(&self) -> ExitPolicy {
        ExitPolicy::from_strict(self.strict)
    }
}

/// Arguments shared by the tunnel commands.
#[derive(Args, Debug)]
pub struct TunnelArgs {
    /// Mounted folder holding user_config.json and the key pair
    pub folder: PathBuf,

    #[command(flatten)]
    pub host: HostArgs,

    /// Python interpreter used to install python packages
    #[arg(long, default_value = DEFAULT_PYTHON, value_name = "BIN")]
    pub python: String,
}

impl TunnelArgs {
    #[must_use]
    pub fn setup_options<'a>(&'a self, layout: &'a HostLayout) -> SetupOptions<'a> {
        SetupOptions {
            folder: &self.folder,
            layout,
            policy: self.host.policy(),
            python: &self.python,
        }
    }
}

/// Print the result of a tunnel launch.
pub fn render_outcome(ctx: &OutputContext, outcome: &LaunchOutcome) {
    match outcome {
        LaunchOutcome::Detached { client_command } => {
            if !ctx.quiet {
                println!();
            }
            ctx.header("Tunnel is running. Connect from your machine with:");
            ctx.command(client_command);
            ctx.info("Put the correct location of the private key if not run in the same folder.");
        }
        LaunchOutcome::Exited { code: Some(0) } => ctx.success("tunnel client exited"),
        LaunchOutcome::Exited { code } => ctx.warn(&format!(
            "tunnel client exited with status {}, no tunnel is running",
            code.map_or_else(|| "unknown".to_string(), |c| c.to_string())
        )),
    }
}
