//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::builder::FalseyValueParser;
use clap::{Parser, Subcommand};

use crate::commands;
use crate::output::OutputContext;

/// Turn a notebook instance into an SSH-reachable host over a reverse tunnel
#[derive(Parser)]
#[command(
    name = "colab-tunnel",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Log every spawned process and download to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Provision the host and open a reverse SSH tunnel
    Direct(commands::TunnelArgs),

    /// Provision the host and run the frp relay client
    Relay(commands::relay::RelayArgs),

    /// Install the SSH key pair only
    Keys(commands::keys::KeysArgs),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            quiet,
            no_color,
            command,
            ..
        } = self;
        let ctx = OutputContext::new(no_color, quiet);
        match command {
            Command::Direct(args) => commands::direct::run(&ctx, &args).await,
            Command::Relay(args) => commands::relay::run(&ctx, &args).await,
            Command::Keys(args) => commands::keys::run(&ctx, &args).await,
            Command::Version => {
                commands::version::run();
                Ok(())
            }
        }
    }
}
