//! Application service: environment provisioning use-case.
//!
//! Refreshes the package index and installs the mandatory SSH server plus the
//! descriptor's OS and Python packages. Every step is one external process.

use std::process::ExitStatus;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, ProgressReporter};
use crate::domain::config::{Descriptor, MANDATORY_OS_PACKAGE};
use crate::domain::error::CommandError;

/// Interpreter used for `-m pip` when none is configured.
pub const DEFAULT_PYTHON: &str = "python3";

/// How external process failures are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitPolicy {
    /// Warn and continue on a non-zero exit.
    #[default]
    Warn,
    /// Abort the run on a non-zero exit.
    Strict,
}

impl ExitPolicy {
    #[must_use]
    pub fn from_strict(strict: bool) -> Self {
        if strict { Self::Strict } else { Self::Warn }
    }

    /// Apply the policy to the exit status of `program`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Failed`] for a non-zero exit under `Strict`.
    pub fn check(
        self,
        program: &str,
        status: ExitStatus,
        reporter: &impl ProgressReporter,
    ) -> Result<()> {
        if status.success() {
            return Ok(());
        }
        let code = status.code().unwrap_or(-1);
        match self {
            Self::Strict => Err(CommandError::Failed {
                program: program.to_string(),
                code,
            }
            .into()),
            Self::Warn => {
                reporter.warn(&format!("{program} exited with status {code}, continuing"));
                Ok(())
            }
        }
    }
}

/// Installs packages and restarts services through a `CommandRunner`.
pub struct EnvironmentProvisioner<'a, R: CommandRunner, P: ProgressReporter> {
    runner: &'a R,
    reporter: &'a P,
    policy: ExitPolicy,
    python: &'a str,
}

impl<'a, R: CommandRunner, P: ProgressReporter> EnvironmentProvisioner<'a, R, P> {
    pub fn new(runner: &'a R, reporter: &'a P, policy: ExitPolicy, python: &'a str) -> Self {
        Self {
            runner,
            reporter,
            policy,
            python,
        }
    }

    /// `apt -qq update`
    ///
    /// # Errors
    ///
    /// Returns an error if `apt` cannot be spawned or fails under `Strict`.
    pub async fn refresh_package_index(&self) -> Result<()> {
        self.invoke("apt", &["-qq", "update"]).await
    }

    /// `apt -qq install -y <name>`
    ///
    /// # Errors
    ///
    /// Returns an error if `apt` cannot be spawned or fails under `Strict`.
    pub async fn install_os_package(&self, name: &str) -> Result<()> {
        self.invoke("apt", &["-qq", "install", "-y", name]).await
    }

    /// `<python> -m pip -q install <name>`
    ///
    /// # Errors
    ///
    /// Returns an error if the interpreter cannot be spawned or fails under `Strict`.
    pub async fn install_language_package(&self, name: &str) -> Result<()> {
        self.invoke(self.python, &["-m", "pip", "-q", "install", name])
            .await
    }

    /// `service <name> restart`
    ///
    /// # Errors
    ///
    /// Returns an error if `service` cannot be spawned or fails under `Strict`.
    pub async fn restart_service(&self, name: &str) -> Result<()> {
        self.invoke("service", &[name, "restart"]).await
    }

    /// Refresh the index, then install the SSH server, the Python packages and
    /// the OS packages, in that order.
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails to spawn or fails under `Strict`.
    pub async fn provision(&self, descriptor: &Descriptor) -> Result<()> {
        self.reporter.step("refreshing package index...");
        self.refresh_package_index().await?;

        self.reporter
            .step(&format!("installing {MANDATORY_OS_PACKAGE}..."));
        self.install_os_package(MANDATORY_OS_PACKAGE).await?;

        for package in &descriptor.python_packages {
            self.reporter
                .step(&format!("installing python package {package}..."));
            self.install_language_package(package).await?;
        }

        for package in &descriptor.os_packages {
            self.reporter.step(&format!("installing {package}..."));
            self.install_os_package(package).await?;
        }

        self.reporter.success("environment provisioned");
        Ok(())
    }

    async fn invoke(&self, program: &str, args: &[&str]) -> Result<()> {
        let status = self
            .runner
            .run_status(program, args)
            .await
            .with_context(|| format!("running {program} {}", args.join(" ")))?;
        self.policy.check(program, status, self.reporter)
    }
}
