//! Unit tests for the end-to-end `setup_tunnel` workflow.

#![allow(clippy::expect_used)]

use colab_tunnel::application::services::provision::ExitPolicy;
use colab_tunnel::application::services::setup::{SetupOptions, setup_tunnel};
use colab_tunnel::application::services::tunnel::{DirectStrategy, LaunchOutcome, RelayStrategy};
use colab_tunnel::domain::error::{CommandError, ConfigError, RelayError};
use colab_tunnel::infra::{EmbeddedAssets, HostFs};

use crate::helpers::{DIRECT_CONFIG, Fixture, tar_gz};
use crate::mocks::{FakeReleases, RecordingReporter, RecordingRunner};

fn options(fixture: &Fixture, policy: ExitPolicy) -> SetupOptions<'_> {
    SetupOptions {
        folder: &fixture.folder,
        layout: &fixture.layout,
        policy,
        python: "python3",
    }
}

#[tokio::test]
async fn test_direct_setup_runs_full_workflow() {
    let fixture = Fixture::new(DIRECT_CONFIG);
    let runner = RecordingRunner::new();
    let reporter = RecordingReporter::default();

    let outcome = setup_tunnel(
        &DirectStrategy::new(&runner),
        &runner,
        &HostFs,
        &EmbeddedAssets,
        &reporter,
        options(&fixture, ExitPolicy::Warn),
    )
    .await
    .expect("setup");

    let key = fixture.layout.private_key().display().to_string();
    assert_eq!(
        runner.calls(),
        vec![
            "apt -qq update".to_string(),
            "apt -qq install -y openssh-server".to_string(),
            "python3 -m pip -q install numpy".to_string(),
            "apt -qq install -y htop".to_string(),
            "service ssh restart".to_string(),
            format!(
                "ssh -oStrictHostKeyChecking=no -oUserKnownHostsFile=/dev/null -i {key} \
                 -f -R 2222:localhost:22 alice@relay.example.com -N"
            ),
        ]
    );
    assert_eq!(
        outcome,
        LaunchOutcome::Detached {
            client_command: "ssh -oStrictHostKeyChecking=no -oUserKnownHostsFile=/dev/null \
                             -i alice.pem -p 2222 -L 8888:localhost:8888 root@relay.example.com"
                .to_string(),
        }
    );
    assert!(fixture.layout.authorized_keys().exists());
}

#[tokio::test]
async fn test_missing_folder_fails_before_any_command() {
    let fixture = Fixture::empty();
    let runner = RecordingRunner::new();
    let reporter = RecordingReporter::default();
    let absent = fixture.root.path().join("absent");
    let mut opts = options(&fixture, ExitPolicy::Warn);
    opts.folder = &absent;

    let err = setup_tunnel(
        &DirectStrategy::new(&runner),
        &runner,
        &HostFs,
        &EmbeddedAssets,
        &reporter,
        opts,
    )
    .await
    .expect_err("missing folder");

    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::FolderNotFound(_))
    ));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_missing_config_fails_before_any_command() {
    let fixture = Fixture::empty();
    let runner = RecordingRunner::new();
    let reporter = RecordingReporter::default();

    let err = setup_tunnel(
        &DirectStrategy::new(&runner),
        &runner,
        &HostFs,
        &EmbeddedAssets,
        &reporter,
        options(&fixture, ExitPolicy::Warn),
    )
    .await
    .expect_err("missing config");

    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::NotFound(_))
    ));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_malformed_config_fails_before_any_command() {
    let fixture = Fixture::new("{\"tunnel_options\": {\"service_url\": 5}}");
    let runner = RecordingRunner::new();
    let reporter = RecordingReporter::default();

    let err = setup_tunnel(
        &DirectStrategy::new(&runner),
        &runner,
        &HostFs,
        &EmbeddedAssets,
        &reporter,
        options(&fixture, ExitPolicy::Warn),
    )
    .await
    .expect_err("malformed config");

    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::Malformed { .. })
    ));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_missing_keys_abort_before_ssh_is_touched() {
    let fixture = Fixture::empty();
    fixture.write("user_config.json", DIRECT_CONFIG);
    let runner = RecordingRunner::new();
    let reporter = RecordingReporter::default();

    let result = setup_tunnel(
        &DirectStrategy::new(&runner),
        &runner,
        &HostFs,
        &EmbeddedAssets,
        &reporter,
        options(&fixture, ExitPolicy::Warn),
    )
    .await;

    assert!(result.is_err());
    assert!(!runner.calls().iter().any(|c| c.starts_with("service")));
    assert!(!runner.calls().iter().any(|c| c.starts_with("ssh")));
    assert!(!fixture.layout.sshd_config.exists());
}

#[tokio::test]
async fn test_strict_policy_stops_at_failed_install() {
    let fixture = Fixture::new(DIRECT_CONFIG);
    let runner = RecordingRunner::new().exiting("python3", 1);
    let reporter = RecordingReporter::default();

    let err = setup_tunnel(
        &DirectStrategy::new(&runner),
        &runner,
        &HostFs,
        &EmbeddedAssets,
        &reporter,
        options(&fixture, ExitPolicy::Strict),
    )
    .await
    .expect_err("strict");

    assert!(err.downcast_ref::<CommandError>().is_some());
    assert_eq!(
        runner.calls().last().map(String::as_str),
        Some("python3 -m pip -q install numpy")
    );
    assert!(!fixture.layout.authorized_keys().exists());
}

#[tokio::test]
async fn test_warn_policy_reaches_tunnel_despite_failed_install() {
    let fixture = Fixture::new(DIRECT_CONFIG);
    let runner = RecordingRunner::new().exiting("python3", 1);
    let reporter = RecordingReporter::default();

    let outcome = setup_tunnel(
        &DirectStrategy::new(&runner),
        &runner,
        &HostFs,
        &EmbeddedAssets,
        &reporter,
        options(&fixture, ExitPolicy::Warn),
    )
    .await
    .expect("warn");

    assert!(matches!(outcome, LaunchOutcome::Detached { .. }));
    assert_eq!(reporter.warnings().len(), 1);
}

#[tokio::test]
async fn test_relay_setup_without_asset_never_launches_client() {
    let fixture = Fixture::new(DIRECT_CONFIG);
    let runner = RecordingRunner::new();
    let reporter = RecordingReporter::default();
    let archive = tar_gz(&[("frp/frpc", b"#!/bin/sh\n".as_slice())]);
    let releases = FakeReleases::new(&["frp_0.61.0_freebsd_amd64.tar.gz"], archive);

    let err = setup_tunnel(
        &RelayStrategy::new(&runner, &releases, &HostFs, &EmbeddedAssets),
        &runner,
        &HostFs,
        &EmbeddedAssets,
        &reporter,
        options(&fixture, ExitPolicy::Warn),
    )
    .await
    .expect_err("no asset");

    assert!(err.downcast_ref::<RelayError>().is_some());
    assert!(!runner.calls().iter().any(|c| c.contains("frpc")));
}

#[tokio::test]
async fn test_relay_setup_launches_client_with_edited_config() {
    let fixture = Fixture::new(DIRECT_CONFIG);
    let runner = RecordingRunner::new();
    let reporter = RecordingReporter::default();
    let archive = tar_gz(&[("frp_0.61.0_linux_amd64/frpc", b"#!/bin/sh\n".as_slice())]);
    let releases = FakeReleases::new(&["frp_0.61.0_linux_amd64.tar.gz"], archive);

    let outcome = setup_tunnel(
        &RelayStrategy::new(&runner, &releases, &HostFs, &EmbeddedAssets),
        &runner,
        &HostFs,
        &EmbeddedAssets,
        &reporter,
        options(&fixture, ExitPolicy::Warn),
    )
    .await
    .expect("relay setup");

    assert_eq!(outcome, LaunchOutcome::Exited { code: Some(0) });
    let config = fixture.read(&fixture.layout.relay_config());
    assert!(config.contains("relay.example.com"));
    assert!(
        runner
            .calls()
            .last()
            .is_some_and(|c| c.ends_with(&format!("-c {}", fixture.layout.relay_config().display())))
    );
}

#[tokio::test]
async fn test_failed_reverse_tunnel_is_not_reported_as_running() {
    let fixture = Fixture::new(DIRECT_CONFIG);
    let runner = RecordingRunner::new().exiting("ssh", 255);
    let reporter = RecordingReporter::default();

    let outcome = setup_tunnel(
        &DirectStrategy::new(&runner),
        &runner,
        &HostFs,
        &EmbeddedAssets,
        &reporter,
        options(&fixture, ExitPolicy::Warn),
    )
    .await
    .expect("warn policy returns an outcome");

    assert_eq!(outcome, LaunchOutcome::Exited { code: Some(255) });
    assert!(
        reporter
            .warnings()
            .iter()
            .any(|w| w.contains("ssh exited with status 255"))
    );
    assert!(
        !reporter
            .events()
            .iter()
            .any(|e| e.contains("tunnel running in the background"))
    );
}

#[tokio::test]
async fn test_failed_reverse_tunnel_under_strict_policy_is_an_error() {
    let fixture = Fixture::new(DIRECT_CONFIG);
    let runner = RecordingRunner::new().exiting("ssh", 255);
    let reporter = RecordingReporter::default();

    let err = setup_tunnel(
        &DirectStrategy::new(&runner),
        &runner,
        &HostFs,
        &EmbeddedAssets,
        &reporter,
        options(&fixture, ExitPolicy::Strict),
    )
    .await
    .expect_err("strict");

    assert!(matches!(
        err.downcast_ref::<CommandError>(),
        Some(CommandError::Failed { code: 255, .. })
    ));
}
