//! Tunnel command construction for both strategies.
//!
//! Pure functions only: the commands are built here and executed by the
//! application layer.

use std::path::Path;

use crate::domain::config::TunnelOptions;
use crate::domain::ini::IniDocument;

/// Options that disable host key checking on both ends of the tunnel.
/// Relay hosts and notebook instances are re-created too often to pin keys.
pub const NO_HOST_KEY_CHECKING: [&str; 2] = [
    "-oStrictHostKeyChecking=no",
    "-oUserKnownHostsFile=/dev/null",
];

/// Port of the SSH daemon on the notebook instance.
pub const LOCAL_SSH_PORT: u16 = 22;

/// User the operator logs into on the notebook instance.
pub const NOTEBOOK_USER: &str = "root";

/// Arguments for the detached reverse tunnel started on the notebook
/// instance: `ssh ... -f -R <service_port>:localhost:22 <user>@<service_url> -N`.
#[must_use]
pub fn reverse_tunnel_args(opts: &TunnelOptions, user: &str, private_key: &Path) -> Vec<String> {
    let mut args: Vec<String> = NO_HOST_KEY_CHECKING.iter().map(ToString::to_string).collect();
    args.extend([
        "-i".to_string(),
        private_key.display().to_string(),
        "-f".to_string(),
        "-R".to_string(),
        format!("{}:localhost:{LOCAL_SSH_PORT}", opts.service_port),
        format!("{user}@{}", opts.service_url),
        "-N".to_string(),
    ]);
    args
}

/// Command line the operator runs on their own machine to reach the instance
/// through the relay.
#[must_use]
pub fn client_command(opts: &TunnelOptions, key_file_name: &str) -> String {
    let mut parts: Vec<String> = vec!["ssh".to_string()];
    parts.extend(NO_HOST_KEY_CHECKING.iter().map(ToString::to_string));
    parts.extend([
        "-i".to_string(),
        key_file_name.to_string(),
        "-p".to_string(),
        opts.service_port.to_string(),
        "-L".to_string(),
        format!("{0}:localhost:{0}", opts.local_port),
        format!("{NOTEBOOK_USER}@{}", opts.service_url),
    ]);
    parts.join(" ")
}

/// Arguments for the relay client: `-c <config>`.
#[must_use]
pub fn relay_args(config: &Path) -> Vec<String> {
    vec!["-c".to_string(), config.display().to_string()]
}

/// Point the relay client configuration at the relay server.
///
/// `local_port` becomes the `ssh` proxy's `remote_port`: the port the relay
/// server exposes for this instance.
pub fn apply_relay_options(doc: &mut IniDocument, opts: &TunnelOptions) {
    doc.set("common", "server_addr", &opts.service_url);
    doc.set("common", "server_port", opts.service_port);
    doc.set("ssh", "remote_port", opts.local_port);
}

/// Render a program and its arguments as one printable line.
#[must_use]
pub fn render_command(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}
