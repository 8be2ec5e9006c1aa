//! Version command

/// Run the version command.
pub fn run() {
    println!("colab-tunnel {}", env!("CARGO_PKG_VERSION"));
}
