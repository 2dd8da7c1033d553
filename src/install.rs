//! Privileged Tor/proxychains installer
//!
//! Orthogonal to the request path; only reachable from the menu or the
//! `install` subcommand.

use std::process::Command;

use anyhow::{bail, Context, Result};

pub fn install_tor_proxychains() -> Result<()> {
    let apt_available = Command::new("sh")
        .args(["-c", "command -v apt-get"])
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false);
    if !apt_available {
        bail!("apt-get not found; automatic install only supported on apt-based systems");
    }

    let output = Command::new("bash")
        .args([
            "-lc",
            "sudo apt-get update && sudo apt-get install -y tor proxychains",
        ])
        .output()
        .context("running install command")?;

    if !output.status.success() {
        bail!(
            "install command failed: {}\noutput: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(())
}
