// SPDX-License-Identifier: GPL-3.0-only

use std::process::Command;

fn main() {
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-changed=.git/refs/tags");

    // Packaged builds pin the version explicitly
    let version = std::env::var("DEPTHCLOUD_VERSION").unwrap_or_else(|_| describe_version());

    println!("cargo::rustc-env=GIT_VERSION={}", version);
}

/// Version string for `--version`
///
/// - "0.1.0-abcdef1" when HEAD is exactly at tag v0.1.0
/// - "0.1.0-dirty-abcdef1" when HEAD is past the tag
/// - the crate version plus commit hash when no tag exists
fn describe_version() -> String {
    let commit = git(&["rev-parse", "--short", "HEAD"]).unwrap_or_else(|| "unknown".to_string());

    let Some(described) = git(&["describe", "--tags", "--match", "v*"]) else {
        return format!("{}-{}", env!("CARGO_PKG_VERSION"), commit);
    };
    let described = described.strip_prefix('v').unwrap_or(&described);

    // "<tag>-<commits>-g<hash>"
    let parts: Vec<&str> = described.rsplitn(3, '-').collect();
    if parts.len() == 3 && parts[0].starts_with('g') {
        format!("{}-dirty-{}", parts[2], &parts[0][1..])
    } else {
        format!("{}-{}", described, commit)
    }
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
