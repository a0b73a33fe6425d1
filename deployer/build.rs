//! Build script for preview-deployer
//! Embeds the commit and build time reported by `--version` and `/health`

use std::process::Command;

use chrono::{SecondsFormat, Utc};

fn main() {
    // CI checkouts without git history fall back to "unknown"
    let git_hash = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|hash| hash.trim().to_string())
        .filter(|hash| !hash.is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    let build_time = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

    println!("cargo:rustc-env=GIT_HASH={}", git_hash);
    println!("cargo:rustc-env=BUILD_TIME={}", build_time);
    println!("cargo:rerun-if-changed=../.git/HEAD");
    println!("cargo:rerun-if-changed=build.rs");
}
