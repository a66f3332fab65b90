//! Build script to embed commit hash, commit count and build date at compile time.

use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;

fn git(args: &[&str]) -> Option<String> {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn main() {
    // CI can pin these through the environment; local builds ask git
    let commit = env::var("BUILD_COMMIT")
        .ok()
        .or_else(|| git(&["rev-parse", "--short=7", "HEAD"]))
        .unwrap_or_else(|| "unknown".to_string());

    let commit_count = env::var("BUILD_COMMIT_COUNT")
        .ok()
        .or_else(|| git(&["rev-list", "--all", "--count"]))
        .unwrap_or_default();

    let date = env::var("BUILD_DATE")
        .unwrap_or_else(|_| chrono::Utc::now().format("%Y-%m-%d").to_string());

    let out_dir = env::var("OUT_DIR").expect("cargo sets OUT_DIR for build scripts");
    let dest_path = Path::new(&out_dir).join("build_info.rs");

    fs::write(
        &dest_path,
        format!(
            r#"pub const BUILD_COMMIT: &str = "{}";
pub const BUILD_COMMIT_COUNT: &str = "{}";
pub const BUILD_DATE: &str = "{}";"#,
            commit, commit_count, date
        ),
    )
    .expect("failed to write build_info.rs");

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-env-changed=BUILD_COMMIT");
    println!("cargo:rerun-if-env-changed=BUILD_COMMIT_COUNT");
    println!("cargo:rerun-if-env-changed=BUILD_DATE");
}
