//! Compile-time build information.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Commit count baked in at build time, if the build had git history.
pub fn commit_count() -> Option<u32> {
    BUILD_COMMIT_COUNT.parse().ok()
}

/// `gameconf <date> (<commit>[, <n> commits])`, as printed by `--version`.
pub fn version_line() -> String {
    match commit_count() {
        Some(count) => format!(
            "gameconf {} ({}, {} commits)",
            BUILD_DATE, BUILD_COMMIT, count
        ),
        None => format!("gameconf {} ({})", BUILD_DATE, BUILD_COMMIT),
    }
}
