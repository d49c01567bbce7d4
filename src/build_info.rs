//! Compile-time build information.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// `dino-run 2026-01-01 (abc1234)`
pub fn version_line(binary: &str) -> String {
    format!("{} {} ({})", binary, BUILD_DATE, BUILD_COMMIT)
}
