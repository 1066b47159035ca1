//! Build metadata baked in by `build.rs`.

use serde::Serialize;

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

const UNKNOWN: &str = "unknown";

/// Where this binary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_branch: &'static str,
    pub git_sha: &'static str,
    pub dirty: bool,
}

impl BuildInfo {
    /// Metadata of the running build. Git fields read "unknown" when the
    /// crate was built outside a checkout.
    pub fn current() -> Self {
        Self {
            version: PKG_VERSION,
            git_branch: match option_env!("VERGEN_GIT_BRANCH") {
                Some(branch) => branch,
                None => UNKNOWN,
            },
            git_sha: match option_env!("VERGEN_GIT_SHA") {
                Some(sha) => sha,
                None => UNKNOWN,
            },
            dirty: matches!(option_env!("VERGEN_GIT_DIRTY"), Some("true")),
        }
    }

    /// First seven characters of the commit, or all of it if shorter.
    pub fn short_sha(&self) -> &'static str {
        let sha = self.git_sha;
        sha.get(..7).unwrap_or(sha)
    }
}

/// `{version}+{branch}.{sha}`, with `.dirty` appended for modified trees.
///
/// e.g. `0.1.0+main.3f9c2ab` or `0.1.0+unknown.unknown`
pub fn version_string() -> String {
    let info = BuildInfo::current();
    let dirty = if info.dirty { ".dirty" } else { "" };
    format!(
        "{}+{}.{}{dirty}",
        info.version,
        info.git_branch,
        info.short_sha()
    )
}
