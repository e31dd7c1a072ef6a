//! Extraction of GitHub repository references from free text.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

// Owner segments allow word characters and hyphens; repository segments also
// allow dots.
static GITHUB_REPOSITORY_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)https://github\.com/[A-Za-z0-9_\-]+/[A-Za-z0-9_\-.]+").ok()
});

/// GitHub repository URL found in a task description.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepositoryUrl(String);

impl RepositoryUrl {
    /// Returns the URL exactly as it appeared in the source text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RepositoryUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for RepositoryUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Returns the first `https://github.com/<owner>/<repo>` reference in `text`.
///
/// The match is returned verbatim. Whether the repository exists is not
/// checked.
#[must_use]
pub fn extract_repository_url(text: &str) -> Option<RepositoryUrl> {
    GITHUB_REPOSITORY_PATTERN
        .as_ref()?
        .find(text)
        .map(|found| RepositoryUrl(found.as_str().to_owned()))
}
