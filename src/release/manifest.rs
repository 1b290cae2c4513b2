//! Reading the release version out of the build manifest.

use crate::errors::ManifestError;
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

/// Source of the version string a release is cut from.
pub trait VersionSource {
    fn read(&self) -> Result<String, ManifestError>;
}

static PARENT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<parent>.*?</parent>").expect("valid static regex"));
// Outer sections first so nested ones (e.g. dependencies inside profiles) go with them.
static NESTED_BLOCKS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        "profiles",
        "dependencyManagement",
        "build",
        "reporting",
        "dependencies",
        "modules",
    ]
    .iter()
    .map(|tag| Regex::new(&format!(r"(?s)<{tag}>.*?</{tag}>")).expect("valid static regex"))
    .collect()
});
static XML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid static regex"));
static VERSION_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<version>\s*([^<]*?)\s*</version>").expect("valid static regex"));

/// Reads `<project><version>` from a Maven `pom.xml`.
///
/// Only the project's own version counts: comments, the `<parent>` block and
/// the dependency/build/profile sections are skipped before looking for the
/// first `<version>` element.
#[derive(Debug, Clone)]
pub struct PomVersionSource {
    path: PathBuf,
}

impl PomVersionSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl VersionSource for PomVersionSource {
    fn read(&self) -> Result<String, ManifestError> {
        if !self.path.exists() {
            return Err(ManifestError::NotFound {
                path: self.path.clone(),
            });
        }
        let content = std::fs::read_to_string(&self.path).map_err(|source| ManifestError::Read {
            path: self.path.clone(),
            source,
        })?;

        project_version(&content).ok_or_else(|| ManifestError::MissingVersion {
            path: self.path.clone(),
        })
    }
}

/// Extract the project's own version from POM text.
pub fn project_version(pom: &str) -> Option<String> {
    let stripped = XML_COMMENT.replace_all(pom, "");
    let mut stripped = PARENT_BLOCK.replace_all(&stripped, "").into_owned();
    for block in NESTED_BLOCKS.iter() {
        stripped = block.replace_all(&stripped, "").into_owned();
    }

    VERSION_TAG
        .captures(&stripped)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|v| !v.is_empty())
}
