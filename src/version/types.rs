//! Common types shared by the version and monitor layers

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// `owner/repo`, optionally written as `github:owner/repo`
static GITHUB_REPO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:github:)?([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)$").expect("valid regex")
});

/// Kind of remote source a locator points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// GitHub "latest release" API, queried by owner/repository
    GitHubRelease,
    /// JSON document with a top-level `version` field
    Manifest,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::GitHubRelease => "github_release",
            SourceKind::Manifest => "manifest",
        }
    }
}

/// Where the latest published version of a package can be read from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceLocator {
    GitHubRelease { owner: String, repo: String },
    Manifest { url: String },
}

impl SourceLocator {
    pub fn kind(&self) -> SourceKind {
        match self {
            SourceLocator::GitHubRelease { .. } => SourceKind::GitHubRelease,
            SourceLocator::Manifest { .. } => SourceKind::Manifest,
        }
    }

    /// The source-specific reference (`owner/repo` or the manifest URL)
    pub fn reference(&self) -> String {
        match self {
            SourceLocator::GitHubRelease { owner, repo } => format!("{}/{}", owner, repo),
            SourceLocator::Manifest { url } => url.clone(),
        }
    }
}

impl FromStr for SourceLocator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with("https://") || s.starts_with("http://") {
            return Ok(SourceLocator::Manifest { url: s.to_string() });
        }
        let caps = GITHUB_REPO
            .captures(s)
            .ok_or_else(|| format!("unrecognized source locator: {:?}", s))?;
        Ok(SourceLocator::GitHubRelease {
            owner: caps[1].to_string(),
            repo: caps[2].to_string(),
        })
    }
}

impl fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocator::GitHubRelease { owner, repo } => write!(f, "github:{}/{}", owner, repo),
            SourceLocator::Manifest { url } => f.write_str(url),
        }
    }
}

impl Serialize for SourceLocator {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SourceLocator {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A package this monitor tracks for version drift
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchedPackage {
    /// Unique key, also the module directory name on the host
    pub id: String,
    /// Human readable name
    pub display_name: String,
    pub source_locator: SourceLocator,
    #[serde(default)]
    pub release_page_url: String,
}

/// Version status of a watched package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VersionStatus {
    UpToDate,
    OutOfDate,
    /// Installed version is newer than the latest published one
    Ahead,
    /// No comparable data
    Unknown,
    NotInstalled,
}

impl VersionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionStatus::UpToDate => "up-to-date",
            VersionStatus::OutOfDate => "out-of-date",
            VersionStatus::Ahead => "ahead",
            VersionStatus::Unknown => "unknown",
            VersionStatus::NotInstalled => "not-installed",
        }
    }
}

impl fmt::Display for VersionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of checking one package in one cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub id: String,
    pub display_name: String,
    pub installed_version: Option<String>,
    pub latest_version: Option<String>,
    pub status: VersionStatus,
    pub release_page_url: String,
    /// Whether the host has the package enabled
    pub active: bool,
}
