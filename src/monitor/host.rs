//! Collaborators supplied by the host environment
//!
//! The monitor never inspects the host directly: installed modules, the
//! current time and the operator's role all come through these traits.

use std::collections::HashSet;
use std::path::PathBuf;

#[cfg(test)]
use mockall::automock;
use tracing::debug;

use crate::version::registries::manifest::manifest_version;

/// Registry of modules installed on the host
#[cfg_attr(test, automock)]
pub trait ModuleHost: Send + Sync {
    fn is_installed(&self, id: &str) -> bool;

    fn is_active(&self, id: &str) -> bool;

    /// Locally installed version, read without any network access
    fn installed_version(&self, id: &str) -> Option<String>;
}

/// Source of the current time in epoch milliseconds
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Decides whether the current actor may trigger checks
pub trait OperatorRole: Send + Sync {
    fn is_privileged(&self) -> bool;
}

/// Operator check against a configured allow-list of user names
#[derive(Debug, Clone)]
pub struct ConfiguredOperators {
    allowed: Vec<String>,
    current_user: Option<String>,
}

impl ConfiguredOperators {
    pub fn new(allowed: Vec<String>, current_user: Option<String>) -> Self {
        Self {
            allowed,
            current_user,
        }
    }

    /// Use the user name from the environment (`USER`, then `USERNAME`)
    pub fn from_env(allowed: Vec<String>) -> Self {
        let current_user = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .ok();
        Self::new(allowed, current_user)
    }
}

impl OperatorRole for ConfiguredOperators {
    fn is_privileged(&self) -> bool {
        if self.allowed.is_empty() {
            return true;
        }
        self.current_user
            .as_ref()
            .is_some_and(|user| self.allowed.contains(user))
    }
}

/// Module host backed by a directory of `<id>/module.json` manifests
#[derive(Debug, Clone)]
pub struct FsModuleHost {
    modules_dir: PathBuf,
    disabled: HashSet<String>,
}

impl FsModuleHost {
    pub fn new(modules_dir: PathBuf, disabled: impl IntoIterator<Item = String>) -> Self {
        Self {
            modules_dir,
            disabled: disabled.into_iter().collect(),
        }
    }

    fn manifest_path(&self, id: &str) -> PathBuf {
        self.modules_dir.join(id).join("module.json")
    }
}

impl ModuleHost for FsModuleHost {
    fn is_installed(&self, id: &str) -> bool {
        self.manifest_path(id).is_file()
    }

    fn is_active(&self, id: &str) -> bool {
        self.is_installed(id) && !self.disabled.contains(id)
    }

    fn installed_version(&self, id: &str) -> Option<String> {
        let path = self.manifest_path(id);
        let content = std::fs::read_to_string(&path).ok()?;
        let manifest: serde_json::Value = serde_json::from_str(&content)
            .inspect_err(|e| debug!("Unreadable manifest {:?}: {}", path, e))
            .ok()?;
        manifest_version(&manifest)
    }
}
