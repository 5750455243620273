//! Persisted record of which migrations are currently applied.
//!
//! Membership is the only thing that matters: a name is applied iff it is in
//! the ledger, and it appears at most once. The stored order follows
//! application history. Every mutation rewrites the whole ledger.
//!
//! Read-modify-write is not locked; two runs sharing one ledger can lose
//! updates.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use strata_common::{Error, Result};
use tracing::{debug, info};

pub trait Ledger: Send + Sync {
    /// Names of applied migrations, oldest first, without duplicates.
    fn load(&self) -> Result<Vec<String>>;

    /// Replace the stored state with `names`.
    fn save(&self, names: &[String]) -> Result<()>;

    fn has(&self, name: &str) -> Result<bool> {
        Ok(self.load()?.iter().any(|n| n == name))
    }

    /// Add `name` if absent, then persist.
    fn record_applied(&self, name: &str) -> Result<()> {
        let mut names = self.load()?;
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
        self.save(&names)
    }

    /// Remove `name` if present, then persist.
    fn record_reverted(&self, name: &str) -> Result<()> {
        let mut names = self.load()?;
        names.retain(|n| n != name);
        self.save(&names)
    }
}

/// Ledger stored as a pretty-printed JSON array of names.
///
/// A missing file is created as `[]` on first load. Writes go to a sibling
/// temp file which is then renamed over the ledger, so a reader sees either
/// the old or the new state.
#[derive(Debug, Clone)]
pub struct JsonFileLedger {
    path: PathBuf,
}

impl JsonFileLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Ledger for JsonFileLedger {
    fn load(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            self.save(&[])?;
            info!("initialized empty migration ledger at {}", self.path.display());
            return Ok(Vec::new());
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            Error::Ledger(format!("failed to read {}: {e}", self.path.display()))
        })?;
        let names: Vec<String> = serde_json::from_str(&contents).map_err(|e| {
            Error::Ledger(format!("corrupt ledger {}: {e}", self.path.display()))
        })?;

        Ok(dedup(names))
    }

    fn save(&self, names: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::Ledger(format!("failed to create {}: {e}", parent.display()))
            })?;
        }

        let json = serde_json::to_string_pretty(names)?;
        let tmp = self.temp_path();
        std::fs::write(&tmp, json)
            .map_err(|e| Error::Ledger(format!("failed to write {}: {e}", tmp.display())))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            Error::Ledger(format!("failed to replace {}: {e}", self.path.display()))
        })?;

        debug!("ledger {} now holds {} migration(s)", self.path.display(), names.len());
        Ok(())
    }
}

/// Process-local ledger for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    names: Mutex<Vec<String>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_applied<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = dedup(names.into_iter().map(Into::into).collect());
        Self {
            names: Mutex::new(names),
        }
    }

    fn names(&self) -> Result<MutexGuard<'_, Vec<String>>> {
        self.names
            .lock()
            .map_err(|_| Error::Ledger("memory ledger lock poisoned".into()))
    }
}

impl Ledger for MemoryLedger {
    fn load(&self) -> Result<Vec<String>> {
        Ok(self.names()?.clone())
    }

    fn save(&self, names: &[String]) -> Result<()> {
        *self.names()? = names.to_vec();
        Ok(())
    }
}

fn dedup(names: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !unique.contains(&name) {
            unique.push(name);
        }
    }
    unique
}
