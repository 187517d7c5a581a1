//! Persisted search state for resuming interrupted runs

use crate::fitting::alphabet::Alphabet;
use crate::fitting::assignment::FitResult;
use crate::fitting::policy::Metric;
use crate::io::configuration::STATE_FORMAT_VERSION;
use crate::io::error::{Result, SearchError, file_system};
use crate::target::descriptor::TargetFingerprint;
use serde::{Deserialize, Serialize};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Everything needed to resume a search and to find its best window again
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    /// Format version
    pub version: u32,
    /// Target the search is for
    pub target: TargetFingerprint,
    /// Symbol alphabet of the search
    pub alphabet: Alphabet,
    /// Fitting policy of the search
    pub metric: Metric,
    /// Start index of the next window to evaluate
    pub next_index: u64,
    /// Best window found so far
    pub best: Option<FitResult>,
    /// Digits of the best window as hexadecimal text
    pub window_hex: Option<String>,
}

impl PersistedState {
    /// Fresh state for a search that has not evaluated anything yet
    pub const fn new(
        target: TargetFingerprint,
        alphabet: Alphabet,
        metric: Metric,
        next_index: u64,
    ) -> Self {
        Self {
            version: STATE_FORMAT_VERSION,
            target,
            alphabet,
            metric,
            next_index,
            best: None,
            window_hex: None,
        }
    }

    // Describes the first difference from the given search, if any
    fn mismatch(
        &self,
        target: &TargetFingerprint,
        alphabet: Alphabet,
        metric: Metric,
    ) -> Option<String> {
        if self.version != STATE_FORMAT_VERSION {
            Some(format!(
                "format version {} (expected {STATE_FORMAT_VERSION})",
                self.version
            ))
        } else if &self.target != target {
            Some(format!(
                "saved for a {}x{} target with colors {:?}",
                self.target.width, self.target.height, self.target.colors
            ))
        } else if self.alphabet != alphabet {
            Some(format!("saved for the {} alphabet", self.alphabet))
        } else if self.metric != metric {
            Some(format!("saved for the {} metric", self.metric))
        } else {
            None
        }
    }
}

/// JSON state file replaced atomically on every save
#[derive(Clone, Debug)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Store backed by `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the state file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the state file, if present
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed
    pub fn load(&self) -> Result<Option<PersistedState>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&self.path)
            .map_err(|e| file_system(&self.path, "read state file", e))?;
        let state = serde_json::from_str(&text).map_err(|e| SearchError::StateFile {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(Some(state))
    }

    /// Read the state file and check that it belongs to this search
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file exists but cannot be read or parsed
    /// - The state was saved for another target, alphabet or metric
    pub fn load_matching(
        &self,
        target: &TargetFingerprint,
        alphabet: Alphabet,
        metric: Metric,
    ) -> Result<Option<PersistedState>> {
        let Some(state) = self.load()? else {
            return Ok(None);
        };
        match state.mismatch(target, alphabet, metric) {
            Some(reason) => Err(SearchError::StateMismatch {
                path: self.path.clone(),
                reason,
            }),
            None => Ok(Some(state)),
        }
    }

    /// Write the state, replacing any previous file in one rename
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be written or renamed
    pub fn save(&self, state: &PersistedState) -> Result<()> {
        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&directory)
            .map_err(|e| file_system(&directory, "create directory", e))?;

        let mut temp = NamedTempFile::new_in(&directory)
            .map_err(|e| file_system(&directory, "create temporary state file", e))?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, state).map_err(|e| {
                SearchError::StateFile {
                    path: self.path.clone(),
                    source: e,
                }
            })?;
            writer
                .flush()
                .map_err(|e| file_system(&self.path, "write state file", e))?;
        }
        temp.persist(&self.path)
            .map_err(|e| file_system(&self.path, "replace state file", e.error))?;
        Ok(())
    }
}
