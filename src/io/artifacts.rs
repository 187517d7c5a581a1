//! Search sink that keeps the rendered best window and the state file current

use crate::fitting::alphabet::Alphabet;
use crate::fitting::assignment::FitResult;
use crate::io::error::Result;
use crate::io::image::export_window;
use crate::io::progress::ProgressReporter;
use crate::search::engine::SearchSink;
use crate::search::state::{PersistedState, StateStore};
use crate::stream::encode_hex_digits;
use crate::target::descriptor::TargetDescriptor;
use std::path::{Path, PathBuf};

/// Writes the best window's image and the resumable state as the search runs
///
/// The image is written before the state that refers to it, so a state file
/// never names a best window whose image is missing.
pub struct ArtifactSink<'a> {
    target: &'a TargetDescriptor,
    alphabet: Alphabet,
    output_path: PathBuf,
    store: StateStore,
    state: PersistedState,
    progress: &'a ProgressReporter,
    symbols: Vec<u8>,
}

impl<'a> ArtifactSink<'a> {
    /// Sink writing to `output_path` and `store`, starting from `state`
    pub fn new(
        target: &'a TargetDescriptor,
        output_path: &Path,
        store: StateStore,
        state: PersistedState,
        progress: &'a ProgressReporter,
    ) -> Self {
        Self {
            target,
            alphabet: state.alphabet,
            output_path: output_path.to_path_buf(),
            store,
            state,
            progress,
            symbols: Vec::new(),
        }
    }

    /// State as last recorded
    pub const fn state(&self) -> &PersistedState {
        &self.state
    }

    /// Consume the sink, returning the recorded state
    pub fn into_state(self) -> PersistedState {
        self.state
    }
}

impl SearchSink for ArtifactSink<'_> {
    fn improved(&mut self, result: &FitResult, window: &[u8]) -> Result<()> {
        self.alphabet.fill_symbols(window, &mut self.symbols);
        export_window(self.target, &self.symbols, &result.assignment, &self.output_path)?;

        self.state.best = Some(result.clone());
        self.state.window_hex = Some(encode_hex_digits(window));

        let line = format!(
            "New best at digit {}: score {}",
            crate::io::report::thousands(result.start_index),
            result.error_score
        );
        log::debug!("{line}");
        self.progress.announce(&line);
        Ok(())
    }

    fn checkpoint(&mut self, next_index: u64) -> Result<()> {
        self.state.next_index = next_index;
        self.store.save(&self.state)
    }

    fn progress(&mut self, next_index: u64, best: Option<&FitResult>) {
        self.progress.update(next_index, best);
    }
}
