//! Any-time search: the sliding-window loop, its best-result tracker and the
//! persisted state that makes runs resumable

/// Sliding-window search loop
pub mod engine;
/// Persisted state and its atomic store
pub mod state;
/// Best-result tracking
pub mod tracker;

pub use engine::{SearchConfig, SearchEngine, SearchOutcome, SearchReport, SearchSink};
pub use state::{PersistedState, StateStore};
pub use tracker::{BestTracker, Step};
