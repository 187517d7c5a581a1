//! Input/output: command line, configuration, errors, image export,
//! progress and run artifacts

/// Search sink writing the best image and the state file
pub mod artifacts;
/// Command-line interface and run orchestration
pub mod cli;
/// Defaults, file names and service constants
pub mod configuration;
/// Error types
pub mod error;
/// Window rendering and image export
pub mod image;
/// Ctrl-C handling
pub mod interrupt;
/// Terminal progress display
pub mod progress;
/// Human-readable result summaries
pub mod report;
