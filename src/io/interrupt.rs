//! Ctrl-C handling: the first interrupt asks the search to stop at the next
//! window boundary, a second one exits immediately

use crate::io::error::{Result, SearchError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Exit status used when a second interrupt aborts the process
pub const ABORT_EXIT_CODE: i32 = 130;

/// Shared stop flag polled by the search loop
#[derive(Clone, Debug, Default)]
pub struct StopSignal {
    flag: Arc<AtomicBool>,
}

impl StopSignal {
    /// Signal that has not been raised
    pub fn new() -> Self {
        Self::default()
    }

    /// Route Ctrl-C and termination signals to this flag
    ///
    /// # Errors
    ///
    /// Returns an error if a handler is already installed or the platform
    /// refuses one
    pub fn install(&self) -> Result<()> {
        let flag = Arc::clone(&self.flag);
        ctrlc::set_handler(move || {
            if flag.swap(true, Ordering::SeqCst) {
                #[expect(clippy::exit)]
                std::process::exit(ABORT_EXIT_CODE);
            }
            log::warn!("Interrupt received, stopping after the current window");
        })
        .map_err(|e| SearchError::SignalHandler {
            reason: e.to_string(),
        })
    }

    /// Flag to hand to the search loop
    pub fn flag(&self) -> &AtomicBool {
        &self.flag
    }

    /// Raise the signal
    pub fn request_stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether the signal has been raised
    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
