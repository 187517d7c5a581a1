//! Sliding-window search loop over a digit stream
//!
//! A run moves through `Initializing -> Streaming -> (Improved | Unimproved)*`
//! and ends `Matched`, `Exhausted` or `Interrupted`. The window is a ring of
//! digits advanced `stride` digits per step; every window is fitted and
//! offered to the tracker, and the sink hears about improvements, periodic
//! checkpoints and a final checkpoint at whichever terminal state is reached.

use crate::fitting::alphabet::Alphabet;
use crate::fitting::assignment::FitResult;
use crate::fitting::policy::FitPolicy;
use crate::io::configuration::{
    DEFAULT_CHECKPOINT_INTERVAL, DEFAULT_STRIDE, MAX_STRIDE, PROGRESS_REFRESH_INTERVAL,
};
use crate::io::error::{Result, SearchError, invalid_parameter};
use crate::search::tracker::{BestTracker, Step};
use crate::stream::DigitStream;
use crate::target::descriptor::TargetDescriptor;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

/// Parameters of one search run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Windows starting at or after this digit index are not evaluated
    pub end_index: Option<u64>,
    /// Digits the window advances per step
    pub stride: u64,
    /// Grouping of digits into symbols
    pub alphabet: Alphabet,
    /// End the run at the first zero-error window
    pub stop_on_perfect: bool,
    /// Digits between persisted checkpoints
    pub checkpoint_interval: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            end_index: None,
            stride: DEFAULT_STRIDE,
            alphabet: Alphabet::default(),
            stop_on_perfect: true,
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
        }
    }
}

impl SearchConfig {
    /// Check parameter ranges
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The stride is zero or larger than [`MAX_STRIDE`]
    /// - The checkpoint interval is zero
    pub fn validate(&self) -> Result<()> {
        if self.stride == 0 {
            return Err(invalid_parameter("stride", &self.stride, &"must be at least 1"));
        }
        if self.stride > MAX_STRIDE {
            return Err(invalid_parameter(
                "stride",
                &self.stride,
                &format!("must be at most {MAX_STRIDE}"),
            ));
        }
        if self.checkpoint_interval == 0 {
            return Err(invalid_parameter(
                "checkpoint_interval",
                &self.checkpoint_interval,
                &"must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Terminal state of a run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A zero-error window was found and the run stopped there
    Matched,
    /// The stream or the requested range ran out
    Exhausted,
    /// Stopped on request or by a persistent source failure
    Interrupted,
}

/// Summary returned when a run ends
#[derive(Debug)]
pub struct SearchReport {
    /// How the run ended
    pub outcome: SearchOutcome,
    /// Best result, including any carried over from a resumed run
    pub best: Option<FitResult>,
    /// Start index of the first window not evaluated
    pub next_index: u64,
    /// Windows evaluated in this run
    pub windows_evaluated: u64,
    /// Source failure that interrupted the run
    pub failure: Option<SearchError>,
}

/// Receiver of search events
pub trait SearchSink {
    /// A new best window; `window` holds its raw digits
    ///
    /// # Errors
    ///
    /// Returns an error if the improvement cannot be recorded; the run stops
    fn improved(&mut self, result: &FitResult, window: &[u8]) -> Result<()>;

    /// Every window before `next_index` has been evaluated
    ///
    /// # Errors
    ///
    /// Returns an error if the checkpoint cannot be recorded; the run stops
    fn checkpoint(&mut self, next_index: u64) -> Result<()>;

    /// Periodic progress notification
    fn progress(&mut self, _next_index: u64, _best: Option<&FitResult>) {}
}

enum Fill {
    Ready,
    Exhausted,
    Failed(SearchError),
}

/// Fits every window of a stream against one target
pub struct SearchEngine<'a> {
    target: &'a TargetDescriptor,
    policy: Box<dyn FitPolicy>,
    config: SearchConfig,
    tracker: BestTracker,
}

impl<'a> SearchEngine<'a> {
    /// Engine for `target`, continuing from `tracker`
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation
    pub fn new(
        target: &'a TargetDescriptor,
        policy: Box<dyn FitPolicy>,
        config: SearchConfig,
        tracker: BestTracker,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            target,
            policy,
            config,
            tracker,
        })
    }

    /// Digits spanned by one window
    pub fn window_digits(&self) -> usize {
        self.config.alphabet.window_digits(self.target.pixel_count())
    }

    /// Slide the window from the stream's current position until a terminal
    /// state is reached
    ///
    /// `stop` is polled between windows. A tracker resumed with a perfect
    /// best ends the run as `Matched` before any window when
    /// `stop_on_perfect` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails to record an improvement or a
    /// checkpoint. Source failures end the run as interrupted instead.
    pub fn run(
        &mut self,
        stream: &mut DigitStream,
        sink: &mut dyn SearchSink,
        stop: &AtomicBool,
    ) -> Result<SearchReport> {
        let window_digits = self.window_digits();
        let stride = self.config.stride;
        let alphabet = self.config.alphabet;

        let mut window: VecDeque<u8> = VecDeque::with_capacity(window_digits);
        let mut symbols = Vec::with_capacity(self.target.pixel_count());
        let mut start = stream.next_index();
        let mut pending = window_digits as u64;
        let mut evaluated = 0u64;
        let mut since_checkpoint = 0u64;
        let mut since_progress = 0u64;
        let mut failure = None;

        log::debug!(
            "Searching {} from digit {start} with windows of {window_digits} digits",
            stream.describe()
        );

        let already_matched = self.config.stop_on_perfect
            && self.tracker.best().is_some_and(FitResult::is_perfect);

        let outcome = loop {
            if already_matched {
                log::info!("Best window so far is already a perfect match");
                break SearchOutcome::Matched;
            }
            if stop.load(Ordering::Relaxed) {
                break SearchOutcome::Interrupted;
            }
            if self.config.end_index.is_some_and(|end| start >= end) {
                break SearchOutcome::Exhausted;
            }

            match Self::fill(&mut window, window_digits, stream, pending) {
                Fill::Ready => {}
                Fill::Exhausted => break SearchOutcome::Exhausted,
                Fill::Failed(error) => {
                    log::error!("Stopping at digit {start}: {error}");
                    failure = Some(error);
                    break SearchOutcome::Interrupted;
                }
            }

            let digits = window.make_contiguous();
            alphabet.fill_symbols(digits, &mut symbols);
            let fit = self.policy.fit(self.target, &symbols, alphabet);
            let result = FitResult::new(start, fit);
            let perfect = result.is_perfect();
            evaluated += 1;

            let improved = self.tracker.offer(result) == Step::Improved;
            if improved {
                if let Some(best) = self.tracker.best() {
                    sink.improved(best, digits)?;
                }
                sink.checkpoint(start.saturating_add(stride))?;
                if perfect && self.config.stop_on_perfect {
                    start = start.saturating_add(stride);
                    break SearchOutcome::Matched;
                }
            }

            start = start.saturating_add(stride);
            pending = stride;
            since_progress = since_progress.saturating_add(stride);

            if improved {
                since_checkpoint = 0;
            } else {
                since_checkpoint = since_checkpoint.saturating_add(stride);
                if since_checkpoint >= self.config.checkpoint_interval {
                    sink.checkpoint(start)?;
                    since_checkpoint = 0;
                }
            }
            if since_progress >= PROGRESS_REFRESH_INTERVAL {
                sink.progress(start, self.tracker.best());
                since_progress = 0;
            }
        };

        sink.checkpoint(start)?;
        sink.progress(start, self.tracker.best());

        Ok(SearchReport {
            outcome,
            best: self.tracker.best().cloned(),
            next_index: start,
            windows_evaluated: evaluated,
            failure,
        })
    }

    // Pulls `count` digits into the ring, dropping the oldest once it is full
    fn fill(
        window: &mut VecDeque<u8>,
        capacity: usize,
        stream: &mut DigitStream,
        count: u64,
    ) -> Fill {
        for _ in 0..count {
            match stream.next() {
                Some(Ok(digit)) => {
                    if window.len() == capacity {
                        window.pop_front();
                    }
                    window.push_back(digit);
                }
                Some(Err(error)) => return Fill::Failed(error),
                None => return Fill::Exhausted,
            }
        }
        Fill::Ready
    }
}
