//! Command-line interface for searching the hex digits of pi for a target image

use crate::fitting::alphabet::Alphabet;
use crate::fitting::policy::Metric;
use crate::io::artifacts::ArtifactSink;
use crate::io::configuration::{
    ARCHIVE_TEXT_NAME, ARCHIVE_ZIP_NAME, DEFAULT_CHECKPOINT_INTERVAL, DEFAULT_MAX_PIXELS,
    DEFAULT_OUTPUT, DEFAULT_STATE, DEFAULT_STRIDE, DEFAULT_TARGET, MAX_TARGET_COLORS,
};
use crate::io::error::{Result, SearchError, invalid_parameter};
use crate::io::image::{export_window, save_image};
use crate::io::interrupt::StopSignal;
use crate::io::progress::ProgressReporter;
use crate::io::report::{summary_lines, target_lines, thousands, window_location};
use crate::search::engine::{SearchConfig, SearchEngine, SearchReport};
use crate::search::state::{PersistedState, StateStore};
use crate::search::tracker::BestTracker;
use crate::stream::{ArchiveSource, DigitSource, DigitStream, FallbackSource, RemoteSource};
use crate::target::descriptor::TargetDescriptor;
use crate::target::quantize::QuantizeMode;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// How a target with too many colors is handled
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum QuantizeArg {
    /// Refuse the target
    #[default]
    Reject,
    /// Keep the `--colors` most common colors
    MostCommon,
    /// Merge similar colors into families
    Families,
}

#[derive(Parser)]
#[command(name = "pifind")]
#[command(
    author,
    version,
    about = "Search the hexadecimal digits of pi for a window that looks like an image"
)]
/// Command-line arguments for the search tool
#[expect(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Target image with at most six colors
    #[arg(value_name = "TARGET", default_value = DEFAULT_TARGET)]
    pub target: PathBuf,

    /// Digit index of the first window (0 is the first digit after the point)
    #[arg(short, long, default_value_t = 0)]
    pub start: u64,

    /// Stop before the window starting at this digit index
    #[arg(short, long)]
    pub end: Option<u64>,

    /// Local digit archive (.txt or .zip)
    #[arg(short, long)]
    pub archive: Option<PathBuf>,

    /// Image written for the best window so far
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Resumable search state
    #[arg(long, default_value = DEFAULT_STATE)]
    pub state: PathBuf,

    /// Digits the window advances per step
    #[arg(long, default_value_t = DEFAULT_STRIDE)]
    pub stride: u64,

    /// Map each pixel to one digit or to a pair of digits
    #[arg(long, value_enum, default_value_t = Alphabet::default())]
    pub alphabet: Alphabet,

    /// How windows are scored
    #[arg(long, value_enum, default_value_t = Metric::default())]
    pub metric: Metric,

    /// What to do with a target that has more than six colors
    #[arg(long, value_enum, default_value_t = QuantizeArg::default())]
    pub quantize: QuantizeArg,

    /// Colors kept by `--quantize most-common`
    #[arg(long, default_value_t = MAX_TARGET_COLORS)]
    pub colors: usize,

    /// Largest target accepted, in pixels
    #[arg(long, default_value_t = DEFAULT_MAX_PIXELS)]
    pub max_pixels: usize,

    /// Digits between state file checkpoints
    #[arg(long, default_value_t = DEFAULT_CHECKPOINT_INTERVAL)]
    pub checkpoint_interval: u64,

    /// Continue from the remote service if the archive turns out corrupt
    #[arg(long)]
    pub fallback_remote: bool,

    /// Never contact the remote service
    #[arg(long)]
    pub offline: bool,

    /// Keep searching after a perfect match
    #[arg(long)]
    pub keep_going: bool,

    /// Ignore any saved state and start from `--start`
    #[arg(long)]
    pub fresh: bool,

    /// Fit and render only the window at this digit index
    #[arg(long, value_name = "INDEX")]
    pub verify: Option<u64>,

    /// Also save the target as reduced to its palette
    #[arg(long, value_name = "PATH")]
    pub save_quantized: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Quantization requested by `--quantize` and `--colors`
    pub const fn quantize_mode(&self) -> QuantizeMode {
        match self.quantize {
            QuantizeArg::Reject => QuantizeMode::Reject,
            QuantizeArg::MostCommon => QuantizeMode::MostCommon(self.colors),
            QuantizeArg::Families => QuantizeMode::Families,
        }
    }

    /// Search parameters from the command line
    pub const fn search_config(&self) -> SearchConfig {
        SearchConfig {
            end_index: self.end,
            stride: self.stride,
            alphabet: self.alphabet,
            stop_on_perfect: !self.keep_going,
            checkpoint_interval: self.checkpoint_interval,
        }
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Orchestrates one invocation: target loading, source selection, search
/// and reporting
pub struct SearchRunner {
    cli: Cli,
}

impl SearchRunner {
    /// Create a runner for the given CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the invocation described by the CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The target cannot be loaded or reduced to six colors
    /// - No digit source can be opened
    /// - The saved state belongs to a different search
    /// - An image or the state file cannot be written
    pub fn process(&self) -> Result<()> {
        let target = TargetDescriptor::from_path(
            &self.cli.target,
            self.cli.quantize_mode(),
            self.cli.max_pixels,
        )?;
        log::info!(
            "Target {}: {}x{} pixels, {} colors",
            self.cli.target.display(),
            target.width(),
            target.height(),
            target.color_count()
        );
        for line in target_lines(&target) {
            log::info!("{line}");
        }

        if let Some(path) = &self.cli.save_quantized {
            save_image(&target.to_image(), path)?;
            log::info!("Saved quantized target to {}", path.display());
        }

        if let Some(index) = self.cli.verify {
            return self.verify(&target, index);
        }

        let stop = StopSignal::new();
        stop.install()?;
        let source = self.open_source()?;
        let report = self.search(&target, source, &stop)?;

        for line in summary_lines(&report, &target, self.cli.alphabet) {
            log::info!("{line}");
        }
        if report.best.is_some() {
            log::info!("Best window rendered to {}", self.cli.output.display());
        }
        Ok(())
    }

    /// Search `source` for `target`, resuming from the state file unless
    /// `--fresh` was given
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The saved state cannot be read or belongs to a different search
    /// - The search parameters are invalid
    /// - The best image or the state file cannot be written
    pub fn search(
        &self,
        target: &TargetDescriptor,
        source: Box<dyn DigitSource>,
        stop: &StopSignal,
    ) -> Result<SearchReport> {
        let store = StateStore::new(&self.cli.state);
        let state = self.initial_state(target, &store)?;
        let tracker = BestTracker::resume(state.best.clone());

        let mut stream = DigitStream::new(source, state.next_index);
        let progress = if self.cli.should_show_progress() {
            ProgressReporter::new(state.next_index, stream.digit_count())
        } else {
            ProgressReporter::hidden()
        };

        let mut engine = SearchEngine::new(
            target,
            self.cli.metric.policy(),
            self.cli.search_config(),
            tracker,
        )?;
        let mut sink = ArtifactSink::new(target, &self.cli.output, store, state, &progress);
        let report = engine.run(&mut stream, &mut sink, stop.flag());
        progress.finish();
        report
    }

    fn initial_state(
        &self,
        target: &TargetDescriptor,
        store: &StateStore,
    ) -> Result<PersistedState> {
        let fingerprint = target.fingerprint();
        if !self.cli.fresh
            && let Some(state) =
                store.load_matching(&fingerprint, self.cli.alphabet, self.cli.metric)?
        {
            if self.cli.start != 0 && self.cli.start != state.next_index {
                log::warn!(
                    "Ignoring --start {}; resuming from digit {} (use --fresh to restart)",
                    self.cli.start,
                    state.next_index
                );
            }
            log::info!(
                "Resuming from digit {} ({})",
                thousands(state.next_index),
                store.path().display()
            );
            return Ok(state);
        }
        Ok(PersistedState::new(
            fingerprint,
            self.cli.alphabet,
            self.cli.metric,
            self.cli.start,
        ))
    }

    fn verify(&self, target: &TargetDescriptor, index: u64) -> Result<()> {
        let window_digits = self.cli.alphabet.window_digits(target.pixel_count());
        let mut stream = DigitStream::new(self.open_source()?, index);
        let digits = stream.window(index, window_digits)?;

        let mut symbols = Vec::with_capacity(target.pixel_count());
        self.cli.alphabet.fill_symbols(&digits, &mut symbols);
        let fit = self
            .cli
            .metric
            .policy()
            .fit(target, &symbols, self.cli.alphabet);
        export_window(target, &symbols, &fit.assignment, &self.cli.output)?;

        log::info!(
            "Window at digit {} scores {}; rendered to {}",
            thousands(index),
            fit.error_score,
            self.cli.output.display()
        );
        for line in window_location(index, window_digits) {
            log::info!("{line}");
        }
        Ok(())
    }

    /// Digit source chosen by `--archive`, a local archive or the remote
    /// service
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The chosen archive cannot be opened and no fallback applies
    /// - No archive exists and `--offline` forbids the remote service
    pub fn open_source(&self) -> Result<Box<dyn DigitSource>> {
        let fallback = self.cli.fallback_remote && !self.cli.offline;
        let Some(path) = self.cli.archive.clone().or_else(local_archive) else {
            if self.cli.offline {
                return Err(invalid_parameter(
                    "archive",
                    &"<none>",
                    &format!(
                        "no {ARCHIVE_TEXT_NAME} or {ARCHIVE_ZIP_NAME} found and --offline forbids the remote service"
                    ),
                ));
            }
            log::info!("No local archive; fetching digits from the remote service");
            return Ok(Box::new(RemoteSource::default()));
        };

        match ArchiveSource::open(&path) {
            Ok(archive) => {
                log::info!("Reading digits from {}", path.display());
                if fallback {
                    Ok(Box::new(FallbackSource::new(
                        Box::new(archive),
                        Box::new(RemoteSource::default()),
                    )))
                } else {
                    Ok(Box::new(archive))
                }
            }
            Err(error @ SearchError::CorruptArchive { .. }) if fallback => {
                log::warn!("{error}; using the remote service instead");
                Ok(Box::new(RemoteSource::default()))
            }
            Err(error) => Err(error),
        }
    }
}

fn local_archive() -> Option<PathBuf> {
    [ARCHIVE_TEXT_NAME, ARCHIVE_ZIP_NAME]
        .into_iter()
        .map(Path::new)
        .find(|path| path.is_file())
        .map(Path::to_path_buf)
}
