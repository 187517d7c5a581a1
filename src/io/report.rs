//! Human-readable summaries of search results

use crate::fitting::alphabet::Alphabet;
use crate::search::engine::{SearchOutcome, SearchReport};
use crate::target::descriptor::TargetDescriptor;

/// Decimal with comma thousands separators
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Ordinal with thousands separators: 1st, 2nd, 3rd, 4th, 11th, 1,001st
pub fn ordinal(n: u64) -> String {
    let suffix = if (n % 100) / 10 == 1 {
        "th"
    } else {
        match n % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        }
    };
    format!("{}{suffix}", thousands(n))
}

/// Where a window starting at `start_index` lies, as digit and bit ranges
pub fn window_location(start_index: u64, window_digits: usize) -> [String; 2] {
    let digits = window_digits as u64;
    [
        format!(
            "It contains the {} through {} hexadecimal digits of pi.",
            ordinal(start_index + 1),
            ordinal(start_index + digits)
        ),
        format!(
            "Equivalently, the {} through {} bits.",
            ordinal(4 * start_index + 1),
            ordinal(4 * (start_index + digits))
        ),
    ]
}

/// Palette with pixel counts, then the pattern one row per line
pub fn target_lines(target: &TargetDescriptor) -> Vec<String> {
    let mut lines: Vec<String> = target
        .colors()
        .iter()
        .zip(target.color_histogram())
        .enumerate()
        .map(|(index, (color, count))| format!("Color {index}: {color} ({count} pixels)"))
        .collect();
    lines.extend(target.pattern_lines());
    lines
}

/// Closing lines for a finished run
pub fn summary_lines(
    report: &SearchReport,
    target: &TargetDescriptor,
    alphabet: Alphabet,
) -> Vec<String> {
    let mut lines = vec![match report.outcome {
        SearchOutcome::Matched => "Found a perfect match.".to_string(),
        SearchOutcome::Exhausted => "Searched every available window.".to_string(),
        SearchOutcome::Interrupted => format!(
            "Interrupted; resume from digit {}.",
            thousands(report.next_index)
        ),
    }];

    if let Some(failure) = &report.failure {
        lines.push(format!("Cause: {failure}"));
    }

    match &report.best {
        Some(best) => {
            lines.push(format!(
                "Best window starts at digit {} with score {}.",
                thousands(best.start_index),
                best.error_score
            ));
            lines.extend(window_location(
                best.start_index,
                alphabet.window_digits(target.pixel_count()),
            ));
        }
        None => lines.push("No window was evaluated.".to_string()),
    }
    lines
}
