//! Tests for progress status text and the hidden reporter

#[cfg(test)]
mod tests {
    use pifind::fitting::assignment::{Assignment, FitResult};
    use pifind::io::progress::{ProgressReporter, status_message};

    fn best() -> FitResult {
        FitResult {
            start_index: 12_345,
            assignment: Assignment::unassigned(16),
            error_score: 2.0,
        }
    }

    // Tests status before any window was scored
    // Verified by printing a placeholder best
    #[test]
    fn test_status_without_best() {
        assert_eq!(status_message(1234, None), "1,234 digits checked");
    }

    // Tests status with a best window
    // Verified by omitting the best index
    #[test]
    fn test_status_with_best() {
        assert_eq!(
            status_message(20_000, Some(&best())),
            "20,000 digits checked, best score 2 at digit 12,345"
        );
    }

    // Tests the hidden reporter accepts every call
    // Verified by drawing to the terminal when hidden
    #[test]
    fn test_hidden_reporter() {
        let reporter = ProgressReporter::hidden();

        reporter.update(10, Some(&best()));
        reporter.announce("New best");
        reporter.finish();
    }

    // Tests bounded and unbounded reporters can be created and finished
    // Verified by requiring a digit count
    #[test]
    fn test_bounded_and_unbounded() {
        let bounded = ProgressReporter::new(5, Some(100));
        bounded.update(50, None);
        bounded.finish();

        let unbounded = ProgressReporter::new(0, None);
        unbounded.update(50, None);
        unbounded.finish();
    }
}
