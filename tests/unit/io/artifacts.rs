//! Tests for the sink that writes the best image and the state file

#[cfg(test)]
mod tests {
    use ndarray::array;
    use pifind::fitting::alphabet::Alphabet;
    use pifind::fitting::assignment::{Assignment, FitResult};
    use pifind::fitting::policy::Metric;
    use pifind::io::artifacts::ArtifactSink;
    use pifind::io::progress::ProgressReporter;
    use pifind::search::engine::SearchSink;
    use pifind::search::state::{PersistedState, StateStore};
    use pifind::target::color::Rgb;
    use pifind::target::descriptor::TargetDescriptor;

    fn target() -> TargetDescriptor {
        TargetDescriptor::new(
            array![[0, 1], [1, 0]],
            vec![Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)],
        )
        .expect("valid target")
    }

    fn perfect_at(start_index: u64) -> FitResult {
        let mut assignment = Assignment::unassigned(16);
        assignment.set(1, 0);
        assignment.set(2, 1);
        FitResult {
            start_index,
            assignment,
            error_score: 0.0,
        }
    }

    // Tests an improvement renders the image and records the window
    // Verified by recording the best without its digits
    #[test]
    fn test_improved_writes_image() {
        let dir = tempfile::tempdir().expect("tempdir");
        let output = dir.path().join("found.gif");
        let target = target();
        let progress = ProgressReporter::hidden();
        let state = PersistedState::new(target.fingerprint(), Alphabet::Nibble, Metric::Squared, 0);
        let mut sink = ArtifactSink::new(
            &target,
            &output,
            StateStore::new(dir.path().join("found.json")),
            state,
            &progress,
        );

        sink.improved(&perfect_at(7), &[1, 2, 2, 1])
            .expect("record improvement");

        assert!(output.exists());
        assert_eq!(sink.state().window_hex.as_deref(), Some("1221"));
        assert_eq!(
            sink.state().best.as_ref().map(|best| best.start_index),
            Some(7)
        );
    }

    // Tests a checkpoint persists the next index with the best
    // Verified by saving only on improvement
    #[test]
    fn test_checkpoint_persists_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = StateStore::new(dir.path().join("found.json"));
        let target = target();
        let progress = ProgressReporter::hidden();
        let state = PersistedState::new(target.fingerprint(), Alphabet::Nibble, Metric::Squared, 0);
        let mut sink = ArtifactSink::new(
            &target,
            &dir.path().join("found.gif"),
            store.clone(),
            state,
            &progress,
        );

        sink.improved(&perfect_at(3), &[1, 2, 2, 1])
            .expect("record improvement");
        sink.checkpoint(4).expect("checkpoint");
        sink.progress(4, None);

        let saved = store.load().expect("load state").expect("state present");
        assert_eq!(saved.next_index, 4);
        assert_eq!(saved.best.map(|best| best.start_index), Some(3));
        assert_eq!(sink.into_state().next_index, 4);
    }
}
