//! Tests for the shared stop signal

#[cfg(test)]
mod tests {
    use pifind::SearchError;
    use pifind::io::interrupt::StopSignal;
    use std::sync::atomic::Ordering;

    // Tests a new signal is not raised
    // Verified by starting raised
    #[test]
    fn test_new_signal() {
        let signal = StopSignal::new();

        assert!(!signal.is_stopped());
        assert!(!signal.flag().load(Ordering::SeqCst));
    }

    // Tests raising is visible through clones and the flag
    // Verified by cloning the flag value instead of sharing it
    #[test]
    fn test_request_stop_shared() {
        let signal = StopSignal::new();
        let handle = signal.clone();

        handle.request_stop();
        assert!(signal.is_stopped());
        assert!(signal.flag().load(Ordering::SeqCst));
    }

    // Tests only one process-wide handler can be installed
    // Verified by ignoring the handler error
    #[test]
    fn test_install_once() {
        let signal = StopSignal::new();

        assert!(signal.install().is_ok());
        assert!(matches!(
            StopSignal::new().install(),
            Err(SearchError::SignalHandler { .. })
        ));
        assert!(!signal.is_stopped());
    }
}
