//! Tests for the dominant-color mismatch policy

#[cfg(test)]
mod tests {
    use ndarray::array;
    use pifind::fitting::alphabet::Alphabet;
    use pifind::fitting::mismatch::DominantColor;
    use pifind::fitting::policy::{FitPolicy, SquaredDistance};
    use pifind::target::color::Rgb;
    use pifind::target::descriptor::TargetDescriptor;

    const BLACK: Rgb = Rgb::new(0, 0, 0);
    const WHITE: Rgb = Rgb::new(255, 255, 255);

    fn diagonal() -> TargetDescriptor {
        TargetDescriptor::new(array![[0, 1], [1, 0]], vec![BLACK, WHITE]).expect("valid target")
    }

    // Tests a one-to-one mapping scores zero
    // Verified by counting every pixel as a mismatch
    #[test]
    fn test_perfect_window() {
        let fit = DominantColor.fit(&diagonal(), &[3, 5, 5, 3], Alphabet::Nibble);

        assert!(fit.error_score.abs() < f64::EPSILON);
        assert_eq!(fit.assignment.get(3), Some(0));
        assert_eq!(fit.assignment.get(5), Some(1));
    }

    // Tests mismatches plus the muddle fraction
    // Verified by dropping the muddle term
    #[test]
    fn test_mismatch_and_muddle() {
        // Symbol 3 covers black, white, white; symbol 5 covers black
        let fit = DominantColor.fit(&diagonal(), &[3, 3, 3, 5], Alphabet::Nibble);

        assert_eq!(fit.assignment.get(3), Some(1));
        assert_eq!(fit.assignment.get(5), Some(0));
        assert!((fit.error_score - (1.0 + 3.0 / 5.0)).abs() < 1e-12);
    }

    // Tests single-color targets are never muddled
    // Verified by counting muddle for one-color palettes
    #[test]
    fn test_single_color_target() {
        let target = TargetDescriptor::new(array![[0, 0, 0]], vec![BLACK]).expect("valid target");

        let fit = DominantColor.fit(&target, &[1, 2, 1], Alphabet::Nibble);
        assert!(fit.error_score.abs() < f64::EPSILON);
    }

    // Tests the policy agrees with the squared policy on perfect windows
    // Verified by scoring muddle on unmuddled windows
    #[test]
    fn test_zero_agrees_with_squared() {
        let target = diagonal();
        for symbols in [[3, 5, 5, 3], [3, 3, 3, 3], [1, 2, 2, 4], [1, 2, 3, 4]] {
            let dominant = DominantColor.fit(&target, &symbols, Alphabet::Nibble);
            let squared = SquaredDistance.fit(&target, &symbols, Alphabet::Nibble);
            assert_eq!(
                dominant.error_score.abs() < f64::EPSILON,
                squared.error_score.abs() < f64::EPSILON,
                "disagreement on {symbols:?}"
            );
        }
    }
}
