//! Tests for color counting, palette reduction and nearest-color lookup

#[cfg(test)]
mod tests {
    use pifind::SearchError;
    use pifind::target::color::Rgb;
    use pifind::target::quantize::{
        ColorCounts, QuantizeMode, color_families, nearest_color, reduce_colors, sieve_colors,
    };

    const BLACK: Rgb = Rgb::new(0, 0, 0);
    const WHITE: Rgb = Rgb::new(255, 255, 255);
    const RED: Rgb = Rgb::new(255, 0, 0);
    const GREEN: Rgb = Rgb::new(0, 255, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 255);
    const YELLOW: Rgb = Rgb::new(255, 255, 0);
    const CYAN: Rgb = Rgb::new(0, 255, 255);

    fn repeated(colors: &[(Rgb, usize)]) -> ColorCounts {
        ColorCounts::from_pixels(
            colors
                .iter()
                .flat_map(|&(color, count)| std::iter::repeat_n(color, count)),
        )
    }

    // Tests counting keeps first-appearance order
    // Verified by sorting colors by value
    #[test]
    fn test_color_counts_first_appearance() {
        let counts = ColorCounts::from_pixels([RED, BLACK, RED, WHITE, RED, BLACK]);

        assert_eq!(counts.len(), 3);
        assert_eq!(counts.total(), 6);
        assert_eq!(counts.colors(), vec![RED, BLACK, WHITE]);
        assert_eq!(
            counts.most_common(),
            vec![(RED, 3), (BLACK, 2), (WHITE, 1)]
        );
    }

    // Tests most-common ordering is stable for equal counts
    // Verified by using an unstable sort
    #[test]
    fn test_most_common_ties_keep_order() {
        let counts = ColorCounts::from_pixels([WHITE, BLACK, BLACK, WHITE]);

        assert_eq!(counts.most_common(), vec![(WHITE, 2), (BLACK, 2)]);
    }

    // Tests small palettes pass through under every mode
    // Verified by quantizing already small palettes
    #[test]
    fn test_reduce_colors_within_limit() {
        let counts = ColorCounts::from_pixels([WHITE, BLACK, BLACK]);

        for mode in [
            QuantizeMode::Reject,
            QuantizeMode::MostCommon(3),
            QuantizeMode::Families,
        ] {
            assert_eq!(reduce_colors(&counts, mode).ok(), Some(vec![WHITE, BLACK]));
        }
    }

    // Tests rejection of a seven-color target
    // Verified by raising the color limit
    #[test]
    fn test_reduce_colors_rejects() {
        let counts = ColorCounts::from_pixels([BLACK, WHITE, RED, GREEN, BLUE, YELLOW, CYAN]);

        let result = reduce_colors(&counts, QuantizeMode::Reject);
        assert!(matches!(
            result,
            Err(SearchError::TooManyColors { found: 7, max: 6 })
        ));
    }

    // Tests most-common keeps the most frequent colors
    // Verified by keeping the first-appearing colors
    #[test]
    fn test_reduce_colors_most_common() {
        let counts = repeated(&[
            (CYAN, 1),
            (BLACK, 7),
            (WHITE, 6),
            (RED, 5),
            (GREEN, 4),
            (BLUE, 3),
            (YELLOW, 2),
        ]);

        let colors = reduce_colors(&counts, QuantizeMode::MostCommon(3));
        assert_eq!(colors.ok(), Some(vec![BLACK, WHITE, RED]));
    }

    // Tests most-common count must lie between three and six
    // Verified by removing the range check
    #[test]
    fn test_reduce_colors_most_common_range() {
        let counts = ColorCounts::from_pixels([BLACK, WHITE, RED, GREEN, BLUE, YELLOW, CYAN]);

        for limit in [0, 2, 7] {
            let result = reduce_colors(&counts, QuantizeMode::MostCommon(limit));
            assert!(matches!(result, Err(SearchError::InvalidParameter { .. })));
        }
    }

    // Tests family merging folds a near-duplicate into its head
    // Verified by lowering the base family distance to zero
    #[test]
    fn test_reduce_colors_families() {
        let counts = repeated(&[
            (BLACK, 10),
            (WHITE, 10),
            (RED, 10),
            (GREEN, 10),
            (BLUE, 10),
            (YELLOW, 10),
            (Rgb::new(1, 1, 1), 5),
        ]);

        let colors = reduce_colors(&counts, QuantizeMode::Families);
        assert_eq!(
            colors.ok(),
            Some(vec![BLACK, WHITE, RED, GREEN, BLUE, YELLOW])
        );
    }

    // Tests families below the threshold are averaged by count
    // Verified by keeping the head color unchanged
    #[test]
    fn test_color_families_average() {
        let families = color_families(&[(BLACK, 3), (Rgb::new(10, 0, 0), 1)], 250);

        assert_eq!(families, vec![(Rgb::new(3, 0, 0), 4)]);
    }

    // Tests distant colors stay in separate families
    // Verified by inverting the threshold comparison
    #[test]
    fn test_color_families_separate() {
        let families = color_families(&[(BLACK, 3), (WHITE, 1)], 250);

        assert_eq!(families, vec![(BLACK, 3), (WHITE, 1)]);
    }

    // Tests the sieve drops negligible colors
    // Verified by keeping every family
    #[test]
    fn test_sieve_colors_drops_rare() {
        let kept = sieve_colors(&[(BLACK, 100), (WHITE, 1)], 101);

        assert_eq!(kept, vec![BLACK]);
    }

    // Tests the sieve never empties the palette
    // Verified by removing the fallback
    #[test]
    fn test_sieve_colors_fallback() {
        let kept = sieve_colors(&[(BLACK, 1), (WHITE, 1)], 2);

        assert_eq!(kept, vec![BLACK, WHITE]);
    }

    // Tests nearest color lookup and lower-index ties
    // Verified by preferring the later palette entry
    #[test]
    fn test_nearest_color() {
        let palette = [BLACK, WHITE];
        assert_eq!(nearest_color(&palette, Rgb::new(100, 100, 100)), 0);
        assert_eq!(nearest_color(&palette, Rgb::new(200, 200, 200)), 1);

        let close = [BLACK, Rgb::new(2, 0, 0)];
        assert_eq!(nearest_color(&close, Rgb::new(1, 0, 0)), 0);
    }
}
