//! Tests for RGB colors, the squared-distance metric and centroid sums

#[cfg(test)]
mod tests {
    use pifind::target::color::{ColorSum, Rgb};

    // Tests squared distance sums per-channel squares
    // Verified by summing absolute differences instead
    #[test]
    fn test_distance_squared() {
        let a = Rgb::new(0, 0, 0);
        let b = Rgb::new(1, 2, 3);

        assert_eq!(a.distance_squared(b), 14);
        assert_eq!(b.distance_squared(a), 14);
        assert_eq!(a.distance_squared(a), 0);
    }

    // Tests the largest possible distance does not overflow
    // Verified by computing the difference in u8
    #[test]
    fn test_distance_squared_extremes() {
        let black = Rgb::new(0, 0, 0);
        let white = Rgb::new(255, 255, 255);

        assert_eq!(black.distance_squared(white), 3 * 255 * 255);
    }

    // Tests weighted average rounds each channel
    // Verified by truncating instead of rounding
    #[test]
    fn test_weighted_average_rounds() {
        let average =
            Rgb::weighted_average([(Rgb::new(0, 0, 0), 1), (Rgb::new(255, 255, 255), 1)]);

        assert_eq!(average, Rgb::new(128, 128, 128));
    }

    // Tests weighted average respects counts
    // Verified by ignoring the weights
    #[test]
    fn test_weighted_average_weights() {
        let average = Rgb::weighted_average([(Rgb::new(0, 0, 0), 3), (Rgb::new(100, 0, 0), 1)]);

        assert_eq!(average, Rgb::new(25, 0, 0));
    }

    // Tests weighted average of nothing is black
    // Verified by dividing by a zero total
    #[test]
    fn test_weighted_average_empty() {
        assert_eq!(Rgb::weighted_average([]), Rgb::default());
    }

    // Tests display as uppercase hex triplet
    // Verified by dropping zero padding
    #[test]
    fn test_display_hex() {
        assert_eq!(Rgb::new(255, 0, 16).to_string(), "#FF0010");
    }

    // Tests conversion to and from image pixels keeps channels
    // Verified by swapping red and blue
    #[test]
    fn test_image_pixel_conversion() {
        let color = Rgb::new(1, 2, 3);
        let pixel: image::Rgb<u8> = color.into();

        assert_eq!(pixel.0, [1, 2, 3]);
        assert_eq!(Rgb::from(pixel), color);
    }

    // Tests centroid distance is zero at the exact centroid
    // Verified by omitting the count scaling
    #[test]
    fn test_color_sum_centroid() {
        let mut sum = ColorSum::default();
        sum.add(Rgb::new(10, 0, 0), 1);
        sum.add(Rgb::new(20, 0, 0), 1);

        assert_eq!(sum.scaled_distance(Rgb::new(15, 0, 0)), 0);
        assert_eq!(sum.scaled_distance(Rgb::new(10, 0, 0)), 100);
    }

    // Tests scaled distances order colors like true centroid distances
    // Verified by comparing against the first added color only
    #[test]
    fn test_color_sum_ordering() {
        let mut sum = ColorSum::default();
        sum.add(Rgb::new(0, 0, 0), 3);
        sum.add(Rgb::new(255, 255, 255), 1);

        let black = sum.scaled_distance(Rgb::new(0, 0, 0));
        let white = sum.scaled_distance(Rgb::new(255, 255, 255));
        assert!(black < white);
    }

    // Tests equal-distance colors produce exactly equal values
    // Verified by using floating point centroids
    #[test]
    fn test_color_sum_exact_tie() {
        let mut sum = ColorSum::default();
        sum.add(Rgb::new(0, 0, 0), 2);
        sum.add(Rgb::new(255, 255, 255), 2);

        assert_eq!(
            sum.scaled_distance(Rgb::new(0, 0, 0)),
            sum.scaled_distance(Rgb::new(255, 255, 255))
        );
    }
}
