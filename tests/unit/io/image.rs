//! Tests for window rendering and atomic image export

#[cfg(test)]
mod tests {
    use ndarray::array;
    use pifind::SearchError;
    use pifind::fitting::assignment::Assignment;
    use pifind::io::image::{export_window, render_window, save_image, window_palette};
    use pifind::target::color::Rgb;
    use pifind::target::descriptor::TargetDescriptor;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 255);

    fn target() -> TargetDescriptor {
        TargetDescriptor::new(array![[0, 1], [1, 0]], vec![RED, BLUE]).expect("valid target")
    }

    // Tests each pixel takes its symbol's assigned color
    // Verified by painting the target's own colors
    #[test]
    fn test_render_window() {
        let mut assignment = Assignment::unassigned(16);
        assignment.set(7, 1);
        assignment.set(9, 0);

        let image = render_window(&target(), &[7, 9, 9, 9], &assignment);

        assert_eq!(image.dimensions(), (2, 2));
        assert_eq!(image.get_pixel(0, 0).0, BLUE.0);
        assert_eq!(image.get_pixel(1, 0).0, RED.0);
        assert_eq!(image.get_pixel(1, 1).0, RED.0);
    }

    // Tests unassigned symbols render black
    // Verified by defaulting to the first color
    #[test]
    fn test_render_unassigned() {
        let image = render_window(&target(), &[1, 2, 3, 4], &Assignment::unassigned(16));

        assert!(image.pixels().all(|pixel| pixel.0 == [0, 0, 0]));
    }

    // Tests a saved PNG decodes to the same pixels
    // Verified by swapping channels on export
    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("quantized.png");
        let image = target().to_image();

        save_image(&image, &path).expect("save image");
        let decoded = image::open(&path).expect("decode image").to_rgb8();
        assert_eq!(decoded, image);
    }

    // Tests GIF export writes a decodable file and replaces an older one
    // Verified by leaving the stale file in place
    #[test]
    fn test_export_gif_replaces() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("found.gif");
        std::fs::write(&path, b"stale").expect("write stale file");

        let mut assignment = Assignment::unassigned(16);
        assignment.set(0, 0);
        assignment.set(1, 1);
        export_window(&target(), &[0, 1, 1, 0], &assignment, &path).expect("export gif");

        let decoded = image::open(&path).expect("decode gif").to_rgb8();
        assert_eq!(decoded.dimensions(), (2, 2));
        assert_eq!(decoded.get_pixel(0, 0).0, RED.0);
    }

    // Tests GIF pixel indices are the window symbols and the palette their colors
    // Verified by letting the encoder choose indices by color
    #[test]
    fn test_export_gif_keeps_symbols() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("found.gif");
        let mut assignment = Assignment::unassigned(16);
        assignment.set(3, 0);
        assignment.set(5, 0);
        assignment.set(9, 1);
        assignment.set(12, 1);

        export_window(&target(), &[3, 9, 12, 5], &assignment, &path).expect("export gif");

        let mut options = gif::DecodeOptions::new();
        options.set_color_output(gif::ColorOutput::Indexed);
        let file = std::fs::File::open(&path).expect("open gif");
        let mut decoder = options.read_info(file).expect("read gif header");
        let palette = decoder
            .global_palette()
            .map(<[u8]>::to_vec)
            .expect("global palette");
        let frame = decoder
            .read_next_frame()
            .expect("decode frame")
            .expect("one frame");

        assert_eq!(&*frame.buffer, &[3, 9, 12, 5]);
        assert_eq!(palette.len(), 16 * 3);
        assert_eq!(palette.get(9..12), Some(&RED.0[..]));
        assert_eq!(palette.get(27..30), Some(&BLUE.0[..]));
        assert_eq!(palette.get(0..3), Some(&[0, 0, 0][..]));
    }

    // Tests non-GIF window exports are plain renderings
    // Verified by writing palette indices as gray levels
    #[test]
    fn test_export_png_window() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("found.png");
        let mut assignment = Assignment::unassigned(16);
        assignment.set(3, 0);
        assignment.set(9, 1);

        export_window(&target(), &[3, 9, 9, 3], &assignment, &path).expect("export png");

        let decoded = image::open(&path).expect("decode png").to_rgb8();
        assert_eq!(decoded, target().to_image());
    }

    // Tests the palette spans the whole alphabet
    // Verified by sizing the palette to the reference colors
    #[test]
    fn test_byte_palette() {
        let mut assignment = Assignment::unassigned(256);
        assignment.set(200, 1);

        let palette = window_palette(&target(), &assignment);

        assert_eq!(palette.len(), 256 * 3);
        assert_eq!(palette.get(600..603), Some(&BLUE.0[..]));
        assert_eq!(palette.iter().filter(|&&byte| byte != 0).count(), 1);
    }

    // Tests unknown extensions are refused
    // Verified by defaulting to PNG
    #[test]
    fn test_unknown_extension() {
        let dir = tempfile::tempdir().expect("tempdir");

        let result = save_image(&target().to_image(), &dir.path().join("found.xyz"));
        assert!(matches!(result, Err(SearchError::ImageExport { .. })));
    }
}
