mod tests {
    use myrtio_light_script::{Instruction, PixelBuffer, color::Rgb, script};
    use pretty_assertions::assert_eq;

    const R: Rgb = Rgb::new(255, 0, 0);
    const G: Rgb = Rgb::new(0, 255, 0);
    const B: Rgb = Rgb::new(0, 0, 255);

    fn pattern(text: &str) -> script::Pattern {
        match script::parse(text, 64).unwrap().get(0) {
            Some(Instruction::Fill(pattern)) => pattern.clone(),
            other => panic!("expected fill, got {other:?}"),
        }
    }

    #[test]
    fn test_new_clamps() {
        let buffer = PixelBuffer::<8>::new(20, 3.0);
        assert_eq!(buffer.len(), 8);
        assert_eq!(buffer.brightness(), 1.0);

        let buffer = PixelBuffer::<8>::new(0, -1.0);
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.brightness(), 0.0);
    }

    #[test]
    fn test_fill_pattern_repeats() {
        let mut buffer = PixelBuffer::<16>::new(10, 1.0);
        buffer.fill_pattern(&pattern("Fill #FF0000 3 #00FF00 2"));
        assert_eq!(buffer.visible(), &[R, R, R, G, G, R, R, R, G, G]);
    }

    #[test]
    fn test_write_outside_visible_region_is_ignored() {
        let mut buffer = PixelBuffer::<8>::new(4, 1.0);
        buffer.write(4, R);
        buffer.write(3, G);
        assert_eq!(buffer.read(3), Some(G));
        assert_eq!(buffer.read(4), None);
        buffer.set_length(8);
        assert_eq!(buffer.read(4), Some(Rgb::default()));
    }

    #[test]
    fn test_shrink_keeps_hidden_pixels() {
        let mut buffer = PixelBuffer::<8>::new(4, 1.0);
        buffer.write(3, R);
        buffer.set_length(2);
        assert_eq!(buffer.read(3), None);
        buffer.set_length(4);
        assert_eq!(buffer.read(3), Some(R));
    }

    #[test]
    fn test_rotate_is_circular() {
        let mut buffer = PixelBuffer::<8>::new(3, 1.0);
        buffer.write(0, R);
        buffer.write(1, G);
        buffer.write(2, B);

        buffer.rotate(1);
        assert_eq!(buffer.visible(), &[B, R, G]);
        buffer.rotate(-1);
        assert_eq!(buffer.visible(), &[R, G, B]);
        buffer.rotate(3);
        assert_eq!(buffer.visible(), &[R, G, B]);
    }

    #[test]
    fn test_brightness_applies_on_render_only() {
        let mut buffer = PixelBuffer::<4>::new(2, 0.0);
        buffer.write(0, R);
        let mut frame = [Rgb::default(); 4];
        assert_eq!(buffer.render_into(&mut frame), &[Rgb::default(); 2]);
        assert_eq!(buffer.read(0), Some(R));

        buffer.set_brightness(1.0);
        assert_eq!(buffer.render_into(&mut frame), &[R, Rgb::default()]);

        buffer.set_brightness(0.5);
        let rendered: Vec<Rgb> = buffer.as_render_slice().collect();
        assert_eq!(rendered[0].r, 128);
    }

    #[test]
    fn test_nan_brightness_ignored() {
        let mut buffer = PixelBuffer::<4>::new(2, 0.25);
        buffer.set_brightness(f32::NAN);
        assert_eq!(buffer.brightness(), 0.25);
    }
}
