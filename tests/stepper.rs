mod tests {
    use embassy_time::Instant;
    use myrtio_light_script::{PixelBuffer, Step, Stepper, StepperState, color::Rgb, script};
    use pretty_assertions::assert_eq;

    const R: Rgb = Rgb::new(255, 0, 0);
    const G: Rgb = Rgb::new(0, 255, 0);
    const B: Rgb = Rgb::new(0, 0, 255);
    const BLACK: Rgb = Rgb::new(0, 0, 0);

    fn running(text: &str) -> Stepper {
        let mut stepper = Stepper::new();
        stepper.install(script::parse(text, 32).unwrap());
        stepper.start();
        stepper
    }

    #[test]
    fn test_idle_until_started() {
        let mut buffer = PixelBuffer::<10>::new(10, 1.0);
        let mut stepper = Stepper::new();
        stepper.install(script::parse("Fill #FF0000 1", 32).unwrap());
        assert_eq!(stepper.state(), StepperState::Idle);
        assert_eq!(stepper.step(&mut buffer, Instant::from_millis(0)), Step::Done);
        assert_eq!(buffer.read(0), Some(BLACK));
    }

    #[test]
    fn test_black_fill_in_one_step() {
        let mut buffer = PixelBuffer::<10>::new(10, 1.0);
        for index in 0..10 {
            buffer.write(index, Rgb::new(255, 255, 255));
        }

        let mut stepper = running("Fill #000000 1;");
        assert_eq!(stepper.step(&mut buffer, Instant::from_millis(0)), Step::Done);
        assert_eq!(buffer.visible(), &[BLACK; 10]);
        assert_eq!(stepper.state(), StepperState::Completed);
    }

    #[test]
    fn test_pattern_fill_step() {
        let mut buffer = PixelBuffer::<10>::new(10, 1.0);
        let mut stepper = running("Fill #FF0000 3 #00FF00 2;");
        stepper.step(&mut buffer, Instant::from_millis(0));
        assert_eq!(buffer.visible(), &[R, R, R, G, G, R, R, R, G, G]);
    }

    #[test]
    fn test_scalar_instructions() {
        let mut buffer = PixelBuffer::<10>::new(10, 1.0);
        let mut stepper = running("Length 4; Brightness 0.25");
        assert_eq!(stepper.step(&mut buffer, Instant::from_millis(0)), Step::Pending);
        assert_eq!(buffer.len(), 4);
        assert_eq!(stepper.step(&mut buffer, Instant::from_millis(0)), Step::Done);
        assert_eq!(buffer.brightness(), 0.25);
    }

    #[test]
    fn test_slow_fill_timing() {
        let mut buffer = PixelBuffer::<8>::new(4, 1.0);
        let mut stepper = running("SlowFill 0.1 #FF0000 1");

        // First pixel is written immediately
        assert_eq!(stepper.step(&mut buffer, Instant::from_millis(0)), Step::Pending);
        assert_eq!(buffer.visible(), &[R, BLACK, BLACK, BLACK]);

        // Not due yet: no mutation
        assert_eq!(stepper.step(&mut buffer, Instant::from_millis(99)), Step::Pending);
        assert_eq!(buffer.visible(), &[R, BLACK, BLACK, BLACK]);

        assert_eq!(stepper.step(&mut buffer, Instant::from_millis(100)), Step::Pending);
        assert_eq!(buffer.visible(), &[R, R, BLACK, BLACK]);
        assert_eq!(stepper.step(&mut buffer, Instant::from_millis(250)), Step::Pending);
        assert_eq!(stepper.step(&mut buffer, Instant::from_millis(300)), Step::Pending);
        assert_eq!(buffer.visible(), &[R, R, R, BLACK]);
        assert_eq!(stepper.step(&mut buffer, Instant::from_millis(350)), Step::Done);
        assert_eq!(buffer.visible(), &[R; 4]);
        assert_eq!(stepper.state(), StepperState::Completed);
    }

    #[test]
    fn test_slide_forward_and_full_cycle() {
        let mut buffer = PixelBuffer::<8>::new(3, 1.0);
        buffer.write(0, R);
        buffer.write(1, G);
        buffer.write(2, B);

        let mut stepper = running("Slide 0.05 3");
        assert_eq!(stepper.step(&mut buffer, Instant::from_millis(0)), Step::Pending);
        assert_eq!(buffer.visible(), &[B, R, G]);
        assert_eq!(stepper.step(&mut buffer, Instant::from_millis(10)), Step::Pending);
        assert_eq!(buffer.visible(), &[B, R, G]);
        assert_eq!(stepper.step(&mut buffer, Instant::from_millis(50)), Step::Pending);
        assert_eq!(buffer.visible(), &[G, B, R]);
        assert_eq!(stepper.step(&mut buffer, Instant::from_millis(100)), Step::Done);
        assert_eq!(buffer.visible(), &[R, G, B]);
    }

    #[test]
    fn test_slide_backward() {
        let mut buffer = PixelBuffer::<8>::new(3, 1.0);
        buffer.write(0, R);
        buffer.write(1, G);
        buffer.write(2, B);

        let mut stepper = running("Slide -0.05 1");
        assert_eq!(stepper.step(&mut buffer, Instant::from_millis(0)), Step::Done);
        assert_eq!(buffer.visible(), &[G, B, R]);
    }

    #[test]
    fn test_trigger_reports_index_until_retired() {
        let mut buffer = PixelBuffer::<8>::new(3, 1.0);
        let mut stepper = running("Fill #FF0000 1; Trigger; Fill #00FF00 1");
        let now = Instant::from_millis(0);

        assert_eq!(stepper.step(&mut buffer, now), Step::Pending);
        assert_eq!(stepper.step(&mut buffer, now), Step::Trigger { index: 1 });
        assert_eq!(stepper.cursor(), 2);

        stepper.retire_trigger(1);
        stepper.start();
        assert_eq!(stepper.step(&mut buffer, now), Step::Pending);
        assert_eq!(stepper.step(&mut buffer, now), Step::Pending);
        assert_eq!(stepper.step(&mut buffer, now), Step::Done);
        assert_eq!(buffer.read(0), Some(G));
    }

    #[test]
    fn test_install_interrupts_and_keeps_buffer() {
        let mut buffer = PixelBuffer::<8>::new(4, 1.0);
        let mut stepper = running("SlowFill 1 #FF0000 1");
        stepper.step(&mut buffer, Instant::from_millis(0));
        stepper.interrupt();
        assert_eq!(stepper.state(), StepperState::Interrupted);
        assert_eq!(stepper.step(&mut buffer, Instant::from_millis(5000)), Step::Done);
        assert_eq!(buffer.visible(), &[R, BLACK, BLACK, BLACK]);

        stepper.install(script::parse("", 8).unwrap());
        stepper.start();
        assert_eq!(stepper.state(), StepperState::Completed);
    }
}
