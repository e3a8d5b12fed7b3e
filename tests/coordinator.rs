mod tests {
    use embassy_time::Instant;
    use myrtio_light_script::{
        Applied, ConfigError, Coordinator, ExternalEvent, ReconfigError, Slot, StepperState,
        StripConfig, Surface, color::Rgb,
    };
    use pretty_assertions::assert_eq;

    const R: Rgb = Rgb::new(255, 0, 0);
    const G: Rgb = Rgb::new(0, 255, 0);
    const BLACK: Rgb = Rgb::new(0, 0, 0);

    fn coordinator() -> Coordinator<16> {
        Coordinator::new(&StripConfig {
            length: 4,
            brightness: 1.0,
        })
    }

    fn script(slot: Slot, text: &str) -> ExternalEvent {
        ExternalEvent::ScriptReplaced {
            slot,
            text: text.to_string(),
        }
    }

    fn run_to_end(coordinator: &mut Coordinator<16>, now: Instant) {
        for _ in 0..64 {
            if !coordinator.step(now) {
                return;
            }
        }
        panic!("program did not complete");
    }

    #[test]
    fn test_default_config() {
        let config = StripConfig::default();
        let coordinator = Coordinator::<64>::new(&config);
        assert_eq!(coordinator.buffer().len(), config.length);
        assert_eq!(coordinator.applied_script(Slot::Init), None);
    }

    #[test]
    fn test_same_script_installs_once() {
        let mut coordinator = coordinator();
        let text = "Fill #FF0000 1";
        assert_eq!(coordinator.on_event(script(Slot::Init, text)), Ok(Applied::Installed));
        assert_eq!(coordinator.on_event(script(Slot::Init, text)), Ok(Applied::Unchanged));
        assert_eq!(coordinator.applied_script(Slot::Init), Some(text));
    }

    #[test]
    fn test_init_starts_immediately() {
        let mut coordinator = coordinator();
        coordinator
            .on_event(script(Slot::Init, "Fill #FF0000 1"))
            .unwrap();
        assert_eq!(coordinator.stepper(Slot::Init).state(), StepperState::Running);
        assert!(!coordinator.step(Instant::from_millis(0)));
        assert_eq!(coordinator.buffer().visible(), &[R; 4]);
    }

    #[test]
    fn test_bad_script_keeps_running_program() {
        let mut coordinator = coordinator();
        coordinator
            .on_event(script(Slot::Init, "SlowFill 0.1 #FF0000 1"))
            .unwrap();
        coordinator.step(Instant::from_millis(0));

        let result = coordinator.on_event(script(Slot::Init, "Fill #00FF00 1; Explode"));
        assert!(matches!(result, Err(ReconfigError::Parse(_))));
        assert_eq!(
            coordinator.applied_script(Slot::Init),
            Some("SlowFill 0.1 #FF0000 1")
        );
        assert_eq!(coordinator.stepper(Slot::Init).state(), StepperState::Running);

        coordinator.step(Instant::from_millis(100));
        assert_eq!(coordinator.buffer().visible(), &[R, R, BLACK, BLACK]);
    }

    #[test]
    fn test_replace_during_slow_fill_restarts() {
        let mut coordinator = coordinator();
        coordinator
            .on_event(script(Slot::Init, "SlowFill 0.1 #FF0000 1"))
            .unwrap();
        coordinator.step(Instant::from_millis(0));

        assert_eq!(
            coordinator.on_event(script(Slot::Init, "Fill #00FF00 1")),
            Ok(Applied::Installed)
        );
        let stepper = coordinator.stepper(Slot::Init);
        assert_eq!(stepper.state(), StepperState::Running);
        assert_eq!(stepper.cursor(), 0);

        run_to_end(&mut coordinator, Instant::from_millis(10));
        assert_eq!(coordinator.buffer().visible(), &[G; 4]);
    }

    #[test]
    fn test_event_script_waits_for_trigger() {
        let mut coordinator = coordinator();
        assert_eq!(
            coordinator.on_event(script(Slot::Event, "Fill #00FF00 1")),
            Ok(Applied::Installed)
        );
        assert_eq!(coordinator.stepper(Slot::Event).state(), StepperState::Idle);
        assert!(!coordinator.step(Instant::from_millis(0)));
        assert_eq!(coordinator.buffer().visible(), &[BLACK; 4]);

        assert_eq!(
            coordinator.on_event(ExternalEvent::TriggerEdge("1".to_string())),
            Ok(Applied::Started)
        );
        coordinator.step(Instant::from_millis(0));
        assert_eq!(coordinator.buffer().visible(), &[G; 4]);
    }

    #[test]
    fn test_trigger_debounce() {
        let mut coordinator = coordinator();
        coordinator
            .on_event(script(Slot::Event, "Fill #00FF00 1"))
            .unwrap();

        let edge = |value: &str| ExternalEvent::TriggerEdge(value.to_string());
        assert_eq!(coordinator.on_event(edge("on")), Ok(Applied::Started));
        run_to_end(&mut coordinator, Instant::from_millis(0));
        assert_eq!(coordinator.on_event(edge("on")), Ok(Applied::Unchanged));
        assert_eq!(
            coordinator.stepper(Slot::Event).state(),
            StepperState::Completed
        );
        assert_eq!(coordinator.on_event(edge("off")), Ok(Applied::Started));
        assert_eq!(coordinator.stepper(Slot::Event).state(), StepperState::Running);
    }

    #[test]
    fn test_trigger_without_event_program() {
        let mut coordinator = coordinator();
        assert_eq!(
            coordinator.on_event(ExternalEvent::TriggerEdge("x".to_string())),
            Ok(Applied::Updated)
        );
    }

    #[test]
    fn test_event_program_pauses_init() {
        let mut coordinator = coordinator();
        coordinator
            .on_event(script(Slot::Init, "SlowFill 0.1 #FF0000 1"))
            .unwrap();
        coordinator
            .on_event(script(Slot::Event, "Fill #00FF00 1"))
            .unwrap();
        coordinator.step(Instant::from_millis(0));
        assert_eq!(coordinator.buffer().read(0), Some(R));

        coordinator
            .on_event(ExternalEvent::TriggerEdge("1".to_string()))
            .unwrap();
        coordinator.step(Instant::from_millis(100));
        assert_eq!(coordinator.buffer().visible(), &[G; 4]);
        assert_eq!(coordinator.stepper(Slot::Init).cursor(), 0);

        // Init resumes where it was paused
        assert!(coordinator.step(Instant::from_millis(100)));
        assert_eq!(coordinator.buffer().visible(), &[G, R, G, G]);
    }

    #[test]
    fn test_trigger_clause_in_init_starts_event() {
        let mut coordinator = coordinator();
        coordinator
            .on_event(script(Slot::Event, "Fill #00FF00 1"))
            .unwrap();
        coordinator
            .on_event(script(Slot::Init, "Fill #FF0000 1; Trigger"))
            .unwrap();

        let now = Instant::from_millis(0);
        coordinator.step(now);
        assert_eq!(coordinator.buffer().read(0), Some(R));
        assert!(coordinator.step(now));
        assert_eq!(coordinator.stepper(Slot::Event).state(), StepperState::Running);
        assert!(!coordinator.step(now));
        assert_eq!(coordinator.buffer().visible(), &[G; 4]);
    }

    #[test]
    fn test_trigger_clause_in_event_restarts_once() {
        let mut coordinator = coordinator();
        coordinator
            .on_event(script(Slot::Event, "Slide 0.1 1; Trigger"))
            .unwrap();
        coordinator
            .on_event(ExternalEvent::TriggerEdge("go".to_string()))
            .unwrap();

        let now = Instant::from_millis(0);
        coordinator.step(now); // slide
        assert!(coordinator.step(now)); // trigger: restart
        assert_eq!(coordinator.stepper(Slot::Event).cursor(), 0);
        coordinator.step(now); // slide
        assert!(!coordinator.step(now)); // retired trigger
        assert_eq!(
            coordinator.stepper(Slot::Event).state(),
            StepperState::Completed
        );
    }

    #[test]
    fn test_length_and_brightness_validation() {
        let mut coordinator = coordinator();
        assert_eq!(
            coordinator.on_event(ExternalEvent::LengthChanged(0)),
            Err(ReconfigError::Config(ConfigError::LengthOutOfRange {
                value: 0,
                max: 16
            }))
        );
        assert!(coordinator.on_event(ExternalEvent::LengthChanged(17)).is_err());
        assert_eq!(coordinator.buffer().len(), 4);

        assert!(
            coordinator
                .on_event(ExternalEvent::BrightnessChanged(-0.1))
                .is_err()
        );
        assert!(
            coordinator
                .on_event(ExternalEvent::BrightnessChanged(1.1))
                .is_err()
        );
        assert_eq!(coordinator.buffer().brightness(), 1.0);

        assert_eq!(
            coordinator.on_event(ExternalEvent::LengthChanged(16)),
            Ok(Applied::Updated)
        );
        assert_eq!(
            coordinator.on_event(ExternalEvent::LengthChanged(16)),
            Ok(Applied::Unchanged)
        );
        assert_eq!(
            coordinator.on_event(ExternalEvent::BrightnessChanged(0.5)),
            Ok(Applied::Updated)
        );
    }

    #[test]
    fn test_panel_events_unsupported() {
        let mut coordinator = coordinator();
        assert!(matches!(
            coordinator.on_event(ExternalEvent::NamedStateChanged("left".to_string())),
            Err(ReconfigError::Unsupported(_))
        ));
    }

    #[test]
    fn test_frame_applies_brightness() {
        let mut coordinator = coordinator();
        coordinator
            .on_event(script(Slot::Init, "Brightness 0; Fill #FF0000 1"))
            .unwrap();
        run_to_end(&mut coordinator, Instant::from_millis(0));
        assert_eq!(coordinator.frame(), &[BLACK; 4]);
        assert_eq!(coordinator.buffer().read(0), Some(R));
    }
}
