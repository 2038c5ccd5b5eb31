mod tests {
    use myrtio_light_patterns::compiler::PatternCompiler;
    use myrtio_light_patterns::error::{DriverError, PlayerError};
    use myrtio_light_patterns::library::PatternLibrary;
    use myrtio_light_patterns::pattern::{ChannelDefinition, INFINITE, PatternDefinition};
    use myrtio_light_patterns::player::Player;
    use myrtio_light_patterns::sink::OutputSink;
    use myrtio_light_patterns::transition::TransitionRegistry;

    /// Sink keeping track of everything written to it
    #[derive(Default)]
    struct RecordingSink {
        values: Vec<(String, String, u8)>,
        defaults: Vec<(String, u8)>,
        ticks: u32,
    }

    impl RecordingSink {
        fn values_of(&self, led: &str, channel: &str) -> Vec<u8> {
            self.values
                .iter()
                .filter(|(l, c, _)| l == led && c == channel)
                .map(|(_, _, v)| *v)
                .collect()
        }
    }

    impl OutputSink for RecordingSink {
        fn apply_value(&mut self, led: &str, channel: &str, value: u8) -> Result<(), DriverError> {
            self.values.push((led.into(), channel.into(), value));
            Ok(())
        }

        fn apply_default(&mut self, led: &str, value: u8) -> Result<(), DriverError> {
            self.defaults.push((led.into(), value));
            Ok(())
        }

        fn end_of_tick(&mut self) {
            self.ticks += 1;
        }
    }

    /// Channel counting 1, 2, 3... for `ticks` ticks of 10 ms
    fn counting(led: &str, ticks: u8) -> ChannelDefinition {
        (1..=ticks).fold(ChannelDefinition::new(led, "red"), |channel, value| {
            channel.literal(value, 10)
        })
    }

    fn library() -> PatternLibrary {
        let registry = TransitionRegistry::new();
        let compiler = PatternCompiler::new(&registry, 10).unwrap();
        let definitions = [
            PatternDefinition::new("twice")
                .with_channel(counting("led1", 3))
                .with_repetitions(2),
            PatternDefinition::new("forever")
                .with_channel(counting("led1", 3))
                .with_default_value(5)
                .with_repetitions(INFINITE),
            PatternDefinition::new("flash")
                .with_channel(counting("led1", 2))
                .with_default_value(9),
            PatternDefinition::new("other")
                .with_channel(counting("led2", 4))
                .with_repetitions(INFINITE),
            PatternDefinition::new("wide")
                .with_channel(counting("led1", 2))
                .with_channel(counting("led2", 2)),
            PatternDefinition::new("outro")
                .with_channel(counting("led1", 4))
                .with_outro(10)
                .with_repetitions(2),
            PatternDefinition::new("intro")
                .with_channel(counting("led1", 3))
                .with_intro(10)
                .with_repetitions(2),
            PatternDefinition::new("looped_outro")
                .with_channel(counting("led1", 3))
                .with_outro(10)
                .with_repetitions(INFINITE),
        ];

        PatternLibrary::compile(&compiler, &definitions).unwrap()
    }

    fn run(player: &mut Player, sink: &mut RecordingSink, ticks: usize) {
        for _ in 0..ticks {
            player.update(sink);
        }
    }

    #[test]
    fn test_not_found() {
        let patterns = library();
        let mut player = Player::new();
        let mut sink = RecordingSink::default();

        assert_eq!(
            player.set_pattern(&patterns, "missing", false, &mut sink),
            Err(PlayerError::NotFound("missing".into()))
        );
        assert!(!player.is_playing());
        assert!(sink.defaults.is_empty());
    }

    #[test]
    fn test_plays_repetitions() {
        let patterns = library();
        let mut player = Player::new();
        let mut sink = RecordingSink::default();

        assert_eq!(player.set_pattern(&patterns, "twice", false, &mut sink), Ok(true));
        assert_eq!(sink.defaults, vec![("led1".to_string(), 0)]);

        run(&mut player, &mut sink, 5);
        assert!(player.is_playing());
        assert_eq!(player.streams()[0].repetition(), 1);

        assert!(!player.update(&mut sink));
        assert!(player.streams().is_empty());
        assert_eq!(sink.values_of("led1", "red"), vec![1, 2, 3, 1, 2, 3]);
        assert_eq!(sink.ticks, 6);

        // nothing left to play
        assert!(!player.update(&mut sink));
        assert_eq!(sink.values.len(), 6);
    }

    #[test]
    fn test_infinite_never_finishes() {
        let patterns = library();
        let mut player = Player::new();
        let mut sink = RecordingSink::default();

        player.set_pattern(&patterns, "forever", false, &mut sink).unwrap();
        run(&mut player, &mut sink, 100);
        assert!(player.is_playing());
        assert_eq!(player.streams().len(), 1);
        assert_eq!(player.streams()[0].repetition(), 33);
    }

    #[test]
    fn test_same_pattern_is_noop() {
        let patterns = library();
        let mut player = Player::new();
        let mut sink = RecordingSink::default();

        player.set_pattern(&patterns, "forever", false, &mut sink).unwrap();
        run(&mut player, &mut sink, 2);
        assert_eq!(player.set_pattern(&patterns, "forever", true, &mut sink), Ok(true));
        assert_eq!(player.streams().len(), 1);
        assert_eq!(player.streams()[0].cursor(), 2);
        assert_eq!(sink.defaults.len(), 1);
    }

    #[test]
    fn test_disjoint_patterns_play_together() {
        let patterns = library();
        let mut player = Player::new();
        let mut sink = RecordingSink::default();

        player.set_pattern(&patterns, "forever", false, &mut sink).unwrap();
        player.set_pattern(&patterns, "other", false, &mut sink).unwrap();
        assert_eq!(player.streams().len(), 2);

        run(&mut player, &mut sink, 4);
        assert_eq!(sink.values_of("led1", "red"), vec![1, 2, 3, 1]);
        assert_eq!(sink.values_of("led2", "red"), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_partial_overlap_is_rejected() {
        let patterns = library();
        let mut player = Player::new();
        let mut sink = RecordingSink::default();

        player.set_pattern(&patterns, "forever", false, &mut sink).unwrap();
        run(&mut player, &mut sink, 2);

        assert_eq!(
            player.set_pattern(&patterns, "wide", false, &mut sink),
            Err(PlayerError::Conflict {
                active: "forever".into(),
                requested: "wide".into(),
            })
        );
        assert_eq!(player.streams().len(), 1);
        assert_eq!(player.streams()[0].pattern().name(), "forever");
        assert_eq!(player.streams()[0].cursor(), 2);
        assert_eq!(sink.defaults.len(), 1);
    }

    #[test]
    fn test_replace_without_resume() {
        let patterns = library();
        let mut player = Player::new();
        let mut sink = RecordingSink::default();

        player.set_pattern(&patterns, "forever", false, &mut sink).unwrap();
        run(&mut player, &mut sink, 2);
        player.set_pattern(&patterns, "flash", false, &mut sink).unwrap();
        assert_eq!(player.streams().len(), 1);
        assert!(!player.streams()[0].has_previous());

        run(&mut player, &mut sink, 2);
        assert!(!player.is_playing());
        assert_eq!(sink.values_of("led1", "red"), vec![1, 2, 1, 2]);
    }

    #[test]
    fn test_resume_previous() {
        let patterns = library();
        let mut player = Player::new();
        let mut sink = RecordingSink::default();

        player.set_pattern(&patterns, "forever", false, &mut sink).unwrap();
        run(&mut player, &mut sink, 2);
        player.set_pattern(&patterns, "flash", true, &mut sink).unwrap();

        let stream = &player.streams()[0];
        assert_eq!(stream.pattern().name(), "flash");
        assert_eq!(stream.previous().map(|s| s.pattern().name()), Some("forever"));
        assert_eq!(sink.defaults.last(), Some(&("led1".to_string(), 9)));

        run(&mut player, &mut sink, 2);
        // flash is done, forever restarts from its intro with its default
        assert!(player.is_playing());
        assert_eq!(player.streams().len(), 1);
        assert_eq!(player.streams()[0].pattern().name(), "forever");
        assert_eq!(player.streams()[0].cursor(), 0);
        assert_eq!(sink.defaults.last(), Some(&("led1".to_string(), 5)));

        run(&mut player, &mut sink, 2);
        assert_eq!(sink.values_of("led1", "red"), vec![1, 2, 1, 2, 1, 2]);
    }

    #[test]
    fn test_resume_keeps_a_single_level() {
        let patterns = library();
        let mut player = Player::new();
        let mut sink = RecordingSink::default();

        player.set_pattern(&patterns, "forever", false, &mut sink).unwrap();
        player.set_pattern(&patterns, "flash", true, &mut sink).unwrap();
        player.set_pattern(&patterns, "twice", true, &mut sink).unwrap();

        let stream = &player.streams()[0];
        assert_eq!(stream.pattern().name(), "twice");
        let previous = stream.previous().unwrap();
        assert_eq!(previous.pattern().name(), "flash");
        assert!(!previous.has_previous());
    }

    #[test]
    fn test_resumed_stream_moves_last() {
        let patterns = library();
        let mut player = Player::new();
        let mut sink = RecordingSink::default();

        player.set_pattern(&patterns, "forever", false, &mut sink).unwrap();
        player.set_pattern(&patterns, "other", false, &mut sink).unwrap();
        player.set_pattern(&patterns, "flash", true, &mut sink).unwrap();

        let names: Vec<&str> = player.streams().iter().map(|s| s.pattern().name()).collect();
        assert_eq!(names, vec!["other", "flash"]);
    }

    #[test]
    fn test_outro_on_last_repetition_only() {
        let patterns = library();
        let mut player = Player::new();
        let mut sink = RecordingSink::default();

        player.set_pattern(&patterns, "outro", false, &mut sink).unwrap();
        run(&mut player, &mut sink, 7);
        assert!(!player.is_playing());
        assert_eq!(sink.values_of("led1", "red"), vec![1, 2, 3, 1, 2, 3, 4]);
    }

    #[test]
    fn test_intro_played_once() {
        let patterns = library();
        let mut player = Player::new();
        let mut sink = RecordingSink::default();

        player.set_pattern(&patterns, "intro", false, &mut sink).unwrap();
        run(&mut player, &mut sink, 5);
        assert!(!player.is_playing());
        assert_eq!(sink.values_of("led1", "red"), vec![1, 2, 3, 2, 3]);
    }

    #[test]
    fn test_infinite_plays_outro_every_loop() {
        let patterns = library();
        let mut player = Player::new();
        let mut sink = RecordingSink::default();

        player.set_pattern(&patterns, "looped_outro", false, &mut sink).unwrap();
        run(&mut player, &mut sink, 6);
        assert!(player.is_playing());
        assert_eq!(sink.values_of("led1", "red"), vec![1, 2, 3, 1, 2, 3]);
    }

    #[test]
    fn test_cleanup() {
        let patterns = library();
        let mut player = Player::new();
        let mut sink = RecordingSink::default();

        player.set_pattern(&patterns, "forever", false, &mut sink).unwrap();
        player.set_pattern(&patterns, "other", false, &mut sink).unwrap();
        player.cleanup();
        assert!(!player.is_playing());
        assert!(player.streams().is_empty());
        assert!(!player.update(&mut sink));
    }
}
