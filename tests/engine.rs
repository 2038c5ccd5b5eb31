mod tests {
    use embassy_time::{Duration, Instant};
    use myrtio_light_patterns::channel::{TryReceiveError, TrySendError};
    use myrtio_light_patterns::command::{Command, CommandChannel, ConfigSection};
    use myrtio_light_patterns::compiler::PatternCompiler;
    use myrtio_light_patterns::config::GlobalConfig;
    use myrtio_light_patterns::driver::MemoryDriver;
    use myrtio_light_patterns::engine::Engine;
    use myrtio_light_patterns::error::{EngineError, PlayerError};
    use myrtio_light_patterns::library::PatternLibrary;
    use myrtio_light_patterns::pattern::{ChannelDefinition, INFINITE, PatternDefinition};
    use myrtio_light_patterns::platform::Platform;
    use myrtio_light_patterns::scheduler::TickScheduler;
    use myrtio_light_patterns::transition::TransitionRegistry;

    const CHANNEL_SIZE: usize = 4;

    fn patterns(config: &GlobalConfig) -> PatternLibrary {
        let registry = TransitionRegistry::new();
        let compiler = PatternCompiler::new(&registry, config.granularity_ms()).unwrap();
        let definitions = [
            PatternDefinition::new("blink")
                .with_channel(
                    ChannelDefinition::new("led1", "red")
                        .literal(100, 10)
                        .literal(200, 10)
                        .literal(50, 10),
                )
                .with_default_value(3),
            PatternDefinition::new("glow")
                .with_channel(ChannelDefinition::new("led1", "red").literal(80, 20))
                .with_channel(ChannelDefinition::new("led1", "green").literal(40, 20))
                .with_repetitions(INFINITE),
        ];

        PatternLibrary::compile(&compiler, &definitions).unwrap()
    }

    fn platform() -> Platform {
        let mut platform = Platform::new();
        platform.register_driver(Box::new(MemoryDriver::new())).unwrap();
        platform.add_led("memory", "led1").unwrap();
        platform.add_channel("led1", "red", None).unwrap();
        platform.add_channel("led1", "green", None).unwrap();
        platform
    }

    fn engine(channel: &CommandChannel<CHANNEL_SIZE>, config: GlobalConfig) -> Engine<'_, CHANNEL_SIZE> {
        let patterns = patterns(&config);
        Engine::new(channel.receiver(), config, patterns, platform())
    }

    #[test]
    fn test_start_without_startup_pattern() {
        let channel = CommandChannel::new();
        let mut engine = engine(&channel, GlobalConfig::default());

        assert!(!engine.start());
        assert_eq!(engine.platform().channel_value("led1", "red"), Some(0));
        assert!(engine.is_running());
    }

    #[test]
    fn test_startup_pattern() {
        let channel = CommandChannel::new();
        let config = GlobalConfig::default().with_startup_pattern("blink");
        let mut engine = engine(&channel, config);

        assert!(engine.start());
        assert_eq!(engine.platform().channel_value("led1", "green"), Some(3));

        assert!(engine.update());
        assert_eq!(engine.platform().channel_value("led1", "red"), Some(100));
        assert!(engine.update());
        assert_eq!(engine.platform().channel_value("led1", "red"), Some(200));
        assert!(!engine.update());
        assert_eq!(engine.platform().channel_value("led1", "red"), Some(50));
    }

    #[test]
    fn test_unknown_startup_pattern() {
        let channel = CommandChannel::new();
        let config = GlobalConfig::default().with_startup_pattern("nope");
        let mut engine = engine(&channel, config);

        assert!(!engine.start());
    }

    #[test]
    fn test_commands() {
        let channel = CommandChannel::new();
        let mut engine = engine(&channel, GlobalConfig::default());
        let sender = channel.sender();

        sender.try_send(Command::set_pattern("missing", false)).unwrap();
        sender.try_send(Command::set_pattern("glow", false)).unwrap();
        sender.try_send(Command::DumpConfig(ConfigSection::Patterns)).unwrap();
        assert_eq!(channel.len(), 3);

        engine.process_commands();
        assert!(channel.is_empty());
        assert!(engine.is_playing());
        assert_eq!(engine.player().streams()[0].pattern().name(), "glow");
    }

    #[test]
    fn test_set_value_is_clamped() {
        let channel = CommandChannel::new();
        let mut engine = engine(&channel, GlobalConfig::default());

        engine.execute(Command::set_value("led1", "red", 300)).unwrap();
        assert_eq!(engine.platform().channel_value("led1", "red"), Some(255));
        engine.execute(Command::set_value("led1", "green", 12)).unwrap();
        assert_eq!(engine.platform().channel_value("led1", "green"), Some(12));

        assert!(matches!(
            engine.execute(Command::set_value("led9", "red", 1)),
            Err(EngineError::Driver(_))
        ));
    }

    #[test]
    fn test_set_pattern_error() {
        let channel = CommandChannel::new();
        let mut engine = engine(&channel, GlobalConfig::default());

        assert_eq!(
            engine.execute(Command::set_pattern("missing", true)),
            Err(EngineError::Player(PlayerError::NotFound("missing".into())))
        );
    }

    #[test]
    fn test_quit_and_shutdown() {
        let channel = CommandChannel::new();
        let mut engine = engine(&channel, GlobalConfig::default());

        engine.set_pattern("glow", false).unwrap();
        engine.update();
        assert_eq!(engine.platform().channel_value("led1", "green"), Some(40));

        channel.try_send(Command::Quit).unwrap();
        engine.process_commands();
        assert!(!engine.is_running());

        engine.shutdown();
        assert!(!engine.is_playing());
        assert!(engine.player().streams().is_empty());
        assert_eq!(engine.platform().channel_value("led1", "green"), Some(0));
    }

    #[test]
    fn test_config_section_names() {
        for section in [ConfigSection::Global, ConfigSection::Platform, ConfigSection::Patterns] {
            assert_eq!(ConfigSection::parse_from_str(section.as_str()), Some(section));
        }
        assert_eq!(ConfigSection::parse_from_str("drivers"), None);
    }

    #[test]
    fn test_channel_capacity() {
        let channel: CommandChannel<2> = CommandChannel::new();
        let sender = channel.sender();
        let receiver = channel.receiver();

        sender.try_send(Command::Quit).unwrap();
        sender.try_send(Command::Quit).unwrap();
        assert_eq!(
            sender.try_send(Command::set_pattern("glow", false)),
            Err(TrySendError(Command::set_pattern("glow", false)))
        );

        assert_eq!(receiver.try_receive(), Ok(Command::Quit));
        assert_eq!(receiver.try_receive(), Ok(Command::Quit));
        assert_eq!(receiver.try_receive(), Err(TryReceiveError));
    }

    #[test]
    fn test_scheduler_stops_when_idle() {
        let channel = CommandChannel::new();
        let mut scheduler = TickScheduler::new(engine(&channel, GlobalConfig::default()));

        assert!(scheduler.tick(Instant::from_millis(0)).is_none());
        assert!(!scheduler.is_armed());

        channel.try_send(Command::set_pattern("blink", false)).unwrap();
        let result = scheduler.tick(Instant::from_millis(5)).unwrap();
        assert_eq!(result.next_deadline, Instant::from_millis(15));
        assert_eq!(result.sleep_duration, Duration::from_millis(10));
        assert!(scheduler.is_armed());

        let result = scheduler.tick(Instant::from_millis(17)).unwrap();
        assert_eq!(result.next_deadline, Instant::from_millis(25));
        assert_eq!(result.sleep_duration, Duration::from_millis(8));

        // last tick of the pattern
        assert!(scheduler.tick(Instant::from_millis(25)).is_none());
        assert!(!scheduler.is_armed());
        assert_eq!(
            scheduler.engine().platform().channel_value("led1", "red"),
            Some(50)
        );
    }

    #[test]
    fn test_scheduler_drift_correction() {
        let channel = CommandChannel::new();
        let config = GlobalConfig::default().with_granularity(Duration::from_millis(10));
        let mut scheduler = TickScheduler::new(engine(&channel, config));
        assert_eq!(scheduler.period(), Duration::from_millis(10));

        scheduler.engine_mut().set_pattern("glow", false).unwrap();
        let result = scheduler.tick(Instant::from_millis(0)).unwrap();
        assert_eq!(result.next_deadline, Instant::from_millis(10));

        // slightly late, catches up
        let result = scheduler.tick(Instant::from_millis(15)).unwrap();
        assert_eq!(result.next_deadline, Instant::from_millis(20));
        assert_eq!(result.sleep_duration, Duration::from_millis(5));

        // too far behind, resynchronised on now
        let result = scheduler.tick(Instant::from_millis(200)).unwrap();
        assert_eq!(result.next_deadline, Instant::from_millis(210));
        assert_eq!(result.sleep_duration, Duration::from_millis(10));
    }

    #[test]
    fn test_scheduler_stops_on_quit() {
        let channel = CommandChannel::new();
        let mut scheduler = TickScheduler::new(engine(&channel, GlobalConfig::default()));

        scheduler.engine_mut().set_pattern("glow", false).unwrap();
        assert!(scheduler.tick(Instant::from_millis(0)).is_some());

        channel.try_send(Command::Quit).unwrap();
        assert!(scheduler.tick(Instant::from_millis(10)).is_none());
        assert!(!scheduler.engine().is_running());
    }
}
