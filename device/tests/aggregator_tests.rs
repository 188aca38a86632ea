#[cfg(feature = "std")]
mod tests {
    use embassy_futures::join::join;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use futures::executor::block_on;
    use pi_sense::testutil::*;
    use pi_sense::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    type TestAggregator<'a> = SensorAggregator<
        NoopRawMutex,
        TestPressureSensor<'a>,
        TestHumiditySensor<'a>,
        &'a TestClock<'a>,
    >;

    fn wall_clock() -> Timestamp {
        let elapsed = SystemTime::now().duration_since(UNIX_EPOCH).unwrap();
        Timestamp::from_micros(elapsed.as_micros() as u64)
    }

    fn ready<C: Clock>(
        aggregator: &SensorAggregator<
            NoopRawMutex,
            TestPressureSensor<'_>,
            TestHumiditySensor<'_>,
            C,
        >,
    ) {
        aggregator.notify_ready(SensorKind::Pressure);
        aggregator.notify_ready(SensorKind::Humidity);
    }

    #[test]
    fn test_merges_and_truncates_both_readings() {
        let log = CallLog::new();
        let clock = TestClock::new();
        let aggregator: TestAggregator = SensorAggregator::with_clock(
            TestSensor::pressure(&log).with_reading(pressure(1013.26, 21.94)),
            TestSensor::humidity(&log).with_reading(humidity(45.67, 21.88)),
            AggregatorConfig::default(),
            &clock,
        );
        ready(&aggregator);

        let snapshot = block_on(aggregator.read_sensor_data()).unwrap();
        assert_eq!(1013.2, snapshot.pressure());
        assert_eq!(21.9, snapshot.temperature_from_pressure().raw_value());
        assert_eq!(45.6, snapshot.humidity());
        assert_eq!(21.8, snapshot.temperature_from_humidity().raw_value());
        assert_eq!(Timestamp::from_micros(0), snapshot.timestamp());
    }

    #[test]
    fn test_reads_pressure_then_humidity_then_stamps() {
        let log = CallLog::new();
        let clock = TestClock::logged(&log);
        let aggregator: TestAggregator = SensorAggregator::with_clock(
            TestSensor::pressure(&log).with_reading(pressure(1000.0, 20.0)),
            TestSensor::humidity(&log).with_reading(humidity(50.0, 20.0)),
            AggregatorConfig::default(),
            &clock,
        );
        ready(&aggregator);

        block_on(aggregator.read_sensor_data()).unwrap();
        assert_eq!(
            vec![
                Event::ReadStarted(SensorKind::Pressure),
                Event::ReadCompleted(SensorKind::Pressure),
                Event::ReadStarted(SensorKind::Humidity),
                Event::ReadCompleted(SensorKind::Humidity),
                Event::Clock,
            ],
            log.events()
        );
    }

    #[test]
    fn test_timestamps_do_not_go_backwards() {
        let log = CallLog::new();
        let clock = TestClock::new();
        let aggregator: TestAggregator = SensorAggregator::with_clock(
            TestSensor::pressure(&log)
                .with_reading(pressure(1000.0, 20.0))
                .with_reading(pressure(1001.0, 20.5)),
            TestSensor::humidity(&log)
                .with_reading(humidity(50.0, 20.0))
                .with_reading(humidity(51.0, 20.5)),
            AggregatorConfig::default(),
            &clock,
        );
        ready(&aggregator);

        let first = block_on(aggregator.read_sensor_data()).unwrap();
        let second = block_on(aggregator.read_sensor_data()).unwrap();
        assert!(second.timestamp() >= first.timestamp());
        assert_eq!(1001.0, second.pressure());
    }

    #[test]
    fn test_humidity_failure_discards_pressure() {
        let log = CallLog::new();
        let clock = TestClock::logged(&log);
        let aggregator: TestAggregator = SensorAggregator::with_clock(
            TestSensor::pressure(&log)
                .with_reading(pressure(1000.0, 20.0))
                .with_reading(pressure(990.0, 19.0)),
            TestSensor::humidity(&log)
                .with_read_failure(TestSensorError::ReadFailed)
                .with_reading(humidity(40.0, 19.0)),
            AggregatorConfig::default(),
            &clock,
        );
        ready(&aggregator);

        assert_eq!(
            Err(Error::Read(DriverError::Humidity(TestSensorError::ReadFailed))),
            block_on(aggregator.read_sensor_data())
        );
        assert!(!log.events().contains(&Event::Clock));

        // the next call performs both reads again
        log.clear();
        let snapshot = block_on(aggregator.read_sensor_data()).unwrap();
        assert_eq!(990.0, snapshot.pressure());
        assert_eq!(40.0, snapshot.humidity());
        assert_eq!(5, log.events().len());
    }

    #[test]
    fn test_pressure_failure_skips_humidity() {
        let log = CallLog::new();
        let clock = TestClock::logged(&log);
        let aggregator: TestAggregator = SensorAggregator::with_clock(
            TestSensor::pressure(&log).with_read_failure(TestSensorError::ReadFailed),
            TestSensor::humidity(&log).with_reading(humidity(40.0, 19.0)),
            AggregatorConfig::default(),
            &clock,
        );
        ready(&aggregator);

        let result = block_on(aggregator.read_sensor_data());
        assert_eq!(
            Err(Error::Read(DriverError::Pressure(TestSensorError::ReadFailed))),
            result
        );
        assert_eq!(
            vec![
                Event::ReadStarted(SensorKind::Pressure),
                Event::ReadCompleted(SensorKind::Pressure),
            ],
            log.events()
        );
    }

    #[test]
    fn test_ungated_read_before_ready_reaches_drivers() {
        let log = CallLog::new();
        let clock = TestClock::new();
        let aggregator: TestAggregator = SensorAggregator::with_clock(
            TestSensor::pressure(&log).with_reading(pressure(1000.0, 20.0)),
            TestSensor::humidity(&log),
            AggregatorConfig::default(),
            &clock,
        );
        assert!(!aggregator.are_sensors_ready());

        // the humidity driver has nothing to offer, its failure surfaces
        assert_eq!(
            Err(Error::Read(DriverError::Humidity(TestSensorError::Exhausted))),
            block_on(aggregator.read_sensor_data())
        );
        assert_eq!(4, log.events().len());
    }

    #[test]
    fn test_require_ready_rejects_early_reads() {
        let log = CallLog::new();
        let clock = TestClock::new();
        let aggregator: TestAggregator = SensorAggregator::with_clock(
            TestSensor::pressure(&log).with_reading(pressure(1000.0, 20.0)),
            TestSensor::humidity(&log).with_reading(humidity(50.0, 20.0)),
            AggregatorConfig::require_ready(),
            &clock,
        );

        assert_eq!(Err(Error::NotReady), block_on(aggregator.read_sensor_data()));
        aggregator.notify_ready(SensorKind::Humidity);
        assert_eq!(Err(Error::NotReady), block_on(aggregator.read_sensor_data()));
        assert!(log.events().is_empty());

        aggregator.notify_ready(SensorKind::Pressure);
        assert!(block_on(aggregator.read_sensor_data()).is_ok());
    }

    #[test]
    fn test_concurrent_reads_do_not_interleave() {
        let log = CallLog::new();
        let clock = TestClock::logged(&log);
        let aggregator: TestAggregator = SensorAggregator::with_clock(
            TestSensor::pressure(&log)
                .with_reading(pressure(1000.0, 20.0))
                .with_reading(pressure(1001.0, 20.0)),
            TestSensor::humidity(&log)
                .with_reading(humidity(50.0, 20.0))
                .with_reading(humidity(51.0, 20.0)),
            AggregatorConfig::default(),
            &clock,
        );
        ready(&aggregator);

        let (a, b) = block_on(join(
            aggregator.read_sensor_data(),
            aggregator.read_sensor_data(),
        ));
        assert!(a.is_ok());
        assert!(b.is_ok());

        let one_read = [
            Event::ReadStarted(SensorKind::Pressure),
            Event::ReadCompleted(SensorKind::Pressure),
            Event::ReadStarted(SensorKind::Humidity),
            Event::ReadCompleted(SensorKind::Humidity),
            Event::Clock,
        ];
        let expected: Vec<Event> = one_read.iter().chain(one_read.iter()).copied().collect();
        assert_eq!(expected, log.events());
    }

    #[test]
    fn test_initialize_signals_both_drivers() {
        let log = CallLog::new();
        let clock = TestClock::new();
        let aggregator: TestAggregator = SensorAggregator::with_clock(
            TestSensor::pressure(&log),
            TestSensor::humidity(&log),
            AggregatorConfig::default(),
            &clock,
        );
        let mut notification = aggregator.subscribe_ready().unwrap();

        block_on(aggregator.initialize()).unwrap();
        assert!(aggregator.are_sensors_ready());
        assert!(notification.try_take());
        assert_eq!(
            vec![
                Event::Initialize(SensorKind::Pressure),
                Event::Initialize(SensorKind::Humidity),
            ],
            log.events()
        );

        // drivers initialize once
        log.clear();
        block_on(aggregator.initialize()).unwrap();
        assert!(log.events().is_empty());
    }

    #[test]
    fn test_initialize_failure_leaves_driver_pending() {
        let log = CallLog::new();
        let clock = TestClock::new();
        let aggregator: TestAggregator = SensorAggregator::with_clock(
            TestSensor::pressure(&log),
            TestSensor::humidity(&log).with_init_failure(TestSensorError::InitFailed),
            AggregatorConfig::default(),
            &clock,
        );

        assert_eq!(
            Err(Error::Initialization(DriverError::Humidity(
                TestSensorError::InitFailed
            ))),
            block_on(aggregator.initialize())
        );
        assert!(!aggregator.are_sensors_ready());
        assert_eq!(
            ReadinessState::PartiallyReady(SensorKind::Pressure),
            aggregator.readiness()
        );

        // only the failed driver is retried
        log.clear();
        assert!(block_on(aggregator.initialize()).is_err());
        assert_eq!(vec![Event::Initialize(SensorKind::Humidity)], log.events());
    }

    #[test]
    fn test_initialize_failure_of_both_reports_pressure() {
        let log = CallLog::new();
        let clock = TestClock::new();
        let aggregator: TestAggregator = SensorAggregator::with_clock(
            TestSensor::pressure(&log).with_init_failure(TestSensorError::InitFailed),
            TestSensor::humidity(&log).with_init_failure(TestSensorError::InitFailed),
            AggregatorConfig::default(),
            &clock,
        );

        let result = block_on(aggregator.initialize());
        assert_eq!(
            Err(Error::Initialization(DriverError::Pressure(
                TestSensorError::InitFailed
            ))),
            result
        );
        assert_eq!(ReadinessState::NotReady, aggregator.readiness());
        assert_eq!(2, log.events().len());
    }

    #[test]
    fn test_default_clock_stamps_wall_time() {
        let log = CallLog::new();
        let aggregator = SensorAggregator::<NoopRawMutex, _, _>::new(
            TestSensor::pressure(&log).with_reading(pressure(1000.0, 20.0)),
            TestSensor::humidity(&log).with_reading(humidity(50.0, 20.0)),
        );
        ready(&aggregator);

        let before = wall_clock();
        let snapshot = block_on(aggregator.read_sensor_data()).unwrap();
        let after = wall_clock();
        assert!(before <= snapshot.timestamp());
        assert!(snapshot.timestamp() <= after);
    }

    #[test]
    fn test_driver_error_kind() {
        let e: DriverError<TestSensorError, TestSensorError> =
            DriverError::Humidity(TestSensorError::ReadFailed);
        assert_eq!(SensorKind::Humidity, e.kind());
    }
}
