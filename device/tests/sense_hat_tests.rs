#[cfg(feature = "std")]
mod tests {
    use embassy_embedded_hal::shared_bus::I2cDeviceError;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embassy_sync::mutex::Mutex;
    use futures::executor::block_on;
    use pi_sense::bsp::sense_hat::{SenseHat, SenseHatConfig};
    use pi_sense::drivers::sensors::hts221::{self, Hts221Error};
    use pi_sense::drivers::sensors::lps25h::{self, Lps25hError};
    use pi_sense::testutil::*;
    use pi_sense::*;

    fn bus() -> Mutex<NoopRawMutex, TestI2c> {
        let mut bus = TestI2c::new();
        sense_hat_lps25h(&mut bus, lps25h::ADDR);
        sense_hat_hts221(&mut bus, hts221::ADDR);
        Mutex::new(bus)
    }

    #[test]
    fn test_initialize_and_read() {
        let bus = bus();
        let hat = SenseHat::new(&bus);

        let mut notification = hat.sensors.subscribe_ready().unwrap();
        block_on(hat.sensors.initialize()).unwrap();
        assert!(notification.try_take());

        let snapshot = block_on(hat.sensors.read_sensor_data()).unwrap();
        assert_eq!(1013.2, snapshot.pressure());
        assert_eq!(21.9, snapshot.temperature_from_pressure().raw_value());
        assert_eq!(45.6, snapshot.humidity());
        assert_eq!(21.8, snapshot.temperature_from_humidity().raw_value());
    }

    #[test]
    fn test_stamps_with_given_clock() {
        let bus = bus();
        let clock = TestClock::new();
        let hat = SenseHat::with_clock(&bus, SenseHatConfig::default(), &clock);
        block_on(hat.sensors.initialize()).unwrap();

        let snapshot = block_on(hat.sensors.read_sensor_data()).unwrap();
        assert_eq!(Timestamp::from_micros(0), snapshot.timestamp());
    }

    #[test]
    fn test_read_before_initialize() {
        let bus = bus();
        let hat = SenseHat::new(&bus);

        let result = block_on(hat.sensors.read_sensor_data());
        assert_eq!(
            Err(Error::Read(DriverError::Pressure(Lps25hError::NotInitialized))),
            result
        );
        // neither driver touched the bus
        assert_eq!(0, block_on(bus.lock()).transactions());
    }

    #[test]
    fn test_require_ready_before_initialize() {
        let bus = bus();
        let hat = SenseHat::with_config(
            &bus,
            SenseHatConfig {
                aggregator: AggregatorConfig::require_ready(),
                ..Default::default()
            },
        );

        assert_eq!(
            Err(Error::NotReady),
            block_on(hat.sensors.read_sensor_data())
        );
        block_on(hat.sensors.initialize()).unwrap();
        assert!(block_on(hat.sensors.read_sensor_data()).is_ok());
    }

    #[test]
    fn test_missing_humidity_sensor() {
        let mut bus = TestI2c::new();
        sense_hat_lps25h(&mut bus, lps25h::ADDR);
        let bus = Mutex::<NoopRawMutex, _>::new(bus);
        let hat = SenseHat::new(&bus);

        let result = block_on(hat.sensors.initialize());
        assert_eq!(
            Err(Error::Initialization(DriverError::Humidity(Hts221Error::I2c(
                I2cDeviceError::I2c(TestI2cError::NoAcknowledge)
            )))),
            result
        );
        assert_eq!(
            ReadinessState::PartiallyReady(SensorKind::Pressure),
            hat.sensors.readiness()
        );
    }

    #[test]
    fn test_wrong_device_on_humidity_address() {
        let mut bus = TestI2c::new();
        sense_hat_lps25h(&mut bus, lps25h::ADDR);
        // an LPS25H where the HTS221 should be
        sense_hat_lps25h(&mut bus, hts221::ADDR);
        let bus = Mutex::<NoopRawMutex, _>::new(bus);
        let hat = SenseHat::new(&bus);

        assert_eq!(
            Err(Error::Initialization(DriverError::Humidity(
                Hts221Error::UnknownDevice(0xBD)
            ))),
            block_on(hat.sensors.initialize())
        );
    }

    #[test]
    fn test_bus_failure_during_read() {
        let bus = bus();
        let hat = SenseHat::new(&bus);
        block_on(hat.sensors.initialize()).unwrap();

        block_on(bus.lock()).set_failing(true);
        assert_eq!(
            Err(Error::Read(DriverError::Pressure(Lps25hError::I2c(
                I2cDeviceError::I2c(TestI2cError::Bus)
            )))),
            block_on(hat.sensors.read_sensor_data())
        );

        block_on(bus.lock()).set_failing(false);
        assert!(block_on(hat.sensors.read_sensor_data()).is_ok());
    }
}
