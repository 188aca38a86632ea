//! Test doubles for driving the aggregator and the drivers on the host.

use crate::clock::Clock;
use crate::domain::temperature::Temperature;
use crate::domain::{
    HumidityAcquisition, PressureAcquisition, SensorKind, SensorSnapshot, Timestamp,
};
use crate::monitor::SensorMonitor;
use crate::traits::sensors::SensorDriver;
use core::cell::{Cell, RefCell};
use embassy_futures::yield_now;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;
use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};
use embedded_hal_async::i2c::I2c;
use std::collections::VecDeque;
use std::vec::Vec;

/// Something observable that happened during a test.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Initialize(SensorKind),
    ReadStarted(SensorKind),
    ReadCompleted(SensorKind),
    Clock,
}

/// Shared, ordered record of [`Event`]s.
#[derive(Default)]
pub struct CallLog {
    events: RefCell<Vec<Event>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

pub fn pressure(pressure: f32, temperature: f32) -> PressureAcquisition {
    PressureAcquisition {
        pressure,
        temperature: Temperature::new(temperature),
    }
}

pub fn humidity(relative_humidity: f32, temperature: f32) -> HumidityAcquisition {
    HumidityAcquisition {
        temperature: Temperature::new(temperature),
        relative_humidity,
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TestSensorError {
    InitFailed,
    ReadFailed,
    /// No scripted reading left.
    Exhausted,
}

/// A scripted sensor driver.
///
/// Every call is recorded in the log, and every call suspends once so that
/// interleaving with other tasks would show up in the log.
pub struct TestSensor<'a, R> {
    kind: SensorKind,
    log: &'a CallLog,
    init: Result<(), TestSensorError>,
    readings: VecDeque<Result<R, TestSensorError>>,
}

pub type TestPressureSensor<'a> = TestSensor<'a, PressureAcquisition>;
pub type TestHumiditySensor<'a> = TestSensor<'a, HumidityAcquisition>;

impl<'a, R> TestSensor<'a, R> {
    pub fn new(kind: SensorKind, log: &'a CallLog) -> Self {
        Self {
            kind,
            log,
            init: Ok(()),
            readings: VecDeque::new(),
        }
    }

    pub fn with_reading(mut self, reading: R) -> Self {
        self.readings.push_back(Ok(reading));
        self
    }

    pub fn with_read_failure(mut self, error: TestSensorError) -> Self {
        self.readings.push_back(Err(error));
        self
    }

    pub fn with_init_failure(mut self, error: TestSensorError) -> Self {
        self.init = Err(error);
        self
    }
}

impl<'a> TestSensor<'a, PressureAcquisition> {
    pub fn pressure(log: &'a CallLog) -> Self {
        Self::new(SensorKind::Pressure, log)
    }
}

impl<'a> TestSensor<'a, HumidityAcquisition> {
    pub fn humidity(log: &'a CallLog) -> Self {
        Self::new(SensorKind::Humidity, log)
    }
}

impl<'a, R> SensorDriver for TestSensor<'a, R> {
    type Reading = R;
    type Error = TestSensorError;

    async fn initialize(&mut self) -> Result<(), TestSensorError> {
        self.log.push(Event::Initialize(self.kind));
        yield_now().await;
        self.init
    }

    async fn read_data(&mut self) -> Result<R, TestSensorError> {
        self.log.push(Event::ReadStarted(self.kind));
        yield_now().await;
        let reading = self
            .readings
            .pop_front()
            .unwrap_or(Err(TestSensorError::Exhausted));
        self.log.push(Event::ReadCompleted(self.kind));
        reading
    }
}

/// A clock that advances one microsecond per query, optionally recording each query.
pub struct TestClock<'a> {
    ticks: Cell<u64>,
    log: Option<&'a CallLog>,
}

impl<'a> TestClock<'a> {
    pub fn new() -> Self {
        Self {
            ticks: Cell::new(0),
            log: None,
        }
    }

    pub fn logged(log: &'a CallLog) -> Self {
        Self {
            ticks: Cell::new(0),
            log: Some(log),
        }
    }
}

impl Default for TestClock<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TestClock<'_> {
    fn now(&self) -> Timestamp {
        if let Some(log) = self.log {
            log.push(Event::Clock);
        }
        let ticks = self.ticks.get();
        self.ticks.set(ticks + 1);
        Timestamp::from_micros(ticks)
    }
}

/// A monitor that queues snapshots for the test to pick up.
pub struct TestMonitor {
    snapshots: Channel<NoopRawMutex, SensorSnapshot, 8>,
}

impl TestMonitor {
    pub fn new() -> Self {
        Self {
            snapshots: Channel::new(),
        }
    }

    pub async fn next(&self) -> SensorSnapshot {
        self.snapshots.receive().await
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl Default for TestMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorMonitor for TestMonitor {
    fn notify(&self, snapshot: SensorSnapshot) {
        let _ = self.snapshots.try_send(snapshot);
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TestI2cError {
    NoAcknowledge,
    Bus,
}

impl embedded_hal::i2c::Error for TestI2cError {
    fn kind(&self) -> ErrorKind {
        match self {
            TestI2cError::NoAcknowledge => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address),
            TestI2cError::Bus => ErrorKind::Bus,
        }
    }
}

// ST sensors: the first written byte selects the register, bit 7 enables
// auto-increment for the rest of the transfer.
struct TestI2cDevice {
    address: u8,
    registers: [u8; 128],
    pointer: u8,
    auto_increment: bool,
    // (register, mask) of a bit the device clears on its own, once it has
    // been read back set; other registers ignore writes meanwhile
    self_clearing: Option<(u8, u8)>,
}

impl TestI2cDevice {
    fn write(&mut self, bytes: &[u8]) {
        if let Some((sub, data)) = bytes.split_first() {
            self.pointer = sub & 0x7F;
            self.auto_increment = sub & 0x80 != 0;
            for b in data {
                if !self.is_busy() || self.is_self_clearing(self.pointer) {
                    self.registers[self.pointer as usize] = *b;
                }
                self.advance();
            }
        }
    }

    fn read(&mut self, buf: &mut [u8]) {
        for b in buf.iter_mut() {
            *b = self.registers[self.pointer as usize];
            if let Some((register, mask)) = self.self_clearing {
                if register == self.pointer {
                    self.registers[register as usize] &= !mask;
                }
            }
            self.advance();
        }
    }

    fn is_busy(&self) -> bool {
        match self.self_clearing {
            Some((register, mask)) => self.registers[register as usize] & mask != 0,
            None => false,
        }
    }

    fn is_self_clearing(&self, register: u8) -> bool {
        matches!(self.self_clearing, Some((r, _)) if r == register)
    }

    fn advance(&mut self) {
        if self.auto_increment {
            self.pointer = (self.pointer + 1) & 0x7F;
        }
    }
}

/// An I2C bus populated with register-map devices.
pub struct TestI2c {
    devices: Vec<TestI2cDevice>,
    failing: bool,
    transactions: usize,
}

impl TestI2c {
    pub fn new() -> Self {
        Self {
            devices: Vec::new(),
            failing: false,
            transactions: 0,
        }
    }

    pub fn add_device(&mut self, address: u8) {
        self.devices.push(TestI2cDevice {
            address,
            registers: [0; 128],
            pointer: 0,
            auto_increment: false,
            self_clearing: None,
        });
    }

    /// Bits in `mask` of `register` clear themselves after being read back
    /// once. While any of them is set, writes to other registers are lost.
    pub fn set_self_clearing(&mut self, address: u8, register: u8, mask: u8) {
        self.device(address).self_clearing = Some((register, mask));
    }

    pub fn set_register(&mut self, address: u8, register: u8, values: &[u8]) {
        let device = self.device(address);
        for (i, v) in values.iter().enumerate() {
            device.registers[register as usize + i] = *v;
        }
    }

    pub fn register(&mut self, address: u8, register: u8) -> u8 {
        self.device(address).registers[register as usize]
    }

    /// Make every following transaction fail with a bus error.
    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    pub fn transactions(&self) -> usize {
        self.transactions
    }

    fn device(&mut self, address: u8) -> &mut TestI2cDevice {
        self.devices
            .iter_mut()
            .find(|d| d.address == address)
            .expect("no device at address")
    }
}

impl Default for TestI2c {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorType for TestI2c {
    type Error = TestI2cError;
}

impl I2c for TestI2c {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.transactions += 1;
        if self.failing {
            return Err(TestI2cError::Bus);
        }
        let device = self
            .devices
            .iter_mut()
            .find(|d| d.address == address)
            .ok_or(TestI2cError::NoAcknowledge)?;
        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => device.write(bytes),
                Operation::Read(buf) => device.read(buf),
            }
        }
        Ok(())
    }
}

// 20°C..30°C over T_OUT 0..1000, 30%..70% over H_OUT 0..8000
const HTS221_CALIBRATION: [u8; 16] = [
    60, 140, 160, 240, 0, 0, 0, 0, 0, 0, 0x40, 0x1F, 0, 0, 0xE8, 0x03,
];

/// An HTS221 reading 45.67 %RH and 21.88°C.
pub fn sense_hat_hts221(bus: &mut TestI2c, address: u8) {
    bus.add_device(address);
    bus.set_register(address, 0x0F, &[0xBC]);
    // CTRL_REG2 BOOT
    bus.set_self_clearing(address, 0x21, 0x80);
    bus.set_register(address, 0x30, &HTS221_CALIBRATION);
    // H_OUT = 3134
    bus.set_register(address, 0x28, &[0x3E, 0x0C]);
    // T_OUT = 188
    bus.set_register(address, 0x2A, &[188, 0]);
}

/// An LPS25H reading 1013.26 hPa and 21.94°C.
pub fn sense_hat_lps25h(bus: &mut TestI2c, address: u8) {
    bus.add_device(address);
    bus.set_register(address, 0x0F, &[0xBD]);
    // CTRL_REG2 BOOT
    bus.set_self_clearing(address, 0x21, 0x80);
    // PRESS_OUT = 4150313
    bus.set_register(address, 0x28, &[0x29, 0x54, 0x3F]);
    // TEMP_OUT = -9869
    bus.set_register(address, 0x2B, &[0x73, 0xD9]);
}
