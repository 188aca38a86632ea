//! Coordination of the pressure and humidity drivers.
//!
//! The aggregator owns both drivers behind a single async mutex, so only one
//! driver is talked to at any time, and always pressure first. Readiness of
//! the drivers is tracked as one [`ReadinessState`] and announced once through
//! an edge-triggered notification.

use crate::clock::{Clock, DefaultClock};
use crate::domain::{ReadinessState, ReadinessTracker, SensorKind, SensorSnapshot};
use crate::traits::sensors::{HumiditySensor, PressureSensor, SensorDriver};
use core::cell::Cell;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::pubsub::{self, PubSubChannel, Subscriber};

/// How many ready notifications may be subscribed at the same time.
pub const READY_SUBSCRIBERS: usize = 4;

type ReadyChannel<M> = PubSubChannel<M, (), 1, READY_SUBSCRIBERS, 1>;

/// What to do when a read is requested before both drivers are ready.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadPolicy {
    /// Read anyway and let the driver fail or answer as it will.
    #[default]
    Ungated,
    /// Fail with [`Error::NotReady`] without touching the drivers.
    RequireReady,
}

#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AggregatorConfig {
    pub read_policy: ReadPolicy,
}

impl AggregatorConfig {
    pub const fn new() -> Self {
        Self {
            read_policy: ReadPolicy::Ungated,
        }
    }

    /// Reject reads until both drivers have signaled ready.
    pub const fn require_ready() -> Self {
        Self {
            read_policy: ReadPolicy::RequireReady,
        }
    }
}

/// A driver failure, tagged with the driver it came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError<PE, HE> {
    Pressure(PE),
    Humidity(HE),
}

impl<PE, HE> DriverError<PE, HE> {
    pub fn kind(&self) -> SensorKind {
        match self {
            DriverError::Pressure(_) => SensorKind::Pressure,
            DriverError::Humidity(_) => SensorKind::Humidity,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<PE, HE> {
    /// A read was requested before both drivers were ready.
    NotReady,
    /// A driver failed to initialize.
    Initialization(DriverError<PE, HE>),
    /// A driver read failed. No snapshot was produced.
    Read(DriverError<PE, HE>),
}

/// The error type of an aggregator over the drivers `P` and `H`.
pub type AggregatorError<P, H> =
    Error<<P as SensorDriver>::Error, <H as SensorDriver>::Error>;

/// A subscription to the one-time "all sensors ready" event.
///
/// The event is not replayed: a subscription made after both drivers became
/// ready never completes. Use [`SensorAggregator::wait_until_ready`] when the
/// subscription might come late.
pub struct ReadyNotification<'a, M: RawMutex> {
    subscriber: Subscriber<'a, M, (), 1, READY_SUBSCRIBERS, 1>,
}

impl<'a, M: RawMutex> ReadyNotification<'a, M> {
    pub async fn wait(&mut self) {
        self.subscriber.next_message_pure().await
    }

    /// Returns `true` if the event has fired since subscribing.
    pub fn try_take(&mut self) -> bool {
        self.subscriber.try_next_message_pure().is_some()
    }
}

struct Drivers<P, H> {
    pressure: P,
    humidity: H,
}

pub struct SensorAggregator<M, P, H, C = DefaultClock>
where
    M: RawMutex,
{
    drivers: Mutex<M, Drivers<P, H>>,
    readiness: BlockingMutex<M, Cell<ReadinessTracker>>,
    ready: ReadyChannel<M>,
    config: AggregatorConfig,
    clock: C,
}

impl<M, P, H> SensorAggregator<M, P, H, DefaultClock>
where
    M: RawMutex,
    P: PressureSensor,
    H: HumiditySensor,
{
    pub fn new(pressure: P, humidity: H) -> Self {
        Self::with_config(pressure, humidity, AggregatorConfig::default())
    }

    pub fn with_config(pressure: P, humidity: H, config: AggregatorConfig) -> Self {
        Self::with_clock(pressure, humidity, config, DefaultClock::default())
    }
}

impl<M, P, H, C> SensorAggregator<M, P, H, C>
where
    M: RawMutex,
    P: PressureSensor,
    H: HumiditySensor,
    C: Clock,
{
    pub fn with_clock(pressure: P, humidity: H, config: AggregatorConfig, clock: C) -> Self {
        Self {
            drivers: Mutex::new(Drivers { pressure, humidity }),
            readiness: BlockingMutex::new(Cell::new(ReadinessTracker::new())),
            ready: PubSubChannel::new(),
            config,
            clock,
        }
    }

    pub fn config(&self) -> AggregatorConfig {
        self.config
    }

    /// `true` once both drivers have signaled ready. Never reverts.
    pub fn are_sensors_ready(&self) -> bool {
        self.readiness.lock(|tracker| tracker.get().is_ready())
    }

    pub fn readiness(&self) -> ReadinessState {
        self.readiness.lock(|tracker| tracker.get().state())
    }

    pub fn is_driver_ready(&self, kind: SensorKind) -> bool {
        self.readiness.lock(|tracker| tracker.get().is_driver_ready(kind))
    }

    /// Record the one-shot ready signal of a driver.
    ///
    /// Signals after the first one for the same driver are ignored. The
    /// combined notification is published when the second driver arrives.
    /// Returns `false` if the signal changed nothing.
    pub fn notify_ready(&self, kind: SensorKind) -> bool {
        let (before, after) = self.readiness.lock(|cell| {
            let mut tracker = cell.get();
            let before = tracker.state();
            tracker.mark(kind);
            cell.set(tracker);
            (before, tracker.state())
        });

        if before == after {
            return false;
        }

        if after == ReadinessState::Ready {
            info!("[sensors] all sensors ready");
            self.ready.immediate_publisher().publish_immediate(());
        } else {
            debug!("[sensors] {} driver ready", kind);
        }
        true
    }

    pub fn subscribe_ready(&self) -> Result<ReadyNotification<'_, M>, pubsub::Error> {
        Ok(ReadyNotification {
            subscriber: self.ready.subscriber()?,
        })
    }

    /// Wait for both drivers, returning at once if they are ready already.
    pub async fn wait_until_ready(&self) -> Result<(), pubsub::Error> {
        if self.are_sensors_ready() {
            return Ok(());
        }
        let mut notification = self.subscribe_ready()?;
        if !self.are_sensors_ready() {
            notification.wait().await;
        }
        Ok(())
    }

    /// Initialize every driver that has not signaled ready yet.
    ///
    /// Each successful initialization is that driver's ready signal. A failing
    /// driver does not prevent the other one from being initialized; the first
    /// failure is returned.
    pub async fn initialize(&self) -> Result<(), AggregatorError<P, H>> {
        let mut drivers = self.drivers.lock().await;
        let mut result = Ok(());

        if !self.is_driver_ready(SensorKind::Pressure) {
            match drivers.pressure.initialize().await {
                Ok(()) => {
                    self.notify_ready(SensorKind::Pressure);
                }
                Err(e) => {
                    warn!("[sensors] pressure driver failed to initialize");
                    result = Err(Error::Initialization(DriverError::Pressure(e)));
                }
            }
        }

        if !self.is_driver_ready(SensorKind::Humidity) {
            match drivers.humidity.initialize().await {
                Ok(()) => {
                    self.notify_ready(SensorKind::Humidity);
                }
                Err(e) => {
                    warn!("[sensors] humidity driver failed to initialize");
                    if result.is_ok() {
                        result = Err(Error::Initialization(DriverError::Humidity(e)));
                    }
                }
            }
        }

        result
    }

    /// Read pressure, then humidity, and merge both into one snapshot.
    ///
    /// The humidity read starts only after the pressure read has completed.
    /// Any driver failure is returned as is and the other reading, if any, is
    /// discarded.
    pub async fn read_sensor_data(&self) -> Result<SensorSnapshot, AggregatorError<P, H>> {
        if !self.are_sensors_ready() {
            if self.config.read_policy == ReadPolicy::RequireReady {
                return Err(Error::NotReady);
            }
            trace!("[sensors] reading before all sensors are ready");
        }

        let mut drivers = self.drivers.lock().await;

        let pressure = drivers.pressure.read_data().await.map_err(|e| {
            warn!("[sensors] pressure read failed");
            Error::Read(DriverError::Pressure(e))
        })?;

        let humidity = drivers.humidity.read_data().await.map_err(|e| {
            warn!("[sensors] humidity read failed");
            Error::Read(DriverError::Humidity(e))
        })?;

        let timestamp = self.clock.now();
        drop(drivers);

        let snapshot = SensorSnapshot::new(&pressure, &humidity, timestamp);
        trace!(
            "[sensors] {} hPa, {} %RH",
            snapshot.pressure(),
            snapshot.humidity()
        );
        Ok(snapshot)
    }

    /// Give the drivers back.
    pub fn into_inner(self) -> (P, H) {
        let drivers = self.drivers.into_inner();
        (drivers.pressure, drivers.humidity)
    }
}
