#![cfg_attr(not(feature = "std"), no_std)]
//! Pi Sense coordinates the environmental sensors of a Raspberry Pi Sense HAT, an LPS25H
//! pressure sensor and an HTS221 humidity sensor, on top of
//! [embassy](https://github.com/embassy-rs/embassy).
//!
//! # Sensor aggregation
//!
//! Both drivers initialize independently and each signals readiness once. The
//! [`SensorAggregator`] folds those signals into one readiness state and announces, exactly once,
//! when both drivers are up. On request it reads the pressure sensor and then the humidity
//! sensor, never both at the same time, and merges the two readings into a [`SensorSnapshot`]
//! truncated to one decimal digit.
//!
//! # Example
//!
//! ```ignore
//! static BUS: StaticCell<Mutex<NoopRawMutex, I2c<'static, Async>>> = StaticCell::new();
//!
//! #[embassy_executor::main]
//! async fn main(_spawner: Spawner) {
//!     let bus = BUS.init(Mutex::new(board_i2c()));
//!     let hat = SenseHat::new(bus);
//!
//!     hat.sensors.initialize().await.ok();
//!     hat.sensors.wait_until_ready().await.unwrap();
//!
//!     let snapshot = hat.sensors.read_sensor_data().await.unwrap();
//!     info!("{} hPa", snapshot.pressure());
//! }
//! ```

pub(crate) mod fmt;

pub mod aggregator;
pub use aggregator::{
    AggregatorConfig, AggregatorError, DriverError, Error, ReadPolicy, ReadyNotification,
    SensorAggregator,
};

pub mod clock;
#[cfg(feature = "std")]
pub use clock::SystemClock;
pub use clock::{Clock, DefaultClock, EpochClock};

pub mod domain;
pub use domain::{
    HumidityAcquisition, PressureAcquisition, ReadinessState, ReadinessTracker, SensorKind,
    SensorSnapshot, Timestamp,
};

pub mod traits;
pub use traits::sensors::SensorDriver;

pub mod drivers;

pub mod monitor;
pub use monitor::{Sampler, SamplerConfig, SensorMonitor};

pub mod bsp;
pub use bsp::Board;

#[cfg(feature = "std")]
pub mod testutil;
