//! Periodic sampling of the aggregated sensors.

use crate::aggregator::{AggregatorError, Error, SensorAggregator};
use crate::clock::Clock;
use crate::domain::SensorSnapshot;
use crate::traits::sensors::{HumiditySensor, PressureSensor};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{Duration, Ticker, Timer};

/// Receives every snapshot taken by a [`Sampler`].
pub trait SensorMonitor {
    fn notify(&self, snapshot: SensorSnapshot);
}

impl<T: SensorMonitor + ?Sized> SensorMonitor for &T {
    fn notify(&self, snapshot: SensorSnapshot) {
        (**self).notify(snapshot)
    }
}

#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SamplerConfig {
    /// Time between two aggregations.
    pub interval: Duration,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
        }
    }
}

impl SamplerConfig {
    pub const fn every(interval: Duration) -> Self {
        Self { interval }
    }
}

pub struct Sampler<'a, M, P, H, C, S>
where
    M: RawMutex,
{
    aggregator: &'a SensorAggregator<M, P, H, C>,
    monitor: S,
    config: SamplerConfig,
}

impl<'a, M, P, H, C, S> Sampler<'a, M, P, H, C, S>
where
    M: RawMutex,
    P: PressureSensor,
    H: HumiditySensor,
    C: Clock,
    S: SensorMonitor,
{
    pub fn new(
        aggregator: &'a SensorAggregator<M, P, H, C>,
        monitor: S,
        config: SamplerConfig,
    ) -> Self {
        Self {
            aggregator,
            monitor,
            config,
        }
    }

    /// Take one snapshot and hand it to the monitor.
    pub async fn sample(&self) -> Result<SensorSnapshot, AggregatorError<P, H>> {
        let snapshot = self.aggregator.read_sensor_data().await?;
        self.monitor.notify(snapshot);
        Ok(snapshot)
    }

    /// Wait for the sensors, then sample on every tick.
    ///
    /// A failed aggregation is logged and retried as a whole on the next tick.
    pub async fn run(&self) -> ! {
        if self.aggregator.wait_until_ready().await.is_err() {
            warn!("[sampler] no ready subscription available, polling");
            while !self.aggregator.are_sensors_ready() {
                Timer::after(self.config.interval).await;
            }
        }
        info!("[sampler] sampling every {} ms", self.config.interval.as_millis());

        let mut ticker = Ticker::every(self.config.interval);
        loop {
            match self.sample().await {
                Ok(_) => {}
                Err(Error::Read(e)) => {
                    warn!("[sampler] {} read failed, retrying next tick", e.kind())
                }
                Err(_) => warn!("[sampler] sampling failed, retrying next tick"),
            }
            ticker.next().await;
        }
    }
}
