//! Readiness of the two sensor drivers, combined into one condition.
//!
//! Each driver becomes ready exactly once, in any order. The tracker moves
//! `NotReady -> PartiallyReady -> Ready` and never goes back.

use core::fmt::{Display, Formatter};

/// Names one of the two drivers coordinated by the aggregator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorKind {
    /// The pressure/temperature driver (LPS25H on the Sense HAT).
    Pressure,
    /// The humidity/temperature driver (HTS221 on the Sense HAT).
    Humidity,
}

impl SensorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SensorKind::Pressure => "pressure",
            SensorKind::Humidity => "humidity",
        }
    }

    const fn other(&self) -> SensorKind {
        match self {
            SensorKind::Pressure => SensorKind::Humidity,
            SensorKind::Humidity => SensorKind::Pressure,
        }
    }
}

impl Display for SensorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Combined readiness of both drivers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadinessState {
    #[default]
    NotReady,
    /// Exactly one driver, the carried one, has signaled ready.
    PartiallyReady(SensorKind),
    Ready,
}

#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReadinessTracker {
    state: ReadinessState,
}

impl ReadinessTracker {
    pub const fn new() -> Self {
        Self {
            state: ReadinessState::NotReady,
        }
    }

    /// Record that `kind` finished initializing.
    ///
    /// Returns `true` only for the call that moves the tracker into
    /// [`ReadinessState::Ready`]. Repeated signals from the same driver
    /// change nothing.
    pub fn mark(&mut self, kind: SensorKind) -> bool {
        let next = match self.state {
            ReadinessState::NotReady => ReadinessState::PartiallyReady(kind),
            ReadinessState::PartiallyReady(ready) if ready == kind => self.state,
            ReadinessState::PartiallyReady(_) => ReadinessState::Ready,
            ReadinessState::Ready => ReadinessState::Ready,
        };
        let became_ready = next == ReadinessState::Ready && self.state != ReadinessState::Ready;
        self.state = next;
        became_ready
    }

    pub fn mark_pressure_driver_ready(&mut self) -> bool {
        self.mark(SensorKind::Pressure)
    }

    pub fn mark_humidity_driver_ready(&mut self) -> bool {
        self.mark(SensorKind::Humidity)
    }

    pub fn is_ready(&self) -> bool {
        self.state == ReadinessState::Ready
    }

    pub fn is_driver_ready(&self, kind: SensorKind) -> bool {
        match self.state {
            ReadinessState::NotReady => false,
            ReadinessState::PartiallyReady(ready) => ready == kind,
            ReadinessState::Ready => true,
        }
    }

    pub fn state(&self) -> ReadinessState {
        self.state
    }

    /// The driver still missing, if any.
    pub fn pending(&self) -> Option<SensorKind> {
        match self.state {
            ReadinessState::PartiallyReady(ready) => Some(ready.other()),
            _ => None,
        }
    }
}
