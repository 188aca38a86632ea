//! Source of the snapshot timestamps.
//!
//! Snapshots carry wall-clock time. On hosted targets [`SystemClock`] reads
//! the operating system clock and is the default. Bare-metal boards have no
//! calendar time of their own: they must supply a [`Clock`] backed by an RTC,
//! or an [`EpochClock`] anchored to a time obtained at startup (RTC, NTP,
//! GNSS). Without one, [`DefaultClock`] counts from the epoch at boot.

use crate::domain::Timestamp;
use embassy_time::{Duration, Instant};

/// Something that can tell the current wall-clock time.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// The operating system's real-time clock.
#[cfg(feature = "std")]
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        // a system clock set before 1970 reads as the epoch
        let micros = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_micros() as u64)
            .unwrap_or(0);
        Timestamp::from_micros(micros)
    }
}

/// The embassy time driver, anchored to the wall-clock time at boot.
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EpochClock {
    boot: Timestamp,
}

impl EpochClock {
    /// `boot` is the wall-clock time at which the embassy time driver read zero.
    pub const fn new(boot: Timestamp) -> Self {
        Self { boot }
    }

    /// Anchor the clock so that it reads `now` at this instant.
    pub fn synchronized(now: Timestamp) -> Self {
        let since_boot = Instant::now().as_micros();
        Self::new(Timestamp::from_micros(
            now.as_micros().saturating_sub(since_boot),
        ))
    }

    pub fn boot_time(&self) -> Timestamp {
        self.boot
    }
}

impl Clock for EpochClock {
    fn now(&self) -> Timestamp {
        self.boot + Duration::from_micros(Instant::now().as_micros())
    }
}

/// The clock an aggregator uses unless another one is given.
#[cfg(feature = "std")]
pub type DefaultClock = SystemClock;

/// The clock an aggregator uses unless another one is given.
#[cfg(not(feature = "std"))]
pub type DefaultClock = EpochClock;
