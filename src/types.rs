//! Shared types used across the driver
//!
//! Small value types that keep handles, tick periods and the flush
//! countdown from being confused with plain integers.

use core::fmt;

use crate::config::RTC_TICK_HZ;

/// Opaque reference to an allocated radio device.
///
/// A handle is only an index into the device pool. Whether it names a
/// live device is decided by the pool's liveness tag, so a handle forged
/// with [`DeviceHandle::from_raw`] is always checked before use.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceHandle(u32);

impl DeviceHandle {
    /// Rebuild a handle from its raw form (e.g. a tick context)
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw form passed across opaque-context boundaries
    #[must_use]
    pub const fn into_raw(self) -> u32 {
        self.0
    }

    /// Pool slot this handle refers to
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index as u32)
    }
}

impl fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceHandle({})", self.0)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for DeviceHandle {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "dev#{}", self.0);
    }
}

/// Period of the hardware tick in microseconds
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TickPeriod(u32);

impl TickPeriod {
    /// Period of the reference board's RTC
    pub const RTC: Self = Self(1_000_000 / RTC_TICK_HZ);

    /// Create from a period in microseconds, `None` for zero
    #[must_use]
    pub const fn from_micros(us: u32) -> Option<Self> {
        if us == 0 {
            None
        } else {
            Some(Self(us))
        }
    }

    /// Create from a tick rate, `None` for zero or rates above 1 MHz
    #[must_use]
    pub const fn from_hz(hz: u32) -> Option<Self> {
        if hz == 0 || hz > 1_000_000 {
            None
        } else {
            Some(Self(1_000_000 / hz))
        }
    }

    /// Get the period in microseconds
    #[must_use]
    pub const fn as_micros(self) -> u32 {
        self.0
    }

    /// Get the tick rate in Hz (truncated)
    #[must_use]
    pub const fn rate_hz(self) -> u32 {
        1_000_000 / self.0
    }
}

impl fmt::Debug for TickPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TickPeriod({} us)", self.0)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for TickPeriod {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}us", self.0);
    }
}

/// Ticks remaining until a forced flush.
///
/// Fires when the count reaches zero and immediately re-arms itself, so
/// the remaining count is always in `1..=reload`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    reload: u32,
}

impl Countdown {
    /// Create an armed countdown; a zero reload is clamped to one tick
    #[must_use]
    pub const fn new(reload: u32) -> Self {
        let reload = if reload == 0 { 1 } else { reload };
        Self {
            remaining: reload,
            reload,
        }
    }

    /// Ticks left before the next expiry
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Value the countdown is re-armed to
    #[must_use]
    pub const fn reload(&self) -> u32 {
        self.reload
    }

    /// Re-arm to the full period
    pub fn rearm(&mut self) {
        self.remaining = self.reload;
    }

    /// Count one tick. Returns `true` on expiry, already re-armed.
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return false;
        }
        self.rearm();
        true
    }
}
