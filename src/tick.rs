//! Periodic Tick Source
//!
//! A fixed-rate tick drives receive draining and the forced-flush
//! deadline. Handlers subscribe with an opaque context that is handed
//! back verbatim on every tick.

use heapless::Vec;

use crate::config::MAX_TICK_CALLBACKS;
use crate::types::TickPeriod;

/// Something run on every tick
pub trait TickHandler: Sync {
    /// Handle one tick. Returns `true` when a waiting task should be
    /// scheduled once the tick completes.
    fn on_tick(&self, context: u32) -> bool;
}

/// Subscription refused
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TickError {
    /// No free subscription slot
    #[error("tick callback table full")]
    TableFull,
}

#[cfg(feature = "embedded")]
impl defmt::Format for TickError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::TableFull => defmt::write!(f, "TableFull"),
        }
    }
}

/// A provider of periodic ticks
pub trait TickSource {
    /// Time between ticks
    fn period(&self) -> TickPeriod;

    /// Subscribe `handler`, to be called with `context` on every tick
    ///
    /// # Errors
    ///
    /// Returns [`TickError::TableFull`] when no more subscriptions fit.
    fn register(&mut self, handler: &'static dyn TickHandler, context: u32)
        -> Result<(), TickError>;
}

#[derive(Clone, Copy)]
struct Subscription {
    handler: &'static dyn TickHandler,
    context: u32,
}

/// Fixed-capacity table of tick subscriptions.
///
/// Whoever owns the hardware timer calls [`fire`](Self::fire) once per
/// period.
pub struct TickTable<const N: usize = MAX_TICK_CALLBACKS> {
    period: TickPeriod,
    subscriptions: Vec<Subscription, N>,
}

impl<const N: usize> TickTable<N> {
    /// Create an empty table ticking at `period`
    #[must_use]
    pub const fn new(period: TickPeriod) -> Self {
        Self {
            period,
            subscriptions: Vec::new(),
        }
    }

    /// Create an empty table at the RTC rate
    #[must_use]
    pub const fn rtc() -> Self {
        Self::new(TickPeriod::RTC)
    }

    /// Number of subscriptions
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Check if nothing is subscribed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Run every subscription once. Returns `true` if any asked for a
    /// yield.
    pub fn fire(&self) -> bool {
        let mut need_yield = false;
        for sub in &self.subscriptions {
            need_yield |= sub.handler.on_tick(sub.context);
        }
        need_yield
    }
}

impl<const N: usize> TickSource for TickTable<N> {
    fn period(&self) -> TickPeriod {
        self.period
    }

    fn register(
        &mut self,
        handler: &'static dyn TickHandler,
        context: u32,
    ) -> Result<(), TickError> {
        self.subscriptions
            .push(Subscription { handler, context })
            .map_err(|_| TickError::TableFull)
    }
}
