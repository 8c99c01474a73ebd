//! Tick driver
//!
//! Fires a [`TickTable`] from an embassy [`Ticker`] at the table's period.

use embassy_time::{Duration, Ticker};

use crate::tick::{TickSource, TickTable};

/// Tick period as an embassy duration
#[must_use]
pub fn period<const N: usize>(table: &TickTable<N>) -> Duration {
    Duration::from_micros(u64::from(table.period().as_micros()))
}

/// Fire `table` forever. A yield request from any subscriber lets other
/// tasks run before the next tick.
pub async fn run<const N: usize>(table: &TickTable<N>) -> ! {
    let mut ticker = Ticker::every(period(table));
    loop {
        ticker.next().await;
        if table.fire() {
            embassy_futures::yield_now().await;
        }
    }
}
