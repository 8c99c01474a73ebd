//! Driver configuration and compile-time constants
//!
//! Pool sizes, packet geometry and the per-device [`RadioConfig`] record
//! are centralized here.

use crate::types::TickPeriod;

/// Number of radio devices the static pool can hold
pub const MAX_DEVICES: usize = 2;

/// Liveness tag written into a device slot when it is allocated
pub const DEVICE_MAGIC: u32 = 0x68e9_71b6;

/// Bytes drained from the physical receive buffer per tick
pub const RX_CHUNK_SIZE: usize = 16;

/// Largest packet the transport puts on air, header included
pub const MAX_PACKET_LEN: usize = 255;

/// Transport header length
pub const PACKET_HEADER_LEN: usize = 7;

/// Largest payload a single packet can carry
pub const MAX_PAYLOAD: usize = MAX_PACKET_LEN - PACKET_HEADER_LEN;

/// RTC tick rate of the reference board (625 Hz, 1.6 ms period)
pub const RTC_TICK_HZ: u32 = 625;

/// Number of subscriptions a tick table accepts
pub const MAX_TICK_CALLBACKS: usize = 4;

/// Default forced-flush deadline in milliseconds
pub const DEFAULT_SEND_TIMEOUT_MS: u32 = 100;

/// Default transmit window of the packet transport
pub const DEFAULT_TX_WIN_SIZE: u8 = 3;

/// Immutable per-device configuration, bound at init
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RadioConfig {
    /// Maximum time a partial packet may wait before a forced flush
    pub send_timeout_ms: u32,
    /// Payload length that triggers an immediate send
    pub min_packet_size: u16,
    /// Transmit window handed to the packet transport
    pub tx_win_size: u8,
    /// Maximum number of peer connections of the transport
    pub max_connections: u8,
    /// Instance id of this radio on the link
    pub id: u32,
}

impl RadioConfig {
    /// Create a configuration record
    #[must_use]
    pub const fn new(
        send_timeout_ms: u32,
        min_packet_size: u16,
        tx_win_size: u8,
        max_connections: u8,
        id: u32,
    ) -> Self {
        Self {
            send_timeout_ms,
            min_packet_size,
            tx_win_size,
            max_connections,
            id,
        }
    }

    /// Ticks between forced flushes at the given tick period.
    ///
    /// Truncates (100 ms at 1.6 ms gives 62) and never returns zero.
    #[must_use]
    pub const fn countdown_ticks(&self, period: TickPeriod) -> u32 {
        let timeout_us = self.send_timeout_ms as u64 * 1000;
        let ticks = timeout_us / period.as_micros() as u64;
        if ticks == 0 {
            1
        } else if ticks > u32::MAX as u64 {
            u32::MAX
        } else {
            ticks as u32
        }
    }
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SEND_TIMEOUT_MS, 1, DEFAULT_TX_WIN_SIZE, 1, 0)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for RadioConfig {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "RadioConfig(id={=u32:#x}, timeout={}ms, min={}, win={})",
            self.id,
            self.send_timeout_ms,
            self.min_packet_size,
            self.tx_win_size
        );
    }
}
