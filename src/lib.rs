//! RFM22B Radio COM Driver Library
//!
//! This library exposes an RFM22B radio link as a byte-stream (COM)
//! device. Bytes pulled from the caller are batched into packets for a
//! packet-level transport, and a periodic tick drains received bytes and
//! forces out partially filled packets once a deadline passes.
//!
//! # Architecture
//!
//! The driver is organized in layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    BYTE-STREAM CONSUMER                      │
//! │        COM port  │  rx/tx callbacks  │  tx_start             │
//! ├─────────────────────────────────────────────────────────────┤
//! │                      RADIO DRIVER                            │
//! │  Registry  │  Transmit assembler  │  Timer-driven flush      │
//! ├─────────────────────────────────────────────────────────────┤
//! │                 TRANSPORT / LINK LAYER                       │
//! │  Packet handler  │  Transport adapter  │  Physical link      │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    TICK SOURCE                               │
//! │           RTC table driven by embassy-time                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Bounded memory**: a fixed device pool and fixed-size packets
//! - **Single owner**: the in-flight packet moves into the transport on send
//! - **Mutual exclusion**: tick and caller paths meet inside a critical section
//! - **Fail loudly**: an invalid handle is a programming error and panics
//! - **No unsafe in driver code**

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Must come first so the logging macros are visible to every module
mod fmt;

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Hardware Abstraction Layer
///
/// Embassy-driven tick source for the target board.
#[cfg(feature = "embedded")]
pub mod hal;

/// COM Driver Contract
///
/// Callback types and the entry points a byte-stream layer calls.
pub mod com;

/// Packet Transport
///
/// Packet model and the seam to the packet-level transport.
pub mod transport;

/// Physical Link
///
/// Byte channel to the radio transceiver.
pub mod phy;

/// Periodic Tick Source
///
/// Tick subscriptions with opaque contexts.
pub mod tick;

/// Radio Device Driver
///
/// Device pool, transmit assembler and timer-driven flush.
pub mod radio;

/// Shared types used across modules
pub mod types;

/// Driver configuration and constants
pub mod config;

/// Prelude module for common imports
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::com::{ComDriver, RxCallback, TxCallback};
    pub use crate::config::*;
    pub use crate::phy::{IoLink, PhyError, PhyLink};
    pub use crate::radio::adapter::LinkPort;
    pub use crate::radio::registry::{InitError, Registry};
    pub use crate::tick::{TickError, TickHandler, TickSource, TickTable};
    pub use crate::transport::{DirectHandler, Packet, PacketHandler, PacketType};
    pub use crate::types::*;

    // Embassy
    #[cfg(feature = "embedded")]
    pub use embassy_time::{Duration, Instant, Timer};
}
