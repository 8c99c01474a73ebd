//! Radio Device Driver
//!
//! Device state, the transmit assembler and the timer-driven flush, the
//! adapter that connects the packet transport to the physical link, and
//! the bounded device pool the COM entry points dispatch through.

pub mod adapter;
pub mod device;
pub mod registry;
