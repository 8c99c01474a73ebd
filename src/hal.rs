//! Hardware Abstraction Layer
//!
//! Drives the driver's timing from embassy on the target board.

pub mod ticker;
