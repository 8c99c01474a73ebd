//! COM driver contract
//!
//! The interface a generic byte-stream layer uses to drive the radio:
//! callbacks that move bytes in and out of the caller's buffers, and the
//! [`ComDriver`] entry points that bind them and signal readiness.

use crate::types::DeviceHandle;

/// Sink for received bytes.
///
/// Called with the caller's opaque context and the bytes to accept.
/// Returns how many were consumed and may set `need_yield` when a
/// waiting task should be scheduled.
pub type RxCallback = fn(context: usize, data: &[u8], need_yield: &mut bool) -> usize;

/// Source of bytes to transmit.
///
/// Fills at most `buf.len()` bytes from the caller's context and returns
/// how many were produced. Zero means nothing is available right now.
pub type TxCallback = fn(context: usize, buf: &mut [u8], need_yield: &mut bool) -> usize;

/// A callback together with its opaque context.
///
/// Stored and replaced as one value so a concurrent reader never sees a
/// callback paired with a stale context.
#[derive(Clone, Copy)]
pub struct Binding<F> {
    callback: F,
    context: usize,
}

impl<F: Copy> Binding<F> {
    /// Pair a callback with its context
    #[must_use]
    pub const fn new(callback: F, context: usize) -> Self {
        Self { callback, context }
    }

    /// The bound callback
    #[must_use]
    pub fn callback(&self) -> F {
        self.callback
    }

    /// The context handed back on every call
    #[must_use]
    pub const fn context(&self) -> usize {
        self.context
    }
}

impl Binding<RxCallback> {
    /// Deliver received bytes
    pub fn deliver(&self, data: &[u8], need_yield: &mut bool) -> usize {
        (self.callback)(self.context, data, need_yield)
    }
}

impl Binding<TxCallback> {
    /// Pull bytes to transmit into `buf`
    pub fn pull(&self, buf: &mut [u8], need_yield: &mut bool) -> usize {
        (self.callback)(self.context, buf, need_yield)
    }
}

/// Entry points a byte-stream layer calls on a radio device.
///
/// Every method takes the handle returned by init. Presenting a handle
/// that does not name a live device is a programming error and panics.
pub trait ComDriver {
    /// Change the link rate. The radio rate is fixed by its
    /// configuration, so this is accepted and ignored.
    fn set_baud(&self, handle: DeviceHandle, baud: u32);

    /// Transmit capacity is available; pull bytes and assemble packets
    fn tx_start(&self, handle: DeviceHandle, tx_bytes_avail: u16);

    /// Receive space is available in the caller's buffer
    fn rx_start(&self, handle: DeviceHandle, rx_bytes_avail: u16);

    /// Bind the sink that receives bytes from the radio
    fn bind_rx_cb(&self, handle: DeviceHandle, callback: RxCallback, context: usize);

    /// Bind the source that supplies bytes to the radio
    fn bind_tx_cb(&self, handle: DeviceHandle, callback: TxCallback, context: usize);
}
