//! Transport Adapter
//!
//! The link context handed to the packet transport. Its two hooks are
//! the only calls the transport makes back into the driver: one puts a
//! finished packet on the physical link, the other accepts inbound
//! payload bytes.

use crate::com::{Binding, RxCallback};
use crate::config::RX_CHUNK_SIZE;
use crate::phy::PhyLink;
use crate::transport::Packet;

/// Physical link plus the receive-side consumer
pub struct LinkPort<P> {
    phy: P,
    rx: Option<Binding<RxCallback>>,
    need_yield: bool,
}

impl<P> LinkPort<P> {
    /// Wrap a physical link with no receive consumer bound
    #[must_use]
    pub const fn new(phy: P) -> Self {
        Self {
            phy,
            rx: None,
            need_yield: false,
        }
    }

    /// Get the physical link
    #[must_use]
    pub const fn phy(&self) -> &P {
        &self.phy
    }

    /// Check if a receive consumer is bound
    #[must_use]
    pub const fn has_receiver(&self) -> bool {
        self.rx.is_some()
    }

    pub(crate) fn bind_receiver(&mut self, binding: Binding<RxCallback>) {
        self.rx = Some(binding);
    }

    /// Hand bytes to the receive consumer, if one is bound
    pub(crate) fn deliver(&mut self, data: &[u8]) -> usize {
        match self.rx {
            Some(rx) if !data.is_empty() => rx.deliver(data, &mut self.need_yield),
            _ => 0,
        }
    }

    /// Return and clear the pending yield request
    pub(crate) fn take_yield(&mut self) -> bool {
        core::mem::take(&mut self.need_yield)
    }
}

impl<P: PhyLink> LinkPort<P> {
    /// Let the physical link make progress on queued output
    pub(crate) fn poll(&mut self) {
        if let Err(e) = self.phy.poll() {
            warn!("radio link poll failed: {}", e);
        }
    }

    /// Move up to one chunk from the physical receive buffer to the
    /// receive consumer. Nothing is read while no consumer is bound.
    pub(crate) fn drain(&mut self) -> usize {
        if self.rx.is_none() {
            return 0;
        }
        let mut buf = [0u8; RX_CHUNK_SIZE];
        let n = self.phy.receive(&mut buf).min(RX_CHUNK_SIZE);
        if n > 0 {
            self.deliver(&buf[..n]);
        }
        n
    }
}

/// Send hook: put a finished packet's payload on the physical link.
/// Reports whether the link accepted it.
pub fn send_packet<P: PhyLink>(port: &mut LinkPort<P>, packet: &Packet) -> bool {
    match port.phy.send(packet.payload()) {
        Ok(()) => true,
        Err(e) => {
            warn!("radio send of {} bytes failed: {}", packet.len(), e);
            false
        }
    }
}

/// Receive hook: route inbound payload to the receive consumer
pub fn receive_data<P: PhyLink>(port: &mut LinkPort<P>, data: &[u8]) {
    port.deliver(data);
}
