//! Direct transport
//!
//! Sends every packet the moment it is queued. There is no
//! acknowledgement or retransmission; the window only bounds how many
//! packets may be leased and not yet handed back.

use super::{Packet, PacketHandler, PacketHandlerConfig, PacketType};

/// Minimal packet transport with a lease window
pub struct DirectHandler<L> {
    config: PacketHandlerConfig<L>,
    leased: u8,
    sent: u32,
    failed: u32,
}

impl<L> DirectHandler<L> {
    /// Transport configuration
    #[must_use]
    pub const fn config(&self) -> &PacketHandlerConfig<L> {
        &self.config
    }

    /// Packets currently leased to the driver
    #[must_use]
    pub const fn leased(&self) -> u8 {
        self.leased
    }

    /// Packets the send hook accepted
    #[must_use]
    pub const fn sent(&self) -> u32 {
        self.sent
    }

    /// Packets the send hook rejected
    #[must_use]
    pub const fn failed(&self) -> u32 {
        self.failed
    }

    fn window(&self) -> u8 {
        self.config.tx_win_size.max(1)
    }
}

impl<L> PacketHandler<L> for DirectHandler<L> {
    fn initialize(config: PacketHandlerConfig<L>) -> Self {
        Self {
            config,
            leased: 0,
            sent: 0,
            failed: 0,
        }
    }

    fn get_tx_packet(&mut self) -> Option<Packet> {
        if self.leased >= self.window() {
            return None;
        }
        self.leased += 1;
        Some(Packet::new())
    }

    fn transmit_packet(&mut self, link: &mut L, packet: Packet) {
        self.leased = self.leased.saturating_sub(1);
        if (self.config.output_stream)(link, &packet) {
            self.sent = self.sent.wrapping_add(1);
        } else {
            self.failed = self.failed.wrapping_add(1);
        }
    }

    fn receive_packet(&mut self, link: &mut L, packet: &Packet) {
        if packet.packet_type() == PacketType::Data && !packet.is_empty() {
            (self.config.data_handler)(link, packet.payload());
        }
    }
}
