//! Packet Transport Contract
//!
//! The driver hands assembled packets to a packet-level transport that
//! owns framing, windowing and retransmission. This module defines the
//! packet model, the configuration the transport is built from, and the
//! [`PacketHandler`] seam, plus a minimal reference transport.

pub mod direct;
pub mod packet;

pub use direct::DirectHandler;
pub use packet::{Packet, PacketHeader, PacketType};

/// Send hook: put a packet's payload on the physical link
pub type OutputStream<L> = fn(link: &mut L, packet: &Packet) -> bool;

/// Receive hook: accept payload bytes surfaced by the transport
pub type DataHandler<L> = fn(link: &mut L, data: &[u8]);

/// Baud hook: change the physical link rate
pub type SetBaud<L> = fn(link: &mut L, baud: u32);

/// Everything a transport instance is built from.
///
/// `L` is the link context the transport passes back to its hooks.
pub struct PacketHandlerConfig<L> {
    /// Number of packets that may be outstanding at once
    pub tx_win_size: u8,
    /// Maximum number of peer connections
    pub max_connections: u8,
    /// Instance id on the link
    pub id: u32,
    /// Called to transmit a completed packet
    pub output_stream: OutputStream<L>,
    /// Called to change the link rate, if the link supports it
    pub set_baud: Option<SetBaud<L>>,
    /// Called with inbound payload bytes
    pub data_handler: DataHandler<L>,
}

impl<L> Clone for PacketHandlerConfig<L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<L> Copy for PacketHandlerConfig<L> {}

/// A packet-level transport instance.
///
/// Packets are leased with [`get_tx_packet`](Self::get_tx_packet) and
/// given back by value to [`transmit_packet`](Self::transmit_packet);
/// after that call the caller no longer owns the packet.
pub trait PacketHandler<L>: Sized {
    /// Build a transport instance
    fn initialize(config: PacketHandlerConfig<L>) -> Self;

    /// Lease a fresh transmit packet, `None` while the window is full
    fn get_tx_packet(&mut self) -> Option<Packet>;

    /// Queue a leased packet for transmission
    fn transmit_packet(&mut self, link: &mut L, packet: Packet);

    /// Process a packet received from the link
    fn receive_packet(&mut self, link: &mut L, packet: &Packet) {
        let _ = (link, packet);
    }
}
