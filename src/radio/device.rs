//! Radio device state
//!
//! Everything one radio instance owns, and the two operations that move
//! data through it: the transmit assembler run on transmit-ready events
//! and the flush run on every tick. Callers serialize access; see
//! [`Registry`](super::registry::Registry).

use super::adapter::{self, LinkPort};
use crate::com::{Binding, RxCallback, TxCallback};
use crate::config::{RadioConfig, DEVICE_MAGIC};
use crate::phy::PhyLink;
use crate::transport::{Packet, PacketHandler, PacketHandlerConfig, PacketType};
use crate::types::{Countdown, TickPeriod};

/// One radio instance
pub(crate) struct Device<H, P> {
    magic: u32,
    config: RadioConfig,
    countdown: Countdown,
    tx: Option<Binding<TxCallback>>,
    port: LinkPort<P>,
    packet_handler: H,
    cur_tx_packet: Option<Packet>,
}

impl<H, P> Device<H, P>
where
    H: PacketHandler<LinkPort<P>>,
    P: PhyLink,
{
    /// Build a device and its transport instance
    pub(crate) fn new(config: RadioConfig, period: TickPeriod, phy: P) -> Self {
        let packet_handler = H::initialize(PacketHandlerConfig {
            tx_win_size: config.tx_win_size,
            max_connections: config.max_connections,
            id: config.id,
            output_stream: adapter::send_packet::<P>,
            set_baud: None,
            data_handler: adapter::receive_data::<P>,
        });

        Self {
            magic: DEVICE_MAGIC,
            config,
            countdown: Countdown::new(config.countdown_ticks(period)),
            tx: None,
            port: LinkPort::new(phy),
            packet_handler,
            cur_tx_packet: None,
        }
    }

    pub(crate) const fn is_live(&self) -> bool {
        self.magic == DEVICE_MAGIC
    }

    pub(crate) const fn config(&self) -> &RadioConfig {
        &self.config
    }

    pub(crate) const fn countdown(&self) -> Countdown {
        self.countdown
    }

    /// Payload bytes waiting in the in-flight packet
    pub(crate) fn pending_len(&self) -> usize {
        self.cur_tx_packet.as_ref().map_or(0, Packet::len)
    }

    pub(crate) const fn has_in_flight(&self) -> bool {
        self.cur_tx_packet.is_some()
    }

    pub(crate) fn bind_rx(&mut self, binding: Binding<RxCallback>) {
        self.port.bind_receiver(binding);
    }

    pub(crate) fn bind_tx(&mut self, binding: Binding<TxCallback>) {
        self.tx = Some(binding);
    }

    /// Pull bytes from the transmit source into the in-flight packet and
    /// send it once it reaches the minimum size.
    pub(crate) fn tx_start(&mut self) {
        let Some(source) = self.tx else {
            return;
        };

        let mut packet = match self.cur_tx_packet.take() {
            Some(packet) => packet,
            None => match self.packet_handler.get_tx_packet() {
                Some(mut packet) => {
                    packet.reset(PacketType::Data);
                    packet
                }
                None => {
                    trace!("radio {}: no tx packet available", self.config.id);
                    return;
                }
            },
        };

        // Yield hints from the source only matter to cooperative callers
        let mut need_yield = false;
        let produced = source.pull(packet.spare_mut(), &mut need_yield);
        packet.advance(produced);

        if packet.len() >= usize::from(self.config.min_packet_size) || packet.is_full() {
            trace!("radio {}: sending {} bytes", self.config.id, packet.len());
            self.transmit(packet);
            self.countdown.rearm();
        } else {
            self.cur_tx_packet = Some(packet);
        }
    }

    /// One tick: service the link, drain received bytes, then force out
    /// the in-flight packet when the deadline expires. Returns whether a
    /// yield was requested.
    pub(crate) fn on_tick(&mut self) -> bool {
        self.port.poll();
        self.port.drain();
        let need_yield = self.port.take_yield();

        // Whatever is in flight goes out at the deadline, even if short
        if self.countdown.tick() {
            if let Some(packet) = self.cur_tx_packet.take() {
                debug!("radio {}: forced flush of {} bytes", self.config.id, packet.len());
                self.transmit(packet);
            }
        }

        need_yield
    }

    /// Feed a packet received from the link to the transport
    pub(crate) fn receive_packet(&mut self, packet: &Packet) -> bool {
        self.packet_handler.receive_packet(&mut self.port, packet);
        self.port.take_yield()
    }

    fn transmit(&mut self, packet: Packet) {
        self.packet_handler.transmit_packet(&mut self.port, packet);
    }
}
