//! Transport packet model

use crate::config::MAX_PAYLOAD;

/// Packet type carried in the header
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum PacketType {
    /// Unused packet
    #[default]
    None = 0,
    /// Connection request
    Connect = 1,
    /// Connection teardown
    Disconnect = 2,
    /// User payload
    Data = 5,
    /// Link status report
    Status = 7,
    /// Positive acknowledgement
    Ack = 8,
    /// Negative acknowledgement
    Nack = 9,
}

#[cfg(feature = "embedded")]
impl defmt::Format for PacketType {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::None => defmt::write!(f, "NONE"),
            Self::Connect => defmt::write!(f, "CONNECT"),
            Self::Disconnect => defmt::write!(f, "DISCONNECT"),
            Self::Data => defmt::write!(f, "DATA"),
            Self::Status => defmt::write!(f, "STATUS"),
            Self::Ack => defmt::write!(f, "ACK"),
            Self::Nack => defmt::write!(f, "NACK"),
        }
    }
}

/// Packet header
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PacketHeader {
    /// What the payload means
    pub packet_type: PacketType,
    /// Declared payload length, never above [`MAX_PAYLOAD`]
    pub data_size: u8,
}

/// A transport packet: header plus a fixed-capacity payload buffer
#[derive(Clone, PartialEq, Eq)]
pub struct Packet {
    header: PacketHeader,
    data: [u8; MAX_PAYLOAD],
}

impl Packet {
    /// Create an empty packet of type [`PacketType::None`]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            header: PacketHeader {
                packet_type: PacketType::None,
                data_size: 0,
            },
            data: [0; MAX_PAYLOAD],
        }
    }

    /// Create a packet holding `payload`, truncated to [`MAX_PAYLOAD`]
    #[must_use]
    pub fn with_payload(packet_type: PacketType, payload: &[u8]) -> Self {
        let mut packet = Self::new();
        packet.reset(packet_type);
        let n = payload.len().min(MAX_PAYLOAD);
        packet.data[..n].copy_from_slice(&payload[..n]);
        packet.advance(n);
        packet
    }

    /// Start over as an empty packet of the given type
    pub fn reset(&mut self, packet_type: PacketType) {
        self.header.packet_type = packet_type;
        self.header.data_size = 0;
    }

    /// Get the header
    #[must_use]
    pub const fn header(&self) -> PacketHeader {
        self.header
    }

    /// Get the packet type
    #[must_use]
    pub const fn packet_type(&self) -> PacketType {
        self.header.packet_type
    }

    /// Declared payload length
    #[must_use]
    pub const fn len(&self) -> usize {
        self.header.data_size as usize
    }

    /// Check if the payload is empty
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.header.data_size == 0
    }

    /// Check if no payload space is left
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.len() >= MAX_PAYLOAD
    }

    /// Payload space still free
    #[must_use]
    pub const fn remaining(&self) -> usize {
        MAX_PAYLOAD - self.len()
    }

    /// The declared payload
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len()]
    }

    /// Free space after the declared payload, for a producer to fill
    pub fn spare_mut(&mut self) -> &mut [u8] {
        let start = self.len();
        &mut self.data[start..]
    }

    /// Extend the declared length by bytes written into
    /// [`spare_mut`](Self::spare_mut). Returns the amount actually taken.
    pub fn advance(&mut self, n: usize) -> usize {
        let n = n.min(self.remaining());
        // MAX_PAYLOAD fits in the u8 length field
        self.header.data_size = (self.len() + n) as u8;
        n
    }
}

impl Default for Packet {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Packet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Packet")
            .field("header", &self.header)
            .field("payload", &self.payload())
            .finish()
    }
}
