//! Physical Link
//!
//! The byte channel to the radio transceiver. Register-level radio
//! setup lives below this trait; the driver only pushes packet payloads
//! out and drains whatever bytes the radio has received.

use heapless::Deque;

use crate::config::MAX_PAYLOAD;

/// Physical link failure
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PhyError {
    /// Transmitter cannot take more data right now
    #[error("physical link busy")]
    Busy,
    /// Hardware reported a transfer error
    #[error("physical link I/O error")]
    Io,
}

#[cfg(feature = "embedded")]
impl defmt::Format for PhyError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Busy => defmt::write!(f, "Busy"),
            Self::Io => defmt::write!(f, "Io"),
        }
    }
}

/// Byte channel to the radio.
///
/// Both methods are called from the tick path and must not block for
/// longer than a short transfer.
pub trait PhyLink {
    /// Transmit a packet payload
    ///
    /// # Errors
    ///
    /// Returns [`PhyError`] if the payload could not be handed to the radio.
    fn send(&mut self, data: &[u8]) -> Result<(), PhyError>;

    /// Copy already-received bytes into `buf` without waiting.
    /// Returns the number of bytes copied.
    fn receive(&mut self, buf: &mut [u8]) -> usize;

    /// Make progress on queued output. Called once per tick.
    ///
    /// # Errors
    ///
    /// Returns [`PhyError::Io`] if the channel reported a fault.
    fn poll(&mut self) -> Result<(), PhyError> {
        Ok(())
    }
}

/// [`PhyLink`] over an `embedded-io` byte channel.
///
/// Never blocks. A payload is copied into a one-packet backlog and
/// written only while the channel reports room, so a full transmit ring
/// cannot stall a caller that holds a critical section. A new payload is
/// refused with [`PhyError::Busy`] until the previous one is fully out.
pub struct IoLink<T> {
    io: T,
    backlog: Deque<u8, MAX_PAYLOAD>,
}

impl<T> IoLink<T> {
    /// Wrap a byte channel
    #[must_use]
    pub const fn new(io: T) -> Self {
        Self {
            io,
            backlog: Deque::new(),
        }
    }

    /// Bytes accepted but not yet written to the channel
    #[must_use]
    pub fn backlog(&self) -> usize {
        self.backlog.len()
    }

    /// Get the byte channel
    #[must_use]
    pub const fn get_ref(&self) -> &T {
        &self.io
    }

    /// Get the byte channel mutably
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.io
    }

    /// Release the byte channel
    pub fn into_inner(self) -> T {
        self.io
    }
}

impl<T> IoLink<T>
where
    T: embedded_io::Write + embedded_io::WriteReady,
{
    /// Write backlog bytes while the channel has room
    fn pump(&mut self) -> Result<(), PhyError> {
        while !self.backlog.is_empty() {
            if !self.io.write_ready().map_err(|_| PhyError::Io)? {
                break;
            }
            let (head, _) = self.backlog.as_slices();
            let n = self.io.write(head).map_err(|_| PhyError::Io)?;
            if n == 0 {
                break;
            }
            for _ in 0..n {
                self.backlog.pop_front();
            }
        }
        Ok(())
    }
}

impl<T> PhyLink for IoLink<T>
where
    T: embedded_io::Read + embedded_io::ReadReady + embedded_io::Write + embedded_io::WriteReady,
{
    fn send(&mut self, data: &[u8]) -> Result<(), PhyError> {
        self.pump()?;
        if !self.backlog.is_empty() || data.len() > self.backlog.capacity() {
            return Err(PhyError::Busy);
        }
        for &b in data {
            // Capacity checked above
            let _ = self.backlog.push_back(b);
        }
        self.pump().inspect_err(|_| self.backlog.clear())
    }

    fn receive(&mut self, buf: &mut [u8]) -> usize {
        match self.io.read_ready() {
            Ok(true) => self.io.read(buf).unwrap_or(0),
            _ => 0,
        }
    }

    fn poll(&mut self) -> Result<(), PhyError> {
        self.pump()
    }
}
