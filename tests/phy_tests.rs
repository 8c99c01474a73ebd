//! Physical Link Adapter Tests
//!
//! `IoLink` over an in-memory UART with a bounded transmit ring.
//! Run with: cargo test --test phy_tests

mod common;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use common::*;
use embedded_io::{ErrorKind, ErrorType, Read, ReadReady, Write, WriteReady};
use rfm22b_com::prelude::*;

#[derive(Default)]
struct UartState {
    wire: Vec<u8>,
    inbound: VecDeque<u8>,
    /// Bytes that still fit in the transmit ring
    room: usize,
    faulty: bool,
}

/// UART double sharing its state with the test
#[derive(Clone, Default)]
struct Uart(Arc<Mutex<UartState>>);

impl Uart {
    fn with_room(room: usize) -> Self {
        let uart = Self::default();
        uart.state().room = room;
        uart
    }

    fn state(&self) -> MutexGuard<'_, UartState> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wire(&self) -> Vec<u8> {
        self.state().wire.clone()
    }
}

impl ErrorType for Uart {
    type Error = ErrorKind;
}

impl Write for Uart {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        let mut s = self.state();
        if s.faulty {
            return Err(ErrorKind::Other);
        }
        // A real UART would spin here
        assert!(s.room > 0, "write on a full transmit ring");
        let n = buf.len().min(s.room);
        s.wire.extend_from_slice(&buf[..n]);
        s.room -= n;
        Ok(n)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl WriteReady for Uart {
    fn write_ready(&mut self) -> Result<bool, Self::Error> {
        let s = self.state();
        if s.faulty {
            return Err(ErrorKind::Other);
        }
        Ok(s.room > 0)
    }
}

impl Read for Uart {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut s = self.state();
        let n = buf.len().min(s.inbound.len());
        for (slot, byte) in buf.iter_mut().zip(s.inbound.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

impl ReadReady for Uart {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.state().inbound.is_empty())
    }
}

// ============================================================================
// Transmit
// ============================================================================

#[test]
fn send_fits_in_ring() {
    let uart = Uart::with_room(64);
    let mut link = IoLink::new(uart.clone());
    assert_eq!(link.send(b"hello"), Ok(()));
    assert_eq!(uart.wire(), b"hello".to_vec());
    assert_eq!(link.backlog(), 0);
}

#[test]
fn full_ring_never_blocks() {
    let uart = Uart::with_room(100);
    let mut link = IoLink::new(uart.clone());
    let payload = vec![0xA5; MAX_PAYLOAD];

    assert_eq!(link.send(&payload), Ok(()));
    assert_eq!(uart.wire().len(), 100);
    assert_eq!(link.backlog(), MAX_PAYLOAD - 100);
}

#[test]
fn busy_until_backlog_drains() {
    let uart = Uart::with_room(4);
    let mut link = IoLink::new(uart.clone());
    assert_eq!(link.send(b"abcdefgh"), Ok(()));
    assert_eq!(link.send(b"next"), Err(PhyError::Busy));

    uart.state().room = 16;
    assert_eq!(link.poll(), Ok(()));
    assert_eq!(link.backlog(), 0);

    assert_eq!(link.send(b"next"), Ok(()));
    assert_eq!(uart.wire(), b"abcdefghnext".to_vec());
}

#[test]
fn oversized_payload_is_refused() {
    let uart = Uart::with_room(1024);
    let mut link = IoLink::new(uart.clone());
    assert_eq!(link.send(&vec![0u8; MAX_PAYLOAD + 1]), Err(PhyError::Busy));
    assert!(uart.wire().is_empty());
}

#[test]
fn channel_fault_is_io_error() {
    let uart = Uart::with_room(8);
    let mut link = IoLink::new(uart.clone());
    uart.state().faulty = true;
    assert_eq!(link.send(b"x"), Err(PhyError::Io));
    assert_eq!(link.poll(), Ok(()));

    // Only a pending backlog touches the channel on poll
    uart.state().faulty = false;
    uart.state().room = 1;
    assert_eq!(link.send(b"xy"), Ok(()));
    uart.state().faulty = true;
    assert_eq!(link.poll(), Err(PhyError::Io));
}

// ============================================================================
// Receive
// ============================================================================

#[test]
fn receive_copies_ready_bytes() {
    let uart = Uart::default();
    let mut link = IoLink::new(uart.clone());
    let mut buf = [0u8; RX_CHUNK_SIZE];
    assert_eq!(link.receive(&mut buf), 0);

    uart.state().inbound.extend(b"radio".iter().copied());
    assert_eq!(link.receive(&mut buf), 5);
    assert_eq!(&buf[..5], b"radio");
}

// ============================================================================
// Under a registry
// ============================================================================

type UartRadio = Registry<DirectHandler<LinkPort<IoLink<Uart>>>, IoLink<Uart>, 1>;

#[test]
fn tick_pushes_out_backlog() {
    let radio: &'static UartRadio = Box::leak(Box::new(UartRadio::new()));
    let mut ticks: TickTable = TickTable::rtc();
    let uart = Uart::with_room(4);
    let handle = radio
        .init(RadioConfig::default(), IoLink::new(uart.clone()), &mut ticks)
        .unwrap();
    let ctx = endpoint();
    radio.bind_tx_cb(handle, tx_source, ctx);

    queue_tx(ctx, b"abcdefgh");
    radio.tx_start(handle, 8);
    assert_eq!(uart.wire(), b"abcd".to_vec());

    uart.state().room = 64;
    ticks.fire();
    assert_eq!(uart.wire(), b"abcdefgh".to_vec());
}

#[test]
fn busy_link_drops_packet_without_blocking() {
    let radio: &'static UartRadio = Box::leak(Box::new(UartRadio::new()));
    let mut ticks: TickTable = TickTable::rtc();
    let uart = Uart::with_room(2);
    let handle = radio
        .init(RadioConfig::default(), IoLink::new(uart.clone()), &mut ticks)
        .unwrap();
    let ctx = endpoint();
    radio.bind_tx_cb(handle, tx_source, ctx);

    queue_tx(ctx, b"first");
    radio.tx_start(handle, 5);
    queue_tx(ctx, b"second");
    radio.tx_start(handle, 6);

    // The refused packet is consumed; the link keeps the first one going
    assert_eq!(radio.in_flight(handle), Some(false));
    uart.state().room = 64;
    ticks.fire();
    assert_eq!(uart.wire(), b"first".to_vec());
}
