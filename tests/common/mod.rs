//! Shared test doubles for the radio driver tests
//!
//! Callbacks are plain `fn` pointers with an opaque context, so test
//! endpoints live in a global table and the context is their index.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rfm22b_com::prelude::*;
use rfm22b_com::transport::PacketHandlerConfig;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Physical link
// ============================================================================

/// What the mock radio saw
#[derive(Default)]
pub struct PhyState {
    /// Bytes waiting to be received
    pub inbound: VecDeque<u8>,
    /// Payloads accepted by `send`, in order
    pub sent: Vec<Vec<u8>>,
    /// Packet types the transport queued, in order
    pub types: Vec<PacketType>,
    /// Send-hook results reported back to the transport
    pub outcomes: Vec<bool>,
    /// Number of `receive` calls
    pub reads: usize,
    /// Reject every send
    pub fail_sends: bool,
}

/// Mock physical link sharing its state with the test
#[derive(Clone, Default)]
pub struct MockPhy(Arc<Mutex<PhyState>>);

impl MockPhy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&self, bytes: &[u8]) {
        lock(&self.0).inbound.extend(bytes.iter().copied());
    }

    pub fn fail_sends(&self, fail: bool) {
        lock(&self.0).fail_sends = fail;
    }

    pub fn sent(&self) -> Vec<Vec<u8>> {
        lock(&self.0).sent.clone()
    }

    pub fn sent_bytes(&self) -> Vec<u8> {
        lock(&self.0).sent.concat()
    }

    pub fn types(&self) -> Vec<PacketType> {
        lock(&self.0).types.clone()
    }

    pub fn outcomes(&self) -> Vec<bool> {
        lock(&self.0).outcomes.clone()
    }

    pub fn inbound_len(&self) -> usize {
        lock(&self.0).inbound.len()
    }

    pub fn reads(&self) -> usize {
        lock(&self.0).reads
    }

    fn record(&self, packet_type: PacketType, ok: bool) {
        let mut state = lock(&self.0);
        state.types.push(packet_type);
        state.outcomes.push(ok);
    }
}

impl PhyLink for MockPhy {
    fn send(&mut self, data: &[u8]) -> Result<(), PhyError> {
        let mut state = lock(&self.0);
        if state.fail_sends {
            return Err(PhyError::Io);
        }
        state.sent.push(data.to_vec());
        Ok(())
    }

    fn receive(&mut self, buf: &mut [u8]) -> usize {
        let mut state = lock(&self.0);
        state.reads += 1;
        let n = buf.len().min(state.inbound.len());
        for (slot, byte) in buf.iter_mut().zip(state.inbound.drain(..n)) {
            *slot = byte;
        }
        n
    }
}

// ============================================================================
// Packet transport
// ============================================================================

/// Transport that leases `tx_win_size` packets in total and then reports
/// exhaustion. Every transmit goes straight to the send hook and the
/// result is recorded on the link.
pub struct ScriptedHandler {
    config: PacketHandlerConfig<LinkPort<MockPhy>>,
    leases_left: u8,
}

impl PacketHandler<LinkPort<MockPhy>> for ScriptedHandler {
    fn initialize(config: PacketHandlerConfig<LinkPort<MockPhy>>) -> Self {
        Self {
            config,
            leases_left: config.tx_win_size,
        }
    }

    fn get_tx_packet(&mut self) -> Option<Packet> {
        if self.leases_left == 0 {
            return None;
        }
        self.leases_left -= 1;
        Some(Packet::new())
    }

    fn transmit_packet(&mut self, link: &mut LinkPort<MockPhy>, packet: Packet) {
        let ok = (self.config.output_stream)(link, &packet);
        link.phy().record(packet.packet_type(), ok);
    }

    fn receive_packet(&mut self, link: &mut LinkPort<MockPhy>, packet: &Packet) {
        (self.config.data_handler)(link, packet.payload());
    }
}

pub type TestRadio = Registry<ScriptedHandler, MockPhy, 2>;

/// A fresh pool with a `'static` lifetime
pub fn radio() -> &'static TestRadio {
    Box::leak(Box::new(TestRadio::new()))
}

/// Configuration with a plentiful lease budget
pub fn config(min_packet_size: u16) -> RadioConfig {
    RadioConfig::new(100, min_packet_size, u8::MAX, 1, 0xCAFE)
}

/// Tick source that refuses every subscription
pub struct RefusingTicks;

impl TickSource for RefusingTicks {
    fn period(&self) -> TickPeriod {
        TickPeriod::RTC
    }

    fn register(&mut self, _: &'static dyn TickHandler, _: u32) -> Result<(), TickError> {
        Err(TickError::TableFull)
    }
}

// ============================================================================
// COM endpoints
// ============================================================================

/// Caller-side buffers reached through a callback context
#[derive(Default)]
pub struct Endpoint {
    /// Bytes the transmit callback hands out
    pub outbound: VecDeque<u8>,
    /// Bytes the receive callback got, in order
    pub received: Vec<u8>,
    /// Length of each receive callback invocation
    pub rx_calls: Vec<usize>,
    /// Number of transmit callback invocations
    pub pulls: usize,
    /// Cap on bytes handed out per pull
    pub max_chunk: Option<usize>,
    /// Ask for a yield on every receive
    pub yield_on_rx: bool,
}

static ENDPOINTS: Mutex<Vec<Endpoint>> = Mutex::new(Vec::new());

/// Allocate an endpoint and return its context
pub fn endpoint() -> usize {
    let mut eps = lock(&ENDPOINTS);
    eps.push(Endpoint::default());
    eps.len() - 1
}

pub fn with_endpoint<R>(context: usize, f: impl FnOnce(&mut Endpoint) -> R) -> R {
    f(&mut lock(&ENDPOINTS)[context])
}

pub fn queue_tx(context: usize, bytes: &[u8]) {
    with_endpoint(context, |ep| ep.outbound.extend(bytes.iter().copied()));
}

pub fn received(context: usize) -> Vec<u8> {
    with_endpoint(context, |ep| ep.received.clone())
}

pub fn rx_calls(context: usize) -> Vec<usize> {
    with_endpoint(context, |ep| ep.rx_calls.clone())
}

pub fn pulls(context: usize) -> usize {
    with_endpoint(context, |ep| ep.pulls)
}

pub fn outbound_len(context: usize) -> usize {
    with_endpoint(context, |ep| ep.outbound.len())
}

/// Transmit callback
pub fn tx_source(context: usize, buf: &mut [u8], _need_yield: &mut bool) -> usize {
    with_endpoint(context, |ep| {
        ep.pulls += 1;
        let cap = ep.max_chunk.unwrap_or(usize::MAX);
        let n = buf.len().min(cap).min(ep.outbound.len());
        for (slot, byte) in buf.iter_mut().zip(ep.outbound.drain(..n)) {
            *slot = byte;
        }
        n
    })
}

/// Receive callback
pub fn rx_sink(context: usize, data: &[u8], need_yield: &mut bool) -> usize {
    with_endpoint(context, |ep| {
        ep.received.extend_from_slice(data);
        ep.rx_calls.push(data.len());
        if ep.yield_on_rx {
            *need_yield = true;
        }
        data.len()
    })
}
