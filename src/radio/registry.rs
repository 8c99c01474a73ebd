//! Device Registry
//!
//! A fixed-capacity pool of radio devices shared between caller-driven
//! COM entry points and the periodic tick.
//!
//! Each slot sits behind a `critical_section::Mutex`, so a tick can never
//! observe a device half way through a transmit or a callback rebind.
//! Slots are filled once and never freed; radios live for the life of the
//! firmware.

use core::cell::{Cell, RefCell};

use critical_section::{CriticalSection, Mutex};

use super::adapter::LinkPort;
use super::device::Device;
use crate::com::{Binding, ComDriver, RxCallback, TxCallback};
use crate::config::{RadioConfig, MAX_DEVICES};
use crate::phy::PhyLink;
use crate::tick::{TickHandler, TickSource};
use crate::transport::{Packet, PacketHandler};
use crate::types::{Countdown, DeviceHandle};

/// Device allocation failure
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InitError {
    /// Every pool slot is taken
    #[error("radio device pool exhausted")]
    OutOfDevices,
}

#[cfg(feature = "embedded")]
impl defmt::Format for InitError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::OutOfDevices => defmt::write!(f, "OutOfDevices"),
        }
    }
}

type Slot<H, P> = Mutex<RefCell<Option<Device<H, P>>>>;

/// Bounded pool of radio devices.
///
/// `H` is the packet transport and `P` the physical link of each device.
/// A registry is normally a `static`; [`init`](Self::init) needs a
/// `'static` borrow so it can subscribe itself to the tick source.
pub struct Registry<H, P, const N: usize = MAX_DEVICES> {
    slots: [Slot<H, P>; N],
    allocated: Mutex<Cell<usize>>,
}

impl<H, P, const N: usize> Registry<H, P, N> {
    /// Create an empty pool
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [const { Mutex::new(RefCell::new(None)) }; N],
            allocated: Mutex::new(Cell::new(0)),
        }
    }

    /// Number of pool slots
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of devices allocated so far
    #[must_use]
    pub fn allocated(&self) -> usize {
        critical_section::with(|cs| self.allocated.borrow(cs).get())
    }
}

impl<H, P, const N: usize> Default for Registry<H, P, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H, P, const N: usize> Registry<H, P, N>
where
    H: PacketHandler<LinkPort<P>> + Send + 'static,
    P: PhyLink + Send + 'static,
{
    /// Allocate and initialize a radio device.
    ///
    /// Builds the transport instance, arms the flush countdown from the
    /// tick source's period and subscribes the device to that source.
    ///
    /// # Errors
    ///
    /// Returns [`InitError::OutOfDevices`] when the pool is full. Already
    /// allocated devices are left untouched.
    ///
    /// # Panics
    ///
    /// Panics if the tick source refuses the subscription; a radio without
    /// its timing source must not run.
    pub fn init<T: TickSource>(
        &'static self,
        config: RadioConfig,
        phy: P,
        ticks: &mut T,
    ) -> Result<DeviceHandle, InitError> {
        let device = Device::new(config, ticks.period(), phy);
        let reload = device.countdown().reload();
        let handle = critical_section::with(|cs| self.allocate(cs, device))?;

        let registered = ticks.register(self, handle.into_raw()).is_ok();
        assert!(registered, "tick subscription refused for {:?}", handle);

        info!(
            "radio {} initialized as {:?}, flush every {} ticks",
            config.id,
            handle,
            reload
        );
        Ok(handle)
    }

    fn allocate(
        &self,
        cs: CriticalSection<'_>,
        device: Device<H, P>,
    ) -> Result<DeviceHandle, InitError> {
        let count = self.allocated.borrow(cs);
        let index = count.get();
        let Some(slot) = self.slots.get(index) else {
            return Err(InitError::OutOfDevices);
        };
        *slot.borrow_ref_mut(cs) = Some(device);
        count.set(index + 1);
        Ok(DeviceHandle::from_index(index))
    }

    /// Check that `handle` names a live device
    #[must_use]
    pub fn validate(&self, handle: DeviceHandle) -> bool {
        critical_section::with(|cs| self.is_live(cs, handle))
    }

    fn is_live(&self, cs: CriticalSection<'_>, handle: DeviceHandle) -> bool {
        self.slots
            .get(handle.index())
            .is_some_and(|slot| slot.borrow_ref(cs).as_ref().is_some_and(Device::is_live))
    }

    /// Run `f` on the device inside a critical section. `None` if the
    /// handle is not live, in which case nothing is touched.
    fn with_device<R>(
        &self,
        handle: DeviceHandle,
        f: impl FnOnce(&mut Device<H, P>) -> R,
    ) -> Option<R> {
        critical_section::with(|cs| {
            if !self.is_live(cs, handle) {
                return None;
            }
            let mut slot = self.slots[handle.index()].borrow_ref_mut(cs);
            slot.as_mut().map(f)
        })
    }

    /// Like [`with_device`](Self::with_device) but an invalid handle is
    /// fatal. The assertion fires outside the critical section.
    fn dispatch<R>(&self, handle: DeviceHandle, f: impl FnOnce(&mut Device<H, P>) -> R) -> Option<R> {
        let result = self.with_device(handle, f);
        assert!(result.is_some(), "invalid radio device handle {:?}", handle);
        result
    }

    /// Feed a packet received from the link through the device's
    /// transport. Returns whether a yield was requested.
    ///
    /// # Panics
    ///
    /// Panics if `handle` does not name a live device.
    pub fn receive_packet(&self, handle: DeviceHandle, packet: &Packet) -> bool {
        self.dispatch(handle, |dev| dev.receive_packet(packet))
            .unwrap_or(false)
    }

    /// Current flush countdown of a device
    #[must_use]
    pub fn countdown(&self, handle: DeviceHandle) -> Option<Countdown> {
        self.with_device(handle, |dev| dev.countdown())
    }

    /// Bytes held in a device's in-flight packet
    #[must_use]
    pub fn pending_len(&self, handle: DeviceHandle) -> Option<usize> {
        self.with_device(handle, |dev| dev.pending_len())
    }

    /// Whether a device holds a packet waiting for the threshold or the
    /// deadline, even an empty one
    #[must_use]
    pub fn in_flight(&self, handle: DeviceHandle) -> Option<bool> {
        self.with_device(handle, |dev| dev.has_in_flight())
    }

    /// Configuration a device was initialized with
    #[must_use]
    pub fn config(&self, handle: DeviceHandle) -> Option<RadioConfig> {
        self.with_device(handle, |dev| *dev.config())
    }
}

impl<H, P, const N: usize> ComDriver for Registry<H, P, N>
where
    H: PacketHandler<LinkPort<P>> + Send + 'static,
    P: PhyLink + Send + 'static,
{
    fn set_baud(&self, handle: DeviceHandle, baud: u32) {
        self.dispatch(handle, |_| {
            debug!("radio {:?}: baud change to {} ignored", handle, baud);
        });
    }

    fn tx_start(&self, handle: DeviceHandle, _tx_bytes_avail: u16) {
        self.dispatch(handle, Device::tx_start);
    }

    fn rx_start(&self, handle: DeviceHandle, _rx_bytes_avail: u16) {
        self.dispatch(handle, |_| ());
    }

    fn bind_rx_cb(&self, handle: DeviceHandle, callback: RxCallback, context: usize) {
        self.dispatch(handle, |dev| dev.bind_rx(Binding::new(callback, context)));
    }

    fn bind_tx_cb(&self, handle: DeviceHandle, callback: TxCallback, context: usize) {
        self.dispatch(handle, |dev| dev.bind_tx(Binding::new(callback, context)));
    }
}

impl<H, P, const N: usize> TickHandler for Registry<H, P, N>
where
    H: PacketHandler<LinkPort<P>> + Send + 'static,
    P: PhyLink + Send + 'static,
{
    fn on_tick(&self, context: u32) -> bool {
        let handle = DeviceHandle::from_raw(context);
        self.with_device(handle, Device::on_tick).unwrap_or_else(|| {
            warn!("tick for invalid radio context {}", context);
            false
        })
    }
}
