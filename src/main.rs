//! RFM22B Radio Link Application
//!
//! Runs the radio COM driver on an STM32G474 with the radio's byte
//! channel on USART1. Whatever arrives over the air is echoed back.

#![no_std]
#![no_main]

use core::cell::RefCell;

use critical_section::Mutex;
use defmt::{info, unwrap};
use embassy_executor::Spawner;
use embassy_stm32::usart::{BufferedUart, Config as UartConfig};
use embassy_stm32::{bind_interrupts, peripherals, usart};
use embassy_time::Timer;
use heapless::Deque;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use rfm22b_com::hal::ticker;
use rfm22b_com::prelude::*;

bind_interrupts!(struct Irqs {
    USART1 => usart::BufferedInterruptHandler<peripherals::USART1>;
});

/// Radio byte channel
type RadioLink = IoLink<BufferedUart<'static>>;

/// Device pool for the one radio on this board
type Radio = Registry<DirectHandler<LinkPort<RadioLink>>, RadioLink, 1>;

/// Loopback console size in bytes
const CONSOLE_SIZE: usize = 256;

static RADIO: Radio = Registry::new();
static TICKS: StaticCell<TickTable> = StaticCell::new();
static UART_TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static UART_RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Bytes received over the air, waiting to be sent back
static CONSOLE: Mutex<RefCell<Deque<u8, CONSOLE_SIZE>>> = Mutex::new(RefCell::new(Deque::new()));

/// Receive sink: queue everything for echo
fn console_rx(_context: usize, data: &[u8], _need_yield: &mut bool) -> usize {
    critical_section::with(|cs| {
        let mut console = CONSOLE.borrow_ref_mut(cs);
        data.iter().take_while(|&&b| console.push_back(b).is_ok()).count()
    })
}

/// Transmit source: hand queued bytes to the radio
fn console_tx(_context: usize, buf: &mut [u8], _need_yield: &mut bool) -> usize {
    critical_section::with(|cs| {
        let mut console = CONSOLE.borrow_ref_mut(cs);
        let mut n = 0;
        while n < buf.len() {
            let Some(b) = console.pop_front() else { break };
            buf[n] = b;
            n += 1;
        }
        n
    })
}

fn console_len() -> usize {
    critical_section::with(|cs| CONSOLE.borrow_ref(cs).len())
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("RFM22B link v{}", env!("CARGO_PKG_VERSION"));

    let p = embassy_stm32::init(embassy_stm32::Config::default());

    // PA10 = RX, PA9 = TX for USART1 on STM32G474
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = 57_600;
    let uart = unwrap!(BufferedUart::new(
        p.USART1,
        Irqs,
        p.PA10,
        p.PA9,
        UART_TX_BUF.init([0; 256]),
        UART_RX_BUF.init([0; 256]),
        uart_config,
    ));

    let ticks = TICKS.init(TickTable::rtc());
    let radio = unwrap!(RADIO.init(RadioConfig::default(), IoLink::new(uart), ticks));
    RADIO.bind_rx_cb(radio, console_rx, 0);
    RADIO.bind_tx_cb(radio, console_tx, 0);

    unwrap!(spawner.spawn(tick_task(ticks)));
    info!("Radio up, echoing");

    loop {
        let pending = console_len();
        if pending > 0 {
            RADIO.tx_start(radio, u16::try_from(pending).unwrap_or(u16::MAX));
        }
        Timer::after_millis(5).await;
    }
}

/// Tick task - drains the radio and enforces the send deadline
#[embassy_executor::task]
async fn tick_task(ticks: &'static TickTable) -> ! {
    ticker::run(ticks).await
}
