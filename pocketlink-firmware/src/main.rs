//! Pocketlink Firmware
//!
//! Device side of the pocketlink serial link (STM32F042K6).
//!
//! Two executors share one receive queue:
//! - `uart_rx_task` runs on an interrupt executor above thread mode and only
//!   moves bytes from the USART1 DMA ring into `RX_QUEUE`, so reception keeps
//!   up while a handler or a reply write is in progress
//! - `link_task` runs in thread mode, drains the queue on a fixed tick, parses
//!   frames and runs the feature handlers, which reply over the blocking USART
//!   transmitter

#![no_std]
#![no_main]

mod stubs;

use cortex_m_rt::entry;
use defmt::*;
use embassy_executor::{Executor, InterruptExecutor};
use embassy_stm32::bind_interrupts;
use embassy_stm32::interrupt;
use embassy_stm32::interrupt::{InterruptExt, Priority};
use embassy_stm32::mode::Async;
use embassy_stm32::peripherals::USART1;
use embassy_stm32::usart::{self, RingBufferedUartRx, Uart};
use embassy_time::{Duration, Ticker};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use pocketlink_core::handlers::FeatureHandlers;
use pocketlink_hal::UartConfig;
use pocketlink_hal_stm32f0::{usart_config, Stm32UartTx};
use pocketlink_protocol::{LinkLayer, SharedRingBuffer, UartFrameSink, DEFAULT_CAPACITY};

use crate::stubs::{LoggingIButton, LoggingIr, LoggingNfc};

bind_interrupts!(struct Irqs {
    USART1 => usart::InterruptHandler<USART1>;
});

type Handlers = FeatureHandlers<LoggingIr, LoggingNfc, LoggingIButton>;

/// Bytes received but not yet parsed
static RX_QUEUE: SharedRingBuffer<DEFAULT_CAPACITY> = SharedRingBuffer::new();

static HANDLERS: StaticCell<Handlers> = StaticCell::new();

/// Circular DMA target for USART1 RX
static RX_DMA_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// Receive side, preempts thread mode
static EXECUTOR_RX: InterruptExecutor = InterruptExecutor::new();

/// Link side, thread mode
static EXECUTOR_LINK: StaticCell<Executor> = StaticCell::new();

/// How often the link task drains the receive queue
const POLL_INTERVAL_MS: u64 = 5;

// USART2 is not wired on this board; its vector drives the RX executor
#[interrupt]
unsafe fn USART2() {
    unsafe { EXECUTOR_RX.on_interrupt() }
}

#[entry]
fn main() -> ! {
    info!("Pocketlink firmware starting...");

    let p = embassy_stm32::init(Default::default());

    // USART1: PA9=TX, PA10=RX
    let link_config = UartConfig::LINK_DEFAULT;
    let uart_config = usart_config(&link_config);

    let uart = Uart::new(
        p.USART1,
        p.PA10, // RX
        p.PA9,  // TX
        Irqs,
        p.DMA1_CH2,
        p.DMA1_CH3,
        uart_config,
    )
    .unwrap();

    let (tx, rx) = uart.split();
    let rx = rx.into_ring_buffered(RX_DMA_BUF.init([0; 64]));

    let handlers = HANDLERS.init(FeatureHandlers::new(
        LoggingIr::new(),
        LoggingNfc::new(),
        LoggingIButton,
    ));

    interrupt::USART2.set_priority(Priority::P1);
    let rx_spawner = EXECUTOR_RX.start(interrupt::USART2);
    rx_spawner.spawn(uart_rx_task(rx)).unwrap();

    info!("RX executor started, {} baud", link_config.baudrate);

    let executor = EXECUTOR_LINK.init(Executor::new());
    executor.run(|spawner| {
        spawner
            .spawn(link_task(handlers, Stm32UartTx::new(tx)))
            .unwrap();
    })
}

/// UART receive task - producer side of `RX_QUEUE`
#[embassy_executor::task]
async fn uart_rx_task(mut rx: RingBufferedUartRx<'static>) {
    info!("UART RX task started");

    let mut buf = [0u8; 16];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) => {
                let stored = RX_QUEUE.write(&buf[..n]);
                if stored < n {
                    trace!("RX queue full, dropped {} bytes", n - stored);
                }
            }
            // The DMA ring restarts on the next read
            Err(e) => warn!("UART read error: {:?}", e),
        }
    }
}

/// Link task - consumer side of `RX_QUEUE`, owns parser, registry and TX
#[embassy_executor::task]
async fn link_task(handlers: &'static mut Handlers, tx: Stm32UartTx<'static, Async>) {
    let mut link: LinkLayer<'static> = LinkLayer::new();
    if let Err(e) = handlers.register_all(&mut link) {
        error!("Command registration failed: {:?}", e);
        return;
    }
    info!("Link ready, {} commands registered", link.registry().len());

    let mut sink = UartFrameSink::new(tx);
    let mut ticker = Ticker::every(Duration::from_millis(POLL_INTERVAL_MS));

    loop {
        ticker.next().await;

        let report = link.process(&mut &RX_QUEUE, &mut sink);
        if report.dropped() > 0 {
            warn!(
                "Dropped {} frames ({} bad length, {} bad CRC)",
                report.dropped(),
                report.length_errors,
                report.crc_errors
            );
        }
        if report.unknown > 0 {
            debug!("Answered {} unknown commands", report.unknown);
        }
    }
}
