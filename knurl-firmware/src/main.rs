//! Knurl - CNC pendant firmware
//!
//! Firmware binary for RP2040-based pendant boards: a touch dial, a
//! handwheel encoder, and three buttons, talking to a FluidNC/Grbl-class
//! motion controller over UART.
//!
//! Named after the knurled grip machined into the rim of a handwheel,
//! the part of the machine the operator actually touches.

#![no_std]
#![no_main]

use defmt::info;
use display_interface_spi::SPIInterface;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::flash::Flash;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C1, UART0};
use embassy_rp::spi::{self, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;
use mipidsi::models::ST7789;
use mipidsi::options::{ColorInversion, Orientation};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use crate::prefs::{load_prefs, FLASH_SIZE};

mod channels;
mod prefs;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    I2C1_IRQ => i2c::InterruptHandler<I2C1>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Knurl firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Controller link on UART0 (GPIO0 TX, GPIO1 RX), 115200 8N1
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = 115_200;
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("Controller UART initialized");

    // Preference store in the reserved flash region
    let mut flash = Flash::<_, _, FLASH_SIZE>::new(p.FLASH, p.DMA_CH0);
    let prefs = load_prefs(&mut flash).await;

    // Touch controller on I2C1 (GPIO2 SDA, GPIO3 SCL)
    let touch_i2c = I2c::new_async(p.I2C1, p.PIN_3, p.PIN_2, Irqs, i2c::Config::default());

    // Handwheel encoder and buttons, all active low with pullups
    let encoder_a = Input::new(p.PIN_6, Pull::Up);
    let encoder_b = Input::new(p.PIN_7, Pull::Up);
    let button_minus = Input::new(p.PIN_8, Pull::Up);
    let button_plus = Input::new(p.PIN_9, Pull::Up);
    let button_dial = Input::new(p.PIN_10, Pull::Up);

    // ST7789 panel on SPI0 (GPIO18 SCK, GPIO19 MOSI), CS 17, DC 16, RST 20
    let mut spi_config = spi::Config::default();
    spi_config.frequency = 62_500_000;
    let panel_spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, spi_config);
    let panel_cs = Output::new(p.PIN_17, Level::High);
    let panel_dc = Output::new(p.PIN_16, Level::Low);
    let panel_rst = Output::new(p.PIN_20, Level::High);
    let panel_bus = ExclusiveDevice::new(panel_spi, panel_cs, Delay).unwrap();
    let display = mipidsi::Builder::new(ST7789, SPIInterface::new(panel_bus, panel_dc))
        .reset_pin(panel_rst)
        .display_size(240, 320)
        .invert_colors(ColorInversion::Inverted)
        .orientation(Orientation::default())
        .init(&mut Delay)
        .unwrap();
    let _backlight = Output::new(p.PIN_15, Level::High);
    info!("Panel initialized");

    // Spawn tasks
    spawner.spawn(tasks::link_rx_task(rx)).unwrap();
    spawner.spawn(tasks::link_tx_task(tx)).unwrap();
    spawner.spawn(tasks::status_poll_task()).unwrap();
    spawner.spawn(tasks::touch_task(touch_i2c)).unwrap();
    spawner.spawn(tasks::encoder_task(encoder_a, encoder_b)).unwrap();
    spawner
        .spawn(tasks::button_task(button_minus, button_plus, button_dial))
        .unwrap();
    spawner.spawn(prefs::pref_flush_task(flash)).unwrap();
    spawner.spawn(tasks::dispatch_task(prefs, display)).unwrap();

    info!("All tasks spawned, firmware running");

    // Keep the backlight pin alive; nothing else happens here
    loop {
        embassy_time::Timer::after_secs(60).await;
    }
}
