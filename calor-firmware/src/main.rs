//! Calor - Soldering Station Firmware
//!
//! Main firmware binary for RP2040-based soldering stations: an NTC tip
//! sensor, a PWM-driven heater, a rotary encoder with push-button, an
//! SSD1306 OLED and a serial tuning console.
//!
//! Named after the Latin "calor" (heat).

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::{self, Pwm};
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUart, Config as UartConfig};
use embassy_time::{Duration, Instant, Ticker};
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use calor_core::traits::HeaterOutput;
use calor_core::Device;
use calor_drivers::heater::PwmHeater;
use calor_drivers::input::{ButtonTiming, ClickEncoder};
use calor_drivers::sensor::{Ntc100kSensor, NtcConfig};
use calor_hal_rp2040::flash::Rp2040FlashStorage;

use crate::channels::{send, take_input, Outgoing, COMMAND_CHANNEL};
use crate::display::Screen;
use crate::persistence::FlashSettings;
use crate::sensor::TipAdc;

mod channels;
mod display;
mod persistence;
mod sensor;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

/// Main loop period
const LOOP_INTERVAL_MS: u64 = 10;

/// PWM counter top: 125 MHz / 62_500 = 2 kHz heater switching
const PWM_TOP: u16 = 62_499;

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Calor firmware starting...");

    let p = embassy_rp::init(Default::default());

    // Serial console (115200 8N1)
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 64]);
    let uart = BufferedUart::new(
        p.UART0,
        p.PIN_0,
        p.PIN_1,
        Irqs,
        tx_buf,
        rx_buf,
        UartConfig::default(),
    );
    let (tx, rx) = uart.split();

    // Heater MOSFET gate on GPIO22 (PWM slice 3, channel A)
    let mut pwm_config = pwm::Config::default();
    pwm_config.top = PWM_TOP;
    let (heater_pwm, _) = Pwm::new_output_a(p.PWM_SLICE3, p.PIN_22, pwm_config).split();
    let mut heater = PwmHeater::new_active_high(unwrap!(heater_pwm));

    // Tip thermistor on GPIO26 (ADC0) with a 4.7K pull-up
    let adc = Adc::new_blocking(p.ADC, adc::Config::default());
    let channel = adc::Channel::new_pin(p.PIN_26, Pull::None);
    let mut sensor = Ntc100kSensor::new(TipAdc::new(adc, channel), NtcConfig::default());

    info!("ADC and heater initialized");

    // Encoder A/B on GPIO10/11, push-button on GPIO12 (active low)
    let encoder = ClickEncoder::new(
        Input::new(p.PIN_10, Pull::Up),
        Input::new(p.PIN_11, Pull::Up),
        Input::new(p.PIN_12, Pull::Up),
        ButtonTiming::default(),
    );

    // SSD1306 128x64 on I2C0 (SDA GPIO4, SCL GPIO5)
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c::Config::default());
    let mut display = Ssd1306::new(
        I2CDisplayInterface::new(i2c),
        DisplaySize128x64,
        DisplayRotation::Rotate0,
    )
    .into_buffered_graphics_mode();
    if let Err(e) = display.init() {
        error!("Display init failed: {:?}", Debug2Format(&e));
    }

    info!("Display initialized");

    let storage = FlashSettings::new(Rp2040FlashStorage::new(p.FLASH));
    let mut device = Device::boot(storage, now_ms());
    info!("Settings loaded, setpoint {}", device.control().setpoint());

    spawner.spawn(tasks::encoder_task(encoder)).unwrap();
    spawner.spawn(tasks::serial_rx_task(rx)).unwrap();
    spawner.spawn(tasks::serial_tx_task(tx)).unwrap();

    info!("All tasks spawned, firmware running");

    let mut ticker = Ticker::every(Duration::from_millis(LOOP_INTERVAL_MS));
    loop {
        let now = now_ms();

        while let Ok(command) = COMMAND_CHANNEL.try_receive() {
            let reply = device.handle_command(command, now);
            send(Outgoing::Reply(reply));
        }

        let tick = device.poll(now, take_input(), &mut sensor, &mut heater);
        if let Some(telemetry) = tick.telemetry {
            send(Outgoing::Telemetry(telemetry));
        }

        display.clear_buffer();
        if let Err(e) = device.view().render(&mut Screen::new(&mut display)) {
            warn!("Draw failed: {:?}", Debug2Format(&e));
        } else if let Err(e) = display.flush() {
            warn!("Display flush failed: {:?}", Debug2Format(&e));
        }

        if let Some(reason) = device.restart_due(now) {
            info!("Restarting: {:?}", reason);
            heater.off();
            cortex_m::peripheral::SCB::sys_reset();
        }

        ticker.next().await;
    }
}
