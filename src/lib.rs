//! Use WS2812 LEDs (aka Neopixel) with the ATmega4809 SPI, TCB and CCL
//! peripherals.
//!
//! This crate is intended for usage with the `smart-leds`
//! crate: it implements the `SmartLedsWrite` trait.
//!
//! No CPU cycles are spent bit-banging the wire protocol. SPI0 shifts the
//! color bits MSB first, TCB2 emits one short pulse per serial bit, and two
//! CCL lookup tables combine clock, data and pulse into the WS2812 waveform
//! on pin PC6 (D4 on the Arduino Nano Every). Software only feeds the SPI
//! data register one byte at a time; the waveform itself is produced
//! entirely in hardware.
//!
//! The stock 16 MHz core clock cannot be divided down to the 1.25 µs bit
//! period. Slow the main clock to about 12 MHz before constructing the
//! driver and report the resulting frequency through [`Config`]; the driver
//! derives its dividers from that and refuses clocks it cannot serve.
//!
//! Based on the Elektor core-independent WS2812B driver for the Arduino
//! Nano Every.

#![no_std]

pub mod lut;
pub mod timing;

mod driver;

pub use driver::{Config, DEFAULT_TWEAK, Ws2812, wire_bytes};
pub use rgb::RGB8;
pub use timing::{ConfigError, Timing};
