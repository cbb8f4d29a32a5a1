//! The hardware session: SPI0 shifts the bits, TCB2 shapes the 0-bit
//! pulse, the CCL puts the combined waveform on the pin.

use avr_device::atmega4809::{CCL, PORTMUX, SPI0, TCB2};
use core::convert::Infallible;
use embedded_hal::delay::DelayNs;
use rgb::RGB8;
use smart_leds_trait::SmartLedsWrite;

use crate::lut::{BRIDGE_TRUTH, WAVEFORM_TRUTH};
use crate::timing::{self, ConfigError, LATCH_US, Timing};

/// SPI0.CTRLB MODE field code for SPI mode 1: the clock idles low and the
/// trailing-edge sample point lines the clock edges up with the timer
/// pulse.
const SPI_MODE_1: u8 = 0x01;
/// TCB CTRLB CNTMODE field code for 8-bit PWM.
const TCB_CNTMODE_PWM8: u8 = 0x07;
/// SPI0.INTFLAGS receive-complete flag.
const SPI_RXC_BM: u8 = 0x80;

// CCL LUTnCTRLB/LUTnCTRLC input selector codes.
const INSEL_MASK: u8 = 0x00;
const INSEL_LINK: u8 = 0x02;
const INSEL_SPI0: u8 = 0x09;
const INSEL_TCB2: u8 = 0x0c;

/// Default timer preload, in ticks before counter wrap.
///
/// Compensates the propagation skew between TCB2 and the SPI clock so the
/// pulse edges meet the serial bit's sample points. Tuned against a scope
/// on a Nano Every; other boards or clocks need their own value via
/// [`Config::tweak`].
pub const DEFAULT_TWEAK: i8 = -9;

/// Wire byte order for one pixel: the WS2812 expects green first, then
/// red, then blue, whatever order the API takes its arguments in.
pub fn wire_bytes(pixel: RGB8) -> [u8; 3] {
    [pixel.g, pixel.r, pixel.b]
}

/// Calibration inputs the driver cannot learn on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Peripheral clock in Hz, as left by the board's clock setup.
    pub sys_clock_hz: u32,
    /// Timer preload in ticks; negative values start the counter shortly
    /// before wrap, shifting the pulse against the serial clock.
    pub tweak: i8,
}

impl Config {
    pub fn new(sys_clock_hz: u32) -> Self {
        Self {
            sys_clock_hz,
            tweak: DEFAULT_TWEAK,
        }
    }
}

/// Driver for a chain of WS2812-family devices, owning SPI0, TCB2 and the
/// CCL for the rest of the program.
///
/// Constructing it configures all three peripherals; there is no teardown.
/// `Peripherals::take()` hands the register blocks out only once, so a
/// second driver instance cannot exist to reconfigure them.
pub struct Ws2812<D> {
    spi: SPI0,
    timer: TCB2,
    ccl: CCL,
    delay: D,
    timing: Timing,
    tweak: u16,
}

impl<D: DelayNs> Ws2812<D> {
    /// Set up the shifter, the pulse timer and the combiner, in that
    /// order; the combiner only gates signals the other two produce.
    ///
    /// Fails if no SPI prescaler reaches the wire bit period from
    /// `config.sys_clock_hz`; see [`timing::derive`].
    pub fn new(
        spi: SPI0,
        timer: TCB2,
        ccl: CCL,
        portmux: &PORTMUX,
        delay: D,
        config: Config,
    ) -> Result<Self, ConfigError> {
        let timing = timing::derive(config.sys_clock_hz)?;
        let this = Self {
            spi,
            timer,
            ccl,
            delay,
            timing,
            tweak: config.tweak as i16 as u16,
        };
        this.configure_shifter();
        this.configure_timer();
        this.configure_combiner(portmux);
        Ok(this)
    }

    /// Master mode, MSB first, mode 1, slave select disabled: a
    /// point-to-point transmit-only link at one serial bit per wire bit.
    /// The MOSI and SCK signals never leave the chip; the CCL taps them
    /// internally, so no pin setup is needed here.
    fn configure_shifter(&self) {
        self.spi.ctrla.write(|w| {
            unsafe { w.presc().bits(self.timing.prescaler.field_code()) };
            w.dord().clear_bit().master().set_bit().enable().set_bit()
        });
        self.spi.ctrlb.write(|w| {
            unsafe { w.mode().bits(SPI_MODE_1) };
            w.ssd().set_bit()
        });
    }

    /// 8-bit PWM on the undivided clock: the low compare spans one serial
    /// bit, the high compare opens the 0-bit pulse. Left stopped; armed
    /// and stopped around each byte.
    fn configure_timer(&self) {
        self.timer
            .ctrlb
            .write(|w| unsafe { w.cntmode().bits(TCB_CNTMODE_PWM8) });
        self.timer.ccmp.write(|w| unsafe { w.bits(self.timing.ccmp) });
    }

    fn configure_combiner(&self, portmux: &PORTMUX) {
        // LUT1's alternate output is PC6, D4 on the Nano Every.
        portmux.cclroutea.modify(|_, w| w.lut1().set_bit());

        // Bridge cell: TCB2 reaches a cell only through input 2, and
        // LUT1's input 2 carries the serial clock, so LUT2 forwards the
        // pulse. Its masked inputs read as zero and its output is not
        // pinned out; LUT1 picks it up over the link input.
        self.ccl.lut2ctrlb.write(|w| {
            unsafe { w.insel0().bits(INSEL_MASK) };
            unsafe { w.insel1().bits(INSEL_MASK) }
        });
        self.ccl
            .lut2ctrlc
            .write(|w| unsafe { w.insel2().bits(INSEL_TCB2) });
        self.ccl.truth2.write(|w| unsafe { w.bits(BRIDGE_TRUTH) });
        self.ccl.lut2ctrla.write(|w| w.enable().set_bit());

        // Waveform cell: in0 = bridged pulse, in1 = serial data,
        // in2 = serial clock.
        self.ccl.lut1ctrlb.write(|w| {
            unsafe { w.insel0().bits(INSEL_LINK) };
            unsafe { w.insel1().bits(INSEL_SPI0) }
        });
        self.ccl
            .lut1ctrlc
            .write(|w| unsafe { w.insel2().bits(INSEL_SPI0) });
        self.ccl.truth1.write(|w| unsafe { w.bits(WAVEFORM_TRUTH) });
        self.ccl
            .lut1ctrla
            .write(|w| w.outen().set_bit().enable().set_bit());

        // RUNSTDBY keeps the combiner clocked if the busy-wait below ever
        // idles the core.
        self.ccl
            .ctrla
            .write(|w| w.runstdby().set_bit().enable().set_bit());
    }

    /// Shift one byte while the timer shapes the 0-bit pulses.
    ///
    /// Blocking: the wire needs back-to-back bits, so this must not be
    /// preempted mid-byte.
    fn transfer(&mut self, byte: u8) {
        // A stale write-collision flag would lock the data register;
        // clear whatever is pending rather than inspect it.
        let stale = self.spi.intflags.read().bits();
        self.spi.intflags.write(|w| unsafe { w.bits(stale) });

        // The preload positions the first pulse edge against the first
        // serial clock edge, then the timer free-runs at the bit rate.
        self.timer.cnt.write(|w| unsafe { w.bits(self.tweak) });
        self.timer.ctrla.write(|w| w.enable().set_bit());

        self.spi.data.write(|w| unsafe { w.bits(byte) });
        // Receive-complete doubles as transmit-complete: nothing is
        // attached, but the shift register clocks in as it clocks out.
        while self.spi.intflags.read().bits() & SPI_RXC_BM == 0 {}

        self.timer.ctrla.write(|w| w.enable().clear_bit());
    }

    fn transmit(&mut self, pixel: RGB8) {
        for byte in wire_bytes(pixel) {
            self.transfer(byte);
        }
    }

    /// Transmit one pixel immediately, green byte first.
    pub fn write_rgb(&mut self, red: u8, green: u8, blue: u8) {
        self.transmit(RGB8::new(red, green, blue));
    }

    /// Transmit a whole frame, then latch it.
    ///
    /// Interrupts stay off for the duration: a gap longer than the reset
    /// threshold anywhere in the byte stream would terminate the frame
    /// early. The latch delay runs with interrupts back on and has fully
    /// elapsed by the time this returns, so frames can be written back to
    /// back.
    pub fn write_all(&mut self, pixels: &[RGB8]) {
        {
            let _quiet = IrqOffGuard::enter();
            for pixel in pixels {
                self.transmit(*pixel);
            }
        }
        self.delay.delay_us(LATCH_US);
    }

    /// The derived peripheral timing, for inspection against a scope.
    pub fn timing(&self) -> Timing {
        self.timing
    }
}

impl<D: DelayNs> SmartLedsWrite for Ws2812<D> {
    type Error = Infallible;
    type Color = RGB8;

    /// Write all the items of an iterator to the strip, then latch.
    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        let quiet = IrqOffGuard::enter();
        for item in iterator {
            self.transmit(item.into());
        }
        drop(quiet);
        self.delay.delay_us(LATCH_US);
        Ok(())
    }
}

/// Interrupts disabled for the guard's lifetime, re-enabled on drop on
/// every exit path.
struct IrqOffGuard(());

impl IrqOffGuard {
    fn enter() -> Self {
        avr_device::interrupt::disable();
        Self(())
    }
}

impl Drop for IrqOffGuard {
    fn drop(&mut self) {
        // The frame write is the driver's only critical section and never
        // nests, so an unconditional re-enable is correct here.
        unsafe { avr_device::interrupt::enable() };
    }
}
