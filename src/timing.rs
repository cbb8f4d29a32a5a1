//! WS2812 wire timing and its mapping onto the SPI and TCB clocks.
//!
//! One serial bit is one wire bit: the SPI prescaler must bring the bit
//! period close to the nominal 1.25 µs, and the timer compare value must
//! carve a short high pulse out of each bit for the 0-bits. Both are fixed
//! at construction time, so a clock they cannot be derived from is rejected
//! there; afterwards nothing can fail.

/// WS2812 nominal bit period in ns.
pub const BIT_PERIOD_NS: u32 = 1250;
/// Tolerated deviation from the nominal bit period in ns.
pub const BIT_PERIOD_SLACK_NS: u32 = 150;
/// WS2812 0-bit nominal high time in ns.
pub const T0H_NS: u32 = 400;
/// WS2812 1-bit nominal high time in ns.
pub const T1H_NS: u32 = 850;
/// Shortest high pulse the pixels still latch, in ns.
pub const T0H_MIN_NS: u32 = 220;
/// Longest high pulse still read as a 0-bit rather than a 1-bit, in ns.
pub const T0H_MAX_NS: u32 = 500;
/// Frame latch idle time in µs (datasheet minimum is 50, doubled for slop).
pub const LATCH_US: u32 = 100;

/// SPI clock prescalers available on the megaAVR SPI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prescaler {
    Div4,
    Div16,
    Div64,
    Div128,
}

impl Prescaler {
    const ALL: [Prescaler; 4] = [
        Prescaler::Div4,
        Prescaler::Div16,
        Prescaler::Div64,
        Prescaler::Div128,
    ];

    /// Division factor applied to the peripheral clock.
    pub fn divisor(self) -> u32 {
        match self {
            Prescaler::Div4 => 4,
            Prescaler::Div16 => 16,
            Prescaler::Div64 => 64,
            Prescaler::Div128 => 128,
        }
    }

    /// Code for the PRESC field of SPI0.CTRLA.
    pub(crate) fn field_code(self) -> u8 {
        match self {
            Prescaler::Div4 => 0x0,
            Prescaler::Div16 => 0x1,
            Prescaler::Div64 => 0x2,
            Prescaler::Div128 => 0x3,
        }
    }
}

/// Rejected hardware configuration.
///
/// A bad clock cannot be detected once transmission starts (it only shows
/// as wrong colors on the strip), so derivation failures surface when the
/// driver is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No SPI prescaler brings the bit period within tolerance of 1.25 µs.
    BitPeriodUnattainable { sys_clock_hz: u32 },
    /// The derived timer pulse leaves the 0-bit window.
    PulseOutOfSpec { pulse_width_ns: u32 },
}

/// Peripheral settings derived from the system clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// SPI clock divider; one serial bit per divided clock cycle.
    pub prescaler: Prescaler,
    /// Resulting wire bit period in ns.
    pub bit_period_ns: u32,
    /// Width of the timer pulse that forms a 0-bit high, in ns.
    pub pulse_width_ns: u32,
    /// TCB2.CCMP value: low byte is the bit period in timer ticks minus
    /// one, high byte the pulse width in ticks (a quarter of the period).
    pub ccmp: u16,
}

/// Derive the SPI prescaler and timer compare values for a system clock.
///
/// Picks the prescaler landing closest to the nominal bit period, then
/// checks that the quarter-period pulse falls strictly between the 0-bit
/// and 1-bit thresholds and that a 1-bit (data held high for half the bit
/// period) outlasts it.
pub fn derive(sys_clock_hz: u32) -> Result<Timing, ConfigError> {
    if sys_clock_hz == 0 {
        return Err(ConfigError::BitPeriodUnattainable { sys_clock_hz });
    }

    let mut best: Option<Timing> = None;
    for prescaler in Prescaler::ALL {
        let divisor = prescaler.divisor();
        let bit_period_ns = (divisor as u64 * 1_000_000_000 / sys_clock_hz as u64) as u32;
        if bit_period_ns.abs_diff(BIT_PERIOD_NS) > BIT_PERIOD_SLACK_NS {
            continue;
        }

        // The timer runs on the undivided clock; its period spans one
        // serial bit and its compare opens the pulse for a quarter of it.
        let pulse_ticks = divisor / 4;
        let pulse_width_ns = (pulse_ticks as u64 * 1_000_000_000 / sys_clock_hz as u64) as u32;
        let candidate = Timing {
            prescaler,
            bit_period_ns,
            pulse_width_ns,
            ccmp: (pulse_ticks as u16) << 8 | (divisor - 1) as u16,
        };

        let closer = match best {
            Some(current) => {
                bit_period_ns.abs_diff(BIT_PERIOD_NS)
                    < current.bit_period_ns.abs_diff(BIT_PERIOD_NS)
            }
            None => true,
        };
        if closer {
            best = Some(candidate);
        }
    }

    let timing = best.ok_or(ConfigError::BitPeriodUnattainable { sys_clock_hz })?;
    if timing.pulse_width_ns <= T0H_MIN_NS
        || timing.pulse_width_ns >= T0H_MAX_NS
        || timing.bit_period_ns / 2 <= timing.pulse_width_ns
    {
        return Err(ConfigError::PulseOutOfSpec {
            pulse_width_ns: timing.pulse_width_ns,
        });
    }
    Ok(timing)
}
