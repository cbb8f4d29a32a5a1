//! Truth tables for the two CCL lookup cells.
//!
//! The combiner needs three signals: the serial clock, the serial data line
//! and the timer pulse. The megaAVR routes TCB2 only to a cell's input 2,
//! and on the cell wired to the output pin that input carries the serial
//! clock, so a second cell bridges the pulse across: LUT2 forwards its
//! input 2, and LUT1 reads the result back over the cell-link input.
//!
//! The tables below are derived from the stated boolean functions; if the
//! inputs are rewired, re-derive them instead of editing the constants.

/// Input 0 of the waveform cell: the timer pulse, bridged through LUT2.
pub const IN_PULSE: u8 = 0b001;
/// Input 1 of the waveform cell: serial data (SPI0 MOSI).
pub const IN_DATA: u8 = 0b010;
/// Input 2 of the waveform cell: serial clock (SPI0 SCK).
pub const IN_CLOCK: u8 = 0b100;

/// Truth table for the waveform cell (LUT1).
///
/// The pin must sit high for the longer of the data-high time and the
/// timer pulse, and only while the serial clock is high: a 1-bit holds the
/// line up for the full data duration, a 0-bit only for the short pulse.
/// That is `clock AND (data OR pulse)`, rows 0b110, 0b101 and 0b111, which
/// assembles to 0xE0.
pub const WAVEFORM_TRUTH: u8 = waveform_truth();

/// Truth table for the bridge cell (LUT2): output follows input 2 alone.
///
/// Inputs 0 and 1 are masked and read as zero, so the only reachable rows
/// are 0b000 and 0b100 and setting the single 0b100 row is enough.
pub const BRIDGE_TRUTH: u8 = 0x10;

const fn waveform_truth() -> u8 {
    let mut truth: u8 = 0;
    let mut row: u8 = 0;
    while row < 8 {
        let clock = row & IN_CLOCK != 0;
        let data = row & IN_DATA != 0;
        let pulse = row & IN_PULSE != 0;
        if clock && (data || pulse) {
            truth |= 1 << row;
        }
        row += 1;
    }
    truth
}
