mod tests {
    use avr_ws2812_ccl::lut::{BRIDGE_TRUTH, IN_CLOCK, IN_DATA, IN_PULSE, WAVEFORM_TRUTH};

    #[test]
    fn input_assignment() {
        // in0 = timer pulse (bridged), in1 = serial data, in2 = serial clock.
        assert_eq!((IN_PULSE, IN_DATA, IN_CLOCK), (0b001, 0b010, 0b100));
    }

    #[test]
    fn waveform_truth_register_value() {
        assert_eq!(WAVEFORM_TRUTH, 0xE0);
    }

    #[test]
    fn waveform_rows() {
        // clock·data·¬pulse, clock·¬data·pulse and clock·data·pulse drive
        // the pin high; the other five input patterns must not.
        let high_rows = [0b110, 0b101, 0b111];
        for row in 0u8..8 {
            let expected = high_rows.contains(&row);
            assert_eq!(
                WAVEFORM_TRUTH >> row & 1 == 1,
                expected,
                "row {row:03b}"
            );
        }
    }

    #[test]
    fn bridge_follows_timer_input_only() {
        assert_eq!(BRIDGE_TRUTH, 0x10);
        // The bridge cell's inputs 0 and 1 are masked and read as zero, so
        // only rows 0b000 and 0b100 are reachable.
        assert_eq!(BRIDGE_TRUTH >> 0b100 & 1, 1);
        assert_eq!(BRIDGE_TRUTH >> 0b000 & 1, 0);
    }
}
