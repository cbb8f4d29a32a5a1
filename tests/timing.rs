mod tests {
    use avr_ws2812_ccl::ConfigError;
    use avr_ws2812_ccl::timing::{
        self, BIT_PERIOD_NS, BIT_PERIOD_SLACK_NS, Prescaler, T0H_MAX_NS, T0H_MIN_NS,
    };

    #[test]
    fn downclocked_nano_every() {
        // A Nano Every slowed to ~12 MHz: divide by 16 for a 1.333 µs bit,
        // inside the ±150 ns window.
        let t = timing::derive(12_000_000).unwrap();
        assert_eq!(t.prescaler, Prescaler::Div16);
        assert_eq!(t.bit_period_ns, 1333);
        assert!(t.bit_period_ns.abs_diff(BIT_PERIOD_NS) <= BIT_PERIOD_SLACK_NS);
        // CCMPL spans the bit (divisor - 1 ticks), CCMPH a quarter of it.
        assert_eq!(t.ccmp, 0x040F);
    }

    #[test]
    fn exact_bit_period() {
        let t = timing::derive(12_800_000).unwrap();
        assert_eq!(t.prescaler, Prescaler::Div16);
        assert_eq!(t.bit_period_ns, 1250);
    }

    #[test]
    fn slow_clock_picks_small_divider() {
        let t = timing::derive(3_200_000).unwrap();
        assert_eq!(t.prescaler, Prescaler::Div4);
        assert_eq!(t.bit_period_ns, 1250);
    }

    #[test]
    fn pulse_sits_between_bit_thresholds() {
        for clk in [12_000_000, 12_800_000, 13_500_000] {
            let t = timing::derive(clk).unwrap();
            assert!(
                t.pulse_width_ns > T0H_MIN_NS && t.pulse_width_ns < T0H_MAX_NS,
                "pulse {} ns at {clk} Hz",
                t.pulse_width_ns
            );
            // A 1-bit holds the line high for half the bit period, which
            // must outlast the short pulse.
            assert!(t.bit_period_ns / 2 > t.pulse_width_ns);
        }
    }

    #[test]
    fn stock_16_mhz_is_rejected() {
        // 16 MHz / 16 gives a 1.0 µs bit, outside the window. The core has
        // to be slowed down before the driver is built.
        assert_eq!(
            timing::derive(16_000_000),
            Err(ConfigError::BitPeriodUnattainable {
                sys_clock_hz: 16_000_000
            })
        );
    }

    #[test]
    fn zero_clock_is_rejected() {
        assert!(timing::derive(0).is_err());
    }
}
