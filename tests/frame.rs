mod tests {
    use avr_ws2812_ccl::{RGB8, wire_bytes};

    #[test]
    fn pixel_goes_out_green_first() {
        assert_eq!(wire_bytes(RGB8::new(1, 2, 3)), [2, 1, 3]);
    }

    #[test]
    fn black_pixel_is_three_zero_bytes() {
        assert_eq!(wire_bytes(RGB8::new(0, 0, 0)), [0, 0, 0]);
    }

    #[test]
    fn frame_byte_order() {
        // Red then green pixel: green/red/blue per pixel, pixels in order.
        let frame = [RGB8::new(255, 0, 0), RGB8::new(0, 255, 0)];
        let mut wire = [0u8; 6];
        for (chunk, pixel) in wire.chunks_mut(3).zip(frame) {
            chunk.copy_from_slice(&wire_bytes(pixel));
        }
        assert_eq!(wire, [0, 255, 0, 255, 0, 0]);
    }
}
