mod tests {
    use myrtio_light_script::color::{Rgb, parse_hex, rgb_from_u32};
    use myrtio_light_script::math8::{scale8, unit_to_u8};

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#FF8000"), Some(Rgb::new(255, 128, 0)));
        assert_eq!(parse_hex("00ff7f"), Some(Rgb::new(0, 255, 127)));
        assert_eq!(parse_hex("#FFF"), None);
        assert_eq!(parse_hex("#GG0000"), None);
        assert_eq!(parse_hex("##FF0000"), None);
        assert_eq!(parse_hex("+FF0000"), None);
    }

    #[test]
    fn test_rgb_from_u32() {
        assert_eq!(rgb_from_u32(0x12_34_56), Rgb::new(0x12, 0x34, 0x56));
    }

    #[test]
    fn test_scale8() {
        assert_eq!(scale8(255, 255), 255);
        assert_eq!(scale8(255, 0), 0);
        assert_eq!(scale8(200, 128), 100);
    }

    #[test]
    fn test_unit_to_u8() {
        assert_eq!(unit_to_u8(0.0), 0);
        assert_eq!(unit_to_u8(1.0), 255);
        assert_eq!(unit_to_u8(0.5), 128);
        assert_eq!(unit_to_u8(2.0), 255);
        assert_eq!(unit_to_u8(-1.0), 0);
    }
}
