//! Color type and color literal parsing

use smart_leds::RGB8;

pub type Rgb = RGB8;

/// Black, used for cleared pixels.
pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

/// Create an RGB color from a u32 value (0xRRGGBB format)
pub const fn rgb_from_u32(color: u32) -> Rgb {
    Rgb {
        r: ((color >> 16) & 0xFF) as u8,
        g: ((color >> 8) & 0xFF) as u8,
        b: (color & 0xFF) as u8,
    }
}

/// Parse a `#?RRGGBB` color literal.
///
/// The leading `#` is optional and the hex digits are case-insensitive.
/// Returns `None` for anything that is not exactly six hex digits.
pub fn parse_hex(literal: &str) -> Option<Rgb> {
    let digits = literal.strip_prefix('#').unwrap_or(literal);
    if digits.len() != 6 || !digits.bytes().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok().map(rgb_from_u32)
}
