//! Fixed-capacity pixel buffer
//!
//! Stores unscaled colors for up to `MAX_LEDS` pixels. Only the first
//! `len` pixels are visible; brightness is applied when the buffer is read
//! for rendering, never stored.

use crate::color::{BLACK, Rgb};
use crate::math8::{scale8, unit_to_u8};
use crate::script::Pattern;

/// Pixel buffer with a visible length and a brightness scalar
///
/// `MAX_LEDS` must be non-zero; this is checked at compile time.
#[derive(Debug, Clone)]
pub struct PixelBuffer<const MAX_LEDS: usize> {
    pixels: [Rgb; MAX_LEDS],
    len: usize,
    brightness: f32,
}

impl<const MAX_LEDS: usize> PixelBuffer<MAX_LEDS> {
    /// Create a black buffer with the given visible length and brightness.
    ///
    /// Both values are clamped to their valid ranges.
    pub fn new(len: usize, brightness: f32) -> Self {
        const { assert!(MAX_LEDS > 0, "a pixel buffer needs at least one pixel") };
        let mut buffer = Self {
            pixels: [BLACK; MAX_LEDS],
            len: 1,
            brightness: 1.0,
        };
        buffer.set_length(len);
        buffer.set_brightness(brightness);
        buffer
    }

    /// Maximum number of pixels the buffer can hold
    pub const fn capacity(&self) -> usize {
        MAX_LEDS
    }

    /// Visible length
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Always false: the visible length is at least 1
    pub const fn is_empty(&self) -> bool {
        false
    }

    pub const fn brightness(&self) -> f32 {
        self.brightness
    }

    /// Set the visible length, clamped to `1..=MAX_LEDS`.
    ///
    /// Shrinking hides pixels without erasing them; growing again reveals
    /// their previous colors.
    pub fn set_length(&mut self, len: usize) {
        self.len = len.clamp(1, MAX_LEDS);
    }

    /// Set the brightness, clamped to `0.0..=1.0`. NaN is ignored.
    pub fn set_brightness(&mut self, brightness: f32) {
        if !brightness.is_nan() {
            self.brightness = brightness.clamp(0.0, 1.0);
        }
    }

    /// Write one pixel. Writes beyond the visible length are ignored.
    pub fn write(&mut self, index: usize, color: Rgb) {
        if index < self.len {
            self.pixels[index] = color;
        }
    }

    /// Read one visible pixel (unscaled)
    pub fn read(&self, index: usize) -> Option<Rgb> {
        self.visible().get(index).copied()
    }

    /// Visible pixels, unscaled
    pub fn visible(&self) -> &[Rgb] {
        &self.pixels[..self.len]
    }

    /// Circular shift of the visible region.
    ///
    /// Positive offsets move content toward higher indices.
    pub fn rotate(&mut self, offset: isize) {
        let len = self.len;
        let shift = offset.unsigned_abs() % len;
        if shift == 0 {
            return;
        }
        let visible = &mut self.pixels[..len];
        if offset > 0 {
            visible.rotate_right(shift);
        } else {
            visible.rotate_left(shift);
        }
    }

    /// Write the repeated pattern over the whole visible region
    pub fn fill_pattern(&mut self, pattern: &Pattern) {
        for (pixel, color) in self.pixels[..self.len].iter_mut().zip(pattern.cycle()) {
            *pixel = color;
        }
    }

    /// Visible pixels scaled by the current brightness
    pub fn as_render_slice(&self) -> impl Iterator<Item = Rgb> + '_ {
        let level = unit_to_u8(self.brightness);
        self.visible().iter().map(move |pixel| scale(*pixel, level))
    }

    /// Render the visible pixels into `frame` and return the rendered part
    pub fn render_into<'f>(&self, frame: &'f mut [Rgb; MAX_LEDS]) -> &'f [Rgb] {
        for (out, pixel) in frame.iter_mut().zip(self.as_render_slice()) {
            *out = pixel;
        }
        &frame[..self.len]
    }
}

fn scale(pixel: Rgb, level: u8) -> Rgb {
    if level == u8::MAX {
        return pixel;
    }
    Rgb {
        r: scale8(pixel.r, level),
        g: scale8(pixel.g, level),
        b: scale8(pixel.b, level),
    }
}
