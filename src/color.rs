//! The three inks of the panel and how continuous-tone colors round onto them

use embedded_graphics::pixelcolor::{PixelColor, Rgb888};

/// Largest value of one 16-bit color channel
pub const CHANNEL_MAX: i32 = 0xFFFF;

/// Channel values at or above this round to "on"
const CHANNEL_HALF: i32 = 0x8000;

/// Color of a single panel pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Paper, no ink
    #[default]
    White,
    /// Black ink
    Black,
    /// Red ink
    Red,
}

impl PixelColor for Color {
    type Raw = ();
}

impl Color {
    /// All colors the panel can show
    pub const PALETTE: [Color; 3] = [Color::White, Color::Black, Color::Red];

    /// Round a 16-bit-per-channel RGB color onto the panel palette.
    ///
    /// Each channel rounds to on/off at half scale. A pixel is red when only
    /// its red channel is on; otherwise it is white when its luma rounds on
    /// and black when it does not.
    pub fn quantize(rgb: [i32; 3]) -> Color {
        let [r, g, b] = rgb.map(|c| c.clamp(0, CHANNEL_MAX));
        if r >= CHANNEL_HALF && g < CHANNEL_HALF && b < CHANNEL_HALF {
            return Color::Red;
        }
        // Rec.601 weights
        let luma = (299 * r + 587 * g + 114 * b) / 1000;
        if luma >= CHANNEL_HALF {
            Color::White
        } else {
            Color::Black
        }
    }

    /// The 16-bit RGB value this ink stands for
    pub const fn rgb16(self) -> [i32; 3] {
        match self {
            Color::White => [CHANNEL_MAX, CHANNEL_MAX, CHANNEL_MAX],
            Color::Black => [0, 0, 0],
            Color::Red => [CHANNEL_MAX, 0, 0],
        }
    }

    /// 8-bit RGB for previews
    pub const fn rgb8(self) -> [u8; 3] {
        match self {
            Color::White => [0xFF, 0xFF, 0xFF],
            Color::Black => [0x00, 0x00, 0x00],
            Color::Red => [0xFF, 0x00, 0x00],
        }
    }
}

impl From<Color> for Rgb888 {
    fn from(c: Color) -> Self {
        let [r, g, b] = c.rgb8();
        Rgb888::new(r, g, b)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
            Color::Red => write!(f, "red"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colors_quantize_to_themselves() {
        for c in Color::PALETTE {
            assert_eq!(Color::quantize(c.rgb16()), c);
        }
    }

    #[test]
    fn mid_tones_round() {
        assert_eq!(Color::quantize([0x9000, 0x9000, 0x9000]), Color::White);
        assert_eq!(Color::quantize([0x7000, 0x7000, 0x7000]), Color::Black);
        assert_eq!(Color::quantize([0xC000, 0x2000, 0x1000]), Color::Red);
        // Yellow has red on but green on as well, so it is not red ink
        assert_eq!(Color::quantize([0xFFFF, 0xFFFF, 0x0000]), Color::White);
        // Dark blue
        assert_eq!(Color::quantize([0x0000, 0x0000, 0xFFFF]), Color::Black);
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        assert_eq!(Color::quantize([-70_000, -1, -5]), Color::Black);
        assert_eq!(Color::quantize([200_000, 200_000, 200_000]), Color::White);
    }
}
