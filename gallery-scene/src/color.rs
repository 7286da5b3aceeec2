//! Scene colors, declared as 8-bit sRGB and stored linear.

use glam::Vec3;

/// An RGB color in linear space (0-1 range).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub Vec3);

impl Color {
    pub const WHITE: Color = Color(Vec3::ONE);

    /// Build from 8-bit sRGB channels.
    pub fn from_srgb(r: u8, g: u8, b: u8) -> Self {
        let c = |v: u8| srgb_to_linear(v as f32 / 255.0);
        Self(Vec3::new(c(r), c(g), c(b)))
    }

    /// Linear RGB as a vector.
    pub fn linear(&self) -> Vec3 {
        self.0
    }

    /// Linear RGBA with the given alpha, laid out for uniform buffers.
    pub fn to_array(&self, alpha: f32) -> [f32; 4] {
        [self.0.x, self.0.y, self.0.z, alpha]
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_srgb_endpoints() {
        let white = Color::from_srgb(0xff, 0xff, 0xff);
        assert!((white.linear() - Color::WHITE.linear()).length() < 1e-5);

        let black = Color::from_srgb(0, 0, 0);
        assert_eq!(black.linear(), Vec3::ZERO);
    }

    #[test]
    fn test_background_is_dark_blue_grey() {
        let bg = Color::from_srgb(0x19, 0x19, 0x20).linear();
        assert!(bg.x < 0.02 && bg.y < 0.02);
        assert!(bg.z > bg.x);
    }

    #[test]
    fn test_to_array_appends_alpha() {
        let [r, g, b, a] = Color::from_srgb(0x15, 0x15, 0x15).to_array(0.8);
        assert!(r > 0.0 && r == g && g == b);
        assert_eq!(a, 0.8);
    }
}
