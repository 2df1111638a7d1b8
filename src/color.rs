use crate::Scalar;
use bytemuck::{Pod, Zeroable};
use std::{fmt, str::FromStr};

/// 8-bit sRGB color with straight (not premultiplied) alpha
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Pod, Zeroable)]
pub struct Rgba([u8; 4]);

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    pub const fn red(self) -> u8 {
        self.0[0]
    }

    pub const fn green(self) -> u8 {
        self.0[1]
    }

    pub const fn blue(self) -> u8 {
        self.0[2]
    }

    pub const fn alpha(self) -> u8 {
        self.0[3]
    }

    pub const fn to_rgba(self) -> [u8; 4] {
        self.0
    }
}

impl From<LinColor> for Rgba {
    fn from(lin: LinColor) -> Self {
        let [r, g, b, a] = lin.0;
        if a <= f32::EPSILON {
            return Rgba::default();
        }
        let r = (linear_to_srgb(r / a) * 255.0 + 0.5) as u8;
        let g = (linear_to_srgb(g / a) * 255.0 + 0.5) as u8;
        let b = (linear_to_srgb(b / a) * 255.0 + 0.5) as u8;
        let a = (a * 255.0 + 0.5) as u8;
        Rgba::new(r, g, b, a)
    }
}

impl fmt::Debug for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rgba({})", self)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0;
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)?;
        if a != 255 {
            write!(f, "{:02x}", a)?;
        }
        Ok(())
    }
}

impl FromStr for Rgba {
    type Err = ColorError;

    fn from_str(color: &str) -> Result<Self, Self::Err> {
        let hex = color.strip_prefix('#').ok_or(ColorError::HexExpected)?;
        if hex.len() != 6 && hex.len() != 8 {
            return Err(ColorError::HexExpected);
        }
        let digit = |byte: u8| match byte {
            b'A'..=b'F' => Ok(byte - b'A' + 10),
            b'a'..=b'f' => Ok(byte - b'a' + 10),
            b'0'..=b'9' => Ok(byte - b'0'),
            _ => Err(ColorError::HexExpected),
        };
        let mut channels = [255u8; 4];
        for (channel, pair) in channels.iter_mut().zip(hex.as_bytes().chunks(2)) {
            *channel = (digit(pair[0])? << 4) | digit(pair[1])?;
        }
        Ok(Rgba(channels))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Rgba {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Rgba {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let color = std::borrow::Cow::<'de, str>::deserialize(deserializer)?;
        color.parse().map_err(serde::de::Error::custom)
    }
}

/// Alpha premultiplied RGBA color in the linear color space (no gamma correction)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinColor([f32; 4]);

impl LinColor {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self([r, g, b, a])
    }

    pub fn alpha(self) -> f32 {
        self.0[3]
    }

    /// Scale color by the coverage value
    pub fn with_alpha(self, alpha: Scalar) -> Self {
        let alpha = alpha as f32;
        let [r, g, b, a] = self.0;
        Self([r * alpha, g * alpha, b * alpha, a * alpha])
    }

    /// Blend other color on top of this color
    pub fn blend_over(self, other: Self) -> Self {
        let [r0, g0, b0, a0] = self.0;
        let [r1, g1, b1, a1] = other.0;
        let t = 1.0 - a1;
        Self([r1 + r0 * t, g1 + g0 * t, b1 + b0 * t, a1 + a0 * t])
    }
}

impl From<Rgba> for LinColor {
    fn from(color: Rgba) -> Self {
        let [r, g, b, a] = color.0;
        let a = a as f32 / 255.0;
        let r = srgb_to_linear(r as f32 / 255.0) * a;
        let g = srgb_to_linear(g as f32 / 255.0) * a;
        let b = srgb_to_linear(b as f32 / 255.0) * a;
        LinColor::new(r, g, b, a)
    }
}

/// Convert linear RGB color component into a sRGB color component.
pub fn linear_to_srgb(value: f32) -> f32 {
    if value <= 0.0031308 {
        value * 12.92
    } else {
        1.055 * value.powf(1.0 / 2.4) - 0.055
    }
}

/// Convert sRGB color component into a linear RGB color component.
pub fn srgb_to_linear(value: f32) -> f32 {
    if value <= 0.04045 {
        value / 12.92
    } else {
        ((value + 0.055) / 1.055).powf(2.4)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    HexExpected,
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorError::HexExpected => {
                write!(f, "Color expected to be #RRGGBB(AA) in hexadecimal format")
            }
        }
    }
}

impl std::error::Error for ColorError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;

    #[test]
    fn test_rgba() {
        let c = Rgba::new(1, 2, 3, 4);
        assert_eq!([1, 2, 3, 4], c.to_rgba());
        assert_eq!(1, c.red());
        assert_eq!(2, c.green());
        assert_eq!(3, c.blue());
        assert_eq!(4, c.alpha());
        let pixels = [c, Rgba::WHITE];
        let bytes: &[u8] = bytemuck::cast_slice(&pixels);
        assert_eq!(bytes, &[1, 2, 3, 4, 255, 255, 255, 255]);
    }

    #[test]
    fn test_parse_display() -> Result<(), ColorError> {
        let c: Rgba = "#01020304".parse()?;
        assert_eq!(c, Rgba::new(1, 2, 3, 4));
        assert_eq!(c.to_string(), "#01020304");

        let c: Rgba = "#AAbbcc".parse()?;
        assert_eq!(c, Rgba::new(170, 187, 204, 255));
        assert_eq!(c.to_string(), "#aabbcc");

        assert_eq!("aabbcc".parse::<Rgba>(), Err(ColorError::HexExpected));
        assert_eq!("#aabbc".parse::<Rgba>(), Err(ColorError::HexExpected));
        assert_eq!("#aabbcg".parse::<Rgba>(), Err(ColorError::HexExpected));
        Ok(())
    }

    #[test]
    fn test_conversion() -> Result<(), ColorError> {
        let c: Rgba = "#ff804010".parse()?;
        let l: LinColor = c.into();
        let r: Rgba = l.into();
        assert_eq!(c, r);
        assert_eq!(Rgba::from(LinColor::default()), Rgba::TRANSPARENT);
        Ok(())
    }

    #[test]
    fn test_blend() {
        let white = LinColor::from(Rgba::WHITE);
        let black = LinColor::from(Rgba::BLACK);
        assert_eq!(Rgba::from(black.blend_over(white)), Rgba::WHITE);
        assert_eq!(Rgba::from(white.blend_over(LinColor::default())), Rgba::WHITE);

        let half = LinColor::default().blend_over(white.with_alpha(0.5));
        assert_approx_eq!(half.alpha(), 0.5, 1e-6);
        assert_eq!(Rgba::from(half), Rgba::new(255, 255, 255, 128));
    }

    #[test]
    fn test_lin_and_srgb() {
        for i in 0..255 {
            let v = i as f32 / 255.0;
            assert_approx_eq!(v, linear_to_srgb(srgb_to_linear(v)), 1e-4);
            assert_approx_eq!(v, srgb_to_linear(linear_to_srgb(v)), 1e-4);
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde() -> Result<(), serde_json::Error> {
        let c: Rgba = serde_json::from_str("\"#ff8040\"")?;
        assert_eq!(c, Rgba::new(255, 128, 64, 255));
        assert_eq!(serde_json::to_string(&c)?, "\"#ff8040\"");
        assert!(serde_json::from_str::<Rgba>("\"red\"").is_err());
        Ok(())
    }
}
