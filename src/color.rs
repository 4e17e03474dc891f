use crate::algorithm::AlgorithmError;
use crossterm::style::Color;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Rgb {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
}

impl Rgb {
    pub(crate) const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Decodes `#rrggbb` (the leading `#` is optional).
    pub(crate) fn from_hex(hex: &str) -> Result<Self, AlgorithmError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AlgorithmError::InvalidColor(hex.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| AlgorithmError::InvalidColor(hex.to_string()))
        };
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    pub(crate) fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub(crate) fn term(self) -> Color {
        Color::Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }
}

/// Blends a brightness taken from `value / modulus` (90%) with the
/// algorithm's signature hue (10%). Negative values clamp to black.
pub(crate) fn cell_color(value: i64, modulus: i64, hue: Rgb) -> Rgb {
    let ratio = if modulus == 0 {
        0.0
    } else {
        value as f64 / modulus as f64
    };
    let base = (ratio * 200.0 + 20.0).floor();
    let blend = |c: u8| -> u8 {
        let v = base * 0.9 + c as f64 * 0.1;
        v.clamp(0.0, 255.0).round() as u8
    };
    Rgb {
        r: blend(hue.r),
        g: blend(hue.g),
        b: blend(hue.b),
    }
}
