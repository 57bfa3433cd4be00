use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An error raised while parsing a color string.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ColorError {
    /// The string is not a `#RGB` or `#RRGGBB` hex color.
    #[error("Invalid hex color: {0:?}")]
    InvalidHex(String),
}

/// An opaque 8-bit RGB color.
///
/// # Examples
///
/// ```
/// use trimline_core::Rgb8;
///
/// let white: Rgb8 = "#FFFFFF".parse().unwrap();
/// assert_eq!(white, Rgb8::new(255, 255, 255));
///
/// let red: Rgb8 = "#f00".parse().unwrap();
/// assert_eq!(red.to_array(), [255, 0, 0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// The channels as `[r, g, b]`.
    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Format as `#RRGGBB`.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb8 {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ColorError::InvalidHex(s.to_string());
        let digits = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |hex: &str| u8::from_str_radix(hex, 16).map_err(|_| invalid());
        match digits.len() {
            // #RGB expands each digit, e.g. #f80 -> #ff8800
            3 => {
                let expand = |i: usize| channel(&digits[i..i + 1].repeat(2));
                Ok(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => Err(invalid()),
        }
    }
}

impl Serialize for Rgb8 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb8 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_long_and_short_forms() -> Result<(), ColorError> {
        assert_eq!("#1a2B3c".parse::<Rgb8>()?, Rgb8::new(0x1a, 0x2b, 0x3c));
        assert_eq!(" #abc ".parse::<Rgb8>()?, Rgb8::new(0xaa, 0xbb, 0xcc));
        Ok(())
    }

    #[test]
    fn reject_malformed() {
        for bad in ["", "#", "fff", "#ff", "#12345", "#gggggg", "#ffffff00"] {
            assert!(bad.parse::<Rgb8>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn serde_uses_hex_strings() -> Result<(), serde_json::Error> {
        let color: Rgb8 = serde_json::from_str("\"#00ff80\"")?;
        assert_eq!(color, Rgb8::new(0, 255, 128));
        assert_eq!(serde_json::to_string(&color)?, "\"#00FF80\"");
        Ok(())
    }
}
