//! `#rrggbb` colors, as produced by HTML color pickers.

use std::{fmt, str};

use crate::Error;

/// An opaque RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
   pub r: u8,
   pub g: u8,
   pub b: u8,
}

impl Color {
   pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);
   pub const BLACK: Self = Self::rgb(0x00, 0x00, 0x00);

   pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
      Self { r, g, b }
   }
}

impl From<Color> for tiny_skia::Color {
   fn from(color: Color) -> Self {
      tiny_skia::Color::from_rgba8(color.r, color.g, color.b, 255)
   }
}

// fmt::Display implements to_string() for us
impl fmt::Display for Color {
   fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
      write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
   }
}

impl str::FromStr for Color {
   type Err = Error;

   /// Parses `#rrggbb`, or the `#rgb` shorthand. Hex digits are case-insensitive.
   fn from_str(s: &str) -> Result<Self, Error> {
      let invalid = || Error::InvalidColor(s.to_owned());
      let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
      if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
         return Err(invalid());
      }
      let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
      match hex.len() {
         6 => Ok(Self::rgb(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
         3 => {
            let short = |i: usize| channel(&hex[i..i + 1]).map(|c| c * 0x11);
            Ok(Self::rgb(short(0)?, short(1)?, short(2)?))
         }
         _ => Err(invalid()),
      }
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn parses_picker_output() {
      assert_eq!("#ffffff".parse::<Color>().unwrap(), Color::WHITE);
      assert_eq!("#000000".parse::<Color>().unwrap(), Color::BLACK);
      assert_eq!("#1E90fF".parse::<Color>().unwrap(), Color::rgb(0x1e, 0x90, 0xff));
      assert_eq!("#f80".parse::<Color>().unwrap(), Color::rgb(0xff, 0x88, 0x00));
   }

   #[test]
   fn rejects_garbage() {
      for input in ["", "#", "ffffff", "#fffff", "#gggggg", "#+12345", "red"] {
         assert!(input.parse::<Color>().is_err(), "{:?} should not parse", input);
      }
   }

   #[test]
   fn displays_lowercase_hex() {
      assert_eq!(Color::rgb(0x1e, 0x90, 0xff).to_string(), "#1e90ff");
      assert_eq!(Color::WHITE.to_string(), "#ffffff");
   }
}
