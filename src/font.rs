//! Fonts used for measuring and painting card messages.
//!
//! Does not support shaping; glyphs are laid out left to right with kerning only.

use std::path::Path;

use ab_glyph::{point, Font as FontTrait, FontVec, Glyph, PxScale, ScaleFont};

use crate::Error;

/// A font at a fixed pixel size.
pub trait Font {
   /// Returns the advance width of the given text.
   fn text_width(&self, text: &str) -> f32;

   /// Rasterizes `text` with its baseline starting at `(x, y)`. `plot` receives the pixel
   /// coordinates and coverage (`0.0..=1.0`) of every pixel touched by a glyph.
   fn rasterize(&self, text: &str, x: f32, y: f32, plot: &mut dyn FnMut(i32, i32, f32));
}

/// A TrueType/OpenType font rendered with `ab_glyph`.
pub struct GlyphFont {
   face: FontVec,
   size: f32,
}

impl GlyphFont {
   /// Card messages are written in 30px serif.
   pub const DEFAULT_SIZE: f32 = 30.0;

   /// Where serif fonts usually live on the supported platforms, in order of preference.
   const SYSTEM_SERIF_FONTS: &'static [&'static str] = &[
      "/usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf",
      "/usr/share/fonts/dejavu/DejaVuSerif.ttf",
      "/usr/share/fonts/TTF/DejaVuSerif.ttf",
      "/usr/share/fonts/truetype/liberation/LiberationSerif-Regular.ttf",
      "/usr/share/fonts/liberation/LiberationSerif-Regular.ttf",
      "/usr/share/fonts/truetype/freefont/FreeSerif.ttf",
      "/System/Library/Fonts/Supplemental/Times New Roman.ttf",
      "/Library/Fonts/Times New Roman.ttf",
      "C:\\Windows\\Fonts\\times.ttf",
   ];

   /// Loads a font from a file.
   pub fn load(path: &Path, size: f32) -> crate::Result<Self> {
      let data = std::fs::read(path)?;
      let face = FontVec::try_from_vec(data).map_err(|error| Error::InvalidFont {
         path: path.to_owned(),
         message: error.to_string(),
      })?;
      log::info!("loaded font {:?}", path);
      Ok(Self { face, size })
   }

   /// Loads the first serif font found among the usual system font locations.
   pub fn find_serif(size: f32) -> crate::Result<Self> {
      for path in Self::SYSTEM_SERIF_FONTS.iter().map(Path::new).filter(|path| path.is_file()) {
         match Self::load(path, size) {
            Ok(font) => return Ok(font),
            Err(error) => log::warn!("skipping system font: {}", error),
         }
      }
      Err(Error::NoFont)
   }

   /// Maps ASCII whitespace to a plain space, the way HTML canvases lay out text.
   fn normalize_whitespace(c: char) -> char {
      match c {
         '\t' | '\n' | '\x0C' | '\r' => ' ',
         c => c,
      }
   }

   fn layout(&self, text: &str, x: f32, y: f32) -> (Vec<Glyph>, f32) {
      let scale = PxScale::from(self.size);
      let face = self.face.as_scaled(scale);
      let mut glyphs = Vec::with_capacity(text.len());
      let mut caret = x;
      let mut previous = None;
      for c in text.chars().map(Self::normalize_whitespace) {
         let id = face.glyph_id(c);
         if let Some(previous) = previous {
            caret += face.kern(previous, id);
         }
         glyphs.push(id.with_scale_and_position(scale, point(caret, y)));
         caret += face.h_advance(id);
         previous = Some(id);
      }
      (glyphs, caret - x)
   }
}

impl Font for GlyphFont {
   fn text_width(&self, text: &str) -> f32 {
      self.layout(text, 0.0, 0.0).1
   }

   fn rasterize(&self, text: &str, x: f32, y: f32, plot: &mut dyn FnMut(i32, i32, f32)) {
      let (glyphs, _) = self.layout(text, x, y);
      for glyph in glyphs {
         // Whitespace has no outline.
         if let Some(outlined) = self.face.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            let (left, top) = (bounds.min.x as i32, bounds.min.y as i32);
            outlined.draw(|gx, gy, coverage| plot(left + gx as i32, top + gy as i32, coverage));
         }
      }
   }
}
