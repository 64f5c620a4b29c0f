//! The raster surface a card is drawn on.
//!
//! The surface is made of two layers: an opaque background layer, and a transparent ink layer
//! that holds strokes and text. The layers are composited whenever the card is read back.

use image::{Rgb, RgbImage};
use tiny_skia::{
   LineCap, LineJoin, Mask, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};

use crate::color::Color;
use crate::font::Font;
use crate::image_coder::ImageCoder;
use crate::wrap::{self, Line};

/// A point on the canvas, in pixels from the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
   pub x: i32,
   pub y: i32,
}

impl Point {
   pub const ORIGIN: Self = Self { x: 0, y: 0 };

   pub fn new(x: i32, y: i32) -> Self {
      Self { x, y }
   }
}

/// The brush strokes and text are painted with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Brush {
   pub color: Color,
   pub size: f32,
}

impl Default for Brush {
   fn default() -> Self {
      Self { color: Color::BLACK, size: 1.0 }
   }
}

/// The state of the current stroke. There is only ever one stroke going on at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StrokeSession {
   pub is_drawing: bool,
   pub last_point: Point,
}

struct Layers {
   background: Pixmap,
   ink: Pixmap,
}

pub struct PaintCanvas {
   width: u32,
   height: u32,
   /// `None` if the canvas has no area.
   layers: Option<Layers>,
   stroke: StrokeSession,
}

impl PaintCanvas {
   /// The height of the canvas relative to its width.
   pub const ASPECT_RATIO: f32 = 0.75;

   /// Creates a canvas as wide as its container, filled with the given background color.
   pub fn new(container_width: u32, background: Color) -> Self {
      let mut canvas = Self {
         width: 0,
         height: 0,
         layers: None,
         stroke: StrokeSession::default(),
      };
      canvas.initialize(container_width, background);
      canvas
   }

   /// Resizes the canvas to fit a container of the given width and fills it with the
   /// background color. Anything drawn previously is lost.
   pub fn initialize(&mut self, container_width: u32, background: Color) {
      self.width = container_width;
      self.height = (container_width as f32 * Self::ASPECT_RATIO) as u32;
      self.layers = Pixmap::new(self.width, self.height)
         .zip(Pixmap::new(self.width, self.height))
         .map(|(background, ink)| Layers { background, ink });
      if self.layers.is_none() {
         log::warn!("canvas initialized with no area ({}x{})", self.width, self.height);
      }
      self.fill_background(background, true);
   }

   /// Refills the background layer with the given color. If `erase_ink` is true, the ink layer
   /// is cleared too, which discards all strokes and text.
   pub fn fill_background(&mut self, color: Color, erase_ink: bool) {
      if let Some(layers) = &mut self.layers {
         layers.background.fill(color.into());
         if erase_ink {
            layers.ink.fill(tiny_skia::Color::TRANSPARENT);
         }
      }
   }

   pub fn width(&self) -> u32 {
      self.width
   }

   pub fn height(&self) -> u32 {
      self.height
   }

   pub fn stroke(&self) -> StrokeSession {
      self.stroke
   }

   /// Returns whether the point lies on the canvas.
   pub fn contains(&self, point: Point) -> bool {
      point.x >= 0
         && point.y >= 0
         && (point.x as u32) < self.width
         && (point.y as u32) < self.height
   }

   /// Starts a stroke at the given point. Pointer presses outside of the canvas are ignored.
   ///
   /// Starting a stroke while another one is in progress restarts it from the new point.
   pub fn begin_stroke(&mut self, point: Point) {
      if !self.contains(point) {
         log::debug!("ignoring stroke starting outside the canvas at {:?}", point);
         return;
      }
      self.stroke = StrokeSession { is_drawing: true, last_point: point };
   }

   /// Continues the current stroke to the given point. Does nothing if no stroke is in progress.
   pub fn continue_stroke(&mut self, point: Point, brush: &Brush) {
      if !self.stroke.is_drawing {
         return;
      }
      self.line(self.stroke.last_point, point, brush);
      self.stroke.last_point = point;
   }

   /// Ends the current stroke, if any.
   pub fn end_stroke(&mut self) {
      self.stroke = StrokeSession { is_drawing: false, last_point: Point::ORIGIN };
   }

   fn line(&mut self, a: Point, b: Point, brush: &Brush) {
      let layers = match &mut self.layers {
         Some(layers) => layers,
         None => return,
      };
      let mut builder = PathBuilder::new();
      builder.move_to(a.x as f32, a.y as f32);
      builder.line_to(b.x as f32, b.y as f32);
      let path = match builder.finish() {
         Some(path) => path,
         None => return,
      };
      let mut paint = Paint::default();
      paint.set_color(brush.color.into());
      paint.anti_alias = true;
      let stroke = Stroke {
         width: brush.size,
         line_cap: LineCap::Round,
         line_join: LineJoin::Round,
         ..Stroke::default()
      };
      layers.ink.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
   }

   /// Word-wraps `text` to `max_width` and paints it starting with the baseline at `(x, y)`,
   /// advancing by `line_height` for each line. Returns the painted lines.
   pub fn add_wrapped_message(
      &mut self,
      font: &dyn Font,
      text: &str,
      (x, y): (f32, f32),
      max_width: f32,
      line_height: f32,
      color: Color,
   ) -> Vec<Line> {
      let lines = wrap::wrap_text(text, x, y, max_width, line_height, |line| font.text_width(line));
      self.paint_lines(font, &lines, color);
      lines
   }

   fn paint_lines(&mut self, font: &dyn Font, lines: &[Line], color: Color) {
      let (width, height) = (self.width as i32, self.height as i32);
      let layers = match &mut self.layers {
         Some(layers) => layers,
         None => return,
      };
      let mut mask = match Mask::new(self.width, self.height) {
         Some(mask) => mask,
         None => return,
      };
      {
         let coverage_map = mask.data_mut();
         for line in lines {
            font.rasterize(&line.text, line.x, line.y, &mut |x: i32, y: i32, coverage: f32| {
               if x < 0 || y < 0 || x >= width || y >= height {
                  return;
               }
               let coverage = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
               let texel = &mut coverage_map[(y * width + x) as usize];
               *texel = (*texel).max(coverage);
            });
         }
      }
      let mut paint = Paint::default();
      paint.set_color(color.into());
      if let Some(area) = Rect::from_xywh(0.0, 0.0, self.width as f32, self.height as f32) {
         layers.ink.fill_rect(area, &paint, Transform::identity(), Some(&mask));
      }
   }

   /// Composites the layers into an RGB image.
   pub fn to_image(&self) -> RgbImage {
      let mut image = RgbImage::new(self.width, self.height);
      if let Some(layers) = &self.layers {
         let mut flattened = layers.background.clone();
         flattened.draw_pixmap(
            0,
            0,
            layers.ink.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
         );
         for (pixel, color) in image.pixels_mut().zip(flattened.pixels()) {
            let color = color.demultiply();
            *pixel = Rgb([color.red(), color.green(), color.blue()]);
         }
      }
      image
   }

   /// Returns the composited color of a single pixel.
   pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
      let layers = self.layers.as_ref()?;
      let background = layers.background.pixel(x, y)?;
      let ink = layers.ink.pixel(x, y)?;
      // Source-over of premultiplied ink onto the opaque background.
      let transparency = 255 - ink.alpha() as u32;
      let over = |ink: u8, background: u8| {
         ink as u32 + (background as u32 * transparency + 127) / 255
      };
      Some(Color::rgb(
         over(ink.red(), background.red()).min(255) as u8,
         over(ink.green(), background.green()).min(255) as u8,
         over(ink.blue(), background.blue()).min(255) as u8,
      ))
   }

   /// Encodes the composited canvas as a JPEG with the given quality (1 to 100).
   pub fn to_jpeg(&self, quality: u8) -> crate::Result<Vec<u8>> {
      if self.layers.is_none() {
         return Err(crate::Error::EmptyCanvas);
      }
      ImageCoder::encode_jpeg_data(&self.to_image(), quality)
   }
}
