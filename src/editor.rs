//! The card editor: every control of the card page, as an operation on explicit state.

use crate::color::Color;
use crate::config::{CanvasConfig, UserConfig};
use crate::font::Font;
use crate::image_coder::ImageCoder;
use crate::paint_canvas::{Brush, PaintCanvas, Point};
use crate::upload::{PendingUpload, UploadForm, Uploader};
use crate::wrap::Line;
use crate::Error;

/// Labels of the card page's controls.
pub mod labels {
   pub const BACKGROUND_COLOR: &str = "Card background color:";
   pub const BRUSH_COLOR: &str = "Brush color:";
   pub const BRUSH_SIZE: &str = "Brush stroke thickness:";
   pub const MESSAGE: &str = "Message:";
   pub const ADD_MESSAGE: &str = "Add Message";
   pub const CLEAR: &str = "Clear";
   pub const SUBMIT: &str = "Submit";
}

/// Where messages start, and how far apart their lines are.
pub const MESSAGE_ORIGIN: (f32, f32) = (20.0, 35.0);
pub const MESSAGE_LINE_HEIGHT: f32 = 35.0;

/// The default background color of a card.
pub const DEFAULT_BACKGROUND: Color = Color::WHITE;

/// What caused the background to be redrawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Redraw {
   /// The background color was changed.
   BackgroundChanged,
   /// The card was cleared.
   Cleared,
   /// The card was submitted.
   Submitted,
}

pub struct CardEditor {
   config: CanvasConfig,
   upload_preset: String,
   canvas: PaintCanvas,
   container_width: u32,
   background: Color,
   brush: Brush,
   message: String,
   font: Option<Box<dyn Font>>,
   uploader: Box<dyn Uploader>,
}

impl CardEditor {
   /// Mounts a new editor whose canvas fits a container of the given width.
   ///
   /// Without a font, drawing works as usual but messages cannot be added.
   pub fn new(
      config: &UserConfig,
      container_width: u32,
      font: Option<Box<dyn Font>>,
      uploader: Box<dyn Uploader>,
   ) -> Self {
      log::info!("mounting card editor at width {}", container_width);
      Self {
         config: config.canvas.clone(),
         upload_preset: config.upload.preset.clone(),
         canvas: PaintCanvas::new(container_width, DEFAULT_BACKGROUND),
         container_width,
         background: DEFAULT_BACKGROUND,
         brush: Self::default_brush(&config.canvas),
         message: String::new(),
         font,
         uploader,
      }
   }

   /// The default brush, no thinner than the configured minimum.
   fn default_brush(config: &CanvasConfig) -> Brush {
      let brush = Brush::default();
      Brush { size: brush.size.max(config.min_brush_size), ..brush }
   }

   pub fn canvas(&self) -> &PaintCanvas {
      &self.canvas
   }

   pub fn background_color(&self) -> Color {
      self.background
   }

   pub fn brush(&self) -> Brush {
      self.brush
   }

   pub fn message(&self) -> &str {
      &self.message
   }

   pub fn is_drawing(&self) -> bool {
      self.canvas.stroke().is_drawing
   }

   /// Refits the canvas to a new container width. Like any canvas resize, this discards the
   /// drawing.
   pub fn resize(&mut self, container_width: u32) {
      if container_width == self.container_width {
         return;
      }
      log::info!("resizing canvas to width {}", container_width);
      self.container_width = container_width;
      self.canvas.end_stroke();
      self.canvas.initialize(container_width, self.background);
   }

   /// Redraws the background after a change to it. Unless configured otherwise, this also
   /// erases everything drawn on the card.
   pub fn redraw(&mut self, reason: Redraw) {
      let keep_ink =
         reason == Redraw::BackgroundChanged && self.config.keep_ink_on_background_change;
      log::debug!("redrawing background {} ({:?})", self.background, reason);
      self.canvas.fill_background(self.background, !keep_ink);
   }

   /// Handles the "Card background color" picker.
   pub fn set_background_color(&mut self, color: &str) -> crate::Result<()> {
      self.background = color.parse()?;
      self.redraw(Redraw::BackgroundChanged);
      Ok(())
   }

   /// Handles the "Brush color" picker.
   pub fn set_brush_color(&mut self, color: &str) -> crate::Result<()> {
      self.brush.color = color.parse()?;
      Ok(())
   }

   /// Handles the "Brush stroke thickness" input. Non-finite sizes are ignored, and sizes
   /// below the configured minimum are raised to it.
   pub fn set_brush_size(&mut self, size: f32) {
      if !size.is_finite() {
         log::debug!("ignoring brush size {}", size);
         return;
      }
      self.brush.size = size.max(self.config.min_brush_size);
   }

   /// Handles the "Message" text area.
   pub fn set_message(&mut self, message: impl Into<String>) {
      self.message = message.into();
   }

   pub fn pointer_down(&mut self, point: Point) {
      self.canvas.begin_stroke(point);
   }

   pub fn pointer_move(&mut self, point: Point) {
      self.canvas.continue_stroke(point, &self.brush);
   }

   pub fn pointer_up(&mut self) {
      self.canvas.end_stroke();
   }

   pub fn pointer_leave(&mut self) {
      self.canvas.end_stroke();
   }

   pub fn blur(&mut self) {
      self.canvas.end_stroke();
   }

   /// Handles the "Add Message" button: paints the message, wrapped to the canvas width, in
   /// the brush color.
   pub fn add_message(&mut self) -> crate::Result<Vec<Line>> {
      let font = self.font.as_deref().ok_or(Error::NoFont)?;
      let max_width = self.canvas.width() as f32;
      Ok(self.canvas.add_wrapped_message(
         font,
         &self.message,
         MESSAGE_ORIGIN,
         max_width,
         MESSAGE_LINE_HEIGHT,
         self.brush.color,
      ))
   }

   /// Handles the "Clear" button: blanks the card and the message. The brush is kept.
   pub fn clear(&mut self) {
      log::info!("clearing card");
      self.background = DEFAULT_BACKGROUND;
      self.message.clear();
      self.redraw(Redraw::Cleared);
   }

   /// Encodes the card as a JPEG.
   pub fn to_jpeg(&self) -> crate::Result<Vec<u8>> {
      self.canvas.to_jpeg(self.config.jpeg_quality)
   }

   /// Handles the "Submit" button: uploads the card and resets the editor to its defaults.
   ///
   /// The editor is reset whether or not the card could be encoded, and regardless of how the
   /// upload turns out.
   pub fn submit(&mut self) -> crate::Result<PendingUpload> {
      log::info!("submitting card");
      let upload = self.to_jpeg().map(|jpeg| {
         let file = ImageCoder::to_data_url(ImageCoder::JPEG_MIME_TYPE, &jpeg);
         self.uploader.upload(UploadForm::new(file, &self.upload_preset))
      });
      if let Err(error) = &upload {
         log::error!("cannot submit card: {}", error);
      }

      self.background = DEFAULT_BACKGROUND;
      self.brush = Self::default_brush(&self.config);
      self.message.clear();
      self.canvas.end_stroke();
      self.redraw(Redraw::Submitted);
      upload
   }
}
