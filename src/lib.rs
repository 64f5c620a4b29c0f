//! A greeting card editor.
//!
//! The user draws freehand strokes on a raster canvas, adds a word-wrapped message, picks
//! colors and brush thickness, and finally submits the card, which gets encoded as a JPEG and
//! uploaded to an image host as a multipart form.
//!
//! The host (a browser shell, a windowing toolkit, or the bundled script player) owns the
//! event loop and forwards its pointer and control events to a [`CardEditor`].

pub mod color;
pub mod config;
pub mod editor;
mod error;
pub mod font;
pub mod image_coder;
pub mod paint_canvas;
pub mod script;
pub mod upload;
pub mod wrap;

pub use crate::editor::CardEditor;
pub use crate::error::*;
