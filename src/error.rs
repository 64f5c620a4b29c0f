use std::path::PathBuf;

/// Errors that can occur while editing or submitting a card.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   #[error("invalid color {0:?}, expected #rrggbb")]
   InvalidColor(String),
   #[error("invalid event {0:?}")]
   InvalidEvent(String),

   #[error("no usable font was found; set `text.font_path` in the config")]
   NoFont,
   #[error("cannot load font {path:?}: {message}")]
   InvalidFont { path: PathBuf, message: String },

   #[error("the canvas has no area and cannot be encoded")]
   EmptyCanvas,
   #[error("unsupported image color type {0:?}")]
   UnsupportedImage(image::ColorType),
   #[error("image error: {0}")]
   Image(#[from] image::ImageError),

   #[error("invalid upload endpoint: {0}")]
   InvalidEndpoint(#[from] url::ParseError),
   #[error("HTTP error: {0}")]
   Http(#[from] reqwest::Error),
   #[error("upload rejected with status {status}: {body}")]
   UploadRejected { status: u16, body: String },
   #[error("invalid upload response: {0}")]
   InvalidResponse(#[from] serde_json::Error),
   #[error("the upload was abandoned before it finished")]
   UploadAborted,

   #[error("I/O error: {0}")]
   Io(#[from] std::io::Error),
   #[error("cannot serialize config: {0}")]
   ConfigSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
