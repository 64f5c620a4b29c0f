//! User configuration.
//!
//! ## Note for adding new keys
//!
//! New keys added to the config _must_ use `#[serde(default)]` to maintain compatibility with
//! older configs. These keys will be added to the user's configuration automatically.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::image_coder::ImageCoder;
use crate::upload;

/// Where and how finished cards are uploaded.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct UploadConfig {
   pub endpoint: String,
   pub preset: String,
}

impl Default for UploadConfig {
   fn default() -> Self {
      Self {
         endpoint: upload::DEFAULT_ENDPOINT.to_owned(),
         preset: upload::DEFAULT_PRESET.to_owned(),
      }
   }
}

/// Canvas behavior.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CanvasConfig {
   /// JPEG quality of submitted cards, from 1 to 100.
   #[serde(default = "CanvasConfig::default_jpeg_quality")]
   pub jpeg_quality: u8,
   /// Brush sizes below this are raised to it.
   #[serde(default = "CanvasConfig::default_min_brush_size")]
   pub min_brush_size: f32,
   /// When enabled, changing the background color keeps what's been drawn so far.
   #[serde(default)]
   pub keep_ink_on_background_change: bool,
}

impl CanvasConfig {
   fn default_jpeg_quality() -> u8 {
      ImageCoder::DEFAULT_JPEG_QUALITY
   }

   fn default_min_brush_size() -> f32 {
      1.0
   }
}

impl Default for CanvasConfig {
   fn default() -> Self {
      Self {
         jpeg_quality: Self::default_jpeg_quality(),
         min_brush_size: Self::default_min_brush_size(),
         keep_ink_on_background_change: false,
      }
   }
}

/// Message text options.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct TextConfig {
   /// The font messages are written in. If unset, a serif font is looked up among the
   /// system fonts.
   #[serde(default)]
   pub font_path: Option<PathBuf>,
}

/// A user `config.toml` file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct UserConfig {
   #[serde(default)]
   pub upload: UploadConfig,
   #[serde(default)]
   pub canvas: CanvasConfig,
   #[serde(default)]
   pub text: TextConfig,
}

impl UserConfig {
   /// Returns the platform-specific configuration directory.
   pub fn config_dir() -> Option<PathBuf> {
      ProjectDirs::from("", "", "CardCanvas").map(|dirs| dirs.config_dir().to_owned())
   }

   /// Returns the path to the `config.toml` file.
   pub fn path() -> Option<PathBuf> {
      Self::config_dir().map(|dir| dir.join("config.toml"))
   }

   /// Loads the `config.toml` file from the platform-specific configuration directory.
   ///
   /// Falls back to the default config if no configuration directory can be determined.
   pub fn load_or_create() -> crate::Result<Self> {
      match Self::path() {
         Some(path) => Self::load_or_create_at(&path),
         None => {
            log::warn!("cannot determine config directory, using the default config");
            Ok(Self::default())
         }
      }
   }

   /// Loads the config file at the given path.
   ///
   /// If the file doesn't exist, it's created with values inherited from
   /// `UserConfig::default`.
   pub fn load_or_create_at(path: &Path) -> crate::Result<Self> {
      if let Some(dir) = path.parent() {
         std::fs::create_dir_all(dir)?;
      }
      if !path.is_file() {
         let config = Self::default();
         config.save_to(path)?;
         return Ok(config);
      }
      let file = std::fs::read_to_string(path)?;
      let config: Self = match toml::from_str(&file) {
         Ok(config) => config,
         Err(error) => {
            log::error!("error while deserializing config file: {}", error);
            log::error!("falling back to default config");
            return Ok(Self::default());
         }
      };
      // Preemptively save the config to the disk if any new keys have been added.
      config.save_to(path)?;
      Ok(config)
   }

   /// Saves the user configuration to the given file.
   pub fn save_to(&self, path: &Path) -> crate::Result<()> {
      std::fs::write(path, toml::to_string(self)?)?;
      Ok(())
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;

   #[test]
   fn missing_file_is_created_with_defaults() {
      let dir = tempfile::tempdir().unwrap();
      let path = dir.path().join("nested").join("config.toml");
      let config = UserConfig::load_or_create_at(&path).unwrap();
      assert_eq!(config, UserConfig::default());
      assert!(path.is_file());
      assert_eq!(config.upload.preset, "mattGradProject");
      assert_eq!(config.canvas.jpeg_quality, 92);
   }

   #[test]
   fn missing_keys_are_filled_in_and_saved() {
      let dir = tempfile::tempdir().unwrap();
      let path = dir.path().join("config.toml");
      std::fs::write(&path, "[canvas]\nkeep_ink_on_background_change = true\n").unwrap();

      let config = UserConfig::load_or_create_at(&path).unwrap();
      assert!(config.canvas.keep_ink_on_background_change);
      assert_eq!(config.canvas.min_brush_size, 1.0);
      assert_eq!(config.upload, UploadConfig::default());

      let saved = std::fs::read_to_string(&path).unwrap();
      assert!(saved.contains("endpoint"));
      assert!(saved.contains("jpeg_quality"));
   }

   #[test]
   fn broken_file_falls_back_to_defaults() {
      let dir = tempfile::tempdir().unwrap();
      let path = dir.path().join("config.toml");
      std::fs::write(&path, "this is = = not toml").unwrap();
      assert_eq!(UserConfig::load_or_create_at(&path).unwrap(), UserConfig::default());
   }
}
