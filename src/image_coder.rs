use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::codecs::jpeg::{JpegDecoder, JpegEncoder};
use image::{ColorType, ImageDecoder, ImageEncoder, RgbImage};

use crate::Error;

pub struct ImageCoder;

impl ImageCoder {
   /// The quality of encoded JPEG files. Browsers use 92% when exporting a canvas to JPEG
   /// without an explicit quality.
   pub const DEFAULT_JPEG_QUALITY: u8 = 92;

   pub const JPEG_MIME_TYPE: &'static str = "image/jpeg";

   /// Encodes an image to JPEG data. `quality` is clamped to `1..=100`.
   pub fn encode_jpeg_data(image: &RgbImage, quality: u8) -> crate::Result<Vec<u8>> {
      let mut bytes: Vec<u8> = Vec::new();
      match JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100)).write_image(
         image,
         image.width(),
         image.height(),
         ColorType::Rgb8,
      ) {
         Ok(()) => (),
         Err(error) => {
            log::error!("error while encoding: {}", error);
            return Err(error.into());
         }
      }
      Ok(bytes)
   }

   /// Decodes JPEG data into an RGB image.
   pub fn decode_jpeg_data(data: &[u8]) -> crate::Result<RgbImage> {
      let decoder = JpegDecoder::new(Cursor::new(data))?;
      if decoder.color_type() != ColorType::Rgb8 {
         log::warn!("received non-RGB JPEG data, ignoring");
         return Err(Error::UnsupportedImage(decoder.color_type()));
      }
      let (width, height) = decoder.dimensions();
      let mut image = RgbImage::new(width, height);
      decoder.read_image(&mut image)?;
      Ok(image)
   }

   /// Wraps encoded image data in a `data:` URL.
   pub fn to_data_url(mime_type: &str, data: &[u8]) -> String {
      format!("data:{};base64,{}", mime_type, BASE64.encode(data))
   }
}

#[cfg(test)]
mod tests {
   use image::{GrayImage, Luma, Rgb};

   use super::*;

   #[test]
   fn jpeg_preserves_flat_colors_closely() {
      let image = RgbImage::from_pixel(32, 24, Rgb([200, 40, 40]));
      let jpeg = ImageCoder::encode_jpeg_data(&image, ImageCoder::DEFAULT_JPEG_QUALITY).unwrap();
      assert_eq!(&jpeg[..2], &[0xff, 0xd8]);
      let decoded = ImageCoder::decode_jpeg_data(&jpeg).unwrap();
      assert_eq!(decoded.dimensions(), (32, 24));
      let Rgb([r, g, b]) = *decoded.get_pixel(16, 12);
      let close = |actual: u8, expected: i32| (actual as i32 - expected).abs() <= 8;
      assert!(close(r, 200) && close(g, 40) && close(b, 40));
   }

   #[test]
   fn lower_quality_produces_smaller_files() {
      let image = RgbImage::from_fn(64, 64, |x, y| {
         Rgb([(x * 4) as u8, (y * 4) as u8, ((x ^ y) * 4) as u8])
      });
      let high = ImageCoder::encode_jpeg_data(&image, 100).unwrap();
      let low = ImageCoder::encode_jpeg_data(&image, 10).unwrap();
      assert!(low.len() < high.len());
   }

   #[test]
   fn grayscale_jpeg_is_rejected() {
      let image = GrayImage::from_pixel(8, 8, Luma([128]));
      let mut jpeg = Vec::new();
      JpegEncoder::new_with_quality(&mut jpeg, 90)
         .write_image(&image, 8, 8, ColorType::L8)
         .unwrap();
      assert!(matches!(
         ImageCoder::decode_jpeg_data(&jpeg),
         Err(Error::UnsupportedImage(ColorType::L8))
      ));
   }

   #[test]
   fn data_url_is_base64_encoded() {
      assert_eq!(ImageCoder::to_data_url("image/jpeg", b"abc"), "data:image/jpeg;base64,YWJj");
   }
}
