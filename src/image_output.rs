use crate::error::{HarnessError, Result};
use crate::raster::Raster;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};

/// Encodes a raster as PNG.
///
/// The output is a pure function of the pixels: compression and filtering are
/// pinned and no ancillary chunks (timestamps, text, gamma) are written, so the
/// bytes can be fingerprinted against a recorded reference.
pub fn encode_png(raster: &Raster) -> Result<Vec<u8>> {
  let (width, height) = raster.dimensions();
  let rgba = raster.straight_rgba();

  let mut buffer = Vec::new();
  let encoder =
    PngEncoder::new_with_quality(&mut buffer, CompressionType::Default, FilterType::Adaptive);
  encoder
    .write_image(&rgba, width, height, ExtendedColorType::Rgba8)
    .map_err(|e| HarnessError::Encode {
      format: "PNG".to_string(),
      reason: e.to_string(),
    })?;

  Ok(buffer)
}

#[cfg(test)]
mod tests {
  use super::*;
  use resvg::tiny_skia::{Color, Paint, Rect, Transform};

  fn sample_raster() -> Raster {
    let mut raster = Raster::new(16, 8).unwrap();
    let mut paint = Paint::default();
    paint.set_color(Color::from_rgba8(200, 40, 10, 180));
    let rect = Rect::from_xywh(2.0, 1.5, 9.0, 5.0).unwrap();
    raster.surface().fill_rect(rect, &paint, Transform::identity(), None);
    raster
  }

  #[test]
  fn encoding_is_deterministic() {
    let raster = sample_raster();
    let first = encode_png(&raster).unwrap();
    let second = encode_png(&raster.clone()).unwrap();
    assert_eq!(first, second);
  }

  #[test]
  fn output_is_png_with_raster_size() {
    let raster = sample_raster();
    let bytes = encode_png(&raster).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (16, 8));
    assert_eq!(decoded.as_raw(), &raster.straight_rgba());
  }

  #[test]
  fn no_text_or_time_chunks_are_written() {
    let bytes = encode_png(&sample_raster()).unwrap();
    for chunk in [b"tIME", b"tEXt", b"iTXt", b"zTXt"] {
      assert!(
        !bytes.windows(4).any(|w| w == chunk),
        "unexpected {} chunk",
        String::from_utf8_lossy(chunk)
      );
    }
  }
}
