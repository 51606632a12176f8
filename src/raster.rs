use crate::error::{HarnessError, Result};
use resvg::tiny_skia::{Color, Pixmap, PixmapMut};

/// Pixel grid a document is rendered into.
///
/// Storage is tiny-skia's RGBA8 with premultiplied alpha. [`Raster::straight_rgba`]
/// converts to non-premultiplied bytes for encoding.
#[derive(Debug, Clone)]
pub struct Raster {
  pixmap: Pixmap,
}

/// Converts an intrinsic document size to raster dimensions by flooring toward zero.
///
/// Non-finite or negative sizes and sizes that floor to zero in either
/// dimension are allocation failures.
pub fn raster_dimensions(width: f32, height: f32) -> Result<(u32, u32)> {
  let floor = |value: f32| -> u32 {
    if value.is_finite() && value > 0.0 {
      // `as` saturates for values above u32::MAX.
      value.trunc() as u32
    } else {
      0
    }
  };
  let (w, h) = (floor(width), floor(height));
  if w == 0 || h == 0 {
    return Err(HarnessError::Alloc {
      width: w,
      height: h,
    });
  }
  Ok((w, h))
}

impl Raster {
  pub fn new(width: u32, height: u32) -> Result<Self> {
    let pixmap = Pixmap::new(width, height).ok_or(HarnessError::Alloc { width, height })?;
    Ok(Self { pixmap })
  }

  /// Allocates a raster for a document of the given intrinsic size.
  pub fn for_size(width: f32, height: f32) -> Result<Self> {
    let (w, h) = raster_dimensions(width, height)?;
    Self::new(w, h)
  }

  pub fn width(&self) -> u32 {
    self.pixmap.width()
  }

  pub fn height(&self) -> u32 {
    self.pixmap.height()
  }

  pub fn dimensions(&self) -> (u32, u32) {
    (self.width(), self.height())
  }

  pub fn pixmap(&self) -> &Pixmap {
    &self.pixmap
  }

  /// Drawing surface targeting this raster.
  pub fn surface(&mut self) -> PixmapMut<'_> {
    self.pixmap.as_mut()
  }

  pub fn fill(&mut self, color: Color) {
    self.pixmap.fill(color);
  }

  /// Raw premultiplied RGBA bytes.
  pub fn data(&self) -> &[u8] {
    self.pixmap.data()
  }

  /// Non-premultiplied RGBA bytes, row-major.
  pub fn straight_rgba(&self) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(self.pixmap.data().len());
    for pixel in self.pixmap.pixels() {
      let c = pixel.demultiply();
      rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    rgba
  }
}
