//! Renderer binding.
//!
//! The harness sees a renderer only through the capability set
//! {load, size, render}. A recorded reference corpus is tied to one backend
//! and one codec; swapping either invalidates the references.

use crate::error::{HarnessError, Result};
use crate::raster::Raster;
use resvg::tiny_skia::Transform;
use resvg::usvg;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Loads documents from source files.
pub trait RenderBackend {
  /// Short identifier recorded in run summaries.
  fn name(&self) -> &str;

  fn load(&self, source: &Path) -> Result<Box<dyn SvgDocument>>;
}

/// A parsed document.
pub trait SvgDocument {
  /// Intrinsic size in user units.
  fn size(&self) -> (f32, f32);

  /// Draws the document at its intrinsic size with no viewport override.
  ///
  /// Pixels already in the raster are drawn over, not cleared.
  fn render(&self, raster: &mut Raster) -> Result<()>;
}

/// Backend built on `resvg`.
pub struct ResvgBackend {
  fontdb: Arc<usvg::fontdb::Database>,
}

impl ResvgBackend {
  /// Backend with an empty font database. Text renders nothing, which keeps
  /// digests independent of the fonts installed on the host.
  pub fn new() -> Self {
    Self {
      fontdb: Arc::new(usvg::fontdb::Database::new()),
    }
  }

  /// Backend that resolves text against the host's system fonts.
  pub fn with_system_fonts() -> Self {
    let mut fontdb = usvg::fontdb::Database::new();
    fontdb.load_system_fonts();
    log::debug!("loaded {} system font faces", fontdb.len());
    Self {
      fontdb: Arc::new(fontdb),
    }
  }

  fn options_for(&self, source: &Path) -> usvg::Options<'static> {
    let mut options = usvg::Options::default();
    options.resources_dir = source.parent().map(|dir| {
      fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf())
    });
    options.fontdb = Arc::clone(&self.fontdb);
    options
  }
}

impl Default for ResvgBackend {
  fn default() -> Self {
    Self::new()
  }
}

impl RenderBackend for ResvgBackend {
  fn name(&self) -> &str {
    "resvg"
  }

  fn load(&self, source: &Path) -> Result<Box<dyn SvgDocument>> {
    let data = fs::read(source).map_err(|e| HarnessError::Parse {
      path: source.to_path_buf(),
      reason: e.to_string(),
    })?;
    let options = self.options_for(source);
    let tree = usvg::Tree::from_data(&data, &options).map_err(|e| HarnessError::Parse {
      path: source.to_path_buf(),
      reason: format!("Failed to parse SVG: {e}"),
    })?;
    Ok(Box::new(ResvgDocument { tree }))
  }
}

struct ResvgDocument {
  tree: usvg::Tree,
}

impl SvgDocument for ResvgDocument {
  fn size(&self) -> (f32, f32) {
    let size = self.tree.size();
    (size.width(), size.height())
  }

  fn render(&self, raster: &mut Raster) -> Result<()> {
    resvg::render(&self.tree, Transform::identity(), &mut raster.surface());
    Ok(())
  }
}
