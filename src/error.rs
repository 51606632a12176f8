//! Error types for rasterbench
//!
//! Every failure a single case can hit has its own variant:
//! - Parse errors (the backend could not load the document)
//! - Allocation errors (zero-sized or oversized rasters)
//! - Render errors (a render iteration failed)
//! - Encode and write errors (persisting the result artifact)
//! - Read and digest errors (comparing against the reference artifact)
//!
//! These errors never escape the case runner. It folds them into a
//! [`Verdict`](crate::report::Verdict) and a [`Failure`](crate::report::Failure)
//! record so one broken case cannot abort the rest of the corpus.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Top-level error type for the harness.
#[derive(Error, Debug)]
pub enum HarnessError {
  /// The renderer binding could not load the document.
  #[error("Failed to parse '{}': {reason}", .path.display())]
  Parse { path: PathBuf, reason: String },

  /// The raster could not be allocated, including documents that floor to zero pixels.
  #[error("Failed to allocate {width}x{height} raster")]
  Alloc { width: u32, height: u32 },

  /// A render iteration failed.
  #[error("Render iteration {iteration} failed: {reason}")]
  Render { iteration: u32, reason: String },

  /// The codec could not encode the raster.
  #[error("Failed to encode image as {format}: {reason}")]
  Encode { format: String, reason: String },

  /// The encoded artifact could not be written.
  #[error("Failed to write '{}': {source}", .path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// An artifact could not be read back for comparison.
  #[error("Failed to read '{}': {source}", .path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The digest probe could not produce comparable digests.
  #[error("Digest failed: {reason}")]
  Digest { reason: String },

  /// Invalid harness configuration.
  #[error("Invalid configuration: {0}")]
  Config(String),
}

impl HarnessError {
  /// Returns the failure kind this error is reported as.
  pub fn kind(&self) -> FailureKind {
    match self {
      HarnessError::Parse { .. } => FailureKind::ParseFailed,
      HarnessError::Alloc { .. } => FailureKind::AllocFailed,
      HarnessError::Render { .. } => FailureKind::RenderFailed,
      HarnessError::Encode { .. } => FailureKind::EncodeFailed,
      HarnessError::Write { .. } => FailureKind::WriteFailed,
      HarnessError::Read { .. } => FailureKind::ReadFailed,
      HarnessError::Digest { .. } => FailureKind::DigestFailed,
      HarnessError::Config(_) => FailureKind::Config,
    }
  }
}

/// Stable, copyable classification of a [`HarnessError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
  ParseFailed,
  AllocFailed,
  RenderFailed,
  EncodeFailed,
  WriteFailed,
  ReadFailed,
  DigestFailed,
  Config,
}

impl FailureKind {
  pub fn label(self) -> &'static str {
    match self {
      FailureKind::ParseFailed => "PARSE_FAILED",
      FailureKind::AllocFailed => "ALLOC_FAILED",
      FailureKind::RenderFailed => "RENDER_FAILED",
      FailureKind::EncodeFailed => "ENCODE_FAILED",
      FailureKind::WriteFailed => "WRITE_FAILED",
      FailureKind::ReadFailed => "READ_FAILED",
      FailureKind::DigestFailed => "DIGEST_FAILED",
      FailureKind::Config => "CONFIG",
    }
  }
}

impl fmt::Display for FailureKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}
