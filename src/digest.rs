use crate::error::{HarnessError, Result};
use md5::Md5;
use serde::{Serialize, Serializer};
use sha2::{Digest as _, Sha256};
use std::fmt;

/// Hash used to fingerprint artifacts.
///
/// MD5 is the default because the recorded reference corpus was fingerprinted
/// with it. It is only ever used as a checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
  #[default]
  Md5,
  Sha256,
}

impl DigestAlgorithm {
  pub fn width_bytes(self) -> usize {
    match self {
      DigestAlgorithm::Md5 => 16,
      DigestAlgorithm::Sha256 => 32,
    }
  }

  pub fn name(self) -> &'static str {
    match self {
      DigestAlgorithm::Md5 => "md5",
      DigestAlgorithm::Sha256 => "sha256",
    }
  }

  pub fn digest(self, bytes: &[u8]) -> Checksum {
    let bytes = match self {
      DigestAlgorithm::Md5 => Md5::digest(bytes).to_vec(),
      DigestAlgorithm::Sha256 => Sha256::digest(bytes).to_vec(),
    };
    Checksum {
      algorithm: self,
      bytes,
    }
  }
}

/// Fixed-width digest of an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checksum {
  algorithm: DigestAlgorithm,
  bytes: Vec<u8>,
}

impl Checksum {
  pub fn algorithm(&self) -> DigestAlgorithm {
    self.algorithm
  }

  pub fn as_bytes(&self) -> &[u8] {
    &self.bytes
  }

  pub fn to_hex(&self) -> String {
    self.to_string()
  }
}

impl fmt::Display for Checksum {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for byte in &self.bytes {
      write!(f, "{byte:02x}")?;
    }
    Ok(())
  }
}

impl Serialize for Checksum {
  fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

/// Byte-wise equality of two digests.
///
/// Digests of different algorithms or widths cannot be compared and yield a
/// digest error rather than a mismatch.
pub fn digests_match(result: &Checksum, reference: &Checksum) -> Result<bool> {
  if result.algorithm != reference.algorithm {
    return Err(HarnessError::Digest {
      reason: format!(
        "cannot compare {} digest with {} digest",
        result.algorithm.name(),
        reference.algorithm.name()
      ),
    });
  }
  let width = result.algorithm.width_bytes();
  if result.bytes.len() != width || reference.bytes.len() != width {
    return Err(HarnessError::Digest {
      reason: format!(
        "expected {width}-byte digests, got {} and {}",
        result.bytes.len(),
        reference.bytes.len()
      ),
    });
  }
  Ok(result.bytes == reference.bytes)
}
