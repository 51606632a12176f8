#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// 200x200 document with an opaque background, so repeated renders are idempotent.
pub const WORLD_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="200" viewBox="0 0 200 200">
  <rect width="200" height="200" fill="#0b3d91"/>
  <circle cx="100" cy="100" r="72" fill="#2e8b57" fill-opacity="0.8"/>
  <path d="M40 110 C 70 60, 130 60, 160 110 S 120 170, 100 150 Z" fill="#f4d35e" stroke="#333" stroke-width="3"/>
</svg>"##;

/// Small opaque document used for the remaining corpus entries.
pub const SMALL_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="48.6" height="32.2">
  <rect width="48.6" height="32.2" fill="#ffffff"/>
  <rect x="6" y="4" width="20" height="12" fill="#c0392b" transform="rotate(12 16 10)"/>
</svg>"##;

/// Intrinsic size floors to 0x0.
pub const SUBPIXEL_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="0.5" height="0.75">
  <rect width="0.5" height="0.75" fill="#000"/>
</svg>"##;

pub const BROKEN_SVG: &str = "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"10\"><rect";

pub fn write(root: &Path, name: &str, content: &str) {
  fs::write(root.join(name), content).expect("write fixture");
}

/// Populates `root` with every document of the standard corpus.
pub fn write_standard_corpus(root: &Path) {
  for name in rasterbench::DEFAULT_CORPUS {
    let content = if *name == "world.svg" { WORLD_SVG } else { SMALL_SVG };
    write(root, name, content);
  }
}

/// Records the current result artifact of `stem` as its reference.
pub fn promote_result(root: &Path, stem: &str) {
  fs::copy(
    root.join(format!("{stem}-result.png")),
    root.join(format!("{stem}-reference.png")),
  )
  .expect("copy result to reference");
}

pub fn flip_byte(path: &Path, index: usize) {
  let mut bytes = fs::read(path).expect("read artifact");
  let index = index.min(bytes.len() - 1);
  bytes[index] ^= 0x01;
  fs::write(path, bytes).expect("rewrite artifact");
}
