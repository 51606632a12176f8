use crate::error::{HarnessError, Result};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Where result artifacts are written and reference artifacts are read.
pub trait ArtifactStore {
  fn exists(&self, path: &Path) -> bool;

  fn read(&self, path: &Path) -> Result<Vec<u8>>;

  /// Replaces `path` with `bytes` so readers never observe a partial file.
  fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()>;

  /// Deletes the artifact at `path`. A missing artifact is not an error.
  fn remove(&self, path: &Path) -> Result<()>;
}

/// The real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskStore;

fn tmp_path(path: &Path) -> PathBuf {
  let mut name = OsString::from(path.as_os_str());
  name.push(".tmp");
  PathBuf::from(name)
}

impl ArtifactStore for DiskStore {
  fn exists(&self, path: &Path) -> bool {
    path.is_file()
  }

  fn read(&self, path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| HarnessError::Read {
      path: path.to_path_buf(),
      source,
    })
  }

  fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = tmp_path(path);
    let written = fs::write(&tmp, bytes).and_then(|_| fs::rename(&tmp, path));
    written.map_err(|source| {
      let _ = fs::remove_file(&tmp);
      HarnessError::Write {
        path: path.to_path_buf(),
        source,
      }
    })
  }

  fn remove(&self, path: &Path) -> Result<()> {
    match fs::remove_file(path) {
      Ok(()) => Ok(()),
      Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
      Err(source) => Err(HarnessError::Write {
        path: path.to_path_buf(),
        source,
      }),
    }
  }
}

/// In-memory store for exercising the runner without touching disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
  files: RefCell<BTreeMap<PathBuf, Vec<u8>>>,
  fail_writes: Cell<bool>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) {
    self.files.borrow_mut().insert(path.into(), bytes.into());
  }

  pub fn get(&self, path: &Path) -> Option<Vec<u8>> {
    self.files.borrow().get(path).cloned()
  }

  pub fn len(&self) -> usize {
    self.files.borrow().len()
  }

  pub fn is_empty(&self) -> bool {
    self.files.borrow().is_empty()
  }

  /// Makes every subsequent write fail with a permission error.
  pub fn set_fail_writes(&self, fail: bool) {
    self.fail_writes.set(fail);
  }
}

impl ArtifactStore for MemoryStore {
  fn exists(&self, path: &Path) -> bool {
    self.files.borrow().contains_key(path)
  }

  fn read(&self, path: &Path) -> Result<Vec<u8>> {
    self.get(path).ok_or_else(|| HarnessError::Read {
      path: path.to_path_buf(),
      source: io::Error::new(io::ErrorKind::NotFound, "no such artifact"),
    })
  }

  fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()> {
    if self.fail_writes.get() {
      return Err(HarnessError::Write {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::PermissionDenied, "writes disabled"),
      });
    }
    self.insert(path, bytes);
    Ok(())
  }

  fn remove(&self, path: &Path) -> Result<()> {
    self.files.borrow_mut().remove(path);
    Ok(())
  }
}
