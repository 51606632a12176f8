use crate::error::{HarnessError, Result};
use std::path::{Path, PathBuf};

/// The benchmark corpus, in the order cases are run and reported.
pub const DEFAULT_CORPUS: &[&str] = &[
  "android.svg",
  "gallardo.svg",
  "islands.svg",
  "micelle.svg",
  "pencil.svg",
  "propane.svg",
  "venus.svg",
  "world.svg",
];

const SOURCE_EXTENSION: &str = ".svg";
const RESULT_SUFFIX: &str = "-result.png";
const REFERENCE_SUFFIX: &str = "-reference.png";

/// One input document and the artifacts derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
  name: String,
  source: PathBuf,
  result_path: PathBuf,
  reference_path: PathBuf,
}

fn derived_name(file_name: &str, suffix: &str) -> String {
  let stem = file_name
    .strip_suffix(SOURCE_EXTENSION)
    .unwrap_or(file_name);
  format!("{stem}{suffix}")
}

impl Case {
  /// Builds a case for `file_name` (e.g. `world.svg`) under `root`.
  pub fn new(root: &Path, file_name: &str) -> Self {
    Self {
      name: file_name.to_string(),
      source: root.join(file_name),
      result_path: root.join(derived_name(file_name, RESULT_SUFFIX)),
      reference_path: root.join(derived_name(file_name, REFERENCE_SUFFIX)),
    }
  }

  /// File name of the input, e.g. `world.svg`.
  pub fn name(&self) -> &str {
    &self.name
  }

  /// Name without the `.svg` extension.
  pub fn stem(&self) -> &str {
    self
      .name
      .strip_suffix(SOURCE_EXTENSION)
      .unwrap_or(&self.name)
  }

  pub fn source(&self) -> &Path {
    &self.source
  }

  pub fn result_path(&self) -> &Path {
    &self.result_path
  }

  pub fn reference_path(&self) -> &Path {
    &self.reference_path
  }
}

/// Ordered set of cases sharing one resource root.
#[derive(Debug, Clone)]
pub struct Corpus {
  root: PathBuf,
  cases: Vec<Case>,
}

impl Corpus {
  /// The standard eight-document corpus.
  pub fn standard(root: impl Into<PathBuf>) -> Self {
    Self::from_names(root, DEFAULT_CORPUS.iter().copied())
  }

  pub fn from_names<'a>(root: impl Into<PathBuf>, names: impl IntoIterator<Item = &'a str>) -> Self {
    let root = root.into();
    let cases = names.into_iter().map(|name| Case::new(&root, name)).collect();
    Self { root, cases }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn cases(&self) -> &[Case] {
    &self.cases
  }

  pub fn len(&self) -> usize {
    self.cases.len()
  }

  pub fn is_empty(&self) -> bool {
    self.cases.is_empty()
  }

  /// Keeps only the cases named in `filter`, preserving declaration order.
  ///
  /// Names match case-insensitively with or without the `.svg` extension.
  pub fn select(mut self, filter: &[String]) -> Result<Self> {
    let wanted: Vec<String> = filter
      .iter()
      .map(|name| name.trim().to_ascii_lowercase())
      .filter(|name| !name.is_empty())
      .collect();
    if wanted.is_empty() {
      return Err(HarnessError::Config(
        "at least one non-empty case name must be provided".to_string(),
      ));
    }

    let available = self
      .cases
      .iter()
      .map(|c| c.stem().to_string())
      .collect::<Vec<_>>()
      .join(", ");
    self.cases.retain(|case| {
      let name = case.name().to_ascii_lowercase();
      let stem = case.stem().to_ascii_lowercase();
      wanted.iter().any(|w| *w == name || *w == stem)
    });
    if self.cases.is_empty() {
      return Err(HarnessError::Config(format!(
        "no cases matched {filter:?}; available cases: {available}"
      )));
    }
    Ok(self)
  }
}
