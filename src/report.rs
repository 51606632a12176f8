use crate::clock::TimingSample;
use crate::digest::{Checksum, DigestAlgorithm};
use crate::error::{FailureKind, HarnessError};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

pub const SUMMARY_SCHEMA_VERSION: u32 = 1;

/// Outcome of one case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
  Match,
  Mismatch,
  ReferenceAbsent,
  ComparisonError,
  ParseFailed,
  AllocFailed,
  RenderFailed,
}

impl Verdict {
  pub fn is_acceptable(self) -> bool {
    matches!(self, Verdict::Match | Verdict::ReferenceAbsent)
  }

  pub fn label(self) -> &'static str {
    match self {
      Verdict::Match => "MATCH",
      Verdict::Mismatch => "MISMATCH",
      Verdict::ReferenceAbsent => "REFERENCE_ABSENT",
      Verdict::ComparisonError => "COMPARISON_ERROR",
      Verdict::ParseFailed => "PARSE_FAILED",
      Verdict::AllocFailed => "ALLOC_FAILED",
      Verdict::RenderFailed => "RENDER_FAILED",
    }
  }
}

/// What happened to the result artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum PersistStatus {
  Written,
  EncodeFailed(String),
  WriteFailed(String),
  /// The case failed before there was anything to persist.
  Skipped,
}

impl PersistStatus {
  pub fn is_failure(&self) -> bool {
    matches!(
      self,
      PersistStatus::EncodeFailed(_) | PersistStatus::WriteFailed(_)
    )
  }
}

/// A recorded failure: its kind plus the rendered error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
  pub kind: FailureKind,
  pub message: String,
}

impl From<&HarnessError> for Failure {
  fn from(error: &HarnessError) -> Self {
    Self {
      kind: error.kind(),
      message: error.to_string(),
    }
  }
}

/// Everything a single case produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseReport {
  pub name: String,
  pub parse: Option<TimingSample>,
  pub render: Option<TimingSample>,
  pub dimensions: Option<(u32, u32)>,
  pub artifact: PathBuf,
  pub persist: PersistStatus,
  pub verdict: Verdict,
  pub failure: Option<Failure>,
  pub result_digest: Option<Checksum>,
  pub reference_digest: Option<Checksum>,
}

impl CaseReport {
  /// A case passes when its verdict is acceptable and its artifact was persisted.
  pub fn is_acceptable(&self) -> bool {
    self.verdict.is_acceptable() && !self.persist.is_failure()
  }

  pub fn timings(&self) -> impl Iterator<Item = &TimingSample> {
    self.parse.iter().chain(self.render.iter())
  }
}

/// Renders reports as human-readable lines.
///
/// Output depends only on the report, so it can be snapshot-tested.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportFormatter {
  /// Include digests in verdict lines.
  pub show_digests: bool,
}

impl ReportFormatter {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_digests(mut self, show: bool) -> Self {
    self.show_digests = show;
    self
  }

  pub fn stdout_lines(&self, report: &CaseReport) -> Vec<String> {
    let mut lines: Vec<String> = report.timings().map(TimingSample::display_line).collect();

    if report.persist == PersistStatus::Written {
      lines.push(format!(
        "Result of last render written to '{}'",
        report.artifact.display()
      ));
    }

    if report.verdict == Verdict::Match {
      let mut line = format!(
        "Confirm hash of output file matches reference file for '{}'",
        report.name
      );
      if self.show_digests {
        if let Some(digest) = &report.result_digest {
          line.push_str(&format!(" ({} {digest})", digest.algorithm().name()));
        }
      }
      lines.push(line);
    }
    lines
  }

  pub fn stderr_lines(&self, report: &CaseReport) -> Vec<String> {
    let mut lines = Vec::new();
    let reason = report
      .failure
      .as_ref()
      .map(|f| f.message.as_str())
      .unwrap_or("unknown error");

    match &report.persist {
      PersistStatus::EncodeFailed(why) | PersistStatus::WriteFailed(why) => {
        lines.push(format!(
          "Unable to save output image for '{}': {why}",
          report.name
        ));
      }
      PersistStatus::Written | PersistStatus::Skipped => {}
    }

    match report.verdict {
      Verdict::Match => {}
      Verdict::ReferenceAbsent => lines.push(format!(
        "No reference image found for '{}', can't compare checksums",
        report.name
      )),
      Verdict::Mismatch => {
        let mut line = format!(
          "Hash of output file does not match reference file for '{}'",
          report.name
        );
        if self.show_digests {
          if let (Some(result), Some(reference)) = (&report.result_digest, &report.reference_digest)
          {
            line.push_str(&format!(
              " ({} result {result}, reference {reference})",
              result.algorithm().name()
            ));
          }
        }
        lines.push(line);
      }
      Verdict::ComparisonError => lines.push(format!(
        "Unable to confirm checksums for file '{}': {reason}",
        report.name
      )),
      Verdict::ParseFailed | Verdict::AllocFailed | Verdict::RenderFailed => {
        lines.push(format!(
          "{}: {}: {reason}",
          report.name,
          report.verdict.label()
        ));
      }
    }
    lines
  }

  pub fn emit(&self, report: &CaseReport, out: &mut dyn Write, err: &mut dyn Write) -> io::Result<()> {
    for line in self.stdout_lines(report) {
      writeln!(out, "{line}")?;
    }
    for line in self.stderr_lines(report) {
      writeln!(err, "{line}")?;
    }
    Ok(())
  }
}

/// Aggregate result of a corpus run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
  pub schema_version: u32,
  pub backend: String,
  pub iterations: u32,
  pub digest: DigestAlgorithm,
  pub cases: Vec<CaseReport>,
  pub acceptable: bool,
}

impl RunSummary {
  pub fn new(
    backend: impl Into<String>,
    iterations: u32,
    digest: DigestAlgorithm,
    cases: Vec<CaseReport>,
  ) -> Self {
    let acceptable = cases.iter().all(CaseReport::is_acceptable);
    Self {
      schema_version: SUMMARY_SCHEMA_VERSION,
      backend: backend.into(),
      iterations,
      digest,
      cases,
      acceptable,
    }
  }

  /// 0 when every case is acceptable, 1 otherwise.
  pub fn exit_code(&self) -> u8 {
    if self.acceptable {
      0
    } else {
      1
    }
  }

  pub fn count(&self, verdict: Verdict) -> usize {
    self.cases.iter().filter(|c| c.verdict == verdict).count()
  }

  pub fn to_json(&self) -> serde_json::Result<String> {
    serde_json::to_string_pretty(self)
  }
}
