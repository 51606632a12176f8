//! The timed render-and-compare loop.
//!
//! A case runs Parse -> Allocate -> Render x N -> Persist -> Compare, in that
//! order, on the calling thread. The parse is timed once. The render is timed
//! as a mean over N iterations that reuse a single raster, so allocation never
//! shows up in the render figure. Any result artifact left by an earlier run
//! is deleted before parsing, so a case that fails before Persist leaves no
//! artifact behind.
//!
//! The raster is not cleared between iterations. A backend whose output
//! depends on the previous contents of the surface (for example translucent
//! content with no opaque background) still yields a meaningful mean, but the
//! persisted artifact is then the N-th composite rather than a single render.

use crate::backend::{RenderBackend, SvgDocument};
use crate::clock::{Clock, TimingSample};
use crate::corpus::Case;
use crate::digest::{digests_match, Checksum, DigestAlgorithm};
use crate::error::{FailureKind, HarnessError, Result};
use crate::image_output::encode_png;
use crate::raster::Raster;
use crate::report::{CaseReport, Failure, PersistStatus, Verdict};
use crate::store::ArtifactStore;
use log::{debug, warn};
use std::num::NonZeroU32;

pub const DEFAULT_ITERATIONS: NonZeroU32 = match NonZeroU32::new(10) {
  Some(n) => n,
  None => unreachable!(),
};

/// Runs single cases against injected collaborators.
pub struct CaseRunner<'a> {
  backend: &'a dyn RenderBackend,
  clock: &'a dyn Clock,
  store: &'a dyn ArtifactStore,
  iterations: NonZeroU32,
  digest: DigestAlgorithm,
}

struct Comparison {
  verdict: Verdict,
  failure: Option<Failure>,
  result_digest: Option<Checksum>,
  reference_digest: Option<Checksum>,
}

impl<'a> CaseRunner<'a> {
  pub fn new(
    backend: &'a dyn RenderBackend,
    clock: &'a dyn Clock,
    store: &'a dyn ArtifactStore,
  ) -> Self {
    Self {
      backend,
      clock,
      store,
      iterations: DEFAULT_ITERATIONS,
      digest: DigestAlgorithm::default(),
    }
  }

  pub fn with_iterations(mut self, iterations: NonZeroU32) -> Self {
    self.iterations = iterations;
    self
  }

  pub fn with_digest(mut self, digest: DigestAlgorithm) -> Self {
    self.digest = digest;
    self
  }

  pub fn iterations(&self) -> u32 {
    self.iterations.get()
  }

  pub fn digest(&self) -> DigestAlgorithm {
    self.digest
  }

  pub fn backend_name(&self) -> &str {
    self.backend.name()
  }

  /// Runs one case. Per-case failures are recorded in the report, never returned.
  pub fn run(&self, case: &Case) -> CaseReport {
    let mut report = CaseReport {
      name: case.name().to_string(),
      parse: None,
      render: None,
      dimensions: None,
      artifact: case.result_path().to_path_buf(),
      persist: PersistStatus::Skipped,
      verdict: Verdict::ParseFailed,
      failure: None,
      result_digest: None,
      reference_digest: None,
    };

    // A result left by an earlier run must never be compared as this run's output.
    if let Err(err) = self.store.remove(case.result_path()) {
      warn!("{}: {err}", case.name());
    }

    debug!("{}: parsing {}", case.name(), case.source().display());
    let t0 = self.clock.now_nanos();
    let loaded = self.backend.load(case.source());
    let t1 = self.clock.now_nanos();
    report.parse = Some(TimingSample::between(
      format!("Create document for '{}'", case.name()),
      t0,
      t1,
      1,
    ));
    let document = match loaded {
      Ok(document) => document,
      Err(err) => return fail(report, Verdict::ParseFailed, &err),
    };

    let (width, height) = document.size();
    let mut raster = match Raster::for_size(width, height) {
      Ok(raster) => raster,
      Err(err) => return fail(report, Verdict::AllocFailed, &err),
    };
    report.dimensions = Some(raster.dimensions());
    debug!(
      "{}: intrinsic size {width}x{height}, raster {}x{}",
      case.name(),
      raster.width(),
      raster.height()
    );

    let n = self.iterations.get();
    let t2 = self.clock.now_nanos();
    if let Err(err) = render_repeatedly(document.as_ref(), &mut raster, n) {
      return fail(report, Verdict::RenderFailed, &err);
    }
    let t3 = self.clock.now_nanos();
    report.render = Some(TimingSample::between(
      format!("Rendered {n} iterations of '{}'", case.name()),
      t2,
      t3,
      n,
    ));
    drop(document);

    report.persist = self.persist(case, &raster);
    drop(raster);

    let comparison = self.compare(case);
    report.verdict = comparison.verdict;
    report.result_digest = comparison.result_digest;
    report.reference_digest = comparison.reference_digest;
    report.failure = comparison.failure.or_else(|| match &report.persist {
      PersistStatus::EncodeFailed(message) => Some(Failure {
        kind: FailureKind::EncodeFailed,
        message: message.clone(),
      }),
      PersistStatus::WriteFailed(message) => Some(Failure {
        kind: FailureKind::WriteFailed,
        message: message.clone(),
      }),
      PersistStatus::Written | PersistStatus::Skipped => None,
    });
    report
  }

  fn persist(&self, case: &Case, raster: &Raster) -> PersistStatus {
    let encoded = match encode_png(raster) {
      Ok(bytes) => bytes,
      Err(err) => {
        warn!("{}: {err}", case.name());
        return PersistStatus::EncodeFailed(err.to_string());
      }
    };
    match self.store.write_atomic(case.result_path(), &encoded) {
      Ok(()) => {
        debug!(
          "{}: wrote {} bytes to {}",
          case.name(),
          encoded.len(),
          case.result_path().display()
        );
        PersistStatus::Written
      }
      Err(err) => {
        warn!("{}: {err}", case.name());
        PersistStatus::WriteFailed(err.to_string())
      }
    }
  }

  fn compare(&self, case: &Case) -> Comparison {
    if !self.store.exists(case.reference_path()) {
      debug!(
        "{}: no reference at {}",
        case.name(),
        case.reference_path().display()
      );
      return Comparison {
        verdict: Verdict::ReferenceAbsent,
        failure: None,
        result_digest: None,
        reference_digest: None,
      };
    }

    match self.digest_pair(case) {
      Ok((result, reference)) => {
        let verdict = match digests_match(&result, &reference) {
          Ok(true) => Verdict::Match,
          Ok(false) => Verdict::Mismatch,
          Err(err) => {
            return Comparison {
              verdict: Verdict::ComparisonError,
              failure: Some(Failure::from(&err)),
              result_digest: Some(result),
              reference_digest: Some(reference),
            }
          }
        };
        if verdict == Verdict::Mismatch {
          warn!("{}: result {result} != reference {reference}", case.name());
        }
        Comparison {
          verdict,
          failure: None,
          result_digest: Some(result),
          reference_digest: Some(reference),
        }
      }
      Err(err) => {
        warn!("{}: comparison failed: {err}", case.name());
        Comparison {
          verdict: Verdict::ComparisonError,
          failure: Some(Failure::from(&err)),
          result_digest: None,
          reference_digest: None,
        }
      }
    }
  }

  fn digest_pair(&self, case: &Case) -> Result<(Checksum, Checksum)> {
    let result = self.store.read(case.result_path())?;
    let reference = self.store.read(case.reference_path())?;
    Ok((self.digest.digest(&result), self.digest.digest(&reference)))
  }
}

fn render_repeatedly(document: &dyn SvgDocument, raster: &mut Raster, n: u32) -> Result<()> {
  for i in 0..n {
    document.render(raster).map_err(|err| match err {
      HarnessError::Render { .. } => err,
      other => HarnessError::Render {
        iteration: i,
        reason: other.to_string(),
      },
    })?;
  }
  Ok(())
}

fn fail(mut report: CaseReport, verdict: Verdict, err: &HarnessError) -> CaseReport {
  warn!("{}: {err}", report.name);
  report.verdict = verdict;
  report.failure = Some(Failure::from(err));
  report
}
