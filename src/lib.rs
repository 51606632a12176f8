pub mod backend;
pub mod clock;
pub mod config;
pub mod corpus;
pub mod digest;
pub mod driver;
pub mod error;
pub mod image_output;
pub mod raster;
pub mod report;
pub mod runner;
pub mod store;

pub use backend::{RenderBackend, ResvgBackend, SvgDocument};
pub use clock::{Clock, MonotonicClock, ScriptedClock, TimingSample};
pub use config::HarnessConfig;
pub use corpus::{Case, Corpus, DEFAULT_CORPUS};
pub use digest::{Checksum, DigestAlgorithm};
pub use driver::run_corpus;
pub use error::{FailureKind, HarnessError, Result};
pub use raster::Raster;
pub use report::{CaseReport, PersistStatus, ReportFormatter, RunSummary, Verdict};
pub use runner::CaseRunner;
pub use store::{ArtifactStore, DiskStore, MemoryStore};
