use crate::corpus::Corpus;
use crate::report::{ReportFormatter, RunSummary};
use crate::runner::CaseRunner;
use std::io::{self, Write};

/// Runs every case of `corpus` in declaration order and emits each report as it completes.
///
/// No case outcome stops the run. Only a failure to write to `out` or `err`
/// is returned as an error.
pub fn run_corpus(
  runner: &CaseRunner<'_>,
  corpus: &Corpus,
  formatter: &ReportFormatter,
  out: &mut dyn Write,
  err: &mut dyn Write,
) -> io::Result<RunSummary> {
  let mut reports = Vec::with_capacity(corpus.len());
  for case in corpus.cases() {
    let report = runner.run(case);
    formatter.emit(&report, out, err)?;
    log::info!("{}: {}", report.name, report.verdict.label());
    reports.push(report);
  }
  Ok(RunSummary::new(
    runner.backend_name(),
    runner.iterations(),
    runner.digest(),
    reports,
  ))
}
