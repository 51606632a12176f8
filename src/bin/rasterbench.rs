use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rasterbench::config::HarnessConfig;
use rasterbench::{
  run_corpus, CaseRunner, Corpus, DigestAlgorithm, DiskStore, MonotonicClock, ReportFormatter,
  ResvgBackend,
};
use std::fs;
use std::io;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(about = "Time SVG parse/render per corpus document and compare results against references")]
struct Args {
  /// Resource root, same as `--resources`
  #[arg(value_name = "DIR", conflicts_with = "resources")]
  root: Option<PathBuf>,

  /// Directory containing `<name>.svg` inputs and `<name>-reference.png` goldens
  /// (falls back to $RASTERBENCH_RESOURCE_ROOT, then `resources`)
  #[arg(long, value_name = "DIR")]
  resources: Option<PathBuf>,

  /// Render iterations per case
  #[arg(long, default_value = "10", value_name = "N")]
  iterations: NonZeroU32,

  /// Digest used to compare result and reference artifacts
  #[arg(long, value_enum, default_value_t = DigestArg::Md5)]
  digest: DigestArg,

  /// Only run the listed cases (comma-separated)
  #[arg(long, value_delimiter = ',')]
  cases: Option<Vec<String>>,

  /// Resolve text against system fonts (digests then depend on the host)
  #[arg(long)]
  system_fonts: bool,

  /// Write a JSON summary of the run to this path
  #[arg(long, value_name = "PATH")]
  summary: Option<PathBuf>,

  /// Print digests alongside verdicts
  #[arg(long)]
  show_digests: bool,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum DigestArg {
  Md5,
  Sha256,
}

impl DigestArg {
  fn as_algorithm(self) -> DigestAlgorithm {
    match self {
      DigestArg::Md5 => DigestAlgorithm::Md5,
      DigestArg::Sha256 => DigestAlgorithm::Sha256,
    }
  }
}

fn main() -> ExitCode {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")).init();

  let args = Args::parse();
  let show_digests = args.show_digests;
  let config = HarnessConfig::default()
    .with_resource_root(HarnessConfig::resolve_root(
      args.resources.or(args.root),
      HarnessConfig::root_from_env(),
    ))
    .with_iterations(args.iterations)
    .with_digest(args.digest.as_algorithm())
    .with_system_fonts(args.system_fonts)
    .with_cases(args.cases)
    .with_summary_path(args.summary);

  match run(&config, ReportFormatter::new().with_digests(show_digests)) {
    Ok(code) => ExitCode::from(code),
    Err(err) => {
      eprintln!("error: {err:#}");
      ExitCode::from(2)
    }
  }
}

fn run(config: &HarnessConfig, formatter: ReportFormatter) -> Result<u8> {
  config.validate()?;
  let mut corpus = Corpus::standard(&config.resource_root);
  if let Some(cases) = config.cases.as_ref() {
    corpus = corpus.select(cases)?;
  }

  let backend = if config.system_fonts {
    ResvgBackend::with_system_fonts()
  } else {
    ResvgBackend::new()
  };
  let clock = MonotonicClock::new();
  let store = DiskStore;
  let runner = CaseRunner::new(&backend, &clock, &store)
    .with_iterations(config.iterations)
    .with_digest(config.digest);

  let stdout = io::stdout();
  let stderr = io::stderr();
  let summary = run_corpus(
    &runner,
    &corpus,
    &formatter,
    &mut stdout.lock(),
    &mut stderr.lock(),
  )
  .context("failed to write report")?;

  if let Some(path) = config.summary_path.as_ref() {
    if let Some(parent) = path.parent() {
      if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)
          .with_context(|| format!("failed to create {}", parent.display()))?;
      }
    }
    let json = summary.to_json()?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
  }

  Ok(summary.exit_code())
}
