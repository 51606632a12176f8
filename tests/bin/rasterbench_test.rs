use crate::common::{self, flip_byte, promote_result, write};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn rasterbench(root: &Path, extra: &[&str]) -> Output {
  Command::new(env!("CARGO_BIN_EXE_rasterbench"))
    .current_dir(root)
    .env_remove("RASTERBENCH_RESOURCE_ROOT")
    .env_remove("RUST_LOG")
    .arg("--resources")
    .arg(root)
    .args(extra)
    .output()
    .expect("run rasterbench")
}

#[test]
fn rasterbench_exits_zero_without_references() {
  let tmp = tempfile::TempDir::new().expect("tempdir");
  common::write_standard_corpus(tmp.path());

  let output = rasterbench(tmp.path(), &["--iterations", "2"]);
  assert_eq!(output.status.code(), Some(0), "{output:?}");

  let stdout = String::from_utf8(output.stdout).unwrap();
  assert!(stdout.contains("Create document for 'android.svg' in "));
  assert!(stdout.contains("Rendered 2 iterations of 'world.svg' in "));
  let stderr = String::from_utf8(output.stderr).unwrap();
  assert_eq!(
    stderr
      .lines()
      .filter(|l| l.starts_with("No reference image found for "))
      .count(),
    8
  );
  for name in rasterbench::DEFAULT_CORPUS {
    let stem = name.trim_end_matches(".svg");
    assert!(tmp.path().join(format!("{stem}-result.png")).is_file());
  }
}

#[test]
fn rasterbench_exits_one_on_mismatch_and_writes_summary() {
  let tmp = tempfile::TempDir::new().expect("tempdir");
  write(tmp.path(), "venus.svg", common::SMALL_SVG);
  write(tmp.path(), "world.svg", common::WORLD_SVG);

  let first = rasterbench(tmp.path(), &["--cases", "venus,world"]);
  assert_eq!(first.status.code(), Some(0), "{first:?}");
  promote_result(tmp.path(), "venus");
  promote_result(tmp.path(), "world");
  flip_byte(&tmp.path().join("venus-reference.png"), 20);

  let summary = tmp.path().join("out").join("summary.json");
  let second = rasterbench(
    tmp.path(),
    &["--cases", "venus,world", "--summary", summary.to_str().unwrap()],
  );
  assert_eq!(second.status.code(), Some(1), "{second:?}");
  let stderr = String::from_utf8(second.stderr).unwrap();
  assert!(stderr.contains("Hash of output file does not match reference file for 'venus.svg'"));
  let stdout = String::from_utf8(second.stdout).unwrap();
  assert!(stdout.contains("Confirm hash of output file matches reference file for 'world.svg'"));

  let report: Value = serde_json::from_str(&fs::read_to_string(&summary).unwrap()).unwrap();
  assert_eq!(report["acceptable"], false);
  assert_eq!(report["cases"][0]["name"], "venus.svg");
  assert_eq!(report["cases"][0]["verdict"], "MISMATCH");
  assert_eq!(report["cases"][1]["verdict"], "MATCH");
}

#[test]
fn rasterbench_parse_failure_exits_one() {
  let tmp = tempfile::TempDir::new().expect("tempdir");
  write(tmp.path(), "pencil.svg", common::BROKEN_SVG);

  let output = rasterbench(tmp.path(), &["--cases", "pencil"]);
  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8(output.stderr).unwrap();
  assert!(stderr.contains("pencil.svg: PARSE_FAILED: "));
  assert!(!tmp.path().join("pencil-result.png").exists());
}

#[test]
fn rasterbench_rejects_missing_root() {
  let tmp = tempfile::TempDir::new().expect("tempdir");
  let output = Command::new(env!("CARGO_BIN_EXE_rasterbench"))
    .arg("--resources")
    .arg(tmp.path().join("absent"))
    .output()
    .expect("run rasterbench");
  assert_eq!(output.status.code(), Some(2));
  assert!(String::from_utf8_lossy(&output.stderr).contains("not a directory"));
}

#[test]
fn rasterbench_reads_root_from_env() {
  let tmp = tempfile::TempDir::new().expect("tempdir");
  write(tmp.path(), "world.svg", common::WORLD_SVG);
  let output = Command::new(env!("CARGO_BIN_EXE_rasterbench"))
    .env("RASTERBENCH_RESOURCE_ROOT", tmp.path())
    .args(["--cases", "world", "--digest", "sha256"])
    .output()
    .expect("run rasterbench");
  assert_eq!(output.status.code(), Some(0), "{output:?}");
  assert!(tmp.path().join("world-result.png").is_file());
}

#[test]
fn rasterbench_accepts_positional_root() {
  let tmp = tempfile::TempDir::new().expect("tempdir");
  write(tmp.path(), "world.svg", common::WORLD_SVG);
  let output = Command::new(env!("CARGO_BIN_EXE_rasterbench"))
    .env_remove("RASTERBENCH_RESOURCE_ROOT")
    .arg(tmp.path())
    .args(["--cases", "world"])
    .output()
    .expect("run rasterbench");
  assert_eq!(output.status.code(), Some(0), "{output:?}");
  assert!(tmp.path().join("world-result.png").is_file());
}

#[test]
fn rasterbench_rejects_root_given_twice() {
  let tmp = tempfile::TempDir::new().expect("tempdir");
  let output = Command::new(env!("CARGO_BIN_EXE_rasterbench"))
    .arg(tmp.path())
    .arg("--resources")
    .arg(tmp.path())
    .output()
    .expect("run rasterbench");
  assert_eq!(output.status.code(), Some(2));
}
