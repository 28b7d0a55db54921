//! End-to-end runs of the svdot binary

use std::path::Path;
use std::process::Command;

fn svdot() -> Command {
    Command::new(env!("CARGO_BIN_EXE_svdot"))
}

fn write_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("svdot.toml");
    let missing = dir.join("bin").join("yass");
    std::fs::write(
        &path,
        format!("[aligner]\nbinary = \"{}\"\n\n[render]\nformat = \"svg\"\n", missing.display()),
    )
    .unwrap();
    path
}

#[test]
fn test_config_example_prints_all_tables() {
    let output = svdot().args(["config", "--example"]).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[aligner]"));
    assert!(stdout.contains("[plot]"));
    assert!(stdout.contains("[render]"));
}

#[test]
fn test_plot_without_aligner_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let variant = dir.path().join("v.json");
    std::fs::write(
        &variant,
        r#"{"short_name": "ins_1", "alt": [{"id": "alt_1", "seq": "ACGTACGT"}], "ref": [{"id": "ref_1", "seq": "ACGT"}]}"#,
    )
    .unwrap();
    let outdir = dir.path().join("plots");

    let output = svdot()
        .arg("--config")
        .arg(&config)
        .arg("plot")
        .arg("--variant")
        .arg(&variant)
        .arg("--outdir")
        .arg(&outdir)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(!outdir.join("ins_1.dotplots.svg").exists());
}

#[test]
fn test_plot_bad_variant_fails_with_hint() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let variant = dir.path().join("broken.json");
    std::fs::write(&variant, "{not json").unwrap();

    let output = svdot()
        .arg("--config")
        .arg(&config)
        .args(["-q", "plot", "--variant"])
        .arg(&variant)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid format"));
    assert!(stderr.contains("Suggestions:"));
}

#[test]
fn test_check_reports_missing_aligner() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    let output = svdot().arg("--config").arg(&config).arg("check").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.lines().next().unwrap().contains("missing"));
    assert!(stdout.contains("svg"));
}
