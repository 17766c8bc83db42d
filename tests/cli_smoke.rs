use std::path::PathBuf;
use std::process::Command;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_flaretime"))
}

#[test]
fn cli_css_writes_stylesheet() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();
    let out_path = dir.join("continuous.css");
    let _ = std::fs::remove_file(&out_path);

    let output = bin()
        .args(["css", "continuous-breathing", "--out"])
        .arg(&out_path)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(out_path.exists());

    let css = std::fs::read_to_string(&out_path).unwrap();
    assert!(css.contains("@keyframes flare-region-2-continuous {"));
    assert!(css.contains(".region-1 {"));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Sampled points: 900"));
}

#[test]
fn cli_analyze_prints_peak_table() {
    let output = bin().arg("analyze").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Peak 1:"));
    assert!(stdout.contains("Peak 2:"));
    assert!(stdout.contains("Valley/Shoulder between peaks:"));
}

#[test]
fn cli_rejects_bad_curve_spec() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();
    let spec_path = dir.join("bad_curve.json");
    std::fs::write(&spec_path, r#"{ "path": "M0,0 L10,10" }"#).unwrap();

    let status = bin()
        .args(["analyze", "--curve"])
        .arg(&spec_path)
        .status()
        .unwrap();
    assert!(!status.success());
}
