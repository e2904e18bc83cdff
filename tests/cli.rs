use std::fs;
use std::path::Path;
use std::process::Command;

use image::{GrayImage, Luma};

fn write_inputs(dir: &Path) {
    let original = GrayImage::from_fn(48, 32, |x, _| Luma([(x * 5) as u8]));
    original.save(dir.join("original.png")).unwrap();

    let stippled = GrayImage::from_fn(48, 32, |x, y| {
        Luma([if (x + y) % 3 == 0 { 0 } else { 255 }])
    });
    stippled.save(dir.join("stippled.png")).unwrap();

    // keep the run independent of the fonts installed on the host
    fs::write(dir.join("config.json"), r#"{ "font_candidates": [], "dpi": 20 }"#).unwrap();
}

fn run(dir: &Path, extra: &[&str]) -> std::process::Output {
    let exe = env!("CARGO_BIN_EXE_biasplot");
    Command::new(exe)
        .current_dir(dir)
        .args(["original.png", "stippled.png", "--config", "config.json"])
        .args(extra)
        .output()
        .expect("run failed")
}

#[test]
fn renders_figure_and_prints_summary() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());

    let output = run(dir.path(), &["-o", "figure.png", "--letter", "B", "--background", "pink"]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("removed "), "{stdout}");
    assert!(stdout.contains(" of 512 stipples"), "{stdout}");

    let figure = image::open(dir.path().join("figure.png")).unwrap().to_rgb8();
    assert_eq!(*figure.get_pixel(0, 0), image::Rgb([255, 192, 203]));
}

#[test]
fn default_output_name() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());

    let output = run(dir.path(), &[]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(dir.path().join("statistics_meme.png").exists());
}

#[test]
fn negative_threshold_keeps_every_stipple() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());

    let output = run(dir.path(), &["--threshold", "-1"]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("removed 0 of 512 stipples"), "{stdout}");
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    fs::remove_file(dir.path().join("stippled.png")).unwrap();

    let output = run(dir.path(), &[]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to open"), "{stderr}");
}

#[test]
fn unknown_background_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());

    let output = run(dir.path(), &["--background", "not-a-color"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("InvalidColor"), "{stderr}");
    assert!(!dir.path().join("statistics_meme.png").exists());
}
