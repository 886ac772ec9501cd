#![cfg(feature = "clap")]

use std::io::Cursor;
use std::process::Command;

use icon_recolor::IconContainer;
use image::{Rgba, RgbaImage};

fn icon_recolor() -> Command {
    Command::new(env!("CARGO_BIN_EXE_icon-recolor"))
}

#[test]
fn converts_and_prints_output_path() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.png");
    let output = dir.path().join("out.ico");
    RgbaImage::from_pixel(8, 8, Rgba([0, 0, 255, 255]))
        .save(&input)
        .unwrap();

    let result = icon_recolor()
        .arg(&input)
        .arg(&output)
        .args(["--sizes", "32,16", "--filter", "nearest"])
        .output()
        .unwrap();

    assert!(result.status.success());
    let stdout = String::from_utf8(result.stdout).unwrap();
    assert_eq!(stdout.trim(), output.display().to_string());

    let container = IconContainer::read(Cursor::new(std::fs::read(&output).unwrap())).unwrap();
    assert_eq!(container.len(), 2);
    assert_eq!(container.entries()[0].width, 32);
}

#[test]
fn profile_file_is_honored() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.png");
    let output = dir.path().join("out.ico");
    let profile = dir.path().join("profile.json");
    RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]))
        .save(&input)
        .unwrap();
    std::fs::write(&profile, r#"{ "sizes": [24], "hueBand": { "lo": 0, "hi": 10 }, "substituteHue": 120 }"#)
        .unwrap();

    let result = icon_recolor()
        .arg(&input)
        .arg(&output)
        .arg("--profile")
        .arg(&profile)
        .output()
        .unwrap();
    assert!(result.status.success());

    let container = IconContainer::read(Cursor::new(std::fs::read(&output).unwrap())).unwrap();
    assert_eq!(container.entries()[0].width, 24);
    let decoded = image::load_from_memory(container.payload(0).unwrap())
        .unwrap()
        .to_rgba8();
    let pixel = decoded.get_pixel(0, 0).0;
    assert!(pixel[1] > 250 && pixel[0] < 5, "red should have become green, got {pixel:?}");
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.ico");

    let result = icon_recolor()
        .arg(dir.path().join("absent.png"))
        .arg(&output)
        .output()
        .unwrap();

    assert!(!result.status.success());
    let stderr = String::from_utf8(result.stderr).unwrap();
    assert!(stderr.contains("failed to decode source image"));
    assert!(!output.exists());
}
