//! Integration tests for the dct-denoise binary.

use std::path::PathBuf;
use std::process::Command;

use dct_denoise::{codec::Png, ImageBuffer, ImageCodec};

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_dct-denoise"))
}

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("dct-cli-{}-{name}", std::process::id()))
}

fn write_png(path: &PathBuf, channels: u8) {
    let image = ImageBuffer::from_fn(12, 9, channels, |x, y, c| {
        ((x * 19 + y * 7 + c as u32 * 3) % 256) as u8
    })
    .unwrap();
    std::fs::write(path, Png::default().encode(&image).unwrap()).unwrap();
}

#[test]
fn denoises_png_to_png() {
    let input = scratch_path("rgb-in.png");
    let output = scratch_path("rgb-out.png");
    write_png(&input, 3);

    let status = bin()
        .args(["-t", "4"])
        .arg(&input)
        .arg(&output)
        .status()
        .unwrap();
    assert!(status.success());

    let image = Png::default().decode(&std::fs::read(&output).unwrap()).unwrap();
    assert_eq!((image.width(), image.height(), image.channel_count()), (12, 9, 3));

    let _ = std::fs::remove_file(input);
    let _ = std::fs::remove_file(output);
}

#[test]
fn reference_format_writes_jpeg_for_rgb() {
    let input = scratch_path("ref-in.png");
    let output = scratch_path("ref-out");
    write_png(&input, 3);

    let status = bin().arg(&input).arg(&output).status().unwrap();
    assert!(status.success());

    let bytes = std::fs::read(&output).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

    let _ = std::fs::remove_file(input);
    let _ = std::fs::remove_file(output);
}

#[test]
fn missing_input_fails() {
    let output = scratch_path("never.png");
    let result = bin()
        .arg(scratch_path("missing.png"))
        .arg(&output)
        .output()
        .unwrap();

    assert_eq!(result.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&result.stderr).contains("error:"));
    assert!(!output.exists());
}

#[test]
fn error_chain_names_each_cause_once() {
    let input = scratch_path("garbage.png");
    let output = scratch_path("garbage-out.png");
    std::fs::write(&input, b"not an image").unwrap();

    let result = bin().arg(&input).arg(&output).output().unwrap();
    assert_eq!(result.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&result.stderr);
    let lines: Vec<&str> = stderr.lines().collect();
    assert_eq!(lines.first(), Some(&"error: Failed to decode image"), "{stderr}");

    let causes: Vec<&str> = lines
        .iter()
        .filter_map(|line| line.trim_start().strip_prefix("caused by: "))
        .collect();
    assert!(!causes.is_empty(), "{stderr}");
    for cause in &causes {
        assert_eq!(stderr.matches(cause).count(), 1, "{stderr}");
    }

    let _ = std::fs::remove_file(input);
}

#[test]
fn memory_limit_failure_writes_nothing() {
    let input = scratch_path("limit-in.png");
    let output = scratch_path("limit-out.png");
    write_png(&input, 1);

    let result = bin()
        .args(["--memory-limit", "0"])
        .arg(&input)
        .arg(&output)
        .output()
        .unwrap();

    assert_eq!(result.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&result.stderr).contains("Out of memory"));
    assert!(!output.exists());

    let _ = std::fs::remove_file(input);
}
