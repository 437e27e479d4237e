use std::fs;
use std::path::{Path, PathBuf};

use animdat_core::{DecodedPackage, Package, decode_file, package_id_from_path};

fn golden_dir(dir: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join(dir)
}

fn load_expected_package(dir: &str) -> Package {
    let expected_path = golden_dir(dir).join("expected_package.json");
    let expected_json =
        fs::read_to_string(&expected_path).expect("read expected_package.json");
    serde_json::from_str(&expected_json).expect("parse expected package")
}

fn decode_golden(dir: &str, file_name: &str) -> DecodedPackage {
    let input = golden_dir(dir).join(file_name);
    let package_id = package_id_from_path(&input).expect("package id from file name");
    decode_file(&input, package_id).expect("decode golden input")
}

fn run_golden(dir: &str, file_name: &str) -> DecodedPackage {
    let expected = load_expected_package(dir);
    let decoded = decode_golden(dir, file_name);

    let actual_value = serde_json::to_value(&decoded.package).expect("serialize actual");
    let expected_value = serde_json::to_value(expected).expect("serialize expected");

    assert_eq!(actual_value, expected_value, "golden mismatch in {dir}");
    decoded
}

#[test]
fn golden_index_empty() {
    let decoded = run_golden("tests/golden/index_empty", "anims0.dat");
    assert_eq!(decoded.diagnostics.bytes_consumed, 3);
    assert!(decoded.diagnostics.is_fully_consumed());
}

#[test]
fn golden_single_layer() {
    let decoded = run_golden("tests/golden/single_layer", "anims7.dat");
    let layer = &decoded.package.animations[0].frames[0].layers[0];
    assert_eq!(layer.sprite_index, 1);
    assert_eq!(layer.x_offset, -512);
    assert_eq!(layer.y_offset, -512);
    assert_eq!(layer.transform, 0);
    assert!(decoded.diagnostics.is_fully_consumed());
}

#[test]
fn golden_index_multi() {
    let decoded = run_golden("tests/golden/index_multi", "anims0.dat");
    assert_eq!(decoded.diagnostics.num_packages, Some(12));
    assert_eq!(decoded.diagnostics.num_animations, 3);
    assert_eq!(decoded.diagnostics.num_frames, 3);
    assert_eq!(decoded.diagnostics.num_layers, 3);
    assert_eq!(decoded.diagnostics.max_sprite_index, 511);
    assert!(decoded.diagnostics.is_fully_consumed());
}

#[test]
fn golden_trailing_padding() {
    let decoded = run_golden("tests/golden/trailing_padding", "anims3.dat");
    assert_eq!(decoded.diagnostics.trailing_bytes(), 2);
    assert_eq!(decoded.diagnostics.buffer_len, 19);
}

#[test]
fn golden_expected_keeps_hex_packed_raw() {
    let path = golden_dir("tests/golden/index_multi").join("expected_package.json");
    let json = fs::read_to_string(path).expect("read expected_package.json");
    let value: serde_json::Value = serde_json::from_str(&json).expect("json");
    let layer = &value["animations"][0]["frames"][0]["layers"][1];
    assert_eq!(layer["packed_raw"], "0xffffe007");
}
