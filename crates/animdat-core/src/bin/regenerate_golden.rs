use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use animdat_core::{decode_file, package_id_from_path};

fn main() -> ExitCode {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> Result<(), String> {
    let root = PathBuf::from("tests").join("golden");
    let entries =
        fs::read_dir(&root).map_err(|err| format!("failed to read {}: {}", root.display(), err))?;

    for entry in entries {
        let entry = entry.map_err(|err| format!("failed to read entry: {}", err))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(input) = find_input(&path)? else {
            continue;
        };
        let output = path.join("expected_package.json");
        regenerate_one(&input, &output)?;
    }

    Ok(())
}

fn find_input(dir: &Path) -> Result<Option<PathBuf>, String> {
    let entries =
        fs::read_dir(dir).map_err(|err| format!("failed to read {}: {}", dir.display(), err))?;
    for entry in entries {
        let path = entry
            .map_err(|err| format!("failed to read entry: {}", err))?
            .path();
        if path.extension().is_some_and(|ext| ext == "dat") {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

fn regenerate_one(input: &Path, output: &Path) -> Result<(), String> {
    let package_id = package_id_from_path(input)
        .ok_or_else(|| format!("cannot infer package id from {}", input.display()))?;
    let decoded = decode_file(input, package_id)
        .map_err(|err| format!("decode failed for {}: {}", input.display(), err))?;
    let mut json = serde_json::to_string_pretty(&decoded.package)
        .map_err(|err| format!("JSON serialization failed: {}", err))?;
    json.push('\n');
    fs::write(output, json)
        .map_err(|err| format!("failed to write {}: {}", output.display(), err))?;
    Ok(())
}
