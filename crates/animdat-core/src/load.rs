use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::DecodedPackage;
use crate::format::{DecodeError, decode};

/// File name prefix of the game's animation packages (`anims7.dat`).
const PACKAGE_FILE_PREFIX: &str = "anims";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Read a `.dat` file and decode it as package `package_id`.
///
/// # Examples
/// ```no_run
/// use std::path::Path;
///
/// use animdat_core::decode_file;
///
/// let decoded = decode_file(Path::new("anims7.dat"), 7)?;
/// println!("animations: {}", decoded.package.num_animations);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn decode_file(path: &Path, package_id: u32) -> Result<DecodedPackage, LoadError> {
    let buffer = fs::read(path)?;
    let decoded = decode(&buffer, package_id)?;

    let diagnostics = &decoded.diagnostics;
    tracing::debug!(
        path = %path.display(),
        package_id,
        num_animations = diagnostics.num_animations,
        num_frames = diagnostics.num_frames,
        num_layers = diagnostics.num_layers,
        max_sprite_index = diagnostics.max_sprite_index,
        bytes_consumed = diagnostics.bytes_consumed,
        buffer_len = diagnostics.buffer_len,
        "decoded animation package"
    );
    if !diagnostics.is_fully_consumed() {
        tracing::warn!(
            path = %path.display(),
            trailing_bytes = diagnostics.trailing_bytes(),
            "animation package has unconsumed trailing bytes"
        );
    }

    Ok(decoded)
}

/// Infer the package id from an `anims<N>.dat` file name.
///
/// # Examples
/// ```
/// use std::path::Path;
///
/// use animdat_core::package_id_from_path;
///
/// assert_eq!(package_id_from_path(Path::new("assets/anims7.dat")), Some(7));
/// assert_eq!(package_id_from_path(Path::new("sprites.dat")), None);
/// ```
pub fn package_id_from_path(path: &Path) -> Option<u32> {
    let stem = path.file_stem()?.to_str()?.to_ascii_lowercase();
    let digits = stem.strip_prefix(PACKAGE_FILE_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
