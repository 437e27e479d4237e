//! animdat core library for decoding sprite animation packages.
//!
//! This crate turns the game's binary `.dat` animation packages into a
//! structured, serializable document. Decoding is a single forward walk over
//! the buffer (animations -> frames -> layers) driven by a bounds-checked
//! reader; the byte layout lives in `format::layout`, byte conventions in
//! `format::reader`, and the walk itself in `format::parser`. Only the `load`
//! module touches the filesystem.
//!
//! Invariants:
//! - Every read is bounds-checked; a short buffer fails with `OutOfBounds`.
//! - Rect fields are little-endian; every other multi-byte field is big-endian.
//! - Decoded counts always match the counts declared in the buffer.
//!
//! Version française (résumé):
//! Cette crate décode les paquets d'animation `.dat` en un document
//! sérialisable : parcours linéaire animations -> images -> calques, avec
//! lecture bornée à chaque champ. Les rectangles sont en petit-boutiste, tout
//! le reste en gros-boutiste. Seul le module `load` fait des E/S.
//!
//! # Examples
//! ```
//! use animdat_core::decode;
//!
//! let decoded = decode(&[0x01, 0x00, 0x00], 0)?;
//! assert_eq!(decoded.package.num_packages, Some(1));
//! assert!(decoded.package.animations.is_empty());
//! assert_eq!(decoded.diagnostics.bytes_consumed, 3);
//! # Ok::<(), animdat_core::DecodeError>(())
//! ```

use serde::{Deserialize, Serialize};

mod format;
mod load;
mod serde_hex;

pub use format::{DecodeError, LayerPlacement, decode};
pub use load::{LoadError, decode_file, package_id_from_path};

/// Decoded animation package: the document written out by the CLI.
///
/// # Examples
/// ```
/// use animdat_core::Package;
///
/// let package = Package {
///     package_id: 3,
///     num_packages: None,
///     num_animations: 0,
///     animations: Vec::new(),
///     max_sprite_index: 0,
/// };
/// assert_eq!(package.package_id, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Caller-supplied package identifier.
    pub package_id: u32,
    /// Package count, only stored in package 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_packages: Option<u8>,
    pub num_animations: u16,
    pub animations: Vec<Animation>,
    /// Highest sprite index referenced by any layer (0 when there are none).
    pub max_sprite_index: u16,
}

/// One looping sprite sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animation {
    /// Position within the package.
    pub id: u16,
    pub frames: Vec<Frame>,
}

/// One timed still image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Position within the animation.
    pub id: u8,
    pub delay: i8,
    pub layers: Vec<Layer>,
}

/// One sprite reference within a frame.
///
/// # Examples
/// ```
/// use animdat_core::{Layer, Rect};
///
/// let layer = Layer {
///     rect: Rect { x: 10, y: 20, w: 30, h: 40 },
///     sprite_index: 1,
///     x_offset: -512,
///     y_offset: -512,
///     transform: 0,
///     packed_raw: 0x0080_0000,
/// };
/// let value = serde_json::to_value(&layer).unwrap();
/// assert_eq!(value["packed_raw"], "0x800000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    pub rect: Rect,
    /// 0..=511.
    pub sprite_index: u16,
    /// -512..=511.
    pub x_offset: i16,
    /// -512..=511.
    pub y_offset: i16,
    /// Orientation/flip code, 0..=7.
    pub transform: u8,
    /// Packed word the four fields above were extracted from.
    #[serde(with = "serde_hex")]
    pub packed_raw: u32,
}

/// Source rectangle of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

/// Summary of a decode, used to spot truncated or padded inputs.
///
/// # Examples
/// ```
/// use animdat_core::decode;
///
/// let decoded = decode(&[0x00, 0x00, 0xff], 5)?;
/// assert_eq!(decoded.diagnostics.bytes_consumed, 2);
/// assert_eq!(decoded.diagnostics.trailing_bytes(), 1);
/// assert!(!decoded.diagnostics.is_fully_consumed());
/// # Ok::<(), animdat_core::DecodeError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_packages: Option<u8>,
    pub num_animations: u16,
    /// Total frames across all animations.
    pub num_frames: u32,
    /// Total layers across all frames.
    pub num_layers: u32,
    pub max_sprite_index: u16,
    pub bytes_consumed: usize,
    pub buffer_len: usize,
}

impl Diagnostics {
    /// Bytes left in the buffer after the package was decoded.
    pub fn trailing_bytes(&self) -> usize {
        self.buffer_len.saturating_sub(self.bytes_consumed)
    }

    pub fn is_fully_consumed(&self) -> bool {
        self.bytes_consumed == self.buffer_len
    }
}

/// Result of a successful decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedPackage {
    pub package: Package,
    pub diagnostics: Diagnostics,
}
