//! Animation package wire format.
//!
//! The decoder follows a layered structure:
//! - `layout`: field widths and bit positions (source of truth)
//! - `reader`: bounds-checked cursor reads with explicit endianness
//! - `packed`: extraction of the 32-bit layer word
//! - `parser`: the animations -> frames -> layers walk
//! - `error`: the single `OutOfBounds` failure
//!
//! The parser is pure and contains no I/O or logging.
//!
//! Version française (résumé):
//! Positions et largeurs dans `layout`, lectures bornées dans `reader`,
//! extraction des bits dans `packed`, parcours dans `parser`.

pub mod error;
pub mod layout;
pub mod packed;
pub mod parser;
pub mod reader;

pub use error::DecodeError;
pub use packed::LayerPlacement;
pub use parser::decode;
