//! `0x`-prefixed lowercase hex representation for raw packed words.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

pub(crate) fn serialize<S: Serializer>(value: &u32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{value:#x}"))
}

pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let raw = String::deserialize(deserializer)?;
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .ok_or_else(|| D::Error::custom(format!("expected 0x-prefixed hex, got '{raw}'")))?;
    u32::from_str_radix(digits, 16)
        .map_err(|err| D::Error::custom(format!("invalid hex '{raw}': {err}")))
}
