use super::layout;

/// Sub-fields of the 32-bit packed layer word.
///
/// # Examples
/// ```
/// use animdat_core::LayerPlacement;
///
/// let placement = LayerPlacement::unpack(0x0080_0000);
/// assert_eq!(placement.sprite_index, 1);
/// assert_eq!(placement.x_offset, -512);
/// assert_eq!(placement.y_offset, -512);
/// assert_eq!(placement.transform, 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerPlacement {
    /// Bits 23..=31.
    pub sprite_index: u16,
    /// Bits 13..=22, minus 512.
    pub x_offset: i16,
    /// Bits 3..=12, minus 512.
    pub y_offset: i16,
    /// Bits 0..=2.
    pub transform: u8,
}

impl LayerPlacement {
    pub fn unpack(packed: u32) -> Self {
        Self {
            sprite_index: field(packed, layout::SPRITE_INDEX_SHIFT, layout::SPRITE_INDEX_MASK) as u16,
            x_offset: biased_offset(packed, layout::X_OFFSET_SHIFT),
            y_offset: biased_offset(packed, layout::Y_OFFSET_SHIFT),
            transform: field(packed, 0, layout::TRANSFORM_MASK) as u8,
        }
    }
}

fn field(packed: u32, shift: u32, mask: u32) -> u32 {
    (packed >> shift) & mask
}

fn biased_offset(packed: u32, shift: u32) -> i16 {
    // 10-bit field, always fits in i16 before the bias is removed.
    field(packed, shift, layout::OFFSET_MASK) as i16 - layout::OFFSET_BIAS
}
