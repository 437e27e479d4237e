/// Package id whose file starts with the package count byte.
pub const INDEX_PACKAGE_ID: u32 = 0;

pub const NUM_FRAMES_LEN: usize = 1;
pub const DELAY_LEN: usize = 1;
pub const NUM_LAYERS_LEN: usize = 1;
pub const FRAME_HEADER_LEN: usize = DELAY_LEN + NUM_LAYERS_LEN;

pub const RECT_FIELD_LEN: usize = 2;
pub const RECT_LEN: usize = 4 * RECT_FIELD_LEN;
pub const PACKED_LEN: usize = 4;
pub const LAYER_LEN: usize = RECT_LEN + PACKED_LEN;

// Packed layer word, bit 0 = least significant.
pub const SPRITE_INDEX_SHIFT: u32 = 23;
pub const SPRITE_INDEX_MASK: u32 = 0x1FF;
pub const X_OFFSET_SHIFT: u32 = 13;
pub const Y_OFFSET_SHIFT: u32 = 3;
pub const OFFSET_MASK: u32 = 0x3FF;
pub const OFFSET_BIAS: i16 = 512;
pub const TRANSFORM_MASK: u32 = 0x7;
