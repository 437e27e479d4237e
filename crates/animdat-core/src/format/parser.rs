use super::error::DecodeError;
use super::layout;
use super::packed::LayerPlacement;
use super::reader::AnimReader;
use crate::{Animation, DecodedPackage, Diagnostics, Frame, Layer, Package, Rect};

#[derive(Debug, Default)]
struct Tally {
    frames: u32,
    layers: u32,
    max_sprite_index: u16,
}

/// Decode one animation package from `buffer`.
///
/// `package_id` is caller context: package 0 carries a leading package count
/// byte, every other package starts directly with the animation count.
///
/// # Errors
/// Returns `DecodeError::OutOfBounds` as soon as a read would run past the end
/// of the buffer; nothing is returned for a partially decoded package.
///
/// # Examples
/// ```
/// use animdat_core::decode;
///
/// let buffer = [
///     0x00, 0x01, // num_animations (BE)
///     0x01, // num_frames
///     0xfb, 0x01, // delay = -5, num_layers
///     0x0a, 0x00, 0x14, 0x00, 0x1e, 0x00, 0x28, 0x00, // rect (LE)
///     0x00, 0x80, 0x00, 0x00, // packed (BE)
/// ];
/// let decoded = decode(&buffer, 7)?;
/// let layer = &decoded.package.animations[0].frames[0].layers[0];
/// assert_eq!(layer.rect.h, 40);
/// assert_eq!(layer.sprite_index, 1);
/// assert!(decoded.diagnostics.is_fully_consumed());
/// # Ok::<(), animdat_core::DecodeError>(())
/// ```
pub fn decode(buffer: &[u8], package_id: u32) -> Result<DecodedPackage, DecodeError> {
    let mut reader = AnimReader::new(buffer);

    let num_packages = if package_id == layout::INDEX_PACKAGE_ID {
        Some(reader.read_u8("num_packages")?)
    } else {
        None
    };
    let num_animations = reader.read_u16_be("num_animations")?;

    let mut tally = Tally::default();
    let mut animations = Vec::with_capacity(capacity(
        &reader,
        num_animations.into(),
        layout::NUM_FRAMES_LEN,
    ));
    for id in 0..num_animations {
        animations.push(read_animation(&mut reader, id, &mut tally)?);
    }

    let diagnostics = Diagnostics {
        num_packages,
        num_animations,
        num_frames: tally.frames,
        num_layers: tally.layers,
        max_sprite_index: tally.max_sprite_index,
        bytes_consumed: reader.offset(),
        buffer_len: reader.buffer_len(),
    };
    let package = Package {
        package_id,
        num_packages,
        num_animations,
        animations,
        max_sprite_index: tally.max_sprite_index,
    };

    Ok(DecodedPackage {
        package,
        diagnostics,
    })
}

// Declared counts come from the buffer, so never reserve more records than
// the remaining bytes could hold.
fn capacity(reader: &AnimReader<'_>, declared: usize, record_len: usize) -> usize {
    declared.min(reader.max_records(record_len))
}

fn read_animation(
    reader: &mut AnimReader<'_>,
    id: u16,
    tally: &mut Tally,
) -> Result<Animation, DecodeError> {
    let num_frames = reader.read_u8("num_frames")?;

    let mut frames = Vec::with_capacity(capacity(
        reader,
        num_frames.into(),
        layout::FRAME_HEADER_LEN,
    ));
    for id in 0..num_frames {
        frames.push(read_frame(reader, id, tally)?);
    }
    tally.frames += u32::from(num_frames);

    Ok(Animation { id, frames })
}

fn read_frame(reader: &mut AnimReader<'_>, id: u8, tally: &mut Tally) -> Result<Frame, DecodeError> {
    let delay = reader.read_i8("delay")?;
    let num_layers = reader.read_u8("num_layers")?;

    let mut layers = Vec::with_capacity(capacity(reader, num_layers.into(), layout::LAYER_LEN));
    for _ in 0..num_layers {
        layers.push(read_layer(reader, tally)?);
    }
    tally.layers += u32::from(num_layers);

    Ok(Frame { id, delay, layers })
}

fn read_layer(reader: &mut AnimReader<'_>, tally: &mut Tally) -> Result<Layer, DecodeError> {
    let x = reader.read_u16_le("rect.x")?;
    let y = reader.read_u16_le("rect.y")?;
    let w = reader.read_u16_le("rect.w")?;
    let h = reader.read_u16_le("rect.h")?;
    let packed = reader.read_u32_be("packed")?;

    let placement = LayerPlacement::unpack(packed);
    tally.max_sprite_index = tally.max_sprite_index.max(placement.sprite_index);

    Ok(Layer {
        rect: Rect { x, y, w, h },
        sprite_index: placement.sprite_index,
        x_offset: placement.x_offset,
        y_offset: placement.y_offset,
        transform: placement.transform,
        packed_raw: packed,
    })
}

#[cfg(test)]
mod tests {
    use super::decode;
    use crate::format::error::DecodeError;

    fn layer_bytes(rect: [u16; 4], packed: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        for value in rect {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes.extend_from_slice(&packed.to_be_bytes());
        bytes
    }

    fn single_layer_package(num_packages: Option<u8>, delay: i8, packed: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend(num_packages);
        bytes.extend_from_slice(&1u16.to_be_bytes());
        bytes.push(1);
        bytes.push(delay as u8);
        bytes.push(1);
        bytes.extend(layer_bytes([10, 20, 30, 40], packed));
        bytes
    }

    #[test]
    fn index_package_with_no_animations() {
        let decoded = decode(&[0x01, 0x00, 0x00], 0).unwrap();
        assert_eq!(decoded.package.package_id, 0);
        assert_eq!(decoded.package.num_packages, Some(1));
        assert_eq!(decoded.package.num_animations, 0);
        assert!(decoded.package.animations.is_empty());
        assert_eq!(decoded.package.max_sprite_index, 0);
        assert_eq!(decoded.diagnostics.bytes_consumed, 3);
        assert!(decoded.diagnostics.is_fully_consumed());
    }

    #[test]
    fn single_layer_decodes_every_field() {
        let buffer = single_layer_package(Some(1), -5, 0x0080_0000);
        let decoded = decode(&buffer, 0).unwrap();

        let frame = &decoded.package.animations[0].frames[0];
        assert_eq!(frame.delay, -5);
        let layer = &frame.layers[0];
        assert_eq!(
            (layer.rect.x, layer.rect.y, layer.rect.w, layer.rect.h),
            (10, 20, 30, 40)
        );
        assert_eq!(layer.sprite_index, 1);
        assert_eq!(layer.x_offset, -512);
        assert_eq!(layer.y_offset, -512);
        assert_eq!(layer.transform, 0);
        assert_eq!(layer.packed_raw, 0x0080_0000);
        assert_eq!(decoded.diagnostics.bytes_consumed, buffer.len());
        assert_eq!(decoded.diagnostics.max_sprite_index, 1);
    }

    #[test]
    fn non_index_package_has_no_package_count() {
        let buffer = single_layer_package(None, 3, 0);
        let decoded = decode(&buffer, 4).unwrap();
        assert_eq!(decoded.package.package_id, 4);
        assert_eq!(decoded.package.num_packages, None);
        assert_eq!(decoded.diagnostics.num_packages, None);
        assert_eq!(decoded.package.animations.len(), 1);
    }

    #[test]
    fn package_id_decides_header_shape() {
        // Read as package 0 the first byte becomes the package count and the
        // animation count shifts by one byte.
        let buffer = [0x00, 0x00, 0x00];
        let as_index = decode(&buffer, 0).unwrap();
        assert_eq!(as_index.package.num_packages, Some(0));
        assert_eq!(as_index.diagnostics.bytes_consumed, 3);

        let as_other = decode(&buffer, 1).unwrap();
        assert_eq!(as_other.diagnostics.bytes_consumed, 2);
        assert_eq!(as_other.diagnostics.trailing_bytes(), 1);
    }

    #[test]
    fn counts_match_declared_structure() {
        let mut buffer = vec![0x02];
        buffer.extend_from_slice(&3u16.to_be_bytes());
        // animation 0: two frames with 2 and 0 layers
        buffer.push(2);
        buffer.extend_from_slice(&[4, 2]);
        buffer.extend(layer_bytes([0, 0, 8, 8], 5 << 23));
        buffer.extend(layer_bytes([8, 0, 8, 8], 9 << 23));
        buffer.extend_from_slice(&[0x80, 0]);
        // animation 1: no frames
        buffer.push(0);
        // animation 2: one frame, one layer
        buffer.push(1);
        buffer.extend_from_slice(&[1, 1]);
        buffer.extend(layer_bytes([0, 0, 1, 1], 7 << 23));

        let decoded = decode(&buffer, 0).unwrap();
        let animations = &decoded.package.animations;
        assert_eq!(animations.len(), 3);
        assert_eq!(animations[0].frames.len(), 2);
        assert_eq!(animations[0].frames[0].layers.len(), 2);
        assert_eq!(animations[0].frames[1].layers.len(), 0);
        assert_eq!(animations[0].frames[1].delay, -128);
        assert!(animations[1].frames.is_empty());
        assert_eq!(animations[2].frames[0].layers.len(), 1);

        let ids: Vec<u16> = animations.iter().map(|anim| anim.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(animations[0].frames[1].id, 1);

        assert_eq!(decoded.diagnostics.num_frames, 3);
        assert_eq!(decoded.diagnostics.num_layers, 3);
        assert_eq!(decoded.package.max_sprite_index, 9);
        assert!(decoded.diagnostics.is_fully_consumed());
    }

    #[test]
    fn trailing_bytes_are_reported_not_rejected() {
        let mut buffer = single_layer_package(None, 0, 0);
        buffer.extend_from_slice(&[0, 0]);
        let decoded = decode(&buffer, 9).unwrap();
        assert_eq!(decoded.diagnostics.trailing_bytes(), 2);
        assert_eq!(decoded.diagnostics.buffer_len, buffer.len());
    }

    #[test]
    fn empty_buffer_is_out_of_bounds() {
        let err = decode(&[], 0).unwrap_err();
        assert_eq!(
            err,
            DecodeError::OutOfBounds {
                field: "num_packages",
                at_offset: 0,
                needed_bytes: 1,
                available_bytes: 0,
            }
        );

        let err = decode(&[], 2).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::OutOfBounds {
                field: "num_animations",
                ..
            }
        ));
    }

    #[test]
    fn truncated_packed_word_reports_position() {
        let buffer = single_layer_package(None, 0, 0x0080_0000);
        let err = decode(&buffer[..buffer.len() - 1], 7).unwrap_err();
        assert_eq!(
            err,
            DecodeError::OutOfBounds {
                field: "packed",
                at_offset: 13,
                needed_bytes: 4,
                available_bytes: 3,
            }
        );
    }

    #[test]
    fn truncated_rect_reports_field() {
        let buffer = single_layer_package(None, 0, 0);
        // header (2) + num_frames (1) + frame header (2) + x (2) + one byte of y
        let err = decode(&buffer[..8], 7).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::OutOfBounds {
                field: "rect.y",
                at_offset: 7,
                ..
            }
        ));
    }

    #[test]
    fn oversized_counts_fail_without_panicking() {
        let err = decode(&[0xff, 0xff], 1).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::OutOfBounds {
                field: "num_frames",
                at_offset: 2,
                ..
            }
        ));

        let err = decode(&[0x00, 0x01, 0xff, 0x00, 0xff], 1).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::OutOfBounds {
                field: "rect.x",
                at_offset: 5,
                ..
            }
        ));
    }
}
