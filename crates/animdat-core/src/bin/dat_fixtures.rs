use std::fs;
use std::path::{Path, PathBuf};

const SPRITE_INDEX_SHIFT: u32 = 23;
const X_OFFSET_SHIFT: u32 = 13;
const Y_OFFSET_SHIFT: u32 = 3;
const OFFSET_BIAS: i32 = 512;

fn main() -> Result<(), String> {
    let root = PathBuf::from("tests/golden");

    write_package(
        &root.join("index_empty").join("anims0.dat"),
        PackageSpec::index(1, vec![]),
    )?;
    write_package(
        &root.join("single_layer").join("anims7.dat"),
        PackageSpec::regular(vec![vec![FrameSpec::new(
            -5,
            vec![LayerSpec::new([10, 20, 30, 40], 1, -512, -512, 0)],
        )]]),
    )?;
    write_package(
        &root.join("index_multi").join("anims0.dat"),
        PackageSpec::index(
            12,
            vec![
                vec![
                    FrameSpec::new(
                        4,
                        vec![
                            LayerSpec::new([0, 0, 32, 48], 17, -16, -40, 0),
                            LayerSpec::new([258, 513, 16, 16], 511, 511, -512, 7),
                        ],
                    ),
                    FrameSpec::new(-1, vec![LayerSpec::new([65535, 1, 2, 3], 300, 0, 0, 5)]),
                ],
                vec![],
                vec![FrameSpec::new(-128, vec![])],
            ],
        ),
    )?;
    write_package(
        &root.join("trailing_padding").join("anims3.dat"),
        PackageSpec::regular(vec![vec![FrameSpec::new(
            127,
            vec![LayerSpec::new([1, 2, 3, 4], 42, 10, -10, 2)],
        )]])
        .with_trailer(vec![0, 0]),
    )?;
    Ok(())
}

struct PackageSpec {
    num_packages: Option<u8>,
    animations: Vec<Vec<FrameSpec>>,
    trailer: Vec<u8>,
}

struct FrameSpec {
    delay: i8,
    layers: Vec<LayerSpec>,
}

struct LayerSpec {
    rect: [u16; 4],
    sprite_index: u16,
    x_offset: i16,
    y_offset: i16,
    transform: u8,
}

impl PackageSpec {
    fn index(num_packages: u8, animations: Vec<Vec<FrameSpec>>) -> Self {
        Self {
            num_packages: Some(num_packages),
            animations,
            trailer: Vec::new(),
        }
    }

    fn regular(animations: Vec<Vec<FrameSpec>>) -> Self {
        Self {
            num_packages: None,
            animations,
            trailer: Vec::new(),
        }
    }

    fn with_trailer(mut self, trailer: Vec<u8>) -> Self {
        self.trailer = trailer;
        self
    }
}

impl FrameSpec {
    fn new(delay: i8, layers: Vec<LayerSpec>) -> Self {
        Self { delay, layers }
    }
}

impl LayerSpec {
    fn new(rect: [u16; 4], sprite_index: u16, x_offset: i16, y_offset: i16, transform: u8) -> Self {
        Self {
            rect,
            sprite_index,
            x_offset,
            y_offset,
            transform,
        }
    }

    fn packed(&self) -> u32 {
        let x = (i32::from(self.x_offset) + OFFSET_BIAS) as u32;
        let y = (i32::from(self.y_offset) + OFFSET_BIAS) as u32;
        (u32::from(self.sprite_index) << SPRITE_INDEX_SHIFT)
            | (x << X_OFFSET_SHIFT)
            | (y << Y_OFFSET_SHIFT)
            | u32::from(self.transform)
    }
}

fn write_package(path: &Path, spec: PackageSpec) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| format!("failed to create {}: {}", parent.display(), err))?;
    }
    let num_animations = u16::try_from(spec.animations.len())
        .map_err(|_| format!("too many animations for {}", path.display()))?;

    let mut bytes = Vec::new();
    bytes.extend(spec.num_packages);
    bytes.extend_from_slice(&num_animations.to_be_bytes());
    for frames in &spec.animations {
        bytes.push(count_u8(frames.len(), path)?);
        for frame in frames {
            bytes.extend_from_slice(&frame.delay.to_be_bytes());
            bytes.push(count_u8(frame.layers.len(), path)?);
            for layer in &frame.layers {
                for value in layer.rect {
                    bytes.extend_from_slice(&value.to_le_bytes());
                }
                bytes.extend_from_slice(&layer.packed().to_be_bytes());
            }
        }
    }
    bytes.extend_from_slice(&spec.trailer);

    fs::write(path, bytes).map_err(|err| format!("failed to write {}: {}", path.display(), err))
}

fn count_u8(len: usize, path: &Path) -> Result<u8, String> {
    u8::try_from(len).map_err(|_| format!("count {} does not fit a byte in {}", len, path.display()))
}
