//! Reader/writer for the "voxel slab" binary format: a little-endian
//! dimensions header, a payload of one palette-index byte per voxel, and a
//! trailing 256-entry RGB palette.

use voxsynth_core::RawVoxelGrid;

const HEADER_LEN: usize = 12;
const PALETTE_LEN: usize = 256 * 3;

/// A slab file was malformed.
#[derive(Debug, thiserror::Error)]
pub enum SlabError {
    #[error("slab file is too short: needed at least {needed} bytes, found {found}")]
    TooShort { needed: usize, found: usize },
    #[error("slab dimensions are implausible: {width} x {height} x {depth}")]
    InvalidDimensions { width: i32, height: i32, depth: i32 },
}

/// Parse a slab file's bytes into a [`RawVoxelGrid`].
///
/// Voxel order in the payload is `x` outermost, then `y`, then `z`
/// *reversed* (from `D-1` down to `0`); the returned grid's internal
/// storage is always z-ascending, so this function un-reverses on the way in.
pub fn read_slab(bytes: &[u8]) -> Result<RawVoxelGrid, SlabError> {
    if bytes.len() < HEADER_LEN {
        return Err(SlabError::TooShort {
            needed: HEADER_LEN,
            found: bytes.len(),
        });
    }
    let width = i32::from_le_bytes(bytes[0..4].try_into().unwrap());
    let height = i32::from_le_bytes(bytes[4..8].try_into().unwrap());
    let depth = i32::from_le_bytes(bytes[8..12].try_into().unwrap());
    if width <= 0 || height <= 0 || depth <= 0 {
        return Err(SlabError::InvalidDimensions { width, height, depth });
    }
    let (width, height, depth) = (width as usize, height as usize, depth as usize);

    let voxel_count = width * height * depth;
    let needed = HEADER_LEN + voxel_count + PALETTE_LEN;
    if bytes.len() < needed {
        return Err(SlabError::TooShort {
            needed,
            found: bytes.len(),
        });
    }

    let mut voxels = vec![0u8; voxel_count];
    let mut cursor = HEADER_LEN;
    for x in 0..width {
        for y in 0..height {
            for z in (0..depth).rev() {
                voxels[(z * height + y) * width + x] = bytes[cursor];
                cursor += 1;
            }
        }
    }

    let mut palette = [[0u8; 3]; 256];
    let palette_start = HEADER_LEN + voxel_count;
    for (i, entry) in palette.iter_mut().enumerate() {
        let off = palette_start + i * 3;
        *entry = [bytes[off], bytes[off + 1], bytes[off + 2]];
    }

    Ok(RawVoxelGrid {
        width,
        height,
        depth,
        voxels,
        palette,
    })
}

/// Serialize `grid` to the slab binary layout.
pub fn write_slab(grid: &RawVoxelGrid) -> Vec<u8> {
    let voxel_count = grid.width * grid.height * grid.depth;
    let mut out = Vec::with_capacity(HEADER_LEN + voxel_count + PALETTE_LEN);
    out.extend_from_slice(&(grid.width as i32).to_le_bytes());
    out.extend_from_slice(&(grid.height as i32).to_le_bytes());
    out.extend_from_slice(&(grid.depth as i32).to_le_bytes());

    for x in 0..grid.width {
        for y in 0..grid.height {
            for z in (0..grid.depth).rev() {
                out.push(grid.get(x, y, z));
            }
        }
    }

    for entry in &grid.palette {
        out.extend_from_slice(entry);
    }
    out
}
