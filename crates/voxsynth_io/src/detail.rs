//! Detailed-tile emission: upsample a synthesized low-resolution grid using
//! per-label detail tiles harvested from a matching high-resolution exemplar.

use voxsynth_core::{Exemplar, Grid, RawVoxelGrid, PALETTE_EMPTY};

/// The low-res and high-res exemplars don't share an integer tile ratio.
#[derive(Debug, thiserror::Error)]
#[error("high-res exemplar ({hw}x{hh}x{hd}) is not an integer multiple of low-res ({lw}x{lh}x{ld})")]
pub struct DimensionMismatch {
    pub lw: usize,
    pub lh: usize,
    pub ld: usize,
    pub hw: usize,
    pub hh: usize,
    pub hd: usize,
}

/// A palette-index -> high-resolution detail tile map, derived from a
/// low-res/high-res exemplar pair.
#[derive(Debug, Clone)]
pub struct DetailedTileMap {
    tile_dims: (usize, usize, usize),
    /// `tiles[palette_index]`, local `(bz * ty + by) * tx + bx` order.
    tiles: Vec<Option<Vec<u8>>>,
}

impl DetailedTileMap {
    /// Scan `low_res` for each palette index's first detail-bearing block in
    /// `high_res` (a block that contains both empty and non-empty voxels).
    pub fn build(low_res: &RawVoxelGrid, high_res: &RawVoxelGrid) -> Result<Self, DimensionMismatch> {
        if high_res.width % low_res.width != 0 || high_res.height % low_res.height != 0 || high_res.depth % low_res.depth != 0 {
            return Err(DimensionMismatch {
                lw: low_res.width,
                lh: low_res.height,
                ld: low_res.depth,
                hw: high_res.width,
                hh: high_res.height,
                hd: high_res.depth,
            });
        }
        let tx = high_res.width / low_res.width;
        let ty = high_res.height / low_res.height;
        let tz = high_res.depth / low_res.depth;

        let mut tiles: Vec<Option<Vec<u8>>> = vec![None; 256];
        for z in 0..low_res.depth {
            for y in 0..low_res.height {
                for x in 0..low_res.width {
                    let p = low_res.get(x, y, z) as usize;
                    if tiles[p].is_some() {
                        continue;
                    }
                    let mut block = Vec::with_capacity(tx * ty * tz);
                    let mut has_empty = false;
                    let mut has_solid = false;
                    for bz in 0..tz {
                        for by in 0..ty {
                            for bx in 0..tx {
                                let v = high_res.get(x * tx + bx, y * ty + by, z * tz + bz);
                                if v == PALETTE_EMPTY {
                                    has_empty = true;
                                } else {
                                    has_solid = true;
                                }
                                block.push(v);
                            }
                        }
                    }
                    if has_empty && has_solid {
                        tiles[p] = Some(block);
                    }
                }
            }
        }

        Ok(Self {
            tile_dims: (tx, ty, tz),
            tiles,
        })
    }

    /// Render a synthesized grid at full detail resolution.
    ///
    /// Settled cells with a known detail tile get that tile's shape, with
    /// every solid voxel re-colored to the cell's own label palette index;
    /// settled cells with no known detail get a solid block of that color.
    /// Unsettled cells are rendered as empty.
    pub fn emit(&self, grid: &Grid, exemplar: &Exemplar, palette: [[u8; 3]; 256]) -> RawVoxelGrid {
        let (tx, ty, tz) = self.tile_dims;
        let out_w = grid.width() * tx;
        let out_h = grid.height() * ty;
        let out_d = grid.depth() * tz;
        let mut voxels = vec![PALETTE_EMPTY; out_w * out_h * out_d];

        for (x, y, z) in grid.iter_coords() {
            let cell = grid.at(x, y, z);
            if cell.count() != 1 {
                continue;
            }
            let label = (0..exemplar.num_labels()).find(|&l| cell.test(l)).expect("singleton cell has exactly one label");
            let p = exemplar.palette_index(label);

            for bz in 0..tz {
                for by in 0..ty {
                    for bx in 0..tx {
                        let out_v = match &self.tiles[p as usize] {
                            Some(tile) => {
                                let v = tile[(bz * ty + by) * tx + bx];
                                if v == PALETTE_EMPTY {
                                    PALETTE_EMPTY
                                } else {
                                    p
                                }
                            }
                            None => p,
                        };
                        let gx = x * tx + bx;
                        let gy = y * ty + by;
                        let gz = z * tz + bz;
                        voxels[(gz * out_h + gy) * out_w + gx] = out_v;
                    }
                }
            }
        }

        RawVoxelGrid {
            width: out_w,
            height: out_h,
            depth: out_d,
            voxels,
            palette,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxsynth_core::PossibilitySet;

    fn low_res_2x2x1() -> RawVoxelGrid {
        RawVoxelGrid {
            width: 2,
            height: 2,
            depth: 1,
            voxels: vec![255, 0, 0, 0],
            palette: [[0, 0, 0]; 256],
        }
    }

    /// Same footprint, tile 2x2x2: label 0's block has a detail pocket, 255's does not.
    fn high_res_4x4x2() -> RawVoxelGrid {
        let mut voxels = vec![0u8; 4 * 4 * 2];
        let set = |voxels: &mut Vec<u8>, x: usize, y: usize, z: usize, v: u8| {
            voxels[(z * 4 + y) * 4 + x] = v;
        };
        for z in 0..2 {
            for y in 0..4 {
                for x in 0..4 {
                    set(&mut voxels, x, y, z, 255);
                }
            }
        }
        // Low-res (1,0,0) maps to block x in [2,4), y in [0,2), z in [0,2).
        // Give it one solid voxel amid empties: detail present.
        set(&mut voxels, 2, 0, 0, 0);
        RawVoxelGrid {
            width: 4,
            height: 4,
            depth: 2,
            voxels,
            palette: [[0, 0, 0]; 256],
        }
    }

    #[test]
    fn build_finds_detail_only_where_a_block_mixes_empty_and_solid() {
        let low = low_res_2x2x1();
        let high = high_res_4x4x2();
        let map = DetailedTileMap::build(&low, &high).unwrap();
        assert!(map.tiles[0].is_some());
        assert!(map.tiles[255].is_none());
    }

    #[test]
    fn emit_upsamples_by_the_tile_ratio() {
        let low = low_res_2x2x1();
        let high = high_res_4x4x2();
        let map = DetailedTileMap::build(&low, &high).unwrap();

        let raw = RawVoxelGrid {
            width: 2,
            height: 2,
            depth: 1,
            voxels: vec![255, 0, 0, 0],
            palette: [[0, 0, 0]; 256],
        };
        let exemplar = Exemplar::ingest(&raw).unwrap();
        let mut grid = Grid::new(2, 2, 1, false);
        for y in 0..2 {
            for x in 0..2 {
                let label = exemplar.label_for_palette_index(raw.get(x, y, 0)).unwrap();
                *grid.at_mut(x, y, 0) = PossibilitySet::singleton(label);
            }
        }

        let out = map.emit(&grid, &exemplar, [[0, 0, 0]; 256]);
        assert_eq!(out.width, 4);
        assert_eq!(out.height, 4);
        assert_eq!(out.depth, 2);
    }
}
