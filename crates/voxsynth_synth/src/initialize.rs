//! Seeding a fresh grid before synthesis: uniform soup, empty space bordered
//! by a forced-empty shell, or empty space with an optional ground plane at
//! z=0.

use voxsynth_core::{Exemplar, Grid, PossibilitySet};

use crate::propagate::{propagate, Contradiction};

/// Fill every cell of `grid` with every label the exemplar knows about.
///
/// This is the "soup" starting point: maximally unconstrained, left for the
/// synthesizer and propagator to collapse.
pub fn init_soup(grid: &mut Grid, exemplar: &Exemplar) {
    let all = PossibilitySet::all(exemplar.num_labels());
    for (x, y, z) in grid.iter_coords().collect::<Vec<_>>() {
        *grid.at_mut(x, y, z) = all;
    }
}

/// Fill every cell with every label, then force every cell on a face of the
/// bounding box to the sole label `EMPTY` and propagate inward from it.
///
/// Used when the client wants to forbid anything touching the domain
/// boundary. Returns `Ok(false)` without touching the grid if the exemplar
/// has no `EMPTY` label, or a contradiction if the exemplar cannot sustain
/// an all-empty border.
pub fn init_empty_with_border(grid: &mut Grid, exemplar: &Exemplar) -> Result<bool, Contradiction> {
    let Some(empty) = exemplar.empty_label() else {
        return Ok(false);
    };
    init_soup(grid, exemplar);

    let (w, h, d) = (grid.width(), grid.height(), grid.depth());
    let is_face = |x: usize, y: usize, z: usize| x == 0 || x == w - 1 || y == 0 || y == h - 1 || z == 0 || z == d - 1;
    let singleton = PossibilitySet::singleton(empty);

    let faces: Vec<_> = grid.iter_coords().filter(|&(x, y, z)| is_face(x, y, z)).collect();
    for (x, y, z) in faces {
        *grid.at_mut(x, y, z) = singleton;
        propagate((x, y, z), grid, exemplar.constraints(), exemplar.num_labels())?;
    }
    Ok(true)
}

/// Restrict every cell to `EMPTY` at `z > 0`, and to `GROUND` (or `EMPTY` if
/// the exemplar has no `GROUND` label) at `z = 0`, then propagate from every
/// cell defensively.
///
/// These assignments are trivially consistent for most exemplars, but
/// propagation runs anyway in case the exemplar's constraints rule one of
/// them out. Returns `Ok(false)` without touching the grid if the exemplar
/// has no `EMPTY` label at all, or a contradiction if defensive propagation
/// fails.
pub fn init_empty_with_ground(grid: &mut Grid, exemplar: &Exemplar) -> Result<bool, Contradiction> {
    let Some(empty) = exemplar.empty_label() else {
        return Ok(false);
    };
    let ground = exemplar.ground_label().unwrap_or(empty);

    let empty_set = PossibilitySet::singleton(empty);
    let ground_set = PossibilitySet::singleton(ground);
    let coords: Vec<_> = grid.iter_coords().collect();
    for &(x, y, z) in &coords {
        *grid.at_mut(x, y, z) = if z == 0 { ground_set } else { empty_set };
    }
    for (x, y, z) in coords {
        propagate((x, y, z), grid, exemplar.constraints(), exemplar.num_labels())?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxsynth_core::RawVoxelGrid;

    fn ground_exemplar() -> Exemplar {
        let mut voxels = vec![0u8; 8];
        for y in 0..2 {
            for x in 0..2 {
                voxels[(0 * 2 + y) * 2 + x] = 254;
                voxels[(1 * 2 + y) * 2 + x] = 255;
            }
        }
        let raw = RawVoxelGrid {
            width: 2,
            height: 2,
            depth: 2,
            voxels,
            palette: [[0, 0, 0]; 256],
        };
        Exemplar::ingest(&raw).unwrap()
    }

    #[test]
    fn init_soup_fills_every_cell_with_every_label() {
        let ex = ground_exemplar();
        let mut grid = Grid::new(2, 2, 2, false);
        init_soup(&mut grid, &ex);
        for (x, y, z) in grid.iter_coords().collect::<Vec<_>>() {
            assert_eq!(grid.at(x, y, z).count() as usize, ex.num_labels());
        }
    }

    #[test]
    fn init_empty_with_border_settles_the_whole_grid_to_empty() {
        // Ground exemplar only allows same-label neighbors on x/y, so forcing
        // the border to EMPTY propagates EMPTY all the way to the interior.
        let ex = ground_exemplar();
        let mut grid = Grid::new(4, 4, 4, false);
        assert_eq!(init_empty_with_border(&mut grid, &ex), Ok(true));
        let empty = ex.empty_label().unwrap();
        for (x, y, z) in grid.iter_coords().collect::<Vec<_>>() {
            assert_eq!(grid.at(x, y, z).count(), 1);
            assert!(grid.at(x, y, z).test(empty));
        }
    }

    #[test]
    fn init_empty_with_border_is_noop_without_an_empty_label() {
        let raw = RawVoxelGrid {
            width: 2,
            height: 2,
            depth: 2,
            voxels: vec![0; 8],
            palette: [[0, 0, 0]; 256],
        };
        let ex = Exemplar::ingest(&raw).unwrap();
        let mut grid = Grid::new(3, 3, 3, false);
        assert_eq!(init_empty_with_border(&mut grid, &ex), Ok(false));
        for (x, y, z) in grid.iter_coords().collect::<Vec<_>>() {
            assert!(grid.at(x, y, z).is_empty());
        }
    }

    #[test]
    fn init_empty_with_ground_seeds_only_z_zero() {
        let ex = ground_exemplar();
        let mut grid = Grid::new(2, 2, 3, false);
        assert_eq!(init_empty_with_ground(&mut grid, &ex), Ok(true));
        let empty = ex.empty_label().unwrap();
        let ground = ex.ground_label().unwrap();
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            assert!(grid.at(x, y, 0).test(ground));
            assert!(grid.at(x, y, 1).test(empty));
            assert!(grid.at(x, y, 2).test(empty));
        }
    }

    #[test]
    fn init_empty_with_ground_falls_back_to_empty_when_ground_is_absent() {
        let raw = RawVoxelGrid {
            width: 2,
            height: 2,
            depth: 2,
            voxels: vec![255; 8],
            palette: [[0, 0, 0]; 256],
        };
        let ex = Exemplar::ingest(&raw).unwrap();
        let mut grid = Grid::new(2, 2, 3, false);
        assert_eq!(init_empty_with_ground(&mut grid, &ex), Ok(true));
        let empty = ex.empty_label().unwrap();
        for (x, y, z) in grid.iter_coords().collect::<Vec<_>>() {
            assert_eq!(grid.at(x, y, z).count(), 1);
            assert!(grid.at(x, y, z).test(empty));
        }
    }

    #[test]
    fn init_empty_with_ground_is_noop_without_an_empty_label() {
        let raw = RawVoxelGrid {
            width: 2,
            height: 2,
            depth: 2,
            voxels: vec![0; 8],
            palette: [[0, 0, 0]; 256],
        };
        let ex = Exemplar::ingest(&raw).unwrap();
        let mut grid = Grid::new(2, 2, 3, false);
        assert_eq!(init_empty_with_ground(&mut grid, &ex), Ok(false));
        for (x, y, z) in grid.iter_coords().collect::<Vec<_>>() {
            assert!(grid.at(x, y, z).is_empty());
        }
    }
}
