//! The worklist propagator that restores arc consistency after a local restriction.

use std::collections::VecDeque;

use voxsynth_core::{ConstraintTable, Direction, Grid};

/// A cell's possibility set became empty during propagation.
///
/// The grid is left in a partially-propagated state when this is returned;
/// callers that want to retry must revert from a backup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("propagation found a cell with no possible labels")]
pub struct Contradiction;

/// Restore arc consistency over `grid` after `seed` was just restricted.
///
/// Maintains a FIFO worklist seeded with `seed`; for every popped cell, each
/// of its six neighbors is re-checked and re-enqueued if its possibility set
/// shrunk. Returns as soon as any cell's possibilities become empty.
pub fn propagate(
    seed: (usize, usize, usize),
    grid: &mut Grid,
    constraints: &ConstraintTable,
    num_labels: usize,
) -> Result<(), Contradiction> {
    let mut worklist: VecDeque<(usize, usize, usize)> = VecDeque::new();
    worklist.push_back(seed);

    while let Some((cx, cy, cz)) = worklist.pop_front() {
        for dir in Direction::ALL {
            let Some((nx, ny, nz)) = grid.neighbor(cx, cy, cz, dir) else {
                continue;
            };

            let shrunk = restrict_to_supported(grid, (cx, cy, cz), (nx, ny, nz), dir, constraints, num_labels);
            if shrunk {
                if grid.at(nx, ny, nz).is_empty() {
                    return Err(Contradiction);
                }
                worklist.push_back((nx, ny, nz));
            }
        }
    }

    Ok(())
}

/// Clear labels at `n` that no longer have a supporting label at `c` in the
/// direction from `c` to `n`. Returns `true` if `n`'s possibility set shrunk.
fn restrict_to_supported(
    grid: &mut Grid,
    c: (usize, usize, usize),
    n: (usize, usize, usize),
    dir_c_to_n: Direction,
    constraints: &ConstraintTable,
    num_labels: usize,
) -> bool {
    let c_possible = *grid.at(c.0, c.1, c.2);
    // The fast table is consulted in the incoming direction: for a label `b`
    // possible at `n`, it is supported iff some `a` possible at `c` lists `b`
    // as allowed in the direction from `c` to `n` — equivalently, `a` is
    // listed as allowed at `b` in the opposite direction (from `n` to `c`).
    let incoming = dir_c_to_n.opposite();

    let mut shrunk = false;
    let n_cell = grid.at_mut(n.0, n.1, n.2);
    for b in 0..num_labels {
        if !n_cell.test(b) {
            continue;
        }
        let supported = constraints
            .allowed(incoming, b)
            .iter()
            .any(|&a| c_possible.test(a));
        if !supported {
            n_cell.set(b, false);
            shrunk = true;
        }
    }
    shrunk
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxsynth_core::{Exemplar, PossibilitySet, RawVoxelGrid};

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
    fn propagate_is_noop_on_arc_consistent_grid() {
        let ex = ground_exemplar();
        let empty = ex.empty_label().unwrap();
        let mut grid = Grid::new(1, 1, 3, false);
        for z in 0..3 {
            *grid.at_mut(0, 0, z) = PossibilitySet::singleton(empty);
        }
        let before = grid.clone();
        propagate((0, 0, 0), &mut grid, ex.constraints(), ex.num_labels()).unwrap();
        for z in 0..3 {
            assert_eq!(grid.at(0, 0, z), before.at(0, 0, z));
        }
    }

    /// 2x2x3: z=0 GROUND, z=1 EMPTY, z=2 a third, unrelated label. With only
    /// two z-layers a periodic ingest would wrap EMPTY's `+z` neighbor onto
    /// GROUND and manufacture an (EMPTY, GROUND) pair that was never actually
    /// observed; the third layer breaks that wrap-adjacency so the only
    /// recorded z-order is GROUND below EMPTY, never the reverse.
    fn ground_exemplar_three_layers() -> Exemplar {
        let mut voxels = vec![0u8; 12];
        for y in 0..2 {
            for x in 0..2 {
                voxels[(0 * 2 + y) * 2 + x] = 254;
                voxels[(1 * 2 + y) * 2 + x] = 255;
                voxels[(2 * 2 + y) * 2 + x] = 1;
            }
        }
        let raw = RawVoxelGrid {
            width: 2,
            height: 2,
            depth: 3,
            voxels,
            palette: [[0, 0, 0]; 256],
        };
        Exemplar::ingest(&raw).unwrap()
    }

    #[test]
    fn propagate_detects_contradiction_for_empty_below_ground() {
        let ex = ground_exemplar_three_layers();
        let empty = ex.empty_label().unwrap();
        let ground = ex.ground_label().unwrap();
        let mut grid = Grid::new(1, 1, 3, false);
        for z in 0..3 {
            *grid.at_mut(0, 0, z) = PossibilitySet::all(ex.num_labels());
        }
        // Force EMPTY below GROUND: never observed in the exemplar (only
        // GROUND below EMPTY was).
        *grid.at_mut(0, 0, 0) = PossibilitySet::singleton(empty);
        *grid.at_mut(0, 0, 1) = PossibilitySet::singleton(ground);

        let result = propagate((0, 0, 0), &mut grid, ex.constraints(), ex.num_labels());
        assert_eq!(result, Err(Contradiction));
    }

    #[test]
    fn propagate_only_ever_clears_bits() {
        let ex = ground_exemplar();
        let mut grid = Grid::new(2, 2, 2, true);
        for (x, y, z) in grid.iter_coords().collect::<Vec<_>>() {
            *grid.at_mut(x, y, z) = PossibilitySet::all(ex.num_labels());
        }
        *grid.at_mut(0, 0, 0) = PossibilitySet::singleton(ex.ground_label().unwrap());

        let before = grid.clone();
        let _ = propagate((0, 0, 0), &mut grid, ex.constraints(), ex.num_labels());

        for (x, y, z) in grid.iter_coords().collect::<Vec<_>>() {
            let was = before.at(x, y, z);
            let now = grid.at(x, y, z);
            for l in 0..ex.num_labels() {
                if now.test(l) {
                    assert!(was.test(l), "label {l} reappeared at ({x},{y},{z})");
                }
            }
        }
    }
}
