//! Randomized-scan-order collapse of a region of the grid to singleton cells.

use rand::Rng;

use voxsynth_core::{ConstraintTable, Grid, Label, PossibilitySet};

use crate::propagate::{propagate, Contradiction};

/// An inclusive axis-aligned sub-region of a [`Grid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubBox {
    pub min: (usize, usize, usize),
    pub max: (usize, usize, usize),
}

impl SubBox {
    /// The whole of `grid`, as a sub-box.
    pub fn whole_grid(grid: &Grid) -> Self {
        Self {
            min: (0, 0, 0),
            max: (grid.width() - 1, grid.height() - 1, grid.depth() - 1),
        }
    }

    /// `true` if `(x, y, z)` lies on one of this box's six faces.
    pub fn is_boundary(&self, x: usize, y: usize, z: usize) -> bool {
        x == self.min.0 || x == self.max.0 || y == self.min.1 || y == self.max.1 || z == self.min.2 || z == self.max.2
    }

    /// Every coordinate inside this box, x fastest.
    pub fn iter_coords(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        (self.min.2..=self.max.2).flat_map(move |z| {
            (self.min.1..=self.max.1).flat_map(move |y| (self.min.0..=self.max.0).map(move |x| (x, y, z)))
        })
    }
}

/// Count settled (singleton) cells inside `sub_box` whose label is not `empty_label`.
pub fn count_settled_non_empty(grid: &Grid, sub_box: &SubBox, num_labels: usize, empty_label: Option<Label>) -> usize {
    sub_box
        .iter_coords()
        .filter(|&(x, y, z)| {
            let cell = grid.at(x, y, z);
            if cell.count() != 1 {
                return false;
            }
            match empty_label {
                Some(empty) => !cell.test(empty),
                None => true,
            }
        })
        .count()
}

/// Pick a random permutation of the three axes (as a small number of random
/// transpositions) and an independent sign per axis.
fn random_scan_order(rng: &mut impl Rng) -> ([usize; 3], [bool; 3]) {
    let mut perm = [0usize, 1, 2];
    for _ in 0..9 {
        let i = rng.gen_range(0..3);
        let j = rng.gen_range(0..3);
        perm.swap(i, j);
    }
    let signs = [rng.gen_bool(0.5), rng.gen_bool(0.5), rng.gen_bool(0.5)];
    (perm, signs)
}

fn axis_range(lo: usize, hi: usize, reversed: bool) -> Vec<usize> {
    let mut v: Vec<usize> = (lo..=hi).collect();
    if reversed {
        v.reverse();
    }
    v
}

/// Visit every cell of `sub_box` in a randomized scan order, collapsing each
/// to a single randomly-chosen label and propagating the restriction.
///
/// Returns the number of settled non-`empty_label` cells in the box, or the
/// first contradiction encountered.
pub fn synthesize(
    grid: &mut Grid,
    constraints: &ConstraintTable,
    num_labels: usize,
    empty_label: Option<Label>,
    sub_box: &SubBox,
    rng: &mut impl Rng,
) -> Result<usize, Contradiction> {
    let (perm, signs) = random_scan_order(rng);
    let ranges = [
        axis_range(sub_box.min.0, sub_box.max.0, signs[0]),
        axis_range(sub_box.min.1, sub_box.max.1, signs[1]),
        axis_range(sub_box.min.2, sub_box.max.2, signs[2]),
    ];

    for &a0 in &ranges[perm[0]] {
        for &a1 in &ranges[perm[1]] {
            for &a2 in &ranges[perm[2]] {
                let mut coord = [0usize; 3];
                coord[perm[0]] = a0;
                coord[perm[1]] = a1;
                coord[perm[2]] = a2;
                let (x, y, z) = (coord[0], coord[1], coord[2]);

                let choices: Vec<Label> = grid.at(x, y, z).iter(num_labels).collect();
                if choices.is_empty() {
                    return Err(Contradiction);
                }
                let pick = choices[rng.gen_range(0..choices.len())];
                *grid.at_mut(x, y, z) = PossibilitySet::singleton(pick);
                propagate((x, y, z), grid, constraints, num_labels)?;
            }
        }
    }

    Ok(count_settled_non_empty(grid, sub_box, num_labels, empty_label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};
    use voxsynth_core::{Exemplar, RawVoxelGrid};

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
    fn synthesize_settles_every_cell_in_the_box() {
        let ex = ground_exemplar();
        let mut grid = Grid::new(4, 4, 4, true);
        crate::initialize::init_soup(&mut grid, &ex);
        let mut rng = SmallRng::seed_from_u64(7);
        let sub_box = SubBox::whole_grid(&grid);

        let result = synthesize(&mut grid, ex.constraints(), ex.num_labels(), ex.empty_label(), &sub_box, &mut rng);
        assert!(result.is_ok());
        for (x, y, z) in grid.iter_coords().collect::<Vec<_>>() {
            assert_eq!(grid.at(x, y, z).count(), 1, "cell ({x},{y},{z}) was left unsettled");
        }
    }

    #[test]
    fn synthesize_on_singleton_grid_is_a_noop() {
        let ex = ground_exemplar();
        let mut grid = Grid::new(3, 3, 3, true);
        let empty = PossibilitySet::singleton(ex.empty_label().unwrap());
        for (x, y, z) in grid.iter_coords().collect::<Vec<_>>() {
            *grid.at_mut(x, y, z) = empty;
        }
        let before = grid.clone();
        let mut rng = SmallRng::seed_from_u64(1);
        let sub_box = SubBox::whole_grid(&grid);
        let result = synthesize(&mut grid, ex.constraints(), ex.num_labels(), ex.empty_label(), &sub_box, &mut rng);
        assert_eq!(result.unwrap(), 0);
        for (x, y, z) in grid.iter_coords().collect::<Vec<_>>() {
            assert_eq!(grid.at(x, y, z), before.at(x, y, z));
        }
    }

    #[test]
    fn count_settled_non_empty_ignores_the_empty_label() {
        let ex = ground_exemplar();
        let mut grid = Grid::new(2, 2, 2, false);
        crate::initialize::init_empty_with_ground(&mut grid, &ex).unwrap();
        let sub_box = SubBox::whole_grid(&grid);
        // Only z=0 is GROUND (non-empty); z=1 is EMPTY.
        assert_eq!(count_settled_non_empty(&grid, &sub_box, ex.num_labels(), ex.empty_label()), 4);
    }
}
