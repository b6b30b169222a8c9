//! Dense 3D array of possibility sets.

use crate::label::Direction;
use crate::possibility::PossibilitySet;

/// A dense `(W, H, D)` array of [`PossibilitySet`]s.
///
/// Storage is row-major in x, then y, then z (x is the most coherent
/// index). The `periodic` flag governs whether the synthesizer and
/// propagator treat out-of-domain neighbors as absent (`false`, bounded) or
/// as the wrapped neighbor (`true`, toroidal); [`Grid::at`] and
/// [`Grid::at_wrapped`] are both always available regardless of the flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    depth: usize,
    periodic: bool,
    cells: Vec<PossibilitySet>,
}

impl Grid {
    /// Create a grid of the given dimensions, every cell initialized to the
    /// empty possibility set (callers run an initializer before use).
    pub fn new(width: usize, height: usize, depth: usize, periodic: bool) -> Self {
        Self {
            width,
            height,
            depth,
            periodic,
            cells: vec![PossibilitySet::none(); width * height * depth],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn periodic(&self) -> bool {
        self.periodic
    }

    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.height + y) * self.width + x
    }

    /// Read the cell at `(x, y, z)`. Panics (debug builds) if out of bounds.
    pub fn at(&self, x: usize, y: usize, z: usize) -> &PossibilitySet {
        debug_assert!(x < self.width && y < self.height && z < self.depth);
        &self.cells[self.index(x, y, z)]
    }

    /// Mutably access the cell at `(x, y, z)`. Panics (debug builds) if out of bounds.
    pub fn at_mut(&mut self, x: usize, y: usize, z: usize) -> &mut PossibilitySet {
        debug_assert!(x < self.width && y < self.height && z < self.depth);
        let idx = self.index(x, y, z);
        &mut self.cells[idx]
    }

    /// Read the cell at `(x mod W, y mod H, z mod D)`, wrapping signed
    /// coordinates into range with non-negative modular arithmetic.
    pub fn at_wrapped(&self, x: i64, y: i64, z: i64) -> &PossibilitySet {
        let wx = x.rem_euclid(self.width as i64) as usize;
        let wy = y.rem_euclid(self.height as i64) as usize;
        let wz = z.rem_euclid(self.depth as i64) as usize;
        self.at(wx, wy, wz)
    }

    /// Mutably access the cell at `(x mod W, y mod H, z mod D)`.
    pub fn at_wrapped_mut(&mut self, x: i64, y: i64, z: i64) -> &mut PossibilitySet {
        let wx = x.rem_euclid(self.width as i64) as usize;
        let wy = y.rem_euclid(self.height as i64) as usize;
        let wz = z.rem_euclid(self.depth as i64) as usize;
        self.at_mut(wx, wy, wz)
    }

    /// Resolve the neighbor of `(x, y, z)` in `dir`, honoring the grid's
    /// `periodic` flag. Returns `None` for an off-domain neighbor in
    /// bounded mode.
    pub fn neighbor(&self, x: usize, y: usize, z: usize, dir: Direction) -> Option<(usize, usize, usize)> {
        let (dx, dy, dz) = dir.offset();
        let nx = x as i64 + dx as i64;
        let ny = y as i64 + dy as i64;
        let nz = z as i64 + dz as i64;

        if self.periodic {
            Some((
                nx.rem_euclid(self.width as i64) as usize,
                ny.rem_euclid(self.height as i64) as usize,
                nz.rem_euclid(self.depth as i64) as usize,
            ))
        } else {
            if nx < 0 || ny < 0 || nz < 0 {
                return None;
            }
            let (nx, ny, nz) = (nx as usize, ny as usize, nz as usize);
            if nx >= self.width || ny >= self.height || nz >= self.depth {
                return None;
            }
            Some((nx, ny, nz))
        }
    }

    /// Iterate every in-domain `(x, y, z)` coordinate, x fastest.
    pub fn iter_coords(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        let (w, h, d) = (self.width, self.height, self.depth);
        (0..d).flat_map(move |z| (0..h).flat_map(move |y| (0..w).map(move |x| (x, y, z))))
    }
}
