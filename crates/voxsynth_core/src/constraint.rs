//! The adjacency constraint table derived from an exemplar.

use crate::label::{Direction, Label};

const AXIS_X: u8 = 1 << 0;
const AXIS_Y: u8 = 1 << 1;
const AXIS_Z: u8 = 1 << 2;

fn axis_bit(axis: usize) -> u8 {
    match axis {
        0 => AXIS_X,
        1 => AXIS_Y,
        2 => AXIS_Z,
        _ => unreachable!("only three axes"),
    }
}

/// For each pair of labels `(a, b)` and each axis, whether `a` (at the lower
/// coordinate) was observed directly next to `b` (at the higher coordinate)
/// in the exemplar.
///
/// Stored in two equivalent forms: a *compact* symmetric `L×L` matrix of
/// axis bitmasks, and a *fast* `allowed[direction][label] -> [label]` form
/// derived from it and used on the hot propagation path.
#[derive(Debug, Clone)]
pub struct ConstraintTable {
    num_labels: usize,
    /// `compact[a * num_labels + b]`, bit per axis; `a` is always the lower-
    /// coordinate label on that axis.
    compact: Vec<u8>,
    /// `fast[direction][a]` = labels allowed as the neighbor of `a` in that direction.
    fast: [Vec<Vec<Label>>; 6],
}

impl ConstraintTable {
    /// An empty table for `num_labels` labels, with no pairs allowed yet.
    pub fn new(num_labels: usize) -> Self {
        Self {
            num_labels,
            compact: vec![0u8; num_labels * num_labels],
            fast: Default::default(),
        }
    }

    pub fn num_labels(&self) -> usize {
        self.num_labels
    }

    /// Record that `lower` may sit at the lower coordinate on `axis` next to
    /// `higher` at the higher coordinate.
    pub fn allow_axis_pair(&mut self, axis: usize, lower: Label, higher: Label) {
        let idx = lower * self.num_labels + higher;
        self.compact[idx] |= axis_bit(axis);
    }

    /// Whether `lower`/`higher` are allowed to neighbor on `axis`, with
    /// `lower` at the lower coordinate.
    pub fn axis_pair_allowed(&self, axis: usize, lower: Label, higher: Label) -> bool {
        self.compact[lower * self.num_labels + higher] & axis_bit(axis) != 0
    }

    /// Derive the fast per-direction lookup table from the compact matrix.
    /// Call once after all `allow_axis_pair` calls during ingest.
    pub fn build_fast_form(&mut self) {
        for dir in Direction::ALL {
            let axis = dir.axis();
            let mut per_label = vec![Vec::new(); self.num_labels];
            for a in 0..self.num_labels {
                for b in 0..self.num_labels {
                    // `a` is the label at the site; we're asking which `b`
                    // may appear in direction `dir` from `a`. If `dir`
                    // points to the lower side, `a` is the higher-coordinate
                    // label of the pair, so the stored pair is `(b, a)`.
                    let allowed = if dir.is_lower_side() {
                        self.axis_pair_allowed(axis, b, a)
                    } else {
                        self.axis_pair_allowed(axis, a, b)
                    };
                    if allowed {
                        per_label[a].push(b);
                    }
                }
            }
            self.fast[dir_index(dir)] = per_label;
        }
    }

    /// Labels allowed to appear in direction `dir` from `label`, via the fast form.
    pub fn allowed(&self, dir: Direction, label: Label) -> &[Label] {
        &self.fast[dir_index(dir)][label]
    }
}

fn dir_index(dir: Direction) -> usize {
    match dir {
        Direction::NegX => 0,
        Direction::PosX => 1,
        Direction::NegY => 2,
        Direction::PosY => 3,
        Direction::NegZ => 4,
        Direction::PosZ => 5,
    }
}
