//! Sub-region restart scheduling: the top-level driver that repeatedly
//! re-synthesizes small random boxes of the grid, keeping only the attempts
//! that do not make the result denser.

use rand::Rng;
use voxsynth_core::{Exemplar, Grid, PossibilitySet};

use crate::propagate::propagate;
use crate::synthesize::{count_settled_non_empty, synthesize, SubBox};

/// Tunables for [`run`]. See `voxsynth_config` for the on-disk form of these.
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    /// Number of passes. Proportional to the domain's side length by convention.
    pub passes: usize,
    /// Sub-region attempts per pass (the first pass doubles this).
    pub attempts_per_pass: usize,
    /// Inclusive range of cubic sub-region side lengths, e.g. `(8, 16)`.
    pub sub_region_side_range: (usize, usize),
}

/// Tally of what happened across a scheduler run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerReport {
    pub passes_run: usize,
    pub attempts: usize,
    pub successes: usize,
    pub failures: usize,
}

/// Run the sub-region restart scheduler over `grid` in place.
///
/// `grid` should already be seeded by one of the `voxsynth_synth::initialize`
/// entry points. Always returns a report and leaves `grid` in *some* valid
/// state — in the worst case unchanged from its starting configuration.
pub fn run(grid: &mut Grid, exemplar: &Exemplar, config: &SchedulerConfig, rng: &mut impl Rng) -> SchedulerReport {
    let num_labels = exemplar.num_labels();
    let empty_label = exemplar.empty_label();
    let mut report = SchedulerReport::default();

    for pass in 0..config.passes {
        let attempts = if pass == 0 {
            config.attempts_per_pass * 2
        } else {
            config.attempts_per_pass
        };
        report.passes_run += 1;

        for _ in 0..attempts {
            report.attempts += 1;
            let sub_box = pick_sub_box(grid, config, pass == 0, rng);

            let backup = grid.clone();

            if reset_interior(grid, &sub_box, num_labels, exemplar).is_err() {
                *grid = backup;
                report.failures += 1;
                continue;
            }

            let before = count_settled_non_empty(grid, &sub_box, num_labels, empty_label);

            let after = match synthesize(grid, exemplar.constraints(), num_labels, empty_label, &sub_box, rng) {
                Ok(_) => count_settled_non_empty(grid, &sub_box, num_labels, empty_label),
                Err(_) => {
                    *grid = backup;
                    report.failures += 1;
                    continue;
                }
            };

            if after <= before {
                report.successes += 1;
            } else {
                *grid = backup;
                report.failures += 1;
            }
        }
    }

    report
}

/// Choose a random cubic sub-box inside `grid`'s domain. On the first pass,
/// bias the box so its minimum z is 0.
fn pick_sub_box(grid: &Grid, config: &SchedulerConfig, bias_ground: bool, rng: &mut impl Rng) -> SubBox {
    let (lo, hi) = config.sub_region_side_range;
    let side = rng
        .gen_range(lo..=hi)
        .min(grid.width())
        .min(grid.height())
        .min(grid.depth())
        .max(1);

    let mx = gen_corner(grid.width(), side, rng);
    let my = gen_corner(grid.height(), side, rng);
    let mz = if bias_ground { 0 } else { gen_corner(grid.depth(), side, rng) };

    SubBox {
        min: (mx, my, mz),
        max: (mx + side - 1, my + side - 1, mz + side - 1),
    }
}

fn gen_corner(domain_len: usize, side: usize, rng: &mut impl Rng) -> usize {
    let span = domain_len - side;
    if span == 0 {
        0
    } else {
        rng.gen_range(0..=span)
    }
}

/// Reset the sub-box's interior (cells not on its boundary face) to the
/// all-possible soup, then propagate from each boundary cell so the reset
/// interior is re-constrained by its already-committed surroundings.
fn reset_interior(
    grid: &mut Grid,
    sub_box: &SubBox,
    num_labels: usize,
    exemplar: &Exemplar,
) -> Result<(), crate::propagate::Contradiction> {
    let all = PossibilitySet::all(num_labels);
    let interior: Vec<_> = sub_box
        .iter_coords()
        .filter(|&(x, y, z)| !sub_box.is_boundary(x, y, z))
        .collect();
    for (x, y, z) in interior {
        *grid.at_mut(x, y, z) = all;
    }

    let boundary: Vec<_> = sub_box
        .iter_coords()
        .filter(|&(x, y, z)| sub_box.is_boundary(x, y, z))
        .collect();
    for (x, y, z) in boundary {
        propagate((x, y, z), grid, exemplar.constraints(), num_labels)?;
    }
    Ok(())
}
