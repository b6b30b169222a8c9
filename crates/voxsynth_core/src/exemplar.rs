//! Exemplar ingest: turning a labeled voxel sample into a [`ConstraintTable`].

use crate::constraint::ConstraintTable;
use crate::label::{Direction, Label};
use crate::possibility::MAX_LABELS;

/// A raw, already-decoded voxel sample: one palette index per voxel plus the
/// 256-entry RGB palette. This is the shape the voxel-slab reader produces;
/// ingest never touches a file.
#[derive(Debug, Clone)]
pub struct RawVoxelGrid {
    pub width: usize,
    pub height: usize,
    pub depth: usize,
    /// Row-major in x, then y, then z; `voxels[(z * height + y) * width + x]`.
    pub voxels: Vec<u8>,
    pub palette: [[u8; 3]; 256],
}

impl RawVoxelGrid {
    pub fn get(&self, x: usize, y: usize, z: usize) -> u8 {
        self.voxels[(z * self.height + y) * self.width + x]
    }
}

/// Ingest failed because the exemplar uses more distinct labels than the
/// possibility set can represent.
#[derive(Debug, thiserror::Error)]
#[error("exemplar uses {found} distinct labels, but the possibility set ceiling is {max}")]
pub struct CapacityExceeded {
    pub found: usize,
    pub max: usize,
}

/// A fully-ingested exemplar: the label bijection and the constraint table
/// derived from its adjacencies.
#[derive(Debug, Clone)]
pub struct Exemplar {
    num_labels: usize,
    /// `label_to_palette[label] -> palette index`.
    label_to_palette: Vec<u8>,
    /// `palette_to_label[palette index] -> label`, if that index is used.
    palette_to_label: [Option<Label>; 256],
    constraints: ConstraintTable,
    /// Label corresponding to `PALETTE_EMPTY`, if present in the exemplar.
    empty_label: Option<Label>,
    /// Label corresponding to `PALETTE_GROUND`, if present in the exemplar.
    ground_label: Option<Label>,
}

impl Exemplar {
    /// Discover the label set and adjacency constraints from a raw voxel
    /// sample, treating it as periodic (the exemplar always wraps, which is
    /// what makes its boundary constraints well-defined).
    pub fn ingest(raw: &RawVoxelGrid) -> Result<Self, CapacityExceeded> {
        // Discover distinct palette indices in scan order, assigning ids
        // 0..L in order of first appearance.
        let mut palette_to_label: [Option<Label>; 256] = [None; 256];
        let mut label_to_palette: Vec<u8> = Vec::new();
        for z in 0..raw.depth {
            for y in 0..raw.height {
                for x in 0..raw.width {
                    let pal = raw.get(x, y, z);
                    if palette_to_label[pal as usize].is_none() {
                        palette_to_label[pal as usize] = Some(label_to_palette.len());
                        label_to_palette.push(pal);
                    }
                }
            }
        }

        let num_labels = label_to_palette.len();
        if num_labels > MAX_LABELS {
            return Err(CapacityExceeded {
                found: num_labels,
                max: MAX_LABELS,
            });
        }

        let mut constraints = ConstraintTable::new(num_labels);
        for z in 0..raw.depth as i64 {
            for y in 0..raw.height as i64 {
                for x in 0..raw.width as i64 {
                    let label = palette_to_label[raw.get(x as usize, y as usize, z as usize) as usize]
                        .expect("every voxel's palette index was assigned a label above");
                    for dir in Direction::ALL {
                        let (dx, dy, dz) = dir.offset();
                        let nx = (x + dx as i64).rem_euclid(raw.width as i64);
                        let ny = (y + dy as i64).rem_euclid(raw.height as i64);
                        let nz = (z + dz as i64).rem_euclid(raw.depth as i64);
                        let neigh_pal = raw.get(nx as usize, ny as usize, nz as usize);
                        let neigh_label = palette_to_label[neigh_pal as usize]
                            .expect("every voxel's palette index was assigned a label above");

                        let axis = dir.axis();
                        if dir.is_lower_side() {
                            // `dir` points from `label` to the lower side, so
                            // the neighbor is the lower-coordinate label.
                            constraints.allow_axis_pair(axis, neigh_label, label);
                        } else {
                            constraints.allow_axis_pair(axis, label, neigh_label);
                        }
                    }
                }
            }
        }
        constraints.build_fast_form();

        let empty_label = palette_to_label[crate::label::PALETTE_EMPTY as usize];
        let ground_label = palette_to_label[crate::label::PALETTE_GROUND as usize];

        Ok(Self {
            num_labels,
            label_to_palette,
            palette_to_label,
            constraints,
            empty_label,
            ground_label,
        })
    }

    pub fn num_labels(&self) -> usize {
        self.num_labels
    }

    pub fn constraints(&self) -> &ConstraintTable {
        &self.constraints
    }

    pub fn palette_index(&self, label: Label) -> u8 {
        self.label_to_palette[label]
    }

    pub fn label_for_palette_index(&self, palette_index: u8) -> Option<Label> {
        self.palette_to_label[palette_index as usize]
    }

    pub fn empty_label(&self) -> Option<Label> {
        self.empty_label
    }

    pub fn ground_label(&self) -> Option<Label> {
        self.ground_label
    }
}
