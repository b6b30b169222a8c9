//! Possibility sets, grids, and constraint tables for voxel model synthesis.
//!
//! This crate provides the data model for constraint-based voxel synthesis
//! in the tradition of Merrell's Model Synthesis and Gumin's Wave Function
//! Collapse:
//! - [`PossibilitySet`] — the set of labels still possible at one cell
//! - [`Grid`] — a dense 3D array of possibility sets
//! - [`ConstraintTable`] — the per-axis adjacency rules derived from an exemplar
//! - [`Exemplar`] — ingest of a labeled voxel sample into a constraint table
//!
//! It has no randomness and no file I/O; those live in `voxsynth_synth` and
//! `voxsynth_io` respectively.

mod constraint;
mod exemplar;
mod grid;
mod label;
mod possibility;

pub use constraint::ConstraintTable;
pub use exemplar::{CapacityExceeded, Exemplar, RawVoxelGrid};
pub use grid::Grid;
pub use label::{Direction, Label, PALETTE_EMPTY, PALETTE_GROUND};
pub use possibility::{PossibilitySet, MAX_LABELS};
