//! Voxel-slab file I/O and the detailed-tile emitter.
//!
//! These are the system's only file-format concerns; everything else in the
//! workspace works on in-memory grids and exemplars.

mod detail;
mod slab;

pub use detail::{DetailedTileMap, DimensionMismatch};
pub use slab::{read_slab, write_slab, SlabError};
