//! Propagator, initializer, synthesizer and sub-region scheduler for voxel
//! model synthesis.
//!
//! Built on top of `voxsynth_core`'s data model, this crate is where
//! randomness lives: [`initialize`] seeds a grid, [`synthesize::synthesize`]
//! collapses a region in a randomized scan order, [`propagate::propagate`]
//! restores arc consistency after each collapse, and [`schedule::run`] drives
//! the whole thing via sub-region restart.

pub mod initialize;
pub mod propagate;
pub mod schedule;
pub mod synthesize;

pub use propagate::{propagate, Contradiction};
pub use schedule::{run as run_scheduler, SchedulerConfig, SchedulerReport};
pub use synthesize::{count_settled_non_empty, synthesize, SubBox};
