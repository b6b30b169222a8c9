//! Command-line driver: load an exemplar and a config, run the scheduler,
//! write the synthesized grid back out as a voxel slab.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use rand::{rngs::SmallRng, SeedableRng};
use tracing::info;

use voxsynth_core::{Exemplar, Grid, Label, RawVoxelGrid};
use voxsynth_io::{read_slab, write_slab, DetailedTileMap};
use voxsynth_synth::{initialize, run_scheduler, SchedulerConfig};

/// Synthesize a voxel grid from an exemplar via constrained randomized collapse.
#[derive(Parser, Debug)]
#[command(name = "voxsynth", version, about = "Voxel model synthesis")]
struct Args {
    /// Path to the run's TOML configuration file.
    #[arg(long)]
    config: PathBuf,

    /// Directory containing `<problem_name>.vox` and tilemap pair files.
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Override the exemplar path instead of deriving it from `problem_name`.
    #[arg(long)]
    exemplar: Option<PathBuf>,

    /// Where to write the synthesized low-resolution grid.
    #[arg(long, short = 'o')]
    output: PathBuf,

    /// Where to write the detailed-tile upsampled grid, if a tilemap is configured.
    #[arg(long)]
    detailed_output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = voxsynth_config::load(&args.config)
        .with_context(|| format!("loading config from {}", args.config.display()))?;

    let exemplar_path = args
        .exemplar
        .clone()
        .unwrap_or_else(|| args.data_dir.join(format!("{}.vox", config.problem_name)));
    let exemplar_bytes = std::fs::read(&exemplar_path)
        .with_context(|| format!("reading exemplar {}", exemplar_path.display()))?;
    let raw_exemplar =
        read_slab(&exemplar_bytes).with_context(|| format!("parsing exemplar {}", exemplar_path.display()))?;
    let exemplar = Exemplar::ingest(&raw_exemplar).context("ingesting exemplar")?;

    info!(
        target: "voxsynth.ingest",
        num_labels = exemplar.num_labels(),
        width = raw_exemplar.width,
        height = raw_exemplar.height,
        depth = raw_exemplar.depth,
        "exemplar_ingested"
    );

    let mut grid = Grid::new(config.domain_size, config.domain_size, config.domain_size, config.periodic);
    if !initialize::init_empty_with_ground(&mut grid, &exemplar).context("seeding initial grid")? {
        initialize::init_soup(&mut grid, &exemplar);
    }

    let seed = config.seed.unwrap_or_else(wall_clock_seed);
    let mut rng = SmallRng::seed_from_u64(seed);
    info!(target: "voxsynth.schedule", seed, "scheduler_starting");

    let scheduler_config = SchedulerConfig {
        passes: config.passes,
        attempts_per_pass: config.attempts_per_pass,
        sub_region_side_range: config.sub_region_side_range,
    };
    let report = run_scheduler(&mut grid, &exemplar, &scheduler_config, &mut rng);
    info!(
        target: "voxsynth.schedule",
        passes_run = report.passes_run,
        attempts = report.attempts,
        successes = report.successes,
        failures = report.failures,
        "scheduler_finished"
    );

    let out_grid = grid_to_raw(&grid, &exemplar, raw_exemplar.palette);
    let bytes = write_slab(&out_grid);
    std::fs::write(&args.output, &bytes)
        .with_context(|| format!("writing output {}", args.output.display()))?;
    info!(target: "voxsynth.output", path = %args.output.display(), "wrote_slab");

    if let Some(tilemap_name) = &config.tilemap_name {
        let detailed_output = args
            .detailed_output
            .clone()
            .context("tilemap_name is configured but --detailed-output was not given")?;
        emit_detailed(&args.data_dir, tilemap_name, &grid, &exemplar, raw_exemplar.palette, &detailed_output)?;
    }

    Ok(())
}

fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Convert a synthesized grid into a file-ready [`RawVoxelGrid`], picking an
/// arbitrary possible label for any cell left unsettled by the scheduler.
fn grid_to_raw(grid: &Grid, exemplar: &Exemplar, palette: [[u8; 3]; 256]) -> RawVoxelGrid {
    let (w, h, d) = (grid.width(), grid.height(), grid.depth());
    let mut voxels = vec![0u8; w * h * d];
    for (x, y, z) in grid.iter_coords() {
        let cell = grid.at(x, y, z);
        let label: Label = (0..exemplar.num_labels())
            .find(|&l| cell.test(l))
            .expect("every cell has at least one possible label");
        voxels[(z * h + y) * w + x] = exemplar.palette_index(label);
    }
    RawVoxelGrid {
        width: w,
        height: h,
        depth: d,
        voxels,
        palette,
    }
}

fn emit_detailed(
    data_dir: &std::path::Path,
    tilemap_name: &str,
    grid: &Grid,
    exemplar: &Exemplar,
    palette: [[u8; 3]; 256],
    detailed_output: &std::path::Path,
) -> Result<()> {
    let lo_path = data_dir.join(format!("{tilemap_name}_lo.vox"));
    let hi_path = data_dir.join(format!("{tilemap_name}_hi.vox"));
    let lo_bytes = std::fs::read(&lo_path).with_context(|| format!("reading tilemap low-res {}", lo_path.display()))?;
    let hi_bytes = std::fs::read(&hi_path).with_context(|| format!("reading tilemap high-res {}", hi_path.display()))?;
    let lo = read_slab(&lo_bytes).with_context(|| format!("parsing tilemap low-res {}", lo_path.display()))?;
    let hi = read_slab(&hi_bytes).with_context(|| format!("parsing tilemap high-res {}", hi_path.display()))?;

    let tile_map = DetailedTileMap::build(&lo, &hi).context("building detailed tile map")?;
    let detailed = tile_map.emit(grid, exemplar, palette);
    let bytes = write_slab(&detailed);
    std::fs::write(detailed_output, &bytes)
        .with_context(|| format!("writing detailed output {}", detailed_output.display()))?;
    info!(target: "voxsynth.output", path = %detailed_output.display(), "wrote_detailed_slab");
    Ok(())
}
