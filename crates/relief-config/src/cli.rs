//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;
use crate::config::{NoiseVariantConfig, ShadingConfig, TopologyConfig};

/// Largest accepted `--requests` value.
pub const MAX_REQUESTS: u32 = 4096;

/// Relief terrain generator arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "relief", about = "Procedural terrain height fields and meshes")]
pub struct CliArgs {
    /// Noise seed.
    #[arg(long)]
    pub seed: Option<i32>,

    /// Noise scale (non-positive values are clamped).
    #[arg(long)]
    pub scale: Option<f64>,

    /// Octave count (negative values are clamped to zero).
    #[arg(long, allow_negative_numbers = true)]
    pub octaves: Option<i32>,

    /// Noise variant.
    #[arg(long, value_enum)]
    pub variant: Option<NoiseVariantConfig>,

    /// Mesh level of detail.
    #[arg(long)]
    pub lod: Option<u32>,

    /// Mesh shading mode.
    #[arg(long, value_enum)]
    pub shading: Option<ShadingConfig>,

    /// Mesh topology.
    #[arg(long, value_enum)]
    pub topology: Option<TopologyConfig>,

    /// Worker thread count (0 = automatic).
    #[arg(long)]
    pub workers: Option<usize>,

    /// Number of chunks to generate, one seed each.
    #[arg(
        long,
        default_value_t = 4,
        value_parser = clap::value_parser!(u32).range(..=i64::from(MAX_REQUESTS))
    )]
    pub requests: u32,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.noise.seed = seed;
        }
        if let Some(scale) = args.scale {
            self.noise.scale = scale;
        }
        if let Some(octaves) = args.octaves {
            self.noise.octaves = octaves;
        }
        if let Some(variant) = args.variant {
            self.noise.variant = variant;
        }
        if let Some(lod) = args.lod {
            self.mesh.lod = lod;
        }
        if let Some(shading) = args.shading {
            self.mesh.shading = shading;
        }
        if let Some(topology) = args.topology {
            self.mesh.topology = topology;
        }
        if let Some(workers) = args.workers {
            self.workers.threads = workers;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
