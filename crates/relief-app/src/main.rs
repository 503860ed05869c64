//! Command-line host: generates a batch of terrain chunks in the background
//! and reports what came back.

mod session;

use std::time::{Duration, Instant};

use clap::Parser;
use relief_config::{CliArgs, Config};
use relief_pipeline::{AsyncGenerator, GenerationRequest};
use tracing::{error, info};

use crate::session::Session;

const TICK: Duration = Duration::from_millis(16);

fn main() {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = match args.config.clone().map_or_else(Config::default_dir, Ok) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Failed to resolve config directory: {e}");
            std::process::exit(1);
        }
    };

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    relief_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let generator = match config.workers.threads {
        0 => AsyncGenerator::with_defaults(),
        n => AsyncGenerator::new(n),
    };
    let generator = match generator {
        Ok(generator) => generator,
        Err(e) => {
            error!(error = %e, "failed to start worker pool");
            std::process::exit(1);
        }
    };

    let template = GenerationRequest::from_config(&config);
    info!(
        size = template.map.size,
        lod = template.mesh.lod,
        shading = ?template.mesh.shading,
        topology = ?template.mesh.topology,
        workers = generator.worker_count(),
        "Generating {} chunk(s)",
        args.requests
    );

    let mut session = Session::new(generator, template);
    if let Err(e) = session.submit(config.noise.seed, args.requests) {
        error!(error = %e, "failed to submit requests");
        std::process::exit(1);
    }

    let start = Instant::now();
    let mut ticks = 0u64;
    while !session.is_finished() {
        if let Err(e) = session.tick() {
            error!(error = %e, "failed to submit mesh request");
            std::process::exit(1);
        }
        ticks += 1;
        std::thread::sleep(TICK);
    }

    for chunk in session.summaries() {
        info!(
            seed = chunk.seed,
            min_height = chunk.min_height,
            max_height = chunk.max_height,
            vertices = chunk.vertices,
            primitives = chunk.primitives,
            "chunk ready"
        );
    }
    info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        ticks,
        failures = session.failures(),
        "generation finished"
    );
}
