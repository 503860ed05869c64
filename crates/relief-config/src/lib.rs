//! Configuration for the relief terrain generator.
//!
//! Settings persist to disk as RON, can be overridden from the command line,
//! and stay plain data: the generation crates convert them into typed
//! parameters at the call site.

mod cli;
mod config;
mod error;

pub use cli::{CliArgs, MAX_REQUESTS};
pub use config::{
    Config, DebugConfig, MeshConfig, NoiseConfig, NoiseVariantConfig, RegionConfig, ShadingConfig,
    StylisedConfig, StylisedRuleConfig, TopologyConfig, WorkerConfig,
};
pub use error::ConfigError;
