//! Configuration structs with defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level generator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Noise synthesis.
    pub noise: NoiseConfig,
    /// Mesh building.
    pub mesh: MeshConfig,
    /// Terrain colour bands, lowest first. Empty means the built-in bands.
    pub regions: Vec<RegionConfig>,
    /// Colouring for the stylised variant.
    pub stylised: StylisedConfig,
    /// Background worker pool.
    pub workers: WorkerConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Octave composition mode.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
pub enum NoiseVariantConfig {
    #[default]
    Standard,
    Stylised,
}

/// Mesh normal mode.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
pub enum ShadingConfig {
    #[default]
    Smooth,
    Flat,
}

/// Mesh index topology.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
pub enum TopologyConfig {
    #[default]
    Triangles,
    Lines,
    Ribbons,
}

/// Stylised colouring rule.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum StylisedRuleConfig {
    #[default]
    Stripes,
    Fade,
}

/// Noise synthesis settings. Out-of-range values are clamped at generation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NoiseConfig {
    pub seed: i32,
    pub scale: f64,
    pub octaves: i32,
    pub persistence: f64,
    pub lacunarity: f64,
    pub offset: (f64, f64),
    pub variant: NoiseVariantConfig,
    /// Response curve keys `(time, value)` for the stylised variant.
    pub curve: Vec<(f64, f64)>,
}

/// Mesh building settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeshConfig {
    pub height_scale: f32,
    /// Height response keys `(time, value)`. Empty means identity.
    pub height_curve: Vec<(f64, f64)>,
    pub lod: u32,
    pub shading: ShadingConfig,
    pub topology: TopologyConfig,
    /// Half-width of each ribbon strip when `topology` is `Ribbons`.
    pub ribbon_half_width: f32,
    /// Border samples around the meshed interior.
    pub border: usize,
}

/// One terrain colour band.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionConfig {
    pub name: String,
    pub threshold: f32,
    /// `#RRGGBB` or `#RRGGBBAA`.
    pub color: String,
}

/// Stylised colouring settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StylisedConfig {
    pub rule: StylisedRuleConfig,
    /// Stripe period in rows.
    pub period: u32,
    pub line_color: String,
    pub gap_color: String,
}

/// Worker pool settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorkerConfig {
    /// Worker thread count; 0 picks one from the CPU count.
    pub threads: usize,
}

/// Debug/development settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter (e.g. "debug", "info,relief_pipeline=trace").
    pub log_level: String,
    /// Also write JSON logs to the log directory.
    pub log_to_file: bool,
}

// --- Default implementations ---

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            scale: 25.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            offset: (0.0, 0.0),
            variant: NoiseVariantConfig::Standard,
            curve: Vec::new(),
        }
    }
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            height_scale: 30.0,
            // Keep water flat, ramp land linearly.
            height_curve: vec![(0.0, 0.0), (0.3, 0.0), (1.0, 1.0)],
            lod: 0,
            shading: ShadingConfig::Smooth,
            topology: TopologyConfig::Triangles,
            ribbon_half_width: 0.2,
            border: 1,
        }
    }
}

impl Default for StylisedConfig {
    fn default() -> Self {
        Self {
            rule: StylisedRuleConfig::Stripes,
            period: 4,
            line_color: "#FFFFFF".to_string(),
            gap_color: "#000000".to_string(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: false,
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Per-user configuration directory, e.g. `~/.config/relief`.
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("relief"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::WriteError {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(false)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::WriteError {
            path: config_path.clone(),
            source,
        })
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("octaves: 4"));
        assert!(ron_str.contains("shading: Smooth"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.regions.push(RegionConfig {
            name: "Sea".to_string(),
            threshold: 0.4,
            color: "#3263C3".to_string(),
        });
        config.noise.curve = vec![(-1.0, 0.0), (1.0, 1.0)];
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(noise: (seed: 7), workers: (threads: 3))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.noise.seed, 7);
        assert_eq!(config.noise.octaves, 4);
        assert_eq!(config.workers.threads, 3);
        assert_eq!(config.mesh, MeshConfig::default());
        assert!(config.regions.is_empty());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_invalid_values_are_kept_for_clamping() {
        // Validation is deferred to generation, which clamps.
        let config: Config = ron::from_str("(noise: (scale: -2.0, octaves: -1))").unwrap();
        assert_eq!(config.noise.scale, -2.0);
        assert_eq!(config.noise.octaves, -1);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.noise.seed = 99;
        config.mesh.shading = ShadingConfig::Flat;
        config.mesh.topology = TopologyConfig::Ribbons;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("relief");
        let config = Config::load_or_create(&nested).unwrap();
        assert_eq!(config, Config::default());
        assert!(nested.join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.noise.lacunarity = 2.5;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().noise.lacunarity, 2.5);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{{not valid}}").unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }
}
