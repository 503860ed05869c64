//! Typed generation requests and the handles returned for them.

use std::sync::Arc;

use glam::DVec2;
use relief_config::{
    Config, NoiseVariantConfig, ShadingConfig, StylisedRuleConfig, TopologyConfig,
};
use relief_mesh::{MeshSettings, Shading, Topology, field_size};
use relief_terrain::{
    NoiseParams, NoiseVariant, RegionBand, ResponseCurve, Rgba, StylisedRule, default_regions,
};

/// Which completion queue a request reports to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Height field plus colour buffer.
    Map,
    /// Mesh built from a height field.
    Mesh,
}

/// Identifies a submitted request.
///
/// Ids increase with every submission, so a consumer can discard results
/// that were superseded by a newer request of the same kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestHandle {
    /// Submission counter value, unique per generator and starting at 1.
    pub id: u64,
    /// Queue the result is delivered through.
    pub kind: RequestKind,
}

/// How height fields are turned into colours.
#[derive(Clone, Debug, PartialEq)]
pub enum Coloring {
    /// Ordered terrain bands, shared between requests.
    Regions(Arc<[RegionBand]>),
    /// Stylised line-art rule.
    Stylised(StylisedRule),
}

impl Coloring {
    /// The default colouring for a noise variant.
    pub fn for_variant(variant: NoiseVariant) -> Self {
        match variant {
            NoiseVariant::Standard => Self::Regions(Arc::from(default_regions())),
            NoiseVariant::Stylised => Self::Stylised(StylisedRule::default()),
        }
    }
}

/// Everything needed to produce a height field and its colours.
#[derive(Clone, Debug, PartialEq)]
pub struct MapRequest {
    /// Noise synthesis parameters.
    pub noise: NoiseParams,
    /// Side length of the square field.
    pub size: usize,
    /// Height-to-colour rule.
    pub coloring: Coloring,
}

impl MapRequest {
    /// A request with the variant's default colouring.
    pub fn new(noise: NoiseParams, size: usize) -> Self {
        let coloring = Coloring::for_variant(noise.variant);
        Self {
            noise,
            size,
            coloring,
        }
    }
}

/// A map request plus the settings for meshing its result.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationRequest {
    pub map: MapRequest,
    pub mesh: MeshSettings,
}

impl GenerationRequest {
    /// Convert plain configuration into typed parameters.
    ///
    /// The field size follows the shading mode and border so every LOD up to
    /// [`relief_mesh::MAX_LOD`] can be meshed. Unparseable colours are
    /// replaced (and logged) rather than rejected.
    pub fn from_config(config: &Config) -> Self {
        let n = &config.noise;
        let noise = NoiseParams {
            seed: n.seed,
            scale: n.scale,
            octaves: n.octaves,
            persistence: n.persistence,
            lacunarity: n.lacunarity,
            offset: DVec2::new(n.offset.0, n.offset.1),
            variant: match n.variant {
                NoiseVariantConfig::Standard => NoiseVariant::Standard,
                NoiseVariantConfig::Stylised => NoiseVariant::Stylised,
            },
            curve: ResponseCurve::from_pairs(&n.curve),
        };

        let m = &config.mesh;
        let mesh = MeshSettings {
            height_scale: m.height_scale,
            height_curve: ResponseCurve::from_pairs(&m.height_curve),
            lod: m.lod,
            shading: match m.shading {
                ShadingConfig::Smooth => Shading::Smooth,
                ShadingConfig::Flat => Shading::Flat,
            },
            topology: match m.topology {
                TopologyConfig::Triangles => Topology::Triangles,
                TopologyConfig::Lines => Topology::Lines,
                TopologyConfig::Ribbons => Topology::Ribbons {
                    half_width: m.ribbon_half_width,
                },
            },
            border: m.border,
        };

        let coloring = match noise.variant {
            NoiseVariant::Standard => Coloring::Regions(regions_from_config(config)),
            NoiseVariant::Stylised => Coloring::Stylised(stylised_from_config(config)),
        };

        Self {
            map: MapRequest {
                noise,
                size: field_size(mesh.shading, mesh.border),
                coloring,
            },
            mesh,
        }
    }

    /// The same request with a different noise seed.
    pub fn with_seed(&self, seed: i32) -> Self {
        let mut request = self.clone();
        request.map.noise.seed = seed;
        request
    }
}

fn parse_color(hex: &str, fallback: Rgba) -> Rgba {
    Rgba::from_hex(hex).unwrap_or_else(|| {
        tracing::warn!(color = hex, "unparseable colour, using fallback");
        fallback
    })
}

fn regions_from_config(config: &Config) -> Arc<[RegionBand]> {
    if config.regions.is_empty() {
        return Arc::from(default_regions());
    }
    config
        .regions
        .iter()
        .map(|r| RegionBand::new(r.name.clone(), r.threshold, parse_color(&r.color, Rgba::CLEAR)))
        .collect()
}

fn stylised_from_config(config: &Config) -> StylisedRule {
    let s = &config.stylised;
    match s.rule {
        StylisedRuleConfig::Fade => StylisedRule::Fade,
        StylisedRuleConfig::Stripes => StylisedRule::Stripes {
            period: s.period,
            line: parse_color(&s.line_color, Rgba::WHITE),
            gap: parse_color(&s.gap_color, Rgba::BLACK),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relief_config::RegionConfig;

    #[test]
    fn test_default_config_request() {
        let request = GenerationRequest::from_config(&Config::default());
        assert_eq!(request.map.size, 243);
        assert_eq!(request.mesh.border, 1);
        assert_eq!(request.mesh.shading, Shading::Smooth);
        assert_eq!(request.map.noise.octaves, 4);
        match &request.map.coloring {
            Coloring::Regions(bands) => assert_eq!(bands.len(), 8),
            other => panic!("expected regions, got {other:?}"),
        }
    }

    #[test]
    fn test_flat_shading_uses_smaller_field() {
        let mut config = Config::default();
        config.mesh.shading = ShadingConfig::Flat;
        let request = GenerationRequest::from_config(&config);
        assert_eq!(request.map.size, 123);
    }

    #[test]
    fn test_custom_regions_and_bad_colour() {
        let mut config = Config::default();
        config.regions = vec![
            RegionConfig {
                name: "Low".to_string(),
                threshold: 0.5,
                color: "#FF0000".to_string(),
            },
            RegionConfig {
                name: "High".to_string(),
                threshold: 1.0,
                color: "not a colour".to_string(),
            },
        ];
        let request = GenerationRequest::from_config(&config);
        let Coloring::Regions(bands) = &request.map.coloring else {
            panic!("expected regions");
        };
        assert_eq!(bands[0].color, Rgba::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(bands[1].color, Rgba::CLEAR);
    }

    #[test]
    fn test_stylised_config() {
        let mut config = Config::default();
        config.noise.variant = NoiseVariantConfig::Stylised;
        config.noise.curve = vec![(-1.0, -1.0), (1.0, 1.0)];
        config.mesh.topology = TopologyConfig::Ribbons;
        config.stylised.period = 6;

        let request = GenerationRequest::from_config(&config);
        assert_eq!(request.map.noise.variant, NoiseVariant::Stylised);
        assert_eq!(request.map.noise.curve.keys().len(), 2);
        assert_eq!(request.mesh.topology, Topology::Ribbons { half_width: 0.2 });
        assert_eq!(
            request.map.coloring,
            Coloring::Stylised(StylisedRule::Stripes {
                period: 6,
                line: Rgba::WHITE,
                gap: Rgba::BLACK,
            })
        );
    }

    #[test]
    fn test_with_seed() {
        let request = GenerationRequest::from_config(&Config::default()).with_seed(42);
        assert_eq!(request.map.noise.seed, 42);
    }
}
