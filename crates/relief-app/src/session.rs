//! A batch of chunk generations driven by a per-tick drain.
//!
//! Map callbacks park their results in a pending list; the next tick turns
//! each pending map into a mesh request.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use relief_mesh::Primitive;
use relief_pipeline::{AsyncGenerator, GenerationError, GenerationRequest, MapData};
use tracing::{debug, warn};

/// What one finished chunk looked like.
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkSummary {
    pub seed: i32,
    pub min_height: f32,
    pub max_height: f32,
    pub vertices: usize,
    /// Triangles, or line segments for line topology.
    pub primitives: usize,
}

#[derive(Default)]
struct Outcomes {
    pending_maps: Vec<(i32, MapData)>,
    summaries: Vec<ChunkSummary>,
    failures: usize,
}

pub struct Session {
    generator: AsyncGenerator,
    template: GenerationRequest,
    outcomes: Arc<Mutex<Outcomes>>,
    expected: usize,
}

impl Session {
    pub fn new(generator: AsyncGenerator, template: GenerationRequest) -> Self {
        Self {
            generator,
            template,
            outcomes: Arc::default(),
            expected: 0,
        }
    }

    /// Queue `count` map requests with seeds `first_seed`, `first_seed + 1`, ...
    ///
    /// Seeds wrap around at `i32::MAX`, so every request gets a distinct seed.
    pub fn submit(&mut self, first_seed: i32, count: u32) -> Result<(), GenerationError> {
        for seed in (0..count).map(|i| first_seed.wrapping_add_unsigned(i)) {
            let request = self.template.with_seed(seed);
            let outcomes = Arc::clone(&self.outcomes);
            self.generator
                .request_map_data(request.map, move |handle, result| {
                    let mut outcomes = lock(&outcomes);
                    match result {
                        Ok(map) => outcomes.pending_maps.push((seed, map)),
                        Err(e) => {
                            warn!(id = handle.id, seed, error = %e, "map generation failed");
                            outcomes.failures += 1;
                        }
                    }
                })?;
            self.expected += 1;
        }
        Ok(())
    }

    /// Run finished callbacks, then request meshes for maps that arrived.
    ///
    /// Returns the number of callbacks run.
    pub fn tick(&mut self) -> Result<usize, GenerationError> {
        let ran = self.generator.drain_completed();
        let pending = std::mem::take(&mut lock(&self.outcomes).pending_maps);

        for (seed, map) in pending {
            let (min_height, max_height) = map.field.min_max().unwrap_or((0.0, 0.0));
            let outcomes = Arc::clone(&self.outcomes);
            self.generator.request_mesh_data(
                map.field,
                self.template.mesh.clone(),
                move |handle, result| {
                    let mut outcomes = lock(&outcomes);
                    match result {
                        Ok(mesh) => {
                            let primitives = match mesh.primitive {
                                Primitive::Triangles => mesh.triangle_count(),
                                Primitive::Lines => mesh.line_count(),
                            };
                            debug!(id = handle.id, seed, vertices = mesh.vertex_count(), "mesh ready");
                            outcomes.summaries.push(ChunkSummary {
                                seed,
                                min_height,
                                max_height,
                                vertices: mesh.vertex_count(),
                                primitives,
                            });
                        }
                        Err(e) => {
                            warn!(id = handle.id, seed, error = %e, "mesh generation failed");
                            outcomes.failures += 1;
                        }
                    }
                },
            )?;
        }
        Ok(ran)
    }

    /// Every submitted chunk has produced a mesh or a failure.
    pub fn is_finished(&self) -> bool {
        let outcomes = lock(&self.outcomes);
        outcomes.summaries.len() + outcomes.failures >= self.expected
    }

    pub fn failures(&self) -> usize {
        lock(&self.outcomes).failures
    }

    /// Finished chunks ordered by seed.
    pub fn summaries(&self) -> Vec<ChunkSummary> {
        let mut summaries = lock(&self.outcomes).summaries.clone();
        summaries.sort_by_key(|s| s.seed);
        summaries
    }

    pub fn generator(&self) -> &AsyncGenerator {
        &self.generator
    }
}

fn lock(outcomes: &Mutex<Outcomes>) -> MutexGuard<'_, Outcomes> {
    outcomes.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    use relief_config::Config;
    use relief_mesh::MeshSettings;
    use relief_pipeline::MapRequest;
    use relief_terrain::NoiseParams;

    fn run_to_completion(session: &mut Session) {
        let start = Instant::now();
        while !session.is_finished() {
            session.tick().unwrap();
            assert!(start.elapsed().as_secs() < 10, "Timed out");
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_session_meshes_every_map() {
        let template = GenerationRequest {
            map: MapRequest::new(NoiseParams::default(), 21),
            mesh: MeshSettings::default(),
        };
        let mut session = Session::new(AsyncGenerator::new(2).unwrap(), template);
        session.submit(10, 3).unwrap();
        run_to_completion(&mut session);

        let summaries = session.summaries();
        assert_eq!(session.failures(), 0);
        assert_eq!(
            summaries.iter().map(|s| s.seed).collect::<Vec<_>>(),
            vec![10, 11, 12]
        );
        for s in &summaries {
            assert_eq!(s.vertices, 21 * 21);
            assert_eq!(s.primitives, 20 * 20 * 2);
            assert_eq!((s.min_height, s.max_height), (0.0, 1.0));
        }
    }

    #[test]
    fn test_seeds_wrap_at_i32_max() {
        let template = GenerationRequest {
            map: MapRequest::new(NoiseParams::default(), 9),
            mesh: MeshSettings::default(),
        };
        let mut session = Session::new(AsyncGenerator::new(1).unwrap(), template);
        session.submit(i32::MAX - 1, 3).unwrap();
        run_to_completion(&mut session);

        let seeds: Vec<i32> = session.summaries().iter().map(|s| s.seed).collect();
        assert_eq!(seeds, vec![i32::MIN, i32::MAX - 1, i32::MAX]);
    }

    #[test]
    fn test_mesh_failures_are_counted() {
        // Default config meshes a bordered field; dropping the border breaks the stride.
        let mut config = Config::default();
        config.mesh.lod = 1;
        let mut template = GenerationRequest::from_config(&config);
        template.map.size = 10;
        template.mesh.border = 0;

        let mut session = Session::new(AsyncGenerator::new(1).unwrap(), template);
        session.submit(0, 2).unwrap();
        run_to_completion(&mut session);

        assert_eq!(session.failures(), 2);
        assert!(session.summaries().is_empty());
    }

    #[test]
    fn test_empty_session_is_finished() {
        let template = GenerationRequest::from_config(&Config::default());
        let session = Session::new(AsyncGenerator::new(1).unwrap(), template);
        assert!(session.is_finished());
        assert_eq!(session.generator().in_flight_count(), 0);
    }
}
