//! Generation pipeline: noise field → colour buffer → mesh, run synchronously
//! or on a background worker pool with per-tick result delivery.

mod async_generation;
mod completion_queue;
mod error;
mod pipeline;
mod request;

pub use async_generation::AsyncGenerator;
pub use completion_queue::{Callback, Completion, CompletionQueue};
pub use error::GenerationError;
pub use pipeline::{MapData, generate_map_data, generate_mesh_data};
pub use request::{Coloring, GenerationRequest, MapRequest, RequestHandle, RequestKind};
