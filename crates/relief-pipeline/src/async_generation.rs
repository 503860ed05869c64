//! Background generation: a worker pool runs map and mesh requests and parks
//! the results in completion queues until the owning thread drains them.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::thread::JoinHandle;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, unbounded};
use relief_mesh::{MeshData, MeshSettings};
use relief_terrain::HeightField;
use tracing::{debug, info, warn};

use crate::completion_queue::{Callback, Completion, CompletionQueue};
use crate::error::GenerationError;
use crate::pipeline::{MapData, generate_map_data, generate_mesh_data};
use crate::request::{MapRequest, RequestHandle, RequestKind};

type MapTask = Box<dyn FnOnce() -> MapData + Send + 'static>;

enum Job {
    Map {
        handle: RequestHandle,
        generate: MapTask,
        callback: Callback<MapData>,
    },
    Mesh {
        handle: RequestHandle,
        field: HeightField,
        settings: MeshSettings,
        callback: Callback<MeshData>,
    },
}

/// State shared between the owner and the workers.
#[derive(Default)]
struct Shared {
    map_results: CompletionQueue<MapData>,
    mesh_results: CompletionQueue<MeshData>,
    in_flight: AtomicUsize,
}

/// Worker pool for map and mesh generation.
///
/// Any thread may submit requests with [`request_map_data`](Self::request_map_data)
/// or [`request_mesh_data`](Self::request_mesh_data). One owning thread calls
/// [`drain_completed`](Self::drain_completed) once per tick; every callback
/// runs there, never on a worker. Requests cannot be cancelled; use
/// [`is_latest`](Self::is_latest) to ignore superseded results.
pub struct AsyncGenerator {
    task_sender: Option<Sender<Job>>,
    worker_handles: Vec<JoinHandle<()>>,
    shared: Arc<Shared>,
    next_id: AtomicU64,
    latest_map: AtomicU64,
    latest_mesh: AtomicU64,
}

impl AsyncGenerator {
    /// Spawn `worker_count` worker threads (at least one).
    pub fn new(worker_count: usize) -> std::io::Result<Self> {
        let worker_count = worker_count.max(1);
        let (task_sender, task_receiver) = unbounded::<Job>();
        let shared = Arc::new(Shared::default());

        let mut worker_handles = Vec::with_capacity(worker_count);
        for i in 0..worker_count {
            let receiver = task_receiver.clone();
            let shared = Arc::clone(&shared);
            let handle = std::thread::Builder::new()
                .name(format!("relief-gen-{i}"))
                .spawn(move || worker_loop(&receiver, &shared))?;
            worker_handles.push(handle);
        }

        info!(workers = worker_count, "generation worker pool started");

        Ok(Self {
            task_sender: Some(task_sender),
            worker_handles,
            shared,
            next_id: AtomicU64::new(0),
            latest_map: AtomicU64::new(0),
            latest_mesh: AtomicU64::new(0),
        })
    }

    /// A pool sized to the machine, leaving one core for the owning thread.
    pub fn with_defaults() -> std::io::Result<Self> {
        Self::new(num_cpus::get().saturating_sub(1))
    }

    /// Generate a height field and colour buffer in the background.
    pub fn request_map_data<F>(
        &self,
        request: MapRequest,
        callback: F,
    ) -> Result<RequestHandle, GenerationError>
    where
        F: FnOnce(RequestHandle, Result<MapData, GenerationError>) + Send + 'static,
    {
        self.request_map_with(move || generate_map_data(&request), callback)
    }

    /// Queue an arbitrary map-producing task on the map queue.
    pub(crate) fn request_map_with<G, F>(
        &self,
        generate: G,
        callback: F,
    ) -> Result<RequestHandle, GenerationError>
    where
        G: FnOnce() -> MapData + Send + 'static,
        F: FnOnce(RequestHandle, Result<MapData, GenerationError>) + Send + 'static,
    {
        let handle = self.next_handle(RequestKind::Map);
        self.dispatch(Job::Map {
            handle,
            generate: Box::new(generate),
            callback: Box::new(callback),
        })?;
        Ok(handle)
    }

    /// Mesh `field` in the background. The field is moved into the task.
    pub fn request_mesh_data<F>(
        &self,
        field: HeightField,
        settings: MeshSettings,
        callback: F,
    ) -> Result<RequestHandle, GenerationError>
    where
        F: FnOnce(RequestHandle, Result<MeshData, GenerationError>) + Send + 'static,
    {
        let handle = self.next_handle(RequestKind::Mesh);
        self.dispatch(Job::Mesh {
            handle,
            field,
            settings,
            callback: Box::new(callback),
        })?;
        Ok(handle)
    }

    /// Run the callbacks of every request finished so far.
    ///
    /// Both queues are swapped out first, so completions arriving while
    /// callbacks run (including requests those callbacks submit) wait for the
    /// next call. Map callbacks run before mesh callbacks; each queue is FIFO
    /// in completion order. Returns the number of callbacks run.
    pub fn drain_completed(&self) -> usize {
        let maps = self.shared.map_results.take_all();
        let meshes = self.shared.mesh_results.take_all();
        let count = maps.len() + meshes.len();

        maps.into_iter().for_each(Completion::invoke);
        meshes.into_iter().for_each(Completion::invoke);
        count
    }

    /// Whether `handle` is the most recent request of its kind.
    pub fn is_latest(&self, handle: RequestHandle) -> bool {
        self.latest(handle.kind).load(Ordering::Acquire) == handle.id
    }

    /// Requests submitted but not yet finished by a worker.
    pub fn in_flight_count(&self) -> usize {
        self.shared.in_flight.load(Ordering::Acquire)
    }

    /// Completions waiting for [`drain_completed`](Self::drain_completed).
    pub fn pending_count(&self) -> usize {
        self.shared.map_results.len() + self.shared.mesh_results.len()
    }

    pub fn worker_count(&self) -> usize {
        self.worker_handles.len()
    }

    /// Stop accepting requests, let workers finish queued jobs, and join them.
    ///
    /// Finished results stay queued and can still be drained.
    pub fn shutdown(&mut self) {
        if self.task_sender.take().is_none() {
            return;
        }
        for handle in self.worker_handles.drain(..) {
            if handle.join().is_err() {
                warn!("generation worker exited abnormally");
            }
        }
        info!("generation worker pool stopped");
    }

    fn latest(&self, kind: RequestKind) -> &AtomicU64 {
        match kind {
            RequestKind::Map => &self.latest_map,
            RequestKind::Mesh => &self.latest_mesh,
        }
    }

    fn next_handle(&self, kind: RequestKind) -> RequestHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.latest(kind).fetch_max(id, Ordering::AcqRel);
        RequestHandle { id, kind }
    }

    fn dispatch(&self, job: Job) -> Result<(), GenerationError> {
        let sender = self.task_sender.as_ref().ok_or(GenerationError::ShutDown)?;
        self.shared.in_flight.fetch_add(1, Ordering::AcqRel);
        if sender.send(job).is_err() {
            self.shared.in_flight.fetch_sub(1, Ordering::AcqRel);
            return Err(GenerationError::ShutDown);
        }
        Ok(())
    }
}

impl Drop for AsyncGenerator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(receiver: &Receiver<Job>, shared: &Shared) {
    while let Ok(job) = receiver.recv() {
        run_job(job, shared);
        // Decrement after the push so a drained queue plus zero in-flight
        // means every result has been delivered.
        shared.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}

fn run_job(job: Job, shared: &Shared) {
    let start = Instant::now();
    match job {
        Job::Map {
            handle,
            generate,
            callback,
        } => {
            let result = run_guarded(generate);
            log_outcome(handle, start, result.as_ref().err());
            shared
                .map_results
                .push(Completion::new(handle, result, callback));
        }
        Job::Mesh {
            handle,
            field,
            settings,
            callback,
        } => {
            let result = run_guarded(|| generate_mesh_data(&field, &settings)).and_then(|r| r);
            log_outcome(handle, start, result.as_ref().err());
            shared
                .mesh_results
                .push(Completion::new(handle, result, callback));
        }
    }
}

fn log_outcome(handle: RequestHandle, start: Instant, error: Option<&GenerationError>) {
    let elapsed_us = start.elapsed().as_micros() as u64;
    match error {
        None => debug!(id = handle.id, kind = ?handle.kind, elapsed_us, "request finished"),
        Some(e) => warn!(id = handle.id, kind = ?handle.kind, elapsed_us, error = %e, "request failed"),
    }
}

fn run_guarded<T>(task: impl FnOnce() -> T) -> Result<T, GenerationError> {
    catch_unwind(AssertUnwindSafe(task))
        .map_err(|payload| GenerationError::Panicked(panic_message(payload.as_ref())))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
