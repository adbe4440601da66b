//! Task core `K` — spawn/await/detach/yield over a 1:1 OS-thread-per-task
//! model. There is no cooperative runtime: `await_result` blocks the
//! calling thread until the target thread exits.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::ErrorKind;
use crate::result::AnyResult;
use crate::thread_primitive::{StdThreadPrimitive, ThreadPrimitive};

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Created,
    Running,
    Completed,
    Failed,
}

struct Shared {
    state: Mutex<TaskState>,
    result: Mutex<Option<AnyResult>>,
}

/// A stable reference to a spawned task. Await is single-consumer: the
/// first successful `await_result` takes the stored result; a detached
/// task, or a second call, reports `ThreadError`. There is no "null task
/// handle" value here — `spawn` returns `None` instead (see its doc).
pub struct TaskHandle {
    id: u64,
    shared: Arc<Shared>,
    join: Mutex<Option<std::thread::JoinHandle<()>>>,
    detached: Mutex<bool>,
}

const INVALID_OR_DETACHED: &str = "task handle is invalid or detached";

impl TaskHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> TaskState {
        *self.shared.state.lock().expect("task state mutex poisoned")
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.state(), TaskState::Completed | TaskState::Failed)
    }

    /// Joins the backing thread and returns the entry's result.
    pub fn await_result(&self) -> Result<AnyResult, ErrorKind> {
        if *self.detached.lock().expect("detached mutex poisoned") {
            return Err(ErrorKind::ThreadError(INVALID_OR_DETACHED.to_string()));
        }
        let handle = self
            .join
            .lock()
            .expect("join mutex poisoned")
            .take()
            .ok_or_else(|| ErrorKind::ThreadError(INVALID_OR_DETACHED.to_string()))?;

        StdThreadPrimitive
            .join(handle)
            .map_err(|_| ErrorKind::ThreadError("failed to join task thread".to_string()))?;

        self.shared
            .result
            .lock()
            .expect("result mutex poisoned")
            .take()
            .ok_or_else(|| ErrorKind::ThreadError(INVALID_OR_DETACHED.to_string()))
    }

    /// Marks the task detached and detaches the OS thread. A detached
    /// task may not be awaited; its result is dropped when the entry
    /// returns.
    pub fn detach(&self) {
        *self.detached.lock().expect("detached mutex poisoned") = true;
        if let Some(handle) = self.join.lock().expect("join mutex poisoned").take() {
            StdThreadPrimitive.detach(handle);
        }
    }
}

/// Spawns `entry` on a new OS kernel thread, created through the
/// [`ThreadPrimitive`] abstraction (so an embedder's custom primitive, not
/// just `std::thread`, genuinely controls task-thread creation). `entry`
/// already owns whatever argument copy it needs by the time it's handed
/// here — the "allocate an owned args copy" step from §4.9 is just moving a
/// value into the closure in this idiom.
///
/// `TaskState::Created` is observable externally from the instant `spawn`
/// returns until the worker thread actually begins running; the transition
/// to `Running` happens on the worker thread itself, per §3's "Created →
/// Running (by the task runner, immediately on entry)".
///
/// On thread-creation failure returns `None` (the null-task handle) rather
/// than panicking.
pub fn spawn<F>(entry: F) -> Option<TaskHandle>
where
    F: FnOnce() -> AnyResult + Send + 'static,
{
    let id = NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed);
    let shared = Arc::new(Shared {
        state: Mutex::new(TaskState::Created),
        result: Mutex::new(None),
    });
    let worker_shared = Arc::clone(&shared);
    tracing::info!(task_id = id, "spawning task");

    let body: Box<dyn FnOnce() + Send + 'static> = Box::new(move || {
        *worker_shared.state.lock().expect("task state mutex poisoned") = TaskState::Running;
        let result = entry();
        let next_state = if result.is_ok() {
            TaskState::Completed
        } else {
            TaskState::Failed
        };
        *worker_shared.result.lock().expect("result mutex poisoned") = Some(result);
        *worker_shared.state.lock().expect("task state mutex poisoned") = next_state;
    });

    match StdThreadPrimitive.spawn(body) {
        Ok(join) => Some(TaskHandle {
            id,
            shared,
            join: Mutex::new(Some(join)),
            detached: Mutex::new(false),
        }),
        Err(error) => {
            tracing::warn!(task_id = id, %error, "thread creation failed");
            None
        }
    }
}

/// Cooperative hint to the OS scheduler.
pub fn yield_now() {
    StdThreadPrimitive.yield_now();
}
