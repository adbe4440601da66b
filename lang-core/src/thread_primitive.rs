//! The thread/time primitive interface the task core is built over (§6a).
//! A default `std::thread`-backed implementation ships with this crate;
//! an embedder targeting a different platform threading shim swaps in its
//! own [`ThreadPrimitive`].

use std::thread::JoinHandle;
use std::time::Instant;

use once_cell::sync::Lazy;

/// Abstracts thread creation, joining, detaching, yielding, and a
/// monotonic clock, so [`crate::task`] never calls `std::thread` directly.
pub trait ThreadPrimitive: Send + Sync {
    fn spawn(&self, entry: Box<dyn FnOnce() + Send + 'static>) -> std::io::Result<JoinHandle<()>>;
    fn join(&self, handle: JoinHandle<()>) -> std::thread::Result<()>;
    fn detach(&self, handle: JoinHandle<()>);
    fn yield_now(&self);
    fn monotonic_nanos(&self) -> u64;
}

/// The sole implementation shipped here: a thin wrapper over
/// `std::thread` and `std::time::Instant`.
pub struct StdThreadPrimitive;

static PROCESS_START: Lazy<Instant> = Lazy::new(Instant::now);

impl ThreadPrimitive for StdThreadPrimitive {
    fn spawn(&self, entry: Box<dyn FnOnce() + Send + 'static>) -> std::io::Result<JoinHandle<()>> {
        std::thread::Builder::new().spawn(entry)
    }

    fn join(&self, handle: JoinHandle<()>) -> std::thread::Result<()> {
        handle.join()
    }

    fn detach(&self, handle: JoinHandle<()>) {
        // `JoinHandle`'s destructor alone already detaches the OS thread;
        // naming this operation keeps the call site reading like the
        // spec's explicit `detach`, per the §9 redesign note that prefers
        // an explicit operation to an accidental drop.
        drop(handle);
    }

    fn yield_now(&self) {
        std::thread::yield_now();
    }

    fn monotonic_nanos(&self) -> u64 {
        PROCESS_START.elapsed().as_nanos() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_nanos_is_nondecreasing() {
        let primitive = StdThreadPrimitive;
        let a = primitive.monotonic_nanos();
        let b = primitive.monotonic_nanos();
        assert!(b >= a);
    }

    #[test]
    fn spawn_join_runs_the_entry() {
        let primitive = StdThreadPrimitive;
        let flag = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
        let flag2 = flag.clone();
        let handle = primitive
            .spawn(Box::new(move || {
                flag2.store(true, std::sync::atomic::Ordering::SeqCst);
            }))
            .expect("thread creation failed");
        primitive.join(handle).unwrap();
        assert!(flag.load(std::sync::atomic::Ordering::SeqCst));
    }
}
