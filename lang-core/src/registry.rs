//! Thread registry `G` — process-wide bookkeeping of threads participating
//! in GC-root tracking, under a single registry lock.
//!
//! `spec.md` describes the node list as an explicit singly-linked list
//! spliced under a mutex; a `HashMap<ThreadId, Node>` behind one
//! `parking_lot::Mutex` gives the same externally observable behavior
//! (register/unregister/stats under one lock, splice-order unobserved)
//! without hand-rolling an intrusive list in safe Rust.

use std::cell::Cell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::ThreadId;
use std::time::{SystemTime, UNIX_EPOCH};

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::error::ErrorKind;

pub type RootAddress = usize;

struct Node {
    roots: Vec<RootAddress>,
    #[allow(dead_code)]
    registered_at_ms: u64,
}

struct Registry {
    nodes: Mutex<HashMap<ThreadId, Node>>,
    lifetime_registered: AtomicU64,
    shutdown: AtomicBool,
}

static REGISTRY: Lazy<Registry> = Lazy::new(|| Registry {
    nodes: Mutex::new(HashMap::new()),
    lifetime_registered: AtomicU64::new(0),
    shutdown: AtomicBool::new(false),
});

thread_local! {
    static REGISTERED: Cell<bool> = const { Cell::new(false) };
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Idempotent: if the current thread already has a node (tracked via a
/// thread-local flag standing in for "thread-local pointer non-null"),
/// returns `Ok` without creating a second one. Otherwise allocates a node,
/// splices it into the map under the registry lock, and bumps the
/// lifetime-registered counter.
pub fn register() -> Result<(), ErrorKind> {
    if REGISTERED.with(|flag| flag.get()) {
        return Ok(());
    }

    let id = std::thread::current().id();
    REGISTRY.nodes.lock().entry(id).or_insert_with(|| Node {
        roots: Vec::new(),
        registered_at_ms: now_ms(),
    });
    REGISTRY.lifetime_registered.fetch_add(1, Ordering::Relaxed);
    REGISTERED.with(|flag| flag.set(true));
    tracing::info!(?id, "registered thread with GC root registry");
    Ok(())
}

/// For each root in the thread's root set this would unregister it from
/// the collector; no collector lives in this crate, so only the node
/// itself is spliced out. Clears the thread-local flag.
pub fn unregister() {
    let id = std::thread::current().id();
    REGISTRY.nodes.lock().remove(&id);
    REGISTERED.with(|flag| flag.set(false));
    tracing::info!(?id, "unregistered thread from GC root registry");
}

/// Adds `root` to the current thread's GC root set. A no-op if the
/// current thread hasn't called [`register`].
pub fn register_root(root: RootAddress) {
    let id = std::thread::current().id();
    if let Some(node) = REGISTRY.nodes.lock().get_mut(&id) {
        node.roots.push(root);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryStats {
    pub active_threads: usize,
    pub total_registered_ever: u64,
    pub total_gc_roots: usize,
    pub is_shutdown: bool,
}

/// Snapshots registry-wide counters, walking the node map under its lock.
pub fn stats() -> RegistryStats {
    let nodes = REGISTRY.nodes.lock();
    RegistryStats {
        active_threads: nodes.len(),
        total_registered_ever: REGISTRY.lifetime_registered.load(Ordering::Relaxed),
        total_gc_roots: nodes.values().map(|n| n.roots.len()).sum(),
        is_shutdown: REGISTRY.shutdown.load(Ordering::Relaxed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `REGISTRY` is a process-wide singleton shared with every other test
    /// in this binary, and the test harness pools worker threads across
    /// tests — so this asserts deltas on a dedicated spawned thread rather
    /// than absolute counts, which would be flaky under parallel test
    /// execution.
    #[test]
    fn s8_register_is_idempotent_and_unregister_removes_the_node() {
        let before = stats();
        let (tx, rx) = std::sync::mpsc::channel::<()>();
        let (ready_tx, ready_rx) = std::sync::mpsc::channel::<()>();

        let worker = std::thread::spawn(move || {
            register().unwrap();
            register().unwrap(); // idempotent: no second node
            let after_register = stats();
            ready_tx.send(()).unwrap();
            rx.recv().unwrap();
            unregister();
        });

        ready_rx.recv().unwrap();
        let during = stats();
        assert_eq!(during.active_threads, before.active_threads + 1);
        assert_eq!(during.total_registered_ever, before.total_registered_ever + 1);

        tx.send(()).unwrap();
        worker.join().unwrap();

        let after = stats();
        assert_eq!(after.active_threads, before.active_threads);
    }

    #[test]
    fn register_root_is_a_no_op_for_an_unregistered_thread() {
        // No panic, no visible effect — the call just has nowhere to file
        // the root.
        register_root(0xdead_beef);
    }
}
