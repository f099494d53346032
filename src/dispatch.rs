use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

/// Fixed period at which the owning context drains the queue
pub const DRAIN_INTERVAL: Duration = Duration::from_millis(100);

/// A deferred call executed on the owning context
pub type Task<S> = Box<dyn FnOnce(&mut S) + Send>;

/// Producer handle for the deferred-call queue
///
/// Cloneable and sendable to other threads; enqueueing never blocks.
/// Calls from one producer run in exactly their submission order.
pub struct DispatchHandle<S> {
    tx: Sender<Task<S>>,
}

impl<S> Clone for DispatchHandle<S> {
    fn clone(&self) -> Self {
        DispatchHandle {
            tx: self.tx.clone(),
        }
    }
}

impl<S> DispatchHandle<S> {
    /// Enqueue a deferred call
    ///
    /// Returns false if the owning context has shut down, in which case
    /// the call is dropped; producer loops use that to stop themselves.
    pub fn enqueue(&self, task: impl FnOnce(&mut S) + Send + 'static) -> bool {
        self.tx.send(Box::new(task)).is_ok()
    }
}

/// Consumer end of the deferred-call queue
///
/// Owned by the single context allowed to mutate `S`; every queued call
/// runs on that context.
pub struct DispatchQueue<S> {
    rx: Receiver<Task<S>>,
}

impl<S> DispatchQueue<S> {
    /// Execute every queued call in FIFO submission order
    ///
    /// Runs whatever is queued right now and returns how many calls ran;
    /// never blocks waiting for more. Safe to call during shutdown.
    pub fn drain(&self, state: &mut S) -> usize {
        let mut executed = 0;
        while let Ok(task) = self.rx.try_recv() {
            task(state);
            executed += 1;
        }
        if executed > 0 {
            log::debug!("Dispatched {} deferred calls", executed);
        }
        executed
    }
}

/// Create a connected producer/consumer pair for state type `S`
pub fn channel<S>() -> (DispatchHandle<S>, DispatchQueue<S>) {
    let (tx, rx) = mpsc::channel();
    (DispatchHandle { tx }, DispatchQueue { rx })
}
