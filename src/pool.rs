use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use log::{debug, error};

use crate::{PoolError, Result};

/// A unit of work: a zero-argument closure run exactly once by a worker.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// How long a worker blocks on an empty queue before re-checking the stop
/// condition. Bounds the shutdown latency of an idle worker.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A fixed-size pool of worker threads sharing one FIFO task queue.
///
/// Construction starts the workers immediately; they pull tasks from an
/// MPMC channel, so tasks waiting together are dequeued in submission
/// order, though completion order across workers is not guaranteed.
///
/// [`shutdown`](WorkerPool::shutdown) stops acceptance of new work and
/// blocks until every queued and in-flight task has completed and all
/// workers have exited. Dropping the pool without calling `shutdown`
/// closes the channel instead: workers drain the remaining queue and exit
/// on their own, but detached rather than joined.
pub struct WorkerPool {
    /// True until `shutdown` flips it; never set back to true. Guards the
    /// check-then-enqueue in `submit` against a racing `shutdown`.
    running: Arc<Mutex<bool>>,
    tx: Sender<Task>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkerPool {
    /// Creates a pool and starts `workers` worker threads.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfiguration`] if `workers` is zero,
    /// or [`PoolError::Io`] if a worker thread fails to spawn. On a spawn
    /// failure the channel is dropped with the partially built pool, so
    /// any workers already started exit on their own.
    pub fn new(workers: u32) -> Result<WorkerPool> {
        if workers == 0 {
            return Err(PoolError::InvalidConfiguration);
        }

        let (tx, rx) = channel::unbounded::<Task>();
        let running = Arc::new(Mutex::new(true));

        let mut handles = Vec::with_capacity(workers as usize);
        for id in 0..workers {
            let rx = rx.clone();
            let running = Arc::clone(&running);
            let handle = thread::Builder::new()
                .name(format!("pool-worker-{id}"))
                .spawn(move || worker_loop(id, rx, running))?;
            handles.push(handle);
        }

        Ok(WorkerPool {
            running,
            tx,
            workers: Mutex::new(handles),
        })
    }

    /// Enqueues a task for execution by one of the workers.
    ///
    /// Never blocks. Tasks accepted here are guaranteed to run exactly
    /// once, even if `shutdown` begins immediately afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::PoolClosed`] if the pool has shut down; the
    /// task is discarded and never runs.
    pub fn submit<F>(&self, task: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        // The lock is held across the send so a concurrent shutdown cannot
        // flip the flag between the check and the enqueue and strand an
        // accepted task.
        let running = self.running.lock().expect("pool state mutex poisoned");
        if !*running {
            return Err(PoolError::PoolClosed);
        }
        self.tx
            .send(Box::new(task))
            .map_err(|_| PoolError::PoolClosed)?;
        Ok(())
    }

    /// Stops accepting new work and blocks until all workers have exited.
    ///
    /// Every task accepted by `submit` before the shutdown took effect is
    /// run before this returns. Calling `shutdown` again is a no-op: the
    /// flag stays down and there are no workers left to join.
    pub fn shutdown(&self) {
        {
            let mut running = self.running.lock().expect("pool state mutex poisoned");
            *running = false;
        }

        // Handles are taken out before joining so a second caller finds an
        // empty list instead of deadlocking on the mutex.
        let handles: Vec<JoinHandle<()>> = {
            let mut workers = self.workers.lock().expect("worker handle mutex poisoned");
            workers.drain(..).collect()
        };

        for handle in handles {
            if handle.join().is_err() {
                error!("Worker thread panicked outside of a task");
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Dropping the sender closes the channel; workers drain the queue
        // and exit without being joined
    }
}

/// The worker loop: dequeue, run, repeat, until the pool has stopped and
/// the queue is drained, or the channel disconnects.
///
/// A panic raised by a task is caught and logged so one failing task does
/// not shrink the pool's worker count.
fn worker_loop(id: u32, rx: Receiver<Task>, running: Arc<Mutex<bool>>) {
    loop {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(task) => {
                debug!("Worker {id} executing task");
                if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
                    error!("Worker {id} task panicked, continuing");
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                // Once the flag is down no submit can succeed, so an empty
                // queue stays empty and the worker can exit.
                let stopped = !*running.lock().expect("pool state mutex poisoned");
                if stopped && rx.is_empty() {
                    debug!("Worker {id}: pool stopped and queue drained, exiting");
                    return;
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                debug!("Worker {id}: channel closed, exiting");
                return;
            }
        }
    }
}
