// Per-CPU worker threads
//
// One thread per logical CPU id, alive for a single compute call. The worker
// owns its accumulator row outright and hands it back through the join handle,
// so the join is the only synchronization point for the row.
//
// ```text
//   orchestrator ── submit(interval) ──► unbounded channel ──► worker thread
//                                                               row.add_interval()
//   orchestrator ◄── shutdown_and_join() ── JoinHandle<CpuAccumulator>
// ```

use super::accumulator::CpuAccumulator;
use super::geometry::WindowGeometry;
use super::interval::Interval;
use crossbeam::channel::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

/// A worker bound to one logical CPU id
pub struct CpuWorker {
    cpu_id: usize,

    /// Dropped on shutdown; the worker drains what is queued and exits
    sender: Option<Sender<Interval>>,

    handle: Option<JoinHandle<CpuAccumulator>>,

    submitted: u64,
}

impl CpuWorker {
    /// Spawn the worker thread for `cpu_id`
    pub fn start(cpu_id: usize, geometry: WindowGeometry) -> Self {
        let (sender, receiver) = channel::unbounded();
        let handle = thread::spawn(move || Self::run(cpu_id, geometry, receiver));

        Self {
            cpu_id,
            sender: Some(sender),
            handle: Some(handle),
            submitted: 0,
        }
    }

    pub fn cpu_id(&self) -> usize {
        self.cpu_id
    }

    /// Number of intervals handed to this worker so far
    pub fn submitted(&self) -> u64 {
        self.submitted
    }

    /// Enqueue an interval
    ///
    /// Never blocks: the queue is unbounded.
    pub fn submit(&mut self, interval: Interval) {
        let Some(sender) = &self.sender else {
            return;
        };
        if sender.send(interval).is_err() {
            // Receiver only goes away if the worker thread died
            tracing::warn!(cpu_id = self.cpu_id, "worker gone, interval dropped");
            return;
        }
        self.submitted += 1;
    }

    /// Signal end of input, wait for the queue to drain, and return the row
    ///
    /// A panic inside the worker is resumed on the calling thread.
    pub fn shutdown_and_join(mut self) -> CpuAccumulator {
        self.sender.take();

        match self.handle.take() {
            Some(handle) => match handle.join() {
                Ok(row) => row,
                Err(panic) => std::panic::resume_unwind(panic),
            },
            None => unreachable!("worker joined twice"),
        }
    }

    /// Worker loop: apply every queued interval until the sender is dropped
    fn run(cpu_id: usize, geometry: WindowGeometry, receiver: Receiver<Interval>) -> CpuAccumulator {
        let mut row = CpuAccumulator::new(geometry.num_windows());
        let mut applied = 0u64;
        let mut skipped = 0u64;

        // iter() yields everything still buffered before reporting disconnect
        for interval in receiver.iter() {
            if row.add_interval(&geometry, interval) {
                applied += 1;
            } else {
                skipped += 1;
                tracing::trace!(
                    cpu_id,
                    start_ns = interval.start_ns,
                    end_ns = interval.end_ns,
                    "interval contributes nothing"
                );
            }
        }

        tracing::debug!(cpu_id, applied, skipped, "worker drained");
        row
    }
}

impl Drop for CpuWorker {
    fn drop(&mut self) {
        // Ensure the thread is not left running if the worker is dropped
        // without an explicit join
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// One worker per logical CPU id in `[0, num_cpus)`
pub struct WorkerPool {
    workers: Vec<CpuWorker>,
    unrouted: u64,
}

impl WorkerPool {
    /// Start `num_cpus` workers sharing the same window geometry
    pub fn start(num_cpus: usize, geometry: WindowGeometry) -> Self {
        let workers = (0..num_cpus)
            .map(|cpu_id| CpuWorker::start(cpu_id, geometry))
            .collect();
        Self {
            workers,
            unrouted: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Route an interval to the worker whose index equals its CPU id
    ///
    /// Ids without a worker (negative ids) are skipped.
    pub fn submit(&mut self, interval: Interval) {
        let worker = usize::try_from(interval.cpu_id)
            .ok()
            .and_then(|cpu| self.workers.get_mut(cpu));

        match worker {
            Some(worker) => worker.submit(interval),
            None => {
                self.unrouted += 1;
                tracing::trace!(cpu_id = interval.cpu_id, "no worker for cpu id");
            }
        }
    }

    /// Intervals skipped because no worker matched their CPU id
    pub fn unrouted(&self) -> u64 {
        self.unrouted
    }

    /// Shut every worker down and collect the rows in CPU id order
    pub fn shutdown_and_join(self) -> Vec<CpuAccumulator> {
        self.workers
            .into_iter()
            .map(CpuWorker::shutdown_and_join)
            .collect()
    }
}
