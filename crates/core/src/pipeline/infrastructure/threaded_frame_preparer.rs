use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::thread::JoinHandle;

use crate::encoding::frame_layout::FrameLayout;
use crate::pipeline::frame_preparer::{
    prepare_frame, FramePreparer, FrameSink, FrameSources, PrepareError, PreparedFrame,
};

/// In-flight frames allowed per worker before dispatch waits for the writer.
const WINDOW_PER_WORKER: usize = 2;

type Job = (usize, PathBuf);
type Done = (usize, Result<PreparedFrame, PrepareError>);

/// Decodes and scales frames on a pool of worker threads.
///
/// Layout: `dispatch → workers [decode/scale/compose] → reorder → sink`
///
/// The calling thread dispatches jobs, collects results and hands them to
/// the sink strictly in path order. At most `workers * 2` frames are in
/// flight (queued, being prepared, or waiting in the reorder buffer), which
/// bounds memory regardless of how unevenly the workers finish.
pub struct ThreadedFramePreparer {
    workers: usize,
    window: usize,
}

impl ThreadedFramePreparer {
    pub fn new(workers: usize) -> Self {
        let workers = workers.max(1);
        Self {
            workers,
            window: workers * WINDOW_PER_WORKER,
        }
    }

    /// One worker per available CPU.
    pub fn with_available_parallelism() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::new(workers)
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl FramePreparer for ThreadedFramePreparer {
    fn prepare(
        &self,
        paths: &[PathBuf],
        layout: &FrameLayout,
        sources: &FrameSources,
        sink: &mut FrameSink<'_>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let (job_tx, job_rx) = crossbeam_channel::bounded::<Job>(self.window);
        let (done_tx, done_rx) = crossbeam_channel::bounded::<Done>(self.window);

        let handles: Vec<_> = (0..self.workers)
            .map(|_| spawn_worker(job_rx.clone(), done_tx.clone(), sources.clone(), *layout))
            .collect();
        drop(job_rx);
        drop(done_tx);

        let result = run_reorder_loop(paths, &job_tx, &done_rx, sink, self.window);

        // Closing both ends unblocks any worker still waiting on a channel.
        drop(job_tx);
        drop(done_rx);

        join_workers(handles, result)
    }
}

fn spawn_worker(
    jobs: crossbeam_channel::Receiver<Job>,
    done: crossbeam_channel::Sender<Done>,
    sources: FrameSources,
    layout: FrameLayout,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        for (index, path) in jobs.iter() {
            // Every dispatched index gets a result, panics included.
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                prepare_frame(&sources, &layout, &path, index)
            }))
            .unwrap_or_else(|_| Err(PrepareError::Panicked { path: path.clone() }));
            if done.send((index, result)).is_err() {
                break;
            }
        }
    })
}

fn run_reorder_loop(
    paths: &[PathBuf],
    job_tx: &crossbeam_channel::Sender<Job>,
    done_rx: &crossbeam_channel::Receiver<Done>,
    sink: &mut FrameSink<'_>,
    window: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let total = paths.len();
    let mut dispatched = 0;
    let mut next = 0;
    let mut pending: BTreeMap<usize, PreparedFrame> = BTreeMap::new();

    while next < total {
        while dispatched < total && dispatched < next + window {
            job_tx
                .send((dispatched, paths[dispatched].clone()))
                .map_err(|_| "frame workers exited early")?;
            dispatched += 1;
        }

        let (index, result) = done_rx.recv().map_err(|_| "frame workers exited early")?;
        pending.insert(index, result?);

        while let Some(prepared) = pending.remove(&next) {
            sink(prepared)?;
            next += 1;
        }
    }

    Ok(())
}

fn join_workers(
    handles: Vec<JoinHandle<()>>,
    result: Result<(), Box<dyn std::error::Error>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut panicked = false;
    for handle in handles {
        panicked |= handle.join().is_err();
    }
    match result {
        Err(e) => Err(e),
        Ok(()) if panicked => Err("frame worker panicked".into()),
        Ok(()) => Ok(()),
    }
}
