//! Fixed-rate stepping loop on a worker thread
//!
//! The simulator is moved into the worker, which is then its only writer.
//! Other threads talk to it through a [`LayoutHandle`]:
//! - reconfiguration is validated on the caller's side and queued; the worker
//!   drains the queue between steps only,
//! - positions are read from the latest published [`Snapshot`], an owned copy,
//!   never from the live bodies.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::ParameterError;
use crate::simulation::engine::Simulator;
use crate::simulation::params::ParamChange;
use crate::simulation::states::Snapshot;

#[derive(Debug, Clone, Copy)]
pub struct DriverOptions {
    pub tick: Duration, // time between step starts
    pub settle_threshold: Option<f64>, // log once when max displacement drops below this
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(16),
            settle_threshold: None,
        }
    }
}

enum Command {
    Reconfigure(ParamChange),
    Stop,
}

pub struct LayoutDriver;

impl LayoutDriver {
    pub fn spawn(simulator: Simulator, options: DriverOptions) -> LayoutHandle {
        let (commands, rx) = mpsc::channel();
        let latest = Arc::new(Mutex::new(Arc::new(simulator.snapshot())));
        let published = Arc::clone(&latest);

        info!(tick_ms = options.tick.as_millis() as u64, "layout driver started");
        let worker = thread::spawn(move || drive(simulator, rx, published, options));

        LayoutHandle {
            commands,
            latest,
            worker: Some(worker),
        }
    }
}

pub struct LayoutHandle {
    commands: Sender<Command>,
    latest: Arc<Mutex<Arc<Snapshot>>>,
    worker: Option<JoinHandle<Simulator>>,
}

impl LayoutHandle {
    /// Queue a parameter change for the next step boundary.
    /// Out-of-range values are rejected here and never reach the worker.
    pub fn reconfigure(&self, change: ParamChange) -> Result<(), ParameterError> {
        change.validate()?;
        if self.commands.send(Command::Reconfigure(change)).is_err() {
            warn!(?change, "layout driver is gone; reconfiguration dropped");
        }
        Ok(())
    }

    /// Latest positions published by the worker
    pub fn snapshot(&self) -> Arc<Snapshot> {
        let guard = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Stop the worker and take the simulator back.
    /// `None` if the worker panicked.
    pub fn stop(mut self) -> Option<Simulator> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Option<Simulator> {
        let worker = self.worker.take()?;
        let _ = self.commands.send(Command::Stop);
        worker.join().ok()
    }
}

impl Drop for LayoutHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn drive(mut simulator: Simulator, rx: Receiver<Command>, published: Arc<Mutex<Arc<Snapshot>>>, options: DriverOptions) -> Simulator {
    let mut settled = false;

    loop {
        let started = Instant::now();
        let metrics = simulator.step();

        let snapshot = Arc::new(simulator.snapshot());
        *published.lock().unwrap_or_else(PoisonError::into_inner) = snapshot;

        if let Some(threshold) = options.settle_threshold {
            let below = metrics.max_displacement < threshold;
            if below && !settled {
                info!(step = metrics.step, max_displacement = metrics.max_displacement, "layout settled");
            }
            settled = below;
        }

        // wait out the tick; anything arriving now is applied before the next step
        let deadline = started + options.tick;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok(Command::Reconfigure(change)) => {
                    if let Err(e) = simulator.apply(change) {
                        warn!(error = %e, "reconfiguration rejected");
                    }
                }
                Ok(Command::Stop) | Err(RecvTimeoutError::Disconnected) => {
                    debug!(steps = simulator.step_count(), "layout driver stopping");
                    return simulator;
                }
                Err(RecvTimeoutError::Timeout) => break,
            }
        }
    }
}
