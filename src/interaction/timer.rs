//! Auto-cycle timer: a producer thread sending `AutoCycleTick` on a fixed interval.
//! It stops when dropped, when `stop` is called, or when the request
//! channel has no receiver left.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::debug;

use crate::interaction::events::HighlightRequest;

pub const AUTO_CYCLE_INTERVAL: Duration = Duration::from_secs(5);

pub struct AutoCycleTimer {
    stop: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl AutoCycleTimer {
    pub fn spawn<I>(interval: Duration, requests: Sender<HighlightRequest<I>>) -> Self
    where
        I: Send + 'static,
    {
        let (stop, stopped) = mpsc::channel::<()>();

        let worker = thread::spawn(move || loop {
            match stopped.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    if requests.send(HighlightRequest::AutoCycleTick).is_err() {
                        debug!("auto-cycle timer exiting: no consumer");
                        break;
                    }
                }
                // stop request or the timer handle was dropped
                _ => break,
            }
        });

        Self {
            stop: Some(stop),
            worker: Some(worker),
        }
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for AutoCycleTimer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
