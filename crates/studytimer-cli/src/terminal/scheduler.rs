//! Tokio-backed [`Scheduler`].
//!
//! Each handle is a spawned task that sends the handle over a channel every
//! time it elapses. The run loop receives from that channel and hands the
//! handle to the widget, so all widget state stays on the loop's task.

use std::collections::HashMap;
use std::time::Duration;

use studytimer_core::{Repeat, Scheduler, TimerHandle};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tracing::trace;

pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<TimerHandle>,
    tasks: HashMap<TimerHandle, JoinHandle<()>>,
    next_id: u64,
}

impl TokioScheduler {
    /// Must be called from within a tokio runtime.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TimerHandle>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            tx,
            tasks: HashMap::new(),
            next_id: 0,
        };
        (scheduler, rx)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, period: Duration, repeat: Repeat) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle::new(self.next_id);
        let tx = self.tx.clone();

        let task = tokio::spawn(async move {
            match repeat {
                Repeat::Once => {
                    sleep(period).await;
                    let _ = tx.send(handle);
                }
                Repeat::Every => {
                    let mut interval = interval_at(Instant::now() + period, period);
                    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    loop {
                        interval.tick().await;
                        if tx.send(handle).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        self.tasks.retain(|_, task| !task.is_finished());
        self.tasks.insert(handle, task);
        trace!(handle = handle.id(), ?period, ?repeat, "timer scheduled");
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
            trace!(handle = handle.id(), "timer cancelled");
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}
