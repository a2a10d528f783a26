// A running timer owns one ticker task. Leaving `Running` aborts it and bumps
// the generation, so a tick already scheduled is ignored.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::alert::{play_best_effort, Alert};

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub time_left: u32,
    pub duration: u32,
}

struct Inner {
    state: TimerState,
    time_left: u32,
    duration: u32,
    generation: u64,
    ticker: Option<JoinHandle<()>>,
}

impl Inner {
    fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            state: self.state,
            time_left: self.time_left,
            duration: self.duration,
        }
    }

    fn stop_ticker(&mut self) {
        self.generation += 1;
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

pub struct RestTimer {
    inner: Arc<Mutex<Inner>>,
    alert: Arc<dyn Alert>,
    updates: Arc<watch::Sender<TimerSnapshot>>,
}

impl RestTimer {
    pub fn new(duration_secs: u32, alert: Arc<dyn Alert>) -> Self {
        let inner = Inner {
            state: TimerState::Idle,
            time_left: duration_secs,
            duration: duration_secs,
            generation: 0,
            ticker: None,
        };
        let (updates, _) = watch::channel(inner.snapshot());
        Self {
            inner: Arc::new(Mutex::new(inner)),
            alert,
            updates: Arc::new(updates),
        }
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.inner.lock().snapshot()
    }

    pub fn state(&self) -> TimerState {
        self.inner.lock().state
    }

    pub fn time_left(&self) -> u32 {
        self.inner.lock().time_left
    }

    pub fn duration(&self) -> u32 {
        self.inner.lock().duration
    }

    pub fn is_active(&self) -> bool {
        self.state() == TimerState::Running
    }

    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.updates.subscribe()
    }

    /// Must be called from within a Tokio runtime.
    pub fn start(&self, duration_secs: Option<u32>) {
        let expired_now = {
            let mut inner = self.inner.lock();
            inner.stop_ticker();
            let duration = duration_secs.filter(|d| *d > 0).unwrap_or(inner.duration);
            inner.duration = duration;
            inner.time_left = duration;

            if duration == 0 {
                inner.state = TimerState::Expired;
                true
            } else {
                inner.state = TimerState::Running;
                self.spawn_ticker(&mut inner);
                false
            }
        };
        tracing::debug!("Rest timer started: {:?}", self.snapshot());
        self.publish();
        if expired_now {
            play_best_effort(self.alert.as_ref());
        }
    }

    pub fn pause(&self) -> bool {
        {
            let mut inner = self.inner.lock();
            if inner.state != TimerState::Running {
                return false;
            }
            inner.stop_ticker();
            inner.state = TimerState::Paused;
        }
        self.publish();
        true
    }

    pub fn resume(&self) -> bool {
        {
            let mut inner = self.inner.lock();
            if inner.state != TimerState::Paused || inner.time_left == 0 {
                return false;
            }
            inner.state = TimerState::Running;
            self.spawn_ticker(&mut inner);
        }
        self.publish();
        true
    }

    /// Stops the countdown and rewinds to the (possibly new) duration.
    pub fn reset(&self, duration_secs: Option<u32>) {
        {
            let mut inner = self.inner.lock();
            inner.stop_ticker();
            let duration = duration_secs.filter(|d| *d > 0).unwrap_or(inner.duration);
            inner.duration = duration;
            inner.time_left = duration;
            inner.state = TimerState::Idle;
        }
        self.publish();
    }

    fn publish(&self) {
        self.updates.send_replace(self.snapshot());
    }

    fn spawn_ticker(&self, inner: &mut Inner) {
        inner.stop_ticker();
        let generation = inner.generation;
        let shared = Arc::clone(&self.inner);
        let alert = Arc::clone(&self.alert);
        let updates = Arc::clone(&self.updates);

        inner.ticker = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + TICK, TICK);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;

                let expired = {
                    let mut inner = shared.lock();
                    if inner.generation != generation || inner.state != TimerState::Running {
                        return;
                    }
                    inner.time_left = inner.time_left.saturating_sub(1);
                    let expired = inner.time_left == 0;
                    if expired {
                        inner.state = TimerState::Expired;
                        // Our own handle; dropping it only detaches
                        inner.ticker = None;
                    }
                    updates.send_replace(inner.snapshot());
                    expired
                };

                if expired {
                    tracing::info!("Rest period over");
                    play_best_effort(alert.as_ref());
                    return;
                }
            }
        }));
    }
}

impl Drop for RestTimer {
    fn drop(&mut self) {
        self.inner.lock().stop_ticker();
    }
}
