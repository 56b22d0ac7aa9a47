use crate::error::{GameError, GameResult};
use crate::types::Feedback;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

// Discussion countdown. Remaining time is always derived from a fixed end timestamp, never from
// counted ticks, so late or dropped polls do not drift the display.

const LOG_TARGET: &str = "impostor::timer";

pub trait Clock {
    fn now_ms(&self) -> u64;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Hand-driven clock. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum TimerTick {
    Idle,
    Running { remaining_secs: u64 },
    /// Returned by the single poll that observes the countdown reach zero.
    Completed,
}

impl TimerTick {
    pub fn feedback(&self) -> Option<Feedback> {
        match self {
            TimerTick::Completed => Some(Feedback::TimerFinished),
            _ => None,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct DiscussionTimer {
    ends_at_ms: Option<u64>,
    remaining_secs: u64,
}

impl DiscussionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.ends_at_ms.is_some()
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn start(&mut self, duration_secs: u64, grace_ms: u64, now_ms: u64) -> GameResult<()> {
        if self.is_running() {
            return Err(GameError::TimerRunning);
        }
        let ends_at = now_ms
            .saturating_add(duration_secs.saturating_mul(1_000))
            .saturating_add(grace_ms);
        self.ends_at_ms = Some(ends_at);
        self.remaining_secs = remaining_secs(ends_at, now_ms);
        tracing::debug!(target: LOG_TARGET, duration_secs, ends_at, "countdown started");
        Ok(())
    }

    pub fn tick(&mut self, now_ms: u64) -> TimerTick {
        let Some(ends_at) = self.ends_at_ms else {
            return TimerTick::Idle;
        };
        self.remaining_secs = remaining_secs(ends_at, now_ms);
        if self.remaining_secs == 0 {
            self.ends_at_ms = None;
            tracing::debug!(target: LOG_TARGET, "countdown finished");
            return TimerTick::Completed;
        }
        TimerTick::Running {
            remaining_secs: self.remaining_secs,
        }
    }

    pub fn cancel(&mut self) {
        if self.ends_at_ms.take().is_some() {
            tracing::debug!(target: LOG_TARGET, "countdown cancelled");
        }
        self.remaining_secs = 0;
    }
}

/// `ceil((ends_at - now) / 1000)`, clamped at zero.
pub fn remaining_secs(ends_at_ms: u64, now_ms: u64) -> u64 {
    ends_at_ms.saturating_sub(now_ms).div_ceil(1_000)
}
