//! Delayed and repeating timers in simulation time
//!
//! Timers carry a plain action tag instead of a callback. The owner drives
//! [`Scheduler::advance`] once per host tick and resolves the returned tags
//! itself, so a timer can never hold a reference into session state.

use serde::{Deserialize, Serialize};

/// Handle to a pending timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer<A> {
    id: TimerId,
    remaining_ms: u64,
    /// `Some` for repeating timers
    period_ms: Option<u64>,
    action: A,
}

/// Cooperative timer registry
#[derive(Debug, Clone)]
pub struct Scheduler<A> {
    /// Kept in registration order
    timers: Vec<Timer<A>>,
    next_id: u64,
    paused: bool,
    now_ms: u64,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self {
            timers: Vec::new(),
            next_id: 1,
            paused: false,
            now_ms: 0,
        }
    }
}

impl<A: Clone> Scheduler<A> {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&mut self, remaining_ms: u64, period_ms: Option<u64>, action: A) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            remaining_ms,
            period_ms,
            action,
        });
        id
    }

    /// Fire `action` once, `delay_ms` from now
    pub fn after(&mut self, delay_ms: u64, action: A) -> TimerId {
        self.register(delay_ms, None, action)
    }

    /// Fire `action` every `period_ms` until cancelled (first firing one period from now)
    pub fn every(&mut self, period_ms: u64, action: A) -> TimerId {
        let period = period_ms.max(1);
        self.register(period, Some(period), action)
    }

    /// Remove a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Number of pending timers
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Milliseconds of unpaused time delivered so far
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Drop every timer (teardown)
    pub fn clear(&mut self) {
        self.timers.clear();
    }

    /// Let `delta_ms` pass and return the actions that came due, ordered by
    /// due time and then by registration order.
    pub fn advance(&mut self, delta_ms: u64) -> Vec<A> {
        if self.paused {
            return Vec::new();
        }
        self.now_ms += delta_ms;

        // (offset into this delta, action); pushed in registration order so a
        // stable sort keeps registration order among ties
        let mut due: Vec<(u64, A)> = Vec::new();
        self.timers.retain_mut(|timer| {
            if timer.remaining_ms > delta_ms {
                timer.remaining_ms -= delta_ms;
                return true;
            }
            let mut at = timer.remaining_ms;
            due.push((at, timer.action.clone()));
            match timer.period_ms {
                None => false,
                Some(period) => {
                    while at + period <= delta_ms {
                        at += period;
                        due.push((at, timer.action.clone()));
                    }
                    timer.remaining_ms = at + period - delta_ms;
                    true
                }
            }
        });
        due.sort_by_key(|(at, _)| *at);
        due.into_iter().map(|(_, action)| action).collect()
    }
}
