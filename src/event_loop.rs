//! Single-threaded cooperative scheduler.
//!
//! Every asynchronous callback in the coordinator (deferred backend message
//! processing, link-follow and highlight timeouts, animation frames) runs as a
//! task on this loop. Tasks receive the loop's owner mutably, so each one
//! mutates shared state head-to-tail inside a single tick.
//!
//! Time is driven by the host: [`advance`] moves the clock and fires due
//! timers in order, which keeps ordering deterministic under test.

use std::collections::BTreeMap;
use std::time::Duration;

/// A one-shot task.
pub type Task<C> = Box<dyn FnOnce(&mut C)>;

/// A repeating task.
pub type IntervalTask<C> = Box<dyn FnMut(&mut C)>;

/// Handle to a pending timeout or interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

enum Entry<C> {
    Once(Task<C>),
    Interval {
        period: Duration,
        task: IntervalTask<C>,
    },
}

/// A task popped from the loop, ready to run against the owner.
pub enum Runnable<C> {
    Once(Task<C>),
    Interval {
        id: TimerId,
        period: Duration,
        task: IntervalTask<C>,
    },
}

/// Owners expose their loop so the free run functions can drive it.
pub trait EventLoopOwner: Sized + 'static {
    fn event_loop(&mut self) -> &mut EventLoop<Self>;
}

/// Timer queue ordered by due time, then by scheduling order.
pub struct EventLoop<C> {
    now: Duration,
    entries: BTreeMap<(Duration, u64), (TimerId, Entry<C>)>,
    next_seq: u64,
    /// Interval currently popped for execution.
    running: Option<TimerId>,
    /// Set when the running interval cleared itself.
    running_cleared: bool,
}

impl<C> Default for EventLoop<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> EventLoop<C> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            entries: BTreeMap::new(),
            next_seq: 0,
            running: None,
            running_cleared: false,
        }
    }

    /// Current loop time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Queue `task` for the next tick. Never runs it synchronously.
    pub fn defer(&mut self, task: Task<C>) -> TimerId {
        self.set_timeout(Duration::ZERO, task)
    }

    /// Run `task` once, `delay` after now.
    pub fn set_timeout(&mut self, delay: Duration, task: Task<C>) -> TimerId {
        self.insert(self.now + delay, Entry::Once(task))
    }

    /// Run `task` every `period` until cleared.
    pub fn set_interval(&mut self, period: Duration, task: IntervalTask<C>) -> TimerId {
        let period = period.max(Duration::from_millis(1));
        self.insert(self.now + period, Entry::Interval { period, task })
    }

    /// Cancel a pending timer. Returns false if it already ran or was cleared.
    pub fn clear_timer(&mut self, id: TimerId) -> bool {
        if self.running == Some(id) {
            self.running_cleared = true;
            return true;
        }
        let key = self
            .entries
            .iter()
            .find(|(_, (timer_id, _))| *timer_id == id)
            .map(|(key, _)| *key);
        match key {
            Some(key) => {
                self.entries.remove(&key);
                true
            }
            None => false,
        }
    }

    /// Number of pending tasks and timers.
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    pub fn is_idle(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pop the oldest entry that is due at the current time.
    pub fn pop_ready(&mut self) -> Option<Runnable<C>> {
        let key = *self.entries.keys().next()?;
        if key.0 > self.now {
            return None;
        }
        let (id, entry) = self.entries.remove(&key)?;
        match entry {
            Entry::Once(task) => Some(Runnable::Once(task)),
            Entry::Interval { period, task } => {
                self.running = Some(id);
                self.running_cleared = false;
                Some(Runnable::Interval { id, period, task })
            }
        }
    }

    /// Re-arm an interval after it ran, unless it was cleared meanwhile.
    pub fn resume_interval(&mut self, id: TimerId, period: Duration, task: IntervalTask<C>) {
        let cleared = self.running == Some(id) && self.running_cleared;
        self.running = None;
        self.running_cleared = false;
        if cleared {
            return;
        }
        let seq = self.bump_seq();
        self.entries
            .insert((self.now + period, seq), (id, Entry::Interval { period, task }));
    }

    fn next_due(&self) -> Option<Duration> {
        self.entries.keys().next().map(|(due, _)| *due)
    }

    fn insert(&mut self, due: Duration, entry: Entry<C>) -> TimerId {
        let seq = self.bump_seq();
        let id = TimerId(seq);
        self.entries.insert((due, seq), (id, entry));
        id
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

/// Run a single due task (one tick). Returns false if nothing was due.
pub fn run_next<C: EventLoopOwner>(owner: &mut C) -> bool {
    match owner.event_loop().pop_ready() {
        Some(Runnable::Once(task)) => {
            task(owner);
            true
        }
        Some(Runnable::Interval {
            id,
            period,
            mut task,
        }) => {
            task(owner);
            owner.event_loop().resume_interval(id, period, task);
            true
        }
        None => false,
    }
}

/// Run due tasks until none remain at the current time. Returns the count run.
pub fn run_until_idle<C: EventLoopOwner>(owner: &mut C) -> usize {
    let mut ran = 0;
    while run_next(owner) {
        ran += 1;
    }
    ran
}

/// Move the clock forward by `by`, firing timers in due order. Returns the count run.
pub fn advance<C: EventLoopOwner>(owner: &mut C, by: Duration) -> usize {
    let target = owner.event_loop().now + by;
    let mut ran = run_until_idle(owner);
    loop {
        let due = match owner.event_loop().next_due() {
            Some(due) if due <= target => due,
            _ => break,
        };
        let event_loop = owner.event_loop();
        event_loop.now = event_loop.now.max(due);
        ran += run_until_idle(owner);
    }
    owner.event_loop().now = target;
    ran + run_until_idle(owner)
}
