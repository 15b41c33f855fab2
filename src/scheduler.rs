//! Deterministic timer queue.
//!
//! Periodic polls, badge resets and delayed console echoes are all tasks in
//! one [`Scheduler`]. Time is a [`Duration`] since session start read from a
//! [`Clock`], so tests drive timers with [`ManualClock`] instead of sleeping.
//!
//! Fires are never coalesced: a periodic task that fell several intervals
//! behind yields one job per missed interval.

use std::cell::Cell;
use std::time::{Duration, Instant};

use crate::activity::LogKind;
use crate::backend::ToolKind;

// ---------------------------------------------------------------------------
// Clocks
// ---------------------------------------------------------------------------

/// Source of session-relative time.
pub trait Clock {
    fn elapsed(&self) -> Duration;
}

/// Wall clock anchored at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Hand-advanced clock for tests and replays.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> Duration {
        self.now.get()
    }
}

// ---------------------------------------------------------------------------
// Jobs and tasks
// ---------------------------------------------------------------------------

/// Work the dashboard performs when a task fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    /// Run the connection monitor.
    PollConnection,
    /// Append one background tool activity entry.
    Activity,
    /// Revert a tool badge from `running` to `active`.
    ResetBadge(ToolKind),
    /// Append a log entry (delayed console output).
    Echo { kind: LogKind, message: String },
}

/// Handle returned by `schedule_*`, used to cancel the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone, Copy)]
enum Repeat {
    Once,
    Every(Duration),
}

#[derive(Debug)]
struct Task {
    id: u64,
    job: Job,
    due: Duration,
    repeat: Repeat,
}

/// Pending timers, ordered by due time on demand.
#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: Vec<Task>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `job` once at `now + delay`.
    pub fn schedule_once(&mut self, now: Duration, delay: Duration, job: Job) -> TaskHandle {
        self.push(job, now + delay, Repeat::Once)
    }

    /// Run `job` every `interval`, first at `now + interval`.
    pub fn schedule_every(&mut self, now: Duration, interval: Duration, job: Job) -> TaskHandle {
        let interval = interval.max(Duration::from_millis(1));
        self.push(job, now + interval, Repeat::Every(interval))
    }

    /// Cancel a pending task. Returns `false` if it already finished.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != handle.0);
        self.tasks.len() != before
    }

    /// Remove and return every job due at `now`, earliest first.
    ///
    /// Periodic tasks are rescheduled; each missed interval produces its
    /// own job.
    pub fn take_due(&mut self, now: Duration) -> Vec<Job> {
        let mut fired: Vec<(Duration, u64, Job)> = Vec::new();

        for task in &mut self.tasks {
            match task.repeat {
                Repeat::Once => {
                    if task.due <= now {
                        fired.push((task.due, task.id, task.job.clone()));
                    }
                }
                Repeat::Every(interval) => {
                    while task.due <= now {
                        fired.push((task.due, task.id, task.job.clone()));
                        task.due += interval;
                    }
                }
            }
        }

        self.tasks
            .retain(|t| !(matches!(t.repeat, Repeat::Once) && t.due <= now));

        fired.sort_by_key(|(due, id, _)| (*due, *id));
        fired.into_iter().map(|(_, _, job)| job).collect()
    }

    /// Earliest pending due time.
    pub fn next_due(&self) -> Option<Duration> {
        self.tasks.iter().map(|t| t.due).min()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn push(&mut self, job: Job, due: Duration, repeat: Repeat) -> TaskHandle {
        self.next_id += 1;
        let id = self.next_id;
        self.tasks.push(Task {
            id,
            job,
            due,
            repeat,
        });
        TaskHandle(id)
    }
}
