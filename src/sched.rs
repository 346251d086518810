//! Per-frame cooperative task scheduler
//!
//! Timed sequences (reward hand-outs, "wait for the dice to settle, then pay
//! out") are tasks that run until their next suspension point and report
//! what they are waiting for. The scheduler is advanced once per frame on
//! the game thread and resumes every task whose wait condition holds.
//!
//! Cancellation is cooperative: a cancelled task gets its `cancel` hook on
//! the next tick and is then dropped, never mid-step.

use std::collections::HashSet;

/// What a suspended task is waiting for
#[derive(Debug, Clone, PartialEq)]
pub enum Wait {
    /// Resume on the next frame
    NextFrame,
    /// Resume once this many seconds have elapsed
    Sleep(f32),
    /// Resume once the named signal has been fired
    Signal(&'static str),
}

/// Result of resuming a task
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Suspend until the condition holds
    Wait(Wait),
    /// Task finished
    Done,
}

/// A resumable unit of work operating on a shared context
pub trait Task<C> {
    /// Run until the next suspension point
    fn resume(&mut self, ctx: &mut C) -> Step;

    /// Clean up after cancellation
    fn cancel(&mut self, _ctx: &mut C) {}
}

/// Handle to a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u32);

/// Resolved resume condition
#[derive(Debug, Clone, PartialEq)]
enum Resume {
    Frame(u64),
    At(f64),
    Signal(&'static str),
}

struct Entry<C> {
    id: TaskId,
    resume: Resume,
    cancelled: bool,
    task: Box<dyn Task<C>>,
}

/// Single-threaded scheduler advanced once per frame
pub struct Scheduler<C> {
    /// Seconds since the scheduler was created
    now: f64,
    /// Frames ticked so far
    frame: u64,
    tasks: Vec<Entry<C>>,
    signals: HashSet<&'static str>,
    next_id: u32,
}

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Scheduler<C> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            frame: 0,
            tasks: Vec::new(),
            signals: HashSet::new(),
            next_id: 1,
        }
    }

    /// Current scheduler time in seconds
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Number of live (not yet finished) tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// True while the task has neither finished nor been dropped
    pub fn is_running(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|e| e.id == id)
    }

    /// Schedule a task; it first runs on the next tick
    pub fn spawn(&mut self, task: impl Task<C> + 'static) -> TaskId {
        self.spawn_after(task, Wait::NextFrame)
    }

    /// Schedule a task that first runs once `wait` holds
    pub fn spawn_after(&mut self, task: impl Task<C> + 'static, wait: Wait) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        let resume = self.resolve(wait);
        self.tasks.push(Entry {
            id,
            resume,
            cancelled: false,
            task: Box::new(task),
        });
        id
    }

    /// Request cancellation; takes effect on the next tick
    pub fn cancel(&mut self, id: TaskId) -> bool {
        match self.tasks.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.cancelled = true;
                true
            }
            None => false,
        }
    }

    /// Fire a latched signal; it stays set until `clear_signal`
    pub fn fire(&mut self, signal: &'static str) {
        self.signals.insert(signal);
    }

    pub fn clear_signal(&mut self, signal: &'static str) {
        self.signals.remove(signal);
    }

    fn resolve(&self, wait: Wait) -> Resume {
        match wait {
            Wait::NextFrame => Resume::Frame(self.frame + 1),
            Wait::Sleep(secs) => Resume::At(self.now + f64::from(secs.max(0.0))),
            Wait::Signal(name) => Resume::Signal(name),
        }
    }

    fn ready(&self, resume: &Resume) -> bool {
        match resume {
            Resume::Frame(frame) => self.frame >= *frame,
            // Small slack so accumulated f32 frame times still wake on schedule
            Resume::At(t) => self.now + 1e-6 >= *t,
            Resume::Signal(name) => self.signals.contains(name),
        }
    }

    /// Advance time by `dt` and resume every ready task once
    pub fn tick(&mut self, ctx: &mut C, dt: f32) {
        self.now += f64::from(dt);
        self.frame += 1;

        let mut tasks = std::mem::take(&mut self.tasks);
        tasks.retain_mut(|entry| {
            if entry.cancelled {
                log::debug!("Task {:?} cancelled", entry.id);
                entry.task.cancel(ctx);
                return false;
            }
            if !self.ready(&entry.resume) {
                return true;
            }
            match entry.task.resume(ctx) {
                Step::Wait(wait) => {
                    entry.resume = self.resolve(wait);
                    true
                }
                Step::Done => false,
            }
        });
        // Tasks spawned by callers between ticks land after the survivors
        tasks.append(&mut self.tasks);
        self.tasks = tasks;
    }
}
