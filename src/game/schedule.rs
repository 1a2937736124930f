use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

pub type Task = Box<dyn FnOnce() + 'static>;

/// Runs one-shot tasks later on the same thread.
pub trait Scheduler {
    type Handle;

    fn schedule_once(&self, delay: Duration, task: Task) -> Self::Handle;

    /// Must only be given handles whose task has not run yet.
    fn cancel(&self, handle: Self::Handle);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ManualHandle(u64);

struct QueuedTask {
    id: u64,
    due: Duration,
    task: Task,
}

#[derive(Default)]
struct ManualQueue {
    now: Duration,
    next_id: u64,
    tasks: Vec<QueuedTask>,
}

/// A scheduler driven by hand: time only moves when `advance` is called.
/// Clones share one queue.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<ManualQueue>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().tasks.len()
    }

    pub fn now(&self) -> Duration {
        self.queue.borrow().now
    }

    /// Moves the clock forward and runs every task that has come due, in due
    /// order. Returns how many ran.
    pub fn advance(&self, by: Duration) -> usize {
        let deadline = self.now() + by;

        let mut ran = 0;
        // The queue borrow is released before each task runs so tasks can
        // schedule or cancel.
        while let Some(task) = self.take_due(deadline) {
            task();
            ran += 1;
        }
        self.queue.borrow_mut().now = deadline;
        ran
    }

    /// Runs everything queued, however far in the future.
    pub fn run_all(&self) -> usize {
        let latest = self
            .queue
            .borrow()
            .tasks
            .iter()
            .map(|queued| queued.due)
            .max();
        match latest {
            Some(due) => {
                let now = self.now();
                self.advance(due.saturating_sub(now))
            }
            None => 0,
        }
    }

    fn take_due(&self, deadline: Duration) -> Option<Task> {
        let mut queue = self.queue.borrow_mut();
        let index = queue
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, queued)| queued.due <= deadline)
            .min_by_key(|(_, queued)| (queued.due, queued.id))
            .map(|(index, _)| index)?;
        let queued = queue.tasks.remove(index);
        queue.now = queued.due;
        Some(queued.task)
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn schedule_once(&self, delay: Duration, task: Task) -> ManualHandle {
        let mut queue = self.queue.borrow_mut();
        let id = queue.next_id;
        queue.next_id += 1;
        let due = queue.now + delay;
        queue.tasks.push(QueuedTask { id, due, task });
        ManualHandle(id)
    }

    fn cancel(&self, handle: ManualHandle) {
        self.queue
            .borrow_mut()
            .tasks
            .retain(|queued| queued.id != handle.0);
    }
}
