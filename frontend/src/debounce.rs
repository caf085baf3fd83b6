use gloo_timers::callback::Timeout;

/// Schedules a task after a delay. Dropping the handle cancels the task.
pub trait Scheduler {
    type Handle;

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Self::Handle;
}

/// Browser timers via `setTimeout`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    type Handle = Timeout;

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Timeout {
        Timeout::new(delay_ms, task)
    }
}

/// Trailing-edge debouncer with a single pending slot. Each call drops the
/// pending handle (cancelling it) and schedules the new task.
pub struct Debouncer<S: Scheduler = BrowserScheduler> {
    scheduler: S,
    wait_ms: u32,
    pending: Option<S::Handle>,
}

impl Debouncer<BrowserScheduler> {
    pub fn new(wait_ms: u32) -> Self {
        Self::with_scheduler(BrowserScheduler, wait_ms)
    }
}

impl<S: Scheduler> Debouncer<S> {
    pub fn with_scheduler(scheduler: S, wait_ms: u32) -> Self {
        Self {
            scheduler,
            wait_ms,
            pending: None,
        }
    }

    pub fn call<F>(&mut self, task: F)
    where
        F: FnOnce() + 'static,
    {
        self.pending = None;
        self.pending = Some(self.scheduler.schedule(self.wait_ms, Box::new(task)));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
