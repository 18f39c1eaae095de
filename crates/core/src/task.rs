//! Single-occupancy holder for cancellable background work.

/// Something that can be stopped, such as a spawned UI task.
pub trait Cancel {
    fn cancel(self);
}

/// Holds at most one live task for a single concern (a ticker, a poller).
///
/// Installing a new task cancels the previous one first, and `cancel` stops
/// whatever is running. Each install bumps the generation so stale callbacks
/// can tell they were superseded.
#[derive(Debug)]
pub struct TaskSlot<T: Cancel> {
    current: Option<T>,
    generation: u64,
}

impl<T: Cancel> Default for TaskSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Cancel> TaskSlot<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: None,
            generation: 0,
        }
    }

    /// Install `task`, cancelling the one it replaces. Returns the new generation.
    pub fn replace(&mut self, task: T) -> u64 {
        if let Some(previous) = self.current.take() {
            previous.cancel();
        }
        self.current = Some(task);
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    /// Cancel the live task, if any. Returns whether something was cancelled.
    pub fn cancel(&mut self) -> bool {
        match self.current.take() {
            Some(task) => {
                task.cancel();
                self.generation = self.generation.wrapping_add(1);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True if `generation` still identifies the live task.
    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.is_active() && self.generation == generation
    }
}
