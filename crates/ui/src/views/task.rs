use dioxus::prelude::*;
use dioxus::core::Task;
use gaps_core::{Cancel, TaskSlot};

/// A spawned Dioxus task that can sit in a `TaskSlot`.
#[derive(Clone, Copy)]
pub struct ViewTask(Task);

impl Cancel for ViewTask {
    fn cancel(self) {
        self.0.cancel();
    }
}

/// Spawn `future` into `slot`, cancelling whatever the slot held.
pub fn spawn_into(
    mut slot: Signal<TaskSlot<ViewTask>>,
    future: impl Future<Output = ()> + 'static,
) {
    let task = spawn(future);
    slot.write().replace(ViewTask(task));
}

/// A component-scoped slot that cancels its task when the component unmounts.
pub fn use_task_slot() -> Signal<TaskSlot<ViewTask>> {
    let slot = use_signal(TaskSlot::<ViewTask>::new);
    use_drop(move || {
        let mut slot = slot;
        if let Ok(mut slot) = slot.try_write() {
            slot.cancel();
        }
    });
    slot
}
