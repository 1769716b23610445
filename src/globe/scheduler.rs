use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u64);

/// Registry of periodic frame callbacks owned by a host event loop.
///
/// The globe registers its idle rotation here so hosts (and tests) can see
/// which periodic drivers are alive.
pub trait FrameScheduler {
    fn start_periodic(&mut self, name: &str) -> TimerId;
    /// Cancelling an unknown or already cancelled timer is a no-op.
    fn cancel(&mut self, id: TimerId);
    fn is_active(&self, id: TimerId) -> bool;
    fn active_count(&self) -> usize;
}

#[derive(Debug, Default)]
struct ManualSchedulerState {
    next_id: u64,
    active: IndexMap<TimerId, String>,
    started_total: u64,
}

/// Host-driven scheduler handle.
///
/// Clones share the same registry, so a clone kept by the host still observes
/// timers after the globe that started them is gone.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<ManualSchedulerState>>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of active timers in start order.
    #[must_use]
    pub fn active_names(&self) -> Vec<String> {
        self.state.borrow().active.values().cloned().collect()
    }

    #[must_use]
    pub fn started_total(&self) -> u64 {
        self.state.borrow().started_total
    }
}

impl FrameScheduler for ManualScheduler {
    fn start_periodic(&mut self, name: &str) -> TimerId {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        state.started_total += 1;
        let id = TimerId(state.next_id);
        state.active.insert(id, name.to_owned());
        trace!(timer = id.0, name, "periodic timer started");
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if self.state.borrow_mut().active.shift_remove(&id).is_some() {
            trace!(timer = id.0, "periodic timer cancelled");
        }
    }

    fn is_active(&self, id: TimerId) -> bool {
        self.state.borrow().active.contains_key(&id)
    }

    fn active_count(&self) -> usize {
        self.state.borrow().active.len()
    }
}
