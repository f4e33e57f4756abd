//! Hook that records every event it observes.

use crate::error::HookError;
use crate::hook::{Hook, HookContext, HookPoint};
use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

/// A recorded hook event for inspection in tests.
#[derive(Debug, Clone)]
pub struct RecordedEvent {
    /// The hook point that fired.
    pub point: HookPoint,
    /// Field involved, if any.
    pub field: Option<String>,
    /// Slot involved, if any.
    pub slot: Option<usize>,
}

/// A hook that records every event it sees.
/// Use `.events()` to inspect what was recorded.
pub struct RecordingHook {
    points: Vec<HookPoint>,
    events: Mutex<Vec<RecordedEvent>>,
}

impl RecordingHook {
    /// Create a new RecordingHook that fires at all hook points.
    pub fn new() -> Self {
        Self::at(&HookPoint::ALL)
    }

    /// Create a RecordingHook that fires only at `points`.
    pub fn at(points: &[HookPoint]) -> Self {
        Self {
            points: points.to_vec(),
            events: Mutex::new(Vec::new()),
        }
    }

    /// Return a snapshot of all recorded events.
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Just the points, in firing order.
    pub fn points_seen(&self) -> Vec<HookPoint> {
        self.events().into_iter().map(|e| e.point).collect()
    }
}

impl Default for RecordingHook {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Hook for RecordingHook {
    fn points(&self) -> &[HookPoint] {
        &self.points
    }

    async fn on_event(&self, ctx: &HookContext) -> Result<(), HookError> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(RecordedEvent {
            point: ctx.point,
            field: ctx.field.clone(),
            slot: ctx.slot,
        });
        Ok(())
    }
}
