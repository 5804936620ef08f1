//! Base-map camera follows the flow canvas.
//!
//! The flow canvas owns all interaction; the base map is created
//! non-interactive and only ever moves through [`ViewSynchronizer`].

use foundation::CameraState;
use tracing::debug;

/// Base-map widget as seen by the viewer.
pub trait BaseMap {
    /// `false` until the widget has reported ready.
    fn is_ready(&self) -> bool;

    /// Last camera applied to the widget, if any.
    fn camera(&self) -> Option<CameraState>;

    /// Jumps to `camera` with no animation.
    fn set_camera(&mut self, camera: CameraState);

    fn set_style(&mut self, style: &str);
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Applied,
    /// Same camera as the last one forwarded.
    Unchanged,
    /// Map not ready yet; the change is lost.
    Dropped,
}

#[derive(Debug, Default)]
pub struct ViewSynchronizer {
    last: Option<CameraState>,
    applied: u64,
    dropped: u64,
}

impl ViewSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forwards one view-state change from the flow canvas to `map`.
    pub fn on_view_state_change<M>(&mut self, map: &mut M, camera: CameraState) -> SyncOutcome
    where
        M: BaseMap + ?Sized,
    {
        if !map.is_ready() {
            self.dropped += 1;
            debug!(dropped = self.dropped, "base map not ready; dropping view state");
            return SyncOutcome::Dropped;
        }
        if self.last.is_some_and(|last| last.same_as(&camera)) {
            return SyncOutcome::Unchanged;
        }
        map.set_camera(camera);
        self.last = Some(camera);
        self.applied += 1;
        SyncOutcome::Applied
    }

    pub fn applied(&self) -> u64 {
        self.applied
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
