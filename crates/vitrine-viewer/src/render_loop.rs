// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Self-rescheduling, cancellable render loop.
//!
//! At most one frame callback is ever pending. Each fired frame renders and
//! then requests the next one; stopping cancels the pending callback so no
//! frame runs after `stop` returns.

use tracing::{debug, trace};
use vitrine_scene_port::{FrameHandle, FrameScheduler};

/// Whether frames are being scheduled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LoopState {
    /// No frame pending.
    #[default]
    Idle,
    /// Exactly one frame pending.
    Running,
}

/// Render loop driven by a host [`FrameScheduler`].
pub struct RenderLoop {
    scheduler: Box<dyn FrameScheduler>,
    pending: Option<FrameHandle>,
    frames: u64,
}

impl RenderLoop {
    /// Idle loop over `scheduler`.
    pub fn new(scheduler: Box<dyn FrameScheduler>) -> Self {
        Self {
            scheduler,
            pending: None,
            frames: 0,
        }
    }

    /// Schedule the first frame. Returns `false` if already running.
    pub fn start(&mut self) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(self.scheduler.schedule());
        debug!("render loop started");
        true
    }

    /// Cancel the pending frame. Returns `false` if already idle.
    pub fn stop(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                self.scheduler.cancel(handle);
                debug!(frames = self.frames, "render loop stopped");
                true
            }
            None => false,
        }
    }

    /// Run one frame for `handle`, then schedule the next.
    ///
    /// Handles that are not the pending one (stale or cancelled) are ignored
    /// and `render` is not called.
    pub fn fire(&mut self, handle: FrameHandle, render: impl FnOnce()) -> bool {
        if self.pending != Some(handle) {
            trace!(?handle, "ignoring stale frame");
            return false;
        }
        self.pending = None;
        render();
        self.frames += 1;
        self.pending = Some(self.scheduler.schedule());
        true
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// True while a frame is pending.
    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Current state.
    pub fn state(&self) -> LoopState {
        if self.is_running() {
            LoopState::Running
        } else {
            LoopState::Idle
        }
    }

    /// Pending frame handle, if any.
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::FrameQueue;

    #[test]
    fn start_and_stop_are_idempotent() {
        let queue = FrameQueue::new();
        let mut lp = RenderLoop::new(Box::new(queue.clone()));
        assert!(lp.start());
        assert!(!lp.start());
        assert_eq!(queue.pending(), 1);
        assert!(lp.stop());
        assert!(!lp.stop());
        assert_eq!(queue.pending(), 0);
        assert_eq!(lp.state(), LoopState::Idle);
    }

    #[test]
    fn firing_reschedules_exactly_one_frame() {
        let queue = FrameQueue::new();
        let mut lp = RenderLoop::new(Box::new(queue.clone()));
        lp.start();
        let mut rendered = 0;
        for _ in 0..3 {
            for handle in queue.take_due() {
                lp.fire(handle, || rendered += 1);
            }
            assert_eq!(queue.pending(), 1);
        }
        assert_eq!(rendered, 3);
        assert_eq!(lp.frames(), 3);
    }

    #[test]
    fn stale_handle_does_not_render() {
        let queue = FrameQueue::new();
        let mut lp = RenderLoop::new(Box::new(queue.clone()));
        lp.start();
        let due = queue.take_due();
        lp.stop();
        let mut rendered = false;
        for handle in due {
            assert!(!lp.fire(handle, || rendered = true));
        }
        assert!(!rendered);
        assert_eq!(lp.frames(), 0);
    }
}
