// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Single-threaded frame scheduler and resize signal for event-loop hosts.
//!
//! Both are cheap `Rc` handles: one clone goes into the viewer, the host keeps
//! another to drive it (`take_due` on redraw, `subscribers` on resize).

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use vitrine_app_core::render_port::RenderPort;
use vitrine_scene_port::{FrameHandle, FrameScheduler, ResizeSignal, SubscriptionId};

#[derive(Default)]
struct FrameQueueInner {
    next: u64,
    pending: BTreeSet<FrameHandle>,
    waker: Option<Box<dyn RenderPort>>,
}

/// Frame scheduler backed by a set of pending handles.
///
/// Scheduling optionally pokes a [`RenderPort`] so the host window asks for a
/// redraw; the host then collects due handles with [`FrameQueue::take_due`].
#[derive(Clone, Default)]
pub struct FrameQueue(Rc<RefCell<FrameQueueInner>>);

impl FrameQueue {
    /// Queue with no redraw waker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue that calls `waker.request_redraw()` on every schedule.
    pub fn with_waker(waker: Box<dyn RenderPort>) -> Self {
        let queue = Self::default();
        queue.0.borrow_mut().waker = Some(waker);
        queue
    }

    /// Remove and return every pending handle, oldest first.
    pub fn take_due(&self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.0.borrow_mut().pending)
            .into_iter()
            .collect()
    }

    /// Number of pending callbacks.
    pub fn pending(&self) -> usize {
        self.0.borrow().pending.len()
    }
}

impl FrameScheduler for FrameQueue {
    fn schedule(&mut self) -> FrameHandle {
        let mut inner = self.0.borrow_mut();
        inner.next += 1;
        let handle = FrameHandle(inner.next);
        inner.pending.insert(handle);
        if let Some(waker) = &inner.waker {
            waker.request_redraw();
        }
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        self.0.borrow_mut().pending.remove(&handle);
    }
}

#[derive(Default)]
struct ResizeHubInner {
    next: u64,
    live: Vec<SubscriptionId>,
}

/// Resize signal that tracks live subscriptions for the host to notify.
#[derive(Clone, Default)]
pub struct ResizeHub(Rc<RefCell<ResizeHubInner>>);

impl ResizeHub {
    /// Live subscriptions in subscription order.
    pub fn subscribers(&self) -> Vec<SubscriptionId> {
        self.0.borrow().live.clone()
    }

    /// Whether `id` is still subscribed.
    pub fn is_live(&self, id: SubscriptionId) -> bool {
        self.0.borrow().live.contains(&id)
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.0.borrow().live.len()
    }

    /// True with no live subscriptions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResizeSignal for ResizeHub {
    fn subscribe(&mut self) -> SubscriptionId {
        let mut inner = self.0.borrow_mut();
        inner.next += 1;
        let id = SubscriptionId(inner.next);
        inner.live.push(id);
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.0.borrow_mut().live.retain(|live| *live != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingPort(Rc<Cell<u32>>);

    impl RenderPort for CountingPort {
        fn request_redraw(&self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn schedule_wakes_host_and_cancel_removes() {
        let wakes = Rc::new(Cell::new(0));
        let mut queue = FrameQueue::with_waker(Box::new(CountingPort(wakes.clone())));
        let a = queue.schedule();
        let b = queue.schedule();
        assert_ne!(a, b);
        assert_eq!(wakes.get(), 2);
        queue.cancel(a);
        queue.cancel(a);
        assert_eq!(queue.take_due(), vec![b]);
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn hub_ids_are_unique_and_removable() {
        let mut hub = ResizeHub::default();
        let a = hub.subscribe();
        let b = hub.subscribe();
        assert_ne!(a, b);
        hub.unsubscribe(a);
        hub.unsubscribe(SubscriptionId(999));
        assert!(!hub.is_live(a));
        assert_eq!(hub.subscribers(), vec![b]);
    }
}
