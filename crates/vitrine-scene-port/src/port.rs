// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Platform port traits a host implements to embed a viewer.
//!
//! A viewer never talks to a window system directly. The host hands it four
//! capabilities: a surface to draw into, a container to measure and attach
//! to, a frame scheduler, and a resize signal. All of them run on the host's
//! single UI thread, so none of the traits require `Send`.

use crate::{PerspectiveCamera, Scene, SurfaceError};

/// Opaque id of a surface's native drawable (canvas, window, layer).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DrawableHandle(pub u64);

/// Opaque id of one scheduled frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

/// Opaque id of one resize-signal subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Rasterization target.
pub trait RenderSurface {
    /// Resize the pixel buffer (device-independent pixels).
    fn resize(&mut self, width: u32, height: u32);

    /// Rasterize `scene` as seen through `camera`.
    ///
    /// Errors are per-frame; callers log them and keep going.
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), SurfaceError>;

    /// Native drawable to insert into the host layout.
    fn drawable(&self) -> DrawableHandle;

    /// Release backend resources. Called once, after the drawable is detached.
    fn dispose(&mut self) {}
}

/// The host layout region a viewer lives in.
pub trait HostContainer {
    /// Current client `(width, height)` in device-independent pixels.
    ///
    /// May be `(0, 0)` before the container has been laid out.
    fn client_size(&self) -> (u32, u32);

    /// Insert a drawable into the container.
    fn attach(&mut self, drawable: DrawableHandle);

    /// Remove a previously attached drawable.
    fn detach(&mut self, drawable: DrawableHandle);
}

/// Display-synchronized, cancellable frame callbacks.
///
/// `schedule` requests one callback at the next display tick; the host later
/// reports the returned handle back to the viewer when it fires. A cancelled
/// handle must never be reported.
pub trait FrameScheduler {
    /// Request one frame callback.
    fn schedule(&mut self) -> FrameHandle;

    /// Cancel a pending callback. Cancelling an unknown or fired handle is a no-op.
    fn cancel(&mut self, handle: FrameHandle);
}

/// Subscribe/unsubscribe capability for host resize notifications.
pub trait ResizeSignal {
    /// Register interest in resize notifications.
    fn subscribe(&mut self) -> SubscriptionId;

    /// Drop a subscription. Unknown ids are ignored.
    fn unsubscribe(&mut self, id: SubscriptionId);
}
