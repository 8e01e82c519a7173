// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Keeps the surface size and camera aspect in step with the host container.

use tracing::{debug, trace, warn};
use vitrine_scene_port::{HostContainer, RenderSurface, ResizeSignal, SubscriptionId};

use crate::scene_manager::SceneManager;

/// Measured width/height of the host container, in device-independent pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ViewportDimensions {
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl ViewportDimensions {
    /// New dimensions.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero (container not laid out or collapsed).
    pub const fn is_degenerate(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<(u32, u32)> for ViewportDimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

/// Measures the host container and owns the resize subscription.
pub struct ViewportController {
    container: Box<dyn HostContainer>,
    signal: Box<dyn ResizeSignal>,
    subscription: Option<SubscriptionId>,
    last: Option<ViewportDimensions>,
}

impl ViewportController {
    /// Wrap a container and its resize signal. Nothing is subscribed yet.
    pub fn new(container: Box<dyn HostContainer>, signal: Box<dyn ResizeSignal>) -> Self {
        Self {
            container,
            signal,
            subscription: None,
            last: None,
        }
    }

    /// Read the container's current client size.
    pub fn measure(&self) -> ViewportDimensions {
        self.container.client_size().into()
    }

    /// Resize the surface to `dims`, then derive the camera aspect from the
    /// same `dims`.
    ///
    /// Degenerate dimensions change nothing and return `false`.
    pub fn apply_dimensions(
        &mut self,
        dims: ViewportDimensions,
        surface: &mut dyn RenderSurface,
        scene: &mut SceneManager,
    ) -> bool {
        if dims.is_degenerate() {
            debug!(?dims, "skipping degenerate viewport");
            return false;
        }
        surface.resize(dims.width, dims.height);
        scene.update_camera_aspect(dims.width, dims.height);
        self.last = Some(dims);
        true
    }

    /// Re-measure, apply, and render one frame right away so the resized
    /// surface never shows stale content.
    ///
    /// Returns the applied dimensions, or `None` when the measurement was
    /// degenerate.
    pub fn handle_resize(
        &mut self,
        surface: &mut dyn RenderSurface,
        scene: &mut SceneManager,
    ) -> Option<ViewportDimensions> {
        let dims = self.measure();
        if !self.apply_dimensions(dims, surface, scene) {
            return None;
        }
        trace!(width = dims.width, height = dims.height, "viewport resized");
        let (scene_ref, camera) = scene.view();
        if let Err(err) = surface.render(scene_ref, camera) {
            warn!(%err, "render after resize failed");
        }
        Some(dims)
    }

    /// Insert the surface's drawable into the container.
    pub fn attach(&mut self, surface: &dyn RenderSurface) {
        self.container.attach(surface.drawable());
    }

    /// Remove the surface's drawable from the container.
    pub fn detach(&mut self, surface: &dyn RenderSurface) {
        self.container.detach(surface.drawable());
    }

    /// Subscribe to resize notifications. Subscribing twice keeps the first id.
    pub fn subscribe(&mut self) -> SubscriptionId {
        if let Some(id) = self.subscription {
            return id;
        }
        let id = self.signal.subscribe();
        self.subscription = Some(id);
        id
    }

    /// Release the resize subscription. Returns `false` if there was none.
    pub fn unsubscribe(&mut self) -> bool {
        match self.subscription.take() {
            Some(id) => {
                self.signal.unsubscribe(id);
                true
            }
            None => false,
        }
    }

    /// Live subscription, if any.
    pub fn subscription(&self) -> Option<SubscriptionId> {
        self.subscription
    }

    /// Last applied dimensions.
    pub fn last_dimensions(&self) -> Option<ViewportDimensions> {
        self.last
    }
}
