// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Headless mocks for exercising viewers without a window or GPU.
//!
//! The mocks are moved into the viewer under test, so each one hands out a
//! cloneable probe that keeps observing the shared record afterwards.

use std::cell::RefCell;
use std::rc::Rc;

use crate::{
    DrawableHandle, HostContainer, PerspectiveCamera, RenderSurface, Scene, SurfaceError,
};

/// Snapshot of what one `render` call saw.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedFrame {
    /// Surface size at draw time.
    pub size: (u32, u32),
    /// Camera aspect at draw time.
    pub aspect: f32,
    /// Scene node count at draw time.
    pub node_count: usize,
    /// Whether an asset root was attached.
    pub has_asset: bool,
}

#[derive(Debug, Default)]
struct SurfaceRecord {
    size: (u32, u32),
    resizes: Vec<(u32, u32)>,
    frames: Vec<RenderedFrame>,
    fail_renders: bool,
    disposed: bool,
}

/// Observer side of a [`MockSurface`].
#[derive(Clone, Debug, Default)]
pub struct SurfaceProbe(Rc<RefCell<SurfaceRecord>>);

impl SurfaceProbe {
    /// Current pixel size.
    pub fn size(&self) -> (u32, u32) {
        self.0.borrow().size
    }

    /// Every size the surface was resized to, in order.
    pub fn resizes(&self) -> Vec<(u32, u32)> {
        self.0.borrow().resizes.clone()
    }

    /// Number of `render` calls (failed ones included).
    pub fn render_count(&self) -> usize {
        self.0.borrow().frames.len()
    }

    /// Most recent frame, if any.
    pub fn last_frame(&self) -> Option<RenderedFrame> {
        self.0.borrow().frames.last().cloned()
    }

    /// Whether `dispose` has been called.
    pub fn disposed(&self) -> bool {
        self.0.borrow().disposed
    }

    /// Make subsequent `render` calls fail with [`SurfaceError::Lost`].
    pub fn fail_renders(&self, fail: bool) {
        self.0.borrow_mut().fail_renders = fail;
    }
}

/// Mock render surface that records resizes and frames.
#[derive(Debug)]
pub struct MockSurface {
    drawable: DrawableHandle,
    probe: SurfaceProbe,
}

impl MockSurface {
    /// Create a surface and its probe.
    pub fn new(drawable: DrawableHandle) -> (Self, SurfaceProbe) {
        let probe = SurfaceProbe::default();
        (
            Self {
                drawable,
                probe: probe.clone(),
            },
            probe,
        )
    }
}

impl RenderSurface for MockSurface {
    fn resize(&mut self, width: u32, height: u32) {
        let mut rec = self.probe.0.borrow_mut();
        rec.size = (width, height);
        rec.resizes.push((width, height));
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), SurfaceError> {
        let mut rec = self.probe.0.borrow_mut();
        let frame = RenderedFrame {
            size: rec.size,
            aspect: camera.aspect(),
            node_count: scene.node_count(),
            has_asset: scene.asset_root().is_some(),
        };
        rec.frames.push(frame);
        if rec.fail_renders {
            return Err(SurfaceError::Lost);
        }
        Ok(())
    }

    fn drawable(&self) -> DrawableHandle {
        self.drawable
    }

    fn dispose(&mut self) {
        self.probe.0.borrow_mut().disposed = true;
    }
}

#[derive(Debug, Default)]
struct ContainerRecord {
    size: (u32, u32),
    attached: Vec<DrawableHandle>,
    detach_count: usize,
}

/// Observer/driver side of a [`MockContainer`].
#[derive(Clone, Debug, Default)]
pub struct ContainerProbe(Rc<RefCell<ContainerRecord>>);

impl ContainerProbe {
    /// Change what the next measurement returns (simulates layout changes).
    pub fn set_size(&self, width: u32, height: u32) {
        self.0.borrow_mut().size = (width, height);
    }

    /// Drawables currently attached.
    pub fn attached(&self) -> Vec<DrawableHandle> {
        self.0.borrow().attached.clone()
    }

    /// Number of successful detaches.
    pub fn detach_count(&self) -> usize {
        self.0.borrow().detach_count
    }
}

/// Mock host container with a settable client size.
#[derive(Debug)]
pub struct MockContainer {
    probe: ContainerProbe,
}

impl MockContainer {
    /// Create a container measuring `width x height`, plus its probe.
    pub fn new(width: u32, height: u32) -> (Self, ContainerProbe) {
        let probe = ContainerProbe::default();
        probe.set_size(width, height);
        (
            Self {
                probe: probe.clone(),
            },
            probe,
        )
    }
}

impl HostContainer for MockContainer {
    fn client_size(&self) -> (u32, u32) {
        self.probe.0.borrow().size
    }

    fn attach(&mut self, drawable: DrawableHandle) {
        self.probe.0.borrow_mut().attached.push(drawable);
    }

    fn detach(&mut self, drawable: DrawableHandle) {
        let mut rec = self.probe.0.borrow_mut();
        let before = rec.attached.len();
        rec.attached.retain(|d| *d != drawable);
        if rec.attached.len() < before {
            rec.detach_count += 1;
        }
    }
}
