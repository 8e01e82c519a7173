// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Winit-backed host ports: the window as container and redraw waker.

use vitrine_app_core::render_port::RenderPort;
use vitrine_scene_port::{DrawableHandle, HostContainer};
use winit::window::Window;

/// The top-level window is the viewer's container; its client area is the
/// layout region and the drawable is shown by making the window visible.
pub struct WindowContainer {
    window: &'static Window,
    attached: Option<DrawableHandle>,
}

impl WindowContainer {
    pub fn new(window: &'static Window) -> Self {
        Self {
            window,
            attached: None,
        }
    }
}

impl HostContainer for WindowContainer {
    fn client_size(&self) -> (u32, u32) {
        let logical = self
            .window
            .inner_size()
            .to_logical::<u32>(self.window.scale_factor());
        (logical.width, logical.height)
    }

    fn attach(&mut self, drawable: DrawableHandle) {
        self.attached = Some(drawable);
        self.window.set_visible(true);
    }

    fn detach(&mut self, drawable: DrawableHandle) {
        if self.attached == Some(drawable) {
            self.attached = None;
            self.window.set_visible(false);
        }
    }
}

#[derive(Clone)]
pub struct WinitRenderPort {
    win: &'static Window,
}

impl WinitRenderPort {
    pub fn new(win: &'static Window) -> Self {
        Self { win }
    }
}

impl RenderPort for WinitRenderPort {
    fn request_redraw(&self) {
        self.win.request_redraw();
    }
}
