// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Owns the scene graph and the single perspective camera.

use tracing::{debug, warn};
use vitrine_scene_port::{Background, Fragment, PerspectiveCamera, Scene};

use crate::viewer_state::{self, ViewerState};
use crate::viewport::ViewportDimensions;

/// Scene + camera owner. Mutations go through the pure transitions in
/// [`viewer_state`].
#[derive(Debug, Default)]
pub struct SceneManager {
    state: ViewerState,
}

impl SceneManager {
    /// Empty scene with `background`, default camera, no lights.
    pub fn new(background: Background) -> Self {
        Self {
            state: ViewerState::new(background),
        }
    }

    fn apply(&mut self, f: impl FnOnce(ViewerState) -> ViewerState) {
        self.state = f(std::mem::take(&mut self.state));
    }

    /// Install the 55° camera at z = 4.
    pub fn setup_camera(&mut self) {
        self.apply(viewer_state::setup_camera);
    }

    /// Add the hemisphere + directional lights.
    pub fn setup_lights(&mut self) {
        self.apply(viewer_state::setup_lights);
        debug!(lights = self.state.scene.lights().len(), "lights ready");
    }

    /// Attach a loaded fragment. Returns the number of nodes added.
    ///
    /// A second fragment replaces the first.
    pub fn attach_asset(&mut self, fragment: Fragment) -> usize {
        let nodes = fragment.node_count();
        if self.state.scene.asset_root().is_some() {
            warn!(source = fragment.source(), "replacing previously attached asset");
        }
        self.apply(|s| viewer_state::attach(s, fragment));
        nodes
    }

    /// Derive the camera aspect from `width x height` and refresh its projection.
    ///
    /// Returns `false` and changes nothing when either dimension is zero.
    pub fn update_camera_aspect(&mut self, width: u32, height: u32) -> bool {
        let dims = ViewportDimensions::new(width, height);
        if dims.is_degenerate() {
            return false;
        }
        self.apply(|s| viewer_state::resize(s, dims));
        true
    }

    /// Scene graph.
    pub fn scene(&self) -> &Scene {
        &self.state.scene
    }

    /// Camera.
    pub fn camera(&self) -> &PerspectiveCamera {
        &self.state.camera
    }

    /// Camera, mutably (look controls).
    pub fn camera_mut(&mut self) -> &mut PerspectiveCamera {
        &mut self.state.camera
    }

    /// Last applied dimensions.
    pub fn dimensions(&self) -> Option<ViewportDimensions> {
        self.state.dims
    }

    /// Scene and camera together, for rendering.
    pub fn view(&self) -> (&Scene, &PerspectiveCamera) {
        (&self.state.scene, &self.state.camera)
    }
}
