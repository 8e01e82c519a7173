// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Pure state transitions for the viewer's scene, camera and asset.

use vitrine_scene_port::{
    Background, Fragment, LightRig, LoadError, PerspectiveCamera, Scene, DEFAULT_CAMERA_DISTANCE,
    DEFAULT_FAR, DEFAULT_FOV_Y_DEGREES, DEFAULT_NEAR,
};

use crate::viewport::ViewportDimensions;

/// Where an asset is in its load lifecycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetStatus {
    /// Load in flight.
    Pending,
    /// Fragment attached to the scene.
    Loaded,
    /// Load failed; the asset will never appear.
    Failed(LoadError),
}

/// The external asset a viewer displays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Asset {
    /// Source URI as configured.
    pub uri: String,
    /// Load status.
    pub status: AssetStatus,
}

impl Asset {
    /// A freshly requested asset.
    pub fn pending(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            status: AssetStatus::Pending,
        }
    }

    /// Record the outcome of the load.
    ///
    /// Only the first resolution counts; later calls return `false` and leave
    /// the status untouched.
    pub fn resolve(&mut self, status: AssetStatus) -> bool {
        if self.status != AssetStatus::Pending || status == AssetStatus::Pending {
            return false;
        }
        self.status = status;
        true
    }
}

/// Scene, camera and last measured viewport.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewerState {
    /// Scene graph.
    pub scene: Scene,
    /// The single camera.
    pub camera: PerspectiveCamera,
    /// Most recent non-degenerate measurement.
    pub dims: Option<ViewportDimensions>,
}

impl ViewerState {
    /// Empty scene with `background`.
    pub fn new(background: Background) -> Self {
        Self {
            scene: Scene::new(background),
            ..Self::default()
        }
    }
}

/// Install the standard camera, deriving its aspect from any known dimensions.
pub fn setup_camera(mut state: ViewerState) -> ViewerState {
    let mut camera = PerspectiveCamera::new(DEFAULT_FOV_Y_DEGREES, DEFAULT_NEAR, DEFAULT_FAR);
    camera.position.z = DEFAULT_CAMERA_DISTANCE;
    if let Some(dims) = state.dims {
        camera.set_viewport(dims.width, dims.height);
    }
    state.camera = camera;
    state
}

/// Add the hemisphere + directional rig. A scene that already has lights is left as is.
pub fn setup_lights(mut state: ViewerState) -> ViewerState {
    if state.scene.lights().is_empty() {
        for light in LightRig::default().into_lights() {
            state.scene.add_light(light);
        }
    }
    state
}

/// Camera then lights.
pub fn setup(state: ViewerState) -> ViewerState {
    setup_lights(setup_camera(state))
}

/// Attach a loaded fragment as the asset root. Mesh nodes cast shadows.
pub fn attach(mut state: ViewerState, fragment: Fragment) -> ViewerState {
    let mut root = fragment.into_root();
    root.visit_mut(&mut |node| {
        if node.is_mesh() {
            node.cast_shadow = true;
        }
    });
    state.scene.attach_root(root);
    state
}

/// Apply measured dimensions to the camera. Degenerate dimensions are ignored.
pub fn resize(mut state: ViewerState, dims: ViewportDimensions) -> ViewerState {
    if dims.is_degenerate() {
        return state;
    }
    if state.camera.set_viewport(dims.width, dims.height) {
        state.dims = Some(dims);
    }
    state
}
