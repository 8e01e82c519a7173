// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Embeddable 3D viewer core.
//!
//! A [`Viewer`] loads one glTF asset from a URI, places it under a fixed
//! camera and two-light rig, and renders frames into a host-provided surface
//! that tracks its container's size.
//!
//! # Lifecycle
//!
//! 1. [`Viewer::mount`] sets up camera and lights synchronously, starts the
//!    asset load in the background, sizes the surface, attaches it, subscribes
//!    to resize notifications, and starts the render loop. Frames render
//!    immediately; the asset appears whenever its load completes.
//! 2. The host forwards frame callbacks ([`Viewer::on_frame`]), resize
//!    notifications ([`Viewer::notify_resize`]) and input
//!    ([`Viewer::handle_input`]), and calls [`Viewer::pump`] from its event
//!    loop to deliver finished loads.
//! 3. [`Viewer::unmount`] (or drop) stops the loop before detaching and
//!    disposing the surface, and releases the resize subscription.
//!
//! Everything except the asset fetch/parse runs on the host's UI thread.

use thiserror::Error;
use vitrine_scene_port::ColorParseError;

pub mod asset_loader;
pub mod interaction;
pub mod lifecycle;
pub mod options;
pub mod platform;
pub mod render_loop;
pub mod scene_manager;
pub mod viewer_state;
pub mod viewport;

pub use asset_loader::{AssetLoader, AssetSource, GltfLoader, LoadFuture};
pub use interaction::{InteractionController, InteractionOutcome, PlaybackState, ViewerInput};
pub use lifecycle::{Platform, Viewer, ViewerEvent};
pub use options::ViewerOptions;
pub use platform::{FrameQueue, ResizeHub};
pub use render_loop::{LoopState, RenderLoop};
pub use scene_manager::SceneManager;
pub use viewer_state::{Asset, AssetStatus, ViewerState};
pub use viewport::{ViewportController, ViewportDimensions};

/// Invalid viewer construction options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    /// No asset source was configured.
    #[error("no asset source configured")]
    MissingSource,
    /// The background color could not be parsed.
    #[error(transparent)]
    Color(#[from] ColorParseError),
}
