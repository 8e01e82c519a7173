// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scene port contract for Vitrine viewers.
//!
//! This crate defines the domain contract between the viewer core and the
//! platform it is embedded in. It contains NO loading or GPU logic: asset
//! parsing lives in `vitrine-viewer`, rasterization in the host adapters.
//!
//! # Design Principles
//!
//! - **Surfaces are dumb**: they resize and draw what they are given.
//! - **No time ownership**: frame cadence comes from a [`FrameScheduler`].
//! - **One owner per resource**: drawables, frame handles and resize
//!   subscriptions are plain ids that the viewer hands back exactly once.
//!
//! # Crate Features
//!
//! - `test-utils`: headless mocks (`MockSurface`, `MockContainer`) for
//!   exercising viewers without a window or GPU.

use thiserror::Error;

/// Failure to resolve an asset URI into a [`Fragment`].
///
/// Every variant carries the offending URI so hosts can report it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The bytes behind the URI could not be fetched (missing file, network error).
    #[error("failed to fetch asset `{uri}`: {reason}")]
    Fetch {
        /// Source URI.
        uri: String,
        /// Underlying cause.
        reason: String,
    },
    /// The bytes were fetched but could not be parsed as a scene asset.
    #[error("failed to parse asset `{uri}`: {reason}")]
    Parse {
        /// Source URI.
        uri: String,
        /// Underlying cause.
        reason: String,
    },
    /// The asset parsed but its contents are unusable (no scene, bad accessors).
    #[error("asset `{uri}` is malformed: {reason}")]
    Malformed {
        /// Source URI.
        uri: String,
        /// Underlying cause.
        reason: String,
    },
    /// The URI scheme is not understood by the loader.
    #[error("unsupported asset source `{uri}`")]
    Unsupported {
        /// Source URI.
        uri: String,
    },
}

impl LoadError {
    /// URI of the asset that failed to load.
    pub fn uri(&self) -> &str {
        match self {
            Self::Fetch { uri, .. }
            | Self::Parse { uri, .. }
            | Self::Malformed { uri, .. }
            | Self::Unsupported { uri } => uri,
        }
    }
}

/// Failure reported by a [`RenderSurface`] while producing a frame.
///
/// Surface errors are per-frame; they never stop a render loop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// The swapchain/drawable was lost and must be reconfigured.
    #[error("surface lost")]
    Lost,
    /// The surface ran out of memory.
    #[error("surface out of memory")]
    OutOfMemory,
    /// Acquiring the next frame timed out.
    #[error("surface timed out")]
    Timeout,
    /// A backend-specific error occurred.
    #[error("backend error: {0}")]
    Backend(String),
}

mod camera;
mod color;
mod lights;
#[cfg(feature = "test-utils")]
mod mock;
mod node;
mod port;
mod scene;

pub use camera::{
    PerspectiveCamera, DEFAULT_CAMERA_DISTANCE, DEFAULT_FAR, DEFAULT_FOV_Y_DEGREES, DEFAULT_NEAR,
    MAX_PITCH,
};
pub use color::{Background, Color, ColorParseError};
pub use lights::{DirectionalLight, HemisphereLight, Light, LightRig, ShadowParams};
#[cfg(feature = "test-utils")]
pub use mock::{ContainerProbe, MockContainer, MockSurface, RenderedFrame, SurfaceProbe};
pub use node::{Fragment, MeshData, NodeContent, SceneNode};
pub use port::{
    DrawableHandle, FrameHandle, FrameScheduler, HostContainer, RenderSurface, ResizeSignal,
    SubscriptionId,
};
pub use scene::Scene;
