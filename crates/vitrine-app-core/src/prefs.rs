// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Persisted viewer preferences (last asset, background, input mode).

use serde::{Deserialize, Serialize};

/// Config key the viewer prefs are stored under.
pub const VIEWER_PREFS_KEY: &str = "viewer";

/// How pointer input drives a viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMode {
    /// A click pauses/resumes the render loop.
    #[default]
    Toggle,
    /// A click locks the pointer; motion turns the camera.
    Look,
}

/// Look-control tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookPrefs {
    /// Radians per pointer pixel.
    pub sensitivity: f32,
    /// Invert horizontal look.
    pub invert_x: bool,
    /// Invert vertical look.
    pub invert_y: bool,
}

impl Default for LookPrefs {
    fn default() -> Self {
        Self {
            sensitivity: 0.0025,
            invert_x: false,
            invert_y: false,
        }
    }
}

/// Saved preferences for a viewer host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ViewerPrefs {
    /// Last asset URI shown.
    pub src: Option<String>,
    /// Background color (`#RRGGBB` or `transparent`).
    pub color: Option<String>,
    /// Input mode.
    pub interaction: InteractionMode,
    /// Look-control tuning.
    pub look: LookPrefs,
    /// Present in vsync mode.
    pub vsync: bool,
}
