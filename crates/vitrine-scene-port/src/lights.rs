// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The fixed two-light rig every viewer scene is lit with.

use crate::Color;
use glam::Vec3;

/// Sky/ground gradient light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HemisphereLight {
    /// Color contributed to upward-facing normals.
    pub sky: Color,
    /// Color contributed to downward-facing normals.
    pub ground: Color,
    /// Scalar intensity.
    pub intensity: f32,
    /// Position; only its direction from the origin matters.
    pub position: Vec3,
}

/// Orthographic shadow frustum and depth-map settings for a directional light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowParams {
    /// Half-extent `d` of the square frustum (left = -d, right = d, ...).
    pub half_extent: f32,
    /// Far plane of the shadow camera.
    pub far: f32,
    /// Depth-map resolution (width = height).
    pub map_size: u32,
    /// Depth bias.
    pub bias: f32,
    /// How dark shadowed regions get (0 = none, 1 = black).
    pub darkness: f32,
}

/// Directional (sun-like) light aimed at `target`.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectionalLight {
    /// Debug name.
    pub name: String,
    /// Light color.
    pub color: Color,
    /// Scalar intensity.
    pub intensity: f32,
    /// Light position; direction is `target - position`.
    pub position: Vec3,
    /// Point the light aims at.
    pub target: Vec3,
    /// Whether the light renders a shadow map.
    pub cast_shadow: bool,
    /// Shadow frustum parameters.
    pub shadow: ShadowParams,
}

impl DirectionalLight {
    /// Unit direction the light travels in.
    pub fn direction(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }
}

/// A light entity in the scene.
#[derive(Clone, Debug, PartialEq)]
pub enum Light {
    /// Hemisphere fill.
    Hemisphere(HemisphereLight),
    /// Directional key light.
    Directional(DirectionalLight),
}

/// The standard hemisphere + directional rig.
///
/// These are configuration constants chosen once at setup; the rig does not
/// depend on which asset is shown.
#[derive(Clone, Debug, PartialEq)]
pub struct LightRig {
    /// Fill light.
    pub hemisphere: HemisphereLight,
    /// Key light.
    pub directional: DirectionalLight,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            hemisphere: HemisphereLight {
                sky: Color::from_hex(0xffffff),
                ground: Color::from_hex(0xffffff),
                intensity: 0.6,
                position: Vec3::new(0.0, 500.0, 0.0),
            },
            directional: DirectionalLight {
                name: "dirlight".into(),
                color: Color::from_hex(0xffffff),
                intensity: 1.0,
                position: Vec3::new(-1.0, 0.75, 1.0) * 50.0,
                target: Vec3::ZERO,
                cast_shadow: true,
                shadow: ShadowParams {
                    half_extent: 300.0,
                    far: 3500.0,
                    map_size: 2048,
                    bias: -0.0001,
                    darkness: 0.35,
                },
            },
        }
    }
}

impl LightRig {
    /// Split the rig into scene light entities (hemisphere first).
    pub fn into_lights(self) -> [Light; 2] {
        [
            Light::Hemisphere(self.hemisphere),
            Light::Directional(self.directional),
        ]
    }
}
