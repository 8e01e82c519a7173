// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scene root: lights, at most one asset root, and a background.

use crate::{Background, Light, SceneNode};

/// The scene graph a viewer renders.
///
/// `revision` bumps whenever the node set changes so surfaces can cache GPU
/// uploads between frames.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    lights: Vec<Light>,
    asset_root: Option<SceneNode>,
    background: Background,
    revision: u64,
}

impl Scene {
    /// Empty scene with the given background.
    pub fn new(background: Background) -> Self {
        Self {
            background,
            ..Self::default()
        }
    }

    /// Append a light; lights keep insertion order.
    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
        self.revision += 1;
    }

    /// Lights in insertion order.
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Attach `root` as the asset subtree, returning any subtree it replaced.
    pub fn attach_root(&mut self, root: SceneNode) -> Option<SceneNode> {
        self.revision += 1;
        self.asset_root.replace(root)
    }

    /// Attached asset subtree, if any.
    pub fn asset_root(&self) -> Option<&SceneNode> {
        self.asset_root.as_ref()
    }

    /// Background descriptor.
    pub fn background(&self) -> Background {
        self.background
    }

    /// Direct children of the scene root (lights + asset root).
    pub fn root_children(&self) -> usize {
        self.lights.len() + usize::from(self.asset_root.is_some())
    }

    /// Every node in the scene: lights plus the whole asset subtree.
    pub fn node_count(&self) -> usize {
        self.lights.len() + self.asset_root.as_ref().map_or(0, SceneNode::node_count)
    }

    /// Number of mesh-bearing nodes.
    pub fn mesh_count(&self) -> usize {
        self.asset_root.as_ref().map_or(0, SceneNode::mesh_count)
    }

    /// Monotonic change counter.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
