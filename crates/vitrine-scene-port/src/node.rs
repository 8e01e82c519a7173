// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scene-graph nodes and loaded fragments.
//!
//! These types are pure data. Parsing them out of asset files is the loader's
//! concern; drawing them is the surface's.

use glam::Mat4;

/// One drawable primitive: indexed triangles with a flat base color.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions in node-local space.
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals (same length as `positions`).
    pub normals: Vec<[f32; 3]>,
    /// Triangle list indices into `positions`.
    pub indices: Vec<u32>,
    /// Linear RGBA base color.
    pub base_color: [f32; 4],
}

impl MeshData {
    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// What a node carries besides its children.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum NodeContent {
    /// Pure transform/grouping node.
    #[default]
    Group,
    /// Mesh-bearing node with one or more primitives.
    Mesh(Vec<MeshData>),
}

/// A node in the scene graph.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    /// Node name (from the asset, or synthesized).
    pub name: String,
    /// Local transform relative to the parent.
    pub transform: Mat4,
    /// Group or mesh payload.
    pub content: NodeContent,
    /// Whether this node renders into shadow maps.
    pub cast_shadow: bool,
    /// Child nodes, in document order.
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// Empty group node with identity transform.
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Mat4::IDENTITY,
            content: NodeContent::Group,
            cast_shadow: false,
            children: Vec::new(),
        }
    }

    /// Mesh node with the given primitives.
    pub fn mesh(name: impl Into<String>, primitives: Vec<MeshData>) -> Self {
        Self {
            content: NodeContent::Mesh(primitives),
            ..Self::group(name)
        }
    }

    /// Builder: set the local transform.
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    /// Builder: append a child.
    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    /// True if the node carries mesh primitives.
    pub fn is_mesh(&self) -> bool {
        matches!(self.content, NodeContent::Mesh(_))
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::node_count).sum::<usize>()
    }

    /// Number of mesh-bearing nodes in this subtree.
    pub fn mesh_count(&self) -> usize {
        usize::from(self.is_mesh()) + self.children.iter().map(SceneNode::mesh_count).sum::<usize>()
    }

    /// Visit every node depth-first with its world transform.
    pub fn visit_world<F>(&self, parent: Mat4, f: &mut F)
    where
        F: FnMut(&SceneNode, Mat4),
    {
        let world = parent * self.transform;
        f(self, world);
        for child in &self.children {
            child.visit_world(world, f);
        }
    }

    /// Visit every node depth-first, mutably.
    pub fn visit_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut SceneNode),
    {
        f(self);
        for child in &mut self.children {
            child.visit_mut(f);
        }
    }
}

/// A loaded scene-graph subtree produced by parsing one external asset.
#[derive(Clone, Debug, PartialEq)]
pub struct Fragment {
    source: String,
    root: SceneNode,
}

impl Fragment {
    /// Wrap a parsed subtree, remembering the URI it came from.
    pub fn new(source: impl Into<String>, root: SceneNode) -> Self {
        Self {
            source: source.into(),
            root,
        }
    }

    /// Source URI.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Root node of the fragment.
    pub fn root(&self) -> &SceneNode {
        &self.root
    }

    /// Nodes in the fragment, root included.
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Take ownership of the root node.
    pub fn into_root(self) -> SceneNode {
        self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn tree() -> SceneNode {
        SceneNode::group("root")
            .with_transform(Mat4::from_translation(Vec3::X))
            .with_child(SceneNode::mesh("a", vec![MeshData::default()]))
            .with_child(
                SceneNode::group("b")
                    .with_transform(Mat4::from_translation(Vec3::Y))
                    .with_child(SceneNode::mesh("c", vec![MeshData::default()])),
            )
    }

    #[test]
    fn counts_nodes_and_meshes() {
        let t = tree();
        assert_eq!(t.node_count(), 4);
        assert_eq!(t.mesh_count(), 2);
    }

    #[test]
    fn world_transforms_compose_down_the_tree() {
        let mut seen = Vec::new();
        tree().visit_world(Mat4::IDENTITY, &mut |node, world| {
            seen.push((node.name.clone(), world.transform_point3(Vec3::ZERO)));
        });
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[3], ("c".to_string(), Vec3::new(1.0, 1.0, 0.0)));
    }

    #[test]
    fn fragment_reports_source_and_count() {
        let frag = Fragment::new("assets/skull/scene.gltf", tree());
        assert_eq!(frag.source(), "assets/skull/scene.gltf");
        assert_eq!(frag.node_count(), 4);
    }
}
