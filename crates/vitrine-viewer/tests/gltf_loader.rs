// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs, clippy::expect_used, clippy::panic)]

use std::path::PathBuf;

use approx::assert_relative_eq;
use vitrine_scene_port::{LoadError, NodeContent, SceneNode};
use vitrine_viewer::{AssetLoader, GltfLoader};

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn find<'a>(node: &'a SceneNode, name: &str) -> Option<&'a SceneNode> {
    if node.name == name {
        return Some(node);
    }
    node.children.iter().find_map(|c| find(c, name))
}

#[tokio::test]
async fn embedded_buffer_gltf_becomes_fragment() {
    let loader = GltfLoader::new(fixtures());
    let fragment = loader.load("triangle.gltf").await.expect("load");

    assert_eq!(fragment.source(), "triangle.gltf");
    // scene group + root + triangle
    assert_eq!(fragment.node_count(), 3);
    assert_eq!(fragment.root().mesh_count(), 1);

    let tri = find(fragment.root(), "triangle").expect("triangle node");
    assert_relative_eq!(tri.transform.w_axis.z, -1.0);
    let NodeContent::Mesh(prims) = &tri.content else {
        panic!("triangle should carry a mesh");
    };
    assert_eq!(prims.len(), 1);
    assert_eq!(prims[0].indices, vec![0, 1, 2]);
    assert_eq!(prims[0].triangle_count(), 1);
    assert_eq!(prims[0].normals, vec![[0.0, 0.0, 1.0]; 3]);
    assert_relative_eq!(prims[0].base_color[0], 0.8);
}

#[tokio::test]
async fn file_uri_is_accepted() {
    let loader = GltfLoader::new("/nonexistent-base");
    let uri = format!("file://{}", fixtures().join("triangle.gltf").display());
    let fragment = loader.load(&uri).await.expect("load");
    assert_eq!(fragment.root().mesh_count(), 1);
}

#[tokio::test]
async fn missing_file_is_fetch_error() {
    let loader = GltfLoader::new(fixtures());
    let err = loader.load("nope/missing.gltf").await.expect_err("missing");
    assert!(matches!(err, LoadError::Fetch { .. }));
    assert_eq!(err.uri(), "nope/missing.gltf");
}

#[tokio::test]
async fn garbage_is_parse_error() {
    let loader = GltfLoader::new(fixtures());
    let err = loader.load("garbage.gltf").await.expect_err("garbage");
    assert!(matches!(err, LoadError::Parse { .. }));
}

#[tokio::test]
async fn out_of_range_index_is_malformed() {
    let loader = GltfLoader::new(fixtures());
    let err = loader.load("bad_index.gltf").await.expect_err("bad index");
    assert!(matches!(err, LoadError::Malformed { .. }), "{err:?}");
}

#[tokio::test]
async fn cyclic_node_graph_is_malformed() {
    let loader = GltfLoader::new(fixtures());
    let err = loader.load("cyclic_nodes.gltf").await.expect_err("cycle");
    assert!(matches!(err, LoadError::Malformed { .. }), "{err:?}");
    assert_eq!(err.uri(), "cyclic_nodes.gltf");
}

#[tokio::test]
async fn node_with_two_parents_is_malformed() {
    let loader = GltfLoader::new(fixtures());
    let err = loader.load("shared_child.gltf").await.expect_err("shared");
    assert!(matches!(err, LoadError::Malformed { .. }), "{err:?}");
}

#[tokio::test]
async fn unknown_scheme_is_unsupported() {
    let loader = GltfLoader::new(fixtures());
    let err = loader.load("ftp://example.com/a.glb").await.expect_err("ftp");
    assert_eq!(
        err,
        LoadError::Unsupported {
            uri: "ftp://example.com/a.glb".into()
        }
    );
}
