// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Asynchronous asset loading: URI in, scene-graph [`Fragment`] out.
//!
//! Loaders never touch a scene. They resolve to a detached fragment (or a
//! [`LoadError`] naming the URI); attaching it is the caller's business.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use glam::Mat4;
use tracing::{debug, warn};
use vitrine_scene_port::{Fragment, LoadError, MeshData, SceneNode};

/// Boxed load future. `Send` so it can run on a multi-threaded runtime.
pub type LoadFuture = Pin<Box<dyn Future<Output = Result<Fragment, LoadError>> + Send + 'static>>;

/// Resolves a source URI into a fragment.
pub trait AssetLoader: Send + Sync {
    /// Begin loading `uri`. The future resolves exactly once; it never panics
    /// on bad input.
    fn load(&self, uri: &str) -> LoadFuture;
}

/// Where the bytes for a URI come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetSource {
    /// Local file.
    File(PathBuf),
    /// Remote document fetched over HTTP(S).
    Http(String),
}

impl AssetSource {
    /// Classify `uri`. Relative paths resolve against `base_dir`.
    pub fn resolve(uri: &str, base_dir: &Path) -> Result<Self, LoadError> {
        let trimmed = uri.trim();
        if trimmed.is_empty() {
            return Err(LoadError::Unsupported { uri: uri.into() });
        }
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return Ok(Self::Http(trimmed.to_owned()));
        }
        if trimmed.starts_with("file://") {
            return reqwest::Url::parse(trimmed)
                .ok()
                .and_then(|url| url.to_file_path().ok())
                .map(Self::File)
                .ok_or_else(|| LoadError::Unsupported { uri: uri.into() });
        }
        if trimmed.contains("://") {
            return Err(LoadError::Unsupported { uri: uri.into() });
        }
        let path = Path::new(trimmed);
        if path.is_absolute() {
            Ok(Self::File(path.to_path_buf()))
        } else {
            Ok(Self::File(base_dir.join(path)))
        }
    }
}

/// glTF 2.0 loader (`.gltf` with embedded or sibling buffers, `.glb`).
///
/// Files are read with `tokio::fs`; parsing runs on the blocking pool.
#[derive(Clone, Debug)]
pub struct GltfLoader {
    base_dir: PathBuf,
    http: reqwest::Client,
}

impl GltfLoader {
    /// Loader resolving relative URIs against `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Base directory for relative URIs.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl AssetLoader for GltfLoader {
    fn load(&self, uri: &str) -> LoadFuture {
        let uri = uri.to_owned();
        let source = AssetSource::resolve(&uri, &self.base_dir);
        let http = self.http.clone();
        Box::pin(async move {
            let result = match source? {
                AssetSource::File(path) => load_file(uri.clone(), path).await,
                AssetSource::Http(url) => load_http(uri.clone(), &http, &url).await,
            };
            match &result {
                Ok(fragment) => debug!(%uri, nodes = fragment.node_count(), "asset loaded"),
                Err(err) => warn!(%err, "asset load failed"),
            }
            result
        })
    }
}

async fn load_file(uri: String, path: PathBuf) -> Result<Fragment, LoadError> {
    let bytes = tokio::fs::read(&path).await.map_err(|err| LoadError::Fetch {
        uri: uri.clone(),
        reason: format!("{}: {err}", path.display()),
    })?;
    let base = path.parent().map(Path::to_path_buf);
    parse_blocking(uri, bytes, base).await
}

async fn load_http(uri: String, http: &reqwest::Client, url: &str) -> Result<Fragment, LoadError> {
    let fetch_err = |err: reqwest::Error| LoadError::Fetch {
        uri: uri.clone(),
        reason: err.to_string(),
    };
    let response = http
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(fetch_err)?;
    let bytes = response.bytes().await.map_err(fetch_err)?;
    parse_blocking(uri, bytes.to_vec(), None).await
}

async fn parse_blocking(
    uri: String,
    bytes: Vec<u8>,
    base: Option<PathBuf>,
) -> Result<Fragment, LoadError> {
    let task_uri = uri.clone();
    tokio::task::spawn_blocking(move || parse_gltf(&task_uri, &bytes, base.as_deref()))
        .await
        .map_err(|err| LoadError::Parse {
            uri,
            reason: format!("parser task failed: {err}"),
        })?
}

/// Parse glTF/GLB bytes into a fragment. External buffers resolve against `base`.
pub fn parse_gltf(uri: &str, bytes: &[u8], base: Option<&Path>) -> Result<Fragment, LoadError> {
    let gltf::Gltf { document, blob } =
        gltf::Gltf::from_slice(bytes).map_err(|err| LoadError::Parse {
            uri: uri.into(),
            reason: err.to_string(),
        })?;
    let buffers =
        gltf::import_buffers(&document, base, blob).map_err(|err| malformed(uri, err))?;

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or_else(|| malformed(uri, "document has no scenes"))?;

    let mut visited = vec![false; document.nodes().len()];
    let mut root = SceneNode::group(scene.name().unwrap_or("scene"));
    for node in scene.nodes() {
        root.children.push(convert_node(uri, &node, &buffers, &mut visited)?);
    }
    Ok(Fragment::new(uri, root))
}

fn convert_node(
    uri: &str,
    node: &gltf::Node<'_>,
    buffers: &[gltf::buffer::Data],
    visited: &mut [bool],
) -> Result<SceneNode, LoadError> {
    // The parser only range-checks child indices; cycles and shared
    // children get through.
    match visited.get_mut(node.index()) {
        Some(seen) if !*seen => *seen = true,
        _ => return Err(malformed(uri, format!("node {} reachable twice", node.index()))),
    }
    let name = node
        .name()
        .map_or_else(|| format!("node{}", node.index()), str::to_owned);
    let transform = Mat4::from_cols_array_2d(&node.transform().matrix());

    let mut out = match node.mesh() {
        Some(mesh) => {
            let mut primitives = Vec::new();
            for primitive in mesh.primitives() {
                if let Some(data) = convert_primitive(uri, &primitive, buffers)? {
                    primitives.push(data);
                }
            }
            SceneNode::mesh(name, primitives)
        }
        None => SceneNode::group(name),
    }
    .with_transform(transform);

    for child in node.children() {
        out.children.push(convert_node(uri, &child, buffers, visited)?);
    }
    Ok(out)
}

fn convert_primitive(
    uri: &str,
    primitive: &gltf::Primitive<'_>,
    buffers: &[gltf::buffer::Data],
) -> Result<Option<MeshData>, LoadError> {
    if primitive.mode() != gltf::mesh::Mode::Triangles {
        debug!(mode = ?primitive.mode(), "skipping non-triangle primitive");
        return Ok(None);
    }
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| &data.0[..]));

    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .ok_or_else(|| malformed(uri, "primitive without POSITION"))?
        .collect();
    let vertex_count = positions.len();

    let indices: Vec<u32> = match reader.read_indices() {
        Some(read) => read.into_u32().collect(),
        None => (0..u32::try_from(vertex_count).map_err(|err| malformed(uri, err))?).collect(),
    };
    if indices.len() % 3 != 0 {
        return Err(malformed(uri, "triangle index count not a multiple of 3"));
    }
    if let Some(bad) = indices.iter().find(|&&i| i as usize >= vertex_count) {
        return Err(malformed(
            uri,
            format!("index {bad} out of range for {vertex_count} vertices"),
        ));
    }

    let normals = match reader.read_normals() {
        Some(read) => {
            let normals: Vec<[f32; 3]> = read.collect();
            if normals.len() == vertex_count {
                normals
            } else {
                smooth_normals(&positions, &indices)
            }
        }
        None => smooth_normals(&positions, &indices),
    };

    Ok(Some(MeshData {
        positions,
        normals,
        indices,
        base_color: primitive
            .material()
            .pbr_metallic_roughness()
            .base_color_factor(),
    }))
}

/// Area-weighted vertex normals for meshes that ship without them.
fn smooth_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut acc = vec![glam::Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let pa = glam::Vec3::from(positions[a]);
        let face = (glam::Vec3::from(positions[b]) - pa).cross(glam::Vec3::from(positions[c]) - pa);
        acc[a] += face;
        acc[b] += face;
        acc[c] += face;
    }
    acc.into_iter()
        .map(|n| n.try_normalize().unwrap_or(glam::Vec3::Y).to_array())
        .collect()
}

fn malformed(uri: &str, reason: impl ToString) -> LoadError {
    LoadError::Malformed {
        uri: uri.into(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn resolves_sources() {
        let base = Path::new("/srv/assets");
        assert_eq!(
            AssetSource::resolve("skull/scene.gltf", base),
            Ok(AssetSource::File(PathBuf::from("/srv/assets/skull/scene.gltf")))
        );
        assert_eq!(
            AssetSource::resolve("file:///tmp/a.glb", base),
            Ok(AssetSource::File(PathBuf::from("/tmp/a.glb")))
        );
        assert_eq!(
            AssetSource::resolve("file:///my%20assets/a.glb", base),
            Ok(AssetSource::File(PathBuf::from("/my assets/a.glb")))
        );
        assert!(matches!(
            AssetSource::resolve("file://remote-host/a.glb", base),
            Err(LoadError::Unsupported { .. })
        ));
        assert_eq!(
            AssetSource::resolve("https://example.com/a.glb", base),
            Ok(AssetSource::Http("https://example.com/a.glb".into()))
        );
        assert!(matches!(
            AssetSource::resolve("ftp://example.com/a.glb", base),
            Err(LoadError::Unsupported { .. })
        ));
        assert!(matches!(
            AssetSource::resolve("  ", base),
            Err(LoadError::Unsupported { .. })
        ));
    }

    #[test]
    fn smooth_normals_face_out_of_ccw_triangle() {
        let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let normals = smooth_normals(&positions, &[0, 1, 2]);
        assert_eq!(normals, vec![[0.0, 0.0, 1.0]; 3]);
    }

    #[test]
    fn garbage_is_a_parse_error_with_uri() {
        let err = parse_gltf("junk.gltf", b"not a gltf", None).expect_err("must fail");
        assert!(matches!(err, LoadError::Parse { .. }));
        assert_eq!(err.uri(), "junk.gltf");
    }
}
