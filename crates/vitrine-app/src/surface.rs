// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! wgpu render surface: uploads scene meshes and draws them each frame.

use glam::{Mat4, Vec3};
use tracing::debug;
use vitrine_scene_port::{
    Background, DrawableHandle, Light, NodeContent, PerspectiveCamera, RenderSurface, Scene,
    SurfaceError,
};
use wgpu::util::DeviceExt;
use winit::dpi::LogicalSize;
use winit::window::Window;

use crate::gpu::{Globals, Gpu, Instance, Vertex};

/// Gamma used to linearize sRGB-authored colors (background hex values).
const GAMMA: f64 = 2.2;

struct GpuMesh {
    vbuf: wgpu::Buffer,
    ibuf: wgpu::Buffer,
    count: u32,
}

/// Uploaded geometry for one scene revision.
#[derive(Default)]
struct MeshCache {
    revision: Option<u64>,
    meshes: Vec<GpuMesh>,
    instance_buf: Option<wgpu::Buffer>,
}

pub struct WgpuSurface {
    gpu: Gpu,
    window: &'static Window,
    drawable: DrawableHandle,
    cache: MeshCache,
}

impl WgpuSurface {
    pub fn new(gpu: Gpu, window: &'static Window) -> Self {
        Self {
            gpu,
            window,
            drawable: DrawableHandle(u64::from(window.id())),
            cache: MeshCache::default(),
        }
    }

    fn upload(&mut self, scene: &Scene) {
        let device = &self.gpu.device;
        let mut meshes = Vec::new();
        let mut instances = Vec::new();
        if let Some(root) = scene.asset_root() {
            root.visit_world(Mat4::IDENTITY, &mut |node, world| {
                let NodeContent::Mesh(primitives) = &node.content else {
                    return;
                };
                for prim in primitives.iter().filter(|p| !p.indices.is_empty()) {
                    let verts: Vec<Vertex> = prim
                        .positions
                        .iter()
                        .zip(&prim.normals)
                        .map(|(pos, normal)| Vertex {
                            pos: *pos,
                            normal: *normal,
                        })
                        .collect();
                    let vbuf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some(node.name.as_str()),
                        contents: bytemuck::cast_slice(&verts),
                        usage: wgpu::BufferUsages::VERTEX,
                    });
                    let ibuf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some(node.name.as_str()),
                        contents: bytemuck::cast_slice(&prim.indices),
                        usage: wgpu::BufferUsages::INDEX,
                    });
                    meshes.push(GpuMesh {
                        vbuf,
                        ibuf,
                        count: u32::try_from(prim.indices.len()).unwrap_or(u32::MAX),
                    });
                    instances.push(Instance {
                        model: world.to_cols_array_2d(),
                        color: prim.base_color,
                    });
                }
            });
        }
        let instance_buf = (!instances.is_empty()).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("instances"),
                contents: bytemuck::cast_slice(&instances),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });
        debug!(
            revision = scene.revision(),
            meshes = meshes.len(),
            "uploaded scene geometry"
        );
        self.cache = MeshCache {
            revision: Some(scene.revision()),
            meshes,
            instance_buf,
        };
    }

    fn acquire(&mut self) -> Result<wgpu::SurfaceTexture, SurfaceError> {
        match self.gpu.surface.get_current_texture() {
            Ok(frame) => Ok(frame),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.gpu.reconfigure();
                Err(SurfaceError::Lost)
            }
            Err(wgpu::SurfaceError::OutOfMemory) => Err(SurfaceError::OutOfMemory),
            Err(wgpu::SurfaceError::Timeout) => Err(SurfaceError::Timeout),
            Err(other) => Err(SurfaceError::Backend(other.to_string())),
        }
    }
}

/// Pack the light rig into shader uniforms.
pub fn globals_for(scene: &Scene, camera: &PerspectiveCamera) -> Globals {
    let mut globals = Globals {
        view_proj: camera.view_proj().to_cols_array_2d(),
        ..Globals::default()
    };
    for light in scene.lights() {
        match light {
            Light::Hemisphere(h) => {
                globals.sky = h.sky.scaled(h.intensity).to_array();
                globals.ground = h.ground.scaled(h.intensity).to_array();
            }
            Light::Directional(d) => {
                let toward: Vec3 = -d.direction();
                globals.light_dir = toward.extend(0.0).to_array();
                globals.light_color = d.color.scaled(d.intensity).to_array();
            }
        }
    }
    globals
}

/// Clear color for an sRGB target.
pub fn clear_color(background: Background) -> wgpu::Color {
    let [r, g, b, a] = background.clear_color();
    let lin = |c: f32| f64::from(c).powf(GAMMA);
    wgpu::Color {
        r: lin(r),
        g: lin(g),
        b: lin(b),
        a: f64::from(a),
    }
}

impl RenderSurface for WgpuSurface {
    fn resize(&mut self, width: u32, height: u32) {
        let physical =
            LogicalSize::new(width, height).to_physical::<u32>(self.window.scale_factor());
        self.gpu.resize(physical);
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), SurfaceError> {
        if self.cache.revision != Some(scene.revision()) {
            self.upload(scene);
        }
        let globals = globals_for(scene, camera);
        self.gpu
            .queue
            .write_buffer(&self.gpu.globals_buf, 0, bytemuck::bytes_of(&globals));

        let frame = self.acquire()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let gpu = &self.gpu;
        let (color_view, resolve_view) = match &gpu.msaa_view {
            Some(msaa) => (msaa, Some(&view)),
            None => (&view, None),
        };

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("main-encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target: resolve_view,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(scene.background())),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &gpu.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if let Some(instances) = &self.cache.instance_buf {
                rpass.set_pipeline(&gpu.pipeline);
                rpass.set_bind_group(0, &gpu.bind_group, &[]);
                rpass.set_vertex_buffer(1, instances.slice(..));
                for (i, mesh) in (0u32..).zip(&self.cache.meshes) {
                    rpass.set_vertex_buffer(0, mesh.vbuf.slice(..));
                    rpass.set_index_buffer(mesh.ibuf.slice(..), wgpu::IndexFormat::Uint32);
                    rpass.draw_indexed(0..mesh.count, 0, i..i + 1);
                }
            }
        }
        gpu.queue.submit(Some(encoder.finish()));
        self.window.pre_present_notify();
        frame.present();
        Ok(())
    }

    fn drawable(&self) -> DrawableHandle {
        self.drawable
    }

    fn dispose(&mut self) {
        self.cache = MeshCache::default();
        debug!("render surface disposed");
    }
}
