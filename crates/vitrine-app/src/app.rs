// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Top-level application wiring and event loop handler.

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};
use vitrine_app_core::{config::ConfigService, config_port::ConfigPort, prefs::ViewerPrefs};
use vitrine_config_fs::FsConfigStore;
use vitrine_scene_port::Background;
use vitrine_viewer::{
    FrameQueue, GltfLoader, Platform, ResizeHub, Viewer, ViewerEvent, ViewerOptions,
};
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::ActiveEventLoop,
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    cli::Args,
    gpu::Gpu,
    host::{WindowContainer, WinitRenderPort},
    input,
    perf::PerfStats,
    surface::WgpuSurface,
};

const TITLE: &str = "Vitrine";

pub struct App {
    runtime: tokio::runtime::Handle,
    loader: GltfLoader,
    config: Option<Box<dyn ConfigPort>>,
    prefs: ViewerPrefs,
    options: ViewerOptions,
    window: Option<&'static Window>,
    viewer: Option<Viewer>,
    frames: FrameQueue,
    resize: ResizeHub,
    perf: PerfStats,
    last_frame: Instant,
}

impl App {
    pub fn new(args: &Args, runtime: tokio::runtime::Handle) -> Result<Self> {
        let config = FsConfigStore::new()
            .map(ConfigService::new)
            .map(|svc| Box::new(svc) as Box<dyn ConfigPort>)
            .ok();
        if config.is_none() {
            warn!("config store unavailable; prefs won't persist this session");
        }
        let mut prefs = config
            .as_ref()
            .and_then(|c| c.load_prefs())
            .unwrap_or_default();
        args.apply_to(&mut prefs);
        let options = ViewerOptions::from_prefs(&prefs)
            .context("nothing to show; pass --src <URI>")?;

        Ok(Self {
            runtime,
            loader: GltfLoader::new(args.assets_dir()),
            config,
            prefs,
            options,
            window: None,
            viewer: None,
            frames: FrameQueue::new(),
            resize: ResizeHub::default(),
            perf: PerfStats::default(),
            last_frame: Instant::now(),
        })
    }

    fn mount(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let transparent = self.options.background() == Background::Transparent;
        let window = event_loop.create_window(
            WindowAttributes::default()
                .with_title(TITLE)
                .with_transparent(transparent)
                .with_visible(false),
        )?;
        let window: &'static Window = Box::leak(Box::new(window));
        let gpu = pollster::block_on(Gpu::new(window, self.prefs.vsync, transparent))?;

        self.frames = FrameQueue::with_waker(Box::new(WinitRenderPort::new(window)));
        self.resize = ResizeHub::default();
        let platform = Platform {
            surface: Box::new(WgpuSurface::new(gpu, window)),
            container: Box::new(WindowContainer::new(window)),
            scheduler: Box::new(self.frames.clone()),
            resize: Box::new(self.resize.clone()),
        };
        let viewer = Viewer::mount(self.options.clone(), platform, &self.loader, &self.runtime);
        self.window = Some(window);
        self.viewer = Some(viewer);
        self.last_frame = Instant::now();
        Ok(())
    }

    fn shutdown(&mut self) {
        if let Some(mut viewer) = self.viewer.take() {
            viewer.unmount();
        }
        self.options.store_into(&mut self.prefs);
        if let Some(cfg) = &self.config {
            cfg.save_prefs(&self.prefs);
        }
    }

    fn frame(&mut self) {
        let Some(viewer) = self.viewer.as_mut() else {
            return;
        };
        let mut drew = false;
        for handle in self.frames.take_due() {
            drew |= viewer.on_frame(handle);
        }
        if !drew {
            return;
        }
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.perf.push(dt.as_secs_f32() * 1000.0);
        if self.perf.is_full() {
            debug!(fps = self.perf.fps(), frames = viewer.frames(), "frame rate");
            self.perf.clear();
        }
    }

    fn resized(&mut self) {
        let Some(viewer) = self.viewer.as_mut() else {
            return;
        };
        for id in self.resize.subscribers() {
            viewer.notify_resize(id);
        }
    }

    fn report(&mut self) {
        let (Some(viewer), Some(window)) = (self.viewer.as_mut(), self.window) else {
            return;
        };
        for event in viewer.drain_events() {
            match event {
                ViewerEvent::AssetAttached { uri, nodes } => {
                    info!(%uri, nodes, "asset attached");
                    window.set_title(&format!("{TITLE}: {uri}"));
                }
                ViewerEvent::AssetFailed(err) => {
                    warn!(%err, "asset failed; showing empty scene");
                    window.set_title(&format!("{TITLE}: {} (failed)", err.uri()));
                }
                ViewerEvent::Resized(dims) => {
                    debug!(width = dims.width, height = dims.height, "resized");
                }
                ViewerEvent::LoopStarted => debug!("render loop started"),
                ViewerEvent::LoopStopped => {
                    debug!("render loop stopped");
                    self.perf.clear();
                }
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.viewer.is_some() {
            return;
        }
        if let Err(err) = self.mount(event_loop) {
            error!("failed to start viewer: {err:#}");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.shutdown();
                event_loop.exit();
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => self.resized(),
            WindowEvent::RedrawRequested => self.frame(),
            other => {
                let (Some(viewer), Some(window)) = (self.viewer.as_mut(), self.window) else {
                    return;
                };
                if let Some(ev) = input::from_window_event(&other) {
                    let outcome = viewer.handle_input(ev);
                    input::apply_outcome(window, outcome);
                }
            }
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        let Some(viewer) = self.viewer.as_mut() else {
            return;
        };
        if let Some(ev) = input::from_device_event(&event) {
            viewer.handle_input(ev);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(viewer) = self.viewer.as_mut() {
            viewer.pump();
        }
        self.report();
    }
}
