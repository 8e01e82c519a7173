// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Mount/unmount orchestration for one viewer instance.

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use tracing::{debug, info, warn};
use vitrine_scene_port::{
    Fragment, FrameHandle, FrameScheduler, HostContainer, LoadError, PerspectiveCamera,
    RenderSurface, ResizeSignal, Scene, SubscriptionId,
};

use crate::asset_loader::AssetLoader;
use crate::interaction::{InteractionController, InteractionOutcome, ViewerInput};
use crate::options::ViewerOptions;
use crate::render_loop::RenderLoop;
use crate::scene_manager::SceneManager;
use crate::viewer_state::{Asset, AssetStatus};
use crate::viewport::{ViewportController, ViewportDimensions};

/// Host capabilities a viewer is mounted into.
pub struct Platform {
    /// Rasterization target; owned by the viewer until unmount.
    pub surface: Box<dyn RenderSurface>,
    /// Layout region the drawable is attached to.
    pub container: Box<dyn HostContainer>,
    /// Display-synchronized frame callbacks.
    pub scheduler: Box<dyn FrameScheduler>,
    /// Resize notifications.
    pub resize: Box<dyn ResizeSignal>,
}

/// Something hosts may want to surface to users.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewerEvent {
    /// The asset loaded and was attached.
    AssetAttached {
        /// Source URI.
        uri: String,
        /// Nodes added to the scene.
        nodes: usize,
    },
    /// The asset failed to load; the scene stays empty but lit.
    AssetFailed(LoadError),
    /// Surface and camera were resized.
    Resized(ViewportDimensions),
    /// Render loop started.
    LoopStarted,
    /// Render loop stopped.
    LoopStopped,
}

/// A mounted viewer.
///
/// All methods run on the host's UI thread. The only work off that thread is
/// the asset load, whose result is delivered by [`Viewer::pump`].
pub struct Viewer {
    options: ViewerOptions,
    scene: SceneManager,
    surface: Box<dyn RenderSurface>,
    viewport: ViewportController,
    render_loop: RenderLoop,
    interaction: InteractionController,
    asset: Asset,
    completions: Receiver<Result<Fragment, LoadError>>,
    events: VecDeque<ViewerEvent>,
    mounted: bool,
}

impl Viewer {
    /// Mount a viewer.
    ///
    /// Camera and lights are ready before this returns; the asset load runs on
    /// `runtime` and is attached by a later [`Viewer::pump`]. The render loop
    /// is already running, so frames show the lit empty scene until then.
    pub fn mount(
        options: ViewerOptions,
        platform: Platform,
        loader: &dyn AssetLoader,
        runtime: &tokio::runtime::Handle,
    ) -> Self {
        let Platform {
            surface,
            container,
            scheduler,
            resize,
        } = platform;

        let mut scene = SceneManager::new(options.background());
        scene.setup_camera();
        scene.setup_lights();

        let (tx, completions) = mpsc::channel();
        let load = loader.load(options.src());
        runtime.spawn(async move {
            // Receiver gone means the viewer was dropped; nothing to deliver.
            let _ = tx.send(load.await);
        });

        let mut viewer = Self {
            asset: Asset::pending(options.src()),
            interaction: InteractionController::new(options.interaction(), options.look()),
            options,
            scene,
            surface,
            viewport: ViewportController::new(container, resize),
            render_loop: RenderLoop::new(scheduler),
            completions,
            events: VecDeque::new(),
            mounted: true,
        };

        let dims = viewer.viewport.measure();
        if viewer
            .viewport
            .apply_dimensions(dims, viewer.surface.as_mut(), &mut viewer.scene)
        {
            viewer.events.push_back(ViewerEvent::Resized(dims));
        }
        viewer.viewport.attach(viewer.surface.as_ref());
        viewer.viewport.subscribe();
        if viewer.render_loop.start() {
            viewer.events.push_back(ViewerEvent::LoopStarted);
        }
        info!(
            src = viewer.options.src(),
            width = dims.width,
            height = dims.height,
            "viewer mounted"
        );
        viewer
    }

    /// Deliver finished loads. Returns the number applied.
    ///
    /// Completions that arrive after unmount are dropped.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        loop {
            match self.completions.try_recv() {
                Ok(result) => {
                    if !self.mounted {
                        debug!(uri = %self.asset.uri, "dropping load completion after unmount");
                        continue;
                    }
                    if self.complete_load(result) {
                        applied += 1;
                    }
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        applied
    }

    fn complete_load(&mut self, result: Result<Fragment, LoadError>) -> bool {
        match result {
            Ok(fragment) => {
                if !self.asset.resolve(AssetStatus::Loaded) {
                    return false;
                }
                let nodes = self.scene.attach_asset(fragment);
                info!(uri = %self.asset.uri, nodes, "asset attached");
                self.events.push_back(ViewerEvent::AssetAttached {
                    uri: self.asset.uri.clone(),
                    nodes,
                });
            }
            Err(err) => {
                if !self.asset.resolve(AssetStatus::Failed(err.clone())) {
                    return false;
                }
                warn!(%err, "asset unavailable; rendering empty scene");
                self.events.push_back(ViewerEvent::AssetFailed(err));
            }
        }
        true
    }

    /// Frame callback from the host scheduler.
    ///
    /// Delivers pending loads, renders, and schedules the next frame. Returns
    /// `false` for stale or cancelled handles, which render nothing.
    pub fn on_frame(&mut self, handle: FrameHandle) -> bool {
        self.pump();
        let Self {
            render_loop,
            surface,
            scene,
            ..
        } = self;
        render_loop.fire(handle, || {
            let (scene, camera) = scene.view();
            if let Err(err) = surface.render(scene, camera) {
                warn!(%err, "frame render failed");
            }
        })
    }

    /// Re-measure the container, resize surface and camera, and render once.
    pub fn handle_resize(&mut self) -> Option<ViewportDimensions> {
        if !self.mounted {
            return None;
        }
        let dims = self
            .viewport
            .handle_resize(self.surface.as_mut(), &mut self.scene)?;
        self.events.push_back(ViewerEvent::Resized(dims));
        Some(dims)
    }

    /// Resize notification for subscription `id`. Ids other than this
    /// viewer's live subscription are ignored.
    pub fn notify_resize(&mut self, id: SubscriptionId) -> Option<ViewportDimensions> {
        if self.viewport.subscription() != Some(id) {
            return None;
        }
        self.handle_resize()
    }

    /// Feed one input event through the interaction controller.
    pub fn handle_input(&mut self, input: ViewerInput) -> InteractionOutcome {
        if !self.mounted {
            return InteractionOutcome::None;
        }
        let outcome = self.interaction.handle(input, self.scene.camera_mut());
        match outcome {
            InteractionOutcome::StartLoop => {
                if self.render_loop.start() {
                    self.events.push_back(ViewerEvent::LoopStarted);
                }
            }
            InteractionOutcome::StopLoop => {
                if self.render_loop.stop() {
                    self.events.push_back(ViewerEvent::LoopStopped);
                }
            }
            _ => {}
        }
        outcome
    }

    /// Tear down: stop the loop, release the resize subscription, detach the
    /// drawable, dispose the surface. Returns `false` if already unmounted.
    pub fn unmount(&mut self) -> bool {
        if !self.mounted {
            return false;
        }
        self.mounted = false;
        if self.render_loop.stop() {
            self.events.push_back(ViewerEvent::LoopStopped);
        }
        self.viewport.unsubscribe();
        self.viewport.detach(self.surface.as_ref());
        self.surface.dispose();
        info!(
            src = self.options.src(),
            frames = self.render_loop.frames(),
            "viewer unmounted"
        );
        true
    }

    /// Scene graph.
    pub fn scene(&self) -> &Scene {
        self.scene.scene()
    }

    /// Camera.
    pub fn camera(&self) -> &PerspectiveCamera {
        self.scene.camera()
    }

    /// Asset and its load status.
    pub fn asset(&self) -> &Asset {
        &self.asset
    }

    /// True while the render loop has a frame pending.
    pub fn is_running(&self) -> bool {
        self.render_loop.is_running()
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.render_loop.frames()
    }

    /// Take queued events, oldest first.
    pub fn drain_events(&mut self) -> Vec<ViewerEvent> {
        self.events.drain(..).collect()
    }

    /// Live resize subscription.
    pub fn subscription(&self) -> Option<SubscriptionId> {
        self.viewport.subscription()
    }

    /// Last applied viewport dimensions.
    pub fn dimensions(&self) -> Option<ViewportDimensions> {
        self.viewport.last_dimensions()
    }

    /// False after [`Viewer::unmount`].
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Options the viewer was mounted with.
    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }
}

impl Drop for Viewer {
    fn drop(&mut self) {
        self.unmount();
    }
}
