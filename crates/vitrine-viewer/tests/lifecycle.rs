// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs, clippy::expect_used)]
//! Mount/unmount behavior of `Viewer` against headless mocks.

use std::sync::Mutex;

use approx::assert_relative_eq;
use tokio::sync::oneshot;
use vitrine_scene_port::{
    ContainerProbe, DrawableHandle, Fragment, LoadError, MockContainer, MockSurface, SceneNode,
    SurfaceProbe,
};
use vitrine_viewer::{
    AssetLoader, AssetStatus, FrameQueue, InteractionOutcome, LoadFuture, Platform, ResizeHub,
    Viewer, ViewerEvent, ViewerInput, ViewerOptions, ViewportDimensions,
};

/// Resolves every load with a fixed result.
struct FixedLoader(Result<Fragment, LoadError>);

impl AssetLoader for FixedLoader {
    fn load(&self, _uri: &str) -> LoadFuture {
        let result = self.0.clone();
        Box::pin(async move { result })
    }
}

/// Resolves once the test sends on the gate.
struct GatedLoader(Mutex<Option<oneshot::Receiver<Result<Fragment, LoadError>>>>);

impl GatedLoader {
    fn new() -> (Self, oneshot::Sender<Result<Fragment, LoadError>>) {
        let (tx, rx) = oneshot::channel();
        (Self(Mutex::new(Some(rx))), tx)
    }
}

impl AssetLoader for GatedLoader {
    fn load(&self, uri: &str) -> LoadFuture {
        let rx = self.0.lock().ok().and_then(|mut slot| slot.take());
        let uri = uri.to_owned();
        Box::pin(async move {
            let gone = || LoadError::Fetch {
                uri: uri.clone(),
                reason: "gate dropped".into(),
            };
            match rx {
                Some(rx) => rx.await.unwrap_or_else(|_| Err(gone())),
                None => Err(gone()),
            }
        })
    }
}

struct Harness {
    surface: SurfaceProbe,
    container: ContainerProbe,
    frames: FrameQueue,
    resize: ResizeHub,
}

impl Harness {
    fn platform(width: u32, height: u32) -> (Platform, Self) {
        let (surface, surface_probe) = MockSurface::new(DrawableHandle(7));
        let (container, container_probe) = MockContainer::new(width, height);
        let frames = FrameQueue::new();
        let resize = ResizeHub::default();
        let platform = Platform {
            surface: Box::new(surface),
            container: Box::new(container),
            scheduler: Box::new(frames.clone()),
            resize: Box::new(resize.clone()),
        };
        (
            platform,
            Self {
                surface: surface_probe,
                container: container_probe,
                frames,
                resize,
            },
        )
    }

    /// Fire every due frame; returns how many rendered.
    fn tick(&self, viewer: &mut Viewer) -> usize {
        self.frames
            .take_due()
            .into_iter()
            .filter(|h| viewer.on_frame(*h))
            .count()
    }

    /// Notify every live resize subscriber.
    fn resize_to(
        &self,
        viewer: &mut Viewer,
        width: u32,
        height: u32,
    ) -> Option<ViewportDimensions> {
        self.container.set_size(width, height);
        let mut applied = None;
        for id in self.resize.subscribers() {
            applied = viewer.notify_resize(id).or(applied);
        }
        applied
    }
}

/// Let spawned load tasks run, then deliver their results.
async fn settle(viewer: &mut Viewer) -> usize {
    for _ in 0..64 {
        tokio::task::yield_now().await;
        let applied = viewer.pump();
        if applied > 0 {
            return applied;
        }
    }
    0
}

fn fragment() -> Fragment {
    Fragment::new(
        "scene.gltf",
        SceneNode::group("scene")
            .with_child(SceneNode::mesh("body", Vec::new()))
            .with_child(SceneNode::group("pivot").with_child(SceneNode::mesh("eye", Vec::new()))),
    )
}

fn mount(loader: &dyn AssetLoader, width: u32, height: u32) -> (Viewer, Harness) {
    let (platform, harness) = Harness::platform(width, height);
    let viewer = Viewer::mount(
        ViewerOptions::new("scene.gltf"),
        platform,
        loader,
        &tokio::runtime::Handle::current(),
    );
    (viewer, harness)
}

#[tokio::test]
async fn mount_into_400_by_300() {
    let loader = FixedLoader(Ok(fragment()));
    let (mut viewer, h) = mount(&loader, 400, 300);

    assert_eq!(h.surface.resizes(), vec![(400, 300)]);
    assert_relative_eq!(viewer.camera().aspect(), 400.0 / 300.0);
    assert_eq!(h.container.attached(), vec![DrawableHandle(7)]);
    assert!(viewer.is_running());
    assert_eq!(h.frames.pending(), 1);
    assert_eq!(h.resize.len(), 1);
    assert_eq!(
        viewer.drain_events(),
        vec![
            ViewerEvent::Resized(ViewportDimensions::new(400, 300)),
            ViewerEvent::LoopStarted
        ]
    );

    for _ in 0..5 {
        assert_eq!(h.tick(&mut viewer), 1);
    }
    assert_eq!(viewer.frames(), 5);
    assert!(viewer.is_running());
}

#[tokio::test]
async fn load_success_adds_exactly_the_fragment() {
    let loader = FixedLoader(Ok(fragment()));
    let (mut viewer, _h) = mount(&loader, 400, 300);
    let lit = viewer.scene().node_count();
    assert_eq!(lit, 2);
    viewer.drain_events();

    assert_eq!(settle(&mut viewer).await, 1);
    assert_eq!(viewer.scene().root_children(), 3);
    assert_eq!(viewer.scene().node_count(), lit + fragment().node_count());
    assert_eq!(viewer.asset().status, AssetStatus::Loaded);

    let events = viewer.drain_events();
    assert_eq!(
        events,
        vec![ViewerEvent::AssetAttached {
            uri: "scene.gltf".into(),
            nodes: 4
        }]
    );
    let asset = viewer.scene().asset_root().expect("asset");
    assert!(asset.children[0].cast_shadow);
    assert!(!asset.children[1].cast_shadow);
}

#[tokio::test]
async fn load_failure_keeps_rendering_lit_scene() {
    let err = LoadError::Fetch {
        uri: "scene.gltf".into(),
        reason: "404".into(),
    };
    let loader = FixedLoader(Err(err.clone()));
    let (mut viewer, h) = mount(&loader, 640, 480);
    viewer.drain_events();

    assert_eq!(settle(&mut viewer).await, 1);
    assert_eq!(viewer.drain_events(), vec![ViewerEvent::AssetFailed(err.clone())]);
    assert_eq!(viewer.asset().status, AssetStatus::Failed(err));
    assert_eq!(viewer.scene().node_count(), 2);
    assert!(viewer.scene().asset_root().is_none());

    assert!(viewer.is_running());
    assert_eq!(h.tick(&mut viewer), 1);
    assert_eq!(h.tick(&mut viewer), 1);
    let frame = h.surface.last_frame().expect("frame");
    assert!(!frame.has_asset);
    assert_eq!(frame.node_count, 2);
    assert_eq!(viewer.drain_events(), Vec::new());
}

#[tokio::test]
async fn frames_render_before_asset_arrives() {
    let (loader, gate) = GatedLoader::new();
    let (mut viewer, h) = mount(&loader, 400, 300);

    assert_eq!(h.tick(&mut viewer), 1);
    assert!(!h.surface.last_frame().expect("frame").has_asset);

    gate.send(Ok(fragment())).expect("gate open");
    assert_eq!(settle(&mut viewer).await, 1);
    assert_eq!(h.tick(&mut viewer), 1);
    assert!(h.surface.last_frame().expect("frame").has_asset);
}

#[tokio::test]
async fn unmount_stops_frames_and_releases_everything() {
    let loader = FixedLoader(Ok(fragment()));
    let (mut viewer, h) = mount(&loader, 400, 300);
    h.tick(&mut viewer);
    let rendered = h.surface.render_count();
    let subscription = viewer.subscription().expect("subscribed");

    // A frame already handed out by the scheduler must not run after unmount.
    let due = h.frames.take_due();
    assert!(viewer.unmount());
    for handle in due {
        assert!(!viewer.on_frame(handle));
    }
    assert_eq!(h.surface.render_count(), rendered);
    assert_eq!(h.frames.pending(), 0);
    assert!(!viewer.is_running());

    assert!(h.resize.is_empty());
    assert_eq!(viewer.subscription(), None);
    assert!(h.container.attached().is_empty());
    assert_eq!(h.container.detach_count(), 1);
    assert!(h.surface.disposed());

    h.container.set_size(800, 600);
    assert_eq!(viewer.notify_resize(subscription), None);
    assert_eq!(viewer.handle_resize(), None);
    assert_eq!(h.surface.size(), (400, 300));

    assert!(!viewer.unmount());
    assert_eq!(h.container.detach_count(), 1);
}

#[tokio::test]
async fn drop_unmounts() {
    let loader = FixedLoader(Ok(fragment()));
    let (viewer, h) = mount(&loader, 400, 300);
    drop(viewer);
    assert!(h.surface.disposed());
    assert!(h.resize.is_empty());
    assert_eq!(h.frames.pending(), 0);
    assert!(h.container.attached().is_empty());
}

#[tokio::test]
async fn load_finishing_after_unmount_is_dropped() {
    let (loader, gate) = GatedLoader::new();
    let (mut viewer, _h) = mount(&loader, 400, 300);
    viewer.unmount();

    gate.send(Ok(fragment())).expect("gate open");
    assert_eq!(settle(&mut viewer).await, 0);
    assert!(viewer.scene().asset_root().is_none());
    assert_eq!(viewer.asset().status, AssetStatus::Pending);
}

#[tokio::test]
async fn clicks_toggle_the_loop() {
    let loader = FixedLoader(Ok(fragment()));
    let (mut viewer, h) = mount(&loader, 400, 300);
    viewer.drain_events();

    assert_eq!(viewer.handle_input(ViewerInput::Click), InteractionOutcome::StopLoop);
    assert!(!viewer.is_running());
    assert_eq!(h.frames.pending(), 0);
    assert_eq!(h.tick(&mut viewer), 0);

    assert_eq!(viewer.handle_input(ViewerInput::Click), InteractionOutcome::StartLoop);
    assert!(viewer.is_running());
    assert_eq!(h.frames.pending(), 1);
    assert_eq!(h.tick(&mut viewer), 1);

    assert_eq!(viewer.handle_input(ViewerInput::Click), InteractionOutcome::StopLoop);
    assert_eq!(
        viewer.drain_events(),
        vec![
            ViewerEvent::LoopStopped,
            ViewerEvent::LoopStarted,
            ViewerEvent::LoopStopped
        ]
    );
}

#[tokio::test]
async fn resize_keeps_surface_and_camera_consistent() {
    let loader = FixedLoader(Ok(fragment()));
    let (mut viewer, h) = mount(&loader, 400, 300);
    let before = h.surface.render_count();

    assert_eq!(
        h.resize_to(&mut viewer, 1280, 720),
        Some(ViewportDimensions::new(1280, 720))
    );
    assert_eq!(h.surface.size(), (1280, 720));
    assert_relative_eq!(viewer.camera().aspect(), 1280.0 / 720.0);

    // One immediate render at the new size.
    assert_eq!(h.surface.render_count(), before + 1);
    let frame = h.surface.last_frame().expect("frame");
    assert_eq!(frame.size, (1280, 720));
    assert_relative_eq!(frame.aspect, 1280.0 / 720.0);
}

#[tokio::test]
async fn zero_sized_container_defers_sizing() {
    let loader = FixedLoader(Ok(fragment()));
    let (mut viewer, h) = mount(&loader, 0, 0);

    assert!(h.surface.resizes().is_empty());
    assert_eq!(viewer.camera().aspect(), 0.0);
    assert_eq!(viewer.dimensions(), None);
    assert!(viewer.is_running());
    assert_eq!(h.tick(&mut viewer), 1);

    assert_eq!(h.resize_to(&mut viewer, 300, 0), None);
    assert!(h.surface.resizes().is_empty());

    assert_eq!(
        h.resize_to(&mut viewer, 300, 150),
        Some(ViewportDimensions::new(300, 150))
    );
    assert_eq!(viewer.camera().aspect(), 2.0);
}

#[tokio::test]
async fn surface_errors_do_not_stop_the_loop() {
    let loader = FixedLoader(Ok(fragment()));
    let (mut viewer, h) = mount(&loader, 400, 300);
    h.surface.fail_renders(true);
    assert_eq!(h.tick(&mut viewer), 1);
    assert_eq!(h.tick(&mut viewer), 1);
    assert!(viewer.is_running());
    assert_eq!(viewer.frames(), 2);
}
