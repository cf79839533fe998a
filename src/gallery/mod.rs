//! The gallery: portals, routing, camera and loading wired into one frame
//! loop.
//!
//! [`Gallery`] owns every piece of runtime state. An embedding application
//! (or the bundled viewer) feeds it commands, calls [`Gallery::tick`] once per
//! displayed frame and hands [`Gallery::describe`] to a renderer.
//!
//! ```no_run
//! use vitrine::gallery::{Gallery, GalleryConfig};
//! use vitrine::options::Options;
//!
//! let mut gallery = Gallery::with_default_loader(GalleryConfig::default(), Options::default())?;
//! let _ = gallery.navigate("/item/02");
//! gallery.tick(1.0 / 60.0);
//! let scene = gallery.describe();
//! assert_eq!(scene.portals.len(), 3);
//! # Ok::<(), vitrine::error::VitrineError>(())
//! ```

mod command;
mod config;
mod frame;
mod indicator;

use std::sync::Arc;

pub use command::GalleryCommand;
pub use config::{GalleryConfig, ModelTransform, PortalSpec, SpotLightSpec};
pub use frame::{BlendState, Frame, HIGHLIGHT_MATERIAL};
use glam::{UVec2, Vec2, Vec3};
pub use indicator::LoadingIndicator;

use crate::assets::{AssetLoader, GltfLoader, LoadingGate, ModelRegistry};
use crate::camera::{CameraController, CameraRig};
use crate::error::VitrineError;
use crate::navigation::Router;
use crate::options::Options;
use crate::picking::{pick_nearest, WindowRect};
use crate::scene::description::{
    AmbientLight, BloomPass, DirectionalLight, SceneDescription,
};
use crate::scene::{SceneGraph, Transform};
use crate::util::color::Color;

/// Golden ratio; portal windows are `1 × φ`.
pub const GOLDEN_RATIO: f32 = 1.618_034;

/// Viewport assumed until the first [`Gallery::set_viewport`].
const DEFAULT_VIEWPORT: UVec2 = UVec2::new(1280, 720);

/// Runtime state of one gallery.
pub struct Gallery {
    options: Options,
    background: Color,
    graph: SceneGraph,
    frames: Vec<Frame>,
    router: Router,
    rig: CameraRig,
    controller: CameraController,
    gate: LoadingGate,
    indicator: LoadingIndicator,
    viewport: UVec2,
}

impl Gallery {
    /// Build a gallery and start loading its models through `loader`.
    ///
    /// # Errors
    ///
    /// Returns [`VitrineError::DuplicatePortalId`] if two portals share an id
    /// and [`VitrineError::OptionsParse`] if the display background is not a
    /// valid color.
    pub fn new(
        config: GalleryConfig,
        options: Options,
        loader: Arc<dyn AssetLoader>,
    ) -> Result<Self, VitrineError> {
        config.validate()?;
        let background = Color::from_hex(&options.display.background)
            .map_err(|e| VitrineError::OptionsParse(e.to_string()))?;

        let mut graph = SceneGraph::new();
        let root = graph.add(
            None,
            None,
            Transform::from_translation(config.group_offset),
        );

        let frames: Vec<Frame> = config
            .portals
            .iter()
            .map(|spec| {
                let group = graph.add(
                    Some(root),
                    None,
                    Transform::from_translation_rotation(
                        spec.layout_offset,
                        spec.layout_rotation,
                    ),
                );
                let window = graph.add(
                    Some(group),
                    Some(&spec.id),
                    Transform::from_translation(Vec3::new(0.0, GOLDEN_RATIO / 2.0, 0.0)),
                );
                // Nested scenes share world coordinates, not the window's.
                let portal_root = graph.add(None, None, Transform::IDENTITY);
                let model = graph.add(
                    Some(portal_root),
                    None,
                    Transform {
                        translation: spec.model_transform.position,
                        rotation: spec.model_transform.rotation,
                        scale: Vec3::splat(spec.model_transform.scale),
                    },
                );
                Frame::new(spec.clone(), group, window, model)
            })
            .collect();

        let gate = LoadingGate::start(&ModelRegistry::from_config(&config), loader);
        let indicator = LoadingIndicator::new(gate.is_loading(), gate.total());

        let rig = CameraRig::new(options.rig.clone());
        let controller = CameraController::new(
            &options.camera,
            rig.default_pose(),
            DEFAULT_VIEWPORT.x as f32 / DEFAULT_VIEWPORT.y as f32,
        );

        log::info!("gallery with {} portals", frames.len());

        Ok(Self {
            options,
            background,
            graph,
            frames,
            router: Router::new(),
            rig,
            controller,
            gate,
            indicator,
            viewport: DEFAULT_VIEWPORT,
        })
    }

    /// Build a gallery that loads glTF models from `options.asset_root`.
    ///
    /// # Errors
    ///
    /// Same as [`Gallery::new`].
    pub fn with_default_loader(
        config: GalleryConfig,
        options: Options,
    ) -> Result<Self, VitrineError> {
        let loader = Arc::new(GltfLoader::new(options.asset_root.clone()));
        Self::new(config, options, loader)
    }

    /// Advance one displayed frame by `dt` seconds.
    ///
    /// The route is read once; every frame and the rig see the same active
    /// id.
    pub fn tick(&mut self, dt: f32) {
        let _ = self.gate.poll();
        self.indicator
            .update(self.gate.is_loading(), self.gate.settled());

        let active = self.router.active_id();
        for frame in &mut self.frames {
            frame.tick(active, dt, &self.options.frame, &mut self.graph, &self.gate);
        }

        let pose = self.rig.pose(&self.graph, active);
        self.controller.set_look_at(pose, true);
        let _ = self.controller.update(dt);
    }

    /// Apply a command. Returns `true` if the route changed.
    pub fn execute(&mut self, command: GalleryCommand) -> bool {
        match command {
            GalleryCommand::Hover { portal } => {
                for (i, frame) in self.frames.iter_mut().enumerate() {
                    let over = portal == Some(i);
                    if frame.is_hovered() != over {
                        frame.set_hovered(over);
                    }
                }
                false
            }
            GalleryCommand::Click { portal } => {
                if let Some(frame) = self.frames.get_mut(portal) {
                    frame.toggle_hovered();
                }
                false
            }
            GalleryCommand::DoubleClick { portal } => self
                .frames
                .get(portal)
                .map(Frame::route)
                .is_some_and(|route| self.router.set(route)),
            GalleryCommand::Back => self.router.go_home(),
            GalleryCommand::NextPortal => self.step_focus(1),
            GalleryCommand::PreviousPortal => self.step_focus(-1),
            GalleryCommand::Navigate { path } => self.navigate(&path),
        }
    }

    fn step_focus(&mut self, delta: isize) -> bool {
        let count = self.frames.len() as isize;
        if count == 0 {
            return false;
        }
        let current = self
            .router
            .active_id()
            .and_then(|id| self.frames.iter().position(|f| f.id() == id));
        let next = match current {
            Some(i) => (i as isize + delta).rem_euclid(count),
            None if delta >= 0 => 0,
            None => count - 1,
        };
        let route = self.frames[next as usize].route();
        self.router.set(route)
    }

    /// Navigate to a path. Returns `true` if the route changed.
    pub fn navigate(&mut self, path: &str) -> bool {
        self.router.navigate(path)
    }

    /// The router.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Portal window under a screen position (physical pixels).
    #[must_use]
    pub fn pick(&self, x: f32, y: f32) -> Option<usize> {
        let (origin, dir) = self
            .controller
            .screen_to_ray(Vec2::new(x, y), self.viewport);
        let frame_options = &self.options.frame;
        pick_nearest(
            origin,
            dir,
            self.frames.iter().map(|f| WindowRect {
                transform: self.graph.world_matrix(f.window_node()),
                width: frame_options.window_width,
                height: frame_options.window_height,
                corner_radius: frame_options.corner_radius,
            }),
        )
    }

    /// Set the viewport size in physical pixels.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = UVec2::new(width, height);
        self.controller.resize(width, height);
    }

    /// Flatten the current state into a render list.
    #[must_use]
    pub fn describe(&self) -> SceneDescription {
        let lighting = &self.options.lighting;
        let post = &self.options.post_processing;
        SceneDescription {
            background: self.background,
            camera: self.controller.camera,
            ambient: AmbientLight {
                intensity: lighting.ambient,
            },
            directional: DirectionalLight {
                position: Vec3::from(lighting.directional_position),
                intensity: lighting.directional_intensity,
            },
            portals: self
                .frames
                .iter()
                .map(|f| f.describe(&self.graph, &self.options.frame))
                .collect(),
            bloom: post.bloom_enabled.then_some(BloomPass {
                luminance_threshold: post.bloom_luminance_threshold,
                luminance_smoothing: post.bloom_luminance_smoothing,
                height: post.bloom_height,
            }),
            loading: self.indicator.is_visible(),
            loading_progress: self.indicator.progress(),
            hint: self.router.hint(),
        }
    }

    /// Portals in layout order.
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Camera controller.
    #[must_use]
    pub fn camera(&self) -> &CameraController {
        &self.controller
    }

    /// Scene graph.
    #[must_use]
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Whether any model is still loading.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.gate.is_loading()
    }

    /// Whether the pointer cursor should be shown.
    #[must_use]
    pub fn cursor_is_pointer(&self) -> bool {
        self.frames.iter().any(Frame::is_hovered)
    }

    /// Options the gallery was built with.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{mpsc, Mutex};
    use std::time::Duration;

    use super::*;
    use crate::assets::{AssetError, LoadedModel};
    use crate::camera::CameraPose;

    const DT: f32 = 1.0 / 60.0;

    struct InstantLoader;

    impl AssetLoader for InstantLoader {
        fn load(&self, _path: &str) -> Result<LoadedModel, AssetError> {
            Ok(LoadedModel::default())
        }
    }

    struct FailingLoader;

    impl AssetLoader for FailingLoader {
        fn load(&self, path: &str) -> Result<LoadedModel, AssetError> {
            Err(AssetError::NotFound(path.into()))
        }
    }

    /// Never answers until the test drops its sender.
    struct StalledLoader(Mutex<mpsc::Receiver<()>>);

    impl AssetLoader for StalledLoader {
        fn load(&self, path: &str) -> Result<LoadedModel, AssetError> {
            if let Ok(rx) = self.0.lock() {
                let _ = rx.recv();
            }
            Err(AssetError::NotFound(path.into()))
        }
    }

    fn gallery() -> Gallery {
        Gallery::new(
            GalleryConfig::default(),
            Options::default(),
            Arc::new(InstantLoader),
        )
        .unwrap()
    }

    fn run(gallery: &mut Gallery, seconds: f32) {
        let frames = (seconds / DT) as usize;
        for _ in 0..frames {
            gallery.tick(DT);
        }
    }

    fn blends(gallery: &Gallery) -> Vec<f32> {
        gallery.frames().iter().map(|f| f.blend().value()).collect()
    }

    fn default_pose() -> CameraPose {
        CameraPose {
            eye: Vec3::new(0.0, 0.0, 2.0),
            focus: Vec3::ZERO,
        }
    }

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut config = GalleryConfig::default();
        config.portals[1].id = "03".to_owned();
        let result = Gallery::new(config, Options::default(), Arc::new(InstantLoader));
        assert!(matches!(result, Err(VitrineError::DuplicatePortalId(_))));
    }

    #[test]
    fn window_nodes_are_named_after_ids() {
        let g = gallery();
        for frame in g.frames() {
            assert_eq!(g.graph().find_by_name(frame.id()), Some(frame.window_node()));
        }
    }

    #[test]
    fn overview_converges_to_default() {
        let mut g = gallery();
        run(&mut g, 2.0);
        assert_eq!(blends(&g), [0.0, 0.0, 0.0]);
        assert_eq!(g.camera().pose(), default_pose());
        assert_eq!(g.describe().hint, "double click to enter portal");
    }

    #[test]
    fn focusing_02_blends_it_in_and_moves_camera() {
        let mut g = gallery();
        assert!(g.navigate("/item/02"));
        run(&mut g, 3.0);
        assert_eq!(blends(&g), [0.0, 1.0, 0.0]);

        let window = g.graph().find_by_name("02").unwrap();
        let group = g.graph().world_matrix(g.graph().parent(window).unwrap());
        let expected_eye = group.transform_point3(Vec3::new(0.0, GOLDEN_RATIO * 0.75, 0.25));
        let expected_focus = group.transform_point3(Vec3::new(0.0, GOLDEN_RATIO / 2.0, -2.0));
        let pose = g.camera().pose();
        assert!(close(pose.eye, expected_eye), "eye {:?}", pose.eye);
        assert!(close(pose.focus, expected_focus), "focus {:?}", pose.focus);
        assert_eq!(g.describe().hint, "< back");
    }

    #[test]
    fn unknown_id_changes_nothing() {
        let mut g = gallery();
        let _ = g.navigate("/item/99");
        run(&mut g, 2.0);
        assert_eq!(blends(&g), [0.0, 0.0, 0.0]);
        assert_eq!(g.camera().target_pose(), default_pose());
        assert_eq!(g.camera().pose(), default_pose());
    }

    #[test]
    fn never_resolving_load_keeps_gate_open() {
        let (_hold, rx) = mpsc::channel::<()>();
        let mut g = Gallery::new(
            GalleryConfig::default(),
            Options::default(),
            Arc::new(StalledLoader(Mutex::new(rx))),
        )
        .unwrap();
        for _ in 0..30 {
            g.tick(DT);
            std::thread::sleep(Duration::from_millis(1));
        }
        assert!(g.is_loading());
        assert!(g.describe().loading);
        assert!(g.frames().iter().all(|f| !f.has_model()));
    }

    #[test]
    fn loads_settle_and_models_attach() {
        let mut g = gallery();
        for _ in 0..500 {
            g.tick(DT);
            if !g.is_loading() {
                break;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        g.tick(DT);
        assert!(!g.is_loading());
        assert!(!g.describe().loading);
        assert!(g.frames().iter().all(Frame::has_model));
    }

    #[test]
    fn only_window_nodes_carry_names() {
        let mut g = gallery();
        let _ = g.navigate("/item/gallery");
        run(&mut g, 2.0);
        assert_eq!(g.camera().target_pose(), default_pose());
        assert_eq!(g.camera().pose(), default_pose());

        let mut config = GalleryConfig::default();
        config.portals[2].id = "gallery".to_owned();
        let g = Gallery::new(config, Options::default(), Arc::new(InstantLoader)).unwrap();
        assert_eq!(
            g.graph().find_by_name("gallery"),
            Some(g.frames()[2].window_node())
        );
    }

    #[test]
    fn failed_loads_leave_portals_empty() {
        let mut g = Gallery::new(
            GalleryConfig::default(),
            Options::default(),
            Arc::new(FailingLoader),
        )
        .unwrap();
        for _ in 0..500 {
            g.tick(DT);
            if !g.is_loading() {
                break;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        g.tick(DT);
        assert!(!g.is_loading());
        assert!(g.frames().iter().all(Frame::is_missing_model));
        assert!(g.frames().iter().all(|f| !f.has_model()));
        let scene = g.describe();
        assert!(!scene.loading);
        assert!(scene.portals.iter().all(|p| p.model.is_none()));
    }

    #[test]
    fn round_trip_restores_default_pose_exactly() {
        let mut g = gallery();
        let _ = g.execute(GalleryCommand::Navigate {
            path: "/item/02".to_owned(),
        });
        run(&mut g, 1.0);
        assert_ne!(g.camera().pose(), default_pose());
        let _ = g.execute(GalleryCommand::Back);
        run(&mut g, 5.0);
        assert_eq!(g.camera().target_pose(), default_pose());
        assert_eq!(g.camera().pose(), default_pose());
    }

    #[test]
    fn double_click_navigates_to_portal() {
        let mut g = gallery();
        assert!(g.execute(GalleryCommand::DoubleClick { portal: 2 }));
        assert_eq!(g.router().active_id(), Some("03"));
        assert!(!g.execute(GalleryCommand::DoubleClick { portal: 7 }));
    }

    #[test]
    fn hover_and_click_drive_cursor() {
        let mut g = gallery();
        let _ = g.execute(GalleryCommand::Hover { portal: Some(1) });
        assert!(g.cursor_is_pointer());
        let _ = g.execute(GalleryCommand::Hover { portal: None });
        assert!(!g.cursor_is_pointer());
        let _ = g.execute(GalleryCommand::Click { portal: 0 });
        assert!(g.frames()[0].is_hovered());
    }

    #[test]
    fn next_and_previous_wrap() {
        let mut g = gallery();
        let _ = g.execute(GalleryCommand::PreviousPortal);
        assert_eq!(g.router().active_id(), Some("03"));
        let _ = g.execute(GalleryCommand::NextPortal);
        assert_eq!(g.router().active_id(), Some("01"));
        let _ = g.execute(GalleryCommand::NextPortal);
        assert_eq!(g.router().active_id(), Some("02"));
    }

    #[test]
    fn center_of_screen_picks_middle_portal() {
        let mut g = gallery();
        g.set_viewport(800, 600);
        // Window 02 sits at the origin; its center is at y = φ/2 - 0.8.
        let center = g.graph().local_to_world(g.frames()[1].window_node(), Vec3::ZERO);
        let clip = g.camera().camera.build_matrix().project_point3(center);
        let x = (clip.x + 1.0) * 0.5 * 800.0;
        let y = (1.0 - clip.y) * 0.5 * 600.0;
        assert_eq!(g.pick(x, y), Some(1));
        assert_eq!(g.pick(2.0, 2.0), None);
    }

    #[test]
    fn auto_rotate_advances_per_frame() {
        let mut g = gallery();
        for _ in 0..500 {
            g.tick(DT);
            if !g.is_loading() {
                break;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        let before = g.describe().portals[1].model.as_ref().unwrap().transform;
        g.tick(DT);
        let after = g.describe().portals[1].model.as_ref().unwrap().transform;
        assert_ne!(before, after);
        // Portal 01 does not spin.
        let a = g.describe().portals[0].model.as_ref().unwrap().transform;
        g.tick(DT);
        let b = g.describe().portals[0].model.as_ref().unwrap().transform;
        assert_eq!(a, b);
    }
}
