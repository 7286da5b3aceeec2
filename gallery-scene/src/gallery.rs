//! The gallery as a whole: scene, frames, navigation and camera, advanced
//! once per rendered tick.

use crate::camera::{CameraPose, CameraRig};
use crate::composer::{SceneSettings, Stage, compose};
use crate::config::GalleryConfig;
use crate::frame::Frame;
use crate::graph::{NodeId, SceneGraph};
use crate::layout::mount_frames;
use crate::material::{Geometry, Material};
use crate::picking::{Ray, pick};
use crate::route::{Route, Router};
use crate::selection::{Selection, SelectionController};
use glam::{Mat4, Vec3};
use tracing::{debug, info};

/// Cursor the host window should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Default,
    Pointer,
}

/// One mesh to draw this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub node: NodeId,
    pub world: Mat4,
    pub geometry: Geometry,
    pub material: Material,
}

pub struct Gallery {
    graph: SceneGraph,
    settings: SceneSettings,
    stage: Stage,
    frames: Vec<Frame>,
    router: Router,
    controller: SelectionController,
    selection: Selection,
    rig: CameraRig,
    elapsed: f32,
}

impl Gallery {
    pub fn new(sources: &[String], initial: Route, camera_start: Vec3, damping: f32) -> Self {
        let settings = SceneSettings::default();
        let mut graph = SceneGraph::new();
        let stage = compose(&mut graph, &settings);
        let frames = mount_frames(&mut graph, stage.frames, sources);
        let controller = SelectionController::new(stage.frames);
        let router = Router::new(initial);
        let selection = controller.resolve(&graph, router.selected());

        info!(
            "Gallery composed: {} frames, {} nodes, route {}",
            frames.iter().filter(|f| f.id().is_some()).count(),
            graph.len(),
            router.current()
        );

        Self {
            graph,
            settings,
            stage,
            frames,
            router,
            controller,
            selection,
            rig: CameraRig::new(camera_start, damping),
            elapsed: 0.0,
        }
    }

    pub fn from_config(config: &GalleryConfig) -> Self {
        Self::new(
            &config.images,
            Route::parse(&config.initial_route),
            config.camera.start_position,
            config.camera.damping,
        )
    }

    /// Advance one rendered tick of `dt` seconds.
    ///
    /// The selection is resolved fresh every tick so it follows both route
    /// and graph changes.
    pub fn tick(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.elapsed += dt;
        self.selection = self.controller.resolve(&self.graph, self.router.selected());
        self.rig.step(&self.selection.target, dt);
    }

    /// Update hover state from the pointer ray. `None` means the pointer
    /// left the canvas. Returns the cursor to show.
    pub fn pointer_moved(&mut self, ray: Option<&Ray>) -> Cursor {
        let hit = ray.and_then(|r| pick(&self.graph, r)).map(|h| h.node);
        for frame in &mut self.frames {
            if frame.set_hovered(hit == Some(frame.card())) {
                debug!(slot = frame.slot(), hovered = frame.is_hovered(), "hover");
            }
        }
        self.cursor()
    }

    /// Handle a click along `ray` and navigate accordingly.
    pub fn click(&mut self, ray: &Ray) -> &Route {
        self.selection = self.controller.resolve(&self.graph, self.router.selected());
        let hit = pick(&self.graph, ray).map(|h| h.node);
        let route = self.controller.click(&self.graph, &self.selection, hit);
        self.router.navigate(route);
        self.router.current()
    }

    pub fn navigate(&mut self, route: Route) {
        self.router.navigate(route);
    }

    pub fn back(&mut self) -> bool {
        self.router.back()
    }

    pub fn forward(&mut self) -> bool {
        self.router.forward()
    }

    pub fn cursor(&self) -> Cursor {
        if self.frames.iter().any(Frame::is_hovered) {
            Cursor::Pointer
        } else {
            Cursor::Default
        }
    }

    pub fn route(&self) -> &Route {
        self.router.current()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn camera(&self) -> CameraPose {
        self.rig.pose()
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.rig.view_matrix()
    }

    /// Seconds since the gallery started ticking.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Current image zoom of the frame in `slot`.
    pub fn zoom(&self, slot: usize) -> Option<f32> {
        self.frames.get(slot).map(|f| f.zoom(self.elapsed))
    }

    /// Every mesh node with its world matrix, in graph order.
    pub fn draw_list(&self) -> Vec<DrawItem> {
        let worlds = self.graph.world_matrices();
        self.graph
            .ids()
            .filter_map(|id| {
                self.graph.node(id).as_mesh().map(|mesh| DrawItem {
                    node: id,
                    world: worlds[id.index()],
                    geometry: mesh.geometry,
                    material: mesh.material,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{Projection, ray_from_ndc};
    use crate::identity::FrameId;
    use crate::selection::OVERVIEW_POSITION;
    use glam::Vec2;

    fn sources() -> Vec<String> {
        (0..7).map(|i| format!("photos/{i}.jpg")).collect()
    }

    fn gallery() -> Gallery {
        Gallery::new(&sources(), Route::Root, Vec3::new(0.0, 0.0, 100.0), 3.0)
    }

    /// Ray from the current camera through the centre of the screen.
    fn centre_ray(g: &Gallery) -> Ray {
        let proj = Projection::new(1280, 720, 70f32.to_radians(), 0.1, 1000.0);
        ray_from_ndc(g.view_matrix(), proj.matrix(), Vec2::ZERO)
    }

    fn settle(g: &mut Gallery) {
        for _ in 0..600 {
            g.tick(1.0 / 60.0);
        }
    }

    #[test]
    fn test_camera_flies_in_to_overview() {
        let mut g = gallery();
        settle(&mut g);
        assert!((g.camera().position - OVERVIEW_POSITION).length() < 1e-3);
    }

    #[test]
    fn test_click_selects_then_deselects_centre_frame() {
        let mut g = gallery();
        settle(&mut g);

        // from the overview the screen centre is over the middle card
        let ray = centre_ray(&g);
        let id = FrameId::from_source("photos/0.jpg");
        assert_eq!(g.click(&ray), &Route::item(&id));

        g.tick(1.0 / 60.0);
        assert_eq!(g.selection().node, Some(g.frames()[0].card()));

        settle(&mut g);
        let ray = centre_ray(&g);
        assert_eq!(g.click(&ray), &Route::Root);
        assert!(g.back());
        assert_eq!(g.route(), &Route::item(&id));
    }

    #[test]
    fn test_selection_follows_renamed_card() {
        let id = FrameId::from_source("photos/2.jpg");
        let mut g = Gallery::new(&sources(), Route::item(&id), OVERVIEW_POSITION, 3.0);
        g.tick(1.0 / 60.0);
        let card = g.frames()[2].card();
        assert_eq!(g.selection().node, Some(card));
        assert_ne!(g.selection().target.position, OVERVIEW_POSITION);

        g.graph.node_mut(card).name = Some("renamed".into());
        g.tick(1.0 / 60.0);
        assert_eq!(g.selection().node, None);
        assert_eq!(g.selection().target.position, OVERVIEW_POSITION);
    }

    #[test]
    fn test_click_on_empty_space_clears() {
        let mut g = Gallery::new(
            &sources(),
            Route::Item(FrameId::from_source("photos/3.jpg").to_string()),
            OVERVIEW_POSITION,
            3.0,
        );
        let up = Ray::new(Vec3::new(0.0, 5.0, 5.0), Vec3::Y);
        assert_eq!(g.click(&up), &Route::Root);
    }

    #[test]
    fn test_hover_drives_cursor() {
        let mut g = gallery();
        settle(&mut g);
        let ray = centre_ray(&g);
        assert_eq!(g.pointer_moved(Some(&ray)), Cursor::Pointer);
        assert!(g.frames()[0].is_hovered());
        assert_eq!(g.pointer_moved(None), Cursor::Default);
        assert!(!g.frames().iter().any(Frame::is_hovered));
    }

    #[test]
    fn test_draw_list_contains_floor_cards_mats_and_images() {
        let g = Gallery::new(&sources()[..5], Route::Root, OVERVIEW_POSITION, 3.0);
        let items = g.draw_list();
        let count = |f: fn(&Material) -> bool| items.iter().filter(|i| f(&i.material)).count();
        assert_eq!(count(|m| matches!(m, Material::Reflector(_))), 1);
        assert_eq!(count(|m| matches!(m, Material::Standard(_))), 7);
        assert_eq!(count(|m| matches!(m, Material::Basic(_))), 7);
        assert_eq!(count(|m| matches!(m, Material::Image { .. })), 5);
    }

    #[test]
    fn test_zoom_follows_clock() {
        let mut g = gallery();
        let before = g.zoom(0).unwrap();
        g.tick(1.0);
        let after = g.zoom(0).unwrap();
        assert!((1.5..=2.5).contains(&after));
        assert_ne!(before, after);
        assert!(g.zoom(7).is_none());
    }
}
