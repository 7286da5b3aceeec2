//! Turns the current route into a camera target, and clicks into routes.

use crate::camera::CameraPose;
use crate::graph::{NodeId, SceneGraph};
use crate::layout::GOLDEN_RATIO;
use crate::route::Route;
use glam::{Quat, Vec3};

/// Camera position relative to the selected frame's slot group: centred on
/// the card, slightly in front of it.
pub const FOCUS_OFFSET: Vec3 = Vec3::new(0.0, GOLDEN_RATIO / 2.0, 1.25);

/// Camera position when nothing is selected.
pub const OVERVIEW_POSITION: Vec3 = Vec3::new(0.0, 0.0, 5.5);

/// Result of resolving the selection for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    /// Node whose name matched the selected identifier.
    pub node: Option<NodeId>,
    pub target: CameraPose,
}

/// Looks up the selected frame under a subtree and derives the camera target.
#[derive(Debug, Clone, Copy)]
pub struct SelectionController {
    frames: NodeId,
}

impl SelectionController {
    /// `frames` is the subtree searched for selected nodes.
    pub fn new(frames: NodeId) -> Self {
        Self { frames }
    }

    pub fn overview() -> CameraPose {
        CameraPose::new(OVERVIEW_POSITION, Quat::IDENTITY)
    }

    /// Resolve `selected` against the current graph.
    ///
    /// An id that names no node resolves to the overview pose.
    pub fn resolve(&self, graph: &SceneGraph, selected: Option<&str>) -> Selection {
        let node = selected.and_then(|id| graph.find_by_name(self.frames, id));
        let target = node
            .and_then(|n| graph.node(n).parent())
            .map(|slot| {
                CameraPose::new(
                    graph.local_to_world(slot, FOCUS_OFFSET),
                    graph.world_rotation(slot),
                )
            })
            .unwrap_or_else(Self::overview);
        Selection { node, target }
    }

    /// Route to navigate to after a click.
    ///
    /// `hit` is the nearest pickable node under the pointer, or `None` when
    /// the click missed everything. Clicking the selected node deselects it.
    pub fn click(&self, graph: &SceneGraph, selection: &Selection, hit: Option<NodeId>) -> Route {
        match hit {
            Some(node) if selection.node == Some(node) => Route::Root,
            Some(node) => match graph.node(node).name.as_deref() {
                Some(name) => Route::Item(name.to_string()),
                None => Route::Root,
            },
            None => Route::Root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::{SceneSettings, compose};
    use crate::identity::FrameId;
    use crate::layout::{SLOTS, mount_frames};

    fn setup() -> (SceneGraph, SelectionController, Vec<crate::frame::Frame>) {
        let mut graph = SceneGraph::new();
        let stage = compose(&mut graph, &SceneSettings::default());
        let sources: Vec<String> = (0..7).map(|i| format!("img{i}.jpg")).collect();
        let frames = mount_frames(&mut graph, stage.frames, &sources);
        (graph, SelectionController::new(stage.frames), frames)
    }

    #[test]
    fn test_selected_frame_target() {
        let (graph, controller, frames) = setup();
        for (k, frame) in frames.iter().enumerate() {
            let id = FrameId::from_source(&format!("img{k}.jpg")).to_string();
            let sel = controller.resolve(&graph, Some(&id));
            assert_eq!(sel.node, Some(frame.card()));

            let expected = graph.local_to_world(frame.group(), FOCUS_OFFSET);
            assert!((sel.target.position - expected).length() < 1e-5);

            // slot rotation composed with the unrotated stage
            let rot = Quat::from_rotation_y(SLOTS[k].rotation_y);
            assert!(sel.target.orientation.angle_between(rot) < 1e-3);
        }
    }

    #[test]
    fn test_centre_frame_target_in_world_space() {
        let (graph, controller, frames) = setup();
        let name = graph.node(frames[0].card()).name.clone().unwrap();
        let sel = controller.resolve(&graph, Some(&name));
        // slot (0, 0, 1.25) + offset (0, φ/2, 1.25) + stage (0, -0.5, 0)
        let expected = Vec3::new(0.0, GOLDEN_RATIO / 2.0 - 0.5, 2.5);
        assert!((sel.target.position - expected).length() < 1e-5);
    }

    #[test]
    fn test_unknown_or_missing_selection_uses_overview() {
        let (graph, controller, _) = setup();
        for selected in [None, Some("not-a-frame"), Some("")] {
            let sel = controller.resolve(&graph, selected);
            assert_eq!(sel.node, None);
            assert_eq!(sel.target, SelectionController::overview());
        }
    }

    #[test]
    fn test_click_toggles_selection() {
        let (graph, controller, frames) = setup();
        let a = frames[1].card();
        let b = frames[2].card();
        let name_a = graph.node(a).name.clone().unwrap();

        let none = controller.resolve(&graph, None);
        assert_eq!(controller.click(&graph, &none, Some(a)), Route::Item(name_a.clone()));

        let selected_a = controller.resolve(&graph, Some(&name_a));
        assert_eq!(controller.click(&graph, &selected_a, Some(a)), Route::Root);

        let name_b = graph.node(b).name.clone().unwrap();
        assert_eq!(controller.click(&graph, &selected_a, Some(b)), Route::Item(name_b));

        assert_eq!(controller.click(&graph, &selected_a, None), Route::Root);
    }
}
