//! A single picture frame: a rounded card holding an image.

use crate::graph::NodeId;
use crate::identity::FrameId;

/// Per-frame widget state.
#[derive(Debug, Clone)]
pub struct Frame {
    slot: usize,
    source: Option<String>,
    id: Option<FrameId>,
    group: NodeId,
    card: NodeId,
    image: Option<NodeId>,
    phase: f32,
    hovered: bool,
}

impl Frame {
    /// Create frame state with a random breathing phase.
    pub fn new(
        slot: usize,
        source: Option<String>,
        group: NodeId,
        card: NodeId,
        image: Option<NodeId>,
    ) -> Self {
        Self::with_phase(slot, source, group, card, image, fastrand::f32())
    }

    pub fn with_phase(
        slot: usize,
        source: Option<String>,
        group: NodeId,
        card: NodeId,
        image: Option<NodeId>,
        phase: f32,
    ) -> Self {
        let id = source.as_deref().map(FrameId::from_source);
        Self {
            slot,
            source,
            id,
            group,
            card,
            image,
            phase,
            hovered: false,
        }
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// `None` for an unfilled slot.
    pub fn id(&self) -> Option<FrameId> {
        self.id
    }

    /// Slot group holding the card. The camera focuses relative to this node.
    pub fn group(&self) -> NodeId {
        self.group
    }

    /// Named, pickable card mesh.
    pub fn card(&self) -> NodeId {
        self.card
    }

    pub fn image(&self) -> Option<NodeId> {
        self.image
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Returns true if the hover state changed.
    pub fn set_hovered(&mut self, hovered: bool) -> bool {
        let changed = self.hovered != hovered;
        self.hovered = hovered;
        changed
    }

    /// Image zoom at `elapsed` seconds. Always within `[1.5, 2.5]`.
    pub fn zoom(&self, elapsed: f32) -> f32 {
        breathing_zoom(self.phase, elapsed)
    }
}

/// `2 + sin(phase * 1000 + t / 3) / 2`
pub fn breathing_zoom(phase: f32, elapsed: f32) -> f32 {
    2.0 + (phase * 1000.0 + elapsed / 3.0).sin() / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::SceneGraph;

    fn frame(phase: f32) -> Frame {
        let graph = SceneGraph::new();
        Frame::with_phase(0, Some("a.jpg".into()), graph.root(), graph.root(), None, phase)
    }

    #[test]
    fn test_zoom_bounds() {
        for phase in [0.0, 0.123, 0.5, 0.999] {
            let f = frame(phase);
            let mut t = 0.0;
            while t < 200.0 {
                let z = f.zoom(t);
                assert!((1.5..=2.5).contains(&z), "zoom {z} out of range at t={t}");
                t += 0.37;
            }
        }
        assert!(breathing_zoom(0.7, 1.0e7) >= 1.5);
    }

    #[test]
    fn test_zoom_breathes_slowly() {
        let f = frame(0.0);
        assert!((f.zoom(0.0) - 2.0).abs() < 1e-6);
        // quarter period of sin(t/3) is 3π/2 seconds
        assert!((f.zoom(3.0 * std::f32::consts::FRAC_PI_2) - 2.5).abs() < 1e-4);
    }

    #[test]
    fn test_phase_desynchronizes() {
        assert!((frame(0.1).zoom(0.0) - frame(0.2).zoom(0.0)).abs() > 1e-3);
    }

    #[test]
    fn test_hover_toggle_reports_change() {
        let mut f = frame(0.0);
        assert!(f.set_hovered(true));
        assert!(!f.set_hovered(true));
        assert!(f.is_hovered());
        assert!(f.set_hovered(false));
    }

    #[test]
    fn test_id_derived_from_source() {
        let f = frame(0.0);
        assert_eq!(f.id(), Some(FrameId::from_source("a.jpg")));
        let graph = SceneGraph::new();
        let empty = Frame::new(3, None, graph.root(), graph.root(), None);
        assert_eq!(empty.id(), None);
        assert!((0.0..1.0).contains(&empty.phase()));
    }
}
