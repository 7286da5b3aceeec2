//! Hand-placed arrangement of the seven frames.

use crate::color::Color;
use crate::frame::Frame;
use crate::graph::{Mesh, Node, NodeId, SceneGraph, Transform};
use crate::identity::FrameId;
use crate::material::{BasicMaterial, Geometry, Material, StandardMaterial};
use glam::{Quat, Vec3};
use std::f32::consts::PI;
use tracing::warn;

pub const GOLDEN_RATIO: f32 = 1.618_034;

/// Number of frame slots on the wall.
pub const SLOT_COUNT: usize = 7;

/// Position and Y rotation of one slot, relative to the frames group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub position: Vec3,
    pub rotation_y: f32,
}

const fn slot(x: f32, z: f32, rotation_y: f32) -> Slot {
    Slot {
        position: Vec3::new(x, 0.0, z),
        rotation_y,
    }
}

/// The curated wall: one centre frame, two behind it, two on each wing.
pub const SLOTS: [Slot; SLOT_COUNT] = [
    slot(0.0, 1.25, 0.0),
    slot(-0.8, -0.5, 0.0),
    slot(0.8, -0.5, 0.0),
    slot(-1.75, 1.0, PI / 2.5),
    slot(-2.2, 2.5, PI / 2.5),
    slot(1.75, 1.0, -PI / 2.5),
    slot(2.2, 2.5, -PI / 2.5),
];

/// Card mesh placement inside its slot group.
pub fn card_transform() -> Transform {
    Transform::from_translation(Vec3::new(0.0, GOLDEN_RATIO / 2.0, 0.0))
        .with_scale(Vec3::new(1.0, GOLDEN_RATIO, 0.05))
}

pub fn card_material() -> StandardMaterial {
    StandardMaterial {
        color: Color::from_srgb(0x15, 0x15, 0x15),
        metalness: 0.8,
        roughness: 0.5,
        env_map_intensity: 2.0,
    }
}

/// Mount one frame per slot under `parent`, assigning `sources` by index.
///
/// Missing sources leave the slot unfilled. Extra sources are ignored.
pub fn mount_frames(graph: &mut SceneGraph, parent: NodeId, sources: &[String]) -> Vec<Frame> {
    if sources.len() > SLOT_COUNT {
        warn!(
            "{} images supplied but only {} slots exist; ignoring the rest",
            sources.len(),
            SLOT_COUNT
        );
    }

    SLOTS
        .iter()
        .enumerate()
        .map(|(index, slot)| mount_frame(graph, parent, index, slot, sources.get(index).cloned()))
        .collect()
}

fn mount_frame(
    graph: &mut SceneGraph,
    parent: NodeId,
    index: usize,
    slot: &Slot,
    source: Option<String>,
) -> Frame {
    let group = graph.add(
        parent,
        Node::group(
            Transform::from_translation(slot.position)
                .with_rotation(Quat::from_rotation_y(slot.rotation_y)),
        ),
    );

    let mut card = Node::mesh(
        card_transform(),
        Mesh {
            geometry: Geometry::RoundedBox {
                radius: 0.01,
                smoothness: 4,
            },
            material: Material::Standard(card_material()),
            pickable: source.is_some(),
        },
    );
    if let Some(src) = source.as_deref() {
        card = card.with_name(FrameId::from_source(src).to_string());
    }
    let card = graph.add(group, card);

    graph.add(
        card,
        Node::mesh(
            Transform::from_translation(Vec3::new(0.0, 0.0, 0.2))
                .with_scale(Vec3::new(0.9, 0.93, 0.9)),
            Mesh {
                geometry: Geometry::Box,
                material: Material::Basic(BasicMaterial {
                    color: Color::WHITE,
                    tone_mapped: false,
                }),
                pickable: false,
            },
        ),
    );

    let image = source.as_ref().map(|_| {
        graph.add(
            card,
            Node::mesh(
                Transform::from_translation(Vec3::new(0.0, 0.0, 0.7))
                    .with_scale(Vec3::new(0.875, 0.91, 0.875)),
                Mesh {
                    geometry: Geometry::Plane,
                    material: Material::Image { slot: index },
                    pickable: false,
                },
            ),
        )
    });

    Frame::new(index, source, group, card, image)
}
