//! Gallery Scene Crate
//!
//! Scene graph, frame layout, navigation and camera logic for the 3D gallery.
//! This crate is GPU-agnostic: it decides what is drawn where, and the GPU
//! crate decides how.

pub mod camera;
pub mod color;
pub mod composer;
pub mod config;
pub mod frame;
pub mod gallery;
pub mod graph;
pub mod identity;
pub mod layout;
pub mod material;
pub mod picking;
pub mod route;
pub mod selection;

pub use camera::{CameraPose, CameraRig, Projection, ray_from_ndc};
pub use color::Color;
pub use composer::{EnvironmentLighting, EnvironmentPreset, Fog, SceneSettings, Stage};
pub use config::{CameraConfig, ConfigError, GalleryConfig};
pub use frame::Frame;
pub use gallery::{Cursor, DrawItem, Gallery};
pub use graph::{Mesh, Node, NodeId, NodeKind, SceneGraph, Transform};
pub use identity::FrameId;
pub use layout::{GOLDEN_RATIO, SLOT_COUNT};
pub use material::{BasicMaterial, Geometry, Material, ReflectorMaterial, StandardMaterial};
pub use picking::{Hit, Ray};
pub use route::{Route, Router};
pub use selection::{Selection, SelectionController};
