//! Bevy systems
//!
//! This module contains all the systems that operate on entities
//! and resources in the Bevy ECS.

pub mod actions;
pub mod animation;
pub mod annotation;
pub mod camera;
pub mod scene;

pub use actions::apply_ui_actions;
pub use animation::spin_bodies;
pub use annotation::{
    load_glyph_font, replay_saved_annotations, resolve_anchor, resolve_pending_annotations,
};
pub use camera::{drive_camera_transition, update_camera_from_input, view_hotkeys};
pub use scene::{build_solar_system, follow_camera_with_backdrop, spawn_viewport};
