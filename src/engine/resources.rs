//! Bevy resource definitions
//!
//! This module contains all global resources used by Bevy systems.
//! Resources are singleton data that can be accessed by any system.

use bevy::prelude::*;
use crossbeam_channel::Receiver;
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

use crate::annotation::Annotation;
use crate::config::camera::{
    FRONT_VIEW, INITIAL_POSITION, SIDE_VIEW, TOP_VIEW, TRANSITION_SECS,
};
use crate::engine::plugins::typeface::TypefaceFont;
use crate::storage::AnnotationLog;
use crate::ui_bridge::UiAction;

// =============================================================================
// Camera Views
// =============================================================================

/// The fixed viewpoints the camera can be sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraView {
    Top,
    Front,
    Side,
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown view `{0}`, expected top, front or side")]
pub struct UnknownView(pub String);

impl CameraView {
    pub const ALL: [CameraView; 3] = [CameraView::Top, CameraView::Front, CameraView::Side];

    pub fn name(self) -> &'static str {
        match self {
            CameraView::Top => "top",
            CameraView::Front => "front",
            CameraView::Side => "side",
        }
    }

    /// Camera position for this view; the camera always looks at the origin
    pub fn target(self) -> Vec3 {
        match self {
            CameraView::Top => TOP_VIEW,
            CameraView::Front => FRONT_VIEW,
            CameraView::Side => SIDE_VIEW,
        }
    }
}

impl FromStr for CameraView {
    type Err = UnknownView;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        CameraView::ALL
            .into_iter()
            .find(|view| view.name() == name)
            .ok_or_else(|| UnknownView(name.to_string()))
    }
}

// =============================================================================
// Camera Control
// =============================================================================

/// Progress of the single in-flight camera movement
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraTransition {
    Idle,
    Transitioning {
        from: Vec3,
        target: Vec3,
        /// Seconds since the transition started
        elapsed: f32,
    },
}

/// Camera view requests and the transition they drive
///
/// Requests only record a target; the frame loop picks it up and owns the
/// actual camera movement. A newer request replaces an older one.
#[derive(Resource, Debug)]
pub struct CameraRig {
    pending: Option<Vec3>,
    transition: CameraTransition,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            pending: Some(CameraView::Top.target()),
            transition: CameraTransition::Idle,
        }
    }
}

impl CameraRig {
    /// Ask for a view; takes effect on the next frame
    pub fn request(&mut self, view: CameraView) {
        self.pending = Some(view.target());
    }

    pub fn pending(&self) -> Option<Vec3> {
        self.pending
    }

    pub fn transition(&self) -> CameraTransition {
        self.transition
    }

    /// Whether the camera is being moved or about to be
    pub fn is_busy(&self) -> bool {
        self.pending.is_some() || self.transition != CameraTransition::Idle
    }

    /// Step the transition by `dt` seconds from the camera at `current`.
    ///
    /// A pending request restarts the transition from `current`. Returns the
    /// new camera position while a transition is running.
    pub fn advance(&mut self, current: Vec3, dt: f32) -> Option<Vec3> {
        if let Some(target) = self.pending.take() {
            self.transition = CameraTransition::Transitioning {
                from: current,
                target,
                elapsed: 0.0,
            };
        }

        let CameraTransition::Transitioning {
            from,
            target,
            elapsed,
        } = self.transition
        else {
            return None;
        };

        let elapsed = elapsed + dt;
        let t = (elapsed / TRANSITION_SECS).min(1.0);
        if t >= 1.0 {
            self.transition = CameraTransition::Idle;
            return Some(target);
        }
        self.transition = CameraTransition::Transitioning {
            from,
            target,
            elapsed,
        };
        Some(from.lerp(target, ease_out(t)))
    }
}

/// Quadratic ease-out: fast start, gentle arrival
fn ease_out(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Orbit camera state for spherical coordinate camera control
#[derive(Resource, Debug)]
pub struct OrbitCameraState {
    /// Horizontal rotation angle (radians)
    pub yaw: f32,
    /// Vertical rotation angle (radians)
    pub pitch: f32,
    /// Distance from the camera to the center point
    pub distance: f32,
    /// The point the camera orbits around
    pub center: Vec3,
}

impl Default for OrbitCameraState {
    fn default() -> Self {
        let mut state = Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: 0.0,
            center: Vec3::ZERO,
        };
        state.sync_to(INITIAL_POSITION);
        state
    }
}

impl OrbitCameraState {
    /// Camera position described by the current angles and distance
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.center + Vec3::new(x, y, z)
    }

    /// Re-derive the angles and distance from a camera placed elsewhere
    pub fn sync_to(&mut self, position: Vec3) {
        let offset = position - self.center;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            return;
        }
        self.distance = distance;
        self.yaw = offset.x.atan2(offset.z);
        self.pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
    }
}

// =============================================================================
// Scene Graph
// =============================================================================

/// Entities making up one orbiting body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyHandles {
    pub pivot: Entity,
    pub mesh: Entity,
}

/// Name lookup into the body hierarchy, built once at startup
#[derive(Resource, Debug)]
pub struct BodyRegistry {
    center: Entity,
    bodies: HashMap<&'static str, BodyHandles>,
}

impl BodyRegistry {
    pub fn new(center: Entity, bodies: HashMap<&'static str, BodyHandles>) -> Self {
        Self { center, bodies }
    }

    /// The sun's mesh entity
    pub fn center(&self) -> Entity {
        self.center
    }

    pub fn get(&self, name: &str) -> Option<BodyHandles> {
        self.bodies.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

// =============================================================================
// Annotations
// =============================================================================

/// Handle to the font every note is drawn with
#[derive(Resource)]
pub struct GlyphFont {
    pub handle: Handle<TypefaceFont>,
    /// Set once a load failure has been logged
    pub failure_reported: bool,
}

impl GlyphFont {
    pub fn new(handle: Handle<TypefaceFont>) -> Self {
        Self {
            handle,
            failure_reported: false,
        }
    }
}

/// How a note entered the system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteOrigin {
    /// Submitted during this session; persisted once built
    Submitted,
    /// Restored from storage; already persisted
    Replayed,
}

/// Where a label goes: its parent entity (if any) and its position there
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorPlacement {
    pub parent: Option<Entity>,
    pub translation: Vec3,
}

/// A note whose anchor is resolved but whose glyphs await the font
#[derive(Debug, Clone)]
pub struct PendingAnnotation {
    pub annotation: Annotation,
    pub placement: AnchorPlacement,
    pub origin: NoteOrigin,
}

/// Notes waiting for the glyph font, in submission order
#[derive(Resource, Default, Deref, DerefMut)]
pub struct PendingAnnotations(pub Vec<PendingAnnotation>);

/// Behaviour around note submission
#[derive(Resource, Debug, Clone)]
pub struct AnnotationSettings {
    /// View the camera returns to after every submitted note
    pub rehome_view: Option<CameraView>,
}

impl Default for AnnotationSettings {
    fn default() -> Self {
        Self {
            rehome_view: Some(crate::config::annotation::REHOME_VIEW),
        }
    }
}

/// Persistent note log
#[derive(Resource, Deref, DerefMut)]
pub struct AnnotationLogRes(pub AnnotationLog);

// =============================================================================
// Channel Communication (UI -> Frame Loop)
// =============================================================================

/// Receives actions from UI front ends on other threads
#[derive(Resource, Deref)]
pub struct UiActionInbox(pub Receiver<UiAction>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_names_map_to_fixed_targets() {
        assert_eq!("top".parse(), Ok(CameraView::Top));
        assert_eq!(CameraView::Front.target(), Vec3::new(0.0, 140.0, 300.0));
        assert_eq!(CameraView::Side.target(), Vec3::new(300.0, 70.0, 0.0));
        assert_eq!(
            "diagonal".parse::<CameraView>(),
            Err(UnknownView("diagonal".into()))
        );
    }

    #[test]
    fn startup_heads_for_the_top_view() {
        let rig = CameraRig::default();
        assert_eq!(rig.pending(), Some(CameraView::Top.target()));
        assert!(rig.is_busy());
    }

    #[test]
    fn transition_eases_into_the_target_and_goes_idle() {
        let mut rig = CameraRig::default();
        rig.request(CameraView::Side);

        let start = Vec3::new(0.0, 0.0, 10.0);
        let halfway = rig.advance(start, TRANSITION_SECS / 2.0).expect("moving");
        // ease-out covers three quarters of the way in half the time
        let expected = start.lerp(CameraView::Side.target(), 0.75);
        assert!(halfway.distance(expected) < 1e-3);

        let end = rig.advance(halfway, TRANSITION_SECS).expect("final step");
        assert_eq!(end, CameraView::Side.target());
        assert_eq!(rig.transition(), CameraTransition::Idle);
        assert_eq!(rig.advance(end, 0.1), None);
        assert!(!rig.is_busy());
    }

    #[test]
    fn last_request_wins_before_the_transition_starts() {
        let mut rig = CameraRig::default();
        rig.request(CameraView::Front);
        rig.request(CameraView::Top);

        rig.advance(Vec3::X, 0.0);
        assert!(matches!(
            rig.transition(),
            CameraTransition::Transitioning { target, .. } if target == CameraView::Top.target()
        ));
    }

    #[test]
    fn new_request_restarts_from_the_current_position() {
        let mut rig = CameraRig::default();
        let midway = rig.advance(Vec3::Z, 1.0).expect("moving");

        rig.request(CameraView::Front);
        rig.advance(midway, 0.0);
        assert_eq!(
            rig.transition(),
            CameraTransition::Transitioning {
                from: midway,
                target: CameraView::Front.target(),
                elapsed: 0.0
            }
        );
    }

    #[test]
    fn orbit_state_round_trips_a_position() {
        let mut state = OrbitCameraState::default();
        let position = Vec3::new(120.0, 80.0, -200.0);
        state.sync_to(position);
        assert!(state.position().distance(position) < 1e-3);
    }
}
