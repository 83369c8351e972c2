//! Bevy component definitions
//!
//! This module contains all component markers and data structures used
//! to tag and identify entities in the Bevy ECS (Entity Component System).

use bevy::prelude::*;

use crate::annotation::Annotation;

/// Marker component for the camera driven by view transitions and orbit input
#[derive(Component)]
pub struct CameraController;

/// A sphere in the model, either the sun or an orbiting body
#[derive(Component, Debug, Clone, Copy)]
pub struct CelestialBody {
    pub name: &'static str,
    pub radius: f32,
}

/// Marker component for the sun at the centre of the system
#[derive(Component)]
pub struct CentralBody;

/// Rotation of an entity about its own vertical axis
///
/// Only the animation system writes `angle`; the entity's rotation is always
/// derived from it.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct AxisSpin {
    /// Radians added per frame
    pub rate: f32,
    /// Accumulated angle in radians
    pub angle: f32,
}

impl AxisSpin {
    pub fn new(rate: f32) -> Self {
        Self { rate, angle: 0.0 }
    }
}

/// Revolution of a pivot about the centre of the system
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct OrbitSpin {
    /// Radians added per frame
    pub rate: f32,
    /// Accumulated angle in radians
    pub angle: f32,
}

impl OrbitSpin {
    pub fn new(rate: f32) -> Self {
        Self { rate, angle: 0.0 }
    }
}

/// Orbit anchor holding one body (and its ring) as children
#[derive(Component, Debug)]
pub struct Pivot {
    pub body: &'static str,
}

/// Marker component for the ring around a body
#[derive(Component)]
pub struct PlanetRing;

/// Marker component for the cosmetic ring tracing an orbit
#[derive(Component)]
pub struct OrbitGuide;

/// Marker component for the star dome behind everything
#[derive(Component)]
pub struct StarBackdrop;

/// A note pinned into the scene; sits exactly on its anchor point
#[derive(Component, Debug, Clone)]
pub struct NoteLabel(pub Annotation);

/// Marker component for the extruded text mesh under a [`NoteLabel`]
#[derive(Component)]
pub struct NoteGlyphs;
