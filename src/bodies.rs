//! Celestial body descriptors
//!
//! The fixed table the scene graph is built from. Distances and radii are in
//! scene units, spin rates in radians per frame.

/// Name the central body is addressed by
pub const CENTER_NAME: &str = "sun";

/// Optional ring around a body, offsets measured from the body's radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingDescriptor {
    pub inner_offset: f32,
    pub outer_offset: f32,
    pub texture: &'static str,
}

/// Static description of one orbiting body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDescriptor {
    pub name: &'static str,
    pub radius: f32,
    /// Distance from the centre, i.e. the body's offset inside its pivot
    pub orbit_radius: f32,
    /// Rotation of the body about its own axis per frame
    pub axis_spin: f32,
    /// Rotation of the pivot about the centre per frame
    pub orbit_spin: f32,
    pub texture: &'static str,
    pub ring: Option<RingDescriptor>,
}

impl BodyDescriptor {
    /// Inner and outer radius of the ring annulus, if the body has one
    pub fn ring_radii(&self) -> Option<(f32, f32)> {
        self.ring
            .map(|ring| (self.radius + ring.inner_offset, self.radius + ring.outer_offset))
    }
}

pub const SOLAR_BODIES: &[BodyDescriptor] = &[
    BodyDescriptor {
        name: "mercury",
        radius: 3.2,
        orbit_radius: 28.0,
        axis_spin: 0.004,
        orbit_spin: 0.04,
        texture: "textures/mercury.jpg",
        ring: None,
    },
    BodyDescriptor {
        name: "venus",
        radius: 5.8,
        orbit_radius: 44.0,
        axis_spin: 0.002,
        orbit_spin: 0.015,
        texture: "textures/venus.jpg",
        ring: None,
    },
    BodyDescriptor {
        name: "earth",
        radius: 6.0,
        orbit_radius: 62.0,
        axis_spin: 0.02,
        orbit_spin: 0.01,
        texture: "textures/earth.jpg",
        ring: None,
    },
    BodyDescriptor {
        name: "mars",
        radius: 4.0,
        orbit_radius: 78.0,
        axis_spin: 0.018,
        orbit_spin: 0.008,
        texture: "textures/mars.jpg",
        ring: None,
    },
    BodyDescriptor {
        name: "jupiter",
        radius: 12.0,
        orbit_radius: 100.0,
        axis_spin: 0.04,
        orbit_spin: 0.002,
        texture: "textures/jupiter.jpg",
        ring: None,
    },
    BodyDescriptor {
        name: "saturn",
        radius: 10.0,
        orbit_radius: 138.0,
        axis_spin: 0.038,
        orbit_spin: 0.0009,
        texture: "textures/saturn.jpg",
        ring: Some(RingDescriptor {
            inner_offset: 3.0,
            outer_offset: 10.0,
            texture: "textures/saturn_ring.png",
        }),
    },
    BodyDescriptor {
        name: "uranus",
        radius: 7.0,
        orbit_radius: 176.0,
        axis_spin: 0.03,
        orbit_spin: 0.0004,
        texture: "textures/uranus.jpg",
        ring: Some(RingDescriptor {
            inner_offset: 3.0,
            outer_offset: 7.0,
            texture: "textures/uranus_ring.png",
        }),
    },
    BodyDescriptor {
        name: "neptune",
        radius: 7.0,
        orbit_radius: 200.0,
        axis_spin: 0.032,
        orbit_spin: 0.0001,
        texture: "textures/neptune.jpg",
        ring: None,
    },
    BodyDescriptor {
        name: "pluto",
        radius: 2.8,
        orbit_radius: 216.0,
        axis_spin: 0.008,
        orbit_spin: 0.00007,
        texture: "textures/pluto.jpg",
        ring: None,
    },
];

/// Look up an orbiting body by name
pub fn body_descriptor(name: &str) -> Option<&'static BodyDescriptor> {
    SOLAR_BODIES.iter().find(|body| body.name == name)
}
