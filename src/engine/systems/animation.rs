//! Animation systems
//!
//! Advances every spin once per frame. Angles accumulate without wrapping;
//! rotations are rebuilt from them so nothing else needs to touch them.

use bevy::prelude::*;

use crate::engine::components::{AxisSpin, OrbitSpin};

/// Advance axis spin of every body and revolution of every pivot
pub fn spin_bodies(
    mut spinning: Query<(&mut AxisSpin, &mut Transform), Without<OrbitSpin>>,
    mut pivots: Query<(&mut OrbitSpin, &mut Transform), Without<AxisSpin>>,
) {
    for (mut spin, mut transform) in spinning.iter_mut() {
        spin.angle += spin.rate;
        transform.rotation = Quat::from_rotation_y(spin.angle);
    }
    for (mut orbit, mut transform) in pivots.iter_mut() {
        orbit.angle += orbit.rate;
        transform.rotation = Quat::from_rotation_y(orbit.angle);
    }
}
