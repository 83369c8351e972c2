//! Camera systems
//!
//! View transitions and orbit controls share one camera. While a transition
//! is pending or in flight it owns the camera; otherwise mouse input orbits
//! it around the origin.

use bevy::{
    input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll},
    math::Vec3,
    prelude::*,
};

use crate::config::camera::*;
use crate::engine::components::CameraController;
use crate::engine::resources::{CameraRig, CameraView, OrbitCameraState};

/// Step the active view transition, keeping the camera aimed at the origin
pub fn drive_camera_transition(
    time: Res<Time>,
    mut rig: ResMut<CameraRig>,
    mut orbit_state: ResMut<OrbitCameraState>,
    mut camera_query: Query<&mut Transform, With<CameraController>>,
) {
    let Ok(mut transform) = camera_query.single_mut() else {
        return;
    };
    let Some(position) = rig.advance(transform.translation, time.delta_secs()) else {
        return;
    };

    *transform = Transform::from_translation(position).looking_at(orbit_state.center, Vec3::Y);
    // Keep manual orbiting continuous with where the transition left off
    orbit_state.sync_to(position);
}

/// Number keys 1, 2 and 3 select the top, front and side views
pub fn view_hotkeys(keys: Option<Res<ButtonInput<KeyCode>>>, mut rig: ResMut<CameraRig>) {
    let Some(keys) = keys else { return };
    let bindings = [
        (KeyCode::Digit1, CameraView::Top),
        (KeyCode::Digit2, CameraView::Front),
        (KeyCode::Digit3, CameraView::Side),
    ];
    for (key, view) in bindings {
        if keys.just_pressed(key) {
            rig.request(view);
        }
    }
}

/// Update camera transform based on mouse input
/// Implements orbit camera control:
/// - Left button drag: rotate camera (yaw/pitch)
/// - Scroll wheel: zoom (adjust distance)
pub fn update_camera_from_input(
    buttons: Option<Res<ButtonInput<MouseButton>>>,
    motion: Option<Res<AccumulatedMouseMotion>>,
    scroll: Option<Res<AccumulatedMouseScroll>>,
    rig: Res<CameraRig>,
    mut orbit_state: ResMut<OrbitCameraState>,
    mut camera_query: Query<&mut Transform, With<CameraController>>,
) {
    if rig.is_busy() {
        return;
    }

    let dragging = buttons.is_some_and(|b| b.pressed(MouseButton::Left));
    let drag = motion
        .filter(|_| dragging)
        .map(|m| m.delta)
        .unwrap_or(Vec2::ZERO);
    let zoom = scroll.map(|s| s.delta.y).unwrap_or(0.0);
    if drag == Vec2::ZERO && zoom == 0.0 {
        return;
    }

    // Apply rotation when left button is held
    if drag != Vec2::ZERO {
        orbit_state.yaw -= drag.x * ROTATION_SPEED;
        orbit_state.pitch += drag.y * ROTATION_SPEED;

        // Clamp pitch to prevent camera flipping
        orbit_state.pitch = orbit_state.pitch.clamp(MIN_PITCH, MAX_PITCH);
    }

    // Apply zoom from scroll wheel
    if zoom != 0.0 {
        orbit_state.distance -= zoom * ZOOM_SPEED;
        orbit_state.distance = orbit_state.distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    let camera_position = orbit_state.position();
    for mut transform in camera_query.iter_mut() {
        *transform =
            Transform::from_translation(camera_position).looking_at(orbit_state.center, Vec3::Y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::resources::CameraTransition;
    use crate::engine::test_support::{camera_position, test_app, MemoryStore};
    use crate::ui_bridge::request_view;

    #[test]
    fn camera_settles_on_the_top_view_at_startup() {
        let (mut app, _actions) = test_app(MemoryStore::default());
        // 100 ms frames: well past the 3 s transition
        for _ in 0..60 {
            app.update();
        }
        assert!(camera_position(&mut app).distance(CameraView::Top.target()) < 1e-3);
        assert_eq!(
            app.world().resource::<CameraRig>().transition(),
            CameraTransition::Idle
        );
    }

    #[test]
    fn rapid_requests_leave_one_transition_to_the_last_view() {
        let (mut app, actions) = test_app(MemoryStore::default());
        app.update();

        request_view(&actions, "front").expect("front");
        request_view(&actions, "top").expect("top");
        app.update();

        match app.world().resource::<CameraRig>().transition() {
            CameraTransition::Transitioning { target, .. } => {
                assert_eq!(target, CameraView::Top.target())
            }
            other => panic!("expected a transition, got {other:?}"),
        }

        for _ in 0..60 {
            app.update();
        }
        assert!(camera_position(&mut app).distance(CameraView::Top.target()) < 1e-3);
    }

    #[test]
    fn mid_flight_request_redirects_from_the_current_position() {
        let (mut app, actions) = test_app(MemoryStore::default());
        for _ in 0..10 {
            app.update();
        }
        let midway = camera_position(&mut app);

        request_view(&actions, "side").expect("side");
        app.update();
        match app.world().resource::<CameraRig>().transition() {
            CameraTransition::Transitioning { from, target, .. } => {
                assert_eq!(from, midway);
                assert_eq!(target, CameraView::Side.target());
            }
            other => panic!("expected a transition, got {other:?}"),
        }

        for _ in 0..60 {
            app.update();
        }
        assert!(camera_position(&mut app).distance(CameraView::Side.target()) < 1e-3);
    }

    #[test]
    fn transition_keeps_the_camera_aimed_at_the_origin() {
        let (mut app, actions) = test_app(MemoryStore::default());
        request_view(&actions, "side").expect("side");
        for _ in 0..5 {
            app.update();
            let world = app.world_mut();
            let mut query = world.query_filtered::<&Transform, With<CameraController>>();
            let transform = query
                .single(world)
                .expect("one camera");
            let to_origin = (-transform.translation).normalize();
            assert!(transform.forward().dot(to_origin) > 0.999);
        }
    }

    #[test]
    fn orbit_state_follows_the_transition() {
        let (mut app, _actions) = test_app(MemoryStore::default());
        for _ in 0..60 {
            app.update();
        }
        let state = app.world().resource::<OrbitCameraState>();
        assert!((state.distance - 300.0).abs() < 1e-2);
        assert!(state.position().distance(CameraView::Top.target()) < 1e-2);
    }
}
