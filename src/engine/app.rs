//! Bevy application setup and execution
//!
//! This module handles the creation and configuration of the Bevy app,
//! including plugin registration and system scheduling.

use bevy::{prelude::*, window::WindowPlugin};

use crate::config::window::TITLE;
use crate::engine::plugins::TypefacePlugin;
use crate::engine::resources::*;
use crate::engine::systems::*;
use crate::storage::AnnotationLog;

/// The solar system model: scene graph, animation, camera and notes
///
/// Expects an [`UiActionInbox`] and an [`AnnotationLogRes`] to be inserted by
/// whoever builds the app.
pub struct SolarSystemPlugin;

impl Plugin for SolarSystemPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(TypefacePlugin);

        app.init_resource::<CameraRig>()
            .init_resource::<OrbitCameraState>()
            .init_resource::<PendingAnnotations>()
            .init_resource::<AnnotationSettings>();

        // Replay needs the body registry the build step inserts
        app.add_systems(
            Startup,
            (build_solar_system, load_glyph_font, replay_saved_annotations).chain(),
        );
        app.add_systems(
            Update,
            (
                (
                    apply_ui_actions,
                    view_hotkeys,
                    update_camera_from_input,
                    drive_camera_transition,
                )
                    .chain(),
                spin_bodies,
                resolve_pending_annotations.after(apply_ui_actions),
            ),
        );
    }
}

/// Create and configure the windowed Bevy application
pub fn create_app(inbox: UiActionInbox) -> App {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: TITLE.into(),
            ..default()
        }),
        ..default()
    }));

    app.insert_resource(ClearColor(Color::BLACK));
    app.insert_resource(inbox);
    app.insert_resource(AnnotationLogRes(AnnotationLog::open_default()));

    app.add_plugins(SolarSystemPlugin);

    app.add_systems(Startup, spawn_viewport);
    app.add_systems(
        Update,
        follow_camera_with_backdrop.after(drive_camera_transition),
    );

    info!("[Bevy] App configured");
    app
}
