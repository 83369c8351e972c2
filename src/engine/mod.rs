//! Bevy engine integration
//!
//! This module contains all Bevy-related code including components,
//! resources, systems, plugins, and application setup.

pub mod app;
pub mod components;
pub mod plugins;
pub mod resources;
pub mod systems;
pub mod text_geometry;

// Re-export commonly used items
pub use app::{create_app, SolarSystemPlugin};

#[cfg(test)]
pub(crate) mod test_support {
    use bevy::{
        asset::AssetPlugin, pbr::StandardMaterial, prelude::*, time::TimeUpdateStrategy,
        transform::TransformPlugin,
    };
    use std::time::Duration;

    pub(crate) use crate::storage::MemoryStore;

    use super::components::CameraController;
    use super::plugins::typeface::{tests::SQUARE_FONT, TypefaceFont};
    use super::resources::{AnnotationLogRes, GlyphFont};
    use super::SolarSystemPlugin;
    use crate::config::camera::INITIAL_POSITION;
    use crate::storage::AnnotationLog;
    use crate::ui_bridge::{channel, UiActions};

    /// Windowless app running the full plugin on 100 ms frames
    pub(crate) fn test_app(store: MemoryStore) -> (App, UiActions) {
        let (mut app, actions) = bare_test_app(store);

        let font = TypefaceFont::from_json_slice(SQUARE_FONT.as_bytes()).expect("test font");
        let handle = app
            .world_mut()
            .resource_mut::<Assets<TypefaceFont>>()
            .add(font);
        app.insert_resource(GlyphFont::new(handle));
        (app, actions)
    }

    /// Like [`test_app`] but with no glyph font provided up front
    pub(crate) fn bare_test_app(store: MemoryStore) -> (App, UiActions) {
        let (actions, inbox) = channel();

        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default(), TransformPlugin));
        app.init_asset::<Mesh>()
            .init_asset::<StandardMaterial>()
            .init_asset::<Image>();
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
        app.insert_resource(inbox);
        app.insert_resource(AnnotationLogRes(AnnotationLog::new(store)));
        app.add_plugins(SolarSystemPlugin);

        app.world_mut().spawn((
            Transform::from_translation(INITIAL_POSITION),
            CameraController,
        ));

        app.finish();
        app.cleanup();
        (app, actions)
    }

    pub(crate) fn camera_position(app: &mut App) -> Vec3 {
        let world = app.world_mut();
        world
            .query_filtered::<&Transform, With<CameraController>>()
            .single(world)
            .expect("one camera")
            .translation
    }
}
