//! Scene setup systems
//!
//! Builds the body hierarchy once at startup, plus the camera, lights and
//! star backdrop of the interactive viewport.

use bevy::{
    asset::Assets,
    core_pipeline::tonemapping::Tonemapping,
    math::{primitives::Annulus, primitives::Sphere, Quat, Vec3},
    pbr::{MeshMaterial3d, StandardMaterial},
    prelude::*,
};
use std::collections::HashMap;
use std::f32::consts::FRAC_PI_2;

use crate::bodies::{BodyDescriptor, CENTER_NAME, SOLAR_BODIES};
use crate::config::camera::{FAR, FOV_DEGREES, INITIAL_POSITION, NEAR};
use crate::config::scene::*;
use crate::engine::components::{
    AxisSpin, CameraController, CelestialBody, CentralBody, OrbitGuide, OrbitSpin, Pivot,
    PlanetRing, StarBackdrop,
};
use crate::engine::resources::{BodyHandles, BodyRegistry};

/// Rotation laying an XY-plane shape flat on the XZ plane, facing up
fn lie_flat() -> Quat {
    Quat::from_rotation_x(-FRAC_PI_2)
}

/// Build the sun, one pivot per body, and the orbit guides
pub fn build_solar_system(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
) {
    info!("[Bevy] Building solar system...");

    let sun = commands
        .spawn((
            Name::new(CENTER_NAME),
            Mesh3d(meshes.add(Sphere::new(SUN_RADIUS).mesh().uv(MESH_RESOLUTION, MESH_RESOLUTION))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color_texture: Some(asset_server.load(SUN_TEXTURE)),
                unlit: true,
                ..default()
            })),
            Transform::default(),
            CelestialBody {
                name: CENTER_NAME,
                radius: SUN_RADIUS,
            },
            CentralBody,
            AxisSpin::new(SUN_AXIS_SPIN),
        ))
        .id();

    let guide_material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        unlit: true,
        double_sided: true,
        cull_mode: None,
        ..default()
    });

    let mut bodies = HashMap::new();
    for descriptor in SOLAR_BODIES {
        let handles = spawn_body(
            &mut commands,
            &mut meshes,
            &mut materials,
            &asset_server,
            descriptor,
        );
        bodies.insert(descriptor.name, handles);

        // Lives in the scene root so it never rotates
        commands.spawn((
            Name::new(format!("{} orbit", descriptor.name)),
            Mesh3d(meshes.add(Annulus::new(
                descriptor.orbit_radius,
                descriptor.orbit_radius + ORBIT_GUIDE_WIDTH,
            ))),
            MeshMaterial3d(guide_material.clone()),
            Transform::from_rotation(lie_flat()),
            OrbitGuide,
        ));
    }

    commands.insert_resource(BodyRegistry::new(sun, bodies));
    info!("[Bevy] Solar system ready ({} bodies)", SOLAR_BODIES.len());
}

/// Spawn a pivot with its body mesh (and ring) as children
fn spawn_body(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    asset_server: &AssetServer,
    descriptor: &BodyDescriptor,
) -> BodyHandles {
    let offset = Vec3::new(descriptor.orbit_radius, 0.0, 0.0);

    let pivot = commands
        .spawn((
            Name::new(format!("{} pivot", descriptor.name)),
            Transform::default(),
            Visibility::default(),
            Pivot {
                body: descriptor.name,
            },
            OrbitSpin::new(descriptor.orbit_spin),
        ))
        .id();

    let mesh = commands
        .spawn((
            Name::new(descriptor.name),
            Mesh3d(meshes.add(
                Sphere::new(descriptor.radius)
                    .mesh()
                    .uv(MESH_RESOLUTION, MESH_RESOLUTION),
            )),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color_texture: Some(asset_server.load(descriptor.texture)),
                perceptual_roughness: 1.0,
                ..default()
            })),
            Transform::from_translation(offset),
            CelestialBody {
                name: descriptor.name,
                radius: descriptor.radius,
            },
            AxisSpin::new(descriptor.axis_spin),
            ChildOf(pivot),
        ))
        .id();

    if let (Some(ring), Some((inner, outer))) = (descriptor.ring, descriptor.ring_radii()) {
        commands.spawn((
            Name::new(format!("{} ring", descriptor.name)),
            Mesh3d(meshes.add(Annulus::new(inner, outer))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color_texture: Some(asset_server.load(ring.texture)),
                alpha_mode: AlphaMode::Blend,
                double_sided: true,
                cull_mode: None,
                ..default()
            })),
            Transform::from_translation(offset).with_rotation(lie_flat()),
            PlanetRing,
            ChildOf(pivot),
        ));
    }

    BodyHandles { pivot, mesh }
}

/// Spawn the camera with its ambient fill, the sun's light and the star backdrop
pub fn spawn_viewport(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
) {
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: FOV_DEGREES.to_radians(),
            near: NEAR,
            far: FAR,
            ..default()
        }),
        Tonemapping::None,
        AmbientLight {
            color: Color::srgb_u8(AMBIENT_GREY, AMBIENT_GREY, AMBIENT_GREY),
            brightness: AMBIENT_BRIGHTNESS,
            ..default()
        },
        Transform::from_translation(INITIAL_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
        CameraController,
    ));

    commands.spawn((
        PointLight {
            intensity: SUN_LIGHT_INTENSITY,
            range: SUN_LIGHT_RANGE,
            shadows_enabled: false,
            ..default()
        },
        Transform::default(),
    ));

    // The same star texture on every side, seen from inside
    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(BACKDROP_RADIUS).mesh().uv(32, 18))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color_texture: Some(asset_server.load(STARS_TEXTURE)),
            unlit: true,
            double_sided: true,
            cull_mode: None,
            ..default()
        })),
        Transform::from_translation(INITIAL_POSITION),
        StarBackdrop,
    ));

    info!("[Bevy] Viewport ready");
}

/// Keep the star dome centred on the camera
pub fn follow_camera_with_backdrop(
    cameras: Query<&Transform, (With<CameraController>, Without<StarBackdrop>)>,
    mut backdrops: Query<&mut Transform, With<StarBackdrop>>,
) {
    let Ok(camera) = cameras.single() else {
        return;
    };
    for mut transform in backdrops.iter_mut() {
        transform.translation = camera.translation;
    }
}
