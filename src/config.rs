//! Configuration constants and settings for the solar system model
//!
//! This module contains all tunable parameters such as camera viewpoints,
//! orbit-control limits, scene dimensions, and annotation constraints.

/// Window settings
pub mod window {
    /// Title of the primary window
    pub const TITLE: &str = "Solar System Notes";
}

/// Camera settings
pub mod camera {
    use bevy::math::Vec3;

    /// Camera position for the `top` view
    pub const TOP_VIEW: Vec3 = Vec3::new(0.0, 300.0, 0.0);

    /// Camera position for the `front` view
    pub const FRONT_VIEW: Vec3 = Vec3::new(0.0, 140.0, 300.0);

    /// Camera position for the `side` view
    pub const SIDE_VIEW: Vec3 = Vec3::new(300.0, 70.0, 0.0);

    /// Where the camera sits before the first transition starts
    pub const INITIAL_POSITION: Vec3 = Vec3::new(0.0, 0.0, 0.1);

    /// Duration of an eased view transition (seconds)
    pub const TRANSITION_SECS: f32 = 3.0;

    /// Vertical field of view (degrees)
    pub const FOV_DEGREES: f32 = 75.0;

    /// Near clipping plane
    pub const NEAR: f32 = 0.1;

    /// Far clipping plane
    pub const FAR: f32 = 1000.0;

    /// Rotation speed multiplier for mouse drag
    pub const ROTATION_SPEED: f32 = 0.005;

    /// Zoom speed multiplier for scroll wheel
    pub const ZOOM_SPEED: f32 = 8.0;

    /// Minimum camera distance from the origin
    pub const MIN_DISTANCE: f32 = 20.0;

    /// Maximum camera distance from the origin
    pub const MAX_DISTANCE: f32 = 600.0;

    /// Maximum pitch angle (radians) to prevent camera flipping
    pub const MAX_PITCH: f32 = 1.55;

    /// Minimum pitch angle (radians) to prevent camera flipping
    pub const MIN_PITCH: f32 = -1.55;
}

/// Scene construction settings
pub mod scene {
    /// Radius of the central body
    pub const SUN_RADIUS: f32 = 20.0;

    /// Axis spin of the central body per frame (radians)
    pub const SUN_AXIS_SPIN: f32 = 0.004;

    /// Texture of the central body
    pub const SUN_TEXTURE: &str = "textures/sun.jpg";

    /// Width of the cosmetic orbit guide rings
    pub const ORBIT_GUIDE_WIDTH: f32 = 0.2;

    /// Segment count for spheres and rings
    pub const MESH_RESOLUTION: u32 = 50;

    /// Intensity of the point light at the sun
    pub const SUN_LIGHT_INTENSITY: f32 = 40_000_000.0;

    /// Reach of the point light at the sun
    pub const SUN_LIGHT_RANGE: f32 = 400.0;

    /// Grey level of the ambient fill
    pub const AMBIENT_GREY: u8 = 0x33;

    /// Brightness of the ambient fill
    pub const AMBIENT_BRIGHTNESS: f32 = 400.0;

    /// Texture repeated on every face of the star backdrop
    pub const STARS_TEXTURE: &str = "textures/stars.jpg";

    /// Radius of the star dome; must stay inside the far plane
    pub const BACKDROP_RADIUS: f32 = 900.0;
}

/// Annotation settings
pub mod annotation {
    use crate::engine::resources::CameraView;

    /// View the camera returns to after a note is submitted
    pub const REHOME_VIEW: CameraView = CameraView::Front;

    /// Glyph font used for every note
    pub const FONT_PATH: &str = "fonts/poppins-regular.typeface.json";

    /// Gap between a body's surface and the baseline of its notes
    pub const SURFACE_CLEARANCE: f32 = 1.0;

    /// Accepted glyph sizes
    pub const SIZE_RANGE: (f32, f32) = (1.0, 10.0);

    /// Accepted extrusion depths
    pub const DEPTH_RANGE: (f32, f32) = (1.0, 3.0);

    /// Accepted range for each free-coordinate axis
    pub const COORDINATE_RANGE: (f32, f32) = (-200.0, 200.0);

    /// Curve flattening tolerance for glyph outlines (world units)
    pub const GLYPH_TOLERANCE: f32 = 0.02;
}

/// Persistent storage settings
pub mod storage {
    use std::path::PathBuf;

    /// Key the annotation log is stored under
    pub const NOTES_KEY: &str = "notes";

    /// Environment variable overriding the data directory
    pub const DATA_DIR_ENV: &str = "SOLAR_NOTES_DATA_DIR";

    /// Directory name created under the platform data directory
    pub const APP_DIR_NAME: &str = "solar-system-notes";

    /// Resolve the directory holding persisted notes
    pub fn data_dir() -> PathBuf {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            return PathBuf::from(dir);
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR_NAME))
    }
}
