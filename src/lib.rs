//! Solar System Notes: an annotated solar system model
//!
//! A sun with nine orbiting bodies, animated every frame, viewed through a
//! camera that glides between fixed viewpoints. Users pin extruded text
//! notes to bodies or to points in space; notes are stored on disk and
//! rebuilt on the next start.
//!
//! # Module Structure
//!
//! - `config`: Configuration constants and settings
//! - `bodies`: The body table the scene is built from
//! - `annotation`: Note model, records and validation
//! - `storage`: Key-value persistence and the note log
//! - `ui_bridge`: Bridge layer between front ends and Bevy
//!   - `actions`: Cross-thread action channel
//!   - `commands`: Validated command handlers
//!   - `console`: Stdin front end
//! - `engine`: Bevy engine integration
//!   - `components`: ECS components
//!   - `resources`: Global resources
//!   - `plugins`: Custom plugins
//!   - `systems`: Game systems
//!   - `text_geometry`: Extruded text meshes
//!   - `app`: Application setup

pub mod annotation;
pub mod bodies;
pub mod config;
pub mod engine;
pub mod storage;
pub mod ui_bridge;

use bevy::app::AppExit;
use bevy::log::info;

/// Main entry point: console front end plus the windowed frame loop
pub fn run() -> AppExit {
    let (actions, inbox) = ui_bridge::channel();
    ui_bridge::console::spawn_console(actions);

    let mut app = engine::create_app(inbox);
    info!("[App] Type top, front, side or a JSON note form on stdin");
    app.run()
}
