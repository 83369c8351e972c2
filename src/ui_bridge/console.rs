//! Line-based console front end
//!
//! Reads stdin on a background thread. A line is either a view name or a
//! JSON note form such as
//! `{"note":"Home","addTo":"earth","color":"#00ff00","size":5,"height":1}`.

use bevy::log::{info, warn};
use std::io::{self, BufRead};
use std::thread;

use super::actions::UiActions;
use super::commands::{request_view, submit_annotation, UiError};
use crate::annotation::AnnotationForm;

/// Handle one console line
pub fn handle_line(actions: &UiActions, line: &str) -> Result<(), UiError> {
    let line = line.trim();
    if line.starts_with('{') {
        let form: AnnotationForm = serde_json::from_str(line)?;
        submit_annotation(actions, form)
    } else {
        request_view(actions, line)
    }
}

/// Start reading commands from stdin
pub fn spawn_console(actions: UiActions) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match handle_line(&actions, &line) {
                Ok(()) => info!("[Console] Accepted: {}", line.trim()),
                Err(UiError::Disconnected) => break,
                Err(err) => warn!("[Console] {err}"),
            }
        }
    });
}
