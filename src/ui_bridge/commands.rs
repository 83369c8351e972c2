//! UI command handlers
//!
//! The action surface front ends call into. Input is validated here, so the
//! frame loop only ever receives well-formed requests.

use thiserror::Error;

use super::actions::{UiAction, UiActions};
use crate::annotation::{AnnotationError, AnnotationForm};
use crate::engine::resources::{CameraView, UnknownView};

#[derive(Debug, Error)]
pub enum UiError {
    #[error(transparent)]
    View(#[from] UnknownView),
    #[error("invalid note: {0}")]
    Annotation(#[from] AnnotationError),
    #[error("malformed note form: {0}")]
    Form(#[from] serde_json::Error),
    #[error("the scene is no longer running")]
    Disconnected,
}

/// Move the camera to the named view (`top`, `front` or `side`)
pub fn request_view(actions: &UiActions, name: &str) -> Result<(), UiError> {
    let view: CameraView = name.trim().parse()?;
    actions
        .0
        .send(UiAction::RequestView(view))
        .map_err(|_| UiError::Disconnected)
}

/// Pin a note into the scene
pub fn submit_annotation(actions: &UiActions, form: AnnotationForm) -> Result<(), UiError> {
    let annotation = form.validate()?;
    actions
        .0
        .send(UiAction::SubmitAnnotation(annotation))
        .map_err(|_| UiError::Disconnected)
}
