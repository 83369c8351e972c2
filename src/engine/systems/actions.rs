//! UI action intake
//!
//! Drains the action channel once per frame so front ends on other threads
//! never touch the world directly.

use bevy::prelude::*;

use super::annotation::queue_annotation;
use crate::engine::resources::{
    AnnotationSettings, BodyRegistry, CameraRig, NoteOrigin, PendingAnnotations, UiActionInbox,
};
use crate::ui_bridge::UiAction;

/// Apply every action received since the last frame, in arrival order
pub fn apply_ui_actions(
    inbox: Res<UiActionInbox>,
    registry: Option<Res<BodyRegistry>>,
    settings: Res<AnnotationSettings>,
    mut rig: ResMut<CameraRig>,
    mut pending: ResMut<PendingAnnotations>,
) {
    for action in inbox.try_iter() {
        match action {
            UiAction::RequestView(view) => {
                debug!("[UI] View requested: {}", view.name());
                rig.request(view);
            }
            UiAction::SubmitAnnotation(annotation) => {
                let Some(registry) = registry.as_deref() else {
                    warn!("[UI] Scene not built yet, dropping note");
                    continue;
                };
                queue_annotation(&mut pending, registry, annotation, NoteOrigin::Submitted);
                if let Some(view) = settings.rehome_view {
                    rig.request(view);
                }
            }
        }
    }
}
