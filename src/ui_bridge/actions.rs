//! Action channel shared between UI front ends and the frame loop

use crossbeam_channel::{unbounded, Sender};

use crate::annotation::Annotation;
use crate::engine::resources::{CameraView, UiActionInbox};

/// A validated request from a front end
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    RequestView(CameraView),
    SubmitAnnotation(Annotation),
}

/// Cloneable sending side handed to front ends
#[derive(Clone)]
pub struct UiActions(pub Sender<UiAction>);

/// Create the action channel: senders for front ends, the inbox for Bevy
pub fn channel() -> (UiActions, UiActionInbox) {
    let (sender, receiver) = unbounded();
    (UiActions(sender), UiActionInbox(receiver))
}
