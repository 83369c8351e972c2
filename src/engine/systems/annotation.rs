//! Annotation systems
//!
//! Notes are resolved against the body hierarchy as soon as they arrive, then
//! wait in [`PendingAnnotations`] until the glyph font is available. Building
//! a note spawns a label entity on its anchor with the extruded text centred
//! under it, and persists notes submitted during this session.

use bevy::{
    asset::{Assets, LoadState},
    pbr::{MeshMaterial3d, StandardMaterial},
    prelude::*,
};

use crate::annotation::{AnchorKind, Annotation};
use crate::bodies::body_descriptor;
use crate::config::annotation::{FONT_PATH, GLYPH_TOLERANCE, SURFACE_CLEARANCE};
use crate::config::scene::SUN_RADIUS;
use crate::engine::components::{NoteGlyphs, NoteLabel};
use crate::engine::plugins::typeface::TypefaceFont;
use crate::engine::resources::{
    AnchorPlacement, AnnotationLogRes, BodyRegistry, GlyphFont, NoteOrigin, PendingAnnotation,
    PendingAnnotations,
};
use crate::engine::text_geometry::build_text_geometry;

/// Work out where a note attaches in the current hierarchy
///
/// Body notes hang off the pivot rather than the body so they orbit with it
/// without spinning around its axis.
pub fn resolve_anchor(anchor: &AnchorKind, registry: &BodyRegistry) -> Option<AnchorPlacement> {
    match anchor {
        AnchorKind::Center => Some(AnchorPlacement {
            parent: Some(registry.center()),
            translation: Vec3::new(0.0, SUN_RADIUS + SURFACE_CLEARANCE, 0.0),
        }),
        AnchorKind::Body(name) => {
            let descriptor = body_descriptor(name)?;
            let handles = registry.get(name)?;
            Some(AnchorPlacement {
                parent: Some(handles.pivot),
                translation: Vec3::new(
                    descriptor.orbit_radius,
                    descriptor.radius + SURFACE_CLEARANCE,
                    0.0,
                ),
            })
        }
        AnchorKind::Free(point) => Some(AnchorPlacement {
            parent: None,
            translation: *point,
        }),
    }
}

/// Resolve a note's anchor and queue it for building
pub fn queue_annotation(
    pending: &mut PendingAnnotations,
    registry: &BodyRegistry,
    annotation: Annotation,
    origin: NoteOrigin,
) {
    let Some(placement) = resolve_anchor(&annotation.anchor, registry) else {
        warn!(
            "[Notes] No anchor `{}` in the scene, dropping note",
            annotation.anchor.add_to()
        );
        return;
    };
    pending.push(PendingAnnotation {
        annotation,
        placement,
        origin,
    });
}

/// Start loading the glyph font unless one was provided up front
pub fn load_glyph_font(
    mut commands: Commands,
    font: Option<Res<GlyphFont>>,
    asset_server: Res<AssetServer>,
) {
    if font.is_some() {
        return;
    }
    commands.insert_resource(GlyphFont::new(asset_server.load(FONT_PATH)));
}

/// Queue every stored note for rebuilding
pub fn replay_saved_annotations(
    log: Res<AnnotationLogRes>,
    registry: Res<BodyRegistry>,
    mut pending: ResMut<PendingAnnotations>,
) {
    let records = log.read_all();
    let mut restored = 0;
    for record in records {
        match Annotation::try_from(record) {
            Ok(annotation) => {
                queue_annotation(&mut pending, &registry, annotation, NoteOrigin::Replayed);
                restored += 1;
            }
            Err(err) => warn!("[Notes] Skipping stored note: {err}"),
        }
    }
    info!("[Notes] Restoring {restored} saved note(s)");
}

/// Build queued notes once the font is ready
#[allow(clippy::too_many_arguments)]
pub fn resolve_pending_annotations(
    mut commands: Commands,
    mut pending: ResMut<PendingAnnotations>,
    font: Option<ResMut<GlyphFont>>,
    fonts: Res<Assets<TypefaceFont>>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut log: ResMut<AnnotationLogRes>,
) {
    if pending.is_empty() {
        return;
    }
    let Some(mut font) = font else { return };

    let Some(typeface) = fonts.get(&font.handle) else {
        if let LoadState::Failed(err) = asset_server.load_state(font.handle.id()) {
            if !font.failure_reported {
                warn!("[Notes] Glyph font failed to load: {err}");
                font.failure_reported = true;
            }
            warn!("[Notes] Discarding {} note(s) that cannot be drawn", pending.len());
            pending.clear();
        }
        return;
    };

    for PendingAnnotation {
        annotation,
        placement,
        origin,
    } in pending.drain(..)
    {
        let geometry = build_text_geometry(
            typeface,
            &annotation.note,
            annotation.size,
            annotation.depth,
            GLYPH_TOLERANCE,
        );
        let half_width = geometry.width / 2.0;
        let mesh = meshes.add(geometry.into_mesh());
        let material = materials.add(StandardMaterial {
            base_color: annotation.color,
            unlit: true,
            ..default()
        });

        if origin == NoteOrigin::Submitted {
            if let Err(err) = log.append_one(&annotation.to_record()) {
                warn!("[Notes] Could not save note: {err}");
            }
        }
        debug!(
            "[Notes] Placing {:?} on `{}`",
            annotation.note,
            annotation.anchor.add_to()
        );

        let mut label = commands.spawn((
            Name::new(format!("note {}", annotation.anchor.add_to())),
            Transform::from_translation(placement.translation),
            Visibility::default(),
            NoteLabel(annotation),
        ));
        label.with_children(|parent| {
            parent.spawn((
                Mesh3d(mesh),
                MeshMaterial3d(material),
                Transform::from_xyz(-half_width, 0.0, 0.0),
                NoteGlyphs,
            ));
        });
        if let Some(parent) = placement.parent {
            label.insert(ChildOf(parent));
        }
    }
}
