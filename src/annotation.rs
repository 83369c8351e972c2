//! Annotation data model
//!
//! An annotation is a piece of extruded text pinned above a body, above the
//! sun, or at a free point in space. This module owns the typed value the
//! engine works with, the persisted record shape, and the validation that
//! turns untrusted form or record input into the typed value.

use bevy::color::{Color, Srgba};
use bevy::math::Vec3;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::bodies::{body_descriptor, CENTER_NAME};
use crate::config::annotation::{COORDINATE_RANGE, DEPTH_RANGE, SIZE_RANGE};

/// `addTo` value selecting a free coordinate
pub const FREE_ANCHOR: &str = "custom";

/// Where an annotation is pinned
#[derive(Debug, Clone, PartialEq)]
pub enum AnchorKind {
    /// Above the central body
    Center,
    /// Above the named orbiting body
    Body(String),
    /// At an explicit scene-space coordinate
    Free(Vec3),
}

impl AnchorKind {
    /// Parse an `addTo` value; `coordinate` is only consulted for `custom`
    pub fn parse(add_to: &str, coordinate: Option<Vec3>) -> Result<Self, AnnotationError> {
        match add_to {
            CENTER_NAME => Ok(AnchorKind::Center),
            FREE_ANCHOR => {
                let point = coordinate.ok_or(AnnotationError::MissingCoordinate)?;
                for (axis, value) in [("x", point.x), ("y", point.y), ("z", point.z)] {
                    check_range(axis, value, COORDINATE_RANGE)?;
                }
                Ok(AnchorKind::Free(point))
            }
            name if body_descriptor(name).is_some() => Ok(AnchorKind::Body(name.to_string())),
            other => Err(AnnotationError::UnknownAnchor(other.to_string())),
        }
    }

    /// The `addTo` value this anchor round-trips to
    pub fn add_to(&self) -> &str {
        match self {
            AnchorKind::Center => CENTER_NAME,
            AnchorKind::Body(name) => name,
            AnchorKind::Free(_) => FREE_ANCHOR,
        }
    }
}

/// Rejected annotation input
#[derive(Debug, Error, PartialEq)]
pub enum AnnotationError {
    #[error("note text is empty")]
    EmptyNote,
    #[error("unknown anchor `{0}`")]
    UnknownAnchor(String),
    #[error("a custom anchor needs x, y and z")]
    MissingCoordinate,
    #[error("{field} = {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    #[error("`{0}` is not a hex color")]
    InvalidColor(String),
}

fn check_range(field: &'static str, value: f32, (min, max): (f32, f32)) -> Result<(), AnnotationError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(AnnotationError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

/// A validated annotation
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub note: String,
    pub anchor: AnchorKind,
    /// Color as entered, kept for persistence
    pub color_hex: String,
    pub color: Color,
    /// Glyph height in scene units
    pub size: f32,
    /// Extrusion depth in scene units
    pub depth: f32,
}

impl Annotation {
    pub fn new(
        note: impl Into<String>,
        anchor: AnchorKind,
        color_hex: impl Into<String>,
        size: f32,
        depth: f32,
    ) -> Result<Self, AnnotationError> {
        let note = note.into();
        if note.trim().is_empty() {
            return Err(AnnotationError::EmptyNote);
        }
        let color_hex = color_hex.into();
        let color = Srgba::hex(&color_hex)
            .map(Color::Srgba)
            .map_err(|_| AnnotationError::InvalidColor(color_hex.clone()))?;
        check_range("size", size, SIZE_RANGE)?;
        check_range("height", depth, DEPTH_RANGE)?;

        Ok(Self {
            note,
            anchor,
            color_hex,
            color,
            size,
            depth,
        })
    }

    /// Persisted form of this annotation
    pub fn to_record(&self) -> AnnotationRecord {
        let point = match self.anchor {
            AnchorKind::Free(point) => point,
            _ => Vec3::ZERO,
        };
        AnnotationRecord {
            note: self.note.clone(),
            add_to: self.anchor.add_to().to_string(),
            x: point.x,
            y: point.y,
            z: point.z,
            color: self.color_hex.clone(),
            size: self.size,
            height: self.depth,
        }
    }
}

/// One entry of the persisted annotation log
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnnotationRecord {
    pub note: String,
    #[serde(rename = "addTo")]
    pub add_to: String,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub x: f32,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub y: f32,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub z: f32,
    pub color: String,
    #[serde(deserialize_with = "lenient_f32")]
    pub size: f32,
    /// Extrusion depth; keeps the form field name
    #[serde(deserialize_with = "lenient_f32")]
    pub height: f32,
}

impl TryFrom<AnnotationRecord> for Annotation {
    type Error = AnnotationError;

    fn try_from(record: AnnotationRecord) -> Result<Self, Self::Error> {
        let coordinate = Vec3::new(record.x, record.y, record.z);
        let anchor = AnchorKind::parse(&record.add_to, Some(coordinate))?;
        Annotation::new(record.note, anchor, record.color, record.size, record.height)
    }
}

/// Payload of a note submission from a UI front end
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AnnotationForm {
    pub note: String,
    #[serde(rename = "addTo")]
    pub add_to: String,
    pub color: String,
    #[serde(deserialize_with = "lenient_f32")]
    pub size: f32,
    #[serde(deserialize_with = "lenient_f32")]
    pub height: f32,
    #[serde(default, deserialize_with = "lenient_opt_f32")]
    pub x: Option<f32>,
    #[serde(default, deserialize_with = "lenient_opt_f32")]
    pub y: Option<f32>,
    #[serde(default, deserialize_with = "lenient_opt_f32")]
    pub z: Option<f32>,
}

impl AnnotationForm {
    /// Check every field and build the typed annotation
    pub fn validate(self) -> Result<Annotation, AnnotationError> {
        let coordinate = match (self.x, self.y, self.z) {
            (Some(x), Some(y), Some(z)) => Some(Vec3::new(x, y, z)),
            _ => None,
        };
        let anchor = AnchorKind::parse(&self.add_to, coordinate)?;
        Annotation::new(self.note, anchor, self.color, self.size, self.height)
    }
}

// HTML number inputs hand their values over as strings, so both shapes are
// found in stored logs.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f32),
    Text(String),
}

fn lenient_f32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn lenient_opt_f32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f32>, D::Error> {
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(value)) => Ok(Some(value)),
        Some(NumberOrString::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(NumberOrString::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(add_to: &str) -> AnnotationForm {
        AnnotationForm {
            note: "Hello".into(),
            add_to: add_to.into(),
            color: "#00ff00".into(),
            size: 5.0,
            height: 1.0,
            x: None,
            y: None,
            z: None,
        }
    }

    #[test]
    fn parses_every_anchor_kind() {
        assert_eq!(AnchorKind::parse("sun", None), Ok(AnchorKind::Center));
        assert_eq!(
            AnchorKind::parse("earth", None),
            Ok(AnchorKind::Body("earth".into()))
        );
        assert_eq!(
            AnchorKind::parse("custom", Some(Vec3::new(10.0, 20.0, 30.0))),
            Ok(AnchorKind::Free(Vec3::new(10.0, 20.0, 30.0)))
        );
        assert_eq!(
            AnchorKind::parse("vulcan", None),
            Err(AnnotationError::UnknownAnchor("vulcan".into()))
        );
    }

    #[test]
    fn custom_anchor_requires_all_three_coordinates() {
        let mut partial = form("custom");
        partial.x = Some(1.0);
        partial.y = Some(2.0);
        assert_eq!(partial.validate(), Err(AnnotationError::MissingCoordinate));
    }

    #[test]
    fn coordinates_are_ignored_for_body_anchors() {
        let mut on_mars = form("mars");
        on_mars.x = Some(999.0);
        let annotation = on_mars.validate().expect("valid form");
        assert_eq!(annotation.anchor, AnchorKind::Body("mars".into()));
        assert_eq!(annotation.to_record().x, 0.0);
    }

    #[test]
    fn rejects_out_of_range_fields() {
        let mut big = form("sun");
        big.size = 11.0;
        assert!(matches!(
            big.validate(),
            Err(AnnotationError::OutOfRange { field: "size", .. })
        ));

        let mut far = form("custom");
        far.x = Some(0.0);
        far.y = Some(250.0);
        far.z = Some(0.0);
        assert!(matches!(
            far.validate(),
            Err(AnnotationError::OutOfRange { field: "y", .. })
        ));
    }

    #[test]
    fn rejects_bad_color_and_blank_note() {
        let mut grey = form("sun");
        grey.color = "grey".into();
        assert_eq!(
            grey.validate(),
            Err(AnnotationError::InvalidColor("grey".into()))
        );

        let mut blank = form("sun");
        blank.note = "   ".into();
        assert_eq!(blank.validate(), Err(AnnotationError::EmptyNote));
    }

    #[test]
    fn record_accepts_numeric_strings() {
        let json = r##"{"note":"Hi","addTo":"custom","x":"10","y":20,"z":"30.5",
            "color":"#ff0000","size":"5","height":1}"##;
        let record: AnnotationRecord = serde_json::from_str(json).expect("lenient record");
        assert_eq!(record.x, 10.0);
        assert_eq!(record.z, 30.5);
        assert_eq!(record.size, 5.0);

        let annotation = Annotation::try_from(record).expect("valid record");
        assert_eq!(annotation.anchor, AnchorKind::Free(Vec3::new(10.0, 20.0, 30.5)));
    }

    #[test]
    fn record_uses_form_field_names() {
        let annotation = form("saturn").validate().expect("valid form");
        let value = serde_json::to_value(annotation.to_record()).expect("serializable");
        assert_eq!(value["addTo"], "saturn");
        assert_eq!(value["height"], 1.0);
        assert_eq!(value["color"], "#00ff00");
    }
}
