//! Typeface font asset
//!
//! Loads glyph outline fonts in the typeface JSON format (as produced by
//! facetype.js) through Bevy's asset server, so fonts arrive asynchronously
//! like every other asset.

use bevy::{
    asset::{io::Reader, AssetLoader, LoadContext},
    math::Vec2,
    prelude::*,
    reflect::TypePath,
};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

/// Registers the [`TypefaceFont`] asset and its loader
pub struct TypefacePlugin;

impl Plugin for TypefacePlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<TypefaceFont>()
            .register_asset_loader(TypefaceFontLoader);
    }
}

#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("could not read font: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse font: {0}")]
    Json(#[from] serde_json::Error),
}

/// One drawing instruction of a glyph outline, in font units
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutlineCommand {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadTo { ctrl: Vec2, to: Vec2 },
    CubicTo { ctrl1: Vec2, ctrl2: Vec2, to: Vec2 },
    Close,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// Horizontal advance in font units
    pub advance: f32,
    pub outline: Vec<OutlineCommand>,
}

/// A parsed glyph outline font
#[derive(Asset, TypePath, Debug, Clone)]
pub struct TypefaceFont {
    pub family: String,
    /// Font units per em
    pub resolution: f32,
    /// Distance between baselines in font units
    pub line_height: f32,
    glyphs: HashMap<char, Glyph>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTypeface {
    glyphs: HashMap<String, RawGlyph>,
    resolution: f32,
    bounding_box: RawBoundingBox,
    #[serde(default)]
    underline_thickness: f32,
    #[serde(default)]
    family_name: String,
}

#[derive(Deserialize)]
struct RawGlyph {
    ha: f32,
    #[serde(default)]
    o: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBoundingBox {
    y_min: f32,
    y_max: f32,
}

impl TypefaceFont {
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, FontLoadError> {
        let raw: RawTypeface = serde_json::from_slice(bytes)?;

        let mut glyphs = HashMap::new();
        for (key, glyph) in raw.glyphs {
            let mut chars = key.chars();
            let (Some(ch), None) = (chars.next(), chars.next()) else {
                continue;
            };
            let outline = match glyph.o.as_deref().map(parse_outline).transpose() {
                Ok(outline) => outline.unwrap_or_default(),
                Err(token) => {
                    warn!("[Font] Glyph {ch:?} has a bad outline token `{token}`, drawing it empty");
                    Vec::new()
                }
            };
            glyphs.insert(
                ch,
                Glyph {
                    advance: glyph.ha,
                    outline,
                },
            );
        }

        Ok(Self {
            family: raw.family_name,
            resolution: raw.resolution,
            line_height: raw.bounding_box.y_max - raw.bounding_box.y_min
                + raw.underline_thickness,
            glyphs,
        })
    }

    /// Glyph for `ch`, falling back to `?` when the font lacks it
    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch).or_else(|| self.glyphs.get(&'?'))
    }
}

/// Parse an outline string such as `m 0 0 l 10 0 q 20 10 15 5`.
///
/// Curve commands list their end point first, then the control points.
/// Returns the offending token on failure.
fn parse_outline(source: &str) -> Result<Vec<OutlineCommand>, String> {
    let mut tokens = source.split_whitespace();
    let mut commands = Vec::new();

    let next_point = |tokens: &mut std::str::SplitWhitespace<'_>| -> Result<Vec2, String> {
        let mut coord = || -> Result<f32, String> {
            let token = tokens.next().ok_or_else(|| "<end>".to_string())?;
            token.parse::<f32>().map_err(|_| token.to_string())
        };
        let x = coord()?;
        let y = coord()?;
        Ok(Vec2::new(x, y))
    };

    while let Some(command) = tokens.next() {
        let parsed = match command {
            "m" => OutlineCommand::MoveTo(next_point(&mut tokens)?),
            "l" => OutlineCommand::LineTo(next_point(&mut tokens)?),
            "q" => {
                let to = next_point(&mut tokens)?;
                let ctrl = next_point(&mut tokens)?;
                OutlineCommand::QuadTo { ctrl, to }
            }
            "b" => {
                let to = next_point(&mut tokens)?;
                let ctrl1 = next_point(&mut tokens)?;
                let ctrl2 = next_point(&mut tokens)?;
                OutlineCommand::CubicTo { ctrl1, ctrl2, to }
            }
            "z" => OutlineCommand::Close,
            other => return Err(other.to_string()),
        };
        commands.push(parsed);
    }

    Ok(commands)
}

#[derive(Default)]
pub struct TypefaceFontLoader;

impl AssetLoader for TypefaceFontLoader {
    type Asset = TypefaceFont;
    type Settings = ();
    type Error = FontLoadError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &(),
        _load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        let font = TypefaceFont::from_json_slice(&bytes)?;
        info!("[Font] Loaded {} ({} glyphs)", font.family, font.glyphs.len());
        Ok(font)
    }

    fn extensions(&self) -> &[&str] {
        &["typeface.json"]
    }
}
