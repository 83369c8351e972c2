//! Extruded text geometry
//!
//! Turns a string into a solid 3D mesh using the glyph outlines of a
//! [`TypefaceFont`]. Text runs along +X from the origin with its baseline on
//! y = 0; the back face lies at z = 0 and the front face at z = depth.

use bevy::{
    asset::RenderAssetUsages, prelude::*, render::render_resource::PrimitiveTopology,
};
use lyon_tessellation::{
    geometry_builder::simple_builder,
    math::{point, Point},
    path::{iterator::PathIterator, Path, PathEvent},
    FillOptions, FillTessellator, VertexBuffers,
};

use super::plugins::typeface::{OutlineCommand, TypefaceFont};

/// Unindexed triangle list for a piece of text
pub struct TextGeometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    /// Extent of the geometry along X
    pub width: f32,
}

impl TextGeometry {
    pub fn into_mesh(self) -> Mesh {
        Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
            .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, self.positions)
            .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals)
    }
}

/// Lay out `text` with `font` at glyph height `size` and extrude it by `depth`
pub fn build_text_geometry(
    font: &TypefaceFont,
    text: &str,
    size: f32,
    depth: f32,
    tolerance: f32,
) -> TextGeometry {
    let scale = size / font.resolution;
    let mut extrusion = Extrusion::new(depth);
    let mut pen = Vec2::ZERO;

    for ch in text.chars() {
        if ch == '\n' {
            pen.x = 0.0;
            pen.y -= font.line_height * scale;
            continue;
        }
        let Some(glyph) = font.glyph(ch) else {
            debug!("[Text] No glyph for {ch:?} and no fallback, skipping");
            continue;
        };
        if !glyph.outline.is_empty() {
            let path = glyph_path(&glyph.outline, scale, pen);
            extrusion.caps(&path, tolerance);
            extrusion.walls(&path, tolerance);
        }
        pen.x += glyph.advance * scale;
    }

    extrusion.finish()
}

fn glyph_path(outline: &[OutlineCommand], scale: f32, pen: Vec2) -> Path {
    let place = |v: Vec2| {
        let p = v * scale + pen;
        point(p.x, p.y)
    };

    let mut builder = Path::builder();
    let mut open = false;
    for command in outline {
        match *command {
            OutlineCommand::MoveTo(to) => {
                if open {
                    builder.end(true);
                }
                builder.begin(place(to));
                open = true;
            }
            OutlineCommand::LineTo(to) if open => {
                builder.line_to(place(to));
            }
            OutlineCommand::QuadTo { ctrl, to } if open => {
                builder.quadratic_bezier_to(place(ctrl), place(to));
            }
            OutlineCommand::CubicTo { ctrl1, ctrl2, to } if open => {
                builder.cubic_bezier_to(place(ctrl1), place(ctrl2), place(to));
            }
            OutlineCommand::Close if open => {
                builder.end(true);
                open = false;
            }
            // Drawing without a current point has nothing to attach to
            _ => {}
        }
    }
    if open {
        builder.end(true);
    }
    builder.build()
}

struct Extrusion {
    depth: f32,
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    min_x: f32,
    max_x: f32,
}

impl Extrusion {
    fn new(depth: f32) -> Self {
        Self {
            depth,
            positions: Vec::new(),
            normals: Vec::new(),
            min_x: f32::INFINITY,
            max_x: f32::NEG_INFINITY,
        }
    }

    fn triangle(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        let normal = (b - a).cross(c - a).normalize_or_zero();
        for v in [a, b, c] {
            self.min_x = self.min_x.min(v.x);
            self.max_x = self.max_x.max(v.x);
            self.positions.push(v.to_array());
            self.normals.push(normal.to_array());
        }
    }

    /// Front and back faces of a filled outline
    fn caps(&mut self, path: &Path, tolerance: f32) {
        let mut buffers: VertexBuffers<Point, u16> = VertexBuffers::new();
        let mut tessellator = FillTessellator::new();
        if let Err(err) = tessellator.tessellate_path(
            path,
            &FillOptions::tolerance(tolerance),
            &mut simple_builder(&mut buffers),
        ) {
            warn!("[Text] Glyph fill failed: {err:?}");
            return;
        }

        let depth = self.depth;
        for tri in buffers.indices.chunks_exact(3) {
            let [a, mut b, mut c] = [tri[0], tri[1], tri[2]].map(|i| {
                let p = buffers.vertices[i as usize];
                Vec2::new(p.x, p.y)
            });
            // Counter-clockwise in XY so the front cap faces +Z
            if (b - a).perp_dot(c - a) < 0.0 {
                std::mem::swap(&mut b, &mut c);
            }
            self.triangle(a.extend(depth), b.extend(depth), c.extend(depth));
            self.triangle(a.extend(0.0), c.extend(0.0), b.extend(0.0));
        }
    }

    /// Side walls along every flattened contour edge, facing out of the fill
    fn walls(&mut self, path: &Path, tolerance: f32) {
        let mut contours = flattened_contours(path, tolerance);

        // Outer contours run counter-clockwise and holes clockwise, so the
        // filled side of every edge is on its left
        let parity: Vec<bool> = contours
            .iter()
            .enumerate()
            .map(|(index, contour)| {
                let enclosing = contours
                    .iter()
                    .enumerate()
                    .filter(|&(other, outline)| {
                        other != index && contains(outline, contour[0])
                    })
                    .count();
                enclosing % 2 == 1
            })
            .collect();
        for (contour, is_hole) in contours.iter_mut().zip(parity) {
            if (signed_area(contour) > 0.0) == is_hole {
                contour.reverse();
            }
        }

        for contour in &contours {
            for (index, &from) in contour.iter().enumerate() {
                let to = contour[(index + 1) % contour.len()];
                self.wall(from, to);
            }
        }
    }

    fn wall(&mut self, a: Vec2, b: Vec2) {
        if a == b {
            return;
        }
        let (a0, b0) = (a.extend(0.0), b.extend(0.0));
        let (a1, b1) = (a.extend(self.depth), b.extend(self.depth));
        self.triangle(a0, b0, b1);
        self.triangle(a0, b1, a1);
    }

    fn finish(self) -> TextGeometry {
        let width = if self.positions.is_empty() {
            0.0
        } else {
            self.max_x - self.min_x
        };
        TextGeometry {
            positions: self.positions,
            normals: self.normals,
            width,
        }
    }
}

/// Closed polylines of every sub-path, without the repeated closing point
fn flattened_contours(path: &Path, tolerance: f32) -> Vec<Vec<Vec2>> {
    let mut contours = Vec::new();
    let mut current: Vec<Vec2> = Vec::new();
    for event in path.iter().flattened(tolerance) {
        match event {
            PathEvent::Begin { at } => {
                current.clear();
                current.push(Vec2::new(at.x, at.y));
            }
            PathEvent::Line { to, .. } => current.push(Vec2::new(to.x, to.y)),
            PathEvent::End { .. } => {
                if current.len() > 1 && current.first() == current.last() {
                    current.pop();
                }
                if current.len() >= 3 {
                    contours.push(std::mem::take(&mut current));
                }
                current.clear();
            }
            _ => {}
        }
    }
    contours
}

/// Shoelace area; positive for counter-clockwise contours
fn signed_area(contour: &[Vec2]) -> f32 {
    let mut twice = 0.0;
    for (index, &a) in contour.iter().enumerate() {
        let b = contour[(index + 1) % contour.len()];
        twice += a.perp_dot(b);
    }
    twice * 0.5
}

/// Even-odd point-in-polygon test
fn contains(contour: &[Vec2], point: Vec2) -> bool {
    let mut inside = false;
    for (index, &a) in contour.iter().enumerate() {
        let b = contour[(index + 1) % contour.len()];
        if (a.y > point.y) != (b.y > point.y) {
            let x = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if point.x < x {
                inside = !inside;
            }
        }
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::plugins::typeface::tests::SQUARE_FONT;

    const TOLERANCE: f32 = 0.01;

    fn font() -> TypefaceFont {
        TypefaceFont::from_json_slice(SQUARE_FONT.as_bytes()).expect("test font parses")
    }

    /// Area of the triangles lying entirely in the plane z = `z`
    fn area_at(geometry: &TextGeometry, z: f32) -> f32 {
        geometry
            .positions
            .chunks_exact(3)
            .filter(|tri| tri.iter().all(|p| (p[2] - z).abs() < 1e-6))
            .map(|tri| {
                let [a, b, c] = [tri[0], tri[1], tri[2]].map(Vec3::from_array);
                (b - a).cross(c - a).length() * 0.5
            })
            .sum()
    }

    #[test]
    fn width_spans_every_glyph() {
        // size 10 at resolution 100: each H is 8 wide and advances 10
        let geometry = build_text_geometry(&font(), "HH", 10.0, 1.0, TOLERANCE);
        assert!((geometry.width - 18.0).abs() < 1e-4, "width {}", geometry.width);
    }

    #[test]
    fn holes_are_left_open() {
        let geometry = build_text_geometry(&font(), "A", 10.0, 2.0, TOLERANCE);
        // 8x8 square minus a 4x4 hole, on both faces
        assert!((area_at(&geometry, 2.0) - 48.0).abs() < 1e-3);
        assert!((area_at(&geometry, 0.0) - 48.0).abs() < 1e-3);
    }

    #[test]
    fn walls_join_the_two_faces() {
        let geometry = build_text_geometry(&font(), "H", 10.0, 3.0, TOLERANCE);
        let spans_depth = geometry.positions.chunks_exact(3).any(|tri| {
            tri.iter().any(|p| p[2] == 0.0) && tri.iter().any(|p| p[2] == 3.0)
        });
        assert!(spans_depth);
        assert_eq!(geometry.positions.len(), geometry.normals.len());
        assert_eq!(geometry.positions.len() % 3, 0);
    }

    #[test]
    fn curved_outlines_are_filled() {
        let geometry = build_text_geometry(&font(), "o", 10.0, 1.0, TOLERANCE);
        assert!(area_at(&geometry, 1.0) > 0.0);
    }

    #[test]
    fn newline_restarts_at_the_left_margin() {
        let geometry = build_text_geometry(&font(), "H\nH", 10.0, 1.0, TOLERANCE);
        assert!((geometry.width - 8.0).abs() < 1e-4);
        let lowest = geometry
            .positions
            .iter()
            .map(|p| p[1])
            .fold(f32::INFINITY, f32::min);
        // line height is 120 font units
        assert!((lowest + 12.0).abs() < 1e-4);
    }

    #[test]
    fn blank_text_has_no_width() {
        let geometry = build_text_geometry(&font(), "   ", 5.0, 1.0, TOLERANCE);
        assert!(geometry.positions.is_empty());
        assert_eq!(geometry.width, 0.0);
    }

    #[test]
    fn unknown_characters_use_the_fallback_glyph() {
        let geometry = build_text_geometry(&font(), "#", 10.0, 1.0, TOLERANCE);
        assert!((geometry.width - 4.0).abs() < 1e-4);
    }

    /// Triangles with their face normal and centroid
    fn faces(geometry: &TextGeometry) -> Vec<(Vec3, Vec3)> {
        geometry
            .positions
            .chunks_exact(3)
            .zip(geometry.normals.chunks_exact(3))
            .map(|(tri, normals)| {
                let centroid = tri.iter().map(|p| Vec3::from_array(*p)).sum::<Vec3>() / 3.0;
                (Vec3::from_array(normals[0]), centroid)
            })
            .collect()
    }

    fn assert_faces_point_out_of_the_fill(ch: &str) {
        let depth = 2.0;
        let geometry = build_text_geometry(&font(), ch, 10.0, depth, TOLERANCE);
        // both square glyphs are centred on (4, 4) at this size
        let center = Vec2::new(4.0, 4.0);
        let (mut outer, mut hole) = (0, 0);
        for (normal, centroid) in faces(&geometry) {
            if (centroid.z - depth).abs() < 1e-6 {
                assert!(normal.z > 0.99, "{ch}: front cap faces {normal}");
            } else if centroid.z.abs() < 1e-6 {
                assert!(normal.z < -0.99, "{ch}: back cap faces {normal}");
            } else {
                let from_center = centroid.truncate() - center;
                let outward = normal.truncate().dot(from_center);
                // outer walls sit 4 from the centre, hole walls 2
                if from_center.abs().max_element() > 3.0 {
                    assert!(outward > 0.0, "{ch}: outer wall faces {normal}");
                    outer += 1;
                } else {
                    assert!(outward < 0.0, "{ch}: hole wall faces {normal}");
                    hole += 1;
                }
            }
        }
        assert_eq!((outer, hole), (8, 8), "{ch}");
    }

    #[test]
    fn faces_point_out_of_the_fill_for_either_winding() {
        // `A`: counter-clockwise outline, clockwise hole; `V` the reverse
        assert_faces_point_out_of_the_fill("A");
        assert_faces_point_out_of_the_fill("V");
    }
}
