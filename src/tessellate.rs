use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;

use crate::color::Color;
use crate::scene::{Arrow, Disc, Glow, Panel, Rect, Ring, Scene, Shape, Stroke};
use crate::wgpu::shape_vertex::ShapeVertex;

const CIRCLE_STEPS: usize = 48;
const SMALL_CIRCLE_STEPS: usize = 12;
const CORNER_STEPS: usize = 8;
const MITER_LIMIT: f32 = 2.0;

/// Halo layers drawn under a glowing shape: (spread multiple, alpha).
fn glow_layers(glow: Glow) -> &'static [(f32, f32)] {
    match glow {
        Glow::None => &[],
        Glow::Soft => &[(2.0, 0.12), (1.0, 0.25)],
        Glow::Strong => &[(2.0, 0.15), (1.0, 0.3)],
    }
}

/// Triangle list for every shape of the scene, back to front.
pub fn tessellate(scene: &Scene) -> Vec<ShapeVertex> {
    let mut mesh = Mesh::default();
    for node in &scene.nodes {
        mesh.shape(&node.shape);
    }
    mesh.vertices
}

#[derive(Default)]
pub struct Mesh {
    pub vertices: Vec<ShapeVertex>,
}

impl Mesh {
    pub fn shape(&mut self, shape: &Shape) {
        if shape.opacity() <= 0.0 {
            return;
        }
        match shape {
            Shape::Disc(disc) => {
                for (spread, alpha) in glow_layers(disc.glow) {
                    self.disc(disc, spread * disc.glow.spread(), *alpha);
                }
                self.disc(disc, 0.0, 1.0);
            }
            Shape::Ring(ring) => {
                for (spread, alpha) in glow_layers(ring.glow) {
                    self.ring(ring, spread * ring.glow.spread(), *alpha);
                }
                self.ring(ring, 0.0, 1.0);
            }
            Shape::Stroke(stroke) => {
                for (spread, alpha) in glow_layers(stroke.glow) {
                    self.stroke(stroke, spread * stroke.glow.spread(), *alpha);
                }
                self.stroke(stroke, 0.0, 1.0);
            }
            Shape::Panel(panel) => {
                for (spread, alpha) in glow_layers(panel.glow) {
                    let halo = panel.border.map_or(panel.fill, |(color, _)| color);
                    self.rounded(
                        panel.rect,
                        panel.corner,
                        spread * panel.glow.spread(),
                        halo.fade(panel.opacity * alpha),
                    );
                }
                self.panel(panel);
            }
            Shape::Arrow(arrow) => self.arrow(arrow),
        }
    }

    fn triangle(&mut self, corners: [(Vec2, Color); 3]) {
        self.vertices
            .extend(corners.map(|(position, color)| ShapeVertex::new(position, color)));
    }

    fn quad(&mut self, corners: [(Vec2, Color); 4]) {
        let [a, b, c, d] = corners;
        self.triangle([a, b, c]);
        self.triangle([a, c, d]);
    }

    fn disc(&mut self, disc: &Disc, expand: f32, alpha: f32) {
        let radius = disc.radius + expand;
        if !radius.is_finite() || radius <= 0.0 || !disc.center.is_finite() {
            return;
        }
        let tint = |point: Vec2| disc.paint.at(point).fade(disc.opacity * alpha);
        let steps = circle_steps(radius);
        let offsets = disc.paint.radial_offsets();
        if offsets.len() < 2 {
            for step in 0..steps {
                let (from, to) = (unit(step, steps), unit(step + 1, steps));
                let (a, b) = (disc.center + from * radius, disc.center + to * radius);
                self.triangle([(disc.center, tint(disc.center)), (a, tint(a)), (b, tint(b))]);
            }
            return;
        }
        // concentric bands so every gradient stop lands on a vertex
        let mut fractions: Vec<f32> = offsets
            .into_iter()
            .map(|offset| offset.clamp(0.0, 1.0))
            .chain([0.0, 1.0])
            .collect();
        fractions.sort_by(f32::total_cmp);
        fractions.dedup();
        for band in fractions.windows(2) {
            let (inner, outer) = (band[0] * radius, band[1] * radius);
            self.annulus(disc.center, inner, outer, steps, &tint);
        }
    }

    fn ring(&mut self, ring: &Ring, expand: f32, alpha: f32) {
        let half = ring.width / 2.0 + expand;
        if !half.is_finite()
            || half <= 0.0
            || !ring.center.is_finite()
            || !ring.radius.is_finite()
        {
            return;
        }
        let inner = (ring.radius - half).max(0.0);
        let outer = ring.radius + half;
        let tint = |point: Vec2| ring.paint.at(point).fade(ring.opacity * alpha);
        self.annulus(ring.center, inner, outer, circle_steps(outer).max(CIRCLE_STEPS * 2), &tint);
    }

    fn annulus(
        &mut self,
        center: Vec2,
        inner: f32,
        outer: f32,
        steps: usize,
        tint: &dyn Fn(Vec2) -> Color,
    ) {
        for step in 0..steps {
            let (from, to) = (unit(step, steps), unit(step + 1, steps));
            let corners = [
                center + from * inner,
                center + from * outer,
                center + to * outer,
                center + to * inner,
            ];
            self.quad(corners.map(|point| (point, tint(point))));
        }
    }

    fn stroke(&mut self, stroke: &Stroke, expand: f32, alpha: f32) {
        let half = stroke.width / 2.0 + expand;
        let points = stroke.line.points();
        if points.len() < 2 || !half.is_finite() || half <= 0.0 {
            return;
        }
        let tint = |point: Vec2| stroke.paint.at(point).fade(stroke.opacity * alpha);
        let offsets: Vec<Vec2> = (0..points.len())
            .map(|index| miter(points, index) * half)
            .collect();
        for index in 0..points.len() - 1 {
            let (a, b) = (points[index], points[index + 1]);
            if a == b {
                continue;
            }
            let (oa, ob) = (offsets[index], offsets[index + 1]);
            let corners = [a + oa, b + ob, b - ob, a - oa];
            self.quad(corners.map(|point| (point, tint(point))));
        }
    }

    fn panel(&mut self, panel: &Panel) {
        self.rounded(panel.rect, panel.corner, 0.0, panel.fill.fade(panel.opacity));
        if let Some((color, width)) = panel.border {
            let color = color.fade(panel.opacity);
            let outside = rounded_outline(panel.rect, panel.corner, width / 2.0);
            let inside = rounded_outline(panel.rect, panel.corner, -width / 2.0);
            let count = outside.len();
            for index in 0..count {
                let next = (index + 1) % count;
                self.quad([
                    (inside[index], color),
                    (outside[index], color),
                    (outside[next], color),
                    (inside[next], color),
                ]);
            }
        }
    }

    fn rounded(&mut self, rect: Rect, corner: f32, expand: f32, color: Color) {
        let outline = rounded_outline(rect, corner, expand);
        let center = rect.center();
        for index in 0..outline.len() {
            let next = (index + 1) % outline.len();
            self.triangle([(center, color), (outline[index], color), (outline[next], color)]);
        }
    }

    fn arrow(&mut self, arrow: &Arrow) {
        let Some(direction) = arrow.direction.try_normalize() else {
            return;
        };
        let color = arrow.color.fade(arrow.opacity);
        let base = arrow.tip - direction * arrow.length;
        let side = direction.perp() * (arrow.width / 2.0);
        self.triangle([(arrow.tip, color), (base + side, color), (base - side, color)]);
    }
}

fn circle_steps(radius: f32) -> usize {
    if radius < 6.0 {
        SMALL_CIRCLE_STEPS
    } else {
        CIRCLE_STEPS
    }
}

fn unit(step: usize, steps: usize) -> Vec2 {
    Vec2::from_angle(step as f32 / steps as f32 * TAU)
}

/// Offset direction at a polyline vertex, scaled so both adjoining edges
/// keep their width, up to the miter limit.
fn miter(points: &[Vec2], index: usize) -> Vec2 {
    let incoming = index
        .checked_sub(1)
        .and_then(|previous| (points[index] - points[previous]).try_normalize());
    let outgoing = points
        .get(index + 1)
        .and_then(|next| (*next - points[index]).try_normalize());
    match (incoming, outgoing) {
        (Some(incoming), Some(outgoing)) => {
            let normal = incoming.perp();
            let Some(bisector) = (incoming + outgoing).try_normalize() else {
                return normal;
            };
            let miter = bisector.perp();
            let scale = 1.0 / miter.dot(normal).max(1.0 / MITER_LIMIT);
            miter * scale
        }
        (Some(direction), None) | (None, Some(direction)) => direction.perp(),
        (None, None) => Vec2::ZERO,
    }
}

/// Corner-rounded rectangle outline, grown outward by `expand`.
fn rounded_outline(rect: Rect, corner: f32, expand: f32) -> Vec<Vec2> {
    let half = rect.size() / 2.0;
    let radius = corner.clamp(0.0, half.x.min(half.y));
    let inner = (half - Vec2::splat(radius)).max(Vec2::ZERO);
    let grown = (radius + expand).max(0.0);
    let center = rect.center();
    let corners = [
        (Vec2::new(inner.x, inner.y), 0.0),
        (Vec2::new(-inner.x, inner.y), FRAC_PI_2),
        (Vec2::new(-inner.x, -inner.y), 2.0 * FRAC_PI_2),
        (Vec2::new(inner.x, -inner.y), 3.0 * FRAC_PI_2),
    ];
    corners
        .into_iter()
        .flat_map(|(offset, start)| {
            (0..=CORNER_STEPS).map(move |step| {
                let angle = start + step as f32 / CORNER_STEPS as f32 * FRAC_PI_2;
                center + offset + Vec2::from_angle(angle) * grown
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Polyline;
    use crate::scene::Paint;

    fn solid(color: Color) -> Paint {
        Paint::Solid(color)
    }

    #[test]
    fn discs_and_rings_produce_whole_triangles() {
        let mut mesh = Mesh::default();
        mesh.shape(&Shape::Disc(Disc {
            center: Vec2::ZERO,
            radius: 10.0,
            paint: solid(Color::WHITE),
            opacity: 1.0,
            glow: Glow::None,
        }));
        assert_eq!(mesh.vertices.len(), CIRCLE_STEPS * 3);

        let mut ring = Mesh::default();
        ring.shape(&Shape::Ring(Ring {
            center: Vec2::ZERO,
            radius: 20.0,
            width: 2.0,
            paint: solid(Color::WHITE),
            opacity: 0.5,
            glow: Glow::Soft,
        }));
        assert!(!ring.vertices.is_empty());
        assert_eq!(ring.vertices.len() % 3, 0);
        assert!(ring
            .vertices
            .iter()
            .all(|vertex| vertex.color[3] <= 0.5 + 1e-6));
    }

    #[test]
    fn stroke_keeps_its_width() {
        let mut mesh = Mesh::default();
        mesh.shape(&Shape::Stroke(Stroke {
            line: Polyline::new(vec![Vec2::ZERO, Vec2::new(10.0, 0.0)]),
            width: 4.0,
            paint: solid(Color::WHITE),
            opacity: 1.0,
            glow: Glow::None,
        }));
        assert_eq!(mesh.vertices.len(), 6);
        let ys: Vec<f32> = mesh.vertices.iter().map(|vertex| vertex.position[1]).collect();
        assert!(ys.iter().all(|y| (y.abs() - 2.0).abs() < 1e-5));
    }

    #[test]
    fn invisible_and_degenerate_shapes_are_skipped() {
        let mut mesh = Mesh::default();
        mesh.shape(&Shape::Disc(Disc {
            center: Vec2::ZERO,
            radius: 10.0,
            paint: solid(Color::WHITE),
            opacity: 0.0,
            glow: Glow::Strong,
        }));
        mesh.shape(&Shape::Disc(Disc {
            center: Vec2::NAN,
            radius: 10.0,
            paint: solid(Color::WHITE),
            opacity: 1.0,
            glow: Glow::None,
        }));
        mesh.shape(&Shape::Stroke(Stroke {
            line: Polyline::new(vec![Vec2::ZERO]),
            width: 4.0,
            paint: solid(Color::WHITE),
            opacity: 1.0,
            glow: Glow::None,
        }));
        assert!(mesh.vertices.is_empty());
    }

    #[test]
    fn miter_at_right_angle() {
        let points = [Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)];
        let offset = miter(&points, 1);
        assert!((offset.length() - 2f32.sqrt()).abs() < 1e-5);
        assert_eq!(miter(&points, 0), Vec2::Y);
    }

    #[test]
    fn rounded_outline_stays_inside_rect() {
        let rect = Rect::around(Vec2::ZERO, Vec2::new(100.0, 40.0));
        let outline = rounded_outline(rect, 20.0, 0.0);
        assert_eq!(outline.len(), 4 * (CORNER_STEPS + 1));
        assert!(outline
            .iter()
            .all(|point| rect.scaled(1.0001).contains(*point)));
    }
}
