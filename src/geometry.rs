use std::f32::consts::PI;
use std::fmt::Write;

use glam::Vec2;
use serde::Serialize;

/// Center of the 800×600 drawing, shared by the loop, labels and fire.
pub const CENTER: Vec2 = Vec2::new(400.0, 300.0);
pub const LOOP_SIZE: f32 = 160.0;
pub const LABEL_RADIUS: f32 = 240.0;

const HALF_WIDTH_FACTOR: f32 = 0.7;
const HALF_HEIGHT_FACTOR: f32 = 0.35;
const CONTROL_PULL: f32 = 2.5;
const FLATTEN_STEPS: usize = 48;
/// Upper bound on dashes or spaced points cut from one polyline.
pub const MAX_PIECES: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CubicBezier {
    pub from: Vec2,
    pub control1: Vec2,
    pub control2: Vec2,
    pub to: Vec2,
}

impl CubicBezier {
    pub fn point(&self, t: f32) -> Vec2 {
        let u = 1.0 - t;
        self.from * (u * u * u)
            + self.control1 * (3.0 * u * u * t)
            + self.control2 * (3.0 * u * t * t)
            + self.to * (t * t * t)
    }
}

/// The figure-eight: four cubic curves, the last one returning to the start.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfinityPath {
    pub curves: [CubicBezier; 4],
}

impl InfinityPath {
    pub fn first_point(&self) -> Vec2 {
        self.curves[0].from
    }

    pub fn last_point(&self) -> Vec2 {
        self.curves[3].to
    }

    pub fn is_closed(&self) -> bool {
        self.first_point() == self.last_point()
    }

    /// SVG path data, `M … C … Z`.
    pub fn to_svg(&self) -> String {
        let start = self.first_point();
        let mut data = format!("M {} {}", start.x, start.y);
        for CubicBezier {
            control1,
            control2,
            to,
            ..
        } in &self.curves
        {
            let _ = write!(
                data,
                " C {} {}, {} {}, {} {}",
                control1.x, control1.y, control2.x, control2.y, to.x, to.y
            );
        }
        data.push_str(" Z");
        data
    }

    pub fn flatten(&self) -> Polyline {
        self.flatten_with(FLATTEN_STEPS)
    }

    pub fn flatten_with(&self, steps_per_curve: usize) -> Polyline {
        let steps = steps_per_curve.max(1);
        let mut points = Vec::with_capacity(self.curves.len() * steps + 1);
        points.push(self.first_point());
        for curve in &self.curves {
            points.extend((1..=steps).map(|step| curve.point(step as f32 / steps as f32)));
        }
        Polyline::new(points)
    }
}

/// Infinity curve around `center`, with half-extents `0.7·size` by `0.35·size`.
/// Returns `None` for non-finite input; a negative size collapses to the center.
pub fn infinity_path(center: Vec2, size: f32) -> Option<InfinityPath> {
    if !center.is_finite() || !size.is_finite() {
        return None;
    }
    let size = size.max(0.0);
    let a = size * HALF_WIDTH_FACTOR;
    let b = size * HALF_HEIGHT_FACTOR;
    let c = a / CONTROL_PULL;
    let at = |dx: f32, dy: f32| center + Vec2::new(dx, dy);
    let curve = |from, control1, control2, to| CubicBezier {
        from,
        control1,
        control2,
        to,
    };
    Some(InfinityPath {
        curves: [
            curve(at(-a, 0.0), at(-a, -b), at(-c, -b), at(0.0, 0.0)),
            curve(at(0.0, 0.0), at(c, b), at(a, b), at(a, 0.0)),
            curve(at(a, 0.0), at(a, -b), at(c, -b), at(0.0, 0.0)),
            curve(at(0.0, 0.0), at(-c, b), at(-a, b), at(-a, 0.0)),
        ],
    })
}

/// Polar to Cartesian around [`CENTER`], angle in degrees.
pub fn phase_position(angle: f32, radius: f32) -> Option<Vec2> {
    if !angle.is_finite() || !radius.is_finite() {
        return None;
    }
    let radian = angle.rem_euclid(360.0).to_radians();
    let radius = radius.max(0.0);
    Some(CENTER + Vec2::new(radian.cos(), radian.sin()) * radius)
}

/// Label placement on the default radius.
pub fn label_position(angle: f32) -> Option<Vec2> {
    phase_position(angle, LABEL_RADIUS)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub opacity: f32,
}

impl Particle {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.size.is_finite() && self.opacity.is_finite()
    }
}

/// Particles evenly spaced on a circle, jittered by `time` and their index.
/// Non-finite inputs yield nothing.
pub fn fire_particles(count: usize, base_radius: f32, time: f32) -> Vec<Particle> {
    if !base_radius.is_finite() || !time.is_finite() || count == 0 {
        return Vec::new();
    }
    let base_radius = base_radius.max(0.0);
    let spacing = 2.0 * PI / count as f32;
    (0..count)
        .map(|index| fire_particle(index, spacing, base_radius, time))
        .filter(Particle::is_finite)
        .collect()
}

fn fire_particle(index: usize, spacing: f32, base_radius: f32, time: f32) -> Particle {
    let i = index as f32;
    let angle = i * spacing + time * 0.5;
    let radius = base_radius + (time + i).sin() * 15.0;
    Particle {
        x: CENTER.x + angle.cos() * radius,
        y: CENTER.y + angle.sin() * radius,
        size: 2.0 + (time * 2.0 + i).sin() * 1.5,
        opacity: 0.4 + (time * 3.0 + i).sin() * 0.3,
    }
}

/// Arc-length fraction of the loop owned by segment `index` of `count`.
pub fn segment_span(index: usize, count: usize) -> (f32, f32) {
    let count = count.max(1) as f32;
    (index as f32 / count, (index + 1) as f32 / count)
}

/// A flattened path with cumulative arc lengths.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polyline {
    points: Vec<Vec2>,
    #[serde(skip)]
    distances: Vec<f32>,
}

impl Polyline {
    pub fn new(points: Vec<Vec2>) -> Self {
        let mut distances = Vec::with_capacity(points.len());
        let mut total = 0.0;
        for (index, point) in points.iter().enumerate() {
            if index > 0 {
                total += point.distance(points[index - 1]);
            }
            distances.push(total);
        }
        Self { points, distances }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.len() < 2
    }

    pub fn length(&self) -> f32 {
        self.distances.last().copied().unwrap_or(0.0)
    }

    pub fn point_at(&self, fraction: f32) -> Option<Vec2> {
        self.point_at_distance(fraction.clamp(0.0, 1.0) * self.length())
    }

    pub fn point_at_distance(&self, distance: f32) -> Option<Vec2> {
        let (index, t) = self.locate(distance)?;
        let from = self.points[index];
        match self.points.get(index + 1) {
            Some(to) => Some(from.lerp(*to, t)),
            None => Some(from),
        }
    }

    /// Unit direction of travel at the given fraction.
    pub fn tangent_at(&self, fraction: f32) -> Option<Vec2> {
        let (index, _) = self.locate(fraction.clamp(0.0, 1.0) * self.length())?;
        let index = index.min(self.points.len().checked_sub(2)?);
        (self.points[index + 1] - self.points[index]).try_normalize()
    }

    /// The part of the path between two arc-length fractions.
    pub fn slice(&self, from: f32, to: f32) -> Polyline {
        let length = self.length();
        self.slice_distance(from.clamp(0.0, 1.0) * length, to.clamp(0.0, 1.0) * length)
    }

    pub fn slice_distance(&self, from: f32, to: f32) -> Polyline {
        let (Some(start), Some(end)) = (self.point_at_distance(from), self.point_at_distance(to))
        else {
            return Polyline::new(Vec::new());
        };
        if to <= from {
            return Polyline::new(Vec::new());
        }
        let mut points = vec![start];
        points.extend(
            self.points
                .iter()
                .zip(&self.distances)
                .filter(|(_, distance)| **distance > from && **distance < to)
                .map(|(point, _)| *point),
        );
        points.push(end);
        Polyline::new(points)
    }

    /// Dash pieces of an SVG-style `dash gap` pattern shifted by `offset`.
    /// At most `MAX_PIECES` dashes are produced.
    pub fn dashes(&self, dash: f32, gap: f32, offset: f32) -> Vec<Polyline> {
        let period = dash + gap;
        let length = self.length();
        if !period.is_finite() || period <= 0.0 || !offset.is_finite() || length <= 0.0 {
            return Vec::new();
        }
        let first = (-offset).rem_euclid(period) - period;
        let count = ((length - first) / period).ceil();
        let count = if count.is_finite() {
            (count as usize).min(MAX_PIECES)
        } else {
            MAX_PIECES
        };
        (0..count)
            .filter_map(|index| {
                let start = first + index as f32 * period;
                let from = start.max(0.0);
                let to = (start + dash).min(length);
                (to > from).then(|| self.slice_distance(from, to))
            })
            .collect()
    }

    /// Points spaced evenly along the path, beginning at its start.
    /// At most `MAX_PIECES + 1` points are produced.
    pub fn every(&self, spacing: f32) -> Vec<Vec2> {
        let length = self.length();
        if !spacing.is_finite() || spacing <= 0.0 || self.points.is_empty() {
            return Vec::new();
        }
        let count = ((length / spacing).floor() as usize).min(MAX_PIECES);
        (0..=count)
            .filter_map(|step| self.point_at_distance(step as f32 * spacing))
            .collect()
    }

    pub fn distance_to(&self, point: Vec2) -> f32 {
        match self.points.as_slice() {
            [] => f32::INFINITY,
            [only] => only.distance(point),
            points => points
                .windows(2)
                .map(|pair| distance_to_segment(point, pair[0], pair[1]))
                .fold(f32::INFINITY, f32::min),
        }
    }

    fn locate(&self, distance: f32) -> Option<(usize, f32)> {
        if self.points.is_empty() {
            return None;
        }
        let distance = distance.clamp(0.0, self.length());
        let index = self
            .distances
            .partition_point(|cumulative| *cumulative <= distance)
            .saturating_sub(1);
        let Some(next) = self.distances.get(index + 1) else {
            return Some((index, 0.0));
        };
        let span = next - self.distances[index];
        let t = if span > 0.0 {
            (distance - self.distances[index]) / span
        } else {
            0.0
        };
        Some((index, t))
    }
}

fn distance_to_segment(point: Vec2, from: Vec2, to: Vec2) -> f32 {
    let along = to - from;
    let length_squared = along.length_squared();
    if length_squared <= f32::EPSILON {
        return point.distance(from);
    }
    let t = ((point - from).dot(along) / length_squared).clamp(0.0, 1.0);
    point.distance(from + along * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        a.distance(b) < 1e-3
    }

    #[test]
    fn infinity_path_is_closed_and_symmetric() {
        let path = infinity_path(CENTER, LOOP_SIZE).unwrap();
        assert!(path.is_closed());
        assert_eq!(path.first_point(), Vec2::new(400.0 - 112.0, 300.0));
        assert_eq!(path.curves[1].to, Vec2::new(400.0 + 112.0, 300.0));
        assert_eq!(path.curves[0].to, CENTER);
        assert_eq!(path.curves[2].to, CENTER);
        assert_eq!(path.curves[0].control1, Vec2::new(288.0, 300.0 - 56.0));
        let flat = path.flatten();
        assert_eq!(flat.points().first(), flat.points().last());
    }

    #[test]
    fn infinity_path_svg_data() {
        let path = infinity_path(Vec2::ZERO, 10.0).unwrap();
        let svg = path.to_svg();
        assert!(svg.starts_with("M -7 0 C -7 -3.5, -2.8 -3.5, 0 0"));
        assert!(svg.ends_with(" Z"));
        assert_eq!(svg.matches(" C ").count(), 4);
    }

    #[test]
    fn infinity_path_rejects_non_finite() {
        assert!(infinity_path(CENTER, f32::NAN).is_none());
        assert!(infinity_path(Vec2::new(f32::INFINITY, 0.0), 10.0).is_none());
        let collapsed = infinity_path(CENTER, -5.0).unwrap();
        assert_eq!(collapsed.first_point(), CENTER);
    }

    #[test]
    fn phase_position_is_periodic() {
        for angle in [0.0, 51.4, 102.8, 257.0, 359.9, -90.0] {
            let here = phase_position(angle, 240.0).unwrap();
            let around = phase_position(angle + 360.0, 240.0).unwrap();
            assert!(close(here, around), "{angle}: {here} vs {around}");
        }
        assert!(close(phase_position(0.0, 240.0).unwrap(), Vec2::new(640.0, 300.0)));
        assert!(close(phase_position(90.0, 100.0).unwrap(), Vec2::new(400.0, 400.0)));
    }

    #[test]
    fn phase_position_sanitizes() {
        assert!(phase_position(f32::NAN, 240.0).is_none());
        assert!(phase_position(10.0, f32::INFINITY).is_none());
        assert_eq!(phase_position(45.0, -10.0), Some(CENTER));
    }

    #[test]
    fn fire_particles_count_and_size() {
        for time in [0.0, 0.1, 3.7, 1234.5] {
            let particles = fire_particles(36, 290.0, time);
            assert_eq!(particles.len(), 36);
            assert!(particles.iter().all(|particle| particle.size > 0.0));
            assert!(particles
                .iter()
                .all(|particle| (0.1 - 1e-4..=0.7 + 1e-4).contains(&particle.opacity)));
        }
    }

    #[test]
    fn fire_particles_are_deterministic() {
        assert_eq!(fire_particles(24, 270.0, 5.3), fire_particles(24, 270.0, 5.3));
        let first = fire_particles(4, 100.0, 0.0)[0];
        assert!((first.x - 500.0).abs() < 1e-3);
        assert!((first.y - 300.0).abs() < 1e-3);
        assert!((first.size - 2.0).abs() < 1e-6);
    }

    #[test]
    fn fire_particles_skip_bad_input() {
        assert!(fire_particles(10, f32::NAN, 1.0).is_empty());
        assert!(fire_particles(10, 100.0, f32::INFINITY).is_empty());
        assert!(fire_particles(0, 100.0, 1.0).is_empty());
    }

    #[test]
    fn segments_tile_the_loop() {
        let flat = infinity_path(CENTER, LOOP_SIZE).unwrap().flatten();
        let total: f32 = (0..8)
            .map(|index| {
                let (from, to) = segment_span(index, 8);
                flat.slice(from, to).length()
            })
            .sum();
        assert!((total - flat.length()).abs() < 0.01 * flat.length());
        assert_eq!(segment_span(7, 8), (0.875, 1.0));
    }

    #[test]
    fn polyline_queries() {
        let line = Polyline::new(vec![Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)]);
        assert_eq!(line.length(), 20.0);
        assert!(close(line.point_at(0.25).unwrap(), Vec2::new(5.0, 0.0)));
        assert!(close(line.point_at(0.75).unwrap(), Vec2::new(10.0, 5.0)));
        assert!(close(line.tangent_at(0.75).unwrap(), Vec2::Y));
        assert!((line.distance_to(Vec2::new(5.0, 3.0)) - 3.0).abs() < 1e-6);
        let slice = line.slice(0.25, 0.75);
        assert_eq!(slice.points().len(), 3);
        assert!((slice.length() - 10.0).abs() < 1e-5);
        assert!(line.slice(0.6, 0.4).is_empty());
    }

    #[test]
    fn dashes_follow_pattern_and_offset() {
        let line = Polyline::new(vec![Vec2::ZERO, Vec2::new(30.0, 0.0)]);
        let dashes = line.dashes(5.0, 10.0, 0.0);
        assert_eq!(dashes.len(), 2);
        assert!(close(dashes[0].points()[0], Vec2::ZERO));
        assert!(close(dashes[1].points()[0], Vec2::new(15.0, 0.0)));
        let shifted = line.dashes(5.0, 10.0, -3.0);
        assert!(close(shifted[0].points()[0], Vec2::new(3.0, 0.0)));
        assert_eq!(line.every(15.0).len(), 3);
    }

    #[test]
    fn tiny_patterns_are_bounded() {
        let line = Polyline::new(vec![Vec2::ZERO, Vec2::new(600.0, 0.0)]);
        let dashes = line.dashes(1e-6, 0.0, 0.0);
        assert!(dashes.len() <= MAX_PIECES);
        assert!(line.every(1e-6).len() <= MAX_PIECES + 1);
        assert!(line.dashes(f32::MIN_POSITIVE, 0.0, 0.0).len() <= MAX_PIECES);
        assert!(line.dashes(f32::INFINITY, 1.0, 0.0).is_empty());
    }
}
