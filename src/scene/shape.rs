use glam::Vec2;
use serde::Serialize;

use crate::color::{sample_stops, Color, Stop};
use crate::geometry::Polyline;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn around(center: Vec2, size: Vec2) -> Self {
        Self::new(center - size / 2.0, center + size / 2.0)
    }

    /// Smallest rectangle holding every point, `None` when there are none.
    pub fn enclosing(points: &[Vec2]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(min, max), point| (min.min(*point), max.max(*point)));
        Some(Self { min, max })
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn scaled(&self, factor: f32) -> Self {
        Self::around(self.center(), self.size() * factor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Glow {
    None,
    Soft,
    Strong,
}

impl Glow {
    /// Spread of the blurred halo in scene units.
    pub fn spread(&self) -> f32 {
        match self {
            Glow::None => 0.0,
            Glow::Soft => 3.0,
            Glow::Strong => 6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Paint {
    Solid(Color),
    /// Gradient along the segment `from → to`.
    Linear {
        from: Vec2,
        to: Vec2,
        stops: Vec<Stop>,
    },
    Radial {
        center: Vec2,
        radius: f32,
        stops: Vec<Stop>,
    },
}

impl Paint {
    /// Diagonal gradient across a bounding box, top-left to bottom-right.
    pub fn diagonal(bounds: Rect, stops: Vec<Stop>) -> Self {
        Paint::Linear {
            from: bounds.min,
            to: bounds.max,
            stops,
        }
    }

    pub fn at(&self, point: Vec2) -> Color {
        match self {
            Paint::Solid(color) => *color,
            Paint::Linear { from, to, stops } => {
                let along = *to - *from;
                let length_squared = along.length_squared();
                let t = if length_squared > 0.0 {
                    (point - *from).dot(along) / length_squared
                } else {
                    0.0
                };
                sample_stops(stops, t)
            }
            Paint::Radial {
                center,
                radius,
                stops,
            } => {
                let t = if *radius > 0.0 {
                    point.distance(*center) / radius
                } else {
                    1.0
                };
                sample_stops(stops, t)
            }
        }
    }

    /// Offsets at which the paint changes slope, for radial tessellation.
    pub fn radial_offsets(&self) -> Vec<f32> {
        match self {
            Paint::Radial { stops, .. } => stops.iter().map(|stop| stop.offset).collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Disc {
    pub center: Vec2,
    pub radius: f32,
    pub paint: Paint,
    pub opacity: f32,
    pub glow: Glow,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ring {
    pub center: Vec2,
    pub radius: f32,
    pub width: f32,
    pub paint: Paint,
    pub opacity: f32,
    pub glow: Glow,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    pub line: Polyline,
    pub width: f32,
    pub paint: Paint,
    pub opacity: f32,
    pub glow: Glow,
}

/// A filled rounded rectangle with an optional border.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub rect: Rect,
    pub corner: f32,
    pub fill: Color,
    pub border: Option<(Color, f32)>,
    pub opacity: f32,
    pub glow: Glow,
}

/// A filled triangle pointing along `direction` with its tip at `tip`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arrow {
    pub tip: Vec2,
    pub direction: Vec2,
    pub length: f32,
    pub width: f32,
    pub color: Color,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Shape {
    Disc(Disc),
    Ring(Ring),
    Stroke(Stroke),
    Panel(Panel),
    Arrow(Arrow),
}

impl Shape {
    pub fn opacity(&self) -> f32 {
        match self {
            Shape::Disc(Disc { opacity, .. })
            | Shape::Ring(Ring { opacity, .. })
            | Shape::Stroke(Stroke { opacity, .. })
            | Shape::Panel(Panel { opacity, .. })
            | Shape::Arrow(Arrow { opacity, .. }) => *opacity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Anchor {
    Start,
    Middle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Span {
    pub content: String,
    pub color: Color,
}

/// Text placed by its baseline, SVG style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Text {
    pub spans: Vec<Span>,
    pub baseline: Vec2,
    pub size: f32,
    pub anchor: Anchor,
    pub bold: bool,
    pub opacity: f32,
    pub glow: Glow,
}

impl Text {
    pub fn new(content: impl Into<String>, baseline: Vec2, size: f32, color: Color) -> Self {
        Self {
            spans: vec![Span {
                content: content.into(),
                color,
            }],
            baseline,
            size,
            anchor: Anchor::Middle,
            bold: false,
            opacity: 1.0,
            glow: Glow::None,
        }
    }

    pub fn anchored(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_glow(mut self, glow: Glow) -> Self {
        self.glow = glow;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_queries() {
        let rect = Rect::around(Vec2::new(10.0, 10.0), Vec2::new(4.0, 2.0));
        assert_eq!(rect.min, Vec2::new(8.0, 9.0));
        assert!(rect.contains(Vec2::new(12.0, 11.0)));
        assert!(!rect.contains(Vec2::new(12.1, 11.0)));
        assert_eq!(rect.scaled(2.0).size(), Vec2::new(8.0, 4.0));
        let enclosing = Rect::enclosing(&[Vec2::ZERO, Vec2::new(3.0, -2.0)]).unwrap();
        assert_eq!(enclosing.min, Vec2::new(0.0, -2.0));
        assert!(Rect::enclosing(&[]).is_none());
    }

    #[test]
    fn paints_sample_their_stops() {
        let stops = vec![Stop::new(0.0, Color::WHITE), Stop::new(1.0, Color::BLACK)];
        let linear = Paint::diagonal(Rect::new(Vec2::ZERO, Vec2::splat(10.0)), stops.clone());
        assert_eq!(linear.at(Vec2::ZERO), Color::WHITE);
        assert_eq!(linear.at(Vec2::splat(10.0)), Color::BLACK);
        assert!((linear.at(Vec2::new(10.0, 0.0)).r - 0.5).abs() < 1e-6);
        let radial = Paint::Radial {
            center: Vec2::ZERO,
            radius: 4.0,
            stops,
        };
        assert!((radial.at(Vec2::new(0.0, 2.0)).g - 0.5).abs() < 1e-6);
        assert_eq!(radial.radial_offsets(), vec![0.0, 1.0]);
    }
}
