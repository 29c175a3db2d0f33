use glam::Vec2;
use serde::Serialize;

use crate::clock::AnimationTime;
use crate::color::Color;
use crate::hover::{HoverState, Region};
use crate::phase::PhaseName;

pub use render::render;
pub use shape::{Anchor, Arrow, Disc, Glow, Paint, Panel, Rect, Ring, Shape, Span, Stroke, Text};

mod render;
pub mod shape;

/// Everything a frame depends on besides the per-mount ambience.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LoopState {
    pub time: AnimationTime,
    pub hovered: HoverState,
    pub mounted: bool,
}

/// Which part of the picture a shape or text belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Part {
    Grid,
    Floating,
    FireRing,
    Fire,
    Segment(PhaseName),
    SegmentHighlight(PhaseName),
    Flow,
    Core,
    LabelPill(PhaseName),
    LabelName(PhaseName),
    LabelDescription(PhaseName),
    LabelHalo(PhaseName),
    Center,
    Title,
    LegendPanel,
    LegendEntry(PhaseName),
    LegendDot(PhaseName),
    LegendName(PhaseName),
    LegendDescription(PhaseName),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub part: Part,
    pub shape: Shape,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub part: Part,
    pub text: Text,
}

/// Full-window vertical gradient behind everything.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Backdrop {
    pub top: Color,
    pub middle: Color,
    pub bottom: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LegendEntry {
    pub phase: PhaseName,
    pub cell: Rect,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum HitArea {
    Rect(Rect),
    /// Within `reach` of the stroke's centerline.
    Band(Stroke),
}

impl HitArea {
    pub fn contains(&self, point: Vec2) -> bool {
        match self {
            HitArea::Rect(rect) => rect.contains(point),
            HitArea::Band(stroke) => stroke.line.distance_to(point) <= stroke.width / 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitRegion {
    pub phase: PhaseName,
    pub region: Region,
    pub area: HitArea,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hit {
    pub phase: PhaseName,
    pub region: Region,
}

/// A frame's worth of drawing, back to front, plus the pointer regions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub bounds: Rect,
    pub backdrop: Backdrop,
    pub nodes: Vec<Node>,
    pub labels: Vec<Label>,
    pub legend: Vec<LegendEntry>,
    pub hit_regions: Vec<HitRegion>,
}

impl Scene {
    pub fn shapes_of(&self, part: Part) -> impl Iterator<Item = &Shape> {
        self.nodes
            .iter()
            .filter(move |node| node.part == part)
            .map(|node| &node.shape)
    }

    pub fn texts_of(&self, part: Part) -> impl Iterator<Item = &Text> {
        self.labels
            .iter()
            .filter(move |label| label.part == part)
            .map(|label| &label.text)
    }

    pub fn segment(&self, phase: PhaseName) -> Option<&Stroke> {
        self.shapes_of(Part::Segment(phase))
            .find_map(|shape| match shape {
                Shape::Stroke(stroke) => Some(stroke),
                _ => None,
            })
    }

    pub fn legend_entry(&self, phase: PhaseName) -> Option<&LegendEntry> {
        self.legend.iter().find(|entry| entry.phase == phase)
    }

    pub fn active_legend(&self) -> Option<PhaseName> {
        self.legend
            .iter()
            .find(|entry| entry.active)
            .map(|entry| entry.phase)
    }

    /// The topmost phase region under a point.
    pub fn hit_test(&self, point: Vec2) -> Option<Hit> {
        if !point.is_finite() {
            return None;
        }
        self.hit_regions
            .iter()
            .rev()
            .find(|region| region.area.contains(point))
            .map(|region| Hit {
                phase: region.phase,
                region: region.region,
            })
    }
}
