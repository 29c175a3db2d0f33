use std::f32::consts::TAU;
use std::f64::consts::PI;

use glam::Vec2;

use crate::ambience::{Ambience, INNER_FIRE_COUNT, OUTER_FIRE_COUNT};
use crate::choreography::{Choreography, Entrance};
use crate::color::{Color, Stop};
use crate::geometry::{
    fire_particles, infinity_path, label_position, segment_span, Polyline, CENTER, LOOP_SIZE,
};
use crate::hover::Region;
use crate::phase::{phases, Phase, PHASE_COUNT};
use crate::scene::shape::{
    Anchor, Arrow, Disc, Glow, Paint, Panel, Rect, Ring, Shape, Span, Stroke, Text,
};
use crate::scene::{
    Backdrop, HitArea, HitRegion, Label, LegendEntry, LoopState, Node, Part, Scene,
};

/// The drawing plus room for the title above and the legend below.
pub const SCENE_BOUNDS: Rect = Rect {
    min: Vec2::new(-100.0, -120.0),
    max: Vec2::new(900.0, 800.0),
};

const GRID_SPACING: f32 = 50.0;
const GRID_DRIFT_PERIOD: f32 = 20.0;
const FLOAT_RISE: f32 = 20.0;
const SEGMENT_WIDTH: f32 = 12.0;
const SEGMENT_WIDTH_HOVERED: f32 = 16.0;
const HIGHLIGHT_WIDTH: f32 = 20.0;
const FLOW_DRAW_PERIOD: f32 = 12.0;
const FLOW_DASH_REACH: f32 = 2000.0;
const FLOW_DOT_SPACING: f32 = 15.0;
const LABEL_SIZE: Vec2 = Vec2::new(100.0, 40.0);

const LEGEND_PANEL: Rect = Rect {
    min: Vec2::new(40.0, 630.0),
    max: Vec2::new(760.0, 770.0),
};
const LEGEND_COLUMNS: usize = 4;
const LEGEND_PADDING: f32 = 24.0;
const LEGEND_COLUMN_GAP: f32 = 24.0;
const LEGEND_ROW_GAP: f32 = 12.0;
const LEGEND_CELL: Vec2 = Vec2::new(150.0, 40.0);
/// Every fire motion repeats after this many seconds.
const FIRE_CYCLE: f64 = 4.0 * PI;

/// How far through its current `period` the clock is, in `[0, 1)`.
fn cycle(seconds: f64, period: f32) -> f32 {
    (seconds / f64::from(period)).rem_euclid(1.0) as f32
}

/// Value moving smoothly `from → to → from` once per `period` seconds.
fn oscillate(from: f32, to: f32, period: f32, seconds: f64) -> f32 {
    if period <= 0.0 {
        return from;
    }
    let phase = cycle(seconds, period);
    from + (to - from) * (1.0 - (phase * TAU).cos()) / 2.0
}

/// Build the scene for one frame. Pure in its inputs.
pub fn render(state: &LoopState, ambience: &Ambience, choreography: &Choreography) -> Scene {
    let mut builder = SceneBuilder {
        state,
        seconds: state.time.seconds(),
        choreography,
        nodes: Vec::new(),
        labels: Vec::new(),
        hit_regions: Vec::new(),
    };
    builder.grid();
    builder.floating(ambience);
    builder.fire_rings();
    builder.fire(ambience);
    if let Some(path) = infinity_path(CENTER, LOOP_SIZE) {
        let line = path.flatten();
        builder.segments(&line);
        builder.flow(&line);
    }
    builder.core();
    for phase in phases() {
        builder.phase_label(phase);
    }
    builder.center_text();
    builder.title();
    let legend = builder.legend();
    let SceneBuilder {
        nodes,
        labels,
        hit_regions,
        ..
    } = builder;
    Scene {
        bounds: SCENE_BOUNDS,
        backdrop: Backdrop {
            top: Color::SLATE_900,
            middle: Color::PURPLE_900,
            bottom: Color::SLATE_900,
        },
        nodes,
        labels,
        legend,
        hit_regions,
    }
}

struct SceneBuilder<'a> {
    state: &'a LoopState,
    seconds: f64,
    choreography: &'a Choreography,
    nodes: Vec<Node>,
    labels: Vec<Label>,
    hit_regions: Vec<HitRegion>,
}

impl SceneBuilder<'_> {
    fn add(&mut self, part: Part, shape: Shape) {
        self.nodes.push(Node { part, shape });
    }

    fn write(&mut self, part: Part, text: Text) {
        self.labels.push(Label { part, text });
    }

    fn entrance(&self, element: Entrance) -> f32 {
        self.choreography
            .opacity(element, self.state.time, self.state.mounted)
    }

    fn hovered(&self, phase: &Phase) -> bool {
        self.state.hovered.is_active(phase.name)
    }

    fn grid(&mut self) {
        let drift = cycle(self.seconds, GRID_DRIFT_PERIOD) * GRID_SPACING;
        let color = Color::BLUE_500.with_alpha(0.1);
        let Rect { min, max } = SCENE_BOUNDS;
        let line = |from: Vec2, to: Vec2| {
            Shape::Stroke(Stroke {
                line: Polyline::new(vec![from, to]),
                width: 1.0,
                paint: Paint::Solid(color),
                opacity: 0.2,
                glow: Glow::None,
            })
        };
        let mut x = min.x - GRID_SPACING + drift;
        while x <= max.x {
            self.add(Part::Grid, line(Vec2::new(x, min.y), Vec2::new(x, max.y)));
            x += GRID_SPACING;
        }
        let mut y = min.y - GRID_SPACING + drift;
        while y <= max.y {
            self.add(Part::Grid, line(Vec2::new(min.x, y), Vec2::new(max.x, y)));
            y += GRID_SPACING;
        }
    }

    fn floating(&mut self, ambience: &Ambience) {
        let size = SCENE_BOUNDS.size();
        for particle in &ambience.floating {
            let running = self.seconds - f64::from(particle.delay);
            let rise = if running > 0.0 {
                oscillate(0.0, FLOAT_RISE, particle.period, running)
            } else {
                0.0
            };
            let center = SCENE_BOUNDS.min
                + Vec2::new(particle.left * size.x, particle.top * size.y - rise);
            self.add(
                Part::Floating,
                Shape::Disc(Disc {
                    center,
                    radius: 2.0,
                    paint: Paint::Solid(Color::CYAN_400),
                    opacity: 0.4,
                    glow: Glow::None,
                }),
            );
        }
    }

    fn fire_rings(&mut self) {
        let shown = if self.state.mounted { 1.0 } else { 0.0 };
        let t = self.seconds;
        let outer = Ring {
            center: CENTER,
            radius: 300.0,
            width: oscillate(4.0, 8.0, 3.0, t),
            paint: Paint::Radial {
                center: CENTER,
                radius: 300.0,
                stops: vec![
                    Stop::new(0.0, Color::ORANGE_RED.with_alpha(0.9)),
                    Stop::new(0.3, Color::TOMATO.with_alpha(0.7)),
                    Stop::new(0.6, Color::DARK_ORANGE.with_alpha(0.5)),
                    Stop::new(1.0, Color::GOLD.with_alpha(0.2)),
                ],
            },
            opacity: shown * oscillate(0.3, 0.7, 2.5, t),
            glow: Glow::Soft,
        };
        let inner = Ring {
            center: CENTER,
            radius: 285.0,
            width: oscillate(3.0, 6.0, 2.5, t),
            paint: Paint::Radial {
                center: CENTER,
                radius: 285.0 * 1.2,
                stops: vec![
                    Stop::new(0.0, Color::CRIMSON.with_alpha(0.8)),
                    Stop::new(0.4, Color::ORANGE_RED.with_alpha(0.6)),
                    Stop::new(0.8, Color::ORANGE.with_alpha(0.3)),
                    Stop::new(1.0, Color::YELLOW.with_alpha(0.1)),
                ],
            },
            opacity: shown * oscillate(0.4, 0.9, 2.0, t),
            glow: Glow::Soft,
        };
        self.add(Part::FireRing, Shape::Ring(outer));
        self.add(Part::FireRing, Shape::Ring(inner));
    }

    fn fire(&mut self, ambience: &Ambience) {
        let t = self.seconds;
        let motion = t.rem_euclid(FIRE_CYCLE) as f32;
        let outer = fire_particles(OUTER_FIRE_COUNT, 290.0, motion);
        for (index, (particle, flicker)) in outer.iter().zip(&ambience.outer_fire).enumerate() {
            let phase = motion + index as f32;
            let center = particle.position();
            self.add(
                Part::Fire,
                Shape::Disc(Disc {
                    center,
                    radius: particle.size * oscillate(0.5, 1.5, flicker.radius_period, t),
                    paint: Paint::Solid(Color::ORANGE_RED),
                    opacity: particle.opacity,
                    glow: Glow::Soft,
                }),
            );
            self.add(
                Part::Fire,
                Shape::Disc(Disc {
                    center: center + Vec2::new(phase.sin(), phase.cos()) * 3.0,
                    radius: particle.size * 0.6,
                    paint: Paint::Solid(Color::GOLD),
                    opacity: oscillate(0.2, 0.8, flicker.ember_period, t),
                    glow: Glow::None,
                }),
            );
        }
        let inner = fire_particles(INNER_FIRE_COUNT, 270.0, motion);
        for (particle, flicker) in inner.iter().zip(&ambience.inner_fire) {
            self.add(
                Part::Fire,
                Shape::Disc(Disc {
                    center: particle.position(),
                    radius: oscillate(
                        particle.size * 0.3,
                        particle.size,
                        flicker.radius_period,
                        t,
                    ),
                    paint: Paint::Solid(Color::CRIMSON),
                    opacity: particle.opacity * 0.6,
                    glow: Glow::Soft,
                }),
            );
        }
    }

    fn segments(&mut self, line: &Polyline) {
        let Some(bounds) = Rect::enclosing(line.points()) else {
            return;
        };
        for phase in phases() {
            let hovered = self.hovered(phase);
            let (from, to) = segment_span(phase.index(), PHASE_COUNT);
            let slice = line.slice(from, to);
            let entrance = self.entrance(Entrance::Segment(phase.index()));
            let stroke = Stroke {
                line: slice.clone(),
                width: if hovered {
                    SEGMENT_WIDTH_HOVERED
                } else {
                    SEGMENT_WIDTH
                },
                paint: Paint::diagonal(
                    bounds,
                    vec![
                        Stop::new(0.0, phase.color),
                        Stop::new(0.5, phase.color.with_alpha(0.8)),
                        Stop::new(1.0, phase.color.with_alpha(0.3)),
                    ],
                ),
                opacity: entrance * if hovered { 1.0 } else { 0.85 },
                glow: if hovered { Glow::Strong } else { Glow::Soft },
            };
            self.hit_regions.push(HitRegion {
                phase: phase.name,
                region: Region::Segment,
                area: HitArea::Band(stroke.clone()),
            });
            self.add(Part::Segment(phase.name), Shape::Stroke(stroke));
            if hovered {
                self.add(
                    Part::SegmentHighlight(phase.name),
                    Shape::Stroke(Stroke {
                        line: slice,
                        width: HIGHLIGHT_WIDTH,
                        paint: Paint::Solid(phase.color),
                        opacity: oscillate(0.0, 0.5, 1.5, self.seconds),
                        glow: Glow::Strong,
                    }),
                );
            }
        }
    }

    fn flow(&mut self, line: &Polyline) {
        let t = self.seconds;
        let layer = 0.8 * self.entrance(Entrance::FlowPath);
        let length = line.length();
        if length > 0.0 {
            let reach = cycle(t, FLOW_DRAW_PERIOD) * FLOW_DASH_REACH;
            let drawn = (reach / length).min(1.0);
            let dot_opacity = layer * oscillate(0.3, 1.0, 1.5, t);
            for center in line.slice(0.0, drawn).every(FLOW_DOT_SPACING) {
                self.add(
                    Part::Flow,
                    Shape::Disc(Disc {
                        center,
                        radius: 1.5,
                        paint: Paint::Solid(Color::CYAN),
                        opacity: dot_opacity,
                        glow: Glow::Soft,
                    }),
                );
            }
            if let (Some(tip), Some(direction)) = (line.point_at(drawn), line.tangent_at(drawn)) {
                self.add(
                    Part::Flow,
                    Shape::Arrow(Arrow {
                        tip,
                        direction,
                        length: 12.0,
                        width: 8.0,
                        color: Color::CYAN,
                        opacity: layer * 0.9 * oscillate(0.5, 1.0, 2.0, t),
                    }),
                );
            }
        }
        let offset = -15.0 * cycle(t, 3.0);
        for dash in line.dashes(5.0, 10.0, offset) {
            self.add(
                Part::Flow,
                Shape::Stroke(Stroke {
                    line: dash,
                    width: 1.0,
                    paint: Paint::Solid(Color::CYAN),
                    opacity: 0.4,
                    glow: Glow::None,
                }),
            );
        }
    }

    fn core(&mut self) {
        let t = self.seconds;
        let radius = oscillate(40.0, 60.0, 4.0, t);
        self.add(
            Part::Core,
            Shape::Disc(Disc {
                center: CENTER,
                radius,
                paint: Paint::Radial {
                    center: CENTER,
                    radius,
                    stops: vec![
                        Stop::new(0.0, Color::CYAN.with_alpha(0.6)),
                        Stop::new(0.5, Color::AZURE.with_alpha(0.3)),
                        Stop::new(1.0, Color::ROYAL_BLUE.with_alpha(0.1)),
                    ],
                },
                opacity: oscillate(0.2, 0.5, 3.0, t),
                glow: Glow::None,
            }),
        );
        self.add(
            Part::Core,
            Shape::Ring(Ring {
                center: CENTER,
                radius: oscillate(25.0, 35.0, 3.0, t),
                width: 2.0,
                paint: Paint::Solid(Color::CYAN),
                opacity: 0.6,
                glow: Glow::Soft,
            }),
        );
    }

    fn phase_label(&mut self, phase: &Phase) {
        let Some(position) = label_position(phase.angle) else {
            return;
        };
        let hovered = self.hovered(phase);
        let group = self.entrance(Entrance::Label(phase.index()));
        let rect = Rect::around(position, LABEL_SIZE);
        self.add(
            Part::LabelPill(phase.name),
            Shape::Panel(Panel {
                rect,
                corner: 20.0,
                fill: Color::BLACK.with_alpha(0.8),
                border: Some((phase.color, if hovered { 2.0 } else { 1.0 })),
                opacity: group * if hovered { 0.95 } else { 0.8 },
                glow: if hovered { Glow::Soft } else { Glow::None },
            }),
        );
        let name = Text::new(
            phase.name.to_string(),
            position - Vec2::new(0.0, 2.0),
            if hovered { 14.0 } else { 12.0 },
            Color::WHITE,
        )
        .bold()
        .with_opacity(group)
        .with_glow(if hovered { Glow::Soft } else { Glow::None });
        self.write(Part::LabelName(phase.name), name);
        let description = Text::new(
            phase.description,
            position + Vec2::new(0.0, 12.0),
            if hovered { 11.0 } else { 9.0 },
            Color::GRAY_300,
        )
        .with_opacity(group * if hovered { 1.0 } else { 0.7 });
        self.write(Part::LabelDescription(phase.name), description);
        if hovered {
            self.add(
                Part::LabelHalo(phase.name),
                Shape::Ring(Ring {
                    center: position,
                    radius: oscillate(40.0, 80.0, 2.0, self.seconds),
                    width: 1.0,
                    paint: Paint::Solid(phase.color),
                    opacity: group * oscillate(0.4, 0.1, 2.0, self.seconds),
                    glow: Glow::Soft,
                }),
            );
        }
        self.hit_regions.push(HitRegion {
            phase: phase.name,
            region: Region::Label,
            area: HitArea::Rect(rect),
        });
    }

    fn center_text(&mut self) {
        let headline = Text::new("DevOps", Vec2::new(400.0, 285.0), 30.0, Color::WHITE)
            .bold()
            .with_glow(Glow::Soft)
            .with_opacity(self.entrance(Entrance::Headline));
        let integration = Text::new(
            "Continuous Integration",
            Vec2::new(400.0, 305.0),
            14.0,
            Color::CYAN_300,
        )
        .with_opacity(self.entrance(Entrance::IntegrationLine));
        let deployment = Text::new(
            "Continuous Deployment",
            Vec2::new(400.0, 320.0),
            14.0,
            Color::CYAN_300,
        )
        .with_opacity(self.entrance(Entrance::DeploymentLine));
        for text in [headline, integration, deployment] {
            self.write(Part::Center, text);
        }
    }

    fn title(&mut self) {
        let mut heading = Text::new("", Vec2::new(400.0, -60.0), 48.0, Color::WHITE).bold();
        heading.spans = [
            ("DevOps ", Color::CYAN_400),
            ("Infinity ", Color::BLUE_500),
            ("Loop", Color::PURPLE_600),
        ]
        .into_iter()
        .map(|(content, color)| Span {
            content: content.to_string(),
            color,
        })
        .collect();
        self.write(Part::Title, heading);
        let subtitle = Text::new(
            "Continuous Integration • Continuous Deployment",
            Vec2::new(400.0, -22.0),
            18.0,
            Color::GRAY_300,
        )
        .with_opacity(0.8);
        self.write(Part::Title, subtitle);
        let accent_offset = 225.0;
        for (from, to) in [
            (400.0 - accent_offset - 32.0, 400.0 - accent_offset),
            (400.0 + accent_offset + 32.0, 400.0 + accent_offset),
        ] {
            self.add(
                Part::Title,
                Shape::Stroke(Stroke {
                    line: Polyline::new(vec![Vec2::new(from, -28.0), Vec2::new(to, -28.0)]),
                    width: 1.0,
                    paint: Paint::Linear {
                        from: Vec2::new(from, -28.0),
                        to: Vec2::new(to, -28.0),
                        stops: vec![
                            Stop::new(0.0, Color::CYAN_400.with_alpha(0.0)),
                            Stop::new(1.0, Color::CYAN_400),
                        ],
                    },
                    opacity: 1.0,
                    glow: Glow::None,
                }),
            );
        }
    }

    fn legend(&mut self) -> Vec<LegendEntry> {
        self.add(
            Part::LegendPanel,
            Shape::Panel(Panel {
                rect: LEGEND_PANEL,
                corner: 16.0,
                fill: Color::BLACK.with_alpha(0.6),
                border: Some((Color::GRAY_700, 1.0)),
                opacity: 1.0,
                glow: Glow::None,
            }),
        );
        let origin = LEGEND_PANEL.min + Vec2::splat(LEGEND_PADDING);
        let mut entries = Vec::with_capacity(PHASE_COUNT);
        for phase in phases() {
            let column = (phase.index() % LEGEND_COLUMNS) as f32;
            let row = (phase.index() / LEGEND_COLUMNS) as f32;
            let corner = origin
                + Vec2::new(
                    column * (LEGEND_CELL.x + LEGEND_COLUMN_GAP),
                    row * (LEGEND_CELL.y + LEGEND_ROW_GAP),
                );
            let active = self.hovered(phase);
            let cell = Rect::new(corner, corner + LEGEND_CELL);
            self.legend_entry(phase, cell, active);
            entries.push(LegendEntry {
                phase: phase.name,
                cell,
                active,
            });
            self.hit_regions.push(HitRegion {
                phase: phase.name,
                region: Region::Legend,
                area: HitArea::Rect(cell),
            });
        }
        entries
    }

    fn legend_entry(&mut self, phase: &Phase, cell: Rect, active: bool) {
        let cell = if active { cell.scaled(1.05) } else { cell };
        if active {
            self.add(
                Part::LegendEntry(phase.name),
                Shape::Panel(Panel {
                    rect: cell,
                    corner: 8.0,
                    fill: Color::GRAY_800,
                    border: None,
                    opacity: 1.0,
                    glow: Glow::None,
                }),
            );
        }
        let middle = cell.center().y;
        self.add(
            Part::LegendDot(phase.name),
            Shape::Disc(Disc {
                center: Vec2::new(cell.min.x + 16.0, middle),
                radius: 8.0,
                paint: Paint::Solid(phase.color),
                opacity: 1.0,
                glow: if active { Glow::Soft } else { Glow::None },
            }),
        );
        let mut name = Text::new(
            phase.name.to_string(),
            Vec2::new(cell.min.x + 36.0, middle - 3.0),
            14.0,
            if active { Color::WHITE } else { Color::GRAY_300 },
        )
        .anchored(Anchor::Start);
        if active {
            name = name.bold();
        }
        self.write(Part::LegendName(phase.name), name);
        let description = Text::new(
            phase.description,
            Vec2::new(cell.min.x + 36.0, middle + 13.0),
            11.0,
            Color::GRAY_500,
        )
        .anchored(Anchor::Start);
        self.write(Part::LegendDescription(phase.name), description);
    }
}
