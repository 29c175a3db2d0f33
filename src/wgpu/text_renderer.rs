use glam::Vec2;
use log::error;
use wgpu::RenderPass;
use wgpu_text::glyph_brush::ab_glyph::FontArc;
use wgpu_text::glyph_brush::{
    BuiltInLineBreaker, Extra, HorizontalAlign, Layout, OwnedSection, OwnedText, VerticalAlign,
};
use wgpu_text::{BrushBuilder, TextBrush};

use crate::scene::{Anchor, Scene, Text};
use crate::viewport::Viewport;
use crate::wgpu::Wgpu;
use crate::LoopError;

/// Glyph scale per unit of font size.
const GLYPH_SCALE: f32 = 1.2;
/// Distance from the alphabetic baseline up to the middle of a line, per unit of size.
const BASELINE_TO_MIDDLE: f32 = 0.35;
/// Sideways shift of the second pass that thickens bold text, per pixel of glyph scale.
const BOLD_SHIFT: f32 = 0.04;
/// Halo copies drawn behind glowing text.
const HALO: [Vec2; 4] = [Vec2::X, Vec2::NEG_X, Vec2::Y, Vec2::NEG_Y];
const HALO_ALPHA: f32 = 0.25;

pub struct TextRenderer {
    brush: TextBrush<FontArc>,
    sections: Vec<OwnedSection>,
}

impl TextRenderer {
    pub fn new(font_bytes: Vec<u8>, wgpu: &Wgpu) -> Result<Self, LoopError> {
        let font = FontArc::try_from_vec(font_bytes)?;
        let (width, height) = wgpu.size();
        let brush = BrushBuilder::using_font(font).build(
            &wgpu.device,
            width,
            height,
            wgpu.surface_configuration.format,
        );
        Ok(Self {
            brush,
            sections: Vec::new(),
        })
    }

    pub fn resize(&mut self, wgpu: &Wgpu) {
        let (width, height) = wgpu.size();
        self.brush
            .resize_view(width as f32, height as f32, &wgpu.queue);
    }

    pub fn update(&mut self, scene: &Scene, viewport: &Viewport) {
        self.sections = scene
            .labels
            .iter()
            .filter(|label| label.text.opacity > 0.0)
            .flat_map(|label| sections(&label.text, viewport))
            .collect();
    }

    pub fn draw<'a>(&'a mut self, render_pass: &mut RenderPass<'a>, wgpu: &Wgpu) {
        let sections: Vec<&OwnedSection> = self.sections.iter().collect();
        if let Err(problem) = self.brush.queue(&wgpu.device, &wgpu.queue, sections) {
            error!("Unable to queue text: {problem:?}");
            return;
        }
        self.brush.draw(render_pass);
    }
}

/// Back to front: glow halo, bold pass, then the text itself.
pub fn sections(text: &Text, viewport: &Viewport) -> Vec<OwnedSection> {
    let spread = text.glow.spread() * viewport.scale();
    let mut sections: Vec<OwnedSection> = if spread > 0.0 {
        HALO.iter()
            .map(|direction| shifted(text, viewport, *direction * spread, HALO_ALPHA))
            .collect()
    } else {
        Vec::new()
    };
    if text.bold {
        let shift = glyph_scale(text, viewport) * BOLD_SHIFT;
        sections.push(shifted(text, viewport, Vec2::new(shift, 0.0), 1.0));
    }
    sections.push(section(text, viewport));
    sections
}

pub fn section(text: &Text, viewport: &Viewport) -> OwnedSection {
    shifted(text, viewport, Vec2::ZERO, 1.0)
}

fn glyph_scale(text: &Text, viewport: &Viewport) -> f32 {
    text.size * viewport.scale() * GLYPH_SCALE
}

fn shifted(text: &Text, viewport: &Viewport, shift: Vec2, alpha: f32) -> OwnedSection {
    let middle = text.baseline - Vec2::new(0.0, text.size * BASELINE_TO_MIDDLE);
    let position = viewport.to_window(middle) + shift;
    let scale = glyph_scale(text, viewport);
    let spans = text
        .spans
        .iter()
        .map(|span| {
            OwnedText::new(span.content.clone())
                .with_color(span.color.fade(text.opacity * alpha).to_array())
                .with_scale(scale)
        })
        .collect();
    OwnedSection::<Extra>::default()
        .with_layout(layout(text.anchor))
        .with_screen_position((position.x, position.y))
        .with_text(spans)
}

fn layout(anchor: Anchor) -> Layout<BuiltInLineBreaker> {
    Layout::default_single_line()
        .v_align(VerticalAlign::Center)
        .h_align(match anchor {
            Anchor::Start => HorizontalAlign::Left,
            Anchor::Middle => HorizontalAlign::Center,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::scene::{Glow, Rect};

    #[test]
    fn section_lands_on_the_scaled_text_middle() {
        let viewport = Viewport::new(Rect::new(Vec2::ZERO, Vec2::new(800.0, 600.0)), 1600, 1200);
        let text = Text::new("Plan", Vec2::new(100.0, 200.0), 10.0, Color::WHITE)
            .anchored(Anchor::Middle)
            .with_opacity(0.5);
        let section = section(&text, &viewport);
        assert_eq!(section.screen_position, (200.0, 393.0));
        assert_eq!(section.text.len(), 1);
        assert_eq!(section.text[0].text, "Plan");
        assert_eq!(section.text[0].extra.color[3], 0.5);
        assert!((section.text[0].scale.y - 24.0).abs() < 1e-4);
    }

    #[test]
    fn bold_and_glowing_text_gain_passes() {
        let viewport = Viewport::new(Rect::new(Vec2::ZERO, Vec2::new(800.0, 600.0)), 800, 600);
        let plain = Text::new("Build", Vec2::new(100.0, 200.0), 10.0, Color::WHITE);
        assert_eq!(sections(&plain, &viewport).len(), 1);

        let bold = sections(&plain.clone().bold(), &viewport);
        assert_eq!(bold.len(), 2);
        let (pass, body) = (&bold[0], &bold[1]);
        assert!(pass.screen_position.0 > body.screen_position.0);
        assert_eq!(pass.screen_position.1, body.screen_position.1);

        let glowing = sections(&plain.with_glow(Glow::Soft), &viewport);
        assert_eq!(glowing.len(), HALO.len() + 1);
        assert_eq!(glowing[0].text[0].extra.color[3], HALO_ALPHA);
        assert_eq!(glowing[HALO.len()].text[0].extra.color[3], 1.0);
    }
}
