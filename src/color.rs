use serde::Serialize;

/// Straight (non-premultiplied) RGBA with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::from_rgb(0xFFFFFF);
    pub const BLACK: Color = Color::from_rgb(0x000000);
    pub const TRANSPARENT: Color = Color::from_rgb(0x000000).with_alpha(0.0);

    // palette
    pub const CYAN: Color = Color::from_rgb(0x00FFFF);
    pub const CYAN_300: Color = Color::from_rgb(0x67E8F9);
    pub const CYAN_400: Color = Color::from_rgb(0x22D3EE);
    pub const BLUE_500: Color = Color::from_rgb(0x3B82F6);
    pub const PURPLE_600: Color = Color::from_rgb(0x9333EA);
    pub const GRAY_300: Color = Color::from_rgb(0xD1D5DB);
    pub const GRAY_500: Color = Color::from_rgb(0x6B7280);
    pub const GRAY_700: Color = Color::from_rgb(0x374151);
    pub const GRAY_800: Color = Color::from_rgb(0x1F2937);
    pub const SLATE_900: Color = Color::from_rgb(0x0F172A);
    pub const PURPLE_900: Color = Color::from_rgb(0x581C87);
    pub const ORANGE_RED: Color = Color::from_rgb(0xFF4500);
    pub const TOMATO: Color = Color::from_rgb(0xFF6347);
    pub const GOLD: Color = Color::from_rgb(0xFFD700);
    pub const CRIMSON: Color = Color::from_rgb(0xDC143C);
    pub const DARK_ORANGE: Color = Color::from_rgb(0xFF8C00);
    pub const ORANGE: Color = Color::from_rgb(0xFFA500);
    pub const YELLOW: Color = Color::from_rgb(0xFFFF00);
    pub const AZURE: Color = Color::from_rgb(0x0080FF);
    pub const ROYAL_BLUE: Color = Color::from_rgb(0x4169E1);

    pub const fn from_rgb(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xFF) as f32 / 255.0,
            g: ((rgb >> 8) & 0xFF) as f32 / 255.0,
            b: (rgb & 0xFF) as f32 / 255.0,
            a: 1.0,
        }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Multiply alpha by an opacity, the way nested SVG opacities compose.
    pub fn fade(self, opacity: f32) -> Self {
        Self {
            a: self.a * opacity.clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn lerp(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A gradient stop: offset in `0.0..=1.0` and the color there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stop {
    pub offset: f32,
    pub color: Color,
}

impl Stop {
    pub const fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }
}

/// Color along a sorted list of stops, clamped at both ends.
pub fn sample_stops(stops: &[Stop], t: f32) -> Color {
    let Some(first) = stops.first() else {
        return Color::TRANSPARENT;
    };
    if t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (low, high) = (pair[0], pair[1]);
        if t <= high.offset {
            let span = high.offset - low.offset;
            if span <= f32::EPSILON {
                return high.color;
            }
            return low.color.lerp(high.color, (t - low.offset) / span);
        }
    }
    stops[stops.len() - 1].color
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_channels() {
        let color = Color::from_rgb(0xFF8000);
        assert_eq!(color.r, 1.0);
        assert!((color.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(color.b, 0.0);
        assert_eq!(color.a, 1.0);
    }

    #[test]
    fn stops_interpolate_and_clamp() {
        let stops = [
            Stop::new(0.0, Color::BLACK),
            Stop::new(0.5, Color::WHITE),
            Stop::new(1.0, Color::BLACK.with_alpha(0.0)),
        ];
        assert_eq!(sample_stops(&stops, -1.0), Color::BLACK);
        assert_eq!(sample_stops(&stops, 0.5), Color::WHITE);
        let quarter = sample_stops(&stops, 0.25);
        assert!((quarter.r - 0.5).abs() < 1e-6);
        assert_eq!(sample_stops(&stops, 2.0).a, 0.0);
        assert_eq!(sample_stops(&[], 0.3), Color::TRANSPARENT);
    }

    #[test]
    fn fade_composes_alpha() {
        let color = Color::WHITE.with_alpha(0.8).fade(0.5);
        assert!((color.a - 0.4).abs() < 1e-6);
    }
}
