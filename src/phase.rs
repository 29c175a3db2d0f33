use serde::Serialize;
use strum::{Display, EnumCount, EnumIter, EnumString, IntoEnumIterator};

use crate::color::Color;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, EnumCount, Serialize,
)]
#[strum(ascii_case_insensitive)]
pub enum PhaseName {
    Plan,
    Code,
    Build,
    Test,
    Release,
    Deploy,
    Operate,
    Monitor,
}

impl PhaseName {
    /// Position of the phase around the loop and in the legend.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn phase(self) -> &'static Phase {
        &PHASES[self.index()]
    }

    pub fn gradient_id(self) -> String {
        format!("{}Gradient", self.to_string().to_lowercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Phase {
    pub name: PhaseName,
    pub color: Color,
    pub angle: f32,
    pub description: &'static str,
}

impl Phase {
    const fn new(name: PhaseName, rgb: u32, angle: f32, description: &'static str) -> Self {
        Self {
            name,
            color: Color::from_rgb(rgb),
            angle,
            description,
        }
    }

    pub fn index(&self) -> usize {
        self.name.index()
    }
}

pub const PHASE_COUNT: usize = PhaseName::COUNT;

pub static PHASES: [Phase; PHASE_COUNT] = [
    Phase::new(PhaseName::Plan, 0x3B82F6, 0.0, "Strategy & Requirements"),
    Phase::new(PhaseName::Code, 0x10B981, 51.4, "Development & Version Control"),
    Phase::new(PhaseName::Build, 0xF59E0B, 102.8, "Compilation & Testing"),
    Phase::new(PhaseName::Test, 0xEF4444, 154.2, "Quality Assurance"),
    Phase::new(PhaseName::Release, 0x8B5CF6, 205.6, "Package & Prepare"),
    Phase::new(PhaseName::Deploy, 0x06B6D4, 257.0, "Production Deployment"),
    Phase::new(PhaseName::Operate, 0xEC4899, 308.4, "Infrastructure Management"),
    Phase::new(PhaseName::Monitor, 0xF97316, 360.0, "Performance & Analytics"),
];

pub fn phases() -> impl Iterator<Item = &'static Phase> {
    PhaseName::iter().map(PhaseName::phase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn registry_order_matches_names() {
        for (index, phase) in PHASES.iter().enumerate() {
            assert_eq!(phase.index(), index);
        }
        let names: Vec<String> = phases().map(|phase| phase.name.to_string()).collect();
        assert_eq!(
            names,
            ["Plan", "Code", "Build", "Test", "Release", "Deploy", "Operate", "Monitor"]
        );
    }

    #[test]
    fn angles_strictly_increase_across_the_circle() {
        let angles: Vec<f32> = phases().map(|phase| phase.angle).collect();
        assert!(angles.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(angles.first().copied(), Some(0.0));
        assert_eq!(angles.last().copied(), Some(360.0));
        let even = 360.0 / (PHASE_COUNT - 1) as f32;
        for pair in angles.windows(2) {
            assert!((pair[1] - pair[0] - even).abs() < 0.5);
        }
    }

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!(PhaseName::from_str("deploy"), Ok(PhaseName::Deploy));
        assert_eq!(PhaseName::from_str("MONITOR"), Ok(PhaseName::Monitor));
        assert!(PhaseName::from_str("Ship").is_err());
    }

    #[test]
    fn gradient_ids() {
        assert_eq!(PhaseName::Plan.gradient_id(), "planGradient");
        assert_eq!(PhaseName::Operate.gradient_id(), "operateGradient");
        assert_eq!(PhaseName::Deploy.phase().color, Color::from_rgb(0x06B6D4));
    }
}
