use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

pub const FLOATING_COUNT: usize = 80;
pub const OUTER_FIRE_COUNT: usize = 36;
pub const INNER_FIRE_COUNT: usize = 24;

/// A drifting background dot. Position is a fraction of the scene bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FloatingParticle {
    pub left: f32,
    pub top: f32,
    pub period: f32,
    pub delay: f32,
}

/// Per-particle pulse periods of the fire layers, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Flicker {
    pub radius_period: f32,
    pub ember_period: f32,
}

/// Decoration chosen once per mount so that rendering stays a pure function.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ambience {
    pub seed: u64,
    pub floating: Vec<FloatingParticle>,
    pub outer_fire: Vec<Flicker>,
    pub inner_fire: Vec<Flicker>,
}

impl Ambience {
    pub fn new(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let floating = (0..FLOATING_COUNT)
            .map(|_| FloatingParticle {
                left: rng.random_range(0.0..1.0),
                top: rng.random_range(0.0..1.0),
                period: rng.random_range(3.0..7.0),
                delay: rng.random_range(0.0..5.0),
            })
            .collect();
        let outer_fire = (0..OUTER_FIRE_COUNT)
            .map(|_| Flicker {
                radius_period: rng.random_range(1.5..2.5),
                ember_period: rng.random_range(1.0..2.0),
            })
            .collect();
        let inner_fire = (0..INNER_FIRE_COUNT)
            .map(|_| Flicker {
                radius_period: rng.random_range(1.2..2.0),
                ember_period: 0.0,
            })
            .collect();
        Self {
            seed,
            floating,
            outer_fire,
            inner_fire,
        }
    }
}
