use serde::Serialize;

use crate::clock::AnimationTime;
use crate::phase::PHASE_COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Entrance {
    Segment(usize),
    FlowPath,
    Label(usize),
    Headline,
    IntegrationLine,
    DeploymentLine,
}

/// When an element starts fading in and how long the fade takes, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Cue {
    pub element: Entrance,
    pub delay: f32,
    pub duration: f32,
}

impl Cue {
    const fn new(element: Entrance, delay: f32, duration: f32) -> Self {
        Self {
            element,
            delay,
            duration,
        }
    }

    /// Linear fade from 0 at `delay` to 1 at `delay + duration`, then held.
    pub fn progress(&self, elapsed: f64) -> f32 {
        let delay = f64::from(self.delay);
        if elapsed <= delay {
            return 0.0;
        }
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((elapsed - delay) / f64::from(self.duration)).min(1.0) as f32
    }
}

const SEGMENT_STAGGER: f32 = 0.2;
const SEGMENT_FADE: f32 = 2.0;
const LABEL_START: f32 = 3.0;
const LABEL_STAGGER: f32 = 0.15;
const LABEL_FADE: f32 = 1.0;

/// The one-shot entrance sequence of a mount.
#[derive(Debug, Clone, Serialize)]
pub struct Choreography {
    cues: Vec<Cue>,
}

impl Default for Choreography {
    fn default() -> Self {
        let segments = (0..PHASE_COUNT).map(|index| {
            Cue::new(
                Entrance::Segment(index),
                index as f32 * SEGMENT_STAGGER,
                SEGMENT_FADE,
            )
        });
        let labels = (0..PHASE_COUNT).map(|index| {
            Cue::new(
                Entrance::Label(index),
                LABEL_START + index as f32 * LABEL_STAGGER,
                LABEL_FADE,
            )
        });
        let fixed = [
            Cue::new(Entrance::FlowPath, 3.0, 1.0),
            Cue::new(Entrance::Headline, 4.0, 1.0),
            Cue::new(Entrance::IntegrationLine, 4.5, 1.0),
            Cue::new(Entrance::DeploymentLine, 5.0, 1.0),
        ];
        Self {
            cues: segments.chain(labels).chain(fixed).collect(),
        }
    }
}

impl Choreography {
    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn cue(&self, element: Entrance) -> Option<&Cue> {
        self.cues.iter().find(|cue| cue.element == element)
    }

    /// Entrance opacity of an element at the given time of the mount.
    /// Nothing shows before mount; elements without a cue show at once.
    pub fn opacity(&self, element: Entrance, time: AnimationTime, mounted: bool) -> f32 {
        if !mounted {
            return 0.0;
        }
        self.cue(element)
            .map_or(1.0, |cue| cue.progress(time.seconds()))
    }

    /// Time at which every cue has finished.
    pub fn finished_at(&self) -> f32 {
        self.cues
            .iter()
            .map(|cue| cue.delay + cue.duration)
            .fold(0.0, f32::max)
    }
}
