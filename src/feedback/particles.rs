//! Fire-and-forget particles flying from a gesture to a badge

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use super::{
    anchors::{Anchor, Point},
    timer::TimerQueue,
};
use crate::config::ParticleConfig;

/// Monotonic particle identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ParticleId(pub u64);

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "particle-{}", self.0)
    }
}

/// Run once when the particle lands (e.g. to bounce the badge)
pub type LandingCallback = Box<dyn FnOnce(ParticleId) + Send>;

/// Render state of one particle at the current time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleFrame {
    pub id: ParticleId,
    pub payload: String,
    pub position: Point,
    pub scale: f64,
    pub opacity: f64,
}

/// A particle that reached its destination
pub struct Landing {
    pub id: ParticleId,
    pub payload: String,
    pub callback: Option<LandingCallback>,
}

struct Flight {
    from: Point,
    control: Point,
    to: Point,
    launched_at_ms: u64,
    payload: String,
    on_complete: Option<LandingCallback>,
}

pub struct ParticleAnimator {
    timings: ParticleConfig,
    next_id: u64,
    active: HashMap<ParticleId, Flight>,
    timers: TimerQueue<ParticleId>,
}

impl ParticleAnimator {
    pub fn new(timings: ParticleConfig) -> Self {
        Self {
            timings,
            next_id: 1,
            active: HashMap::new(),
            timers: TimerQueue::new(),
        }
    }

    /// Launch a particle between two anchors, measured now.
    ///
    /// Later layout changes do not affect the flight. Returns `None` when
    /// either anchor is not mounted.
    pub fn launch(
        &mut self,
        source: &dyn Anchor,
        destination: &dyn Anchor,
        payload: impl Into<String>,
        on_complete: Option<LandingCallback>,
    ) -> Option<ParticleId> {
        let from = source.measure()?.center();
        let to = destination.measure()?.center();

        let id = ParticleId(self.next_id);
        self.next_id += 1;

        let control = Point::new(
            (from.x + to.x) / 2.0,
            (from.y + to.y) / 2.0 - self.timings.arc_height,
        );
        self.active.insert(
            id,
            Flight {
                from,
                control,
                to,
                launched_at_ms: self.timers.now_ms(),
                payload: payload.into(),
                on_complete,
            },
        );
        self.timers.schedule(self.timings.duration_ms, id);

        tracing::debug!(%id, ?from, ?to, "Particle launched");
        Some(id)
    }

    /// Remove every particle whose flight ended at or before `now_ms`
    pub fn advance_to(&mut self, now_ms: u64) -> Vec<Landing> {
        let mut landed = Vec::new();
        while let Some(fired) = self.timers.pop_due(now_ms) {
            if let Some(flight) = self.active.remove(&fired.event) {
                tracing::debug!(id = %fired.event, "Particle landed");
                landed.push(Landing {
                    id: fired.event,
                    payload: flight.payload,
                    callback: flight.on_complete,
                });
            }
        }
        self.timers.settle(now_ms);
        landed
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn is_active(&self, id: ParticleId) -> bool {
        self.active.contains_key(&id)
    }

    /// Frames of all particles in flight, ordered by id
    pub fn frames(&self) -> Vec<ParticleFrame> {
        let mut frames: Vec<ParticleFrame> = self
            .active
            .iter()
            .map(|(id, flight)| self.frame_of(*id, flight))
            .collect();
        frames.sort_by_key(|f| f.id);
        frames
    }

    pub fn frame(&self, id: ParticleId) -> Option<ParticleFrame> {
        self.active.get(&id).map(|flight| self.frame_of(id, flight))
    }

    fn frame_of(&self, id: ParticleId, flight: &Flight) -> ParticleFrame {
        let elapsed = self.timers.now_ms().saturating_sub(flight.launched_at_ms);
        let t = if self.timings.duration_ms == 0 {
            1.0
        } else {
            (elapsed as f64 / self.timings.duration_ms as f64).clamp(0.0, 1.0)
        };
        let eased = ease_out_cubic(t);

        ParticleFrame {
            id,
            payload: flight.payload.clone(),
            position: quadratic_bezier(flight.from, flight.control, flight.to, eased),
            scale: 1.0 - eased,
            opacity: 1.0 - eased,
        }
    }
}

fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

fn quadratic_bezier(p0: Point, p1: Point, p2: Point, t: f64) -> Point {
    let u = 1.0 - t;
    Point::new(
        u * u * p0.x + 2.0 * u * t * p1.x + t * t * p2.x,
        u * u * p0.y + 2.0 * u * t * p1.y + t * t * p2.y,
    )
}
