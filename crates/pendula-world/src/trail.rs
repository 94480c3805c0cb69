//! Trail of the second bob with age and count pruning.

use std::collections::VecDeque;

use pendula_math::Vec2;
use pendula_model::TrailConfig;
use serde::Serialize;

/// One recorded position of the second bob.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrailPoint {
    /// Horizontal offset from the pivot (m).
    pub x: f64,
    /// Vertical offset from the pivot, down positive (m).
    pub y: f64,
    /// Host clock when the point was recorded (s).
    pub time: f64,
}

impl TrailPoint {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Bounded history of recent bob positions, oldest first.
#[derive(Debug, Clone)]
pub struct Trail {
    points: VecDeque<TrailPoint>,
    /// Maximum point age (s) when not infinite.
    pub duration: f64,
    /// Ignore age; only `max_length` bounds the trail.
    pub infinite: bool,
    /// Hard cap on stored points.
    pub max_length: usize,
}

impl Trail {
    pub fn new(config: &TrailConfig) -> Self {
        Self {
            points: VecDeque::with_capacity(config.max_length.min(4096)),
            duration: config.duration,
            infinite: config.infinite,
            max_length: config.max_length.max(1),
        }
    }

    /// Record a position at `time` and prune against that clock.
    ///
    /// Non-finite positions are dropped so a blown-up trajectory never
    /// reaches the display.
    pub fn push(&mut self, position: Vec2, time: f64) -> bool {
        if !(position.x.is_finite() && position.y.is_finite() && time.is_finite()) {
            return false;
        }
        self.points.push_back(TrailPoint {
            x: position.x,
            y: position.y,
            time,
        });
        self.prune(time);
        true
    }

    /// Drop points older than `duration` (unless infinite), then trim the
    /// oldest points down to `max_length`.
    pub fn prune(&mut self, now: f64) {
        if !self.infinite {
            while let Some(front) = self.points.front() {
                if now - front.time > self.duration {
                    self.points.pop_front();
                } else {
                    break;
                }
            }
        }
        while self.points.len() > self.max_length {
            self.points.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TrailPoint> + '_ {
        self.points.iter()
    }

    pub fn newest(&self) -> Option<&TrailPoint> {
        self.points.back()
    }

    pub fn to_vec(&self) -> Vec<TrailPoint> {
        self.points.iter().copied().collect()
    }

    /// Interleaved `x, y` pairs, oldest first.
    pub fn to_flat(&self) -> Vec<f64> {
        self.points.iter().flat_map(|p| [p.x, p.y]).collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.points)
    }

    pub fn stats(&self) -> TrailStats {
        match (self.points.front(), self.points.back()) {
            (Some(first), Some(last)) => TrailStats {
                points: self.points.len(),
                span: last.time - first.time,
            },
            _ => TrailStats::default(),
        }
    }
}

impl Default for Trail {
    fn default() -> Self {
        Self::new(&TrailConfig::default())
    }
}

/// Summary of a trail.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrailStats {
    pub points: usize,
    /// Time between the oldest and newest point (s).
    pub span: f64,
}
