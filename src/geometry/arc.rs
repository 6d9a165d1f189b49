//! Arc shaft geometry for curved arrows
//!
//! A shaft is described in its local frame: it starts at the origin and ends
//! at `(chord, 0)`. A nonzero `angle` bends it into a circular arc whose
//! tangent turns by `angle` radians from tail to tip.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Below this curvature the shaft is treated as straight
const STRAIGHT_EPSILON: f32 = 1e-6;

/// A point on the shaft with the local tangent angle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaftPoint {
    pub pos: Vec2,
    /// Direction of travel relative to the chord (radians)
    pub angle: f32,
}

/// A straight or circular shaft in its local frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcShaft {
    /// Straight-line distance between tail and tip
    pub chord: f32,
    /// Total turning angle (radians, 0 = straight)
    pub angle: f32,
}

impl ArcShaft {
    pub fn new(chord: f32, angle: f32) -> Self {
        Self { chord, angle }
    }

    #[inline]
    pub fn is_straight(&self) -> bool {
        self.angle.abs() < STRAIGHT_EPSILON
    }

    /// Length along the shaft
    ///
    /// `angle * chord / (2 * sin(angle / 2))` for an arc, the chord otherwise.
    pub fn length(&self) -> f32 {
        if self.is_straight() {
            return self.chord;
        }
        self.angle * self.chord / (2.0 * (self.angle / 2.0).sin())
    }

    /// Radius of the arc (infinite for a straight shaft)
    pub fn radius(&self) -> f32 {
        if self.is_straight() {
            return f32::INFINITY;
        }
        (self.chord / (2.0 * (self.angle / 2.0).sin())).abs()
    }

    /// Point at distance `k` along the shaft
    pub fn point_at(&self, k: f32) -> ShaftPoint {
        if self.is_straight() {
            return ShaftPoint {
                pos: Vec2::new(k, 0.0),
                angle: 0.0,
            };
        }
        let length = self.length();
        let fraction = if length > 0.0 { k / length } else { 0.0 };

        let half = self.angle / 2.0;
        let theta = fraction * self.angle - half;
        let scale = self.chord / (2.0 * half.sin());
        ShaftPoint {
            pos: Vec2::new(
                (theta.sin() + half.sin()) * scale,
                (theta.cos() - half.cos()) * scale,
            ),
            angle: -theta,
        }
    }

    /// Sample `num_points` evenly spaced points from tail to tip
    pub fn sample(&self, num_points: usize) -> Vec<Vec2> {
        let length = self.length();
        (0..num_points)
            .map(|i| {
                let t = i as f32 / num_points.saturating_sub(1).max(1) as f32;
                self.point_at(t * length).pos
            })
            .collect()
    }
}
