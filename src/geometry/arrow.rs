//! Arrow descriptors to drawable outlines
//!
//! An arrow is built in the local frame of its shaft (tail at the origin, tip
//! on the positive x axis), cut into dashes, and then rotated and translated
//! onto the board. The last dash always carries the solid chevron head.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arc::ArcShaft;

/// Arrows shorter than this produce no outline
const MIN_CHORD: f32 = 1e-3;
/// Smallest dash that is honoured; shorter dashes would explode the outline count
const MIN_DASH: f32 = 0.5;
/// Distance between outline samples along a curved shaft
const SAMPLE_STEP: f32 = 4.0;

/// Whether an arrow is painted under or over the piece layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DrawLayer {
    #[default]
    BeforePieces,
    AfterPieces,
}

/// Position of an arrow within a group sharing origin square and direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FanOut {
    pub index: usize,
    pub siblings: usize,
    /// Direction the group points to, screen degrees
    pub direction_deg: f32,
}

impl Default for FanOut {
    fn default() -> Self {
        Self {
            index: 0,
            siblings: 1,
            direction_deg: 0.0,
        }
    }
}

impl FanOut {
    /// `(index + 1) / (siblings + 1) - 0.5`, in (-0.5, 0.5)
    pub fn fraction(&self) -> f32 {
        (self.index as f32 + 1.0) / (self.siblings as f32 + 1.0) - 0.5
    }

    /// Signed lateral offset for a fan of total width `spread`
    pub fn lateral_offset(&self, spread: f32) -> f32 {
        self.fraction() * spread
    }

    /// Displacement perpendicular to the group direction
    pub fn displacement(&self, spread: f32) -> Vec2 {
        let dir = Vec2::from_angle(self.direction_deg.to_radians());
        dir.perp() * self.lateral_offset(spread)
    }
}

/// Abstract arrow as chosen by the view
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrowDescriptor {
    pub from: Vec2,
    pub to: Vec2,
    pub width: f32,
    /// Curvature in radians, 0 = straight
    pub angle: f32,
    pub head_length: f32,
    pub head_width: f32,
    pub dash_length: f32,
    pub dash_space: f32,
    pub layer: DrawLayer,
    pub fan_out: FanOut,
    pub variation_idx: usize,
    pub ply: usize,
}

/// One closed outline
///
/// The outline runs back along the left edge of the shaft, forward along the
/// right edge, then around the chevron if the dash carries the head.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dash {
    pub outline: Vec<Vec2>,
    pub has_head: bool,
    /// SVG path data (`M x y L ... Z`)
    pub path: String,
}

impl Dash {
    fn new(outline: Vec<Vec2>, has_head: bool) -> Self {
        let mut path = String::new();
        for (i, p) in outline.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            path.push_str(&format!("{cmd} {:.2} {:.2} ", p.x, p.y));
        }
        path.push('Z');
        Self {
            outline,
            has_head,
            path,
        }
    }

    /// Point of the chevron
    pub fn tip(&self) -> Option<Vec2> {
        if !self.has_head {
            return None;
        }
        let i = self.outline.len().checked_sub(2)?;
        self.outline.get(i).copied()
    }
}

/// Resolved arrow, ready for the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrowPath {
    pub variation_idx: usize,
    pub ply: usize,
    pub layer: DrawLayer,
    /// CSS classes the page styles arrows with
    pub class: String,
    pub dashes: Vec<Dash>,
}

impl ArrowPath {
    pub fn is_empty(&self) -> bool {
        self.dashes.is_empty()
    }
}

/// Convert an arrow descriptor into dash outlines in board coordinates
pub fn to_path(desc: &ArrowDescriptor, spread: f32) -> ArrowPath {
    let mut path = ArrowPath {
        variation_idx: desc.variation_idx,
        ply: desc.ply,
        layer: desc.layer,
        class: format!(
            "arrow arrow-variation{v} arrow-variation{v}-ply{}",
            desc.ply,
            v = desc.variation_idx
        ),
        dashes: Vec::new(),
    };

    let offset = desc.fan_out.displacement(spread);
    let from = desc.from + offset;
    let to = desc.to + offset;
    let chord = from.distance(to);
    if !(chord > MIN_CHORD) {
        return path;
    }

    let shaft = ArcShaft::new(chord, desc.angle);
    let length = shaft.length();
    let rotation = (to - from) / chord;
    let to_board = |p: Vec2| from + rotation.rotate(p);

    let head_length = desc.head_length.clamp(0.0, length);
    let (dash, space) = if desc.dash_length > 0.0 {
        (desc.dash_length.max(MIN_DASH), desc.dash_space.max(0.0))
    } else {
        (length, 0.0)
    };

    let mut start: f32 = 0.0;
    loop {
        let end = (start + dash).min(length);
        let has_head = start + dash + head_length >= length;
        let dash_start = start.min(length - head_length).max(0.0);
        let outline = dash_outline(&shaft, desc, dash_start, end, has_head);
        path.dashes
            .push(Dash::new(outline.into_iter().map(to_board).collect(), has_head));
        if has_head {
            break;
        }
        start += dash + space;
    }

    path
}

/// Outline of one dash in the shaft's local frame
fn dash_outline(
    shaft: &ArcShaft,
    desc: &ArrowDescriptor,
    start: f32,
    end: f32,
    has_head: bool,
) -> Vec<Vec2> {
    let length = shaft.length();
    let head_length = desc.head_length.clamp(0.0, length);
    let shaft_end = if has_head { length - head_length } else { end };
    let steps = if shaft.is_straight() {
        1
    } else {
        ((shaft_end - start) / SAMPLE_STEP).ceil().max(1.0) as usize
    };

    // Centre line with the half-width offset at each sample
    let half_width = desc.width / 2.0;
    let edge: Vec<(Vec2, Vec2)> = (0..=steps)
        .map(|i| {
            let k = start + (shaft_end - start) * i as f32 / steps as f32;
            let p = shaft.point_at(k);
            (p.pos, Vec2::from_angle(p.angle).perp() * half_width)
        })
        .collect();

    let mut outline: Vec<Vec2> = edge.iter().rev().map(|&(p, d)| p + d).collect();
    outline.extend(edge.iter().map(|&(p, d)| p - d));
    if has_head {
        let base = shaft.point_at(shaft_end).pos;
        let tip = shaft.point_at(length).pos;
        let h = (tip - base).normalize_or(Vec2::X).perp() * desc.head_width / 2.0;
        outline.extend([base - h, tip, base + h]);
    }
    outline
}
