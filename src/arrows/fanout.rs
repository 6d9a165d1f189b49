//! Fan-out bucketing
//!
//! First moves and replies leaving the same square in the same direction
//! would be drawn on top of each other. They are grouped by
//! `(origin square, direction)` and numbered within the group. Maneuver
//! arrows reuse the slot of their variation's first move.

use std::collections::HashMap;

use crate::chess::{Square, UciMove};
use crate::feed::EvaluationSnapshot;

use super::selector::ArrowCandidate;

/// Where an arrow sits in its fan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FanSlot {
    pub index: usize,
    pub siblings: usize,
    /// Move whose direction the fan is spread across
    pub reference: Option<UciMove>,
}

impl Default for FanSlot {
    fn default() -> Self {
        Self {
            index: 0,
            siblings: 1,
            reference: None,
        }
    }
}

/// The UCI move an arrow depicts, if it parses
pub fn arrow_move(snapshot: &EvaluationSnapshot, arrow: &ArrowCandidate) -> Option<UciMove> {
    let variation = snapshot.variations.get(arrow.variation_idx)?;
    let mv = variation.pv_uci.split_whitespace().nth(arrow.ply)?;
    UciMove::parse(mv).ok()
}

/// Assign a fan slot to every arrow, aligned with `arrows`
pub fn assign_slots(snapshot: &EvaluationSnapshot, arrows: &[ArrowCandidate]) -> Vec<FanSlot> {
    let moves: Vec<Option<UciMove>> = arrows.iter().map(|a| arrow_move(snapshot, a)).collect();
    let key = |mv: &UciMove| -> (Square, i32) { (mv.from, mv.direction_deg()) };

    let mut totals: HashMap<(Square, i32), usize> = HashMap::new();
    for (arrow, mv) in arrows.iter().zip(&moves) {
        if arrow.ply >= 2 {
            continue;
        }
        if let Some(mv) = mv {
            *totals.entry(key(mv)).or_default() += 1;
        }
    }

    let mut slots = vec![FanSlot::default(); arrows.len()];
    let mut taken: HashMap<(Square, i32), usize> = HashMap::new();
    // Slot of each variation's first move, reused by its maneuvers
    let mut first_move_slot: HashMap<usize, FanSlot> = HashMap::new();

    for (i, (arrow, mv)) in arrows.iter().zip(&moves).enumerate() {
        if arrow.ply >= 2 {
            continue;
        }
        let Some(mv) = mv else { continue };
        let k = key(mv);
        let current = taken.entry(k).or_default();
        let slot = FanSlot {
            index: *current,
            siblings: totals.get(&k).copied().unwrap_or(1),
            reference: Some(*mv),
        };
        *current += 1;
        slots[i] = slot;
        if arrow.ply == 0 {
            first_move_slot.insert(arrow.variation_idx, slot);
        }
    }

    for (i, arrow) in arrows.iter().enumerate() {
        if arrow.ply < 2 {
            continue;
        }
        slots[i] = first_move_slot
            .get(&arrow.variation_idx)
            .copied()
            .unwrap_or_else(|| FanSlot {
                reference: snapshot
                    .variations
                    .get(arrow.variation_idx)
                    .and_then(|v| v.pv_uci.split_whitespace().next())
                    .and_then(|m| UciMove::parse(m).ok()),
                ..FanSlot::default()
            });
    }

    slots
}
