//! Budgeted arrow selection
//!
//! Every variation competes for a fixed arrow budget through one priority
//! pool. The first move, the reply and the head of each maneuver chain start
//! in the pool; extracting a maneuver step re-inserts its continuation with a
//! further decayed weight, so a dominant line can keep spending budget on
//! deep maneuvers while weak lines get a single arrow or none.

use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap};

use serde::{Deserialize, Serialize};

use crate::chess::{Square, UciMove, split_pv};
use crate::feed::EvaluationSnapshot;
use crate::settings::{ArrowTunables, WeightBaseline};

/// Slack for float budget accounting
const BUDGET_EPSILON: f64 = 1e-9;

/// One arrow chosen for drawing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrowCandidate {
    /// Rank of the variation (0 = engine's top line)
    pub variation_idx: usize,
    /// Ply offset into the variation's PV
    pub ply: usize,
    pub weight: f64,
}

/// Squares a maneuvering piece has touched
#[derive(Debug, Clone)]
struct Chain {
    at: Square,
    visited: Vec<Square>,
}

impl Chain {
    /// Start a chain at `ply` if the move there continues the move at `ply - 2`
    fn open(pv: &[&str], ply: usize) -> Option<Self> {
        if ply < 2 || ply >= pv.len() {
            return None;
        }
        let prev = UciMove::parse(pv[ply - 2]).ok()?;
        let chain = Chain {
            at: prev.to,
            visited: vec![prev.from, prev.to],
        };
        chain.advance(pv, ply)
    }

    /// Extend the chain with the move at `ply`: same piece, no revisits
    fn advance(mut self, pv: &[&str], ply: usize) -> Option<Self> {
        let mv = UciMove::parse(pv.get(ply)?).ok()?;
        if mv.from != self.at || self.visited.contains(&mv.to) {
            return None;
        }
        self.visited.push(mv.to);
        self.at = mv.to;
        Some(self)
    }
}

#[derive(Debug, Clone)]
struct PoolItem {
    candidate: ArrowCandidate,
    chain: Option<Chain>,
}

impl PoolItem {
    fn new(variation_idx: usize, ply: usize, weight: f64) -> Self {
        Self {
            candidate: ArrowCandidate {
                variation_idx,
                ply,
                weight,
            },
            chain: None,
        }
    }
}

impl PartialEq for PoolItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PoolItem {}

impl PartialOrd for PoolItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PoolItem {
    /// Heaviest first; on ties the shallower ply, then the better rank
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (&self.candidate, &other.candidate);
        a.weight
            .total_cmp(&b.weight)
            .then_with(|| b.ply.cmp(&a.ply))
            .then_with(|| b.variation_idx.cmp(&a.variation_idx))
    }
}

/// Node count the variation weights are relative to
fn baseline_nodes(snapshot: &EvaluationSnapshot, baseline: WeightBaseline) -> u64 {
    match baseline {
        WeightBaseline::SearchTotal => snapshot.nodes,
        WeightBaseline::TopVariation => snapshot.variations.first().map_or(0, |v| v.nodes),
    }
}

/// Choose the arrows to draw for an evaluation snapshot.
///
/// The result is sorted by ascending ply; within a ply arrows keep the order
/// they were extracted in (heaviest first).
pub fn select(snapshot: &EvaluationSnapshot, tunables: &ArrowTunables) -> Vec<ArrowCandidate> {
    let t = tunables.sanitized();
    let baseline = baseline_nodes(snapshot, t.baseline);
    if baseline == 0 {
        return Vec::new();
    }

    let lines: Vec<Vec<&str>> = snapshot
        .variations
        .iter()
        .take(t.max_variations)
        .map(|v| split_pv(&v.pv_uci))
        .collect();

    let mut pool = BinaryHeap::new();
    for (idx, pv) in lines.iter().enumerate() {
        let weight = snapshot.variations[idx].nodes as f64 / baseline as f64;
        // Ranks are sorted by nodes, nothing further down can qualify
        if !(weight >= t.min_weight) {
            break;
        }
        if pv.is_empty() {
            continue;
        }

        pool.push(PoolItem::new(idx, 0, weight));
        let offers_reply = pv.len() > 1 && weight >= t.response_threshold;
        if offers_reply {
            pool.push(PoolItem::new(idx, 1, weight * t.response_factor));
        }
        // The reply's maneuver only makes sense when the reply is shown
        let chains = [
            (2, t.maneuver_factor, true),
            (3, t.response_maneuver_factor, offers_reply),
        ];
        for (ply, factor, _) in chains.into_iter().filter(|c| c.2) {
            if let Some(chain) = Chain::open(pv, ply) {
                let mut item = PoolItem::new(idx, ply, weight * factor);
                item.chain = Some(chain);
                pool.push(item);
            }
        }
    }

    let mut remaining = t.arrow_budget;
    let mut arrows = Vec::new();
    while let Some(item) = pool.pop() {
        let candidate = item.candidate;
        if candidate.weight < t.min_weight || remaining <= BUDGET_EPSILON {
            break;
        }
        let cost = t.cost(candidate.ply);
        if cost > remaining + BUDGET_EPSILON {
            // A cheaper maneuver further down may still fit
            continue;
        }
        remaining -= cost;
        arrows.push(candidate);

        if let Some(chain) = item.chain {
            let weight = candidate.weight * t.maneuver_step_decay;
            let next_ply = candidate.ply + 2;
            if weight >= t.min_weight {
                if let Some(chain) = chain.advance(&lines[candidate.variation_idx], next_ply) {
                    let mut next = PoolItem::new(candidate.variation_idx, next_ply, weight);
                    next.chain = Some(chain);
                    pool.push(next);
                }
            }
        }
    }

    arrows.sort_by_key(|a| a.ply);
    log::debug!(
        "Selected {} arrows for ply {} ({:.1} budget left)",
        arrows.len(),
        snapshot.ply,
        remaining
    );
    arrows
}

/// Number of distinct variations with at least one arrow (legend rows)
pub fn count_variations(arrows: &[ArrowCandidate]) -> usize {
    arrows
        .iter()
        .map(|a| a.variation_idx)
        .collect::<BTreeSet<_>>()
        .len()
}
