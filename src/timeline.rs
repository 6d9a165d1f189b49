//! Position timeline
//!
//! Sparse, ply-indexed history of a game as it arrives from the feed, plus
//! the selection cursor. Entries can arrive out of order and more than once;
//! missing plies are held as placeholders until their data shows up.
//!
//! The cursor follows the live tip while the user has not scrolled away from
//! it. Once a historical ply is selected, new positions extend the timeline
//! without moving the cursor.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::chess::move_label;
use crate::feed::PositionDelta;

/// Plies beyond this are treated as malformed and ignored
pub const MAX_PLY: usize = 4096;

/// Engine summary attached to a played position
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvalSummary {
    pub score_q: Option<f32>,
    pub score_w: Option<f32>,
    pub score_d: Option<f32>,
    pub score_b: Option<f32>,
    pub moves_left: Option<f32>,
    pub nodes: Option<u64>,
    pub time: Option<u64>,
    pub depth: Option<u32>,
    pub seldepth: Option<u32>,
}

impl EvalSummary {
    pub fn has_wdl(&self) -> bool {
        crate::chess::is_valid_wdl(self.score_w, self.score_d, self.score_b)
    }
}

/// One position of the game
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// 0 = starting position
    pub ply: usize,
    pub move_uci: Option<String>,
    pub move_san: Option<String>,
    pub fen: String,
    /// Seconds left on each clock
    pub white_clock: Option<u64>,
    pub black_clock: Option<u64>,
    pub eval: Option<EvalSummary>,
    pub thinking_id: Option<u64>,
}

impl From<&PositionDelta> for TimelineEntry {
    fn from(delta: &PositionDelta) -> Self {
        let eval = EvalSummary {
            score_q: delta.score_q,
            score_w: delta.score_w,
            score_d: delta.score_d,
            score_b: delta.score_b,
            moves_left: delta.moves_left,
            nodes: delta.nodes,
            time: delta.time,
            depth: delta.depth,
            seldepth: delta.seldepth,
        };
        Self {
            ply: delta.ply,
            move_uci: delta.move_uci.clone(),
            move_san: delta.move_san.clone(),
            fen: delta.fen.clone(),
            white_clock: delta.white_clock,
            black_clock: delta.black_clock,
            eval: (eval != EvalSummary::default()).then_some(eval),
            thinking_id: delta.thinking_id,
        }
    }
}

/// Notification produced when the cursor is (re)confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub ply: usize,
    /// False when the same ply was selected again
    pub is_new_selection: bool,
    /// The selected ply is the newest known position
    pub is_ongoing: bool,
}

pub type SubscriptionId = u64;

/// Called with `(entry, is_new_selection, is_ongoing)`
pub type Subscriber = Box<dyn FnMut(&TimelineEntry, bool, bool)>;

#[derive(Default)]
pub struct PositionTimeline {
    entries: Vec<Option<TimelineEntry>>,
    cursor: Option<usize>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: SubscriptionId,
}

impl fmt::Debug for PositionTimeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PositionTimeline")
            .field("len", &self.entries.len())
            .field("populated", &self.populated_len())
            .field("cursor", &self.cursor)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl PositionTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: Subscriber) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.subscribers.push((id, subscriber));
        id
    }

    /// Returns false if the id was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Drop every entry and the cursor (new game). Subscribers stay.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest known ply
    pub fn tail_ply(&self) -> Option<usize> {
        self.entries.len().checked_sub(1)
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Cursor sits on the newest known position
    pub fn is_live(&self) -> bool {
        self.cursor.is_some() && self.cursor == self.tail_ply()
    }

    /// Number of plies with real data
    pub fn populated_len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    pub fn entry_at(&self, ply: usize) -> Option<&TimelineEntry> {
        self.entries.get(ply)?.as_ref()
    }

    pub fn current(&self) -> Option<&TimelineEntry> {
        self.entry_at(self.cursor?)
    }

    /// Populated entries in ply order
    pub fn entries(&self) -> impl Iterator<Item = &TimelineEntry> {
        self.entries.iter().flatten()
    }

    /// UCI move that was played from `ply`, if known
    pub fn next_move_after(&self, ply: usize) -> Option<&str> {
        self.entry_at(ply + 1)?.move_uci.as_deref()
    }

    /// Move list label of the move leading to `ply`
    pub fn move_label(&self, ply: usize) -> Option<String> {
        let entry = self.entry_at(ply)?;
        move_label(ply, entry.move_san.as_deref().or(entry.move_uci.as_deref())?)
    }

    /// Fold a batch of entries in, then move the cursor if it was following.
    ///
    /// The cursor follows when it was on the previous tail, or when at most
    /// one real entry existed before the batch. Subscribers are notified once,
    /// after the whole batch is applied.
    pub fn apply_update_batch<I>(&mut self, batch: I) -> Option<Selection>
    where
        I: IntoIterator<Item = TimelineEntry>,
    {
        let following = self.cursor == self.tail_ply() || self.populated_len() <= 1;

        let mut applied = 0usize;
        for entry in batch {
            let ply = entry.ply;
            if ply > MAX_PLY {
                log::warn!("Ignoring position with ply {}", ply);
                continue;
            }
            if ply >= self.entries.len() {
                self.entries.resize(ply + 1, None);
            }
            self.entries[ply] = Some(entry);
            applied += 1;
        }

        if applied == 0 || !following {
            return None;
        }
        let tail = self.tail_ply()?;
        let is_new = self.cursor != Some(tail);
        self.cursor = Some(tail);
        log::debug!("Following live position, cursor at ply {}", tail);
        Some(self.notify(tail, is_new))
    }

    /// Select a ply. Out of range and placeholder plies are ignored.
    pub fn select_ply(&mut self, ply: usize) -> Option<Selection> {
        self.entry_at(ply)?;
        let is_new = self.cursor != Some(ply);
        self.cursor = Some(ply);
        Some(self.notify(ply, is_new))
    }

    /// Step the cursor by `delta` plies, skipping placeholders
    pub fn move_cursor(&mut self, delta: isize) -> Option<Selection> {
        if delta == 0 {
            return self.select_ply(self.cursor?);
        }
        let step = delta.signum();
        let mut remaining = delta.unsigned_abs();
        let mut ply = self.cursor?;
        while remaining > 0 {
            ply = ply.checked_add_signed(step)?;
            if ply >= self.entries.len() {
                return None;
            }
            if self.entries[ply].is_some() {
                remaining -= 1;
            }
        }
        self.select_ply(ply)
    }

    fn notify(&mut self, ply: usize, is_new_selection: bool) -> Selection {
        let selection = Selection {
            ply,
            is_new_selection,
            is_ongoing: Some(ply) == self.tail_ply(),
        };
        if let Some(entry) = self.entries.get(ply).and_then(Option::as_ref) {
            for (_, subscriber) in self.subscribers.iter_mut() {
                subscriber(entry, selection.is_new_selection, selection.is_ongoing);
            }
        }
        selection
    }
}
