//! Broadcast view coordinator
//!
//! Owns the timeline and the latest evaluation for the selected game, and
//! turns incoming feed frames and user actions into [`ViewEvent`]s for the
//! host page. Everything is synchronous: each call returns the events it
//! produced.

use serde::Serialize;

use crate::arrows::{self, ArrowCandidate};
use crate::chess::{UciMove, apply_move_to_fen, format_clock, white_to_move};
use crate::consts::{ARROW_WIDTH_EXPONENT, ARROW_WIDTH_SCALE};
use crate::error::{Result, ViewerError};
use crate::feed::{EvaluationSnapshot, FeedFrame, FeedRequest, GameInfo, StatusData};
use crate::geometry::{ArrowDescriptor, ArrowPath, FanOut, to_path};
use crate::settings::Settings;
use crate::timeline::{PositionTimeline, Selection, TimelineEntry};
use crate::{screen_direction_deg, square_center};

/// Something the page has to redraw or send
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ViewEvent {
    Status(StatusData),
    Games(Vec<GameInfo>),
    /// Move list slots written by a positions batch, in ply order
    #[serde(rename_all = "camelCase")]
    TimelineUpdated {
        tail_ply: usize,
        entries: Vec<TimelineEntry>,
    },
    #[serde(rename_all = "camelCase")]
    PositionChanged {
        entry: TimelineEntry,
        selection: Selection,
        label: Option<String>,
        /// Move actually played from this position, if known
        next_move: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    ArrowsChanged {
        paths: Vec<ArrowPath>,
        legend_len: usize,
    },
    /// Message to send upstream
    Request(FeedRequest),
}

/// Board state after playing part of a variation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PvPreview {
    pub variation_idx: usize,
    pub base_fen: String,
    pub fen: String,
    /// Moves played, UCI
    pub moves: Vec<String>,
    pub last_move: Option<String>,
}

/// Clocks for the shown position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockDisplay {
    pub white: Option<u64>,
    pub black: Option<u64>,
    pub white_to_move: bool,
    /// Side to move's clock is running down
    pub ticking: bool,
}

impl ClockDisplay {
    pub fn white_text(&self) -> String {
        self.white.map(format_clock).unwrap_or_default()
    }

    pub fn black_text(&self) -> String {
        self.black.map(format_clock).unwrap_or_default()
    }
}

#[derive(Debug, Default)]
pub struct BroadcastView {
    settings: Settings,
    timeline: PositionTimeline,
    game_id: Option<u64>,
    game_is_live: bool,
    snapshot: Option<EvaluationSnapshot>,
    candidates: Vec<ArrowCandidate>,
    paths: Vec<ArrowPath>,
    request: FeedRequest,
    /// Ply of the tail and when (ms) it arrived
    tail_arrival: Option<(usize, u64)>,
}

impl BroadcastView {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn timeline(&self) -> &PositionTimeline {
        &self.timeline
    }

    /// Mutable access for subscribing to selection notifications
    pub fn timeline_mut(&mut self) -> &mut PositionTimeline {
        &mut self.timeline
    }

    pub fn game_id(&self) -> Option<u64> {
        self.game_id
    }

    pub fn snapshot(&self) -> Option<&EvaluationSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn arrows(&self) -> &[ArrowCandidate] {
        &self.candidates
    }

    pub fn paths(&self) -> &[ArrowPath] {
        &self.paths
    }

    /// Last request sent upstream
    pub fn request(&self) -> &FeedRequest {
        &self.request
    }

    /// Switch to a game. Returns the request to send, if it differs from the last one.
    pub fn select_game(&mut self, game: &GameInfo) -> Option<FeedRequest> {
        if self.game_id != Some(game.game_id) {
            log::info!("Switching to game {} ({})", game.game_id, game.name);
            self.timeline.clear();
            self.snapshot = None;
            self.candidates.clear();
            self.paths.clear();
            self.tail_arrival = None;
        }
        self.game_id = Some(game.game_id);
        self.game_is_live = game.is_being_analyzed;

        self.send(FeedRequest {
            game_id: Some(game.game_id),
            ply: None,
        })
    }

    /// Handle a frame without a wall-clock time; clocks will not tick
    pub fn on_frame(&mut self, frame: FeedFrame) -> Vec<ViewEvent> {
        self.handle_frame(frame, None)
    }

    /// Handle a frame received at `now_ms`
    pub fn on_frame_at(&mut self, frame: FeedFrame, now_ms: u64) -> Vec<ViewEvent> {
        self.handle_frame(frame, Some(now_ms))
    }

    fn handle_frame(&mut self, frame: FeedFrame, now_ms: Option<u64>) -> Vec<ViewEvent> {
        let mut events = Vec::new();

        if let Some(status) = frame.status {
            events.push(ViewEvent::Status(status));
        }
        if let Some(games) = frame.games {
            events.push(ViewEvent::Games(games));
        }

        if let (Some(positions), Some(game_id)) = (frame.positions, self.game_id) {
            let batch: Vec<TimelineEntry> = positions
                .iter()
                .filter(|p| p.game_id == game_id)
                .map(TimelineEntry::from)
                .collect();
            if !batch.is_empty() {
                let mut plies: Vec<usize> = batch.iter().map(|e| e.ply).collect();
                plies.sort_unstable();
                plies.dedup();
                let selection = self.timeline.apply_update_batch(batch);

                let tail = self.timeline.tail_ply();
                if let (Some(tail), Some(now)) = (tail, now_ms) {
                    if plies.contains(&tail) {
                        self.tail_arrival = Some((tail, now));
                    }
                }
                // Ignored plies have no entry
                let entries: Vec<TimelineEntry> = plies
                    .iter()
                    .filter_map(|&ply| self.timeline.entry_at(ply).cloned())
                    .collect();
                if let (Some(tail_ply), false) = (tail, entries.is_empty()) {
                    events.push(ViewEvent::TimelineUpdated { tail_ply, entries });
                }
                if let Some(selection) = selection {
                    self.on_selection(selection, &mut events);
                }
            }
        }

        if let Some(evaluations) = frame.evaluations {
            let cursor = self.timeline.cursor();
            let mut latest = None;
            for eval in evaluations {
                if Some(eval.game_id) == self.game_id && Some(eval.ply) == cursor {
                    latest = Some(eval);
                } else {
                    log::debug!(
                        "Discarding evaluation for game {} ply {} (showing {:?} ply {:?})",
                        eval.game_id,
                        eval.ply,
                        self.game_id,
                        cursor
                    );
                }
            }
            if let Some(snapshot) = latest {
                self.snapshot = Some(snapshot);
                events.push(self.rebuild_arrows());
            }
        }

        events
    }

    pub fn select_ply(&mut self, ply: usize) -> Vec<ViewEvent> {
        let mut events = Vec::new();
        if let Some(selection) = self.timeline.select_ply(ply) {
            self.on_selection(selection, &mut events);
        }
        events
    }

    pub fn move_cursor(&mut self, delta: isize) -> Vec<ViewEvent> {
        let mut events = Vec::new();
        if let Some(selection) = self.timeline.move_cursor(delta) {
            self.on_selection(selection, &mut events);
        }
        events
    }

    /// Replace the settings and redraw the arrows with them
    pub fn apply_settings(&mut self, settings: Settings) -> ViewEvent {
        self.settings = settings;
        self.rebuild_arrows()
    }

    pub fn set_flipped(&mut self, flipped: bool) -> ViewEvent {
        self.settings.flipped = flipped;
        self.rebuild_arrows()
    }

    fn on_selection(&mut self, selection: Selection, events: &mut Vec<ViewEvent>) {
        let Some(entry) = self.timeline.entry_at(selection.ply).cloned() else {
            return;
        };

        if selection.is_new_selection {
            self.snapshot = None;
            self.candidates.clear();
            if !self.paths.is_empty() {
                self.paths.clear();
                events.push(ViewEvent::ArrowsChanged {
                    paths: Vec::new(),
                    legend_len: 0,
                });
            }
        }

        events.push(ViewEvent::PositionChanged {
            label: self.timeline.move_label(selection.ply),
            next_move: self
                .timeline
                .next_move_after(selection.ply)
                .map(str::to_string),
            entry,
            selection,
        });

        if selection.is_new_selection {
            let request = FeedRequest {
                game_id: self.game_id,
                ply: Some(selection.ply),
            };
            if let Some(request) = self.send(request) {
                events.push(ViewEvent::Request(request));
            }
        }
    }

    fn send(&mut self, request: FeedRequest) -> Option<FeedRequest> {
        if self.request == request {
            return None;
        }
        self.request = request;
        Some(request)
    }

    fn rebuild_arrows(&mut self) -> ViewEvent {
        self.candidates.clear();
        self.paths.clear();

        if let Some(snapshot) = &self.snapshot {
            self.candidates = arrows::select(snapshot, &self.settings.arrows);
            self.paths = build_paths(snapshot, &self.candidates, &self.settings);
        }

        ViewEvent::ArrowsChanged {
            paths: self.paths.clone(),
            legend_len: self.legend_len(),
        }
    }

    /// Rows needed in the variation legend
    pub fn legend_len(&self) -> usize {
        arrows::count_variations(&self.candidates)
    }

    /// Play `variation_idx` up to and including `upto_ply` from the shown position
    pub fn preview_variation(&self, variation_idx: usize, upto_ply: usize) -> Result<PvPreview> {
        let entry = self.timeline.current().ok_or(ViewerError::NoPosition)?;
        let snapshot = self.snapshot.as_ref().ok_or(ViewerError::NoEvaluation)?;
        let variation = snapshot
            .variations
            .get(variation_idx)
            .ok_or(ViewerError::VariationOutOfRange(variation_idx))?;

        let mut fen = entry.fen.clone();
        let mut moves = Vec::new();
        for uci in variation.pv_moves().into_iter().take(upto_ply + 1) {
            let mv = UciMove::parse(uci)?;
            fen = apply_move_to_fen(&fen, &mv)?;
            moves.push(uci.to_string());
        }

        Ok(PvPreview {
            variation_idx,
            base_fen: entry.fen.clone(),
            fen,
            last_move: moves.last().cloned(),
            moves,
        })
    }

    /// Clocks of the shown position at `now_ms`
    pub fn clock_display(&self, now_ms: u64) -> Option<ClockDisplay> {
        let entry = self.timeline.current()?;
        let white_to_move = white_to_move(entry.ply);
        let mut display = ClockDisplay {
            white: entry.white_clock,
            black: entry.black_clock,
            white_to_move,
            ticking: false,
        };

        if !(self.timeline.is_live() && self.game_is_live) {
            return Some(display);
        }
        if let Some((ply, arrived)) = self.tail_arrival {
            if ply == entry.ply {
                let elapsed = now_ms.saturating_sub(arrived) / 1000;
                let clock = if white_to_move {
                    &mut display.white
                } else {
                    &mut display.black
                };
                if let Some(seconds) = clock {
                    *seconds = seconds.saturating_sub(elapsed);
                    display.ticking = true;
                }
            }
        }
        Some(display)
    }

    pub fn on_disconnect(&mut self) {
        log::info!("Feed disconnected");
    }

    /// Request to re-send after the socket came back
    pub fn on_reconnect(&self) -> Option<FeedRequest> {
        log::info!("Feed reconnected");
        (self.request != FeedRequest::default()).then_some(self.request)
    }
}

/// Resolve arrow candidates into board outlines
pub fn build_paths(
    snapshot: &EvaluationSnapshot,
    candidates: &[ArrowCandidate],
    settings: &Settings,
) -> Vec<ArrowPath> {
    let geometry = &settings.geometry;
    let flipped = settings.flipped;
    let center = |sq| square_center(sq, flipped, geometry.square_size);
    let top_nodes = snapshot.variations.first().map_or(0, |v| v.nodes);
    let slots = arrows::assign_slots(snapshot, candidates);

    let mut paths = Vec::with_capacity(candidates.len());
    for (candidate, slot) in candidates.iter().zip(slots) {
        let Some(mv) = arrows::arrow_move(snapshot, candidate) else {
            log::warn!(
                "Skipping unparseable move at ply {} of variation {}",
                candidate.ply,
                candidate.variation_idx
            );
            continue;
        };

        let nodes = snapshot
            .variations
            .get(candidate.variation_idx)
            .map_or(0, |v| v.nodes);
        let share = if top_nodes > 0 {
            (nodes as f32 / top_nodes as f32).powf(ARROW_WIDTH_EXPONENT) * ARROW_WIDTH_SCALE
        } else {
            0.0
        };

        let style = geometry.style_for_ply(candidate.ply);
        let (width, head_width) = style.widths(share);
        let from = center(mv.from);
        let to = center(mv.to);
        let reference = slot.reference.unwrap_or(mv);

        let desc = ArrowDescriptor {
            from,
            to,
            width,
            angle: style.angle,
            head_length: style.head_length,
            head_width,
            dash_length: style.dash_length,
            dash_space: style.dash_space,
            layer: style.layer,
            fan_out: FanOut {
                index: slot.index,
                siblings: slot.siblings,
                direction_deg: screen_direction_deg(center(reference.from), center(reference.to)),
            },
            variation_idx: candidate.variation_idx,
            ply: candidate.ply,
        };
        paths.push(to_path(&desc, geometry.spread));
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{PositionDelta, VariationData};
    use crate::geometry::DrawLayer;

    const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    fn game(game_id: u64) -> GameInfo {
        GameInfo {
            game_id,
            name: format!("Game {game_id}"),
            is_being_analyzed: true,
            ..Default::default()
        }
    }

    fn position(game_id: u64, ply: usize) -> PositionDelta {
        PositionDelta {
            game_id,
            ply,
            fen: START.to_string(),
            move_uci: (ply > 0).then(|| "e2e4".to_string()),
            white_clock: Some(600),
            black_clock: Some(500),
            ..Default::default()
        }
    }

    fn positions(game_id: u64, plies: &[usize]) -> FeedFrame {
        FeedFrame {
            positions: Some(plies.iter().map(|&p| position(game_id, p)).collect()),
            ..Default::default()
        }
    }

    fn evaluation(game_id: u64, ply: usize) -> EvaluationSnapshot {
        let variation = |pv: &str, nodes| VariationData {
            pv_uci: pv.to_string(),
            nodes,
            ..Default::default()
        };
        EvaluationSnapshot {
            game_id,
            ply,
            nodes: 1000,
            variations: vec![
                variation("e2e4 e7e5 g1f3 b8c6", 600),
                variation("d2d4 d7d5 c2c4 e7e6", 300),
            ],
            ..Default::default()
        }
    }

    fn evaluations(evals: Vec<EvaluationSnapshot>) -> FeedFrame {
        FeedFrame {
            evaluations: Some(evals),
            ..Default::default()
        }
    }

    fn live_view() -> BroadcastView {
        let mut view = BroadcastView::new(Settings::default());
        view.select_game(&game(7));
        view.on_frame(positions(7, &[0, 1]));
        view
    }

    #[test]
    fn test_select_game_dedups_request() {
        let mut view = BroadcastView::new(Settings::default());
        let req = view.select_game(&game(1)).unwrap();
        assert_eq!(req.game_id, Some(1));
        assert_eq!(req.ply, None);
        assert!(view.select_game(&game(1)).is_none());
        assert!(view.select_game(&game(2)).is_some());
    }

    #[test]
    fn test_game_switch_clears_timeline() {
        let mut view = live_view();
        assert_eq!(view.timeline().tail_ply(), Some(1));
        view.select_game(&game(8));
        assert!(view.timeline().is_empty());
        assert!(view.snapshot().is_none());
    }

    #[test]
    fn test_positions_for_other_games_ignored() {
        let mut view = BroadcastView::new(Settings::default());
        assert!(view.on_frame(positions(7, &[0])).is_empty());
        view.select_game(&game(7));
        assert!(view.on_frame(positions(9, &[0, 1])).is_empty());
        assert!(view.timeline().is_empty());
    }

    #[test]
    fn test_live_positions_emit_selection_and_request() {
        let mut view = BroadcastView::new(Settings::default());
        view.select_game(&game(7));
        let events = view.on_frame(positions(7, &[0]));
        assert!(matches!(
            &events[0],
            ViewEvent::TimelineUpdated { tail_ply: 0, entries } if entries.len() == 1
        ));
        assert!(matches!(
            &events[1],
            ViewEvent::PositionChanged { selection, .. } if selection.ply == 0 && selection.is_ongoing
        ));
        assert_eq!(
            events[2],
            ViewEvent::Request(FeedRequest {
                game_id: Some(7),
                ply: Some(0)
            })
        );
    }

    #[test]
    fn test_evaluation_builds_arrows() {
        let mut view = live_view();
        let events = view.on_frame(evaluations(vec![evaluation(7, 1)]));
        let ViewEvent::ArrowsChanged { paths, legend_len } = &events[0] else {
            panic!("expected arrows, got {events:?}");
        };
        assert_eq!(*legend_len, 2);
        assert_eq!(paths.len(), 4);
        assert_eq!(view.legend_len(), 2);
        assert_eq!(paths[0].layer, DrawLayer::BeforePieces);
        assert!(paths.iter().filter(|p| p.ply == 1).all(|p| p.layer == DrawLayer::AfterPieces));
        assert!(paths.iter().all(|p| !p.is_empty()));
    }

    #[test]
    fn test_stale_evaluations_discarded() {
        let mut view = live_view();
        let events = view.on_frame(evaluations(vec![evaluation(7, 0), evaluation(3, 1)]));
        assert!(events.is_empty());
        assert!(view.snapshot().is_none());
    }

    #[test]
    fn test_last_matching_evaluation_wins() {
        let mut view = live_view();
        let mut newer = evaluation(7, 1);
        newer.nodes = 2000;
        view.on_frame(evaluations(vec![evaluation(7, 1), newer]));
        assert_eq!(view.snapshot().map(|s| s.nodes), Some(2000));
    }

    #[test]
    fn test_new_selection_clears_arrows() {
        let mut view = live_view();
        view.on_frame(evaluations(vec![evaluation(7, 1)]));
        let events = view.select_ply(0);
        assert_eq!(
            events[0],
            ViewEvent::ArrowsChanged {
                paths: Vec::new(),
                legend_len: 0
            }
        );
        assert!(view.arrows().is_empty());
        assert!(matches!(events.last(), Some(ViewEvent::Request(r)) if r.ply == Some(0)));

        // Reconfirming keeps everything and sends nothing
        let events = view.select_ply(0);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            ViewEvent::PositionChanged { selection, .. } if !selection.is_new_selection
        ));
    }

    #[test]
    fn test_historical_cursor_holds_on_new_positions() {
        let mut view = live_view();
        view.select_ply(0);
        let events = view.on_frame(positions(7, &[2]));
        assert_eq!(
            events,
            vec![ViewEvent::TimelineUpdated {
                tail_ply: 2,
                entries: vec![TimelineEntry::from(&position(7, 2))],
            }]
        );
        assert_eq!(view.timeline().cursor(), Some(0));
    }

    #[test]
    fn test_placeholder_fill_reported() {
        let mut view = BroadcastView::new(Settings::default());
        view.select_game(&game(7));
        view.on_frame(positions(7, &[3]));
        assert!(view.timeline().entry_at(1).is_none());

        // Tail stays at 3 but the gap is filled
        let events = view.on_frame(positions(7, &[0, 1, 2, 3]));
        let updated = events
            .iter()
            .find_map(|e| match e {
                ViewEvent::TimelineUpdated { tail_ply, entries } => Some((*tail_ply, entries)),
                _ => None,
            })
            .expect("timeline update");
        assert_eq!(updated.0, 3);
        assert_eq!(
            updated.1.iter().map(|e| e.ply).collect::<Vec<_>>(),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn test_historical_update_reported() {
        let mut view = BroadcastView::new(Settings::default());
        view.select_game(&game(7));
        view.on_frame(positions(7, &[3]));
        view.on_frame(positions(7, &[0, 1, 2, 3]));
        view.select_ply(1);

        let mut update = position(7, 2);
        update.fen = "c-updated".to_string();
        let events = view.on_frame(FeedFrame {
            positions: Some(vec![update]),
            ..Default::default()
        });
        let [ViewEvent::TimelineUpdated { tail_ply, entries }] = events.as_slice() else {
            panic!("expected a single timeline update, got {events:?}");
        };
        assert_eq!(*tail_ply, 3);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].ply, 2);
        assert_eq!(entries[0].fen, "c-updated");
        assert_eq!(view.timeline().cursor(), Some(1));
        assert_eq!(
            view.timeline().entry_at(2).map(|e| e.fen.as_str()),
            Some("c-updated")
        );
    }

    #[test]
    fn test_preview_variation() {
        let mut view = live_view();
        assert!(matches!(view.preview_variation(0, 0), Err(ViewerError::NoEvaluation)));
        view.on_frame(evaluations(vec![evaluation(7, 1)]));

        let preview = view.preview_variation(0, 1).unwrap();
        assert_eq!(preview.moves, vec!["e2e4", "e7e5"]);
        assert_eq!(preview.last_move.as_deref(), Some("e7e5"));
        assert_eq!(
            preview.fen,
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w"
        );
        // Past the end of the line plays what there is
        assert_eq!(view.preview_variation(1, 50).unwrap().moves.len(), 4);
        assert!(matches!(
            view.preview_variation(5, 0),
            Err(ViewerError::VariationOutOfRange(5))
        ));
    }

    #[test]
    fn test_preview_without_position() {
        let view = BroadcastView::new(Settings::default());
        assert!(matches!(view.preview_variation(0, 0), Err(ViewerError::NoPosition)));
    }

    #[test]
    fn test_clock_ticks_only_when_live() {
        let mut view = BroadcastView::new(Settings::default());
        view.select_game(&game(7));
        view.on_frame_at(positions(7, &[0, 1]), 10_000);

        // Ply 1: black to move
        let clocks = view.clock_display(25_500).unwrap();
        assert!(clocks.ticking);
        assert!(!clocks.white_to_move);
        assert_eq!(clocks.white, Some(600));
        assert_eq!(clocks.black, Some(485));
        assert_eq!(clocks.black_text(), "00:08:05");

        view.select_ply(0);
        let clocks = view.clock_display(25_500).unwrap();
        assert!(!clocks.ticking);
        assert_eq!(clocks.white, Some(600));
    }

    #[test]
    fn test_clock_frozen_for_finished_game() {
        let mut view = BroadcastView::new(Settings::default());
        let mut finished = game(7);
        finished.is_being_analyzed = false;
        view.select_game(&finished);
        view.on_frame_at(positions(7, &[0, 1]), 0);
        let clocks = view.clock_display(60_000).unwrap();
        assert!(!clocks.ticking);
        assert_eq!(clocks.black, Some(500));
    }

    #[test]
    fn test_reconnect_resends_last_request() {
        let mut view = BroadcastView::new(Settings::default());
        assert!(view.on_reconnect().is_none());
        view.select_game(&game(7));
        view.on_frame(positions(7, &[0]));
        view.on_disconnect();
        assert_eq!(
            view.on_reconnect(),
            Some(FeedRequest {
                game_id: Some(7),
                ply: Some(0)
            })
        );
        // Timeline survives the disconnect
        assert_eq!(view.timeline().tail_ply(), Some(0));
    }

    #[test]
    fn test_flip_mirrors_arrows() {
        let mut view = live_view();
        view.on_frame(evaluations(vec![evaluation(7, 1)]));
        let before = view.paths()[0].dashes[0].tip().unwrap();
        view.set_flipped(true);
        let after = view.paths()[0].dashes[0].tip().unwrap();
        let board = crate::consts::BOARD_SIZE;
        assert!((before.x + after.x - board).abs() < 1e-2);
        assert!((before.y + after.y - board).abs() < 1e-2);
    }

    #[test]
    fn test_status_and_games_pass_through() {
        let mut view = BroadcastView::new(Settings::default());
        let frame = FeedFrame {
            status: Some(StatusData::default()),
            games: Some(vec![game(1)]),
            ..Default::default()
        };
        let events = view.on_frame(frame);
        assert!(matches!(events[0], ViewEvent::Status(_)));
        assert!(matches!(&events[1], ViewEvent::Games(g) if g.len() == 1));
    }
}
