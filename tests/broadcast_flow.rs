//! End-to-end feed handling through the public API

use broadcast_board::feed::{FeedFrame, GameInfo};
use broadcast_board::geometry::DrawLayer;
use broadcast_board::view::ViewEvent;
use broadcast_board::{ArrowPreset, BroadcastView, Settings};

const GAMES: &str = r#"{
    "status": {"message": "Round 3 live", "numViewers": 12},
    "games": [
        {"gameId": 41, "name": "Board 1", "isFinished": false, "isBeingAnalyzed": true,
         "player1": {"name": "Alpha", "rating": 2750}, "player2": {"name": "Beta", "rating": 2710},
         "feedUrl": "https://example.org/round3.pgn"},
        {"gameId": 42, "name": "Board 2", "isFinished": true, "isBeingAnalyzed": false,
         "player1": {"name": "Gamma", "rating": 2600}, "player2": {"name": "Delta", "rating": 2650},
         "feedUrl": "https://example.org/round3.pgn"}
    ]
}"#;

const OPENING: &str = r#"{"positions": [
    {"gameId": 41, "ply": 0, "fen": "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
     "whiteClock": 5400, "blackClock": 5400},
    {"gameId": 41, "ply": 1, "moveUci": "e2e4", "moveSan": "e4",
     "fen": "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1",
     "whiteClock": 5350, "blackClock": 5400, "scoreQ": 0.1, "scoreW": 0.3, "scoreD": 0.5, "scoreB": 0.2},
    {"gameId": 42, "ply": 0, "fen": "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"}
]}"#;

const EVAL_PLY1: &str = r#"{"evaluations": [
    {"gameId": 41, "ply": 1, "nodes": 1000000, "time": 5000, "depth": 20, "seldepth": 30,
     "variations": [
        {"moveUci": "c7c5", "moveSan": "c5", "pvUci": "c7c5 g1f3 d7d6 f1b5", "pvSan": "c5 Nf3 d6 Bb5+",
         "nodes": 500000, "scoreW": 0.3, "scoreD": 0.5, "scoreB": 0.2},
        {"moveUci": "e7e5", "moveSan": "e5", "pvUci": "e7e5 g1f3 b8c6", "pvSan": "e5 Nf3 Nc6",
         "nodes": 250000, "scoreW": 0.3, "scoreD": 0.5, "scoreB": 0.2},
        {"moveUci": "e7e6", "moveSan": "e6", "pvUci": "e7e6 d2d4", "pvSan": "e6 d4",
         "nodes": 30000, "scoreW": 0.3, "scoreD": 0.5, "scoreB": 0.2}
     ]}
]}"#;

fn frame(json: &str) -> FeedFrame {
    FeedFrame::decode(json).expect("valid frame")
}

fn first_live_game(events: &[ViewEvent]) -> GameInfo {
    events
        .iter()
        .find_map(|e| match e {
            ViewEvent::Games(games) => games.iter().find(|g| g.is_being_analyzed).cloned(),
            _ => None,
        })
        .expect("a live game")
}

#[test]
fn test_full_broadcast_flow() {
    let mut view = BroadcastView::new(Settings::default());

    let events = view.on_frame(frame(GAMES));
    assert!(matches!(&events[0], ViewEvent::Status(s) if s.num_viewers == 12));
    let game = first_live_game(&events);
    assert_eq!(game.game_id, 41);

    let request = view.select_game(&game).expect("first request");
    assert_eq!(request.encode().unwrap(), r#"{"gameId":41}"#);

    let events = view.on_frame_at(frame(OPENING), 1_000);
    assert!(matches!(
        &events[0],
        ViewEvent::TimelineUpdated { tail_ply: 1, entries } if entries.len() == 2
    ));
    assert_eq!(view.timeline().tail_ply(), Some(1));
    assert_eq!(view.timeline().cursor(), Some(1));
    let position = events
        .iter()
        .find_map(|e| match e {
            ViewEvent::PositionChanged { entry, label, .. } => Some((entry.clone(), label.clone())),
            _ => None,
        })
        .expect("position event");
    assert_eq!(position.1.as_deref(), Some("1. e4"));
    assert!(position.0.eval.as_ref().is_some_and(|e| e.has_wdl()));
    let request = events
        .iter()
        .find_map(|e| match e {
            ViewEvent::Request(r) => Some(*r),
            _ => None,
        })
        .expect("ply request");
    assert_eq!(request.encode().unwrap(), r#"{"gameId":41,"ply":1}"#);

    // Third variation is under the minimum weight
    let events = view.on_frame(frame(EVAL_PLY1));
    let ViewEvent::ArrowsChanged { paths, legend_len } = &events[0] else {
        panic!("expected arrows, got {events:?}");
    };
    assert_eq!(*legend_len, 2);
    assert_eq!(paths.len(), 4);
    assert_eq!(
        paths.iter().map(|p| (p.variation_idx, p.ply)).collect::<Vec<_>>(),
        vec![(0, 0), (1, 0), (0, 1), (1, 1)]
    );
    assert_eq!(paths[0].layer, DrawLayer::BeforePieces);
    assert_eq!(paths[2].layer, DrawLayer::AfterPieces);
    // Dashed reply arrow
    assert!(paths[2].dashes.len() > 1);

    let preview = view.preview_variation(0, 1).unwrap();
    assert_eq!(preview.moves, vec!["c7c5", "g1f3"]);
    assert_eq!(
        preview.fen,
        "rnbqkbnr/pp1ppppp/8/2p5/4P3/5N2/PPPP1PPP/RNBQKB1R b"
    );

    let clocks = view.clock_display(31_000).unwrap();
    assert!(clocks.ticking);
    assert_eq!(clocks.black, Some(5370));
    assert_eq!(clocks.white, Some(5350));

    // Going back into history stops following and drops the arrows
    let events = view.move_cursor(-1);
    assert!(events.iter().any(|e| matches!(
        e,
        ViewEvent::ArrowsChanged { paths, .. } if paths.is_empty()
    )));
    assert!(!view.timeline().is_live());
    assert!(!view.clock_display(31_000).unwrap().ticking);

    // The late evaluation for ply 1 is stale now
    assert!(view.on_frame(frame(EVAL_PLY1)).is_empty());
    assert_eq!(view.legend_len(), 0);

    // Reconnect re-sends the historical ply
    view.on_disconnect();
    let request = view.on_reconnect().unwrap();
    assert_eq!(request.ply, Some(0));
}

#[test]
fn test_legacy_preset_keeps_weaker_lines() {
    let mut view = BroadcastView::new(Settings::from_preset(ArrowPreset::Legacy));
    let events = view.on_frame(frame(GAMES));
    view.select_game(&first_live_game(&events));
    view.on_frame(frame(OPENING));
    view.on_frame(frame(EVAL_PLY1));

    // Weights are relative to the top line: 1, 1/2, 3/50
    let replies = view.arrows().iter().filter(|a| a.ply == 1).count();
    assert_eq!(replies, 2);
    assert_eq!(view.legend_len(), 3);
}

#[test]
fn test_game_switch_resets_state() {
    let mut view = BroadcastView::new(Settings::default());
    let events = view.on_frame(frame(GAMES));
    view.select_game(&first_live_game(&events));
    view.on_frame(frame(OPENING));
    view.on_frame(frame(EVAL_PLY1));
    assert!(!view.paths().is_empty());

    let other = match &events[1] {
        ViewEvent::Games(games) => games[1].clone(),
        other => panic!("expected games, got {other:?}"),
    };
    let request = view.select_game(&other).unwrap();
    assert_eq!(request.game_id, Some(42));
    assert!(view.timeline().is_empty());
    assert!(view.paths().is_empty());

    // Frames for the old game no longer apply
    view.on_frame(frame(OPENING));
    assert_eq!(view.timeline().tail_ply(), Some(0));
}

#[test]
fn test_malformed_frame_is_an_error() {
    assert!(FeedFrame::decode("{\"positions\": 3}").is_err());
    assert!(FeedFrame::decode("not json").is_err());
}
