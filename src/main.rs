//! Broadcast Board - native demo
//!
//! Replays a broadcast through the view core and logs what the page would
//! draw. Usage: `broadcast-board [feed.jsonl] [--settings settings.json]`.
//! Without a feed file a synthetic game is generated.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::fs;
    use std::path::Path;

    use broadcast_board::chess::{UciMove, apply_move_to_fen};
    use broadcast_board::feed::{
        EvaluationSnapshot, FeedFrame, GameInfo, PlayerData, PositionDelta, VariationData,
    };
    use broadcast_board::view::ViewEvent;
    use broadcast_board::{BroadcastView, Result, Settings};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w";
    const GAME_ID: u64 = 1;

    /// Ruy Lopez main line with one sideline per ply
    const SCRIPT: [(&str, &str); 10] = [
        ("e2e4", "d2d4 d7d5"),
        ("e7e5", "c7c5 g1f3"),
        ("g1f3", "f1c4 g8f6"),
        ("b8c6", "d7d6 d2d4"),
        ("f1b5", "f1c4 f8c5"),
        ("a7a6", "g8f6 e1g1"),
        ("b5a4", "b5c6 d7c6"),
        ("g8f6", "d7d6 c2c3"),
        ("e1g1", "d2d3 f8c5"),
        ("f8e7", "f6e4 f1e1"),
    ];

    pub fn load_settings(path: Option<&str>) -> Result<Settings> {
        match path {
            Some(path) => {
                let settings = Settings::from_json(&fs::read_to_string(path)?)?;
                log::info!("Loaded settings from {} (preset {})", path, settings.preset.as_str());
                Ok(settings)
            }
            None => Ok(Settings::load()),
        }
    }

    fn log_events(view: &BroadcastView, events: &[ViewEvent]) {
        for event in events {
            match event {
                ViewEvent::Status(status) => log::info!("Status: {}", status.message),
                ViewEvent::Games(games) => log::info!("{} games available", games.len()),
                ViewEvent::TimelineUpdated { tail_ply, entries } => log::debug!(
                    "{} plies updated, timeline ends at ply {}",
                    entries.len(),
                    tail_ply
                ),
                ViewEvent::PositionChanged {
                    selection, label, ..
                } => log::info!(
                    "Showing ply {} {} ({})",
                    selection.ply,
                    label.as_deref().unwrap_or("start"),
                    if selection.is_ongoing { "live" } else { "history" }
                ),
                ViewEvent::ArrowsChanged { paths, legend_len } => log::info!(
                    "{} arrows over {} variations, {} dashes",
                    paths.len(),
                    legend_len,
                    paths.iter().map(|p| p.dashes.len()).sum::<usize>()
                ),
                ViewEvent::Request(request) => match request.encode() {
                    Ok(json) => log::info!("-> {}", json),
                    Err(e) => log::warn!("Cannot encode request: {}", e),
                },
            }
        }
        if let Some(clocks) = view.clock_display(0) {
            log::debug!("Clocks {} / {}", clocks.white_text(), clocks.black_text());
        }
    }

    /// Replay a JSON-lines feed capture
    pub fn replay(view: &mut BroadcastView, path: &Path) -> Result<()> {
        let text = fs::read_to_string(path)?;
        for (line_no, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let frame = match FeedFrame::decode(line) {
                Ok(frame) => frame,
                Err(e) => {
                    log::warn!("Skipping line {}: {}", line_no + 1, e);
                    continue;
                }
            };
            if view.game_id().is_none() {
                let first = frame.games.as_ref().and_then(|games| {
                    games
                        .iter()
                        .find(|g| g.is_being_analyzed)
                        .or_else(|| games.first())
                        .cloned()
                });
                if let Some(game) = first {
                    if let Some(request) = view.select_game(&game) {
                        log_events(view, &[ViewEvent::Request(request)]);
                    }
                }
            }
            let events = view.on_frame(frame);
            log_events(view, &events);
        }
        Ok(())
    }

    fn synthetic_evaluation(rng: &mut Pcg32, ply: usize) -> EvaluationSnapshot {
        let main_line: Vec<&str> = SCRIPT[ply..].iter().take(4).map(|(m, _)| *m).collect();
        let nodes = rng.random_range(50_000..200_000u64);
        let main_share = rng.random_range(0.5..0.8);
        let side_share = rng.random_range(0.05..0.3);
        let variation = |pv: String, share: f64| VariationData {
            move_uci: pv.split(' ').next().unwrap_or_default().to_string(),
            pv_uci: pv,
            nodes: (nodes as f64 * share) as u64,
            ..Default::default()
        };
        EvaluationSnapshot {
            game_id: GAME_ID,
            ply,
            nodes,
            variations: vec![
                variation(main_line.join(" "), main_share),
                variation(SCRIPT[ply].1.to_string(), side_share),
            ],
            ..Default::default()
        }
    }

    /// Generate and play a short game, stepping back into history halfway
    pub fn synthetic(view: &mut BroadcastView, seed: u64) -> Result<()> {
        let mut rng = Pcg32::seed_from_u64(seed);
        log::info!("Synthetic broadcast with seed {}", seed);

        let game = GameInfo {
            game_id: GAME_ID,
            name: "Synthetic Open, round 1".to_string(),
            is_being_analyzed: true,
            player1: PlayerData {
                name: "White".to_string(),
                rating: 2700,
                ..Default::default()
            },
            player2: PlayerData {
                name: "Black".to_string(),
                rating: 2690,
                ..Default::default()
            },
            ..Default::default()
        };
        let events = view.on_frame(FeedFrame {
            games: Some(vec![game.clone()]),
            ..Default::default()
        });
        log_events(view, &events);
        if let Some(request) = view.select_game(&game) {
            log_events(view, &[ViewEvent::Request(request)]);
        }

        let mut fen = START_FEN.to_string();
        let mut clocks = [5400u64, 5400u64];
        let mut now_ms = 0u64;
        for ply in 0..=SCRIPT.len() {
            let mut delta = PositionDelta {
                game_id: GAME_ID,
                ply,
                fen: fen.clone(),
                white_clock: Some(clocks[0]),
                black_clock: Some(clocks[1]),
                ..Default::default()
            };
            if ply > 0 {
                delta.move_uci = Some(SCRIPT[ply - 1].0.to_string());
            }
            let events = view.on_frame_at(
                FeedFrame {
                    positions: Some(vec![delta]),
                    ..Default::default()
                },
                now_ms,
            );
            log_events(view, &events);

            if ply < SCRIPT.len() {
                let events = view.on_frame(FeedFrame {
                    evaluations: Some(vec![synthetic_evaluation(&mut rng, ply)]),
                    ..Default::default()
                });
                log_events(view, &events);

                let think = rng.random_range(5..90u64);
                clocks[ply % 2] = clocks[ply % 2].saturating_sub(think);
                now_ms += think * 1000;
                fen = apply_move_to_fen(&fen, &UciMove::parse(SCRIPT[ply].0)?)?;
            }

            if ply == SCRIPT.len() / 2 {
                log::info!("Stepping back two plies");
                let events = view.move_cursor(-2);
                log_events(view, &events);
            }
        }

        if let Ok(preview) = view.preview_variation(0, 1) {
            log::info!("Preview of line 1: {} -> {}", preview.moves.join(" "), preview.fen);
        }
        log::info!(
            "Done: cursor {:?}, tail {:?}, legend {}",
            view.timeline().cursor(),
            view.timeline().tail_ply(),
            view.legend_len()
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Broadcast Board (native) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings_path = args
        .iter()
        .position(|a| a == "--settings")
        .and_then(|i| args.get(i + 1))
        .map(String::as_str);
    let feed_path = args
        .iter()
        .enumerate()
        .find(|(i, a)| !a.starts_with("--") && (*i == 0 || args[i - 1] != "--settings"))
        .map(|(_, a)| a.as_str());

    let settings = match demo::load_settings(settings_path) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Cannot load settings: {}", e);
            std::process::exit(1);
        }
    };
    let mut view = broadcast_board::BroadcastView::new(settings);

    let result = match feed_path {
        Some(path) => demo::replay(&mut view, std::path::Path::new(path)),
        None => demo::synthetic(&mut view, 0x5eed),
    };
    if let Err(e) = result {
        log::error!("Replay failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The wasm entry point is `wasm::start`, this is just to satisfy the compiler
}
