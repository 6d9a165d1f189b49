//! Feed wire types
//!
//! Frames pushed by the broadcast server over the websocket. Every field the
//! server may omit is optional; the transport itself lives outside this crate.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Global server status
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusData {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub num_viewers: u32,
    #[serde(default)]
    pub js_hash: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerData {
    pub name: String,
    pub rating: u32,
    #[serde(default)]
    pub fide_id: Option<u64>,
    #[serde(default)]
    pub fed: Option<String>,
}

/// A game offered for selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInfo {
    pub game_id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_finished: bool,
    #[serde(default)]
    pub is_being_analyzed: bool,
    pub player1: PlayerData,
    pub player2: PlayerData,
    #[serde(default)]
    pub feed_url: String,
}

/// One position of a game, as pushed by the feed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionDelta {
    pub game_id: u64,
    /// 0 for the start position
    pub ply: usize,
    #[serde(default)]
    pub thinking_id: Option<u64>,
    #[serde(default)]
    pub move_uci: Option<String>,
    #[serde(default)]
    pub move_san: Option<String>,
    pub fen: String,
    #[serde(default)]
    pub white_clock: Option<u64>,
    #[serde(default)]
    pub black_clock: Option<u64>,
    #[serde(default)]
    pub score_q: Option<f32>,
    #[serde(default)]
    pub score_w: Option<f32>,
    #[serde(default)]
    pub score_d: Option<f32>,
    #[serde(default)]
    pub score_b: Option<f32>,
    #[serde(default)]
    pub moves_left: Option<f32>,
    #[serde(default)]
    pub nodes: Option<u64>,
    #[serde(default)]
    pub time: Option<u64>,
    #[serde(default)]
    pub depth: Option<u32>,
    #[serde(default)]
    pub seldepth: Option<u32>,
}

/// One ranked engine line inside an evaluation snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationData {
    pub move_uci: String,
    #[serde(default)]
    pub move_opp_uci: Option<String>,
    #[serde(default)]
    pub move_san: String,
    pub pv_uci: String,
    #[serde(default)]
    pub pv_san: String,
    pub nodes: u64,
    #[serde(default)]
    pub score_q: Option<f32>,
    #[serde(default)]
    pub score_w: f32,
    #[serde(default)]
    pub score_d: f32,
    #[serde(default)]
    pub score_b: f32,
    #[serde(default)]
    pub mate_score: Option<i32>,
}

impl VariationData {
    /// The PV as individual UCI moves
    pub fn pv_moves(&self) -> Vec<&str> {
        crate::chess::split_pv(&self.pv_uci)
    }
}

/// Multi-PV engine output for one position
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationSnapshot {
    pub game_id: u64,
    pub ply: usize,
    #[serde(default)]
    pub eval_id: Option<u64>,
    /// Total nodes of the search
    pub nodes: u64,
    #[serde(default)]
    pub time: u64,
    #[serde(default)]
    pub depth: u32,
    #[serde(default)]
    pub seldepth: u32,
    #[serde(default)]
    pub moves_left: Option<f32>,
    /// Ranked by descending nodes, rank 0 first
    #[serde(default)]
    pub variations: Vec<VariationData>,
}

/// A websocket message; any subset of the sections may be present
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedFrame {
    #[serde(default)]
    pub status: Option<StatusData>,
    #[serde(default)]
    pub games: Option<Vec<GameInfo>>,
    #[serde(default)]
    pub positions: Option<Vec<PositionDelta>>,
    #[serde(default)]
    pub evaluations: Option<Vec<EvaluationSnapshot>>,
}

impl FeedFrame {
    pub fn decode(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Subscription request sent back to the server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ply: Option<usize>,
}

impl FeedRequest {
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_partial_frame() {
        let json = r#"{
            "positions": [
                {"gameId": 7, "ply": 1, "moveUci": "e2e4", "moveSan": "e4",
                 "fen": "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1",
                 "whiteClock": 5400, "scoreW": 0.3, "scoreD": 0.5, "scoreB": 0.2}
            ]
        }"#;
        let frame = FeedFrame::decode(json).unwrap();
        assert!(frame.status.is_none());
        assert!(frame.evaluations.is_none());
        let positions = frame.positions.unwrap();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].game_id, 7);
        assert_eq!(positions[0].move_uci.as_deref(), Some("e2e4"));
        assert_eq!(positions[0].white_clock, Some(5400));
        assert_eq!(positions[0].black_clock, None);
    }

    #[test]
    fn test_decode_evaluation() {
        let json = r#"{"evaluations": [{
            "gameId": 7, "ply": 1, "nodes": 990, "time": 1200, "depth": 12, "seldepth": 30,
            "variations": [
                {"moveUci": "e7e5", "moveSan": "e5", "pvUci": "e7e5 g1f3", "pvSan": "e5 Nf3",
                 "nodes": 900, "scoreW": 0.3, "scoreD": 0.5, "scoreB": 0.2}
            ]
        }]}"#;
        let frame = FeedFrame::decode(json).unwrap();
        let evals = frame.evaluations.unwrap();
        assert_eq!(evals[0].variations[0].pv_moves(), vec!["e7e5", "g1f3"]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(FeedFrame::decode("{not json").is_err());
    }

    #[test]
    fn test_request_skips_missing_fields() {
        let req = FeedRequest {
            game_id: Some(3),
            ply: None,
        };
        assert_eq!(req.encode().unwrap(), r#"{"gameId":3}"#);
    }
}
