//! Chess coordinate helpers
//!
//! Only the coordinate arithmetic the viewer needs: parsing squares and UCI
//! moves, move directions for arrow bucketing, and advancing a FEN by one
//! move for PV previews. No legality checks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewerError};

/// A board square, `file + rank * 8` with a1 = 0 and h8 = 63
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square(u8);

impl Square {
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        (file < 8 && rank < 8).then(|| Self(file + rank * 8))
    }

    /// 0-based file (a = 0)
    #[inline]
    pub fn file(self) -> u8 {
        self.0 % 8
    }

    /// 0-based rank (rank 1 = 0)
    #[inline]
    pub fn rank(self) -> u8 {
        self.0 / 8
    }

    pub fn parse(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(ViewerError::InvalidSquare(s.to_string()));
        }
        let file = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        Self::new(file, rank).ok_or_else(|| ViewerError::InvalidSquare(s.to_string()))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file()) as char, self.rank() + 1)
    }
}

/// A move in UCI coordinate notation (`e2e4`, `e7e8q`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UciMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<char>,
}

impl UciMove {
    pub fn parse(s: &str) -> Result<Self> {
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(ViewerError::InvalidMove(s.to_string()));
        }
        let invalid = |_| ViewerError::InvalidMove(s.to_string());
        let from = Square::parse(&s[0..2]).map_err(invalid)?;
        let to = Square::parse(&s[2..4]).map_err(invalid)?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(c @ ('q' | 'r' | 'b' | 'n')) => Some(c),
            Some(_) => return Err(ViewerError::InvalidMove(s.to_string())),
        };
        Ok(Self {
            from,
            to,
            promotion,
        })
    }

    /// Direction of the move on the board in whole degrees, [0, 360).
    /// 0 = towards the h-file, 90 = towards rank 8.
    pub fn direction_deg(&self) -> i32 {
        let df = self.to.file() as f32 - self.from.file() as f32;
        let dr = self.to.rank() as f32 - self.from.rank() as f32;
        (dr.atan2(df).to_degrees().round() as i32).rem_euclid(360)
    }
}

impl fmt::Display for UciMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(p) = self.promotion {
            write!(f, "{p}")?;
        }
        Ok(())
    }
}

/// Split a space separated PV into its moves
pub fn split_pv(pv: &str) -> Vec<&str> {
    pv.split_whitespace().collect()
}

/// Piece placement indexed `[rank][file]`, rank 1 first
type Placement = [[Option<char>; 8]; 8];

fn parse_placement(fen: &str) -> Result<Placement> {
    let invalid = || ViewerError::InvalidFen(fen.to_string());
    let field = fen.split(' ').next().ok_or_else(invalid)?;
    let rows: Vec<&str> = field.split('/').collect();
    if rows.len() != 8 {
        return Err(invalid());
    }

    let mut board: Placement = [[None; 8]; 8];
    for (row_idx, row) in rows.iter().enumerate() {
        let rank = 7 - row_idx;
        let mut file = 0usize;
        for c in row.chars() {
            if let Some(n) = c.to_digit(10) {
                file += n as usize;
            } else if c.is_ascii_alphabetic() && file < 8 {
                board[rank][file] = Some(c);
                file += 1;
            } else {
                return Err(invalid());
            }
        }
        if file != 8 {
            return Err(invalid());
        }
    }
    Ok(board)
}

fn format_placement(board: &Placement) -> String {
    let mut out = String::with_capacity(72);
    for rank in (0..8).rev() {
        let mut empty = 0;
        for cell in board[rank] {
            match cell {
                Some(c) => {
                    if empty > 0 {
                        out.push_str(&empty.to_string());
                        empty = 0;
                    }
                    out.push(c);
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            out.push_str(&empty.to_string());
        }
        if rank > 0 {
            out.push('/');
        }
    }
    out
}

/// Advance a FEN by one UCI move.
///
/// Returns only the placement and side-to-move fields. Handles castling
/// (both `e1g1` and king-takes-rook notation), en passant and promotion by
/// coordinate arithmetic; legality is not checked.
pub fn apply_move_to_fen(fen: &str, mv: &UciMove) -> Result<String> {
    let mut board = parse_placement(fen)?;
    let white_to_move = fen.split(' ').nth(1) != Some("b");

    let (sf, sr) = (mv.from.file() as usize, mv.from.rank() as usize);
    let (ef, er) = (mv.to.file() as usize, mv.to.rank() as usize);

    let piece = board[sr][sf].ok_or_else(|| ViewerError::InvalidMove(mv.to_string()))?;
    let is_black = piece.is_ascii_lowercase();
    let promotion = mv
        .promotion
        .map(|p| if is_black { p } else { p.to_ascii_uppercase() });

    board[sr][sf] = None;
    let dst = board[er][ef];
    let dst_same_color = dst.is_some_and(|d| d.is_ascii_lowercase() == is_black);

    if piece.eq_ignore_ascii_case(&'k') && (sf.abs_diff(ef) >= 2 || dst_same_color) {
        // Castling
        let king_side = ef > sf;
        let dst_king_file = if king_side { 6 } else { 2 };
        let dst_rook_file = if king_side { 5 } else { 3 };
        let src_rook_file = if king_side { 7 } else { 0 };
        if dst.is_none() {
            board[er][src_rook_file] = None;
        }
        board[er][ef] = None;
        board[er][dst_king_file] = Some(piece);
        board[er][dst_rook_file] = Some(if is_black { 'r' } else { 'R' });
    } else {
        if piece.eq_ignore_ascii_case(&'p') && sf != ef && dst.is_none() {
            // En passant
            let captured_rank = if is_black { er + 1 } else { er.wrapping_sub(1) };
            if captured_rank < 8 {
                board[captured_rank][ef] = None;
            }
        }
        board[er][ef] = Some(promotion.unwrap_or(piece));
    }

    let side = if white_to_move { 'b' } else { 'w' };
    Ok(format!("{} {}", format_placement(&board), side))
}

/// Format a clock in seconds as `HH:MM:SS`
pub fn format_clock(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Move list label for the move that produced `ply`, `None` for the start position.
/// White moves read `12. Nf3`, black moves `12… Nc6`.
pub fn move_label(ply: usize, san: &str) -> Option<String> {
    if ply == 0 {
        return None;
    }
    let move_idx = ply.div_ceil(2);
    if ply % 2 == 0 {
        Some(format!("{move_idx}… {san}"))
    } else {
        Some(format!("{move_idx}. {san}"))
    }
}

/// Whether the side to move at `ply` is white
#[inline]
pub fn white_to_move(ply: usize) -> bool {
    ply % 2 == 0
}

/// A win/draw/loss triple is drawable when all parts are present, finite,
/// non-negative and not all zero
pub fn is_valid_wdl(w: Option<f32>, d: Option<f32>, b: Option<f32>) -> bool {
    match (w, d, b) {
        (Some(w), Some(d), Some(b)) => {
            [w, d, b].iter().all(|x| x.is_finite() && *x >= 0.0) && w + d + b > 0.0
        }
        _ => false,
    }
}
