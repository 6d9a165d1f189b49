//! Broadcast Board - live chess broadcast viewer core
//!
//! Core modules:
//! - `arrows`: Pick which engine lines to draw under a fixed arrow budget
//! - `timeline`: Sparse ply-indexed position history with live/historical cursor
//! - `geometry`: Curved, dashed and fanned-out arrow paths
//! - `view`: Glue between feed frames, the timeline, the selector and geometry
//! - `settings`: Tunables and presets

pub mod arrows;
pub mod chess;
pub mod error;
pub mod feed;
pub mod geometry;
pub mod settings;
pub mod timeline;
pub mod view;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use error::{Result, ViewerError};
pub use settings::{ArrowPreset, Settings};
pub use timeline::PositionTimeline;
pub use view::BroadcastView;

use glam::Vec2;

use chess::Square;

/// Board layout constants
pub mod consts {
    /// Side of one board square in board units
    pub const SQUARE_SIZE: f32 = 45.0;
    /// Width of the whole board
    pub const BOARD_SIZE: f32 = SQUARE_SIZE * 8.0;

    /// Arrow width scale for the top variation
    pub const ARROW_WIDTH_SCALE: f32 = 12.0;
    /// Exponent flattening node-share differences into arrow widths
    pub const ARROW_WIDTH_EXPONENT: f32 = 1.0 / 1.7;
}

/// Normalize degrees to [0, 360)
#[inline]
pub fn normalize_degrees(deg: f32) -> f32 {
    deg.rem_euclid(360.0)
}

/// Center of a square in board (screen) coordinates, y pointing down
#[inline]
pub fn square_center(square: Square, flipped: bool, square_size: f32) -> Vec2 {
    let file = square.file() as f32;
    let rank = square.rank() as f32;
    let (col, row) = if flipped {
        (7.0 - file, rank)
    } else {
        (file, 7.0 - rank)
    };
    Vec2::new((col + 0.5) * square_size, (row + 0.5) * square_size)
}

/// Direction of the vector `from -> to` in screen degrees, [0, 360)
#[inline]
pub fn screen_direction_deg(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    normalize_degrees(d.y.atan2(d.x).to_degrees())
}
