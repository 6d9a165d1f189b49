//! Engine line arrows
//!
//! Turns an evaluation snapshot into a bounded list of arrows and groups
//! arrows that would overlap on the board.

pub mod fanout;
pub mod selector;

pub use fanout::{FanSlot, arrow_move, assign_slots};
pub use selector::{ArrowCandidate, count_variations, select};
