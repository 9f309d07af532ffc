//! Walk state threaded through the parallel tree walk.
//!
//! - `matched`: [`MatchedElement`], the captures from one successful match
//! - `walked_path`: [`WalkedPath`], one frame per level of the walk

pub mod matched;
pub mod walked_path;

pub use matched::MatchedElement;
pub use walked_path::{Frame, PathStep, WalkedPath};
