//! Aggregates - consistency boundaries
//!
//! - `Chapter` owns its `SceneGraph`; both are immutable once loaded.
//! - `StatEngine` owns the player's stats; mutations return applied deltas.

mod chapter;
mod scene_graph;
mod stat_engine;

pub use chapter::{chapter_order, Chapter, ChapterSummary};
pub use scene_graph::SceneGraph;
pub use stat_engine::StatEngine;
