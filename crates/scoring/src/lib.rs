//! Scoring and ranking for fishing competitions.
//!
//! Raw catches go through a fixed pipeline: the contest rules resolve to one
//! [`ScoringPolicy`], moderation decides which records are eligible, the
//! eligible records fold into one aggregate per participant, and the
//! aggregates are sorted into a [`Leaderboard`]. A participant's own rank is
//! always read from that same board.

pub mod aggregate;
pub mod entry;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod leaderboard;
pub mod lookup;
pub mod policy;
pub mod rank;
pub mod record;
pub mod rules;

pub use aggregate::{ExpertBreakdown, ParticipantAggregate};
pub use entry::CatchEntry;
pub use error::EntryError;
pub use ingest::StoredCatch;
pub use leaderboard::{Leaderboard, LeaderboardColumns, LeaderboardRow, SpeciesColumn};
pub use lookup::MyRank;
pub use policy::{ExpertWeights, ResolvedRules, ScoringPolicy};
pub use rank::RankedEntry;
pub use record::{CaptureRecord, CatchStatus, ScoreValue, SubType};
pub use rules::{ContestRules, ContestStatus};

/// Ranks `records` under `rules` in one pass.
pub fn compute_leaderboard(rules: &ContestRules, records: &[CaptureRecord]) -> Leaderboard {
    Leaderboard::compute(&ResolvedRules::resolve(rules), records)
}
