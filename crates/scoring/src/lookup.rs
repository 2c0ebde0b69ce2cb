use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::rank::RankedEntry;

/// A single participant's standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum MyRank {
    Ranked { rank: u32, total: u32 },
    Unranked,
}

impl MyRank {
    pub fn rank(&self) -> Option<u32> {
        match self {
            Self::Ranked { rank, .. } => Some(*rank),
            Self::Unranked => None,
        }
    }
}

/// Finds `user_id` on an already ranked board. The board must be the one
/// shown to everyone else; the position is read from it, never recomputed.
pub fn rank_of(entries: &[RankedEntry], user_id: Uuid) -> MyRank {
    entries
        .iter()
        .find(|entry| entry.aggregate.user_id == user_id)
        .map(|entry| MyRank::Ranked {
            rank: entry.rank,
            total: entries.len() as u32,
        })
        .unwrap_or(MyRank::Unranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::ParticipantAggregate;
    use rust_decimal::Decimal;

    fn entry(rank: u32, seed: u128) -> RankedEntry {
        RankedEntry {
            rank,
            mix_total: Decimal::ZERO,
            aggregate: ParticipantAggregate::new(Uuid::from_u128(seed)),
        }
    }

    #[test]
    fn test_found_user_gets_position_and_size() {
        let entries = vec![entry(1, 10), entry(2, 20), entry(3, 30)];
        assert_eq!(
            rank_of(&entries, Uuid::from_u128(20)),
            MyRank::Ranked { rank: 2, total: 3 }
        );
    }

    #[test]
    fn test_missing_user_is_unranked() {
        let entries = vec![entry(1, 10)];
        assert_eq!(rank_of(&entries, Uuid::from_u128(99)), MyRank::Unranked);
        assert_eq!(rank_of(&[], Uuid::from_u128(10)), MyRank::Unranked);
        assert_eq!(MyRank::Unranked.rank(), None);
    }

    #[test]
    fn test_serialized_shape() {
        let ranked = serde_json::to_value(MyRank::Ranked { rank: 1, total: 4 }).unwrap();
        assert_eq!(ranked, serde_json::json!({ "status": "ranked", "rank": 1, "total": 4 }));
        let unranked = serde_json::to_value(MyRank::Unranked).unwrap();
        assert_eq!(unranked, serde_json::json!({ "status": "unranked" }));
    }
}
