use chrono::{DateTime, Utc};
use scoring::{CaptureRecord, ContestRules, Leaderboard, ResolvedRules};
use uuid::Uuid;

use super::source::ContestSource;
use crate::dto::leaderboard::{LeaderboardResponse, LeaderboardRowResponse, MyRankResponse};
use crate::error::Result;
use crate::models::Contest;

/// A contest together with its freshly computed board.
pub struct ContestBoard {
    pub contest: Contest,
    pub rules: ContestRules,
    pub board: Leaderboard,
}

/// Reads the contest and every one of its catches, then ranks them. Both
/// the full table and the single-user lookup go through here so they can
/// never disagree.
pub async fn load_board<S>(source: &S, contest_code: &str) -> Result<ContestBoard>
where
    S: ContestSource + ?Sized,
{
    let contest = source.contest(contest_code).await?;
    let rules = contest.contest_rules();
    let resolved = ResolvedRules::resolve(&rules);

    let records: Vec<CaptureRecord> = source
        .catches(contest_code)
        .await?
        .into_iter()
        .map(|row| CaptureRecord::from_stored(row, &resolved))
        .collect();

    let board = Leaderboard::compute(&resolved, &records);

    tracing::debug!(
        contest = %contest_code,
        catches = records.len(),
        participants = board.len(),
        "Loaded contest board"
    );

    Ok(ContestBoard {
        contest,
        rules,
        board,
    })
}

pub async fn compute_leaderboard<S>(
    source: &S,
    contest_code: &str,
    now: DateTime<Utc>,
) -> Result<LeaderboardResponse>
where
    S: ContestSource + ?Sized,
{
    let ContestBoard {
        contest,
        rules,
        board,
    } = load_board(source, contest_code).await?;

    let user_ids: Vec<Uuid> = board.entries.iter().map(|e| e.aggregate.user_id).collect();
    let names = source.display_names(&user_ids).await?;

    let rows = board
        .rows()
        .into_iter()
        .map(|row| LeaderboardRowResponse {
            rank: row.rank,
            user_id: row.user_id,
            display_name: names
                .get(&row.user_id)
                .cloned()
                .unwrap_or_else(|| row.user_id.to_string()),
            columns: row.columns,
        })
        .collect();

    Ok(LeaderboardResponse {
        contest_code: contest.code,
        contest_name: contest.name,
        policy: board.policy,
        policy_label: board.policy.label().to_string(),
        moderation_enabled: board.moderation_enabled,
        status: rules.window.status_at(now),
        species_columns: board.species_columns.clone(),
        total_participants: board.len() as u32,
        rows,
    })
}

pub async fn compute_my_rank<S>(
    source: &S,
    contest_code: &str,
    user_id: Uuid,
) -> Result<MyRankResponse>
where
    S: ContestSource + ?Sized,
{
    let ContestBoard { contest, board, .. } = load_board(source, contest_code).await?;

    Ok(MyRankResponse {
        contest_code: contest.code,
        user_id,
        standing: board.my_rank(user_id),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::TimeZone;
    use scoring::{ContestStatus, LeaderboardColumns, MyRank, ScoringPolicy, StoredCatch};
    use serde_json::json;
    use sqlx::types::Json;

    use super::*;
    use crate::error::StorageError;

    struct InMemorySource {
        contest: Contest,
        catches: Vec<StoredCatch>,
        names: HashMap<Uuid, String>,
    }

    #[async_trait::async_trait]
    impl ContestSource for InMemorySource {
        async fn contest(&self, code: &str) -> Result<Contest> {
            if code == self.contest.code {
                Ok(self.contest.clone())
            } else {
                Err(StorageError::NotFound)
            }
        }

        async fn catches(&self, code: &str) -> Result<Vec<StoredCatch>> {
            Ok(self
                .catches
                .iter()
                .filter(|c| c.contest_code == code)
                .cloned()
                .collect())
        }

        async fn display_names(&self, user_ids: &[Uuid]) -> Result<HashMap<Uuid, String>> {
            Ok(user_ids
                .iter()
                .filter_map(|id| self.names.get(id).map(|n| (*id, n.clone())))
                .collect())
        }
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, hour, 0, 0).unwrap()
    }

    fn contest(rules: serde_json::Value) -> Contest {
        Contest {
            code: "LAC42".to_string(),
            name: "Open du lac".to_string(),
            created_by: None,
            rules: Json(rules),
            created_at: at(6),
        }
    }

    fn stored(user: u128, fish: &str, points: i64, status: Option<&str>) -> StoredCatch {
        StoredCatch {
            contest_code: "LAC42".to_string(),
            user_id: Uuid::from_u128(user),
            fish_name: Some(fish.to_string()),
            size_cm: None,
            points: Some(points),
            status: status.map(String::from),
            sub_type: None,
            value_kind: None,
            created_at: at(9),
        }
    }

    fn source(rules: serde_json::Value, catches: Vec<StoredCatch>) -> InMemorySource {
        InMemorySource {
            contest: contest(rules),
            catches,
            names: HashMap::from([(Uuid::from_u128(1), "brochet_king".to_string())]),
        }
    }

    #[tokio::test]
    async fn test_leaderboard_rows_carry_names_and_fallback_ids() {
        let src = source(
            json!({ "window": { "start_at": "2026-06-01T07:00:00Z", "end_at": "2026-06-01T18:00:00Z" } }),
            vec![
                stored(1, "Brochet", 1000, None),
                stored(2, "Perche", 400, Some("approved")),
                stored(2, "Sandre", 800, Some("approved")),
            ],
        );

        let response = compute_leaderboard(&src, "LAC42", at(12)).await.unwrap();

        assert_eq!(response.policy, ScoringPolicy::TotalPoints);
        assert_eq!(response.status, ContestStatus::Live);
        assert_eq!(response.total_participants, 2);
        assert_eq!(response.rows[0].user_id, Uuid::from_u128(2));
        assert_eq!(response.rows[0].display_name, Uuid::from_u128(2).to_string());
        assert_eq!(response.rows[1].display_name, "brochet_king");
        match &response.rows[0].columns {
            LeaderboardColumns::Points { total_points, .. } => assert_eq!(*total_points, 1200),
            other => panic!("unexpected columns {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_my_rank_matches_full_board() {
        let src = source(
            json!({ "moderation_enabled": true }),
            vec![
                stored(1, "Brochet", 1000, Some("pending")),
                stored(2, "Perche", 400, Some("approved")),
                stored(3, "Sandre", 800, Some("approved")),
            ],
        );

        let board = compute_leaderboard(&src, "LAC42", at(12)).await.unwrap();
        for row in &board.rows {
            let mine = compute_my_rank(&src, "LAC42", row.user_id).await.unwrap();
            assert_eq!(mine.standing.rank(), Some(row.rank));
        }

        let pending_only = compute_my_rank(&src, "LAC42", Uuid::from_u128(1))
            .await
            .unwrap();
        assert_eq!(pending_only.standing, MyRank::Unranked);
    }

    #[tokio::test]
    async fn test_unknown_contest_is_not_found() {
        let src = source(json!({}), Vec::new());
        let err = compute_leaderboard(&src, "NOPE", at(12)).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn test_empty_contest_has_empty_board() {
        let src = source(json!({ "mode": "carp" }), Vec::new());
        let response = compute_leaderboard(&src, "LAC42", at(20)).await.unwrap();
        assert!(response.rows.is_empty());
        assert_eq!(response.policy, ScoringPolicy::CumulativeWeight);
        assert_eq!(response.status, ContestStatus::Live);
    }
}
