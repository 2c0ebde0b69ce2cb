use chrono::{DateTime, Utc};
use scoring::{CaptureRecord, CatchEntry, CatchStatus, ResolvedRules};
use sqlx::PgPool;

use crate::error::Result;
use crate::models::{Catch, Contest};
use crate::repository::{catch::CatchRepository, contest::ContestRepository};

/// Checks an entry against the contest's rules. Nothing is written.
pub fn prepare_catch(
    contest: &Contest,
    entry: CatchEntry,
    now: DateTime<Utc>,
) -> Result<CaptureRecord> {
    let rules = ResolvedRules::resolve(&contest.contest_rules());
    Ok(entry.into_record(&contest.code, &rules, now)?)
}

/// Validate and store a catch. Under moderation it starts out pending.
pub async fn record_catch(pool: &PgPool, contest_code: &str, entry: CatchEntry) -> Result<Catch> {
    let contest = ContestRepository::new(pool)
        .find_by_code(contest_code)
        .await?;

    let record = prepare_catch(&contest, entry, Utc::now())?;
    let catch = CatchRepository::new(pool).insert(&record).await?;

    tracing::info!(
        contest = %contest_code,
        catch_id = catch.id,
        user_id = %catch.user_id,
        status = record.status.as_str(),
        "Catch recorded"
    );

    Ok(catch)
}

/// Apply a moderation decision
pub async fn set_catch_status(pool: &PgPool, catch_id: i64, status: CatchStatus) -> Result<Catch> {
    let catch = CatchRepository::new(pool)
        .update_status(catch_id, status.as_str())
        .await?;

    tracing::info!(catch_id, status = status.as_str(), "Catch status updated");

    Ok(catch)
}
