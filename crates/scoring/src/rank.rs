use std::cmp::Ordering;
use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::aggregate::ParticipantAggregate;
use crate::policy::{ExpertWeights, ScoringPolicy};
use crate::rules::CoupMethod;

/// A participant at a position on the board.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RankedEntry {
    /// 1-based; equal scores still get distinct positions.
    pub rank: u32,
    /// Weighted expert total; zero under other policies.
    pub mix_total: Decimal,
    pub aggregate: ParticipantAggregate,
}

/// Weighted expert total. Saturates at `Decimal::MAX` instead of
/// overflowing, whatever multipliers the rules carry.
pub fn mix_total(aggregate: &ParticipantAggregate, weights: &ExpertWeights, coup: CoupMethod) -> Decimal {
    let e = &aggregate.expert;
    [
        (e.carnassier_points, weights.carnassier),
        (e.carp_grams, weights.carp),
        (e.coup_score(coup), weights.coup),
    ]
    .into_iter()
    .fold(Decimal::ZERO, |total, (score, weight)| {
        Decimal::from(score)
            .checked_mul(weight)
            .and_then(|part| total.checked_add(part))
            .unwrap_or(Decimal::MAX)
    })
}

/// Orders two entries best first under `policy`. Ties on every scoring key
/// are settled by user id so repeated computations agree.
pub fn compare(a: &RankedEntry, b: &RankedEntry, policy: &ScoringPolicy) -> Ordering {
    let (x, y) = (&a.aggregate, &b.aggregate);
    let by_policy = match policy {
        ScoringPolicy::TotalPoints => y
            .total_points
            .cmp(&x.total_points)
            .then_with(|| y.catch_count.cmp(&x.catch_count)),
        ScoringPolicy::CountBased => y
            .catch_count
            .cmp(&x.catch_count)
            .then_with(|| y.total_points.cmp(&x.total_points)),
        ScoringPolicy::BiggestFish => y
            .max_size_cm
            .cmp(&x.max_size_cm)
            .then_with(|| y.avg_size_cm.cmp(&x.avg_size_cm))
            .then_with(|| y.total_points.cmp(&x.total_points))
            .then_with(|| y.catch_count.cmp(&x.catch_count)),
        ScoringPolicy::CumulativeWeight => y
            .weight_grams
            .cmp(&x.weight_grams)
            .then_with(|| y.catch_count.cmp(&x.catch_count)),
        ScoringPolicy::ExpertMix { coup_method, .. } => b
            .mix_total
            .cmp(&a.mix_total)
            .then_with(|| y.expert.carnassier_points.cmp(&x.expert.carnassier_points))
            .then_with(|| y.expert.carp_grams.cmp(&x.expert.carp_grams))
            .then_with(|| {
                y.expert
                    .coup_score(*coup_method)
                    .cmp(&x.expert.coup_score(*coup_method))
            })
            .then_with(|| y.catch_count.cmp(&x.catch_count)),
    };

    by_policy.then_with(|| x.user_id.cmp(&y.user_id))
}

/// Sorts aggregates into the board and assigns positions.
pub fn rank(aggregates: BTreeMap<Uuid, ParticipantAggregate>, policy: &ScoringPolicy) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = aggregates
        .into_values()
        .map(|aggregate| {
            let mix_total = match policy {
                ScoringPolicy::ExpertMix {
                    weights,
                    coup_method,
                } => mix_total(&aggregate, weights, *coup_method),
                _ => Decimal::ZERO,
            };
            RankedEntry {
                rank: 0,
                mix_total,
                aggregate,
            }
        })
        .collect();

    entries.sort_by(|a, b| compare(a, b, policy));

    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = index as u32 + 1;
    }

    entries
}
