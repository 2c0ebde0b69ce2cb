use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::policy::ScoringPolicy;
use crate::record::{CaptureRecord, SubType};
use crate::rules::{CoupMethod, normalize_label};

/// Expert sub-scores, kept in their own units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ExpertBreakdown {
    pub carnassier_points: i64,
    pub carp_grams: i64,
    pub coup_grams: i64,
    pub coup_count: i64,
}

impl ExpertBreakdown {
    /// The coup sub-score in the unit the contest measures coup catches in.
    pub fn coup_score(&self, method: CoupMethod) -> i64 {
        match method {
            CoupMethod::Count => self.coup_count,
            CoupMethod::Weight | CoupMethod::Unknown => self.coup_grams,
        }
    }
}

/// Per-participant statistics for one ranking pass. Only the fields the
/// active policy needs are filled; the rest stay at zero, or at the −1
/// sentinel for sizes.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ParticipantAggregate {
    pub user_id: Uuid,
    pub total_points: i64,
    pub catch_count: i64,
    pub max_size_cm: Decimal,
    pub avg_size_cm: Decimal,
    pub weight_grams: i64,
    pub expert: ExpertBreakdown,
    /// Catches per normalized species label.
    pub species_counts: BTreeMap<String, i64>,
    #[serde(skip)]
    size_sum: Decimal,
    #[serde(skip)]
    size_n: u32,
}

pub const NO_SIZE: Decimal = Decimal::NEGATIVE_ONE;

impl ParticipantAggregate {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            total_points: 0,
            catch_count: 0,
            max_size_cm: NO_SIZE,
            avg_size_cm: NO_SIZE,
            weight_grams: 0,
            expert: ExpertBreakdown::default(),
            species_counts: BTreeMap::new(),
            size_sum: Decimal::ZERO,
            size_n: 0,
        }
    }

    pub fn has_size(&self) -> bool {
        self.size_n > 0
    }

    fn add_size(&mut self, size: Decimal) {
        if size > self.max_size_cm {
            self.max_size_cm = size;
        }
        self.size_sum += size;
        self.size_n += 1;
        self.avg_size_cm = self.size_sum / Decimal::from(self.size_n);
    }

    fn add(&mut self, record: &CaptureRecord, policy: &ScoringPolicy) {
        self.catch_count = self.catch_count.saturating_add(record.fish_count());

        if let ScoringPolicy::ExpertMix { coup_method, .. } = policy {
            self.add_expert(record, *coup_method);
            return;
        }

        if policy.needs_points() {
            match record.value.and_then(|v| v.points()) {
                Some(points) => self.total_points = self.total_points.saturating_add(points),
                None => skipped(record, "points"),
            }
        }

        if policy.needs_weight() {
            match record.value.and_then(|v| v.grams()) {
                Some(grams) => self.weight_grams = self.weight_grams.saturating_add(grams),
                None => skipped(record, "weight"),
            }
        }

        if policy.needs_sizes()
            && let Some(size) = record.valid_size()
        {
            self.add_size(size);
        }

        if policy.needs_species_counts() {
            let key = normalize_label(&record.label);
            if !key.is_empty() {
                *self.species_counts.entry(key).or_insert(0) += 1;
            }
        }
    }

    fn add_expert(&mut self, record: &CaptureRecord, coup_method: CoupMethod) {
        let value = record.value;
        let expert = &mut self.expert;

        match record.sub_type {
            SubType::Carp => match value.and_then(|v| v.grams()) {
                Some(g) => expert.carp_grams = expert.carp_grams.saturating_add(g),
                None => skipped(record, "carp weight"),
            },
            SubType::Coup => match coup_method {
                CoupMethod::Count => match value.and_then(|v| v.count()) {
                    Some(n) => expert.coup_count = expert.coup_count.saturating_add(n),
                    None => skipped(record, "coup count"),
                },
                CoupMethod::Weight | CoupMethod::Unknown => match value.and_then(|v| v.grams()) {
                    Some(g) => expert.coup_grams = expert.coup_grams.saturating_add(g),
                    None => skipped(record, "coup weight"),
                },
            },
            SubType::Carnassier | SubType::None => match value.and_then(|v| v.points()) {
                Some(p) => expert.carnassier_points = expert.carnassier_points.saturating_add(p),
                None => skipped(record, "carnassier points"),
            },
        }
    }
}

fn skipped(record: &CaptureRecord, statistic: &str) {
    tracing::debug!(
        user_id = %record.user_id,
        value = ?record.value,
        "Record value unusable for {}, ignoring it for that statistic",
        statistic
    );
}

/// Folds eligible records into one aggregate per participant in a single
/// pass.
pub fn aggregate<'a, I>(records: I, policy: &ScoringPolicy) -> BTreeMap<Uuid, ParticipantAggregate>
where
    I: IntoIterator<Item = &'a CaptureRecord>,
{
    let mut by_user: BTreeMap<Uuid, ParticipantAggregate> = BTreeMap::new();

    for record in records {
        by_user
            .entry(record.user_id)
            .or_insert_with(|| ParticipantAggregate::new(record.user_id))
            .add(record, policy);
    }

    by_user
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::ExpertWeights;
    use crate::record::{CatchStatus, ScoreValue};
    use chrono::Utc;

    fn record(user: Uuid, label: &str, size: Option<&str>, value: Option<ScoreValue>) -> CaptureRecord {
        CaptureRecord {
            contest_code: "C1".to_string(),
            user_id: user,
            sub_type: SubType::None,
            label: label.to_string(),
            size_cm: size.map(|s| s.parse().unwrap()),
            value,
            status: CatchStatus::Approved,
            created_at: Utc::now(),
        }
    }

    fn expert(user: Uuid, sub_type: SubType, value: ScoreValue) -> CaptureRecord {
        CaptureRecord {
            sub_type,
            ..record(user, "x", None, Some(value))
        }
    }

    #[test]
    fn test_points_and_species_counts() {
        let a = Uuid::new_v4();
        let records = vec![
            record(a, "Brochet", None, Some(ScoreValue::Points(1000))),
            record(a, " brochet", None, Some(ScoreValue::Points(1000))),
            record(a, "Perche", None, Some(ScoreValue::Points(400))),
        ];
        let aggregates = aggregate(&records, &ScoringPolicy::TotalPoints);
        let agg = &aggregates[&a];

        assert_eq!(agg.total_points, 2400);
        assert_eq!(agg.catch_count, 3);
        assert_eq!(agg.species_counts.get("brochet"), Some(&2));
        assert_eq!(agg.species_counts.get("perche"), Some(&1));
        assert_eq!(agg.max_size_cm, NO_SIZE);
        assert_eq!(agg.weight_grams, 0);
    }

    #[test]
    fn test_sizes_only_for_biggest_fish() {
        let a = Uuid::new_v4();
        let records = vec![
            record(a, "Sandre", Some("74.5"), Some(ScoreValue::Points(0))),
            record(a, "Sandre", Some("25.9"), Some(ScoreValue::Points(0))),
            record(a, "Sandre", None, Some(ScoreValue::Points(0))),
        ];

        let biggest = aggregate(&records, &ScoringPolicy::BiggestFish);
        assert_eq!(biggest[&a].max_size_cm, "74.5".parse::<Decimal>().unwrap());
        assert_eq!(biggest[&a].avg_size_cm, "50.2".parse::<Decimal>().unwrap());
        assert!(biggest[&a].has_size());

        let points = aggregate(&records, &ScoringPolicy::TotalPoints);
        assert_eq!(points[&a].max_size_cm, NO_SIZE);
        assert_eq!(points[&a].avg_size_cm, NO_SIZE);
    }

    #[test]
    fn test_no_size_keeps_sentinel() {
        let a = Uuid::new_v4();
        let records = vec![record(a, "Perche", None, Some(ScoreValue::Points(0)))];
        let aggregates = aggregate(&records, &ScoringPolicy::BiggestFish);
        assert_eq!(aggregates[&a].max_size_cm, NO_SIZE);
        assert_eq!(aggregates[&a].avg_size_cm, NO_SIZE);
        assert!(!aggregates[&a].has_size());
    }

    #[test]
    fn test_malformed_values_only_affect_their_statistic() {
        let a = Uuid::new_v4();
        let records = vec![
            record(a, "Sandre", Some("-4"), Some(ScoreValue::Points(800))),
            record(a, "Sandre", Some("60"), Some(ScoreValue::Points(-50))),
            record(a, "Sandre", Some("40"), None),
        ];
        let aggregates = aggregate(&records, &ScoringPolicy::BiggestFish);
        let agg = &aggregates[&a];

        assert_eq!(agg.total_points, 800);
        assert_eq!(agg.catch_count, 3);
        assert_eq!(agg.max_size_cm, Decimal::from(60));
        assert_eq!(agg.avg_size_cm, Decimal::from(50));
    }

    #[test]
    fn test_weight_ignores_points_values() {
        let a = Uuid::new_v4();
        let records = vec![
            record(a, "Carpe", None, Some(ScoreValue::Grams(7850))),
            record(a, "Carpe", None, Some(ScoreValue::Points(9999))),
        ];
        let aggregates = aggregate(&records, &ScoringPolicy::CumulativeWeight);
        assert_eq!(aggregates[&a].weight_grams, 7850);
        assert_eq!(aggregates[&a].catch_count, 2);
        assert_eq!(aggregates[&a].total_points, 0);
    }

    #[test]
    fn test_count_records_count_their_fish() {
        let a = Uuid::new_v4();
        let records = vec![
            record(a, "Comptage", None, Some(ScoreValue::Count(12))),
            record(a, "Comptage", None, Some(ScoreValue::Count(3))),
            record(a, "Comptage", None, Some(ScoreValue::Count(-7))),
        ];
        let aggregates = aggregate(&records, &ScoringPolicy::CountBased);
        assert_eq!(aggregates[&a].catch_count, 15);
    }

    #[test]
    fn test_expert_dispatch_by_sub_type() {
        let a = Uuid::new_v4();
        let policy = ScoringPolicy::ExpertMix {
            weights: ExpertWeights::default(),
            coup_method: CoupMethod::Weight,
        };
        let records = vec![
            expert(a, SubType::Carnassier, ScoreValue::Points(500)),
            expert(a, SubType::Carp, ScoreValue::Grams(2000)),
            expert(a, SubType::Coup, ScoreValue::Grams(1000)),
            expert(a, SubType::Coup, ScoreValue::Count(4)),
        ];
        let aggregates = aggregate(&records, &policy);
        let agg = &aggregates[&a];

        assert_eq!(agg.expert.carnassier_points, 500);
        assert_eq!(agg.expert.carp_grams, 2000);
        assert_eq!(agg.expert.coup_grams, 1000);
        assert_eq!(agg.expert.coup_count, 0);
        assert_eq!(agg.total_points, 0);
        assert_eq!(agg.catch_count, 3 + 4);
    }

    #[test]
    fn test_one_aggregate_per_user() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let records = vec![
            record(a, "Perche", None, Some(ScoreValue::Points(400))),
            record(b, "Perche", None, Some(ScoreValue::Points(400))),
            record(a, "Perche", None, Some(ScoreValue::Points(400))),
        ];
        let aggregates = aggregate(&records, &ScoringPolicy::TotalPoints);
        assert_eq!(aggregates.len(), 2);
        assert_eq!(aggregates[&a].total_points, 800);
        assert_eq!(aggregates[&b].total_points, 400);
    }
}
