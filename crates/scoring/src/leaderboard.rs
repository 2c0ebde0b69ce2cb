use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::aggregate::aggregate;
use crate::filter::eligible_records;
use crate::lookup::{MyRank, rank_of};
use crate::policy::{ResolvedRules, ScoringPolicy};
use crate::rank::{RankedEntry, rank};
use crate::record::{CaptureRecord, SubType};
use crate::rules::{CoupMethod, normalize_label};

/// A species column of the board: the barème species, or the labels seen
/// so far when the contest has no barème.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SpeciesColumn {
    pub key: String,
    pub label: String,
}

/// Policy-specific figures shown on a row.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LeaderboardColumns {
    Points {
        species_counts: BTreeMap<String, i64>,
        catch_count: i64,
        total_points: i64,
    },
    Count {
        species_counts: BTreeMap<String, i64>,
        catch_count: i64,
        total_points: i64,
    },
    Biggest {
        max_size_cm: Option<Decimal>,
        avg_size_cm: Option<Decimal>,
    },
    Weight {
        weight_kg: Decimal,
        catch_count: i64,
    },
    Expert {
        carnassier_points: i64,
        carp_kg: Decimal,
        #[serde(skip_serializing_if = "Option::is_none")]
        coup_kg: Option<Decimal>,
        #[serde(skip_serializing_if = "Option::is_none")]
        coup_count: Option<i64>,
        mix_total: Decimal,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LeaderboardRow {
    pub rank: u32,
    pub user_id: Uuid,
    pub columns: LeaderboardColumns,
}

/// The ranked board of one contest. Built fresh on every request and
/// shared by the full table and the single-user lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaderboard {
    pub policy: ScoringPolicy,
    pub moderation_enabled: bool,
    pub species_columns: Vec<SpeciesColumn>,
    pub entries: Vec<RankedEntry>,
}

pub fn grams_to_kg(grams: i64) -> Decimal {
    Decimal::new(grams, 3).round_dp(2)
}

fn size_display(size: Decimal) -> Option<Decimal> {
    (size >= Decimal::ZERO).then(|| size.round_dp(1))
}

impl Leaderboard {
    pub fn compute(rules: &ResolvedRules, records: &[CaptureRecord]) -> Self {
        let policy = rules.policy;
        let eligible: Vec<&CaptureRecord> =
            eligible_records(records, rules.moderation_enabled).collect();

        let species_columns = if policy.needs_species_counts() {
            species_columns(rules, &eligible)
        } else {
            Vec::new()
        };

        let aggregates = aggregate(eligible.iter().copied(), &policy);
        let entries = rank(aggregates, &policy);

        tracing::debug!(
            records = records.len(),
            eligible = eligible.len(),
            participants = entries.len(),
            policy = policy.label(),
            "Leaderboard computed"
        );

        Self {
            policy,
            moderation_enabled: rules.moderation_enabled,
            species_columns,
            entries,
        }
    }

    pub fn my_rank(&self, user_id: Uuid) -> MyRank {
        rank_of(&self.entries, user_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn rows(&self) -> Vec<LeaderboardRow> {
        self.entries
            .iter()
            .map(|entry| LeaderboardRow {
                rank: entry.rank,
                user_id: entry.aggregate.user_id,
                columns: self.columns_for(entry),
            })
            .collect()
    }

    fn columns_for(&self, entry: &RankedEntry) -> LeaderboardColumns {
        let agg = &entry.aggregate;
        let species_counts = || {
            self.species_columns
                .iter()
                .map(|col| {
                    let n = agg.species_counts.get(&col.key).copied().unwrap_or(0);
                    (col.key.clone(), n)
                })
                .collect()
        };

        match self.policy {
            ScoringPolicy::TotalPoints => LeaderboardColumns::Points {
                species_counts: species_counts(),
                catch_count: agg.catch_count,
                total_points: agg.total_points,
            },
            ScoringPolicy::CountBased => LeaderboardColumns::Count {
                species_counts: species_counts(),
                catch_count: agg.catch_count,
                total_points: agg.total_points,
            },
            ScoringPolicy::BiggestFish => LeaderboardColumns::Biggest {
                max_size_cm: size_display(agg.max_size_cm),
                avg_size_cm: size_display(agg.avg_size_cm),
            },
            ScoringPolicy::CumulativeWeight => LeaderboardColumns::Weight {
                weight_kg: grams_to_kg(agg.weight_grams),
                catch_count: agg.catch_count,
            },
            ScoringPolicy::ExpertMix { coup_method, .. } => {
                let (coup_kg, coup_count) = match coup_method {
                    CoupMethod::Count => (None, Some(agg.expert.coup_count)),
                    CoupMethod::Weight | CoupMethod::Unknown => {
                        (Some(grams_to_kg(agg.expert.coup_grams)), None)
                    }
                };
                LeaderboardColumns::Expert {
                    carnassier_points: agg.expert.carnassier_points,
                    carp_kg: grams_to_kg(agg.expert.carp_grams),
                    coup_kg,
                    coup_count,
                    mix_total: entry
                        .mix_total
                        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
                }
            }
        }
    }
}

fn species_columns(rules: &ResolvedRules, eligible: &[&CaptureRecord]) -> Vec<SpeciesColumn> {
    if !rules.species.is_empty() {
        return rules
            .species
            .names()
            .map(|name| SpeciesColumn {
                key: normalize_label(name),
                label: name.to_string(),
            })
            .collect();
    }

    let mut columns: Vec<SpeciesColumn> = Vec::new();
    for record in eligible {
        if !matches!(record.sub_type, SubType::None | SubType::Carnassier) {
            continue;
        }
        let label = record.label.trim();
        let key = normalize_label(label);
        if key.is_empty() || columns.iter().any(|c| c.key == key) {
            continue;
        }
        columns.push(SpeciesColumn {
            key,
            label: label.to_string(),
        });
    }
    columns
}
