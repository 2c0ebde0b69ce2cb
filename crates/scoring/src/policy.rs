use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::rules::{
    ContestKind, ContestRules, CoupMethod, CustomMetric, OfficialMode, RawExpertWeights,
    ScoringMode, SpeciesTable, WeightUnit,
};

/// Multipliers applied to the three expert sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ExpertWeights {
    pub carnassier: Decimal,
    pub carp: Decimal,
    pub coup: Decimal,
}

impl Default for ExpertWeights {
    fn default() -> Self {
        Self {
            carnassier: Decimal::ONE,
            carp: Decimal::ONE,
            coup: Decimal::ONE,
        }
    }
}

impl ExpertWeights {
    /// Missing and non-positive multipliers count as 1.
    pub fn from_raw(raw: &RawExpertWeights) -> Self {
        let pick = |w: Option<Decimal>| match w {
            Some(w) if w > Decimal::ZERO => w,
            _ => Decimal::ONE,
        };

        Self {
            carnassier: pick(raw.carnassier),
            carp: pick(raw.carp),
            coup: pick(raw.coup),
        }
    }
}

/// How a contest turns aggregates into an order. Exactly one is active per
/// contest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum ScoringPolicy {
    TotalPoints,
    CountBased,
    BiggestFish,
    CumulativeWeight,
    ExpertMix {
        weights: ExpertWeights,
        coup_method: CoupMethod,
    },
}

impl ScoringPolicy {
    pub fn label(&self) -> &'static str {
        match self {
            Self::TotalPoints => "Total points",
            Self::CountBased => "Catch count",
            Self::BiggestFish => "Biggest fish",
            Self::CumulativeWeight => "Cumulative weight",
            Self::ExpertMix { .. } => "Expert mix (carnassier + carp + coup)",
        }
    }

    pub(crate) fn needs_points(&self) -> bool {
        matches!(self, Self::TotalPoints | Self::CountBased | Self::BiggestFish)
    }

    pub(crate) fn needs_sizes(&self) -> bool {
        matches!(self, Self::BiggestFish)
    }

    pub(crate) fn needs_weight(&self) -> bool {
        matches!(self, Self::CumulativeWeight)
    }

    pub(crate) fn needs_species_counts(&self) -> bool {
        matches!(self, Self::TotalPoints | Self::CountBased)
    }
}

/// The discipline a single catch is entered under. Only expert contests mix
/// more than one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryDiscipline {
    /// Species-based entry; `scoring` says whether the barème, the count or
    /// the size matters.
    Species {
        scoring: ScoringMode,
        requires_species: bool,
    },
    /// Weight entered in kilograms, with a minimum.
    CarpWeight { min_weight_kg: Decimal },
    CoupWeight,
    CoupCount,
    Weight { unit: WeightUnit },
    Count,
    Expert { coup_method: CoupMethod },
}

/// Contest rules after validation at the boundary: the policy the ranking
/// uses plus the few settings the surrounding pipeline still needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRules {
    pub policy: ScoringPolicy,
    pub moderation_enabled: bool,
    pub discipline: EntryDiscipline,
    pub species: SpeciesTable,
    pub carp_min_weight_kg: Decimal,
    pub scoring_mode: ScoringMode,
}

impl ResolvedRules {
    pub fn resolve(rules: &ContestRules) -> Self {
        let scoring_mode = match rules.scoring_mode {
            ScoringMode::Unknown => ScoringMode::TotalPoints,
            known => known,
        };
        let coup_method = match rules.coup.method {
            CoupMethod::Unknown => CoupMethod::Weight,
            known => known,
        };
        let carp_min_weight_kg = rules.carp.min_weight_kg.max(Decimal::ZERO);

        let (policy, discipline) = match rules.kind {
            ContestKind::Official => match rules.mode {
                OfficialMode::Carnassier => (
                    carnassier_policy(rules.scoring_mode),
                    EntryDiscipline::Species {
                        scoring: scoring_mode,
                        requires_species: true,
                    },
                ),
                OfficialMode::Carp => (
                    ScoringPolicy::CumulativeWeight,
                    EntryDiscipline::CarpWeight {
                        min_weight_kg: carp_min_weight_kg,
                    },
                ),
                OfficialMode::Coup => match coup_method {
                    CoupMethod::Count => (ScoringPolicy::CountBased, EntryDiscipline::CoupCount),
                    _ => (ScoringPolicy::CumulativeWeight, EntryDiscipline::CoupWeight),
                },
                OfficialMode::Expert => (
                    ScoringPolicy::ExpertMix {
                        weights: ExpertWeights::from_raw(&rules.expert.weights),
                        coup_method,
                    },
                    EntryDiscipline::Expert { coup_method },
                ),
                OfficialMode::Unknown => fallback(rules),
            },
            ContestKind::Custom => match rules.custom.metric {
                CustomMetric::Points => (
                    ScoringPolicy::TotalPoints,
                    EntryDiscipline::Species {
                        scoring: ScoringMode::TotalPoints,
                        requires_species: true,
                    },
                ),
                CustomMetric::Count => (ScoringPolicy::CountBased, EntryDiscipline::Count),
                CustomMetric::Biggest => (
                    ScoringPolicy::BiggestFish,
                    EntryDiscipline::Species {
                        scoring: ScoringMode::BiggestFish,
                        requires_species: false,
                    },
                ),
                CustomMetric::Weight => {
                    let unit = match rules.custom.weight_unit {
                        WeightUnit::Unknown => WeightUnit::Grams,
                        known => known,
                    };
                    (ScoringPolicy::CumulativeWeight, EntryDiscipline::Weight { unit })
                }
                CustomMetric::Unknown => fallback(rules),
            },
            ContestKind::Unknown => fallback(rules),
        };

        Self {
            policy,
            moderation_enabled: rules.moderation_enabled,
            discipline,
            species: rules.species_table(),
            carp_min_weight_kg,
            scoring_mode,
        }
    }
}

fn carnassier_policy(mode: ScoringMode) -> ScoringPolicy {
    match mode {
        ScoringMode::Count => ScoringPolicy::CountBased,
        ScoringMode::BiggestFish => ScoringPolicy::BiggestFish,
        ScoringMode::TotalPoints | ScoringMode::Unknown => ScoringPolicy::TotalPoints,
    }
}

fn fallback(rules: &ContestRules) -> (ScoringPolicy, EntryDiscipline) {
    tracing::debug!(
        kind = rules.kind.as_str(),
        mode = rules.mode.as_str(),
        metric = rules.custom.metric.as_str(),
        "Unrecognized contest configuration, ranking by total points"
    );
    (
        ScoringPolicy::TotalPoints,
        EntryDiscipline::Species {
            scoring: ScoringMode::TotalPoints,
            requires_species: true,
        },
    )
}
