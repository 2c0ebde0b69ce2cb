use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{EntryError, Result};
use crate::policy::{EntryDiscipline, ResolvedRules};
use crate::record::{CaptureRecord, CatchStatus, ScoreValue, SubType};
use crate::rules::{CoupMethod, ScoringMode, WeightUnit};

/// What a participant submits when logging a catch. Which fields matter
/// depends on the contest discipline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CatchEntry {
    pub user_id: Uuid,
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default)]
    pub size_cm: Option<Decimal>,
    #[serde(default)]
    pub weight_kg: Option<Decimal>,
    #[serde(default)]
    pub weight_g: Option<Decimal>,
    #[serde(default)]
    pub count: Option<i64>,
    /// Expert contests only; defaults to carnassier.
    #[serde(default)]
    pub sub_type: SubType,
}

/// Largest size the catch store holds (`NUMERIC(7, 2)`).
pub const MAX_SIZE_CM: Decimal = Decimal::from_parts(9_999_999, 0, 0, false, 2);

pub fn kg_to_grams(kg: Decimal) -> Result<i64> {
    let grams = kg
        .checked_mul(Decimal::ONE_THOUSAND)
        .ok_or(EntryError::WeightOutOfRange)?;
    round_grams(grams)
}

fn round_grams(grams: Decimal) -> Result<i64> {
    grams
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(EntryError::WeightOutOfRange)
}

fn positive(weight: Option<Decimal>) -> Result<Decimal> {
    match weight {
        Some(w) if w > Decimal::ZERO => Ok(w),
        _ => Err(EntryError::NonPositiveWeight),
    }
}

fn positive_count(count: Option<i64>) -> Result<i64> {
    match count {
        Some(n) if n > 0 => Ok(n),
        _ => Err(EntryError::NonPositiveCount),
    }
}

fn label_or(species: &str, fallback: &str) -> String {
    if species.is_empty() {
        fallback.to_string()
    } else {
        species.to_string()
    }
}

struct Normalized {
    sub_type: SubType,
    label: String,
    size_cm: Option<Decimal>,
    value: ScoreValue,
}

impl CatchEntry {
    /// Validates the entry against the contest rules and produces the
    /// record to store.
    pub fn into_record(
        self,
        contest_code: &str,
        rules: &ResolvedRules,
        now: DateTime<Utc>,
    ) -> Result<CaptureRecord> {
        match self.size_cm {
            Some(s) if s < Decimal::ZERO => return Err(EntryError::NegativeSize),
            Some(s) if s > MAX_SIZE_CM => return Err(EntryError::SizeOutOfRange),
            _ => {}
        }

        let species = self.species.as_deref().unwrap_or_default().trim().to_string();

        let normalized = match rules.discipline {
            EntryDiscipline::Species {
                scoring,
                requires_species,
            } => {
                let label = if requires_species {
                    if species.is_empty() {
                        return Err(EntryError::MissingSpecies);
                    }
                    species
                } else {
                    label_or(&species, "Poisson")
                };
                self.species_catch(SubType::None, label, scoring, rules)?
            }
            EntryDiscipline::CarpWeight { min_weight_kg } => {
                self.carp_catch(SubType::None, label_or(&species, "Carpe"), min_weight_kg)?
            }
            EntryDiscipline::CoupWeight => {
                self.coup_catch(SubType::None, &species, CoupMethod::Weight)?
            }
            EntryDiscipline::CoupCount => {
                self.coup_catch(SubType::None, &species, CoupMethod::Count)?
            }
            EntryDiscipline::Weight { unit } => {
                let grams = match unit {
                    WeightUnit::Kilograms => kg_to_grams(positive(self.weight_kg)?)?,
                    _ => round_grams(positive(self.weight_g)?)?,
                };
                Normalized {
                    sub_type: SubType::None,
                    label: label_or(&species, "Poids"),
                    size_cm: None,
                    value: ScoreValue::Grams(grams),
                }
            }
            EntryDiscipline::Count => Normalized {
                sub_type: SubType::None,
                label: label_or(&species, "Comptage"),
                size_cm: None,
                value: ScoreValue::Count(positive_count(self.count)?),
            },
            EntryDiscipline::Expert { coup_method } => match self.sub_type {
                SubType::Carp => self.carp_catch(
                    SubType::Carp,
                    label_or(&species, "Carpe"),
                    rules.carp_min_weight_kg,
                )?,
                SubType::Coup => self.coup_catch(SubType::Coup, &species, coup_method)?,
                SubType::Carnassier | SubType::None => {
                    if species.is_empty() {
                        return Err(EntryError::MissingSpecies);
                    }
                    self.species_catch(SubType::Carnassier, species, rules.scoring_mode, rules)?
                }
            },
        };

        Ok(CaptureRecord {
            contest_code: contest_code.to_string(),
            user_id: self.user_id,
            sub_type: normalized.sub_type,
            label: normalized.label,
            size_cm: normalized.size_cm,
            value: Some(normalized.value),
            status: if rules.moderation_enabled {
                CatchStatus::Pending
            } else {
                CatchStatus::Approved
            },
            created_at: now,
        })
    }

    fn species_catch(
        &self,
        sub_type: SubType,
        label: String,
        scoring: ScoringMode,
        rules: &ResolvedRules,
    ) -> Result<Normalized> {
        let points = match scoring {
            ScoringMode::BiggestFish => {
                if self.size_cm.is_none() {
                    return Err(EntryError::MissingSize);
                }
                0
            }
            ScoringMode::Count => 0,
            ScoringMode::TotalPoints | ScoringMode::Unknown => {
                rules.species.points_for(&label).unwrap_or(0)
            }
        };

        Ok(Normalized {
            sub_type,
            label,
            size_cm: self.size_cm,
            value: ScoreValue::Points(points),
        })
    }

    fn carp_catch(&self, sub_type: SubType, label: String, min_kg: Decimal) -> Result<Normalized> {
        let weight_kg = positive(self.weight_kg)?;
        if weight_kg < min_kg {
            return Err(EntryError::BelowCarpMinimum { weight_kg, min_kg });
        }

        Ok(Normalized {
            sub_type,
            label,
            size_cm: None,
            value: ScoreValue::Grams(kg_to_grams(weight_kg)?),
        })
    }

    fn coup_catch(&self, sub_type: SubType, species: &str, method: CoupMethod) -> Result<Normalized> {
        let (label, value) = match method {
            CoupMethod::Count => (
                if sub_type == SubType::None {
                    label_or(species, "Poissons (compte)")
                } else {
                    label_or(species, "Comptage")
                },
                ScoreValue::Count(positive_count(self.count)?),
            ),
            CoupMethod::Weight | CoupMethod::Unknown => (
                label_or(species, "Poissons"),
                ScoreValue::Grams(round_grams(positive(self.weight_g)?)?),
            ),
        };

        Ok(Normalized {
            sub_type,
            label,
            size_cm: None,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ContestRules;
    use serde_json::json;

    fn resolved(blob: serde_json::Value) -> ResolvedRules {
        ResolvedRules::resolve(&ContestRules::from_json(&blob))
    }

    fn entry() -> CatchEntry {
        CatchEntry {
            user_id: Uuid::new_v4(),
            ..Default::default()
        }
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_kg_to_grams_is_exact() {
        assert_eq!(kg_to_grams(dec("7.85")), Ok(7850));
        assert_eq!(kg_to_grams(dec("0.0015")), Ok(2));
        assert_eq!(kg_to_grams(dec("12")), Ok(12000));
    }

    #[test]
    fn test_huge_weights_are_refused() {
        assert_eq!(kg_to_grams(Decimal::MAX), Err(EntryError::WeightOutOfRange));

        let carp = resolved(json!({ "mode": "carp" }));
        let err = CatchEntry {
            weight_kg: Some(Decimal::MAX),
            ..entry()
        }
        .into_record("C1", &carp, Utc::now())
        .unwrap_err();
        assert_eq!(err, EntryError::WeightOutOfRange);

        let in_g = resolved(json!({ "kind": "custom", "custom": { "metric": "weight", "weight_unit": "g" } }));
        let err = CatchEntry {
            weight_g: Some(Decimal::MAX),
            ..entry()
        }
        .into_record("C1", &in_g, Utc::now())
        .unwrap_err();
        assert_eq!(err, EntryError::WeightOutOfRange);
    }

    #[test]
    fn test_size_must_fit_the_store() {
        let rules = resolved(json!({ "scoring_mode": "biggest_fish" }));
        let catch = |size: &str| CatchEntry {
            species: Some("Silure".to_string()),
            size_cm: Some(dec(size)),
            ..entry()
        };

        assert!(catch("99999.99").into_record("C1", &rules, Utc::now()).is_ok());
        assert_eq!(
            catch("100000").into_record("C1", &rules, Utc::now()).unwrap_err(),
            EntryError::SizeOutOfRange
        );
    }

    #[test]
    fn test_carp_catch_stored_in_grams() {
        let rules = resolved(json!({ "mode": "carp" }));
        let record = CatchEntry {
            weight_kg: Some(dec("7.85")),
            ..entry()
        }
        .into_record("C1", &rules, Utc::now())
        .unwrap();

        assert_eq!(record.value, Some(ScoreValue::Grams(7850)));
        assert_eq!(record.label, "Carpe");
        assert_eq!(record.size_cm, None);
        assert_eq!(record.status, CatchStatus::Approved);
    }

    #[test]
    fn test_carp_minimum_enforced() {
        let rules = resolved(json!({ "mode": "carp", "carp": { "min_weight_kg": 5 } }));
        let err = CatchEntry {
            weight_kg: Some(dec("4.2")),
            ..entry()
        }
        .into_record("C1", &rules, Utc::now())
        .unwrap_err();
        assert!(matches!(err, EntryError::BelowCarpMinimum { .. }));
    }

    #[test]
    fn test_custom_weight_units_agree() {
        let in_kg = resolved(json!({ "kind": "custom", "custom": { "metric": "weight", "weight_unit": "kg" } }));
        let in_g = resolved(json!({ "kind": "custom", "custom": { "metric": "weight", "weight_unit": "g" } }));

        let a = CatchEntry { weight_kg: Some(dec("1.25")), ..entry() }
            .into_record("C1", &in_kg, Utc::now())
            .unwrap();
        let b = CatchEntry { weight_g: Some(dec("1250")), ..entry() }
            .into_record("C1", &in_g, Utc::now())
            .unwrap();
        assert_eq!(a.value, b.value);
        assert_eq!(a.label, "Poids");
    }

    #[test]
    fn test_points_come_from_bareme() {
        let rules = resolved(json!({
            "species_points": [{ "name": "Brochet", "points": 1000 }, { "name": "Perche", "points": 400 }],
            "moderation_enabled": true
        }));
        let record = CatchEntry {
            species: Some("  brochet ".to_string()),
            size_cm: Some(dec("74.5")),
            ..entry()
        }
        .into_record("C1", &rules, Utc::now())
        .unwrap();

        assert_eq!(record.value, Some(ScoreValue::Points(1000)));
        assert_eq!(record.label, "brochet");
        assert_eq!(record.status, CatchStatus::Pending);

        let unknown = CatchEntry {
            species: Some("Silure".to_string()),
            ..entry()
        }
        .into_record("C1", &rules, Utc::now())
        .unwrap();
        assert_eq!(unknown.value, Some(ScoreValue::Points(0)));
    }

    #[test]
    fn test_species_and_size_requirements() {
        let points = resolved(json!({}));
        assert_eq!(
            entry().into_record("C1", &points, Utc::now()).unwrap_err(),
            EntryError::MissingSpecies
        );

        let biggest = resolved(json!({ "scoring_mode": "biggest_fish" }));
        assert_eq!(
            CatchEntry { species: Some("Sandre".into()), ..entry() }
                .into_record("C1", &biggest, Utc::now())
                .unwrap_err(),
            EntryError::MissingSize
        );

        let custom_biggest = resolved(json!({ "kind": "custom", "custom": { "metric": "biggest" } }));
        let record = CatchEntry { size_cm: Some(dec("61")), ..entry() }
            .into_record("C1", &custom_biggest, Utc::now())
            .unwrap();
        assert_eq!(record.label, "Poisson");
        assert_eq!(record.value, Some(ScoreValue::Points(0)));
    }

    #[test]
    fn test_negative_size_refused() {
        let rules = resolved(json!({}));
        let err = CatchEntry {
            species: Some("Perche".into()),
            size_cm: Some(dec("-3")),
            ..entry()
        }
        .into_record("C1", &rules, Utc::now())
        .unwrap_err();
        assert_eq!(err, EntryError::NegativeSize);
    }

    #[test]
    fn test_coup_methods() {
        let by_weight = resolved(json!({ "mode": "coup" }));
        let record = CatchEntry { weight_g: Some(dec("850")), ..entry() }
            .into_record("C1", &by_weight, Utc::now())
            .unwrap();
        assert_eq!(record.value, Some(ScoreValue::Grams(850)));
        assert_eq!(record.label, "Poissons");

        let by_count = resolved(json!({ "mode": "coup", "coup": { "method": "count" } }));
        let record = CatchEntry { count: Some(14), ..entry() }
            .into_record("C1", &by_count, Utc::now())
            .unwrap();
        assert_eq!(record.value, Some(ScoreValue::Count(14)));

        assert_eq!(
            CatchEntry { count: Some(0), ..entry() }
                .into_record("C1", &by_count, Utc::now())
                .unwrap_err(),
            EntryError::NonPositiveCount
        );
    }

    #[test]
    fn test_expert_sub_types() {
        let rules = resolved(json!({
            "mode": "expert",
            "species_points": [{ "name": "Sandre", "points": 800 }],
            "carp": { "min_weight_kg": 2 }
        }));

        let carnassier = CatchEntry { species: Some("Sandre".into()), ..entry() }
            .into_record("C1", &rules, Utc::now())
            .unwrap();
        assert_eq!(carnassier.sub_type, SubType::Carnassier);
        assert_eq!(carnassier.value, Some(ScoreValue::Points(800)));

        let carp = CatchEntry {
            sub_type: SubType::Carp,
            weight_kg: Some(dec("3.5")),
            ..entry()
        }
        .into_record("C1", &rules, Utc::now())
        .unwrap();
        assert_eq!(carp.sub_type, SubType::Carp);
        assert_eq!(carp.value, Some(ScoreValue::Grams(3500)));

        let coup = CatchEntry {
            sub_type: SubType::Coup,
            weight_g: Some(dec("420")),
            ..entry()
        }
        .into_record("C1", &rules, Utc::now())
        .unwrap();
        assert_eq!(coup.sub_type, SubType::Coup);
        assert_eq!(coup.value, Some(ScoreValue::Grams(420)));

        let small_carp = CatchEntry {
            sub_type: SubType::Carp,
            weight_kg: Some(dec("1.5")),
            ..entry()
        }
        .into_record("C1", &rules, Utc::now());
        assert!(small_carp.is_err());
    }
}
