use std::convert::Infallible;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Decodes a single field on its own, falling back to the field's default
/// when the stored value does not have the expected shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Decodes a closed choice. Strings that name no variant become the
/// choice's `Unknown` variant; a value that is not a string at all is
/// treated the same way.
fn choice<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = Infallible> + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => T::default(),
        Value::String(s) => s.parse().unwrap_or_default(),
        other => other.to_string().parse().unwrap_or_default(),
    })
}

macro_rules! rule_choice {
    ($name:ident { $($variant:ident => $tag:literal),+ $(,)? } default $default:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant,)+
            Unknown,
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl FromStr for $name {
            type Err = Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(match s.trim().to_ascii_lowercase().as_str() {
                    $($tag => Self::$variant,)+
                    _ => Self::Unknown,
                })
            }
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $tag,)+
                    Self::Unknown => "unknown",
                }
            }
        }
    };
}

rule_choice!(ContestKind {
    Official => "official",
    Custom => "custom",
} default Official);

rule_choice!(OfficialMode {
    Carnassier => "carnassier",
    Carp => "carp",
    Coup => "coup",
    Expert => "expert",
} default Carnassier);

rule_choice!(ScoringMode {
    TotalPoints => "total_points",
    Count => "count",
    BiggestFish => "biggest_fish",
} default TotalPoints);

rule_choice!(CoupMethod {
    Weight => "weight",
    Count => "count",
} default Weight);

rule_choice!(CustomMetric {
    Points => "points",
    Weight => "weight",
    Count => "count",
    Biggest => "biggest",
} default Points);

rule_choice!(WeightUnit {
    Grams => "g",
    Kilograms => "kg",
} default Grams);

/// One barème entry: a species and the points a catch of it is worth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct SpeciesPoints {
    #[serde(deserialize_with = "lenient")]
    pub name: String,
    #[serde(deserialize_with = "lenient")]
    pub points: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CarpRules {
    #[serde(deserialize_with = "lenient")]
    pub min_weight_kg: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CoupRules {
    #[serde(deserialize_with = "choice")]
    pub method: CoupMethod,
    #[serde(deserialize_with = "lenient")]
    pub unit: Option<String>,
}

/// Raw multipliers as stored. Absent or unusable values are replaced with 1
/// when the rules are resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct RawExpertWeights {
    #[serde(deserialize_with = "lenient")]
    pub carnassier: Option<Decimal>,
    #[serde(deserialize_with = "lenient")]
    pub carp: Option<Decimal>,
    #[serde(deserialize_with = "lenient")]
    pub coup: Option<Decimal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ExpertRules {
    #[serde(deserialize_with = "lenient")]
    pub weights: RawExpertWeights,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CustomRules {
    #[serde(deserialize_with = "choice")]
    pub metric: CustomMetric,
    #[serde(deserialize_with = "choice")]
    pub weight_unit: WeightUnit,
    #[serde(deserialize_with = "lenient_list")]
    pub species_points: Vec<SpeciesPoints>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContestStatus {
    Upcoming,
    Live,
    Ended,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ContestWindow {
    #[serde(deserialize_with = "lenient")]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient")]
    pub end_at: Option<DateTime<Utc>>,
}

impl ContestWindow {
    pub fn status_at(&self, now: DateTime<Utc>) -> ContestStatus {
        match (self.start_at, self.end_at) {
            (Some(start), _) if now < start => ContestStatus::Upcoming,
            (_, Some(end)) if now > end => ContestStatus::Ended,
            _ => ContestStatus::Live,
        }
    }
}

/// The configuration blob attached to a contest.
///
/// Decoding never fails: every field is read independently and falls back
/// to its documented default when it is missing or unusable. Unrecognized
/// choice strings are kept as `Unknown` so the resolver can decide what to
/// do with them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ContestRules {
    #[serde(deserialize_with = "choice")]
    pub kind: ContestKind,
    #[serde(deserialize_with = "choice")]
    pub mode: OfficialMode,
    #[serde(deserialize_with = "choice")]
    pub scoring_mode: ScoringMode,
    #[serde(deserialize_with = "lenient_list")]
    pub species_points: Vec<SpeciesPoints>,
    #[serde(deserialize_with = "lenient")]
    pub carp: CarpRules,
    #[serde(deserialize_with = "lenient")]
    pub coup: CoupRules,
    #[serde(deserialize_with = "lenient")]
    pub expert: ExpertRules,
    #[serde(deserialize_with = "lenient")]
    pub custom: CustomRules,
    #[serde(deserialize_with = "lenient")]
    pub moderation_enabled: bool,
    #[serde(deserialize_with = "lenient")]
    pub window: ContestWindow,
}

/// Like `lenient`, but drops unusable list items one by one instead of
/// discarding the whole list.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

impl ContestRules {
    pub fn from_json(value: &Value) -> Self {
        match ContestRules::deserialize(value) {
            Ok(rules) => rules,
            Err(e) => {
                tracing::debug!("Contest rules are not an object, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// The barème that applies to this contest: custom contests carry their
    /// own table.
    pub fn species_table(&self) -> SpeciesTable {
        match self.kind {
            ContestKind::Custom => SpeciesTable::new(&self.custom.species_points),
            _ => SpeciesTable::new(&self.species_points),
        }
    }
}

/// Case-insensitive species → points lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeciesTable {
    entries: Vec<(String, String, i64)>,
}

pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

impl SpeciesTable {
    pub fn new(species: &[SpeciesPoints]) -> Self {
        let mut entries: Vec<(String, String, i64)> = Vec::with_capacity(species.len());

        for sp in species {
            let name = sp.name.trim();
            if name.is_empty() {
                continue;
            }
            let key = normalize_label(name);
            if entries.iter().any(|(k, _, _)| *k == key) {
                continue;
            }
            let points = sp.points.round().to_i64().unwrap_or(0);
            entries.push((key, name.to_string(), points));
        }

        Self { entries }
    }

    pub fn points_for(&self, species: &str) -> Option<i64> {
        let key = normalize_label(species);
        self.entries
            .iter()
            .find(|(k, _, _)| *k == key)
            .map(|(_, _, points)| *points)
    }

    /// Display names in configuration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, name, _)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
