use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Moderation state of a logged catch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CatchStatus {
    Pending,
    #[default]
    Approved,
    Rejected,
}

impl CatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Reads a stored status. Rows written before moderation existed have no
    /// status and count as approved; anything unrecognized waits for review.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value.map(|s| s.trim().to_ascii_lowercase()) {
            None => Self::Approved,
            Some(s) => match s.as_str() {
                "" | "approved" => Self::Approved,
                "rejected" => Self::Rejected,
                _ => Self::Pending,
            },
        }
    }
}

/// Which expert sub-score a catch feeds. `None` outside expert contests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubType {
    #[default]
    None,
    Carnassier,
    Carp,
    Coup,
}

/// The measured value of a catch, tagged with its unit so grams are never
/// summed as points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ScoreValue {
    Points(i64),
    Grams(i64),
    Count(i64),
}

impl ScoreValue {
    pub fn raw(&self) -> i64 {
        match *self {
            Self::Points(v) | Self::Grams(v) | Self::Count(v) => v,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.raw() >= 0
    }

    pub fn points(&self) -> Option<i64> {
        match *self {
            Self::Points(v) if v >= 0 => Some(v),
            _ => None,
        }
    }

    pub fn grams(&self) -> Option<i64> {
        match *self {
            Self::Grams(v) if v >= 0 => Some(v),
            _ => None,
        }
    }

    pub fn count(&self) -> Option<i64> {
        match *self {
            Self::Count(v) if v >= 0 => Some(v),
            _ => None,
        }
    }
}

/// One logged catch, already parsed into typed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CaptureRecord {
    pub contest_code: String,
    pub user_id: Uuid,
    pub sub_type: SubType,
    pub label: String,
    pub size_cm: Option<Decimal>,
    pub value: Option<ScoreValue>,
    pub status: CatchStatus,
    pub created_at: DateTime<Utc>,
}

impl CaptureRecord {
    /// Size usable for statistics; negative sizes are ignored.
    pub fn valid_size(&self) -> Option<Decimal> {
        self.size_cm.filter(|s| *s >= Decimal::ZERO)
    }

    /// Number of fish the record stands for. Count entries declare it,
    /// everything else is one fish.
    pub fn fish_count(&self) -> i64 {
        match self.value {
            Some(ScoreValue::Count(n)) if n >= 0 => n,
            Some(ScoreValue::Count(_)) => 0,
            _ => 1,
        }
    }
}
