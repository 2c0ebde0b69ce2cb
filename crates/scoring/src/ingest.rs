//! Turns stored catch rows into typed [`CaptureRecord`]s.
//!
//! Rows written by older clients carry the expert sub-type inside the label
//! (`"EXPERT:carpe|Miroir"`) and keep points, grams and counts in one
//! untagged integer column. Both are decoded here, once, so nothing past
//! this point ever splits strings or guesses units.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::policy::{EntryDiscipline, ResolvedRules};
use crate::record::{CaptureRecord, CatchStatus, ScoreValue, SubType};
use crate::rules::CoupMethod;

const EXPERT_PREFIX: &str = "EXPERT:";

/// A catch row as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCatch {
    pub contest_code: String,
    pub user_id: Uuid,
    pub fish_name: Option<String>,
    pub size_cm: Option<Decimal>,
    pub points: Option<i64>,
    pub status: Option<String>,
    /// Explicit sub-type column; absent on legacy rows.
    pub sub_type: Option<String>,
    /// Explicit unit of `points`; absent on legacy rows.
    pub value_kind: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Splits a legacy `"EXPERT:<type>|<label>"` label. Labels without a known
/// prefix are returned untouched with `SubType::None`.
pub fn split_legacy_label(raw: &str) -> (SubType, &str) {
    let Some(rest) = raw.strip_prefix(EXPERT_PREFIX) else {
        return (SubType::None, raw);
    };
    let Some((tag, label)) = rest.split_once('|') else {
        return (SubType::None, raw);
    };

    match parse_sub_type(tag) {
        SubType::None => (SubType::None, raw),
        sub_type => (sub_type, label),
    }
}

/// Encodes a label the way legacy readers expect it.
pub fn legacy_label(sub_type: SubType, label: &str) -> String {
    match sub_type {
        SubType::None => label.to_string(),
        SubType::Carnassier => format!("{EXPERT_PREFIX}carnassier|{label}"),
        SubType::Carp => format!("{EXPERT_PREFIX}carpe|{label}"),
        SubType::Coup => format!("{EXPERT_PREFIX}coup|{label}"),
    }
}

pub fn parse_sub_type(tag: &str) -> SubType {
    match tag.trim().to_ascii_lowercase().as_str() {
        "carnassier" => SubType::Carnassier,
        "carp" | "carpe" => SubType::Carp,
        "coup" => SubType::Coup,
        _ => SubType::None,
    }
}

pub fn sub_type_tag(sub_type: SubType) -> Option<&'static str> {
    match sub_type {
        SubType::None => None,
        SubType::Carnassier => Some("carnassier"),
        SubType::Carp => Some("carp"),
        SubType::Coup => Some("coup"),
    }
}

pub fn value_kind_tag(value: &ScoreValue) -> &'static str {
    match value {
        ScoreValue::Points(_) => "points",
        ScoreValue::Grams(_) => "grams",
        ScoreValue::Count(_) => "count",
    }
}

fn tag_value(kind: &str, raw: i64) -> Option<ScoreValue> {
    match kind.trim().to_ascii_lowercase().as_str() {
        "points" => Some(ScoreValue::Points(raw)),
        "grams" => Some(ScoreValue::Grams(raw)),
        "count" => Some(ScoreValue::Count(raw)),
        _ => None,
    }
}

/// Unit of an untagged stored value, given the contest discipline and the
/// catch's sub-type.
fn implied_value(discipline: EntryDiscipline, sub_type: SubType, raw: i64) -> ScoreValue {
    match discipline {
        EntryDiscipline::Species { .. } => ScoreValue::Points(raw),
        EntryDiscipline::CarpWeight { .. }
        | EntryDiscipline::CoupWeight
        | EntryDiscipline::Weight { .. } => ScoreValue::Grams(raw),
        EntryDiscipline::CoupCount | EntryDiscipline::Count => ScoreValue::Count(raw),
        EntryDiscipline::Expert { coup_method } => match sub_type {
            SubType::Carp => ScoreValue::Grams(raw),
            SubType::Coup if coup_method == CoupMethod::Count => ScoreValue::Count(raw),
            SubType::Coup => ScoreValue::Grams(raw),
            SubType::Carnassier | SubType::None => ScoreValue::Points(raw),
        },
    }
}

impl CaptureRecord {
    pub fn from_stored(row: StoredCatch, rules: &ResolvedRules) -> Self {
        let raw_label = row.fish_name.unwrap_or_default();
        let is_expert = matches!(rules.discipline, EntryDiscipline::Expert { .. });

        let (sub_type, label) = match row.sub_type.as_deref().map(parse_sub_type) {
            Some(explicit) if explicit != SubType::None => {
                let (_, label) = split_legacy_label(&raw_label);
                (explicit, label.to_string())
            }
            _ if is_expert => {
                let (parsed, label) = split_legacy_label(&raw_label);
                let parsed = match parsed {
                    SubType::None => SubType::Carnassier,
                    other => other,
                };
                (parsed, label.to_string())
            }
            _ => (SubType::None, raw_label.clone()),
        };

        let value = row.points.map(|raw| {
            row.value_kind
                .as_deref()
                .and_then(|kind| tag_value(kind, raw))
                .unwrap_or_else(|| implied_value(rules.discipline, sub_type, raw))
        });

        Self {
            contest_code: row.contest_code,
            user_id: row.user_id,
            sub_type,
            label: label.trim().to_string(),
            size_cm: row.size_cm,
            value,
            status: CatchStatus::from_stored(row.status.as_deref()),
            created_at: row.created_at,
        }
    }
}
