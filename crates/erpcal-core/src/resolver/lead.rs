//! Typed view over a doctor ("Lead") option row.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::index::OptionRecord;
use crate::format::{erp_datetime, parse_erp_datetime};

/// A free-text note attached to a lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadNote {
    pub note: String,
    #[serde(with = "erp_datetime")]
    pub created_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_by: Option<String>,
}

/// Doctor record with the domain fields the calendar shows.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadRecord {
    pub id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub role: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub categories: Vec<String>,
    /// Most recent first.
    pub notes: Vec<LeadNote>,
}

fn string_field(record: &OptionRecord, name: &str) -> Option<String> {
    record
        .fields
        .get(name)
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn float_field(record: &OptionRecord, name: &str) -> Option<f64> {
    match record.fields.get(name)? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn note_from_value(value: &serde_json::Value) -> Option<LeadNote> {
    let note = value.get("note")?.as_str()?.to_string();
    let created_at = value
        .get("creation")
        .or_else(|| value.get("createdAt"))
        .and_then(serde_json::Value::as_str)
        .and_then(parse_erp_datetime)?;
    let added_by = value
        .get("addedBy")
        .or_else(|| value.get("added_by"))
        .and_then(serde_json::Value::as_str)
        .map(str::to_string);
    Some(LeadNote {
        note,
        created_at,
        added_by,
    })
}

impl LeadRecord {
    /// Read the lead fields out of an option row.
    ///
    /// Notes without a parseable creation timestamp are dropped.
    pub fn from_option(record: &OptionRecord) -> Self {
        let categories = match record.fields.get("categories") {
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .filter_map(serde_json::Value::as_str)
                .map(str::to_string)
                .collect(),
            Some(serde_json::Value::String(csv)) => csv
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };

        let mut notes: Vec<LeadNote> = record
            .fields
            .get("notes")
            .and_then(serde_json::Value::as_array)
            .map(|items| items.iter().filter_map(note_from_value).collect())
            .unwrap_or_default();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Self {
            id: record.value.clone(),
            display_name: record.label.clone(),
            email: record.email().map(str::to_string),
            role: string_field(record, "role"),
            city: string_field(record, "city"),
            latitude: float_field(record, "latitude"),
            longitude: float_field(record, "longitude"),
            categories,
            notes,
        }
    }

    /// `"lat,long"` when both coordinates are known.
    pub fn coordinates(&self) -> Option<String> {
        Some(format!("{},{}", self.latitude?, self.longitude?))
    }

    pub fn latest_note(&self) -> Option<&LeadNote> {
        self.notes.first()
    }
}
