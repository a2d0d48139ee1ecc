//! Calendar domain types shared by the mappers and visit derivation.

pub mod color;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::format::{erp_datetime, NumberInput};

pub use color::ColorTable;

/// Event category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventTag {
    DoctorVisitPlan,
    Birthday,
    Other(String),
}

impl EventTag {
    pub fn as_str(&self) -> &str {
        match self {
            EventTag::DoctorVisitPlan => "Doctor-Visit-Plan",
            EventTag::Birthday => "Birthday",
            EventTag::Other(s) => s,
        }
    }

    pub fn is_doctor_visit(&self) -> bool {
        matches!(self, EventTag::DoctorVisitPlan)
    }
}

impl From<String> for EventTag {
    fn from(raw: String) -> Self {
        match raw.trim() {
            "Doctor-Visit-Plan" => EventTag::DoctorVisitPlan,
            "Birthday" => EventTag::Birthday,
            _ => EventTag::Other(raw),
        }
    }
}

impl From<EventTag> for String {
    fn from(tag: EventTag) -> Self {
        tag.as_str().to_string()
    }
}

impl Default for EventTag {
    fn default() -> Self {
        EventTag::Other(String::new())
    }
}

impl fmt::Display for EventTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Participant attendance answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attendance {
    Yes,
    No,
}

impl FromStr for Attendance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" => Ok(Attendance::Yes),
            "no" => Ok(Attendance::No),
            other => Err(format!("unknown attendance '{other}'")),
        }
    }
}

impl fmt::Display for Attendance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attendance::Yes => f.write_str("Yes"),
            Attendance::No => f.write_str("No"),
        }
    }
}

/// Which reference list a participant points into.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParticipantKind {
    Employee,
    /// Doctors are stored as ERP Leads.
    Doctor,
    Other(String),
}

impl ParticipantKind {
    /// ERP doctype name.
    pub fn doctype(&self) -> &str {
        match self {
            ParticipantKind::Employee => "Employee",
            ParticipantKind::Doctor => "Lead",
            ParticipantKind::Other(s) => s,
        }
    }
}

impl From<String> for ParticipantKind {
    fn from(raw: String) -> Self {
        match raw.trim() {
            "Employee" => ParticipantKind::Employee,
            "Lead" => ParticipantKind::Doctor,
            _ => ParticipantKind::Other(raw),
        }
    }
}

impl From<ParticipantKind> for String {
    fn from(kind: ParticipantKind) -> Self {
        kind.doctype().to_string()
    }
}

/// Reference from an event to an employee or doctor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub kind: ParticipantKind,
    pub reference_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub attending: Option<Attendance>,
    /// `"lat,long"`, set once a visit is confirmed.
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub role_id: Option<String>,
}

impl Participant {
    pub fn employee(id: impl Into<String>) -> Self {
        Self::new(ParticipantKind::Employee, id)
    }

    pub fn doctor(id: impl Into<String>) -> Self {
        Self::new(ParticipantKind::Doctor, id)
    }

    fn new(kind: ParticipantKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            reference_id: id.into(),
            email: None,
            attending: None,
            location: None,
            role_id: None,
        }
    }

    pub fn is_employee(&self, id: &str) -> bool {
        self.kind == ParticipantKind::Employee && self.reference_id == id
    }

    pub fn has_location(&self) -> bool {
        self.location.as_deref().is_some_and(|l| !l.trim().is_empty())
    }
}

/// Product line on a quotation or a visit's order booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub item_code: String,
    pub qty: f64,
    pub rate: f64,
    pub amount: f64,
}

/// Line item as typed into a form: numbers may arrive as text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemInput {
    pub item_code: String,
    #[serde(default)]
    pub qty: Option<NumberInput>,
    #[serde(default)]
    pub rate: Option<NumberInput>,
    #[serde(default)]
    pub amount: Option<NumberInput>,
}

impl LineItemInput {
    /// Coerce every number, 0 where a value is missing or unparseable.
    pub fn coerce(&self) -> LineItem {
        use crate::format::coerce_number;
        LineItem {
            item_code: self.item_code.trim().to_string(),
            qty: coerce_number(self.qty.as_ref()),
            rate: coerce_number(self.rate.as_ref()),
            amount: coerce_number(self.amount.as_ref()),
        }
    }
}

/// Calendar event as the UI sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// ERP document name; `None` until the event has been saved.
    #[serde(default)]
    pub erp_name: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "erp_datetime")]
    pub start: NaiveDateTime,
    #[serde(with = "erp_datetime")]
    pub end: NaiveDateTime,
    #[serde(default)]
    pub tag: EventTag,
    /// Hex color.
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub territory: Option<String>,
    #[serde(default)]
    pub pob_items: Vec<LineItem>,
}

impl CalendarEvent {
    pub fn is_doctor_visit(&self) -> bool {
        self.tag.is_doctor_visit()
    }

    /// Employee participant matching `user_id`.
    pub fn employee_participant(&self, user_id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.is_employee(user_id))
    }
}
