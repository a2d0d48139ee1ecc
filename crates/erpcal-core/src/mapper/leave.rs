//! Leave application form <-> ERP `Leave Application` document.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{present, DocumentIdentity, MappingContext};
use crate::error::MappingError;
use crate::format::{check_field, erp_date, null_as_default, optional_erp_date};

/// Whole days or a single half day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeavePeriod {
    #[default]
    Full,
    Half,
}

/// Leave application workflow status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LeaveStatus {
    #[default]
    Open,
    Approved,
    Rejected,
    Other(String),
}

impl LeaveStatus {
    pub fn as_str(&self) -> &str {
        match self {
            LeaveStatus::Open => "Open",
            LeaveStatus::Approved => "Approved",
            LeaveStatus::Rejected => "Rejected",
            LeaveStatus::Other(s) => s,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, LeaveStatus::Open)
    }

    /// Display color name for the status.
    pub fn color(&self) -> &'static str {
        match self {
            LeaveStatus::Approved => "green",
            LeaveStatus::Open => "orange",
            LeaveStatus::Rejected | LeaveStatus::Other(_) => "red",
        }
    }
}

impl From<String> for LeaveStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "OPEN" => LeaveStatus::Open,
            "APPROVED" => LeaveStatus::Approved,
            "REJECTED" => LeaveStatus::Rejected,
            _ => LeaveStatus::Other(raw),
        }
    }
}

impl From<LeaveStatus> for String {
    fn from(status: LeaveStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `leave_approver` as the query layer returns it: a plain user id, or the
/// linked user object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LeaveApproverRef {
    Plain(String),
    Nested {
        #[serde(default)]
        email: Option<String>,
        #[serde(default)]
        name: Option<String>,
    },
}

impl LeaveApproverRef {
    /// Plain identifier, whichever shape was received.
    pub fn identifier(&self) -> Option<&str> {
        match self {
            LeaveApproverRef::Plain(id) => present(Some(id.as_str())),
            LeaveApproverRef::Nested { email, name } => {
                present(email.as_deref()).or_else(|| present(name.as_deref()))
            }
        }
    }
}

/// Leave form values as the UI submits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveForm {
    #[serde(default)]
    pub erp_name: Option<String>,
    pub employee_id: String,
    pub leave_type: String,
    #[serde(with = "erp_date")]
    pub from_date: NaiveDate,
    #[serde(with = "erp_date")]
    pub to_date: NaiveDate,
    #[serde(default)]
    pub period: LeavePeriod,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: LeaveStatus,
    /// Falls back to the current user's approver when absent.
    #[serde(default)]
    pub approver_email: Option<String>,
}

/// ERP `Leave Application` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErpLeave {
    #[serde(flatten)]
    pub identity: DocumentIdentity,
    pub employee: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    pub leave_type: String,
    #[serde(with = "erp_date")]
    pub from_date: NaiveDate,
    #[serde(with = "erp_date")]
    pub to_date: NaiveDate,
    #[serde(default, deserialize_with = "check_field")]
    pub half_day: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "optional_erp_date"
    )]
    pub half_day_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_leave_days: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: LeaveStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leave_approver: Option<LeaveApproverRef>,
}

/// Leave application as the calendar displays it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarLeave {
    pub erp_name: Option<String>,
    pub title: String,
    pub employee_id: String,
    pub employee_name: Option<String>,
    pub leave_type: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub is_half_day: bool,
    pub half_day_date: Option<NaiveDate>,
    pub total_days: f64,
    pub status: LeaveStatus,
    /// Approver identifier, normalized from either ERP shape.
    pub approver_email: Option<String>,
    pub description: Option<String>,
    /// Color name derived from the status.
    pub color: String,
}

/// Days a leave covers: inclusive calendar-day count, minus half a day for
/// a half-day leave. Never negative.
pub fn total_leave_days(from: NaiveDate, to: NaiveDate, half_day: bool) -> f64 {
    let span = ((to - from).num_days() + 1).max(0) as f64;
    if half_day {
        (span - 0.5).max(0.0)
    } else {
        span
    }
}

/// Build the ERP document for a leave form.
///
/// A half-day leave collapses to its start date.
///
/// # Errors
/// Returns an error when the employee or leave type is blank, or the range
/// ends before it starts.
pub fn leave_to_erp(form: &LeaveForm, ctx: &MappingContext<'_>) -> Result<ErpLeave, MappingError> {
    let employee = present(Some(form.employee_id.as_str()))
        .ok_or(MappingError::MissingField { field: "employee" })?;
    let leave_type = present(Some(form.leave_type.as_str()))
        .ok_or(MappingError::MissingField { field: "leave_type" })?;

    let half_day = form.period == LeavePeriod::Half;
    let to_date = if half_day { form.from_date } else { form.to_date };
    if to_date < form.from_date {
        return Err(MappingError::InvalidDateRange {
            field: "to_date",
            start: form.from_date,
            end: to_date,
        });
    }

    let approver = present(form.approver_email.as_deref())
        .or_else(|| present(ctx.user.leave_approver_email.as_deref()))
        .map(|a| LeaveApproverRef::Plain(a.to_string()));

    Ok(ErpLeave {
        identity: DocumentIdentity::for_form(form.erp_name.as_deref(), ctx.user),
        employee: employee.to_string(),
        employee_name: ctx.employees.id_to_name(employee).map(str::to_string),
        leave_type: leave_type.to_string(),
        from_date: form.from_date,
        to_date,
        half_day,
        half_day_date: half_day.then_some(form.from_date),
        total_leave_days: total_leave_days(form.from_date, to_date, half_day),
        description: present(form.description.as_deref()).map(str::to_string),
        status: form.status.clone(),
        leave_approver: approver,
    })
}

/// Project a fetched leave application into the calendar model.
pub fn leave_from_erp(node: &ErpLeave) -> CalendarLeave {
    let who = node.employee_name.as_deref().unwrap_or(&node.employee);
    let title = if node.half_day {
        format!("{who} - {} (Half Day)", node.leave_type)
    } else {
        format!("{who} - {}", node.leave_type)
    };

    CalendarLeave {
        erp_name: node.identity.name.clone(),
        title,
        employee_id: node.employee.clone(),
        employee_name: node.employee_name.clone(),
        leave_type: node.leave_type.clone(),
        from_date: node.from_date,
        to_date: node.to_date,
        is_half_day: node.half_day,
        half_day_date: node.half_day_date.or(node.half_day.then_some(node.from_date)),
        total_days: node.total_leave_days,
        status: node.status.clone(),
        approver_email: node
            .leave_approver
            .as_ref()
            .and_then(LeaveApproverRef::identifier)
            .map(str::to_string),
        description: node.description.clone(),
        color: node.status.color().to_string(),
    }
}

impl CalendarLeave {
    /// Form values for editing this leave.
    pub fn to_form(&self) -> LeaveForm {
        LeaveForm {
            erp_name: self.erp_name.clone(),
            employee_id: self.employee_id.clone(),
            leave_type: self.leave_type.clone(),
            from_date: self.from_date,
            to_date: self.to_date,
            period: if self.is_half_day {
                LeavePeriod::Half
            } else {
                LeavePeriod::Full
            },
            description: self.description.clone(),
            status: self.status.clone(),
            approver_email: self.approver_email.clone(),
        }
    }
}
