//! Calendar event <-> ERP `Event` document.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{present, DocumentIdentity, MappingContext};
use crate::calendar::{
    Attendance, CalendarEvent, ColorTable, EventTag, LineItem, LineItemInput, Participant,
    ParticipantKind,
};
use crate::error::MappingError;
use crate::format::{
    blank_as_none, check_field, erp_datetime, null_as_default, optional_check_field,
};
use crate::identity::CurrentUser;

const YEARLY: &str = "Yearly";

/// Event form values as the UI submits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventForm {
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
    /// Color name picked by the user.
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub territory: Option<String>,
    /// Selected employee ids.
    #[serde(default)]
    pub employees: Vec<String>,
    /// Selected doctor (lead) ids.
    #[serde(default)]
    pub leads: Vec<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub attending: Option<Attendance>,
    #[serde(default)]
    pub location: Option<String>,
    /// Whether an order booking was taken during the visit.
    #[serde(default)]
    pub pob_given: bool,
    #[serde(default)]
    pub pob_items: Vec<LineItemInput>,
}

/// Row of the ERP event participant table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErpParticipant {
    pub reference_doctype: ParticipantKind,
    pub reference_docname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub attending: Option<Attendance>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,
}

impl ErpParticipant {
    fn reference(kind: ParticipantKind, id: &str) -> Self {
        Self {
            reference_doctype: kind,
            reference_docname: id.to_string(),
            email: None,
            attending: None,
            location: None,
            role_id: None,
        }
    }
}

impl From<&Participant> for ErpParticipant {
    fn from(p: &Participant) -> Self {
        Self {
            reference_doctype: p.kind.clone(),
            reference_docname: p.reference_id.clone(),
            email: present(p.email.as_deref()).map(str::to_string),
            attending: p.attending,
            location: present(p.location.as_deref()).map(str::to_string),
            role_id: p.role_id.clone(),
        }
    }
}

impl From<&ErpParticipant> for Participant {
    fn from(p: &ErpParticipant) -> Self {
        Self {
            kind: p.reference_doctype.clone(),
            reference_id: p.reference_docname.clone(),
            email: p.email.clone(),
            attending: p.attending,
            location: p.location.clone(),
            role_id: p.role_id.clone(),
        }
    }
}

/// ERP `Event` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErpEvent {
    #[serde(flatten)]
    pub identity: DocumentIdentity,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "erp_datetime")]
    pub starts_on: NaiveDateTime,
    #[serde(with = "erp_datetime")]
    pub ends_on: NaiveDateTime,
    #[serde(default, deserialize_with = "null_as_default")]
    pub event_category: EventTag,
    /// Hex color, empty when the ERP has none.
    #[serde(default, deserialize_with = "null_as_default")]
    pub color: String,
    #[serde(default, deserialize_with = "check_field")]
    pub all_day: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "optional_check_field"
    )]
    pub repeat_this_event: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub territory: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub event_participants: Vec<ErpParticipant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pob_items: Option<Vec<LineItem>>,
}

/// Color name an event should display with.
///
/// A doctor-visit update with at least one employee and attendance `Yes`
/// is confirmed and always gets the confirmed color; otherwise the user's
/// choice stands.
pub fn resolve_event_color<'a>(form: &'a EventForm, colors: &'a ColorTable) -> &'a str {
    let confirmed = form.tag.is_doctor_visit()
        && present(form.erp_name.as_deref()).is_some()
        && !form.employees.is_empty()
        && form.attending == Some(Attendance::Yes);

    if confirmed {
        colors.confirmed()
    } else {
        form.color.as_deref().unwrap_or_default()
    }
}

/// Build the ERP document for an event form.
///
/// On a doctor-visit update the form's attendance and location belong to
/// the signed-in user, so they land only on that user's employee row.
///
/// # Errors
/// Returns an error when the title is blank or the event ends before it starts.
pub fn event_to_erp(form: &EventForm, ctx: &MappingContext<'_>) -> Result<ErpEvent, MappingError> {
    if form.title.trim().is_empty() {
        return Err(MappingError::MissingField { field: "title" });
    }
    if form.end < form.start {
        return Err(MappingError::InvalidDateRange {
            field: "end",
            start: form.start.date(),
            end: form.end.date(),
        });
    }

    let identity = DocumentIdentity::for_form(form.erp_name.as_deref(), ctx.user);
    let visit_update = form.tag.is_doctor_visit() && identity.is_update();

    let mut participants = Vec::with_capacity(form.employees.len() + form.leads.len());
    for id in &form.employees {
        let mut row = ErpParticipant::reference(ParticipantKind::Employee, id);
        row.email = ctx.employees.id_to_email(id).map(str::to_string);
        row.role_id = ctx
            .employees
            .id_to_field(id, "roleId")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string);
        if visit_update && id == &ctx.user.id {
            row.attending = form.attending;
            row.location = present(form.location.as_deref()).map(str::to_string);
        }
        participants.push(row);
    }
    for id in &form.leads {
        let mut row = ErpParticipant::reference(ParticipantKind::Doctor, id);
        row.email = ctx.doctors.id_to_email(id).map(str::to_string);
        participants.push(row);
    }

    let pob_items = (visit_update && form.pob_given)
        .then(|| form.pob_items.iter().map(LineItemInput::coerce).collect());
    let birthday = form.tag == EventTag::Birthday;

    Ok(ErpEvent {
        identity,
        subject: form.title.trim().to_string(),
        description: present(form.description.as_deref()).map(str::to_string),
        starts_on: form.start,
        ends_on: form.end,
        event_category: form.tag.clone(),
        color: ctx.colors.hex(resolve_event_color(form, ctx.colors)).to_string(),
        all_day: form.all_day || birthday,
        repeat_this_event: birthday.then_some(true),
        repeat_on: birthday.then(|| YEARLY.to_string()),
        territory: present(form.territory.as_deref()).map(str::to_string),
        event_participants: participants,
        pob_items,
    })
}

/// Project a fetched ERP event into the calendar model.
pub fn calendar_event_from_erp(node: &ErpEvent) -> CalendarEvent {
    CalendarEvent {
        erp_name: node.identity.name.clone(),
        title: node.subject.clone(),
        description: node.description.clone(),
        start: node.starts_on,
        end: node.ends_on,
        tag: node.event_category.clone(),
        color: node.color.clone(),
        all_day: node.all_day,
        participants: node.event_participants.iter().map(Participant::from).collect(),
        territory: node.territory.clone(),
        pob_items: node.pob_items.clone().unwrap_or_default(),
    }
}

/// Rebuild the ERP document for a calendar event as it stands, keeping
/// every participant's attendance and location.
pub fn calendar_event_to_erp(event: &CalendarEvent, user: &CurrentUser) -> ErpEvent {
    let birthday = event.tag == EventTag::Birthday;
    ErpEvent {
        identity: DocumentIdentity::for_form(event.erp_name.as_deref(), user),
        subject: event.title.clone(),
        description: present(event.description.as_deref()).map(str::to_string),
        starts_on: event.start,
        ends_on: event.end,
        event_category: event.tag.clone(),
        color: event.color.clone(),
        all_day: event.all_day || birthday,
        repeat_this_event: birthday.then_some(true),
        repeat_on: birthday.then(|| YEARLY.to_string()),
        territory: present(event.territory.as_deref()).map(str::to_string),
        event_participants: event.participants.iter().map(ErpParticipant::from).collect(),
        pob_items: (!event.pob_items.is_empty()).then(|| event.pob_items.clone()),
    }
}
