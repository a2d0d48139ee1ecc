//! Doctor-visit progress for one employee and the location submission flow.
//!
//! A visit plan moves through [`VisitState`] as the employee records where
//! they were. State is always derived from the event itself; nothing here
//! keeps its own copy.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::calendar::{Attendance, CalendarEvent};
use crate::error::{GeolocationError, VisitError};
use crate::identity::CurrentUser;
use crate::mapper::{calendar_event_to_erp, ErpEvent};

/// Where a doctor-visit plan stands for one employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitState {
    /// The event is not a doctor-visit plan.
    NotApplicable,
    /// The user is not an employee participant.
    NotParticipant,
    /// The user is a participant with no location recorded.
    NeedsLocation,
    /// A location is recorded but attendance is not `Yes`.
    LocationCapturedPendingConfirmation,
    /// Location recorded and attendance `Yes`.
    Visited,
}

impl VisitState {
    pub fn flags(self) -> VisitFlags {
        use VisitState::*;
        VisitFlags {
            is_doctor_visit: self != NotApplicable,
            is_participant: matches!(
                self,
                NeedsLocation | LocationCapturedPendingConfirmation | Visited
            ),
            needs_location: self == NeedsLocation,
            has_location: matches!(self, LocationCapturedPendingConfirmation | Visited),
            visited: self == Visited,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VisitState::NotApplicable => "not_applicable",
            VisitState::NotParticipant => "not_participant",
            VisitState::NeedsLocation => "needs_location",
            VisitState::LocationCapturedPendingConfirmation => {
                "location_captured_pending_confirmation"
            }
            VisitState::Visited => "visited",
        }
    }
}

impl fmt::Display for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean view of a [`VisitState`] for enabling UI actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitFlags {
    pub is_doctor_visit: bool,
    pub is_participant: bool,
    pub needs_location: bool,
    pub has_location: bool,
    pub visited: bool,
}

/// Derive the visit state of `event` for the employee `user_id`.
pub fn visit_state(event: &CalendarEvent, user_id: &str) -> VisitState {
    if !event.is_doctor_visit() {
        return VisitState::NotApplicable;
    }
    let Some(me) = event.employee_participant(user_id) else {
        return VisitState::NotParticipant;
    };
    match (me.has_location(), me.attending) {
        (false, _) => VisitState::NeedsLocation,
        (true, Some(Attendance::Yes)) => VisitState::Visited,
        (true, _) => VisitState::LocationCapturedPendingConfirmation,
    }
}

/// Device position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Source of the device position.
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// Geolocator for hosts without a position source.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeolocation;

#[async_trait]
impl Geolocator for NoGeolocation {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Err(GeolocationError::Unsupported)
    }
}

/// Persists an ERP event document.
#[async_trait]
pub trait EventSaver: Send + Sync {
    async fn save_event(
        &self,
        document: &ErpEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Local collection of displayed events.
pub trait EventStore {
    /// Drop every event with this ERP name.
    fn remove(&mut self, erp_name: &str);
    fn insert(&mut self, event: CalendarEvent);
}

impl EventStore for Vec<CalendarEvent> {
    fn remove(&mut self, erp_name: &str) {
        self.retain(|e| e.erp_name.as_deref() != Some(erp_name));
    }

    fn insert(&mut self, event: CalendarEvent) {
        self.push(event);
    }
}

/// Record the user's current position on a saved doctor-visit plan.
///
/// The user's employee participant gets the position and attendance `Yes`;
/// the rebuilt document is saved through `saver`, and only after the save
/// succeeds is `store` updated. Any failure leaves `store` as it was.
///
/// # Errors
/// Returns [`VisitError`] when the event is not a saved visit the user
/// participates in, when no position arrives within `timeout`, or when the
/// save fails.
pub async fn submit_visit_location<S>(
    event: &CalendarEvent,
    user: &CurrentUser,
    geolocator: &dyn Geolocator,
    saver: &dyn EventSaver,
    store: &mut S,
    timeout: Duration,
) -> Result<CalendarEvent, VisitError>
where
    S: EventStore + ?Sized,
{
    if !event.is_doctor_visit() {
        return Err(VisitError::NotDoctorVisit);
    }
    let Some(erp_name) = event.erp_name.as_deref().filter(|n| !n.trim().is_empty()) else {
        return Err(VisitError::NotPersisted);
    };
    if event.employee_participant(&user.id).is_none() {
        return Err(VisitError::NotParticipant {
            user_id: user.id.clone(),
        });
    }

    let position = tokio::time::timeout(timeout, geolocator.current_position())
        .await
        .map_err(|_| VisitError::GeolocationTimeout {
            timeout_secs: timeout.as_secs(),
        })??;

    let mut updated = event.clone();
    for participant in updated
        .participants
        .iter_mut()
        .filter(|p| p.is_employee(&user.id))
    {
        participant.location = Some(position.to_string());
        participant.attending = Some(Attendance::Yes);
    }

    let document = calendar_event_to_erp(&updated, user);
    saver.save_event(&document).await.map_err(VisitError::Save)?;

    store.remove(erp_name);
    store.insert(updated.clone());
    tracing::info!(erp_name, user = %user.id, location = %position, "visit location saved");

    Ok(updated)
}
