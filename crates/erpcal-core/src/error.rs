//! Core error types for erpcal-core.
//!
//! Resolution misses are not errors (lookups return `Option`); everything
//! below is a condition the caller has to surface to the user.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for erpcal-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Document mapping errors
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// Visit submission errors
    #[error("Visit error: {0}")]
    Visit(#[from] VisitError),

    /// Query registry errors
    #[error("Query registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A form could not be turned into an ERP document.
///
/// Every variant names the one input that was missing or malformed so the
/// caller can attach the message to that field.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MappingError {
    /// No email could be derived for the todo assignee
    #[error("Cannot resolve an email for assignee '{assignee}'")]
    UnresolvedAssignee { assignee: String },

    /// A required field was empty
    #[error("Missing required field '{field}'")]
    MissingField { field: &'static str },

    /// End date precedes start date
    #[error("Invalid date range for '{field}': {end} is before {start}")]
    InvalidDateRange {
        field: &'static str,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
}

/// Failures of the visit-location submission flow.
#[derive(Error, Debug)]
pub enum VisitError {
    /// The event is not a doctor-visit plan
    #[error("Event is not a doctor visit plan")]
    NotDoctorVisit,

    /// The event has not been saved to the ERP yet
    #[error("Event has no ERP name; save it before recording a visit")]
    NotPersisted,

    /// The current user is not an employee participant of the event
    #[error("User '{user_id}' is not a participant of this visit")]
    NotParticipant { user_id: String },

    /// The device could not produce a position
    #[error("Geolocation failed: {0}")]
    Geolocation(#[from] GeolocationError),

    /// The device did not produce a position in time
    #[error("Geolocation timed out after {timeout_secs} seconds")]
    GeolocationTimeout { timeout_secs: u64 },

    /// The injected save call failed
    #[error("Failed to save event: {0}")]
    Save(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Why a device position fix failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeolocationError {
    /// The host has no geolocation capability
    #[error("Geolocation is not supported on this device")]
    Unsupported,

    /// The user refused the location permission
    #[error("Location permission denied")]
    PermissionDenied,

    /// The position source reported a failure
    #[error("Position unavailable: {0}")]
    Unavailable(String),
}

/// Query registry errors.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The bundled offline dataset could not be parsed
    #[error("Failed to parse offline query bundle: {0}")]
    InvalidBundle(#[source] serde_json::Error),

    /// The remote catalog accessor failed
    #[error("Remote query catalog failed: {0}")]
    Remote(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Neither source has the query
    #[error("Query not found: {0}")]
    NotFound(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Home directory could not be determined
    #[error("Cannot determine configuration directory")]
    NoConfigDir,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
