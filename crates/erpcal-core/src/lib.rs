//! # erpcal Core Library
//!
//! This library holds the logic that sits between a field-sales calendar and
//! the ERP that stores its documents. It implements a CLI-first philosophy:
//! every transform is a plain function usable from the `erpcal-cli` binary,
//! with any UI being a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Resolver**: indexes employee and doctor option lists so opaque ids can
//!   be shown as names and emails
//! - **Reference cache**: keyed single-flight memoization for reference lists
//!   that rarely change
//! - **Mapper**: pure transforms between UI forms and ERP documents for
//!   events, leave applications, to-dos and quotations
//! - **Visit / permissions**: state derived from an event or leave and the
//!   current user, plus the visit location submission flow
//! - **Registry**: bundled offline queries merged with a remote catalog
//!
//! The core performs no network I/O. Saving, geolocation and catalog access
//! are injected through the async traits [`EventSaver`], [`Geolocator`] and
//! [`RemoteCatalog`].
//!
//! ## Key Components
//!
//! - [`ResolverIndex`]: id/email lookup over an option list
//! - [`ReferenceCache`]: memoizes one async producer per key
//! - [`event_to_erp`], [`leave_to_erp`], [`todo_to_erp`], [`quotation_to_erp`]
//! - [`visit_state`] and [`submit_visit_location`]
//! - [`QueryRegistry`]: offline-first query lookup
//! - [`Config`]: TOML configuration

pub mod cache;
pub mod calendar;
pub mod config;
pub mod error;
pub mod format;
pub mod identity;
pub mod mapper;
pub mod permissions;
pub mod registry;
pub mod resolver;
pub mod visit;

pub use cache::ReferenceCache;
pub use calendar::{
    Attendance, CalendarEvent, ColorTable, EventTag, LineItem, LineItemInput, Participant,
    ParticipantKind,
};
pub use config::Config;
pub use error::{
    ConfigError, CoreError, GeolocationError, MappingError, RegistryError, Result, VisitError,
};
pub use identity::CurrentUser;
pub use mapper::{
    calendar_event_from_erp, calendar_event_to_erp, event_to_erp, leave_from_erp, leave_to_erp,
    quotation_from_erp, quotation_to_erp, todo_from_erp, todo_to_erp, total_leave_days,
    CalendarLeave, ChecklistNormalizer, ErpEvent, ErpLeave, ErpQuotation, ErpTodo, EventForm,
    LeaveForm, MappingContext, QuotationForm, Todo, TodoForm,
};
pub use permissions::{leave_permissions, LeavePermissions};
pub use registry::{OfflineSet, QueryRegistry, QueryRegistryEntry, RemoteCatalog};
pub use resolver::{IndexKind, OptionRecord, ResolverCache, ResolverIndex};
pub use visit::{
    submit_visit_location, visit_state, Coordinates, EventSaver, EventStore, Geolocator,
    VisitFlags, VisitState,
};
