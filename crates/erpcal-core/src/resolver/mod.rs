//! Identity resolution for employee and doctor references.
//!
//! ERP documents carry opaque ids; the calendar shows names and emails.
//! Option lists come from the host's fetchers and are indexed once per list.

pub mod index;
pub mod lead;


pub use index::{IndexKind, OptionRecord, ResolverCache, ResolverIndex};
pub use lead::{LeadNote, LeadRecord};
