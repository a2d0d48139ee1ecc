//! Bidirectional transforms between UI form values and ERP documents.
//!
//! Every `*_to_erp` function is pure: same form and context, same document.
//! Optional document fields are `Option`s that serialize as absent, never as
//! `null`; the ERP treats the two differently.

pub mod event;
pub mod leave;
pub mod quotation;
pub mod todo;


use serde::{Deserialize, Serialize};

use crate::calendar::ColorTable;
use crate::config::OrganizationConfig;
use crate::identity::CurrentUser;
use crate::resolver::ResolverIndex;

pub use event::{
    calendar_event_from_erp, calendar_event_to_erp, event_to_erp, resolve_event_color, ErpEvent,
    ErpParticipant, EventForm,
};
pub use leave::{
    leave_from_erp, leave_to_erp, total_leave_days, CalendarLeave, ErpLeave, LeaveApproverRef,
    LeaveForm, LeavePeriod, LeaveStatus,
};
pub use quotation::{
    quotation_from_erp, quotation_to_erp, ErpQuotation, QuotationForm, QuotationView,
};
pub use todo::{
    todo_from_erp, todo_to_erp, AssigneeRef, ChecklistNormalizer, ErpTodo, PlainChecklist, Todo,
    TodoForm,
};

/// Everything a mapper may consult besides the form itself.
#[derive(Debug, Clone, Copy)]
pub struct MappingContext<'a> {
    pub user: &'a CurrentUser,
    pub employees: &'a ResolverIndex,
    pub doctors: &'a ResolverIndex,
    pub organization: &'a OrganizationConfig,
    pub colors: &'a ColorTable,
}

/// `name`/`owner` pair carried by every ERP document.
///
/// Exactly one is set on documents built from a form: `name` when the form
/// refers to a saved document, `owner` when it creates a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentIdentity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl DocumentIdentity {
    /// Stamp for a form whose ERP name is `erp_name`. Blank names count as absent.
    pub fn for_form(erp_name: Option<&str>, user: &CurrentUser) -> Self {
        match present(erp_name) {
            Some(name) => Self {
                name: Some(name.to_string()),
                owner: None,
            },
            None => Self {
                name: None,
                owner: Some(user.email.clone()),
            },
        }
    }

    pub fn is_update(&self) -> bool {
        self.name.is_some()
    }
}

/// Trimmed value if present and not blank.
pub(crate) fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_sets_owner_on_create_and_name_on_update() {
        let user = CurrentUser::new("EMP-001", "rep@acme.com");

        let create = DocumentIdentity::for_form(None, &user);
        assert_eq!(create.owner.as_deref(), Some("rep@acme.com"));
        assert!(create.name.is_none());
        assert!(!create.is_update());

        let blank = DocumentIdentity::for_form(Some("  "), &user);
        assert!(!blank.is_update());

        let update = DocumentIdentity::for_form(Some("EV-0001"), &user);
        assert_eq!(update.name.as_deref(), Some("EV-0001"));
        assert!(update.owner.is_none());
    }

    #[test]
    fn identity_omits_absent_keys() {
        let user = CurrentUser::new("EMP-001", "rep@acme.com");
        let json = serde_json::to_value(DocumentIdentity::for_form(None, &user)).unwrap();
        assert_eq!(json, serde_json::json!({"owner": "rep@acme.com"}));
    }
}
