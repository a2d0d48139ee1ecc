//! To-do form <-> ERP `ToDo` document.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{present, DocumentIdentity, MappingContext};
use crate::error::MappingError;
use crate::format::{null_as_default, parse_erp_date, title_case, ERP_DATE_FORMAT};
use crate::resolver::ResolverIndex;

const DEFAULT_STATUS: &str = "Open";
const DEFAULT_PRIORITY: &str = "Medium";

/// Converts rich-text checklists between the editor and ERP markup.
///
/// Supplied by the host; the core only routes text through it.
pub trait ChecklistNormalizer {
    fn to_erp(&self, text: &str) -> String;
    fn from_erp(&self, text: &str) -> String;
}

/// Passes text through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainChecklist;

impl ChecklistNormalizer for PlainChecklist {
    fn to_erp(&self, text: &str) -> String {
        text.to_string()
    }

    fn from_erp(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Assignee field in any of the shapes the UI produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssigneeRef {
    /// Option object; either key may be missing or blank.
    Option {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<String>,
        #[serde(default, alias = "value", skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
    /// Bare employee id.
    Raw(String),
}

impl AssigneeRef {
    /// The email this assignee resolves to: its own email when set, else
    /// the email of the employee its id points at.
    ///
    /// # Errors
    /// Returns [`MappingError::UnresolvedAssignee`] when no email can be derived.
    pub fn resolve_email(&self, employees: &ResolverIndex) -> Result<String, MappingError> {
        let email = match self {
            AssigneeRef::Option { email, id } => present(email.as_deref())
                .or_else(|| present(id.as_deref()).and_then(|id| employees.id_to_email(id))),
            AssigneeRef::Raw(id) => present(Some(id.as_str())).and_then(|id| employees.id_to_email(id)),
        };
        email.map(str::to_string).ok_or_else(|| MappingError::UnresolvedAssignee {
            assignee: self.describe().to_string(),
        })
    }

    fn describe(&self) -> &str {
        match self {
            AssigneeRef::Option { email, id } => present(email.as_deref())
                .or_else(|| present(id.as_deref()))
                .unwrap_or_default(),
            AssigneeRef::Raw(id) => id,
        }
    }
}

/// To-do form values as the UI submits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoForm {
    #[serde(default)]
    pub erp_name: Option<String>,
    pub subject: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub assignee: AssigneeRef,
    #[serde(default)]
    pub assigned_employee_ids: Vec<String>,
}

/// ERP `ToDo` document.
///
/// `date` stays text so fetched rows with a malformed date can be reported
/// and skipped instead of failing the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErpTodo {
    #[serde(flatten)]
    pub identity: DocumentIdentity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocated_to: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assigned_employees: Vec<String>,
}

/// To-do as the calendar displays it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub erp_name: Option<String>,
    pub subject: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub due_date: Option<NaiveDate>,
    pub assigned_to_email: Option<String>,
    pub assigned_employee_ids: Vec<String>,
}

/// Build the ERP document for a to-do form.
///
/// # Errors
/// Returns an error when the subject is blank or the assignee has no
/// resolvable email.
pub fn todo_to_erp(
    form: &TodoForm,
    ctx: &MappingContext<'_>,
    checklist: &dyn ChecklistNormalizer,
) -> Result<ErpTodo, MappingError> {
    let subject = present(Some(form.subject.as_str()))
        .ok_or(MappingError::MissingField { field: "subject" })?;
    let allocated_to = form.assignee.resolve_email(ctx.employees)?;

    let body = present(form.description.as_deref()).unwrap_or(subject);

    Ok(ErpTodo {
        identity: DocumentIdentity::for_form(form.erp_name.as_deref(), ctx.user),
        subject: Some(subject.to_string()),
        description: checklist.to_erp(body),
        status: title_case(present(form.status.as_deref()).unwrap_or(DEFAULT_STATUS)),
        priority: title_case(present(form.priority.as_deref()).unwrap_or(DEFAULT_PRIORITY)),
        date: form
            .due_date
            .map(|d| d.format(ERP_DATE_FORMAT).to_string()),
        allocated_to: Some(allocated_to),
        assigned_employees: form.assigned_employee_ids.clone(),
    })
}

/// Project a fetched ERP to-do into the calendar model.
///
/// Returns `None` (and logs a warning) when the row carries a due date that
/// does not parse; callers skip such rows.
pub fn todo_from_erp(node: &ErpTodo, checklist: &dyn ChecklistNormalizer) -> Option<Todo> {
    let due_date = match present(node.date.as_deref()) {
        None => None,
        Some(raw) => match parse_erp_date(raw) {
            Some(date) => Some(date),
            None => {
                tracing::warn!(
                    name = node.identity.name.as_deref().unwrap_or("<unsaved>"),
                    date = raw,
                    "skipping todo with unparseable due date"
                );
                return None;
            }
        },
    };

    let description = checklist.from_erp(&node.description);
    let subject = present(node.subject.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| description.lines().next().unwrap_or_default().trim().to_string());

    Some(Todo {
        erp_name: node.identity.name.clone(),
        subject,
        description,
        status: title_case(&node.status),
        priority: title_case(&node.priority),
        due_date,
        assigned_to_email: present(node.allocated_to.as_deref()).map(str::to_string),
        assigned_employee_ids: node.assigned_employees.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::ColorTable;
    use crate::config::OrganizationConfig;
    use crate::identity::CurrentUser;
    use crate::resolver::OptionRecord;
    use serde_json::json;

    /// Turns `[ ]` lines into ERP checkbox markup and back.
    struct BracketChecklist;

    impl ChecklistNormalizer for BracketChecklist {
        fn to_erp(&self, text: &str) -> String {
            text.replace("[ ]", "<input type=\"checkbox\">")
        }

        fn from_erp(&self, text: &str) -> String {
            text.replace("<input type=\"checkbox\">", "[ ]")
        }
    }

    fn run<T>(f: impl FnOnce(&MappingContext<'_>) -> T) -> T {
        let user = CurrentUser::new("EMP-001", "asha@acme.com");
        let employees = ResolverIndex::employees(vec![
            OptionRecord::new("EMP-001", "Asha Rao").with_email("asha@acme.com"),
            OptionRecord::new("EMP-002", "Vikram Shah").with_email("vikram@acme.com"),
            OptionRecord::new("EMP-003", "No Mail"),
        ]);
        let doctors = ResolverIndex::doctors(Vec::new());
        let organization = OrganizationConfig::default();
        let colors = ColorTable::default();
        f(&MappingContext {
            user: &user,
            employees: &employees,
            doctors: &doctors,
            organization: &organization,
            colors: &colors,
        })
    }

    fn form(assignee: serde_json::Value) -> TodoForm {
        serde_json::from_value(json!({
            "subject": "Follow up on samples",
            "description": "[ ] Call Dr. Mehta",
            "status": "open",
            "priority": "HIGH",
            "dueDate": "2024-07-01",
            "assignee": assignee,
            "assignedEmployeeIds": ["EMP-002"]
        }))
        .unwrap()
    }

    #[test]
    fn assignee_shapes_all_resolve() {
        for assignee in [
            json!({"email": "vikram@acme.com", "label": "Vikram"}),
            json!({"id": "EMP-002"}),
            json!({"value": "EMP-002", "label": "Vikram Shah"}),
            json!("EMP-002"),
        ] {
            let doc = run(|ctx| todo_to_erp(&form(assignee.clone()), ctx, &PlainChecklist)).unwrap();
            assert_eq!(doc.allocated_to.as_deref(), Some("vikram@acme.com"), "{assignee}");
        }
    }

    #[test]
    fn unresolvable_assignee_is_an_error() {
        for assignee in [json!("EMP-003"), json!({"id": "EMP-404"}), json!({"email": " "})] {
            let result = run(|ctx| todo_to_erp(&form(assignee.clone()), ctx, &PlainChecklist));
            assert!(
                matches!(result, Err(MappingError::UnresolvedAssignee { .. })),
                "{assignee}"
            );
        }
    }

    #[test]
    fn blank_option_email_falls_back_to_id() {
        for assignee in [
            json!({"email": "", "value": "EMP-002"}),
            json!({"email": null, "id": "EMP-002", "label": "Vikram Shah"}),
        ] {
            let doc = run(|ctx| todo_to_erp(&form(assignee.clone()), ctx, &PlainChecklist)).unwrap();
            assert_eq!(doc.allocated_to.as_deref(), Some("vikram@acme.com"), "{assignee}");
        }

        let err = run(|ctx| {
            todo_to_erp(&form(json!({"email": " ", "value": "EMP-003"})), ctx, &PlainChecklist)
        })
        .unwrap_err();
        assert_eq!(
            err,
            MappingError::UnresolvedAssignee {
                assignee: "EMP-003".into()
            }
        );
    }

    #[test]
    fn maps_fields_and_title_cases() {
        let doc = run(|ctx| {
            todo_to_erp(&form(json!("EMP-002")), ctx, &BracketChecklist)
        })
        .unwrap();

        assert_eq!(doc.status, "Open");
        assert_eq!(doc.priority, "High");
        assert_eq!(doc.date.as_deref(), Some("2024-07-01"));
        assert_eq!(doc.description, "<input type=\"checkbox\"> Call Dr. Mehta");
        assert_eq!(doc.identity.owner.as_deref(), Some("asha@acme.com"));
        assert_eq!(doc.assigned_employees, vec!["EMP-002"]);
    }

    #[test]
    fn defaults_status_priority_and_description() {
        let mut f = form(json!("EMP-002"));
        f.status = None;
        f.priority = Some("  ".into());
        f.description = None;
        f.due_date = None;

        let doc = run(|ctx| todo_to_erp(&f, ctx, &PlainChecklist)).unwrap();
        assert_eq!(doc.status, "Open");
        assert_eq!(doc.priority, "Medium");
        assert_eq!(doc.description, "Follow up on samples");
        assert!(serde_json::to_value(&doc).unwrap().get("date").is_none());
    }

    #[test]
    fn from_erp_rejects_unparseable_due_date() {
        let node: ErpTodo = serde_json::from_value(json!({
            "name": "TD-1",
            "description": "x",
            "status": "open",
            "priority": "low",
            "date": "31/12/2024"
        }))
        .unwrap();
        assert!(todo_from_erp(&node, &PlainChecklist).is_none());

        let trailing = ErpTodo {
            date: Some("2024-07-01xyz".into()),
            ..node
        };
        assert!(todo_from_erp(&trailing, &PlainChecklist).is_none());
    }

    #[test]
    fn from_erp_accepts_null_status_and_priority() {
        let node: ErpTodo = serde_json::from_value(json!({
            "name": "TD-2",
            "description": null,
            "status": null,
            "priority": null,
            "date": "2024-07-01 00:00:00"
        }))
        .unwrap();

        let todo = todo_from_erp(&node, &PlainChecklist).unwrap();
        assert_eq!(todo.status, "");
        assert_eq!(todo.priority, "");
        assert_eq!(todo.due_date, NaiveDate::from_ymd_opt(2024, 7, 1));
    }

    #[test]
    fn from_erp_builds_display_todo() {
        let node: ErpTodo = serde_json::from_value(json!({
            "name": "TD-2",
            "description": "<input type=\"checkbox\"> Call Dr. Mehta\nsecond line",
            "status": "closed",
            "priority": "medium",
            "date": "2024-07-01",
            "allocated_to": "vikram@acme.com",
            "assigned_employees": ["EMP-002"]
        }))
        .unwrap();

        let todo = todo_from_erp(&node, &BracketChecklist).unwrap();
        assert_eq!(todo.erp_name.as_deref(), Some("TD-2"));
        assert_eq!(todo.subject, "[ ] Call Dr. Mehta");
        assert_eq!(todo.status, "Closed");
        assert_eq!(todo.priority, "Medium");
        assert_eq!(todo.due_date, NaiveDate::from_ymd_opt(2024, 7, 1));
        assert_eq!(todo.assigned_to_email.as_deref(), Some("vikram@acme.com"));

        let undated = ErpTodo {
            date: None,
            ..node
        };
        assert_eq!(todo_from_erp(&undated, &PlainChecklist).unwrap().due_date, None);
    }
}
