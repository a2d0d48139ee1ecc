//! What the current user may do with a leave application.

use serde::{Deserialize, Serialize};

use crate::identity::{normalize_email, CurrentUser};
use crate::mapper::CalendarLeave;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeavePermissions {
    pub is_owner: bool,
    pub is_approver: bool,
    pub can_edit_delete: bool,
    pub can_approve_reject: bool,
}

/// Derive leave permissions. A missing user or leave grants nothing.
///
/// Ownership compares the employee id; approval compares normalized
/// emails. Both actions require the leave to still be open.
pub fn leave_permissions(
    user: Option<&CurrentUser>,
    leave: Option<&CalendarLeave>,
) -> LeavePermissions {
    let (Some(user), Some(leave)) = (user, leave) else {
        return LeavePermissions::default();
    };

    let is_owner = !user.id.is_empty() && user.id == leave.employee_id;
    let is_approver = leave
        .approver_email
        .as_deref()
        .map(normalize_email)
        .is_some_and(|approver| !approver.is_empty() && approver == user.email_key());
    let open = leave.status.is_open();

    LeavePermissions {
        is_owner,
        is_approver,
        can_edit_delete: is_owner && open,
        can_approve_reject: is_approver && open,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::LeaveStatus;
    use chrono::NaiveDate;

    fn leave(status: LeaveStatus) -> CalendarLeave {
        let day = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        CalendarLeave {
            erp_name: Some("HR-LAP-0001".into()),
            title: "Asha Rao - Casual Leave".into(),
            employee_id: "EMP-001".into(),
            employee_name: Some("Asha Rao".into()),
            leave_type: "Casual Leave".into(),
            from_date: day,
            to_date: day,
            is_half_day: false,
            half_day_date: None,
            total_days: 1.0,
            status,
            approver_email: Some(" Boss@Acme.com ".into()),
            description: None,
            color: "orange".into(),
        }
    }

    #[test]
    fn missing_inputs_grant_nothing() {
        let user = CurrentUser::new("EMP-001", "asha@acme.com");
        let open = leave(LeaveStatus::Open);
        assert_eq!(leave_permissions(None, Some(&open)), LeavePermissions::default());
        assert_eq!(leave_permissions(Some(&user), None), LeavePermissions::default());
        assert_eq!(leave_permissions(None, None), LeavePermissions::default());
    }

    #[test]
    fn owner_can_edit_open_leave() {
        let user = CurrentUser::new("EMP-001", "asha@acme.com");
        let p = leave_permissions(Some(&user), Some(&leave(LeaveStatus::Open)));
        assert!(p.is_owner && p.can_edit_delete);
        assert!(!p.is_approver && !p.can_approve_reject);
    }

    #[test]
    fn approver_matches_email_case_insensitively() {
        let boss = CurrentUser::new("EMP-100", "boss@acme.com");
        let p = leave_permissions(Some(&boss), Some(&leave(LeaveStatus::Open)));
        assert!(p.is_approver && p.can_approve_reject);
        assert!(!p.is_owner && !p.can_edit_delete);
    }

    #[test]
    fn decided_leave_is_locked() {
        let boss = CurrentUser::new("EMP-001", "boss@acme.com");
        for status in [LeaveStatus::Approved, LeaveStatus::Rejected] {
            let p = leave_permissions(Some(&boss), Some(&leave(status)));
            assert!(p.is_owner && p.is_approver);
            assert!(!p.can_edit_delete && !p.can_approve_reject);
        }
    }

    #[test]
    fn blank_identities_never_match() {
        let nobody = CurrentUser::new("", "");
        let mut l = leave(LeaveStatus::Open);
        l.employee_id = String::new();
        l.approver_email = Some(String::new());
        assert_eq!(leave_permissions(Some(&nobody), Some(&l)), LeavePermissions::default());
    }
}
