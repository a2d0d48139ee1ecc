use chrono::NaiveDate;
use clap::Subcommand;
use erpcal_core::mapper::{leave_from_erp, ErpLeave};
use erpcal_core::{leave_permissions, total_leave_days, CurrentUser};

use crate::input::{print_json, read_json};

#[derive(Subcommand)]
pub enum LeaveAction {
    /// Count the days a leave covers
    Days {
        /// First day (YYYY-MM-DD)
        from: NaiveDate,
        /// Last day (YYYY-MM-DD)
        to: NaiveDate,
        /// Half-day leave
        #[arg(long)]
        half: bool,
    },
    /// What the user may do with a fetched leave application
    Permissions {
        /// Current user JSON or @path
        #[arg(long)]
        user: String,
        /// ERP Leave Application JSON or @path
        #[arg(long)]
        leave: String,
    },
    /// Show a fetched leave application as the calendar does
    Show {
        /// ERP Leave Application JSON or @path
        #[arg(long)]
        leave: String,
    },
}

pub fn run(action: LeaveAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        LeaveAction::Days { from, to, half } => {
            println!("{}", total_leave_days(from, to, half));
            Ok(())
        }
        LeaveAction::Permissions { user, leave } => {
            let user: CurrentUser = read_json(&user)?;
            let node: ErpLeave = read_json(&leave)?;
            let leave = leave_from_erp(&node);
            print_json(&leave_permissions(Some(&user), Some(&leave)))
        }
        LeaveAction::Show { leave } => {
            let node: ErpLeave = read_json(&leave)?;
            print_json(&leave_from_erp(&node))
        }
    }
}
