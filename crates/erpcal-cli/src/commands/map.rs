use clap::{Args, Subcommand};
use erpcal_core::mapper::{
    event_to_erp, leave_to_erp, quotation_to_erp, todo_to_erp, EventForm, LeaveForm,
    PlainChecklist, QuotationForm, TodoForm,
};
use erpcal_core::{ColorTable, Config, CurrentUser, MappingContext, OptionRecord, ResolverIndex};

use crate::input::{print_json, read_json, read_json_or_default};

#[derive(Subcommand)]
pub enum MapAction {
    /// Event form to ERP Event
    Event(MapArgs),
    /// Leave form to ERP Leave Application
    Leave(MapArgs),
    /// To-do form to ERP ToDo
    Todo(MapArgs),
    /// Quotation form to ERP Quotation
    Quotation(MapArgs),
}

/// JSON inputs; each accepts inline JSON or `@path`.
#[derive(Args)]
pub struct MapArgs {
    /// Form values
    #[arg(long)]
    form: String,
    /// Current user ({"id", "email", ...})
    #[arg(long)]
    user: String,
    /// Employee option list ([{"value", "label", "email"?}])
    #[arg(long)]
    employees: Option<String>,
    /// Doctor option list
    #[arg(long)]
    doctors: Option<String>,
}

struct Inputs {
    user: CurrentUser,
    employees: ResolverIndex,
    doctors: ResolverIndex,
    config: Config,
    colors: ColorTable,
}

impl Inputs {
    fn load(args: &MapArgs) -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::load()?;
        let employees: Vec<OptionRecord> = read_json_or_default(args.employees.as_deref())?;
        let doctors: Vec<OptionRecord> = read_json_or_default(args.doctors.as_deref())?;
        Ok(Self {
            user: read_json(&args.user)?,
            employees: ResolverIndex::employees(employees),
            doctors: ResolverIndex::doctors(doctors),
            colors: ColorTable::new(&config.calendar),
            config,
        })
    }

    fn ctx(&self) -> MappingContext<'_> {
        MappingContext {
            user: &self.user,
            employees: &self.employees,
            doctors: &self.doctors,
            organization: &self.config.organization,
            colors: &self.colors,
        }
    }
}

pub fn run(action: MapAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        MapAction::Event(args) => {
            let inputs = Inputs::load(&args)?;
            let form: EventForm = read_json(&args.form)?;
            print_json(&event_to_erp(&form, &inputs.ctx())?)
        }
        MapAction::Leave(args) => {
            let inputs = Inputs::load(&args)?;
            let form: LeaveForm = read_json(&args.form)?;
            print_json(&leave_to_erp(&form, &inputs.ctx())?)
        }
        MapAction::Todo(args) => {
            let inputs = Inputs::load(&args)?;
            let form: TodoForm = read_json(&args.form)?;
            print_json(&todo_to_erp(&form, &inputs.ctx(), &PlainChecklist)?)
        }
        MapAction::Quotation(args) => {
            let inputs = Inputs::load(&args)?;
            let form: QuotationForm = read_json(&args.form)?;
            print_json(&quotation_to_erp(&form, &inputs.ctx())?)
        }
    }
}
