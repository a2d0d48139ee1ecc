use async_trait::async_trait;
use clap::Subcommand;
use erpcal_core::mapper::{calendar_event_from_erp, ErpEvent};
use erpcal_core::visit::{submit_visit_location, visit_state, Coordinates, EventSaver, Geolocator};
use erpcal_core::{CalendarEvent, Config, CurrentUser, GeolocationError};
use serde::Serialize;

use crate::input::{print_json, read_json};

#[derive(Subcommand)]
pub enum VisitAction {
    /// Visit state of an ERP event for a user
    State {
        /// ERP Event JSON or @path
        #[arg(long)]
        event: String,
        /// Current user JSON or @path
        #[arg(long)]
        user: String,
    },
    /// Record a position on a visit and print the document to save
    Submit {
        /// ERP Event JSON or @path
        #[arg(long)]
        event: String,
        /// Current user JSON or @path
        #[arg(long)]
        user: String,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        long: f64,
    },
}

#[derive(Serialize)]
struct StateReport {
    state: erpcal_core::VisitState,
    #[serde(flatten)]
    flags: erpcal_core::VisitFlags,
}

/// Position given on the command line.
struct FixedPosition(Coordinates);

#[async_trait]
impl Geolocator for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Ok(self.0)
    }
}

/// "Saves" by printing the document to stdout.
struct PrintSaver;

#[async_trait]
impl EventSaver for PrintSaver {
    async fn save_event(
        &self,
        document: &ErpEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        println!("{}", serde_json::to_string_pretty(document)?);
        Ok(())
    }
}

pub async fn run(action: VisitAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        VisitAction::State { event, user } => {
            let node: ErpEvent = read_json(&event)?;
            let user: CurrentUser = read_json(&user)?;
            let state = visit_state(&calendar_event_from_erp(&node), &user.id);
            print_json(&StateReport {
                state,
                flags: state.flags(),
            })
        }
        VisitAction::Submit {
            event,
            user,
            lat,
            long,
        } => {
            let config = Config::load()?;
            let node: ErpEvent = read_json(&event)?;
            let user: CurrentUser = read_json(&user)?;
            let event = calendar_event_from_erp(&node);
            let position = Coordinates {
                latitude: lat,
                longitude: long,
            };

            let mut store: Vec<CalendarEvent> = vec![event.clone()];
            submit_visit_location(
                &event,
                &user,
                &FixedPosition(position),
                &PrintSaver,
                &mut store,
                config.geolocation_timeout(),
            )
            .await?;
            Ok(())
        }
    }
}
