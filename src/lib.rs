pub mod action;
pub mod base;
pub mod behaviors;
pub mod budget;
pub mod config;
pub mod constants;
pub mod context;
pub mod controller;
pub mod error;
pub mod evasion;
pub mod location;
pub mod pathing;
pub mod queue_builder;
pub mod reservation;
pub mod roles;
pub mod snapshot;
pub mod targeting;
pub mod terrain;
pub mod unit;

pub use action::{Action, ActionQueue};
pub use base::{Base, BaseId};
pub use config::ControllerConfig;
pub use controller::{Controller, ControllerBuilder};
pub use error::PlanError;
pub use location::{Direction, Location};
pub use snapshot::{BaseCommand, TurnOutput, WorldSnapshot};
pub use terrain::{Grid, ResourceFlags};
pub use unit::{ResourceKind, Unit, UnitId, UnitType};
