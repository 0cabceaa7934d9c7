//! Listing editor wizard controller.
//!
//! - [`WizardController`]: runs the completion handler for each step:
//!   create or update through the [`PersistenceGateway`], then publish or
//!   move to the next tab.
//! - [`resolver`]: maps the URL tab to its panel and the props it gets.
//! - [`Navigator`]: applies the controller's navigation decisions to
//!   browser history.
//! - [`memory`]: in-memory collaborators for the demo binary and tests.

pub mod controller;
pub mod error;
pub mod gateway;
pub mod memory;
pub mod navigator;
pub mod resolver;

pub use controller::{SubmitOutcome, WizardController, WizardServices, WizardSnapshot};
pub use error::{ErrorBag, WizardError, WizardOperation};
pub use gateway::{AvailabilityHandler, HistorySink, ImageHandler, PersistenceGateway, ScrollHook};
pub use navigator::{HistoryMutation, Navigator};
pub use resolver::{Panel, PanelExtras, PanelProps, TabResolution};
