//! Domain types and pure decision logic for the listing editor wizard.
//!
//! Nothing in this crate performs I/O. The controller in `listflow-wizard`
//! feeds it the current URL state and a gateway result, and executes the
//! [`navigation::NavigationAction`] values it returns.

pub mod config;
pub mod error;
pub mod flow;
pub mod listing;
pub mod navigation;
pub mod routes;
pub mod step;
pub mod tabs;
pub mod types;
