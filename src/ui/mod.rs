//! The terminal dashboard: a single client over the log service.
pub mod action;
pub mod event;
pub mod grouping;
pub mod log_entry;
pub mod mode;
pub mod runner;
pub mod state;
mod terminal;

pub use action::UIAction;
pub use event::{Mutation, UIEvent};
pub use log_entry::DiagnosticLine;
pub use mode::GroupMode;
pub use runner::run_dashboard;
pub use state::DashboardState;
pub use terminal::TerminalUI;
