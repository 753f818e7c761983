//! Headless front end for SunSafe: view state, fetch service, dial and renderers.

pub mod app_services;
pub mod controller;
pub mod dial;
pub mod error_mapping;
pub mod render;
pub mod services;
pub mod state;

pub use app_services::AppServices;
pub use controller::Controller;
pub use state::{AppState, Effect, Event, Tab, ViewState};
