//! Application core.
//!
//! The [`Application`] is the single ownership root of the run: it holds the
//! window, renderer and input collaborators, the layer stack with the UI
//! overlay, and the `Running`/`Minimized` flags. Platform events enter through
//! [`Application::on_event`] (or re-entrantly from `Window::service`) and each
//! [`Application::run_frame`] performs one scheduler iteration.

mod application;
mod config;
mod instance;

pub use application::Application;
pub use config::AppConfig;
pub use instance::application_exists;
