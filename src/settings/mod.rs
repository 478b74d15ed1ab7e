//! Settings persistence and editing.
//!
//! - [`store`]: JSON file beside the executable or in app-data
//! - [`startup`]: run-at-startup registration seam
//! - [`form`]: control values of the settings dialog, preview and validation

pub mod form;
pub mod startup;
pub mod store;

pub use form::{FormError, NumericField, SettingsForm};
pub use startup::{startup_command, sync_startup, InMemoryStartup, StartupError, StartupRegistration};
pub use store::{app_data_dir, SettingsError, SettingsStore};
