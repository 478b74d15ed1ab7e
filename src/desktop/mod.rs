//! Active virtual desktop detection.
//!
//! Best effort against an undocumented OS surface: every failure collapses
//! into the fallback name, nothing is propagated.

pub mod poller;
pub mod registry;
pub mod resolve;

pub use poller::DesktopPoller;
pub use registry::{MemoryRegistry, RegistryReader};
pub use resolve::{current_desktop, desktop_index, desktop_name, format_guid};
