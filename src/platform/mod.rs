//! Platform-specific implementations.
//!
//! Only Windows has virtual desktops the overlay can follow; the rest of the
//! crate is platform independent and reaches the OS through the traits in
//! [`crate::overlay::surface`], [`crate::desktop::registry`],
//! [`crate::settings::startup`] and [`crate::model::theme`].

#[cfg(target_os = "windows")]
pub mod windows;
