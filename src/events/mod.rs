//! Event system for decoupled inter-module communication.
//!
//! The tray menu and the settings dialog have their own window procedures
//! and must not reach into the overlay controller while it may already be
//! borrowed. They publish [`AppEvent`]s instead, then post a wake-up message
//! to the overlay window, which drains the bus.
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐
//! │    Tray     │     │  Settings   │
//! │    menu     │     │   dialog    │
//! └──────┬──────┘     └──────┬──────┘
//!        │ publish()         │ publish()
//!        ▼                   ▼
//! ┌─────────────────────────────────────┐
//! │              EventBus               │
//! │            (mpsc channel)           │
//! └──────────────────┬──────────────────┘
//!                    │ drain()
//!                    ▼
//! ┌─────────────────────────────────────┐
//! │      Overlay window procedure       │
//! └─────────────────────────────────────┘
//! ```
//!
//! - [`types`]: Event definitions (`AppEvent` enum)
//! - [`bus`]: `EventBus` and `EventPublisher` types

pub mod bus;
pub mod types;

pub use bus::{EventBus, EventPublisher};
pub use types::AppEvent;
