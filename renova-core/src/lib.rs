//! Core engine for the renova waste pickup tracker: reduces a raw municipal
//! calendar feed into per-category "next pickup" facts and keeps the exposed
//! capability set in sync across refreshes.

/// Joins between the reduced calendar, fraction metadata, and settings.
pub mod aggregate;
/// Reconciliation of the exposed capability set.
pub mod capability;
/// Keyword classification of fraction names.
pub mod classify;
/// Domain models and identifiers shared by all components.
pub mod model;
/// Traits describing the feed interfaces.
pub mod ports;
/// Reduction of the raw calendar feed.
pub mod reduce;
/// Refresh-cycle orchestration.
pub mod service;
/// Countdown and list formatting.
pub mod text;

pub use aggregate::*;
pub use capability::*;
pub use classify::*;
pub use model::*;
pub use ports::*;
pub use reduce::*;
pub use service::*;
pub use text::*;
