//! Traits describing the feed interfaces host collaborators implement.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;

use crate::model::{CalendarEntry, FractionDefinition};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to a feed backend.
///
/// Date strings are passed through raw; parse failures surface later as
/// [`crate::MalformedDateError`] during reduction.
pub enum PortError {
    /// Network layer failed.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// The backend rejected the configured address.
    #[error("Address rejected by provider")]
    AddressRejected,
    /// Internal provider error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[async_trait]
/// Source of the fraction registry for the tracked address.
pub trait FractionPort: Send + Sync {
    /// Fetch all fraction definitions.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the backend request fails.
    async fn fractions(&self) -> Result<Vec<FractionDefinition>, PortError>;
}

#[async_trait]
/// Source of the raw pickup calendar for the tracked address.
pub trait CalendarPort: Send + Sync {
    /// Fetch the raw calendar feed.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the backend request fails.
    async fn calendar(&self) -> Result<Vec<CalendarEntry>, PortError>;
}
