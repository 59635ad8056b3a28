//! Feed provider for the Norwegian MinRenovasjon service (Norkart API).
//!
//! Supplies the fraction registry and the pickup calendar for one configured
//! address. Every request carries the municipality number and the app key as
//! headers, the way the upstream mobile app authenticates.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use renova_core::{
    model::{CalendarEntry, FractionDefinition, FractionId},
    ports::{CalendarPort, FractionPort, PortError},
    service::RenovaService,
};

const COUNTY_HEADER: &str = "Kommunenr";
const APP_KEY_HEADER: &str = "RenovasjonAppKey";

#[derive(Debug, Clone)]
/// Address the calendar is requested for, in upstream vocabulary.
pub struct NorkartAddress {
    /// Municipality number ("kommunenr").
    pub county_id: String,
    /// Street name ("gatenavn").
    pub street_name: String,
    /// Street code ("gatekode").
    pub street_code: String,
    /// House number including letter additions ("husnr").
    pub house_number: String,
}

#[derive(Debug, Clone)]
/// Connection settings for the Norkart backend.
pub struct NorkartConfig {
    /// Base URL of the proxy API, without a trailing slash.
    pub base_url: String,
    /// Application key sent with every request.
    pub app_key: String,
    /// The tracked address.
    pub address: NorkartAddress,
}

/// Fraction registry entry as returned by `/fraksjoner`.
#[derive(Debug, Deserialize)]
struct FraksjonRecord {
    #[serde(rename = "Id")]
    id: i64,
    #[serde(rename = "Navn")]
    name: String,
}

impl From<FraksjonRecord> for FractionDefinition {
    fn from(record: FraksjonRecord) -> Self {
        FractionDefinition {
            id: FractionId(record.id),
            name: record.name,
        }
    }
}

/// Calendar record as returned by `/tommekalender`.
#[derive(Debug, Deserialize)]
struct TommekalenderRecord {
    #[serde(rename = "FraksjonId")]
    fraction_id: i64,
    #[serde(rename = "Tommedatoer")]
    pickup_dates: Vec<String>,
}

impl From<TommekalenderRecord> for CalendarEntry {
    fn from(record: TommekalenderRecord) -> Self {
        CalendarEntry {
            fraction_id: FractionId(record.fraction_id),
            pickup_dates: record.pickup_dates,
        }
    }
}

/// Fraction registry implementation against the Norkart backend.
pub struct NorkartFractionPort {
    client: Client,
    config: NorkartConfig,
}

impl NorkartFractionPort {
    /// Create a new fraction port bound to the given HTTP client.
    #[must_use]
    pub fn new(client: Client, config: NorkartConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl FractionPort for NorkartFractionPort {
    async fn fractions(&self) -> Result<Vec<FractionDefinition>, PortError> {
        let req = self
            .client
            .get(format!("{}/fraksjoner", self.config.base_url))
            .header(COUNTY_HEADER, &self.config.address.county_id)
            .header(APP_KEY_HEADER, &self.config.app_key);

        let records = fetch_json::<Vec<FraksjonRecord>>(req).await?;
        Ok(records.into_iter().map(Into::into).collect())
    }
}

/// Pickup calendar implementation against the Norkart backend.
pub struct NorkartCalendarPort {
    client: Client,
    config: NorkartConfig,
}

impl NorkartCalendarPort {
    /// Create a new calendar port bound to the given HTTP client.
    #[must_use]
    pub fn new(client: Client, config: NorkartConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl CalendarPort for NorkartCalendarPort {
    async fn calendar(&self) -> Result<Vec<CalendarEntry>, PortError> {
        let address = &self.config.address;

        let req = self
            .client
            .get(format!("{}/tommekalender", self.config.base_url))
            .query(&[
                ("kommunenr", address.county_id.as_str()),
                ("gatenavn", address.street_name.as_str()),
                ("gatekode", address.street_code.as_str()),
                ("husnr", address.house_number.as_str()),
            ])
            .header(COUNTY_HEADER, &address.county_id)
            .header(APP_KEY_HEADER, &self.config.app_key);

        let records = fetch_json::<Vec<TommekalenderRecord>>(req).await?;
        Ok(records.into_iter().map(Into::into).collect())
    }
}

/// Build a [`RenovaService`] wired to the Norkart ports.
#[must_use]
pub fn service(client: Client, config: NorkartConfig) -> RenovaService {
    let fraction_port = Arc::new(NorkartFractionPort::new(client.clone(), config.clone()));
    let calendar_port = Arc::new(NorkartCalendarPort::new(client, config));

    RenovaService::new(fraction_port, calendar_port)
}

// Small helper to fetch and decode JSON with status handling. The backend
// answers 400/404 when the address query does not resolve.
async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, PortError> {
    let response = req.send().await.map_err(PortError::from)?;

    if matches!(
        response.status(),
        StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND
    ) {
        return Err(PortError::AddressRejected);
    }

    response
        .error_for_status()
        .map_err(PortError::from)?
        .json()
        .await
        .map_err(PortError::from)
}
