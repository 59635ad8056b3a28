//! Agent configuration from a TOML file with environment overrides.

use std::collections::BTreeMap;

use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use renova_core::model::{CategorySettings, WasteCategory};
use renova_core::reduce::ReducePolicy;
use renova_core::text::Locale;
use renova_provider_norkart::{NorkartAddress, NorkartConfig};

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct Config {
    pub api: ApiConfig,
    pub address: AddressConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    /// Explicit per-category switches; anything not listed stays enabled.
    #[serde(default)]
    pub categories: BTreeMap<WasteCategory, bool>,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub app_key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct AddressConfig {
    pub county_id: String,
    pub street_name: String,
    pub street_code: String,
    pub house_number: String,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct ScheduleConfig {
    #[serde(default = "default_hour")]
    pub hour: u32,
    #[serde(default)]
    pub minute: u32,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            hour: default_hour(),
            minute: 0,
            timezone: default_timezone(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub(crate) struct DisplayConfig {
    #[serde(default)]
    pub locale: Locale,
    /// Keep past dates in the reduction instead of discarding them.
    #[serde(default)]
    pub include_past: bool,
}

fn default_base_url() -> String {
    "https://komteksky.norkart.no/komtek.renovasjonwebapi/api".to_owned()
}

fn default_hour() -> u32 {
    3
}

fn default_timezone() -> String {
    "Europe/Oslo".to_owned()
}

impl Config {
    /// Load from the given file, falling back to `renova.toml` in the
    /// working directory, with `RENOVA_`-prefixed environment overrides on
    /// top.
    pub(crate) fn load(path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = match path {
            Some(path) => builder.add_source(File::with_name(&path)),
            None => builder.add_source(File::with_name("renova").required(false)),
        };

        builder
            .add_source(Environment::with_prefix("RENOVA").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// The per-category switches as the engine consumes them.
    pub(crate) fn settings(&self) -> CategorySettings {
        self.categories
            .iter()
            .map(|(&category, &enabled)| (category, enabled))
            .collect()
    }

    /// Reduction policy derived from the display section.
    pub(crate) fn policy(&self) -> ReducePolicy {
        if self.display.include_past {
            ReducePolicy::IncludePast
        } else {
            ReducePolicy::FutureOnly
        }
    }

    /// Connection settings for the Norkart provider.
    pub(crate) fn norkart(&self) -> NorkartConfig {
        NorkartConfig {
            base_url: self.api.base_url.clone(),
            app_key: self.api.app_key.clone(),
            address: NorkartAddress {
                county_id: self.address.county_id.clone(),
                street_name: self.address.street_name.clone(),
                street_code: self.address.street_code.clone(),
                house_number: self.address.house_number.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn parse(raw: &str) -> Config {
        ConfigBuilder::builder()
            .add_source(File::from_str(raw, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn minimal_config_fills_in_defaults() {
        let config = parse(
            r#"
            [api]
            app_key = "secret"

            [address]
            county_id = "0301"
            street_name = "Testveien"
            street_code = "12345"
            house_number = "7B"
            "#,
        );

        assert_eq!(config.schedule.hour, 3);
        assert_eq!(config.schedule.minute, 0);
        assert_eq!(config.schedule.timezone, "Europe/Oslo");
        assert_eq!(config.display.locale, Locale::No);
        assert_eq!(config.policy(), ReducePolicy::FutureOnly);
        assert!(config.settings().is_enabled(WasteCategory::Garden));
    }

    #[test]
    fn category_switches_flow_into_settings() {
        let config = parse(
            r#"
            [api]
            app_key = "secret"

            [address]
            county_id = "0301"
            street_name = "Testveien"
            street_code = "12345"
            house_number = "7B"

            [display]
            locale = "en"
            include_past = true

            [categories]
            garden = false
            paper = true
            "#,
        );

        let settings = config.settings();
        assert!(!settings.is_enabled(WasteCategory::Garden));
        assert!(settings.is_enabled(WasteCategory::Paper));
        assert!(settings.is_enabled(WasteCategory::General), "unlisted stays enabled");
        assert_eq!(config.display.locale, Locale::En);
        assert_eq!(config.policy(), ReducePolicy::IncludePast);
    }
}
