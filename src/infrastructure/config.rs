use crate::domain::summary::Thresholds;
use crate::domain::timeline::{AlignOptions, DEFAULT_BASELINE, DEFAULT_TARGET};
use chrono_tz::Tz;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub endpoints: EndpointSettings,
    pub storage: StorageSettings,
    #[serde(default)]
    pub assistant: AssistantSettings,
    #[serde(default)]
    pub timeline: TimelineSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

/// URL templates; `${user}` is replaced with the url-encoded user id.
#[derive(Debug, Deserialize, Clone)]
pub struct EndpointSettings {
    pub data_url: String,
    pub medications_url: String,
    pub foods_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub bucket_url: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AssistantSettings {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TimelineSettings {
    /// IANA zone name, e.g. "Europe/Berlin"; days and hour labels follow its DST rules
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    #[serde(default = "default_target")]
    pub target: i32,
    /// Placeholder glucose for events earlier than the first reading of the day
    #[serde(default = "default_baseline")]
    pub baseline: i32,
    #[serde(default = "default_range_low")]
    pub range_low: i32,
    #[serde(default = "default_range_high")]
    pub range_high: i32,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            time_zone: default_time_zone(),
            target: default_target(),
            baseline: default_baseline(),
            range_low: default_range_low(),
            range_high: default_range_high(),
        }
    }
}

fn default_time_zone() -> String {
    "UTC".to_string()
}

fn default_target() -> i32 {
    DEFAULT_TARGET
}

fn default_baseline() -> i32 {
    DEFAULT_BASELINE
}

fn default_range_low() -> i32 {
    Thresholds::default().low
}

fn default_range_high() -> i32 {
    Thresholds::default().high
}

impl TimelineSettings {
    pub fn align_options(&self) -> anyhow::Result<AlignOptions> {
        let zone: Tz = self
            .time_zone
            .parse()
            .map_err(|_| anyhow::anyhow!("unknown time_zone {:?}", self.time_zone))?;

        Ok(AlignOptions {
            zone,
            target: self.target,
            baseline: self.baseline,
        })
    }

    pub fn thresholds(&self) -> anyhow::Result<Thresholds> {
        if self.range_low >= self.range_high {
            anyhow::bail!(
                "range_low ({}) must be below range_high ({})",
                self.range_low,
                self.range_high
            );
        }
        Ok(Thresholds {
            low: self.range_low,
            high: self.range_high,
        })
    }
}

/// Load `config/service.toml`, overridable with `GLUCO__SECTION__KEY` variables.
pub fn load_service_config() -> anyhow::Result<ServiceConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/service"))
        .add_source(config::Environment::with_prefix("GLUCO").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Replace `${name}` placeholders in a URL template with url-encoded values
pub fn expand_template(template: &str, vars: &HashMap<String, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, &urlencoding::encode(value));
    }
    result
}
