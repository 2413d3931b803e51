//! Registry configuration.

use std::fmt;
use std::time::Duration;

use aifn_engine::{OutputConverter, SchedulerHandle, default_converter};
use serde::{Deserialize, Serialize};

/// Runtime configuration of an [`AiFunctions`](crate::AiFunctions) registry.
#[derive(Clone)]
pub struct RegistryConfig {
    convert_output: Option<OutputConverter>,
    auto_coerce: bool,
    scheduler: Option<SchedulerHandle>,
    bridge_timeout: Option<Duration>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            convert_output: Some(default_converter()),
            auto_coerce: true,
            scheduler: None,
            bridge_timeout: None,
        }
    }
}

impl fmt::Debug for RegistryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryConfig")
            .field("convert_output", &self.convert_output.is_some())
            .field("auto_coerce", &self.auto_coerce)
            .field("scheduler", &self.scheduler)
            .field("bridge_timeout", &self.bridge_timeout)
            .finish()
    }
}

impl RegistryConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the output converter; `None` returns raw values.
    #[must_use]
    pub fn with_convert_output(mut self, converter: Option<OutputConverter>) -> Self {
        self.convert_output = converter;
        self
    }

    /// Enables or disables argument coercion.
    #[must_use]
    pub fn with_auto_coerce(mut self, enabled: bool) -> Self {
        self.auto_coerce = enabled;
        self
    }

    /// Sets the default scheduler for asynchronous functions.
    #[must_use]
    pub fn with_scheduler(mut self, scheduler: SchedulerHandle) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Bounds how long a synchronous call into the scheduler may block.
    #[must_use]
    pub fn with_bridge_timeout(mut self, timeout: Duration) -> Self {
        self.bridge_timeout = Some(timeout);
        self
    }

    /// Configured output converter.
    #[must_use]
    pub fn convert_output(&self) -> Option<&OutputConverter> {
        self.convert_output.as_ref()
    }

    /// Whether arguments are coerced.
    #[must_use]
    pub fn auto_coerce(&self) -> bool {
        self.auto_coerce
    }

    /// Default scheduler.
    #[must_use]
    pub fn scheduler(&self) -> Option<&SchedulerHandle> {
        self.scheduler.as_ref()
    }

    /// Bridge timeout.
    #[must_use]
    pub fn bridge_timeout(&self) -> Option<Duration> {
        self.bridge_timeout
    }

    pub(crate) fn set_convert_output(&mut self, converter: Option<OutputConverter>) {
        self.convert_output = converter;
    }

    pub(crate) fn set_scheduler(&mut self, scheduler: Option<SchedulerHandle>) {
        self.scheduler = scheduler;
    }
}

/// Plain-data settings that can be loaded from JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistrySettings {
    /// Coerce arguments to declared types.
    pub auto_coerce: bool,
    /// Convert results to strings with the default converter.
    pub convert_output: bool,
    /// Bridge timeout in milliseconds; absent waits indefinitely.
    pub bridge_timeout_ms: Option<u64>,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            auto_coerce: true,
            convert_output: true,
            bridge_timeout_ms: None,
        }
    }
}

impl RegistrySettings {
    /// Parses settings from JSON text. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns the decoder error for malformed text or unknown fields.
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

impl From<RegistrySettings> for RegistryConfig {
    fn from(settings: RegistrySettings) -> Self {
        let converter = settings.convert_output.then(default_converter);
        let config = RegistryConfig::new()
            .with_convert_output(converter)
            .with_auto_coerce(settings.auto_coerce);
        match settings.bridge_timeout_ms {
            Some(millis) => config.with_bridge_timeout(Duration::from_millis(millis)),
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_convert_and_coerce() {
        let config = RegistryConfig::default();
        assert!(config.convert_output().is_some());
        assert!(config.auto_coerce());
        assert!(config.scheduler().is_none());
        assert_eq!(config.bridge_timeout(), None);
    }

    #[test]
    fn settings_fill_missing_fields() {
        let settings = RegistrySettings::from_json_str(r#"{"bridge_timeout_ms": 250}"#).unwrap();
        assert_eq!(
            settings,
            RegistrySettings {
                auto_coerce: true,
                convert_output: true,
                bridge_timeout_ms: Some(250),
            }
        );

        let config = RegistryConfig::from(settings);
        assert_eq!(config.bridge_timeout(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn settings_can_disable_conversion() {
        let text = r#"{"convert_output": false, "auto_coerce": false}"#;
        let settings = RegistrySettings::from_json_str(text).unwrap();
        let config = RegistryConfig::from(settings);
        assert!(config.convert_output().is_none());
        assert!(!config.auto_coerce());
    }

    #[test]
    fn settings_reject_unknown_fields() {
        assert!(RegistrySettings::from_json_str(r#"{"loop": true}"#).is_err());
    }
}
