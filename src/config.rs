//! Configuration management for the Elidune portal core

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::models::notification::NotificationKind;

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

/// Toast lifecycle timings, all in milliseconds.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ToastConfig {
    /// Delay from show until the glyph starts moving to the anchor
    pub center_delay_ms: u64,
    /// Delay from show until the glyph morphs into the message pill
    pub expand_delay_ms: u64,
    pub fade_out_ms: u64,
    pub success_ms: u64,
    pub info_ms: u64,
    pub warning_ms: u64,
    /// 0 keeps errors on screen until dismissed
    pub error_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ParticleConfig {
    pub duration_ms: u64,
    /// Upward offset of the trajectory midpoint, in pixels
    pub arc_height: f64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FeedbackConfig {
    pub toast: ToastConfig,
    pub particles: ParticleConfig,
    pub frame_interval_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NavigationConfig {
    /// Origin the portal is served from; links elsewhere are never guarded
    pub origin: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub feedback: FeedbackConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Environment variables, e.g. ELIDUNE_PORTAL_API__TIMEOUT_SECS
            .add_source(
                Environment::with_prefix("ELIDUNE_PORTAL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("api.base_url", env::var("API_BASE_URL").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl ToastConfig {
    /// Default auto-dismiss delay for a notification kind
    pub fn auto_dismiss_for(&self, kind: NotificationKind) -> u64 {
        match kind {
            NotificationKind::Success => self.success_ms,
            NotificationKind::Info => self.info_ms,
            NotificationKind::Warning => self.warning_ms,
            NotificationKind::Error => self.error_ms,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            logging: LoggingConfig::default(),
            feedback: FeedbackConfig::default(),
            navigation: NavigationConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api/v1".to_string(),
            timeout_secs: 15,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            center_delay_ms: 60,
            expand_delay_ms: 900,
            fade_out_ms: 500,
            success_ms: 3000,
            info_ms: 3000,
            warning_ms: 5000,
            error_ms: 0,
        }
    }
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            duration_ms: 650,
            arc_height: 80.0,
        }
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            toast: ToastConfig::default(),
            particles: ParticleConfig::default(),
            frame_interval_ms: 16,
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:3000".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_error_toasts_stay_until_dismissed() {
        let toast = ToastConfig::default();
        assert_eq!(toast.auto_dismiss_for(NotificationKind::Error), 0);
        assert_eq!(toast.auto_dismiss_for(NotificationKind::Warning), 5000);
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(
                r#"
                [api]
                base_url = "https://library.example.org/api/v1"
                timeout_secs = 5

                [logging]
                level = "debug"
                format = "json"

                [feedback.particles]
                duration_ms = 400
                arc_height = 40.0
                "#,
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.feedback.particles.duration_ms, 400);
        assert_eq!(config.feedback.toast.expand_delay_ms, 900);
        assert_eq!(config.feedback.frame_interval_ms, 16);
        assert_eq!(config.navigation.origin, "http://localhost:3000");
    }
}
