//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. Environment variables (EARTHCARE_ACCESS_*, BILLING_API_*)
//! 2. Configuration file (TOML)
//! 3. Default values

use crate::config::types::AppConfig;
use crate::error::ConfigError;
use crate::util::SecretString;
use config::{Config, Environment, File, FileFormat};
use std::path::Path;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "earthcare-access.toml",
    ".earthcare-access.toml",
    "~/.config/earthcare-access/config.toml",
    "/etc/earthcare-access/config.toml",
];

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. Start with defaults (handled by serde defaults on AppConfig)

    // 2. Add configuration file
    if let Some(path) = config_path {
        // Explicit path provided - must exist
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        // Try default paths (first existing one wins)
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    // 3. Add environment variables with EARTHCARE_ACCESS_ prefix
    // e.g., EARTHCARE_ACCESS__SERVER__PORT, EARTHCARE_ACCESS__NAVIGATION__CRM_LINK
    builder = builder.add_source(
        Environment::with_prefix("EARTHCARE_ACCESS")
            .separator("__")
            .try_parsing(true),
    );

    // 4. Conventional billing variables shared with the rest of the platform
    if let Some(token) = SecretString::from_env("BILLING_API_TOKEN") {
        builder = builder
            .set_override("billing.token", token.expose_secret())
            .map_err(|e| ConfigError::Load(e.to_string()))?;
    }
    if let Ok(url) = std::env::var("BILLING_API_URL") {
        builder = builder
            .set_override("billing.url", url)
            .map_err(|e| ConfigError::Load(e.to_string()))?;
    }

    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate configuration values
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.billing.url.is_empty() {
        return Err(ConfigError::Missing {
            field: "billing.url".to_string(),
        });
    }

    if !config.billing.url.starts_with("http://") && !config.billing.url.starts_with("https://")
    {
        return Err(ConfigError::Invalid {
            message: format!(
                "billing.url must start with http:// or https://, got: {}",
                config.billing.url
            ),
        });
    }

    if config.billing.timeout_secs == 0 {
        return Err(ConfigError::Invalid {
            message: "billing.timeout_secs must be greater than 0".to_string(),
        });
    }

    if config.cache.max_entries == 0 {
        return Err(ConfigError::Invalid {
            message: "cache.max_entries must be greater than 0".to_string(),
        });
    }

    if config.server.port == 0 {
        return Err(ConfigError::Invalid {
            message: "server.port must be greater than 0".to_string(),
        });
    }

    validate_route_patterns(config)?;

    Ok(())
}

/// Validate that all route patterns are valid regex
fn validate_route_patterns(config: &AppConfig) -> Result<(), ConfigError> {
    for (index, rule) in config.routes.rules.iter().enumerate() {
        if let Err(e) = regex::Regex::new(&rule.pattern) {
            return Err(ConfigError::InvalidPattern {
                pattern: rule.pattern.clone(),
                reason: format!("in routes.rules[{}]: {}", index, e),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{AudienceRule, RouteRuleConfig};
    use crate::navigation::Section;

    #[test]
    fn test_load_config_from_str_basic() {
        let toml = r#"
[server]
port = 9100

[billing]
url = "https://billing.example.org"
token = "svc-token"

[navigation]
crm_link = "authenticated"
"#;

        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.billing.url, "https://billing.example.org");
        assert_eq!(
            config.billing.token.as_ref().map(|t| t.expose_secret()),
            Some("svc-token")
        );
        assert_eq!(config.navigation.crm_link, AudienceRule::Authenticated);
        assert_eq!(config.navigation.member_menu, AudienceRule::RoleGated);
    }

    #[test]
    fn test_invalid_url_error() {
        let toml = r#"
[billing]
url = "not-a-url"
"#;
        assert!(load_config_from_str(toml).is_err());
    }

    #[test]
    fn test_empty_url_error() {
        let toml = r#"
[billing]
url = ""
"#;
        assert!(matches!(
            load_config_from_str(toml),
            Err(ConfigError::Missing { .. })
        ));
    }

    #[test]
    fn test_invalid_route_pattern() {
        let mut config = AppConfig::default();
        config
            .routes
            .rules
            .push(RouteRuleConfig::new("[invalid", Section::Public));

        let result = validate_config(&config);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidPattern { .. }
        ));
    }

    #[test]
    fn test_route_rules_replace_defaults() {
        let toml = r#"
[[routes.rules]]
pattern = "^/crm"
section = "crm"
required_plan = "crm_pro"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.routes.rules.len(), 1);
        assert_eq!(config.routes.rules[0].section, Section::Crm);
        assert_eq!(
            config.routes.rules[0].required_plan,
            Some(crate::access::PlanType::CrmPro)
        );
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let toml = r#"
[billing]
timeout_secs = 0
"#;
        assert!(matches!(
            load_config_from_str(toml),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_cache_settings() {
        let toml = r#"
[cache]
ttl_secs = 60
max_entries = 500
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.cache.max_entries, 500);

        let toml = r#"
[cache]
max_entries = 0
"#;
        assert!(matches!(
            load_config_from_str(toml),
            Err(ConfigError::Invalid { .. })
        ));
    }
}
