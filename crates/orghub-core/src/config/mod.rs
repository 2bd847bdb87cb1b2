//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod authorization_server;
pub mod database;
pub mod identity;
pub mod logging;
pub mod organizations;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::authorization_server::AuthorizationServerConfig;
pub use self::database::DatabaseConfig;
pub use self::identity::IdentityConfig;
pub use self::logging::LoggingConfig;
pub use self::organizations::{OrganizationsConfig, ReinvitePolicy};

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay) and
/// `ORGHUB__*` environment variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Identity provider settings.
    #[serde(default)]
    pub identity: IdentityConfig,
    /// Authorization server settings.
    #[serde(default)]
    pub authorization_server: AuthorizationServerConfig,
    /// Organization policy settings.
    #[serde(default)]
    pub organizations: OrganizationsConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `ORGHUB__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("ORGHUB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_source_uses_defaults() {
        let config: AppConfig = config::Config::builder()
            .build()
            .and_then(|c| c.try_deserialize())
            .expect("defaults should deserialize");

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.identity.session_cookie_name, "ory_kratos_session");
        assert_eq!(config.organizations.reinvite_policy, ReinvitePolicy::UpdateRole);
        assert!(config.identity.webhook_api_key.is_none());
    }

    #[test]
    fn test_overrides_are_applied() {
        let config: AppConfig = config::Config::builder()
            .set_override("identity.session_timeout_ms", 1500_i64)
            .and_then(|b| b.set_override("organizations.reinvite_policy", "reject"))
            .and_then(|b| b.build())
            .and_then(|c| c.try_deserialize())
            .expect("overrides should deserialize");

        assert_eq!(config.identity.session_timeout_ms, 1500);
        assert_eq!(config.organizations.reinvite_policy, ReinvitePolicy::Reject);
    }
}
