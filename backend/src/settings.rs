//! Server configuration loaded via OrthoConfig.
//!
//! Values come from `CAROUSEL_*` environment variables, command-line flags or
//! a config file; unset values fall back to the defaults below. Session
//! cookie toggles are separate, see
//! [`session_config`](crate::inbound::http::session_config).

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The bind address is not `host:port`.
    #[error("invalid bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// A zero session lifetime would expire sessions on creation.
    #[error("session TTL must be positive")]
    ZeroSessionTtl,
}

/// Process-level settings for the carousel backend.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CAROUSEL")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; without one the server keeps everything in memory.
    pub database_url: Option<String>,
    /// Session lifetime in seconds.
    #[ortho_config(default = 7200)]
    pub session_ttl_secs: u64,
    /// bcrypt work factor for new password hashes.
    #[ortho_config(default = 10)]
    pub bcrypt_cost: u32,
}

impl ServerSettings {
    /// The configured listen address, or `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBindAddr`] for an unparsable address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|source| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                source,
            })
    }

    /// Session lifetime, two hours unless configured.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ZeroSessionTtl`] when set to zero.
    pub fn session_ttl(&self) -> Result<std::time::Duration, SettingsError> {
        match self.session_ttl_secs {
            0 => Err(SettingsError::ZeroSessionTtl),
            secs => Ok(std::time::Duration::from_secs(secs)),
        }
    }

    /// bcrypt work factor, 10 unless configured.
    pub const fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref().filter(|url| !url.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use super::*;
    use std::ffi::OsString;

    use crate::outbound::bcrypt_hasher::DEFAULT_BCRYPT_COST;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 4] = [
        "CAROUSEL_BIND_ADDR",
        "CAROUSEL_DATABASE_URL",
        "CAROUSEL_SESSION_TTL_SECS",
        "CAROUSEL_BCRYPT_COST",
    ];

    const DEFAULT_SESSION_TTL_SECS: u64 = 2 * 60 * 60;

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("carousel-backend")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default addr"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("valid")
        );
        assert_eq!(settings.database_url(), None);
        assert_eq!(
            settings.session_ttl().expect("default ttl").as_secs(),
            DEFAULT_SESSION_TTL_SECS
        );
        assert_eq!(settings.bcrypt_cost(), DEFAULT_BCRYPT_COST);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("CAROUSEL_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "CAROUSEL_DATABASE_URL",
                Some("postgres://localhost/carousels".to_owned()),
            ),
            ("CAROUSEL_SESSION_TTL_SECS", Some("60".to_owned())),
            ("CAROUSEL_BCRYPT_COST", Some("4".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("addr").to_string(),
            "127.0.0.1:9000"
        );
        assert_eq!(
            settings.database_url(),
            Some("postgres://localhost/carousels")
        );
        assert_eq!(settings.session_ttl().expect("ttl").as_secs(), 60);
        assert_eq!(settings.bcrypt_cost(), 4);
    }

    #[rstest]
    fn invalid_values_are_reported() {
        let settings = ServerSettings {
            bind_addr: Some("not an address".to_owned()),
            database_url: Some("   ".to_owned()),
            session_ttl_secs: 0,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        };

        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::InvalidBindAddr { .. })
        ));
        assert!(matches!(
            settings.session_ttl(),
            Err(SettingsError::ZeroSessionTtl)
        ));
        assert_eq!(settings.database_url(), None);
    }
}
