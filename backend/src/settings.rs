//! Application configuration loaded via OrthoConfig.
//!
//! Values come from command-line flags, `USERS_*` environment variables and
//! an optional configuration file. `main` loads a `.env` file into the
//! environment first, then fills anything still unset from the unprefixed
//! deployment keys (`DB_USER`, `PASSWORD`, `APP_HOST`, `NO_SQL`, ...) via
//! [`AppSettings::with_legacy_env`].

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::ports::StorePermissions;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_DB_USER: &str = "postgres";
const DEFAULT_DB_NAME: &str = "postgres";
const DEFAULT_REDIS_PORT: u16 = 6379;
const DEFAULT_APP_PORT: u16 = 8080;

/// Errors raised while deriving connection targets from settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// A host, user or database name could not form a valid URL.
    #[error("invalid {target} connection settings: {message}")]
    InvalidUrl {
        /// Which connection the URL was for.
        target: &'static str,
        /// Parser or setter failure.
        message: String,
    },
    /// An unprefixed deployment key held a value of the wrong shape.
    #[error("invalid value {value:?} for {key}")]
    InvalidLegacyValue {
        /// Environment key as read.
        key: &'static str,
        /// Raw value.
        value: String,
    },
}

/// Process-wide settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USERS")]
pub struct AppSettings {
    /// PostgreSQL user.
    pub db_user: Option<String>,
    /// PostgreSQL password; empty when unset.
    pub db_password: Option<String>,
    /// PostgreSQL host.
    pub db_host: Option<String>,
    /// PostgreSQL port.
    pub db_port: Option<u16>,
    /// PostgreSQL database name.
    pub db_name: Option<String>,
    /// Redis host.
    pub redis_host: Option<String>,
    /// Redis port.
    pub redis_port: Option<u16>,
    /// HTTP bind host.
    pub host: Option<String>,
    /// HTTP bind port.
    pub port: Option<u16>,
    /// Use Redis instead of PostgreSQL.
    #[ortho_config(default = false)]
    pub no_sql: bool,
    /// Allow creating users.
    #[ortho_config(default = false)]
    pub create: bool,
    /// Allow reading and listing users.
    #[ortho_config(default = false)]
    pub read: bool,
    /// Allow updating users.
    #[ortho_config(default = false)]
    pub update: bool,
    /// Allow deleting users.
    #[ortho_config(default = false)]
    pub delete: bool,
}

fn invalid(target: &'static str, message: impl ToString) -> SettingsError {
    SettingsError::InvalidUrl {
        target,
        message: message.to_string(),
    }
}

fn legacy_port(key: &'static str, value: String) -> Result<u16, SettingsError> {
    value
        .trim()
        .parse()
        .map_err(|_| SettingsError::InvalidLegacyValue { key, value })
}

fn legacy_flag(key: &'static str, value: String) -> Result<bool, SettingsError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(SettingsError::InvalidLegacyValue { key, value }),
    }
}

impl AppSettings {
    /// Fill unset values from unprefixed deployment keys.
    ///
    /// `lookup` resolves a key to its value, normally `std::env::var`.
    /// Prefixed keys always win. Flags default to `false`, so a legacy key
    /// can switch one on but never off.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidLegacyValue`] for a port that is not
    /// a number or a flag that is not a boolean.
    pub fn with_legacy_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SettingsError> {
        let text = |slot: &mut Option<String>, key: &str| {
            if slot.is_none() {
                *slot = lookup(key);
            }
        };
        text(&mut self.db_user, "DB_USER");
        text(&mut self.db_password, "PASSWORD");
        text(&mut self.db_host, "DB_HOST");
        text(&mut self.db_name, "DB_NAME");
        text(&mut self.redis_host, "REDIS_HOST");
        text(&mut self.host, "APP_HOST");

        for (slot, key) in [
            (&mut self.db_port, "DB_PORT"),
            (&mut self.redis_port, "REDIS_PORT"),
            (&mut self.port, "APP_PORT"),
        ] {
            if slot.is_none() {
                if let Some(value) = lookup(key) {
                    *slot = Some(legacy_port(key, value)?);
                }
            }
        }

        for (slot, key) in [
            (&mut self.no_sql, "NO_SQL"),
            (&mut self.create, "CREATE"),
            (&mut self.read, "READ"),
            (&mut self.update, "UPDATE"),
            (&mut self.delete, "DELETE"),
        ] {
            if let Some(value) = lookup(key) {
                *slot |= legacy_flag(key, value)?;
            }
        }
        Ok(self)
    }

    /// PostgreSQL connection URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidUrl`] when the host, user or database
    /// name cannot be encoded.
    pub fn database_url(&self) -> Result<String, SettingsError> {
        const TARGET: &str = "database";
        let host = self.db_host.as_deref().unwrap_or(DEFAULT_HOST);
        let mut url = Url::parse(&format!("postgres://{host}")).map_err(|err| invalid(TARGET, err))?;
        url.set_port(Some(self.db_port.unwrap_or(DEFAULT_DB_PORT)))
            .map_err(|()| invalid(TARGET, "port cannot be set"))?;
        url.set_username(self.db_user.as_deref().unwrap_or(DEFAULT_DB_USER))
            .map_err(|()| invalid(TARGET, "user cannot be set"))?;
        let password = self.db_password.as_deref().filter(|value| !value.is_empty());
        url.set_password(password)
            .map_err(|()| invalid(TARGET, "password cannot be set"))?;
        url.set_path(&format!(
            "/{}",
            self.db_name.as_deref().unwrap_or(DEFAULT_DB_NAME)
        ));
        Ok(url.into())
    }

    /// Redis connection URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidUrl`] when the host is not valid.
    pub fn redis_url(&self) -> Result<String, SettingsError> {
        const TARGET: &str = "redis";
        let host = self.redis_host.as_deref().unwrap_or(DEFAULT_HOST);
        let mut url = Url::parse(&format!("redis://{host}")).map_err(|err| invalid(TARGET, err))?;
        url.set_port(Some(self.redis_port.unwrap_or(DEFAULT_REDIS_PORT)))
            .map_err(|()| invalid(TARGET, "port cannot be set"))?;
        Ok(url.into())
    }

    /// Address the HTTP server binds to.
    pub fn bind_target(&self) -> (String, u16) {
        (
            self.host.clone().unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            self.port.unwrap_or(DEFAULT_APP_PORT),
        )
    }

    /// Operation flags passed to whichever store is selected.
    pub fn permissions(&self) -> StorePermissions {
        StorePermissions::new(self.create, self.read, self.update, self.delete)
    }
}
