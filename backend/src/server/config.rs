//! Application settings and the HTTP server configuration built from them.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use shelfmates::inbound::http::session_config::SessionToggles;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Settings loaded from `SHELFMATES_*` environment variables, configuration
/// files and command-line flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SHELFMATES")]
pub struct AppSettings {
    /// Socket address to listen on.
    #[ortho_config(default = DEFAULT_BIND_ADDR.to_owned())]
    pub bind_addr: String,
    /// Directory holding one JSON snapshot per collection. Stores are
    /// volatile when unset.
    pub data_dir: Option<PathBuf>,
    /// Path to the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Mark session cookies `Secure`.
    #[serde(default, deserialize_with = "scalar_toggle")]
    pub session_cookie_secure: Option<String>,
    /// `SameSite` policy for session cookies.
    pub session_samesite: Option<String>,
    /// Allow a generated session key when the key file is unreadable.
    #[serde(default, deserialize_with = "scalar_toggle")]
    pub session_allow_ephemeral: Option<String>,
}

/// Accept a toggle given as a string, boolean or number.
///
/// Environment values such as `1` or `true` reach serde already typed, while
/// the session validation layer parses toggles from their textual form.
fn scalar_toggle<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) => Ok(Some(raw)),
        Some(Value::Bool(flag)) => Ok(Some(flag.to_string())),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a boolean toggle, found {other}"
        ))),
    }
}

impl AppSettings {
    /// Configured bind address, falling back to all interfaces on port 8080.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.bind_addr.parse()
    }

    /// Session toggles awaiting validation.
    pub fn session_toggles(&self) -> SessionToggles {
        SessionToggles {
            key_file: self.session_key_file.clone(),
            cookie_secure: self.session_cookie_secure.clone(),
            same_site: self.session_samesite.clone(),
            allow_ephemeral: self.session_allow_ephemeral.clone(),
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) data_dir: Option<PathBuf>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            data_dir: None,
        }
    }

    /// Persist collections as JSON snapshots under `dir`.
    #[must_use]
    pub fn with_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.data_dir = dir;
        self
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }
}
