//! Session cookie configuration and validation.
//!
//! Raw toggles arrive from the application settings as optional strings.
//! Debug builds fall back to defaults with a warning; release builds reject
//! anything missing or malformed.

pub mod fingerprint;
mod parsing;

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use tracing::{info, warn};
use zeroize::Zeroize;

use parsing::{BoolToggle, debug_warn_or_error, parse_bool_toggle, parse_same_site_value};

pub use fingerprint::key_fingerprint;

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
/// `Key::derive_from` panics below this length.
const DERIVE_MIN_LEN: usize = 32;
pub(crate) const COOKIE_SECURE_SETTING: &str = "SHELFMATES_SESSION_COOKIE_SECURE";
pub(crate) const SAMESITE_SETTING: &str = "SHELFMATES_SESSION_SAMESITE";
pub(crate) const ALLOW_EPHEMERAL_SETTING: &str = "SHELFMATES_SESSION_ALLOW_EPHEMERAL";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing toggles.
    Debug,
    /// Release builds require explicit, valid session toggles.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shelfmates::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Unvalidated session toggles as loaded from configuration.
#[derive(Debug, Clone, Default)]
pub struct SessionToggles {
    /// Path to the signing key file.
    pub key_file: Option<PathBuf>,
    /// Whether cookies carry the `Secure` attribute (`1|0|true|false|yes|no`).
    pub cookie_secure: Option<String>,
    /// `Strict`, `Lax` or `None`.
    pub same_site: Option<String>,
    /// Permit a generated key when the key file cannot be read.
    pub allow_ephemeral: Option<String>,
}

/// Validated session settings used to build the session middleware.
pub struct SessionSettings {
    /// Signing and encryption key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// Configured `SameSite` policy for session cookies.
    pub same_site: SameSite,
}

impl SessionSettings {
    /// Fingerprint of the active key, safe to log.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        key_fingerprint(&self.key)
    }
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A required setting is missing.
    #[error("missing required setting: {name}")]
    MissingSetting { name: &'static str },
    /// A setting is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidSetting {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The session key file exists but is too short for release builds.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// `SameSite=None` requires a secure cookie in release builds.
    #[error("SameSite=None requires SHELFMATES_SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    /// Release builds must not allow ephemeral session keys.
    #[error("SHELFMATES_SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Validate `toggles` for the given build mode.
///
/// # Examples
///
/// ```rust
/// use shelfmates::inbound::http::session_config::{
///     BuildMode, SessionToggles, session_settings,
/// };
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let key_path = std::env::temp_dir().join("shelfmates_session_key_example");
/// std::fs::write(&key_path, vec![b'a'; 64])?;
///
/// let toggles = SessionToggles {
///     key_file: Some(key_path.clone()),
///     cookie_secure: Some("1".into()),
///     same_site: Some("Strict".into()),
///     allow_ephemeral: Some("0".into()),
/// };
/// let settings = session_settings(&toggles, BuildMode::Release)?;
/// assert!(settings.cookie_secure);
///
/// std::fs::remove_file(&key_path)?;
/// # Ok(())
/// # }
/// ```
pub fn session_settings(
    toggles: &SessionToggles,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = parse_bool_toggle(
        toggles.cookie_secure.as_deref(),
        mode,
        BoolToggle::new(COOKIE_SECURE_SETTING, true),
    )?;
    let same_site = same_site_setting(toggles.same_site.as_deref(), mode, cookie_secure)?;
    let allow_ephemeral = parse_bool_toggle(
        toggles.allow_ephemeral.as_deref(),
        mode,
        BoolToggle::new(ALLOW_EPHEMERAL_SETTING, false),
    )?;
    if allow_ephemeral && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let key = session_key(toggles.key_file.clone(), mode, allow_ephemeral)?;

    let settings = SessionSettings {
        key,
        cookie_secure,
        same_site,
    };
    info!(fingerprint = %settings.fingerprint(), "session key loaded");
    Ok(settings)
}

fn same_site_setting(
    value: Option<&str>,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let default_same_site = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    match value {
        Some(value) => parse_same_site_value(value, mode, cookie_secure, default_same_site),
        None => debug_warn_or_error(
            mode,
            default_same_site,
            SessionConfigError::MissingSetting {
                name: SAMESITE_SETTING,
            },
            || warn!("{SAMESITE_SETTING} not set; using default"),
        ),
    }
}

fn session_key(
    key_file: Option<PathBuf>,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = key_file.unwrap_or_else(|| PathBuf::from(SESSION_KEY_DEFAULT_PATH));

    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            if length < DERIVE_MIN_LEN {
                bytes.zeroize();
                warn!(
                    path = %path.display(),
                    length,
                    "session key too short to derive from; using temporary key (dev only)"
                );
                return Ok(Key::generate());
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(error) => Err(SessionConfigError::KeyRead {
            path,
            source: error,
        }),
    }
}
