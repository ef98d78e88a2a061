//! Settings loaded from the suite's YAML configuration file.
//!
//! The document carries environment credentials under
//! `settings.env.{username,password}` plus the headless toggle. The value
//! is constructed explicitly and injected into the session fixture; a
//! missing file or key fails fast before any browser is launched.

use std::path::Path;

use serde::Deserialize;

use crate::driver::Backend;
use crate::result::{EnsayoError, EnsayoResult};

/// Environment credentials and runner options from `settings.env`
#[derive(Debug, Clone, Deserialize)]
pub struct EnvSettings {
    /// Login username for the application under test
    pub username: String,
    /// Login password for the application under test
    pub password: String,
    /// Run the browser with a visible window instead of headless
    #[serde(default)]
    pub webdriver_visible: bool,
}

#[derive(Debug, Deserialize)]
struct SettingsRoot {
    env: EnvSettings,
}

#[derive(Debug, Deserialize)]
struct SettingsFile {
    settings: SettingsRoot,
}

/// Immutable suite settings, one instance per test session
#[derive(Debug, Clone)]
pub struct Settings {
    /// Environment credentials and options
    pub env: EnvSettings,
    /// Selected browser backend
    pub backend: Backend,
}

impl Settings {
    /// Load settings from a YAML file.
    ///
    /// The backend defaults to Chrome and is overridable via the
    /// `ENSAYO_BROWSER` environment variable.
    pub fn load(path: impl AsRef<Path>) -> EnsayoResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| EnsayoError::Settings {
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::from_yaml(&raw)
    }

    /// Parse settings from a YAML document
    pub fn from_yaml(raw: &str) -> EnsayoResult<Self> {
        let file: SettingsFile =
            serde_yaml_ng::from_str(raw).map_err(|e| EnsayoError::Settings {
                message: e.to_string(),
            })?;
        Ok(Self {
            env: file.settings.env,
            backend: Backend::from_env_or(Backend::Chrome),
        })
    }

    /// Whether the browser should run headless
    #[must_use]
    pub const fn headless(&self) -> bool {
        !self.env.webdriver_visible
    }
}
