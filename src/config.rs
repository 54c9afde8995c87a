use serde::Deserialize;
use std::path::{Path, PathBuf};

/// How the proxy authenticates clients against the remote server.
///
/// The form channel is only serviced in [`AuthMode::Bridge`]; offline
/// sessions have no out-of-band UI peer to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMode {
    Offline,
    Bridge,
}

/// Process-wide static configuration, read once at startup and shared
/// read-only between sessions.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ProxyConfig {
    pub root: PathBuf,
    pub auth_mode: AuthMode,
    /// Local preference: never substitute structural scaffolding for the
    /// client, regardless of what the remote server asks for.
    pub disable_scaffolding_substitution: bool,
    /// Capacity of each session's item mapping cache.
    pub mapping_cache_capacity: usize,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            auth_mode: AuthMode::Offline,
            disable_scaffolding_substitution: false,
            mapping_cache_capacity: 256,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read(PathBuf, String),
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read(path, msg) => {
                write!(f, "failed to read {}: {}", path.display(), msg)
            }
            ConfigError::Parse(msg) => write!(f, "config parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl ProxyConfig {
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|err| ConfigError::Read(path.to_path_buf(), err.to_string()))?;
        Self::from_yaml(&text)
    }
}
