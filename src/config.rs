//! Purpose: Scope configuration document and environment-derived defaults.
//! Exports: `ScopeConfig`, `ChildScopeConfig`, `LOG_ENV`, `default_cache_root`, `default_tmp_root`.
//! Role: Input to `ScopeBase`; the only place environment variables are consulted.
//! Invariants: `scope_id` and `scope_directory` are required; everything else has a default.
//! Invariants: Default cache root is `$XDG_CACHE_HOME/unity-scopes` (or `~/.cache/unity-scopes`).
use std::path::PathBuf;

use serde::Deserialize;

use crate::api::ScopeMetadata;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::variant::{self, VariantMap};

/// Environment variable holding the tracing filter (`EnvFilter` syntax).
pub const LOG_ENV: &str = "SCOPESHIM_LOG";

#[derive(Clone, Debug, Deserialize)]
pub struct ScopeConfig {
    pub scope_id: String,
    pub scope_directory: PathBuf,
    #[serde(default)]
    pub cache_directory: Option<PathBuf>,
    #[serde(default)]
    pub tmp_directory: Option<PathBuf>,
    #[serde(default)]
    pub settings: VariantMap,
    #[serde(default)]
    pub registry: Vec<ScopeMetadata>,
    #[serde(default)]
    pub child_scopes: Vec<ChildScopeConfig>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ChildScopeConfig {
    pub id: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub keywords: Vec<String>,
}

fn enabled_by_default() -> bool {
    true
}

impl ScopeConfig {
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let value = variant::parse(bytes, "scope config")?;
        let config: Self = serde_json::from_value(value).map_err(|err| {
            Error::new(ErrorKind::Conversion)
                .with_message("scope config: unexpected shape")
                .with_source(err)
        })?;
        if config.scope_id.is_empty() {
            return Err(Error::invalid("scope config requires a scope_id"));
        }
        Ok(config)
    }

    pub fn cache_directory(&self) -> PathBuf {
        self.cache_directory
            .clone()
            .unwrap_or_else(|| default_cache_root().join(&self.scope_id))
    }

    pub fn tmp_directory(&self) -> PathBuf {
        self.tmp_directory
            .clone()
            .unwrap_or_else(|| default_tmp_root().join(&self.scope_id))
    }
}

pub fn default_cache_root() -> PathBuf {
    let base = std::env::var_os("XDG_CACHE_HOME")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let home = std::env::var_os("HOME").unwrap_or_default();
            PathBuf::from(home).join(".cache")
        });
    base.join("unity-scopes")
}

pub fn default_tmp_root() -> PathBuf {
    std::env::temp_dir().join("scopes")
}
