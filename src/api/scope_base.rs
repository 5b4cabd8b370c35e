//! Purpose: The running scope's view of its environment (directories, settings, registry).
//! Exports: `ScopeBase`.
//! Role: Built once from `ScopeConfig`; read-only afterwards.
//! Invariants: Every configured child scope refers to a registry entry.
use std::path::{Path, PathBuf};

use super::child_scope::ChildScope;
use super::metadata::ScopeMetadata;
use crate::config::ScopeConfig;
use crate::core::error::{Error, Result};
use crate::core::variant::VariantMap;

#[derive(Clone, Debug)]
pub struct ScopeBase {
    scope_id: String,
    scope_directory: PathBuf,
    cache_directory: PathBuf,
    tmp_directory: PathBuf,
    settings: VariantMap,
    registry: Vec<ScopeMetadata>,
    child_scopes: Vec<ChildScope>,
}

impl ScopeBase {
    pub fn from_config(config: ScopeConfig) -> Result<Self> {
        let cache_directory = config.cache_directory();
        let tmp_directory = config.tmp_directory();
        let mut child_scopes = Vec::with_capacity(config.child_scopes.len());
        for child in config.child_scopes {
            let metadata = config
                .registry
                .iter()
                .find(|entry| entry.scope_id == child.id)
                .cloned()
                .ok_or_else(|| {
                    Error::invalid(format!("child scope '{}' is not in the registry", child.id))
                })?;
            child_scopes.push(ChildScope::new(
                child.id,
                metadata,
                child.enabled,
                child.keywords,
            ));
        }
        tracing::debug!(
            scope_id = %config.scope_id,
            registry = config.registry.len(),
            children = child_scopes.len(),
            "scope base configured"
        );
        Ok(Self {
            scope_id: config.scope_id,
            scope_directory: config.scope_directory,
            cache_directory,
            tmp_directory,
            settings: config.settings,
            registry: config.registry,
            child_scopes,
        })
    }

    pub fn scope_id(&self) -> &str {
        &self.scope_id
    }

    pub fn scope_directory(&self) -> &Path {
        &self.scope_directory
    }

    pub fn cache_directory(&self) -> &Path {
        &self.cache_directory
    }

    pub fn tmp_directory(&self) -> &Path {
        &self.tmp_directory
    }

    pub fn settings(&self) -> &VariantMap {
        &self.settings
    }

    pub fn registry(&self) -> &[ScopeMetadata] {
        &self.registry
    }

    pub fn child_scopes(&self) -> &[ChildScope] {
        &self.child_scopes
    }
}
