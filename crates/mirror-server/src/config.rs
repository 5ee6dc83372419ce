//! Process configuration
//!
//! Loaded from an optional YAML file, then overridden from the environment. Upstream
//! credentials are deliberately not part of it: only the names of the environment
//! variables holding them are, and those are read at call time.

use anyhow::{anyhow, Result};
use mirror_core::credentials::{DEFAULT_PASSWORD_VAR, DEFAULT_USERNAME_VAR};
use mirror_core::{EntityMappingRegistry, EnvCredentials};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_CONFIG_FILE: &str = "mirror.yaml";

pub const CONFIG_PATH_ENV: &str = "MIRROR_CONFIG";
pub const BIND_ADDR_ENV: &str = "MIRROR_BIND_ADDR";
pub const ERP_BASE_URL_ENV: &str = "MIRROR_ERP_BASE_URL";
pub const ENTITIES_FILE_ENV: &str = "MIRROR_ENTITIES_FILE";
pub const LOG_FILE_ENV: &str = "MIRROR_LOG_FILE";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    pub bind_addr: String,
    pub erp: ErpConfig,
    /// Replaces the compiled-in entity table when set
    pub entities_file: Option<PathBuf>,
    /// Append logs here instead of stderr
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ErpConfig {
    pub base_url: Option<String>,
    pub username_env: String,
    pub password_env: String,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            erp: ErpConfig::default(),
            entities_file: None,
            log_file: None,
        }
    }
}

impl Default for ErpConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            username_env: DEFAULT_USERNAME_VAR.to_string(),
            password_env: DEFAULT_PASSWORD_VAR.to_string(),
        }
    }
}

impl MirrorConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| anyhow!("Failed to parse config YAML: {}", e))
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path.display(), e))?;
        Self::from_yaml_str(&content)
            .map_err(|e| anyhow!("{} ({})", e, path.display()))
    }

    /// Resolve the config file (explicit path, then `MIRROR_CONFIG`, then
    /// `./mirror.yaml` if present), load it and apply environment overrides.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = explicit_path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .or_else(|| {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                default_path.exists().then_some(default_path)
            });

        let config = match path {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };
        Ok(config.with_overrides(|name| std::env::var(name).ok()))
    }

    /// Apply overrides from `lookup` (the process environment outside of tests)
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |name: &str| lookup(name).filter(|value| !value.is_empty());

        if let Some(bind_addr) = lookup(BIND_ADDR_ENV) {
            self.bind_addr = bind_addr;
        }
        if let Some(base_url) = lookup(ERP_BASE_URL_ENV) {
            self.erp.base_url = Some(base_url);
        }
        if let Some(path) = lookup(ENTITIES_FILE_ENV) {
            self.entities_file = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup(LOG_FILE_ENV) {
            self.log_file = Some(PathBuf::from(path));
        }
        self
    }

    pub fn erp_base_url(&self) -> Result<&str> {
        self.erp
            .base_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "ERP base URL is not configured (set erp.base_url or {})",
                    ERP_BASE_URL_ENV
                )
            })
    }

    pub fn credentials(&self) -> EnvCredentials {
        EnvCredentials::new(&self.erp.username_env, &self.erp.password_env)
    }

    pub fn load_registry(&self) -> Result<EntityMappingRegistry> {
        let registry = match &self.entities_file {
            Some(path) => EntityMappingRegistry::load_from_file(path)?,
            None => EntityMappingRegistry::builtin()?,
        };
        info!(
            "[MirrorConfig] Registry ready with {} entities",
            registry.len()
        );
        Ok(registry)
    }
}
