//! Job configuration: the optional `custom.greeting` value.
//!
//! Resolved once at startup from a TOML file and the environment. The file is
//! taken from `BATCH_JOB_CONFIG` when set, otherwise `config/batch-job.toml`
//! if it exists. `CUSTOM_GREETING` overrides whatever the file says.
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

pub const CONFIG_PATH_ENV: &str = "BATCH_JOB_CONFIG";
pub const GREETING_ENV: &str = "CUSTOM_GREETING";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomConfig {
    #[serde(default)]
    pub greeting: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    #[serde(default)]
    pub custom: CustomConfig,
}

impl JobConfig {
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            custom: CustomConfig {
                greeting: Some(greeting.into()),
            },
        }
    }

    pub fn greeting(&self) -> Option<&str> {
        self.custom.greeting.as_deref()
    }
}

fn repo_default_config_path() -> PathBuf {
    PathBuf::from("config/batch-job.toml")
}

/// Which file to read, if any. An explicitly named path is returned even if
/// missing so that the read fails loudly.
fn resolve_config_path_with_overrides<F>(lookup: &F, repo_default: PathBuf) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(CONFIG_PATH_ENV) {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    if repo_default.exists() {
        return Some(repo_default);
    }

    None
}

pub fn load_config(path: impl AsRef<Path>) -> Result<JobConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

fn apply_env_overrides<F>(mut cfg: JobConfig, lookup: &F) -> JobConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(greeting) = lookup(GREETING_ENV) {
        cfg.custom.greeting = Some(greeting);
    }
    cfg
}

fn resolve_with<F>(lookup: F, repo_default: PathBuf) -> Result<JobConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let cfg = match resolve_config_path_with_overrides(&lookup, repo_default) {
        Some(path) => load_config(&path)?,
        None => JobConfig::default(),
    };
    Ok(apply_env_overrides(cfg, &lookup))
}

/// Startup resolution against the real process environment.
pub fn resolve() -> Result<JobConfig> {
    resolve_with(|key| std::env::var(key).ok(), repo_default_config_path())
}
