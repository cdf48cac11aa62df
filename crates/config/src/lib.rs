//! Layered configuration for implidx.
//!
//! Sources, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. `config.{toml,yaml,yml,json}` in the user's config directory
//! 3. A file given explicitly (`--config`)
//! 4. `IMPLIDX_*` environment variables, `__` separating nested keys
//!    (`IMPLIDX_HANDOFF__REGISTER`)

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use implidx_codec::{DEFAULT_PENDING, DEFAULT_REGISTER, Handoff, MergePolicy};
use implidx_index::Severity;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::instrument;

pub const ENV_PREFIX: &str = "IMPLIDX_";
const FILE_STEM: &str = "config";
const EXTENSIONS: [&str; 4] = ["toml", "yaml", "yml", "json"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandoffConfig {
    pub register: String,
    pub pending: String,
}
impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            register: DEFAULT_REGISTER.to_string(),
            pending: DEFAULT_PENDING.to_string(),
        }
    }
}
impl HandoffConfig {
    pub fn handoff(&self) -> Result<Handoff> {
        Handoff::new(&self.register, &self.pending).or_raise(|| ErrorKind::Invalid {
            field: "handoff",
            reason: format!("{} / {} are not JavaScript identifiers", self.register, self.pending),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// rustdoc output directory, usually `target/doc`
    pub doc_root: PathBuf,
    /// Globals that written files hand their data to
    pub handoff: HandoffConfig,
    pub merge_policy: MergePolicy,
    /// Issues below this are not reported
    pub min_severity: Severity,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            doc_root: PathBuf::from("target/doc"),
            handoff: HandoffConfig::default(),
            merge_policy: MergePolicy::default(),
            min_severity: Severity::default(),
        }
    }
}
impl Config {
    /// Loads from every source, `explicit` being the `--config` file if any.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_from(user_config_dir().as_deref(), explicit)
    }

    /// [`Config::load`] with the user config directory given.
    #[instrument(level = "debug")]
    pub fn load_from(user_dir: Option<&Path>, explicit: Option<&Path>) -> Result<Self> {
        let config: Self = sources(user_dir, explicit)?.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        tracing::debug!(doc_root = %config.doc_root.display(), "configuration loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.doc_root.as_os_str().is_empty() {
            exn::bail!(ErrorKind::Invalid {
                field: "doc_root",
                reason: "must not be empty".to_string(),
            });
        }
        self.handoff.handoff()?;
        Ok(())
    }
}

/// `$XDG_CONFIG_HOME/implidx` or the platform's equivalent.
pub fn user_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "implidx").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Every source, merged in priority order.
pub fn sources(user_dir: Option<&Path>, explicit: Option<&Path>) -> Result<Figment> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));
    if let Some(dir) = user_dir {
        for extension in EXTENSIONS {
            let path = dir.join(FILE_STEM).with_extension(extension);
            if path.is_file() {
                tracing::trace!(path = %path.display(), "user config found");
                figment = merge_file(figment, &path)?;
            }
        }
    }
    if let Some(path) = explicit {
        if !path.is_file() {
            exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
        }
        figment = merge_file(figment, path)?;
    }
    Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    let extension = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
    Ok(match extension.as_deref() {
        Some("toml") => figment.merge(Toml::file_exact(path)),
        Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path)),
        Some("json") => figment.merge(Json::file_exact(path)),
        _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
    })
}
