//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables, `APPBUILDER__SECTION__KEY`
//! 3. `.appbuilder.toml` in the current directory
//! 4. The user config file, or the file given with `--config`
//! 5. Built-in defaults

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use appbuilder_core::domain::{BuildTool, EncodingType, MessagingProvider};

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "APPBUILDER";

/// Per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".appbuilder.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default values for new applications.
    pub defaults: Defaults,
    /// Output settings.
    pub output: OutputConfig,
    /// Template settings.
    pub templates: TemplateConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub build_tool: BuildTool,
    pub encoding_type: EncodingType,
    pub messaging_provider: MessagingProvider,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rumi_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rumi_bindings_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rumi_mgmt_version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Template package directory used instead of the built-in templates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration following the resolution order in the module docs.
    ///
    /// `config_file` is the path the user passed via `--config`; it must
    /// exist. Without it the user config file and the local file are both
    /// optional.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_from(config_file, Path::new(LOCAL_CONFIG_FILE))
    }

    pub(crate) fn load_from(config_file: Option<&Path>, local_file: &Path) -> anyhow::Result<Self> {
        let mut builder = Config::builder().add_source(
            Config::try_from(&Self::default()).context("failed to encode built-in defaults")?,
        );

        builder = match config_file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::from(Self::config_path()).required(false)),
        };

        let config = builder
            .add_source(File::from(local_file).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .context("failed to read configuration")?;

        config
            .try_deserialize()
            .context("configuration has invalid values")
    }

    /// Path to the user configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.appbuilder.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "appbuilder", "appbuilder")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// Value of a dotted key, as shown by `appbuilder config get`.
    pub fn get(&self, key: &str) -> Option<String> {
        let d = &self.defaults;
        let value = match key {
            "defaults.build_tool" => d.build_tool.to_string(),
            "defaults.encoding_type" => d.encoding_type.to_string(),
            "defaults.messaging_provider" => d.messaging_provider.to_string(),
            "defaults.group_id" => d.group_id.clone().unwrap_or_default(),
            "defaults.artifact_prefix" => d.artifact_prefix.clone().unwrap_or_default(),
            "defaults.rumi_version" => d.rumi_version.clone().unwrap_or_default(),
            "defaults.rumi_bindings_version" => d.rumi_bindings_version.clone().unwrap_or_default(),
            "defaults.rumi_mgmt_version" => d.rumi_mgmt_version.clone().unwrap_or_default(),
            "output.no_color" => self.output.no_color.to_string(),
            "templates.dir" => self
                .templates
                .dir
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            _ => return None,
        };
        Some(value)
    }
}
