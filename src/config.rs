//! Configuration management for the template verifier
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (template-verifier.toml)
//! - Environment variables (VERIFIER__*)
//!
//! ## Example config file (template-verifier.toml):
//! ```toml
//! [verifier]
//! mode = "production"
//! baseline = "master/message_template.json"
//! candidate = "messages/message_template.json"
//!
//! [policy]
//! production = ["same", "newer"]
//!
//! [report]
//! format = "json"
//! pretty = true
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::compatibility::Verdict;
use crate::policy::{Mode, Policy};
use crate::report::ReportFormat;

/// Main configuration for the verifier
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Inputs and strictness
    #[serde(default)]
    pub verifier: VerifierSection,

    /// Acceptable set overrides
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Report settings
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifierSection {
    /// Strictness mode used when none is given on the command line
    #[serde(default)]
    pub mode: Mode,

    /// Baseline ("master") template used when only one file is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<PathBuf>,

    /// Template of the current build
    #[serde(default = "default_candidate")]
    pub candidate: PathBuf,
}

/// Replacement acceptable sets; unset modes keep their defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub development: Option<Vec<Verdict>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production: Option<Vec<Verdict>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub format: ReportFormat,

    /// Pretty-print JSON reports
    #[serde(default = "default_true")]
    pub pretty: bool,
}

fn default_candidate() -> PathBuf {
    PathBuf::from("messages/message_template.json")
}

fn default_true() -> bool {
    true
}

impl Default for VerifierSection {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            baseline: None,
            candidate: default_candidate(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::default(),
            pretty: true,
        }
    }
}

impl PolicyConfig {
    /// Default policy with the configured overrides applied
    pub fn build(&self) -> Policy {
        let mut policy = Policy::new();
        if let Some(verdicts) = &self.development {
            policy = policy.with_acceptable(Mode::Development, verdicts.iter().copied());
        }
        if let Some(verdicts) = &self.production {
            policy = policy.with_acceptable(Mode::Production, verdicts.iter().copied());
        }
        policy
    }
}

impl VerifierConfig {
    /// Load configuration, adding a required file when `config_path` is given
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "template-verifier.toml",
            ".template-verifier.toml",
            "config/template-verifier.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("dev", "template-compat", "template-verifier") {
            let xdg_config = config_dir.config_dir().join("template-verifier.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        // VERIFIER__VERIFIER__MODE=production, VERIFIER__REPORT__FORMAT=json, ...
        builder = builder.add_source(
            Environment::with_prefix("VERIFIER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn policy(&self) -> Policy {
        self.policy.build()
    }
}
