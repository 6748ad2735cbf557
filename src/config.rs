// Global configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::engine::install::DEFAULT_INSTALLER_URL;
use crate::engine::{DEFAULT_PROFILE, Profile};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Custom profiles by name; unset fields take the radio values
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Profile used when none is given on the command line
    #[serde(default = "default_profile")]
    pub profile: String,

    /// Output area, relative to the working directory unless absolute
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Engine executable, looked up on PATH when not a path
    #[serde(default = "default_engine")]
    pub engine: PathBuf,

    /// Where the Windows installer package is downloaded from
    #[serde(default = "default_installer_url")]
    pub installer_url: String,
}

fn default_profile() -> String {
    DEFAULT_PROFILE.to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output").join("Radio")
}

fn default_engine() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_installer_url() -> String {
    DEFAULT_INSTALLER_URL.to_string()
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            output_dir: default_output_dir(),
            engine: default_engine(),
            installer_url: default_installer_url(),
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "macos") {
            dirs::home_dir()
                .context("Could not determine home directory")?
                .join(".config")
                .join("msconv")
        } else {
            dirs::config_dir()
                .context("Could not determine config directory")?
                .join("msconv")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from disk, or create default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path).with_context(|| {
                format!("Failed to read config file: {}", config_path.display())
            })?;

            Self::from_toml(&contents).with_context(|| {
                format!("Failed to parse config file: {}", config_path.display())
            })
        } else {
            let config = Config::default();

            // Not being able to write the default is not worth failing over
            if let Err(e) = config.save() {
                tracing::warn!("Could not create default config file: {:#}", e);
                tracing::warn!(
                    "Using built-in defaults. Run 'msconv init-config' to create a config file."
                );
            }

            Ok(config)
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid config TOML")
    }

    /// Save config to disk
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    /// Resolve a profile name: custom profiles shadow built-in ones
    pub fn profile(&self, name: &str) -> Result<Profile> {
        if let Some(custom) = self.profiles.get(name) {
            let mut profile = custom.clone();
            profile.name = name.to_string();
            return Ok(profile);
        }

        Profile::builtin(name).with_context(|| {
            let mut known: Vec<&str> = Profile::builtin_names().to_vec();
            known.extend(self.profiles.keys().map(String::as_str));
            format!("Unknown profile '{}' (available: {})", name, known.join(", "))
        })
    }
}
