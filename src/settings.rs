//! User settings: built-in defaults, then `config.toml` in the config
//! directory, then `SMETA_*` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Label printed after amounts. Cosmetic only.
    pub currency: String,
    /// Upper bound for a single import or export.
    pub io_timeout_secs: u64,
    /// Log filter used when `SMETA_LOG` is not set.
    pub log_level: String,
    /// Where exports go by default; the home directory otherwise.
    pub export_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: "AZN".into(),
            io_timeout_secs: 10,
            log_level: "info".into(),
            export_dir: None,
        }
    }
}

impl Settings {
    /// Load settings, reading `config.toml` from `config_dir` when it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or an environment value does not parse.
    pub fn load(config_dir: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(dir) = config_dir {
            builder = builder.add_source(config::File::from(dir.join(CONFIG_FILE)).required(false));
        }
        builder
            .add_source(
                config::Environment::with_prefix("SMETA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn io_timeout(&self) -> Duration {
        Duration::from_secs(self.io_timeout_secs.max(1))
    }

    /// Directory exports default to.
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .or_else(|| directories::UserDirs::new().map(|d| d.home_dir().to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
