use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::constants::CONFIG_FILENAME;
use crate::transform::RemovalPolicy;

#[derive(Debug, Deserialize, Default, Clone)]
/// Top-level configuration struct.
pub struct Config {
    #[serde(default)]
    /// The main configuration section for stmtdelta.
    pub stmtdelta: StmtDeltaConfig,
    /// The path to the configuration file this was loaded from.
    /// Set during `load_from_path`, `None` if using defaults or programmatic config.
    #[serde(skip)]
    pub config_file_path: Option<std::path::PathBuf>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
/// Configuration options for stmtdelta.
pub struct StmtDeltaConfig {
    /// Candidate policy used when `--policy` is not given.
    pub policy: Option<RemovalPolicy>,
    /// Whether line markers delimit included (read-only) regions.
    pub respect_line_markers: Option<bool>,
    /// Main file name for line-marker matching.
    pub main_file: Option<String>,
}

impl Config {
    /// Loads configuration starting from a specific path and traversing up.
    ///
    /// Unreadable or malformed files are skipped with a warning.
    #[must_use]
    pub fn load_from_path(path: &Path) -> Self {
        let mut current = path.to_path_buf();
        if current.is_file() {
            current.pop();
        }

        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                match fs::read_to_string(&candidate)
                    .map_err(|e| e.to_string())
                    .and_then(|content| {
                        toml::from_str::<Config>(&content).map_err(|e| e.to_string())
                    }) {
                    Ok(mut config) => {
                        tracing::debug!(path = %candidate.display(), "loaded configuration");
                        config.config_file_path = Some(candidate);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!(path = %candidate.display(), error = %e, "ignoring configuration file");
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        Config::default()
    }
}
