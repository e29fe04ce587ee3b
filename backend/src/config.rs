//! Application configuration.
//!
//! Settings come from an optional `timetable.toml` file, with every field
//! defaulted, and are then overridden by environment variables:
//!
//! - `HOST`, `PORT`: bind address of the HTTP server
//! - `REPOSITORY_TYPE`: `local` (in-memory) or `file`
//! - `REPOSITORY_PATH`: snapshot path for the `file` backend
//! - `SOLVER_URL`: base URL of the external timetable solver
//! - `SOLVER_TIMEOUT_SECS`: bound on a single solver round trip
//!
//! An optional `[schedule]` table supplies the institution's default
//! `ScheduleSettings`, and an optional `[directory]` table the registered
//! faculty and room names:
//!
//! ```toml
//! [directory]
//! faculty = ["Dr. Rao", "Dr. Iyer"]
//! rooms = ["A-101", "Lab 2"]
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::db::repository::RepositoryError;
use crate::models::{Directory, ScheduleSettings};

/// Name of the configuration file searched for at startup.
pub const CONFIG_FILE_NAME: &str = "timetable.toml";

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub repository: RepositorySettings,
    #[serde(default)]
    pub solver: SolverSettings,
    /// Default institution settings; built-in defaults when absent.
    #[serde(default)]
    pub schedule: Option<ScheduleSettings>,
    /// Faculty and room registries seeded into the repository at startup.
    #[serde(default)]
    pub directory: Option<Directory>,
}

/// HTTP bind settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Repository backend selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type", default = "default_repo_type")]
    pub repo_type: String,
    /// Snapshot file for the `file` backend.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            repo_type: default_repo_type(),
            path: None,
        }
    }
}

/// External solver endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverSettings {
    #[serde(default = "default_solver_url")]
    pub url: String,
    #[serde(default = "default_solver_timeout")]
    pub timeout_secs: u64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            url: default_solver_url(),
            timeout_secs: default_solver_timeout(),
        }
    }
}

impl SolverSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_repo_type() -> String {
    "local".to_string()
}

fn default_solver_url() -> String {
    "http://127.0.0.1:5001".to_string()
}

fn default_solver_timeout() -> u64 {
    30
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, RepositoryError> {
        toml::from_str(content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// Load configuration from the first `timetable.toml` found in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    ///
    /// Falls back to defaults when none exists.
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        let search_paths = [
            PathBuf::from(CONFIG_FILE_NAME),
            PathBuf::from("backend").join(CONFIG_FILE_NAME),
            PathBuf::from("..").join(CONFIG_FILE_NAME),
        ];

        match search_paths.iter().find(|p| p.exists()) {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides.
    pub fn with_env_overrides(self) -> Result<Self, RepositoryError> {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup, keyed by environment variable name.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, RepositoryError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port.parse().map_err(|_| {
                RepositoryError::configuration(format!("PORT must be a valid port number: {}", port))
            })?;
        }
        if let Some(repo_type) = lookup("REPOSITORY_TYPE") {
            self.repository.repo_type = repo_type;
        }
        if let Some(path) = lookup("REPOSITORY_PATH") {
            self.repository.path = Some(PathBuf::from(path));
        }
        if let Some(url) = lookup("SOLVER_URL") {
            self.solver.url = url;
        }
        if let Some(secs) = lookup("SOLVER_TIMEOUT_SECS") {
            self.solver.timeout_secs = secs.parse().map_err(|_| {
                RepositoryError::configuration(format!(
                    "SOLVER_TIMEOUT_SECS must be a whole number of seconds: {}",
                    secs
                ))
            })?;
        }
        Ok(self)
    }

    /// Configuration file (if any) plus environment overrides.
    pub fn load() -> Result<Self, RepositoryError> {
        Self::from_default_location()?.with_env_overrides()
    }

    /// Default institution settings to fall back on.
    pub fn default_settings(&self) -> ScheduleSettings {
        self.schedule.clone().unwrap_or_default()
    }
}
