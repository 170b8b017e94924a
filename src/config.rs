use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Read when `CONFIG_FILE` is unset and the file exists in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "speedlog.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
    /// How long a write waits on another process holding the SQLite lock.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl DatabaseConfig {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

fn default_database_path() -> String {
    "data/speedtest.db".into()
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    /// Speed test command; must print a JSON report on stdout.
    #[serde(default = "default_probe_command")]
    pub command: Vec<String>,
    #[serde(default = "default_probe_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            command: default_probe_command(),
            timeout_secs: default_probe_timeout_secs(),
        }
    }
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_probe_command() -> Vec<String> {
    vec!["speedtest-cli".into(), "--json".into()]
}

fn default_probe_timeout_secs() -> u64 {
    120
}

impl AppConfig {
    /// `CONFIG_FILE` if set (must exist), else `speedlog.toml` if present, else defaults.
    pub fn load() -> anyhow::Result<Self> {
        if let Ok(path) = std::env::var("CONFIG_FILE") {
            return Self::load_from_path(&path);
        }
        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            return Self::load_from_path(DEFAULT_CONFIG_FILE);
        }
        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_path(path: &str) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path).with_context(|| format!("reading config {path}"))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.database.path.is_empty(),
            "database.path must be non-empty"
        );
        anyhow::ensure!(
            self.database.busy_timeout_ms > 0,
            "database.busy_timeout_ms must be > 0, got {}",
            self.database.busy_timeout_ms
        );
        anyhow::ensure!(
            self.probe
                .command
                .first()
                .is_some_and(|program| !program.trim().is_empty()),
            "probe.command must name a program"
        );
        anyhow::ensure!(
            self.probe.timeout_secs > 0,
            "probe.timeout_secs must be > 0, got {}",
            self.probe.timeout_secs
        );
        Ok(())
    }
}
