//! Configuration handling for Alice
//!
//! Supports `alice.toml` (in the platform config directory, or the file named by
//! `ALICE_CONFIG`) and environment variable overrides.

use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::core::{AliceError, AliceResult};

/// Name of the configuration file
pub const CONFIG_FILE: &str = "alice.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// External executables
    pub tools: ToolsConfig,

    /// Project templates by language tag
    pub templates: TemplatesConfig,

    /// Installation settings
    pub install: InstallConfig,

    /// Console behaviour
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Version-control executable used by `create`
    pub vcs: String,

    /// Container-build executable used by `build`
    pub container: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplatesConfig {
    /// Language tag -> template repository. An empty source leaves the tag unmapped.
    pub sources: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Profile script holding the machine-wide PATH entries on POSIX hosts
    pub profile_script: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Delay before the process exits, so output stays readable in auto-closing terminals
    pub exit_delay_ms: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            vcs: "git".to_string(),
            container: "docker".to_string(),
        }
    }
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        let mut sources = BTreeMap::new();
        sources.insert(
            "cs".to_string(),
            "https://github.com/TomLBZ/Doll.git".to_string(),
        );
        sources.insert("ts".to_string(), String::new());
        Self { sources }
    }
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            profile_script: PathBuf::from("/etc/profile.d/alice.sh"),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            exit_delay_ms: 1000,
        }
    }
}

impl Config {
    /// Load configuration from the default location and apply environment overrides
    pub fn load() -> AliceResult<Self> {
        let config = match Self::config_path() {
            Some(path) => Self::load_from(&path)?,
            None => Config::default(),
        };
        Ok(config.apply_overrides(|key| env::var(key).ok()))
    }

    /// Load configuration from a file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> AliceResult<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AliceError::file("reading", path, e))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| AliceError::config(format!("{}: {}", path.display(), e)))?;
        Ok(config.normalized())
    }

    /// Resolve the configuration file path
    fn config_path() -> Option<PathBuf> {
        if let Ok(explicit) = env::var("ALICE_CONFIG") {
            return Some(PathBuf::from(explicit));
        }

        ProjectDirs::from("com", "alice", "alice")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Apply `ALICE_*` overrides, reading values through `lookup`
    pub fn apply_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(vcs) = lookup("ALICE_VCS") {
            self.tools.vcs = vcs;
        }

        if let Some(container) = lookup("ALICE_CONTAINER") {
            self.tools.container = container;
        }

        if let Some(script) = lookup("ALICE_PROFILE_SCRIPT") {
            self.install.profile_script = PathBuf::from(script);
        }

        if let Some(delay) = lookup("ALICE_EXIT_DELAY_MS") {
            match delay.parse() {
                Ok(ms) => self.ui.exit_delay_ms = ms,
                Err(_) => tracing::warn!("Ignoring invalid ALICE_EXIT_DELAY_MS={}", delay),
            }
        }

        self
    }

    /// Template tags are matched case-insensitively
    fn normalized(mut self) -> Self {
        self.templates.sources = self
            .templates
            .sources
            .into_iter()
            .map(|(tag, source)| (tag.to_lowercase(), source))
            .collect();
        self
    }

    /// Post-run delay
    pub fn exit_delay(&self) -> Duration {
        Duration::from_millis(self.ui.exit_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tools.vcs, "git");
        assert_eq!(config.tools.container, "docker");
        assert_eq!(
            config.templates.sources.get("cs").map(String::as_str),
            Some("https://github.com/TomLBZ/Doll.git")
        );
        assert_eq!(config.exit_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_config_load_missing_file() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config.tools.vcs, "git");
    }

    #[test]
    fn test_config_load_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            "[tools]\ncontainer = \"podman\"\n\n[templates]\nCS = \"https://example.com/doll.git\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.tools.container, "podman");
        assert_eq!(config.tools.vcs, "git");
        assert_eq!(
            config.templates.sources.get("cs").map(String::as_str),
            Some("https://example.com/doll.git")
        );
    }

    #[test]
    fn test_config_load_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[tools\nvcs = ").unwrap();
        assert!(matches!(Config::load_from(&path), Err(AliceError::Config(_))));
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default().apply_overrides(|key| match key {
            "ALICE_CONTAINER" => Some("podman".to_string()),
            "ALICE_EXIT_DELAY_MS" => Some("0".to_string()),
            "ALICE_PROFILE_SCRIPT" => Some("/tmp/alice.sh".to_string()),
            _ => None,
        });
        assert_eq!(config.tools.container, "podman");
        assert_eq!(config.exit_delay(), Duration::ZERO);
        assert_eq!(config.install.profile_script, PathBuf::from("/tmp/alice.sh"));
    }

    #[test]
    fn test_invalid_delay_override_is_ignored() {
        let config = Config::default()
            .apply_overrides(|key| (key == "ALICE_EXIT_DELAY_MS").then(|| "soon".to_string()));
        assert_eq!(config.ui.exit_delay_ms, 1000);
    }
}
