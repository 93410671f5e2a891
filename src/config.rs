use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_STORAGE_KEY: &str = "tackboard-data";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub data_dir: Option<PathBuf>,
    pub storage_key: Option<String>,
    pub log_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub storage_key: String,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl Config {
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(text).context("parsing config")
    }

    /// A missing file at the default location is fine; a missing file the
    /// user asked for explicitly is not.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let (path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => match default_config_path() {
                Some(path) => (path, false),
                None => return Ok(Config::default()),
            },
        };
        if !path.exists() {
            if required {
                anyhow::bail!("config file {:?} does not exist", path);
            }
            return Ok(Config::default());
        }
        let text = fs::read_to_string(&path).with_context(|| format!("reading {:?}", path))?;
        Config::parse(&text).with_context(|| format!("in {:?}", path))
    }

    pub fn resolve(self, fallback_data_dir: Option<PathBuf>) -> Result<Settings> {
        let data_dir = self
            .data_dir
            .or(fallback_data_dir)
            .context("no data directory configured and none could be located")?;
        let log_dir = self.log_dir.unwrap_or_else(|| data_dir.join("logs"));
        let storage_key = self
            .storage_key
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());
        validate_storage_key(&storage_key)?;
        Ok(Settings {
            data_dir,
            storage_key,
            log_dir,
            log_level: self
                .log_level
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }
}

/// The key becomes a file name under `data_dir`, so it must stay a single
/// plain path component.
fn validate_storage_key(key: &str) -> Result<()> {
    let plain = key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if !plain || key.starts_with('.') || key.contains("..") {
        anyhow::bail!(
            "invalid storage_key {:?}: use letters, digits, '-', '_' or '.' and no leading dot",
            key
        );
    }
    Ok(())
}

pub fn default_config_path() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("", "", "tackboard")?;
    Some(dirs.config_dir().join("config.yml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn empty_config_resolves_to_defaults() {
        let settings = Config::parse("")
            .unwrap()
            .resolve(Some(PathBuf::from("/data")))
            .unwrap();
        assert_eq!(
            settings,
            Settings {
                data_dir: PathBuf::from("/data"),
                storage_key: DEFAULT_STORAGE_KEY.into(),
                log_dir: PathBuf::from("/data/logs"),
                log_level: "info".into(),
            }
        );
    }

    #[test]
    fn yaml_overrides_every_field() {
        let config = Config::parse(
            "data_dir: /srv/boards\nstorage_key: team\nlog_dir: /var/log/tack\nlog_level: debug\n",
        )
        .unwrap();
        let settings = config.resolve(None).unwrap();
        assert_eq!(settings.data_dir, PathBuf::from("/srv/boards"));
        assert_eq!(settings.storage_key, "team");
        assert_eq!(settings.log_dir, PathBuf::from("/var/log/tack"));
        assert_eq!(settings.log_level, "debug");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::parse("colour: blue\n").is_err());
    }

    #[test]
    fn blank_storage_key_falls_back() {
        let settings = Config::parse("storage_key: '  '\n")
            .unwrap()
            .resolve(Some(PathBuf::from("/d")))
            .unwrap();
        assert_eq!(settings.storage_key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn storage_key_must_stay_inside_data_dir() {
        let rejected = [
            "../escape",
            "a/b",
            "a\\b",
            "..",
            ".hidden",
            "/etc/passwd",
            "C:evil",
            "two words",
        ];
        for key in rejected {
            let config = Config {
                storage_key: Some(key.into()),
                ..Config::default()
            };
            let err = config.resolve(Some(PathBuf::from("/d"))).unwrap_err();
            assert!(err.to_string().contains("invalid storage_key"), "{key}: {err}");
        }

        let config = Config {
            storage_key: Some("team_boards-v2.backup".into()),
            ..Config::default()
        };
        let settings = config.resolve(Some(PathBuf::from("/d"))).unwrap();
        assert_eq!(settings.storage_key, "team_boards-v2.backup");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.yml");
        assert!(Config::load(Some(&missing)).is_err());

        let present = dir.path().join("config.yml");
        fs::write(&present, "log_level: warn\n").unwrap();
        let config = Config::load(Some(&present)).unwrap();
        assert_eq!(config.log_level.as_deref(), Some("warn"));
    }
}
