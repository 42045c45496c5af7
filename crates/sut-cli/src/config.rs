//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the per-day `YYYY-MM-DD.csv` activity logs.
    pub logs_dir: PathBuf,
    /// Directory that `report --save` writes into.
    pub reports_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            logs_dir: data_dir.join("logs"),
            reports_dir: data_dir.join("reports"),
        }
    }
}

impl Config {
    /// Loads configuration.
    ///
    /// Later layers win: built-in defaults, `<config dir>/sut/config.toml`,
    /// the file given with `--config`, then `SUT_*` environment variables.
    /// Missing files are skipped.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let layered_files = dirs_config_path()
            .map(|dir| dir.join("config.toml"))
            .into_iter()
            .chain(config_path.map(Path::to_path_buf));

        layered_files
            .fold(
                Figment::from(Serialized::defaults(Self::default())),
                |figment, file| figment.merge(Toml::file(file)),
            )
            .merge(Env::prefixed("SUT_"))
            .extract()
    }
}

/// Returns the platform-specific config directory for sut.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("sut"))
}

/// Returns the platform-specific data directory for sut.
///
/// On Linux: `~/.local/share/sut`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("sut"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_data_path_ends_with_sut() {
        let path = dirs_data_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "sut");
    }

    #[test]
    fn test_default_config_uses_data_dir() {
        let config = Config::default();
        let data_dir = dirs_data_path().unwrap();
        assert_eq!(config.logs_dir, data_dir.join("logs"));
        assert_eq!(config.reports_dir, data_dir.join("reports"));
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("custom.toml");
        std::fs::write(&path, "logs_dir = \"/var/log/standup\"\n").unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.logs_dir, PathBuf::from("/var/log/standup"));
        assert_eq!(config.reports_dir, Config::default().reports_dir);
    }

    #[test]
    fn test_missing_config_file_keeps_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config::load_from(Some(&temp.path().join("absent.toml"))).unwrap();
        assert_eq!(config.reports_dir, Config::default().reports_dir);
    }
}
