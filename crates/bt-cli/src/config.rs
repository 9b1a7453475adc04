//! Layered configuration for `bt`.
//!
//! Sources, later ones winning: built-in defaults, `~/.config/bt/config.toml`,
//! the file passed with `--config`, then `BT_*` environment variables.

use std::io;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "bt";
const DATABASE_FILE: &str = "bt.db";
const ENV_PREFIX: &str = "BT_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// SQLite file holding the baby profile, sessions and settings.
    pub database_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let base = app_dir(dirs::data_dir()).unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: base.join(DATABASE_FILE),
        }
    }
}

impl Config {
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(explicit: Option<&Path>) -> Result<Self, figment::Error> {
        let user_file = app_dir(dirs::config_dir()).map(|dir| dir.join("config.toml"));

        let figment = [user_file.as_deref(), explicit]
            .into_iter()
            .flatten()
            .fold(
                Figment::from(Serialized::defaults(Self::default())),
                |figment, path| figment.merge(Toml::file(path)),
            )
            .merge(Env::prefixed(ENV_PREFIX));

        figment.extract()
    }

    /// Creates the directory the database lives in, if it has one.
    pub fn ensure_database_dir(&self) -> io::Result<()> {
        match self.database_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir),
            _ => Ok(()),
        }
    }
}

fn app_dir(base: Option<PathBuf>) -> Option<PathBuf> {
    base.map(|dir| dir.join(APP_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn default_database_lives_under_app_data_dir() {
        let config = Config::default();
        assert_eq!(config.database_path.file_name().unwrap(), DATABASE_FILE);
        let parent = config.database_path.parent().unwrap();
        assert_eq!(parent.file_name().unwrap(), APP_DIR);
    }

    #[test]
    fn explicit_file_sets_database_path() {
        let file = write_config("database_path = \"/tmp/custom-bt.db\"\n");
        let config = Config::load_from(Some(file.path())).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/custom-bt.db"));
    }

    #[test]
    fn missing_explicit_file_keeps_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config::load_from(Some(&temp.path().join("absent.toml"))).unwrap();
        assert_eq!(config.database_path, Config::default().database_path);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let file = write_config("database_path = [\n");
        assert!(Config::load_from(Some(file.path())).is_err());
    }

    #[test]
    fn ensure_database_dir_creates_nested_parents() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config {
            database_path: temp.path().join("a").join("b").join(DATABASE_FILE),
        };
        config.ensure_database_dir().unwrap();
        assert!(temp.path().join("a").join("b").is_dir());
    }

    #[test]
    fn ensure_database_dir_accepts_bare_file_name() {
        let config = Config {
            database_path: PathBuf::from(DATABASE_FILE),
        };
        config.ensure_database_dir().unwrap();
    }
}
