//! Runtime configuration.
//!
//! Layers, lowest first: built-in defaults, the TOML file, `QUIZ_*`
//! environment variables, command-line flags.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::cli::PathArgs;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid database url: {raw}")]
    InvalidDbUrl { raw: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Json,
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    pub backend: Backend,
    pub dir: PathBuf,
    pub db_url: String,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Json,
            dir: PathBuf::from("progress"),
            db_url: "sqlite://progress.sqlite3".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub categories_dir: PathBuf,
    pub progress: ProgressConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            categories_dir: PathBuf::from("categories"),
            progress: ProgressConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML or unknown values.
    pub fn from_toml(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read the config file if one is given, defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&raw, path)?;
        info!(target: "config", path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Apply `QUIZ_*` overrides. `QUIZ_DB_URL` also selects the SQLite backend.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = var("QUIZ_CATEGORIES_DIR") {
            self.categories_dir = PathBuf::from(dir);
        }
        if let Some(dir) = var("QUIZ_PROGRESS_DIR") {
            self.progress.dir = PathBuf::from(dir);
        }
        if let Some(url) = var("QUIZ_DB_URL") {
            self.progress.backend = Backend::Sqlite;
            self.progress.db_url = url;
        }
    }

    /// Apply command-line overrides. `--progress-dir` selects the JSON
    /// backend and `--db` the SQLite one.
    pub fn apply_args(&mut self, args: &PathArgs) {
        if let Some(dir) = &args.categories_dir {
            self.categories_dir.clone_from(dir);
        }
        if let Some(dir) = &args.progress_dir {
            self.progress.backend = Backend::Json;
            self.progress.dir.clone_from(dir);
        }
        if let Some(url) = &args.db {
            self.progress.backend = Backend::Sqlite;
            self.progress.db_url.clone_from(url);
        }
    }

    /// Defaults, then file, then environment, then flags.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file is unusable or the database
    /// URL is blank.
    pub fn resolve(args: &PathArgs) -> Result<Self, ConfigError> {
        let mut config = Self::load(args.config.as_deref())?;
        config.apply_env(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()));
        config.apply_args(args);
        if config.progress.backend == Backend::Sqlite {
            if config.progress.db_url.trim().is_empty() {
                return Err(ConfigError::InvalidDbUrl {
                    raw: config.progress.db_url,
                });
            }
            config.progress.db_url = normalize_sqlite_url(&config.progress.db_url);
        }
        Ok(config)
    }
}

/// Turn a bare path or `sqlite:` URL into an absolute `sqlite://` URL.
pub fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Make sure the database file and its parent directory exist.
///
/// # Errors
///
/// Returns an error if the URL has no file path or the file cannot be created.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ConfigError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ConfigError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_file_means_defaults() {
        let config = AppConfig::from_toml("", Path::new("quiz.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.progress.backend, Backend::Json);
    }

    #[test]
    fn file_values_are_read() {
        let raw = r#"
            categories_dir = "/srv/quiz/categories"

            [progress]
            backend = "sqlite"
            db_url = "sqlite:///srv/quiz/progress.db"
        "#;
        let config = AppConfig::from_toml(raw, Path::new("quiz.toml")).unwrap();
        assert_eq!(config.categories_dir, PathBuf::from("/srv/quiz/categories"));
        assert_eq!(config.progress.backend, Backend::Sqlite);
        assert_eq!(config.progress.dir, PathBuf::from("progress"));
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let raw = "[progress]\nbackend = \"redis\"\n";
        assert!(matches!(
            AppConfig::from_toml(raw, Path::new("quiz.toml")),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn env_then_flags_override() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[
            ("QUIZ_CATEGORIES_DIR", "/data/cats"),
            ("QUIZ_DB_URL", "sqlite:///data/p.db"),
        ]));
        assert_eq!(config.categories_dir, PathBuf::from("/data/cats"));
        assert_eq!(config.progress.backend, Backend::Sqlite);

        let args = PathArgs {
            progress_dir: Some(PathBuf::from("/tmp/progress")),
            ..PathArgs::default()
        };
        config.apply_args(&args);
        assert_eq!(config.progress.backend, Backend::Json);
        assert_eq!(config.progress.dir, PathBuf::from("/tmp/progress"));
        assert_eq!(config.categories_dir, PathBuf::from("/data/cats"));
    }

    #[test]
    fn sqlite_urls_are_normalized() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(normalize_sqlite_url("sqlite:///a/b.db"), "sqlite:///a/b.db");
        assert_eq!(normalize_sqlite_url("sqlite:/a/b.db"), "sqlite:///a/b.db");
        assert_eq!(normalize_sqlite_url("/a/b.db"), "sqlite:///a/b.db");
        assert!(normalize_sqlite_url("b.db").ends_with("/b.db"));
    }

    #[test]
    fn sqlite_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("quiz.db");
        prepare_sqlite_file(&format!("sqlite://{}", path.display())).unwrap();
        assert!(path.exists());
        assert!(prepare_sqlite_file("postgres://x").is_err());
    }
}
