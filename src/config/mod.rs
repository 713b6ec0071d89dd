use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Deserializer, Serialize};

use crate::model::Color;

pub mod themes;

pub use themes::{Layout, Theme};

const APP_DOMAIN: &str = "io";
const APP_ORG: &str = "TaskNotes";
const APP_NAME: &str = "tasknotes";

/// Keeps config and data together under one directory.
pub const HOME_ENV: &str = "TASKNOTES_HOME";
/// Path of the config file itself.
pub const CONFIG_ENV: &str = "TASKNOTES_CONFIG";
pub const DATA_ENV: &str = "TASKNOTES_DATA";

const CONFIG_FILE_NAME: &str = "config.toml";
const DATABASE_FILE_NAME: &str = "store.db";
const CONFIG_HEADER: &str = "# tasknotes settings. Notes and the chosen theme live in the store, not here.\n\n";

pub const DEFAULT_NOTES_KEY: &str = "tasknotes.notes";
pub const DEFAULT_THEME_KEY: &str = "tasknotes.theme";

pub struct ConfigLoader {
    paths: ConfigPaths,
}

impl ConfigLoader {
    pub fn discover() -> Result<Self> {
        let paths = ConfigPaths::discover()?;
        Ok(Self { paths })
    }

    pub fn with_paths(paths: ConfigPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    /// Loads the config, writing a commented default file on first run.
    pub fn load_or_init(&self) -> Result<AppConfig> {
        self.paths.ensure_directories()?;
        match fs::read_to_string(&self.paths.config_file) {
            Ok(raw) => self.parse(&raw),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                let cfg = AppConfig::resolved(&self.paths);
                self.write_config(&cfg)?;
                tracing::info!(path = %self.paths.config_file.display(), "wrote default config");
                Ok(cfg)
            }
            Err(err) => Err(err)
                .with_context(|| format!("reading config {}", self.paths.config_file.display())),
        }
    }

    pub fn load(&self) -> Result<AppConfig> {
        let raw = fs::read_to_string(&self.paths.config_file)
            .with_context(|| format!("reading config {}", self.paths.config_file.display()))?;
        self.parse(&raw)
    }

    fn parse(&self, raw: &str) -> Result<AppConfig> {
        let mut cfg: AppConfig = toml::from_str(raw)
            .with_context(|| format!("parsing config {}", self.paths.config_file.display()))?;
        cfg.post_load(&self.paths);
        Ok(cfg)
    }

    fn write_config(&self, cfg: &AppConfig) -> Result<()> {
        let body = toml::to_string_pretty(cfg).context("serializing default config")?;
        fs::write(&self.paths.config_file, format!("{CONFIG_HEADER}{body}"))
            .with_context(|| format!("writing config {}", self.paths.config_file.display()))
    }
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
    pub data_dir: PathBuf,
    pub database_path: PathBuf,
}

impl ConfigPaths {
    /// Resolves paths from `TASKNOTES_HOME` when set, otherwise from the XDG
    /// project directories with `TASKNOTES_CONFIG` / `TASKNOTES_DATA` overrides.
    pub fn discover() -> Result<Self> {
        if let Some(home) = env::var_os(HOME_ENV).map(PathBuf::from) {
            return Ok(Self::under_home(&home));
        }

        let project_dirs = ProjectDirs::from(APP_DOMAIN, APP_ORG, APP_NAME)
            .context("resolving XDG project directories")?;

        let config_file = env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| project_dirs.config_dir().join(CONFIG_FILE_NAME));
        let config_dir = config_file
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| project_dirs.config_dir().to_path_buf());
        let data_dir = env::var_os(DATA_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| project_dirs.data_dir().to_path_buf());

        Ok(Self::rooted(config_dir, config_file, data_dir))
    }

    /// `<home>/config.toml` and `<home>/store.db`.
    pub fn under_home(home: &Path) -> Self {
        Self::rooted(
            home.to_path_buf(),
            home.join(CONFIG_FILE_NAME),
            home.to_path_buf(),
        )
    }

    pub fn rooted(config_dir: PathBuf, config_file: PathBuf, data_dir: PathBuf) -> Self {
        let database_path = data_dir.join(DATABASE_FILE_NAME);
        Self {
            config_dir,
            config_file,
            data_dir,
            database_path,
        }
    }

    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [&self.config_dir, &self.data_dir] {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating application directory {}", dir.display()))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Theme used until one has been saved in the store.
    #[serde(deserialize_with = "theme_or_light")]
    pub default_theme: Theme,
    pub default_layout: Layout,
    pub default_color: Color,
    pub storage: StorageOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_theme: Theme::Light,
            default_layout: Layout::Grid,
            default_color: Color::White,
            storage: StorageOptions::default(),
        }
    }
}

impl AppConfig {
    fn resolved(paths: &ConfigPaths) -> Self {
        let mut cfg = Self::default();
        cfg.post_load(paths);
        cfg
    }

    fn post_load(&mut self, paths: &ConfigPaths) {
        self.storage.resolve(paths);
        if self.storage.notes_key == self.storage.theme_key {
            tracing::warn!(key = %self.storage.notes_key, "notes and theme share a key, using defaults");
            self.storage.notes_key = DEFAULT_NOTES_KEY.to_owned();
            self.storage.theme_key = DEFAULT_THEME_KEY.to_owned();
        }
    }
}

/// Unknown theme names fall back to light instead of rejecting the file.
fn theme_or_light<'de, D>(deserializer: D) -> std::result::Result<Theme, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.parse().unwrap_or_else(|_| {
        tracing::warn!(theme = %raw, "unknown theme in config, falling back to light");
        Theme::Light
    }))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageOptions {
    #[serde(skip)]
    pub database_path: PathBuf,
    pub notes_key: String,
    pub theme_key: String,
    /// Upper bound on the bytes stored per key, unlimited when absent.
    pub quota_bytes: Option<usize>,
}

impl Default for StorageOptions {
    fn default() -> Self {
        Self {
            database_path: PathBuf::new(),
            notes_key: DEFAULT_NOTES_KEY.to_owned(),
            theme_key: DEFAULT_THEME_KEY.to_owned(),
            quota_bytes: None,
        }
    }
}

impl StorageOptions {
    fn resolve(&mut self, paths: &ConfigPaths) {
        if self.database_path.as_os_str().is_empty() {
            self.database_path = paths.database_path.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn temp_paths(root: &TempDir) -> ConfigPaths {
        ConfigPaths::under_home(root.path())
    }

    #[test]
    fn first_run_writes_defaults() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let loader = ConfigLoader::with_paths(temp_paths(&temp));
        let cfg = loader.load_or_init()?;
        let written = fs::read_to_string(&loader.paths().config_file)?;
        assert!(written.starts_with("# tasknotes settings"));
        assert_eq!(cfg.default_theme, Theme::Light);
        assert_eq!(cfg.storage.notes_key, DEFAULT_NOTES_KEY);
        assert_eq!(cfg.storage.database_path, loader.paths().database_path);
        Ok(())
    }

    #[test]
    fn unknown_theme_falls_back_to_light() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let paths = temp_paths(&temp);
        paths.ensure_directories()?;
        fs::write(
            &paths.config_file,
            "default_theme = \"neon\"\ndefault_layout = \"list\"\ndefault_color = \"pink\"\n",
        )?;
        let cfg = ConfigLoader::with_paths(paths).load()?;
        assert_eq!(cfg.default_theme, Theme::Light);
        assert_eq!(cfg.default_layout, Layout::List);
        assert_eq!(cfg.default_color, Color::Pink);
        Ok(())
    }

    #[test]
    fn written_defaults_load_back() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let loader = ConfigLoader::with_paths(temp_paths(&temp));
        loader.load_or_init()?;
        let cfg = loader.load()?;
        assert_eq!(cfg.default_theme, Theme::Light);
        assert_eq!(cfg.default_layout, Layout::Grid);
        assert_eq!(cfg.storage.database_path, temp.path().join("store.db"));
        Ok(())
    }

    #[test]
    fn colliding_store_keys_are_reset() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let paths = temp_paths(&temp);
        paths.ensure_directories()?;
        fs::write(
            &paths.config_file,
            "default_theme = \"dark\"\n[storage]\nnotes_key = \"k\"\ntheme_key = \"k\"\n",
        )?;
        let cfg = ConfigLoader::with_paths(paths).load()?;
        assert_eq!(cfg.default_theme, Theme::Dark);
        assert_eq!(cfg.storage.notes_key, DEFAULT_NOTES_KEY);
        assert_eq!(cfg.storage.theme_key, DEFAULT_THEME_KEY);
        Ok(())
    }
}
