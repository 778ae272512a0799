use crate::app_dirs::AppDirs;
use crate::corpus::{WordCorpus, DEFAULT_LANGUAGE};
use crate::error::{Error, Result};
use crate::session::{SessionConfig, SessionLength, DEFAULT_WORD_COUNT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "duration_secs")]
    pub duration: SessionLength,
    pub word_count: usize,
    pub live_score: bool,
    pub language: String,
    pub words_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duration: SessionLength::default(),
            word_count: DEFAULT_WORD_COUNT,
            live_score: false,
            language: DEFAULT_LANGUAGE.to_string(),
            words_file: None,
        }
    }
}

impl Config {
    /// A zero word count from the file is raised to one word.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            word_count: self.word_count.max(1),
            length: self.duration,
            live_score: self.live_score,
        }
    }

    /// Word list named by the config: the words file when set, else the embedded language.
    pub fn load_corpus(&self) -> Result<WordCorpus> {
        match &self.words_file {
            Some(path) => WordCorpus::from_path(path),
            None => WordCorpus::embedded(&self.language),
        }
    }

    /// Copies the preferences a user can change while the app runs.
    pub fn remember(&mut self, length: SessionLength, live_score: bool) {
        self.duration = length;
        self.live_score = live_score;
    }
}

pub trait ConfigStore {
    /// Stored config, or defaults when there is none or it cannot be read.
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("keysprint_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when no config file exists yet.
    pub fn try_load(&self) -> Result<Option<Config>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice::<Config>(&bytes)
            .map(Some)
            .map_err(|e| Error::Config {
                path: self.path.clone(),
                reason: e.to_string(),
            })
    }

    /// Writes the session preferences into the file as it is on disk now.
    ///
    /// A file that exists but cannot be parsed is left untouched and the
    /// parse error is returned.
    pub fn save_preferences(&self, length: SessionLength, live_score: bool) -> Result<()> {
        let mut cfg = self.try_load()?.unwrap_or_default();
        cfg.remember(length, live_score);
        self.save(&cfg)
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match self.try_load() {
            Ok(Some(cfg)) => cfg,
            Ok(None) => Config::default(),
            Err(err) => {
                tracing::warn!(%err, "falling back to default config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(|e| Error::Config {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
