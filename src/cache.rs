use std::fs;
use std::path::{Path, PathBuf};

use blake3::Hasher;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

const CACHE_DIR_NAME: &str = "backlog-loader";
const CACHE_FILE_NAME: &str = "draft_cache.json";
const CACHE_LIMIT: usize = 64;

#[derive(Default, Serialize, Deserialize)]
struct CacheFile {
    entries: Vec<CacheEntry>,
}

#[derive(Serialize, Deserialize, Clone)]
struct CacheEntry {
    key: String,
    completion: String,
}

/// Completions already produced for a given model and prompt, so a re-run
/// drafts the same ticket text instead of asking the model again.
pub struct DraftCache {
    file_path: PathBuf,
    file: CacheFile,
}

impl DraftCache {
    pub fn default_path() -> AppResult<PathBuf> {
        dirs::cache_dir()
            .map(|dir| dir.join(CACHE_DIR_NAME).join(CACHE_FILE_NAME))
            .ok_or_else(|| {
                AppError::Configuration("unable to locate a user cache directory".to_string())
            })
    }

    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::default_path()?)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        let file = match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str::<CacheFile>(&contents)
                .map_err(|err| AppError::Configuration(format!("invalid cache file: {err}")))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => CacheFile::default(),
            Err(err) => return Err(AppError::Io(err)),
        };

        Ok(Self {
            file_path: path.to_path_buf(),
            file,
        })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.file
            .entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.completion.as_str())
    }

    pub fn insert(&mut self, key: String, completion: &str) {
        self.file.entries.retain(|entry| entry.key != key);
        self.file.entries.push(CacheEntry {
            key,
            completion: completion.to_string(),
        });

        if self.file.entries.len() > CACHE_LIMIT {
            let overflow = self.file.entries.len() - CACHE_LIMIT;
            self.file.entries.drain(0..overflow);
        }
    }

    pub fn save(&self) -> AppResult<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(&self.file)
            .map_err(|err| AppError::Configuration(format!("failed to write cache: {err}")))?;
        fs::write(&self.file_path, data)?;
        Ok(())
    }

    pub fn compute_key(model: &str, prompt: &str) -> String {
        let mut hasher = Hasher::new();
        hasher.update(model.as_bytes());
        hasher.update(&[0]);
        hasher.update(prompt.as_bytes());
        hasher.finalize().to_hex().to_string()
    }
}
