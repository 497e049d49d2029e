//! Last-seen signal timestamps persisted as a JSON object.

use sigscan_core::error::SinkError;
use sigscan_core::traits::LastSeenStore;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// `{"SYMBOL": <timestamp ms>, ...}` in a single file.
#[derive(Debug, Clone)]
pub struct JsonLastSeenStore {
    path: PathBuf,
}

impl JsonLastSeenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SinkError {
        SinkError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl LastSeenStore for JsonLastSeenStore {
    /// A missing file is an empty map.
    fn load(&self) -> Result<HashMap<String, i64>, SinkError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no last-seen file yet");
                return Ok(HashMap::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }

        serde_json::from_str(&content).map_err(|e| SinkError::Serialization(e.to_string()))
    }

    /// Written to a sibling temp file and renamed into place.
    fn save(&self, last_seen: &HashMap<String, i64>) -> Result<(), SinkError> {
        // Sorted keys keep the file diffable between rounds
        let ordered: std::collections::BTreeMap<_, _> = last_seen.iter().collect();
        let json = serde_json::to_string_pretty(&ordered)
            .map_err(|e| SinkError::Serialization(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("sigscan-last-seen-{}.json", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let store = JsonLastSeenStore::new(temp_path());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path();
        let store = JsonLastSeenStore::new(&path);

        let mut map = HashMap::new();
        map.insert("AAPL".to_string(), 1_705_314_600_000);
        map.insert("BTC-USDT".to_string(), 1_705_315_500_000);
        store.save(&map).unwrap();

        assert_eq!(store.load().unwrap(), map);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_corrupt_file() {
        let path = temp_path();
        std::fs::write(&path, "{not json").unwrap();

        let store = JsonLastSeenStore::new(&path);
        assert!(matches!(store.load(), Err(SinkError::Serialization(_))));
        std::fs::remove_file(path).ok();
    }
}
