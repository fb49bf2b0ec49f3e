use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Key under which the finalized answer map is handed off to the results
/// view.
pub const QUIZ_RESULT_KEY: &str = "cognovoidQuizData";

/// Small file-backed key-value store: one JSON document per key, kept in
/// the configured data directory so a separate results view can load it.
#[derive(Debug, Clone)]
pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn put(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating data dir {}", self.dir.display()))?;
        let path = self.path(key);
        let body = serde_json::to_string_pretty(value)?;
        fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }
        let body =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let value = serde_json::from_str(&body)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(Some(value))
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn put_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path().join("data"));

        let value = json!({ "sleep": 7.0, "stress": 4.0 });
        store.put(QUIZ_RESULT_KEY, &value).unwrap();
        assert_eq!(store.get(QUIZ_RESULT_KEY).unwrap(), Some(value));
    }

    #[test]
    fn missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        assert_eq!(store.get("nothing").unwrap(), None);
    }

    #[test]
    fn put_overwrites_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        store.put(QUIZ_RESULT_KEY, &json!({"sleep": 2.0})).unwrap();
        store.put(QUIZ_RESULT_KEY, &json!({"sleep": 8.0})).unwrap();
        assert_eq!(
            store.get(QUIZ_RESULT_KEY).unwrap(),
            Some(json!({"sleep": 8.0}))
        );
    }
}
