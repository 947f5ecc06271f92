//! Session persistence in a JSON file
//!
//! The file is one object holding the token and the serialized user under
//! the configured key names, mirroring the browser's two storage keys.

use grievance_client::{SessionRepository, StoredSession};
use grievance_common::{ApiConfig, GrievanceError, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub const SESSION_FILE_NAME: &str = "session.json";

/// `$HOME/.grievance/session.json`, or `./.grievance/session.json` without a home.
pub fn default_session_path() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".grievance")
        .join(SESSION_FILE_NAME)
}

#[derive(Debug, Clone)]
pub struct FileSessionRepository {
    path: PathBuf,
    token_key: String,
    user_key: String,
}

impl FileSessionRepository {
    pub fn new(path: impl Into<PathBuf>, config: &ApiConfig) -> Self {
        Self {
            path: path.into(),
            token_key: config.token_key.clone(),
            user_key: config.user_key.clone(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_object(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(&self.path)?;
        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(map),
            _ => Err(GrievanceError::Storage(format!(
                "{} is not a session object",
                self.path.display()
            ))),
        }
    }
}

impl SessionRepository for FileSessionRepository {
    fn load(&self) -> Result<StoredSession> {
        let map = self.read_object()?;
        let field = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);
        Ok(StoredSession {
            token: field(&self.token_key),
            user: field(&self.user_key),
        })
    }

    fn save(&self, token: &str, user_json: &str) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let mut map = Map::new();
        map.insert(self.token_key.clone(), Value::String(token.to_string()));
        map.insert(self.user_key.clone(), Value::String(user_json.to_string()));
        fs::write(&self.path, serde_json::to_string_pretty(&Value::Object(map))?)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repository(dir: &tempfile::TempDir) -> FileSessionRepository {
        FileSessionRepository::new(dir.path().join("nested").join(SESSION_FILE_NAME), &ApiConfig::default())
    }

    #[test]
    fn test_missing_file_is_empty_session() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repository(&dir);
        assert_eq!(repo.load().unwrap(), StoredSession::default());
        repo.clear().unwrap();
    }

    #[test]
    fn test_save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repository(&dir);
        repo.save("tok", r#"{"userId":1}"#).unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(repo.path()).unwrap()).unwrap();
        assert_eq!(raw["accessToken"], "tok");
        assert_eq!(raw["auth_user"], r#"{"userId":1}"#);

        let loaded = repo.load().unwrap();
        assert_eq!(loaded.token.as_deref(), Some("tok"));
        assert_eq!(loaded.user.as_deref(), Some(r#"{"userId":1}"#));

        repo.clear().unwrap();
        assert!(!repo.path().exists());
        assert_eq!(repo.load().unwrap(), StoredSession::default());
    }

    #[test]
    fn test_rejects_non_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SESSION_FILE_NAME);
        fs::write(&path, "[1, 2]").unwrap();
        let repo = FileSessionRepository::new(path, &ApiConfig::default());
        assert!(matches!(repo.load(), Err(GrievanceError::Storage(_))));
    }
}
