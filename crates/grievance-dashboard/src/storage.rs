//! Session persistence in `localStorage`

use grievance_client::{SessionRepository, StoredSession};
use grievance_common::{ApiConfig, GrievanceError, Result};
use web_sys::{window, Storage};

/// Keeps the access token and the serialized user under two keys.
#[derive(Debug, Clone)]
pub struct BrowserSessionRepository {
    token_key: String,
    user_key: String,
}

impl BrowserSessionRepository {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            token_key: config.token_key.clone(),
            user_key: config.user_key.clone(),
        }
    }

    fn storage(&self) -> Result<Storage> {
        window()
            .and_then(|win| win.local_storage().ok().flatten())
            .ok_or_else(|| GrievanceError::Storage("localStorage is unavailable".to_string()))
    }
}

fn storage_error(action: &str, key: &str) -> GrievanceError {
    GrievanceError::Storage(format!("failed to {} {}", action, key))
}

impl SessionRepository for BrowserSessionRepository {
    fn load(&self) -> Result<StoredSession> {
        let storage = self.storage()?;
        Ok(StoredSession {
            token: storage.get_item(&self.token_key).ok().flatten(),
            user: storage.get_item(&self.user_key).ok().flatten(),
        })
    }

    fn save(&self, token: &str, user_json: &str) -> Result<()> {
        let storage = self.storage()?;
        storage
            .set_item(&self.token_key, token)
            .map_err(|_| storage_error("write", &self.token_key))?;
        storage
            .set_item(&self.user_key, user_json)
            .map_err(|_| storage_error("write", &self.user_key))
    }

    fn clear(&self) -> Result<()> {
        let storage = self.storage()?;
        storage
            .remove_item(&self.token_key)
            .map_err(|_| storage_error("remove", &self.token_key))?;
        storage
            .remove_item(&self.user_key)
            .map_err(|_| storage_error("remove", &self.user_key))
    }
}
