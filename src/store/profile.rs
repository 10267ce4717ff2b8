//! Profile store: the single onboarding record.

use std::sync::Arc;

use super::PROFILE_KEY;
use crate::db::KvStore;
use crate::errors::AppError;
use crate::models::UserProfile;

#[derive(Clone)]
pub struct ProfileStore {
    kv: Arc<dyn KvStore>,
}

impl ProfileStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Persist the full profile, replacing any previous one.
    pub async fn save_profile(&self, profile: &UserProfile) -> Result<(), AppError> {
        let json = serde_json::to_string(profile)?;
        self.kv.set(PROFILE_KEY, &json).await
    }

    /// Stored profile, or `None` when never saved, wiped, or unreadable.
    pub async fn get_profile(&self) -> Option<UserProfile> {
        let raw = match self.kv.get(PROFILE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Profile unavailable, treating as absent: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!("Stored profile is corrupt, treating as absent: {}", e);
                None
            }
        }
    }

    /// Whether onboarding has been completed.
    pub async fn has_profile(&self) -> bool {
        self.get_profile().await.is_some()
    }
}
