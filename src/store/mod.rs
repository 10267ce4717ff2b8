//! Local activity store.
//!
//! Typed profile and history records layered over a single injected key-value backend.

mod history;
mod profile;

pub use history::*;
pub use profile::*;

use std::sync::Arc;

use crate::db::KvStore;
use crate::errors::AppError;

/// Key holding the serialized onboarding profile.
pub const PROFILE_KEY: &str = "kisan_profile";
/// Key holding the serialized history, newest entry first.
pub const HISTORY_KEY: &str = "kisan_history";

/// Profile and history stores sharing one backend.
#[derive(Clone)]
pub struct ActivityStore {
    pub profile: ProfileStore,
    pub history: HistoryStore,
    kv: Arc<dyn KvStore>,
}

impl ActivityStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self {
            profile: ProfileStore::new(kv.clone()),
            history: HistoryStore::new(kv.clone()),
            kv,
        }
    }

    /// Wipe every stored record. The next request is treated as a new user.
    pub async fn logout(&self) -> Result<(), AppError> {
        self.kv.clear().await?;
        tracing::info!("Local store wiped on logout");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryKvStore;
    use crate::models::{ActivityType, HistoryEntry, UserProfile};

    #[tokio::test]
    async fn test_logout_wipes_profile_and_history() {
        let store = ActivityStore::new(Arc::new(MemoryKvStore::new()));
        let profile: UserProfile = serde_json::from_value(serde_json::json!({
            "name": "Asha",
            "mobile": "111111",
            "district": "Pune",
            "state": "Maharashtra",
            "mainCrops": ["Onion"]
        }))
        .unwrap();

        store.profile.save_profile(&profile).await.unwrap();
        store
            .history
            .save_to_history(HistoryEntry::new(
                ActivityType::Chat,
                "hello",
                "hi",
                serde_json::Value::Null,
            ))
            .await
            .unwrap();

        store.logout().await.unwrap();

        assert!(store.profile.get_profile().await.is_none());
        assert!(store.history.get_history().await.is_empty());
    }
}
