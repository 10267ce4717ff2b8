//! User profile model matching the frontend UserProfile interface.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Interface language chosen during onboarding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    Hindi,
    Kannada,
    Tamil,
    Telugu,
    Marathi,
}

/// The onboarding record identifying a returning user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub mobile: String,
    #[serde(default)]
    pub village: String,
    pub district: String,
    pub state: String,
    #[serde(default)]
    pub land_size: String,
    pub main_crops: BTreeSet<String>,
    #[serde(default)]
    pub language: Language,
    #[serde(default = "default_use_demo_data")]
    pub use_demo_data: bool,
}

fn default_use_demo_data() -> bool {
    true
}

impl UserProfile {
    /// Check the profile the way the onboarding wizard checks each of its three steps.
    ///
    /// Returns the message of the first step that is incomplete.
    pub fn validate(&self) -> Result<(), AppError> {
        if is_blank(&self.name) || is_blank(&self.mobile) {
            return Err(AppError::Validation("Please fill all fields".to_string()));
        }
        if is_blank(&self.state) || is_blank(&self.district) {
            return Err(AppError::Validation("Please select location".to_string()));
        }
        if self.main_crops.iter().all(|crop| is_blank(crop)) {
            return Err(AppError::Validation(
                "Please select at least one crop".to_string(),
            ));
        }
        Ok(())
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
