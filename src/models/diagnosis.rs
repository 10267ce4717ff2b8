//! Diagnosis result model matching the frontend DiagnosisResult interface.

use serde::{Deserialize, Serialize};

/// Severity band of a detected disease.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosisStatus {
    High,
    Medium,
    Low,
}

/// Outcome of a crop image analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosisResult {
    pub disease: String,
    pub scientific: String,
    /// Model confidence in `[0, 1]`
    pub confidence: f64,
    pub status: DiagnosisStatus,
    pub advice: Vec<String>,
    /// ISO-8601 completion time
    pub timestamp: String,
    /// Reference to the analyzed image (data URL or upload handle)
    pub image: String,
}
