//! Crop image analysis service.
//!
//! There is no real model behind this: results are canned per crop and returned after a delay.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::errors::AppError;
use crate::models::{DiagnosisResult, DiagnosisStatus};

/// Crops offered by the diagnosis selector.
pub const DIAGNOSIS_CROPS: &[&str] = &[
    "Tomato", "Paddy", "Maize", "Banana", "Coconut", "Cotton", "Wheat", "Potato", "Chilli",
    "Onion", "Sugarcane", "Mango",
];

/// Crop whose canned result is used when the requested crop has none.
pub const FALLBACK_CROP: &str = "Tomato";

/// A pre-authored diagnosis for one crop.
#[derive(Debug)]
pub struct CannedDiagnosis {
    pub crop: &'static str,
    pub disease: &'static str,
    pub scientific: &'static str,
    pub confidence: f64,
    pub status: DiagnosisStatus,
    pub advice: &'static [&'static str],
}

impl CannedDiagnosis {
    /// Stamp the canned answer with the analyzed image and completion time.
    pub fn into_result(&self, image: &str, timestamp: &str) -> DiagnosisResult {
        DiagnosisResult {
            disease: self.disease.to_string(),
            scientific: self.scientific.to_string(),
            confidence: self.confidence,
            status: self.status,
            advice: self.advice.iter().map(|a| a.to_string()).collect(),
            timestamp: timestamp.to_string(),
            image: image.to_string(),
        }
    }
}

static EARLY_BLIGHT: CannedDiagnosis = CannedDiagnosis {
    crop: "Tomato",
    disease: "Early Blight",
    scientific: "Alternaria solani",
    confidence: 0.89,
    status: DiagnosisStatus::High,
    advice: &[
        "Remove and destroy infected leaves immediately",
        "Apply copper-based fungicide every 7-10 days",
        "Ensure proper spacing between plants for air circulation",
        "Avoid overhead watering to reduce leaf wetness",
    ],
};

static YELLOW_LEAF_SPOT: CannedDiagnosis = CannedDiagnosis {
    crop: "Banana",
    disease: "Yellow Leaf Spot",
    scientific: "Mycosphaerella musicola",
    confidence: 0.76,
    status: DiagnosisStatus::Medium,
    advice: &[
        "Remove affected leaves to prevent spread",
        "Improve drainage and reduce overhead watering",
        "Apply potassium-rich fertilizer to strengthen plants",
        "Use fungicide if infection is severe",
    ],
};

/// Canned result for a crop.
///
/// Total over all inputs: no crop, or a crop without a canned entry, yields the
/// `FALLBACK_CROP` result.
pub fn canned_diagnosis(crop: Option<&str>) -> &'static CannedDiagnosis {
    match crop.unwrap_or(FALLBACK_CROP) {
        "Banana" => &YELLOW_LEAF_SPOT,
        _ => &EARLY_BLIGHT,
    }
}

/// Something that turns a crop photo into a diagnosis.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, crop: Option<&str>, image: &str) -> Result<DiagnosisResult, AppError>;
}

/// Analyzer answering from the canned table after a fixed delay.
pub struct CannedAnalyzer {
    delay: Duration,
}

impl CannedAnalyzer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl Analyzer for CannedAnalyzer {
    async fn analyze(&self, crop: Option<&str>, image: &str) -> Result<DiagnosisResult, AppError> {
        tokio::time::sleep(self.delay).await;

        let canned = canned_diagnosis(crop);
        if crop != Some(canned.crop) {
            tracing::debug!(
                "No canned diagnosis for {:?}, using {}",
                crop,
                canned.crop
            );
        }

        Ok(canned.into_result(image, &Utc::now().to_rfc3339()))
    }
}
