//! Diagnosis state machine.
//!
//! `reduce` is pure: it never performs I/O and a rejected event leaves the session untouched.

use serde::Serialize;

use crate::errors::AppError;
use crate::models::DiagnosisResult;

/// Where a diagnosis session currently is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum DiagnosisState {
    Idle,
    ImageSelected {
        image: String,
    },
    Analyzing {
        image: String,
        crop: String,
    },
    /// Idle with the image cleared and the newest result on display.
    ResultAvailable {
        latest: Box<DiagnosisResult>,
    },
}

impl DiagnosisState {
    pub fn name(&self) -> &'static str {
        match self {
            DiagnosisState::Idle => "idle",
            DiagnosisState::ImageSelected { .. } => "imageSelected",
            DiagnosisState::Analyzing { .. } => "analyzing",
            DiagnosisState::ResultAvailable { .. } => "resultAvailable",
        }
    }
}

/// Inputs that move a session between states.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosisEvent {
    CropSelected(String),
    ImageSelected(String),
    ImageCleared,
    AnalyzeRequested,
    AnalysisCompleted(DiagnosisResult),
    AnalysisFailed(String),
    AnalysisCancelled,
}

/// A diagnosis screen: state, crop selector and the results shown so far.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisSession {
    #[serde(flatten)]
    pub state: DiagnosisState,
    pub selected_crop: Option<String>,
    /// Newest first
    pub results: Vec<DiagnosisResult>,
}

impl Default for DiagnosisSession {
    fn default() -> Self {
        Self {
            state: DiagnosisState::Idle,
            selected_crop: None,
            results: Vec::new(),
        }
    }
}

impl DiagnosisSession {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Apply one event to a session, returning the next session.
pub fn reduce(
    session: &DiagnosisSession,
    event: DiagnosisEvent,
) -> Result<DiagnosisSession, AppError> {
    let mut next = session.clone();

    match (&session.state, event) {
        (DiagnosisState::Analyzing { .. }, DiagnosisEvent::AnalysisCompleted(result)) => {
            next.results.insert(0, result.clone());
            next.state = DiagnosisState::ResultAvailable {
                latest: Box::new(result),
            };
        }
        (
            DiagnosisState::Analyzing { .. },
            DiagnosisEvent::AnalysisFailed(_) | DiagnosisEvent::AnalysisCancelled,
        ) => {
            next.state = DiagnosisState::Idle;
        }
        (DiagnosisState::Analyzing { .. }, event) => {
            return Err(AppError::InvalidTransition(format!(
                "Analysis in progress, cannot apply {}",
                event_name(&event)
            )));
        }

        (_, DiagnosisEvent::CropSelected(crop)) => {
            let crop = crop.trim();
            next.selected_crop = (!crop.is_empty()).then(|| crop.to_string());
        }
        (_, DiagnosisEvent::ImageSelected(image)) => {
            if image.trim().is_empty() {
                return Err(AppError::Validation("Image reference is empty".to_string()));
            }
            next.state = DiagnosisState::ImageSelected { image };
        }
        (DiagnosisState::ImageSelected { .. }, DiagnosisEvent::ImageCleared) => {
            next.state = DiagnosisState::Idle;
        }
        (_, DiagnosisEvent::ImageCleared) => {}
        (DiagnosisState::ImageSelected { image }, DiagnosisEvent::AnalyzeRequested) => {
            let Some(crop) = session.selected_crop.clone() else {
                return Err(AppError::Validation(
                    "Please select a crop first".to_string(),
                ));
            };
            next.state = DiagnosisState::Analyzing {
                image: image.clone(),
                crop,
            };
        }
        (_, DiagnosisEvent::AnalyzeRequested) => {
            return Err(AppError::Validation(
                "Please select an image first".to_string(),
            ));
        }
        (state, event) => {
            return Err(AppError::InvalidTransition(format!(
                "Cannot apply {} while {}",
                event_name(&event),
                state.name()
            )));
        }
    }

    Ok(next)
}

fn event_name(event: &DiagnosisEvent) -> &'static str {
    match event {
        DiagnosisEvent::CropSelected(_) => "crop selection",
        DiagnosisEvent::ImageSelected(_) => "image selection",
        DiagnosisEvent::ImageCleared => "image removal",
        DiagnosisEvent::AnalyzeRequested => "analyze",
        DiagnosisEvent::AnalysisCompleted(_) => "analysis result",
        DiagnosisEvent::AnalysisFailed(_) => "analysis failure",
        DiagnosisEvent::AnalysisCancelled => "analysis cancellation",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnosis::canned_diagnosis;

    fn with_image() -> DiagnosisSession {
        reduce(
            &DiagnosisSession::new(),
            DiagnosisEvent::ImageSelected("data:image/jpeg;base64,AAAA".to_string()),
        )
        .unwrap()
    }

    fn analyzing() -> DiagnosisSession {
        let session = reduce(
            &with_image(),
            DiagnosisEvent::CropSelected("Tomato".to_string()),
        )
        .unwrap();
        reduce(&session, DiagnosisEvent::AnalyzeRequested).unwrap()
    }

    fn result() -> DiagnosisResult {
        canned_diagnosis(Some("Tomato")).into_result("img", "2024-06-01T10:00:00Z")
    }

    #[test]
    fn test_analyze_without_crop_is_rejected() {
        let session = with_image();
        let err = reduce(&session, DiagnosisEvent::AnalyzeRequested).unwrap_err();

        assert_eq!(
            err,
            AppError::Validation("Please select a crop first".to_string())
        );
        assert_eq!(session.state.name(), "imageSelected");
    }

    #[test]
    fn test_analyze_without_image_is_rejected() {
        let session = reduce(
            &DiagnosisSession::new(),
            DiagnosisEvent::CropSelected("Tomato".to_string()),
        )
        .unwrap();
        let err = reduce(&session, DiagnosisEvent::AnalyzeRequested).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_analyze_moves_image_and_crop_into_analyzing() {
        let session = analyzing();
        assert_eq!(
            session.state,
            DiagnosisState::Analyzing {
                image: "data:image/jpeg;base64,AAAA".to_string(),
                crop: "Tomato".to_string(),
            }
        );
    }

    #[test]
    fn test_completion_prepends_result_and_clears_image() {
        let first = reduce(&analyzing(), DiagnosisEvent::AnalysisCompleted(result())).unwrap();
        assert_eq!(first.state.name(), "resultAvailable");
        assert_eq!(first.results.len(), 1);

        // A second diagnosis in the same session keeps the first one.
        let again = reduce(
            &first,
            DiagnosisEvent::ImageSelected("second".to_string()),
        )
        .unwrap();
        let again = reduce(&again, DiagnosisEvent::AnalyzeRequested).unwrap();
        let mut newer = result();
        newer.image = "second".to_string();
        let second = reduce(&again, DiagnosisEvent::AnalysisCompleted(newer)).unwrap();

        assert_eq!(second.results.len(), 2);
        assert_eq!(second.results[0].image, "second");
        assert_eq!(second.results[1].image, "img");
    }

    #[test]
    fn test_failure_and_cancel_return_to_idle() {
        let failed = reduce(
            &analyzing(),
            DiagnosisEvent::AnalysisFailed("timeout".to_string()),
        )
        .unwrap();
        assert_eq!(failed.state, DiagnosisState::Idle);
        assert!(failed.results.is_empty());

        let cancelled = reduce(&analyzing(), DiagnosisEvent::AnalysisCancelled).unwrap();
        assert_eq!(cancelled.state, DiagnosisState::Idle);
    }

    #[test]
    fn test_inputs_locked_while_analyzing() {
        let session = analyzing();
        for event in [
            DiagnosisEvent::CropSelected("Banana".to_string()),
            DiagnosisEvent::ImageSelected("other".to_string()),
            DiagnosisEvent::ImageCleared,
            DiagnosisEvent::AnalyzeRequested,
        ] {
            let err = reduce(&session, event).unwrap_err();
            assert!(matches!(err, AppError::InvalidTransition(_)));
        }
    }

    #[test]
    fn test_completion_outside_analyzing_is_invalid() {
        let err = reduce(&with_image(), DiagnosisEvent::AnalysisCompleted(result())).unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));
    }

    #[test]
    fn test_clear_image() {
        let cleared = reduce(&with_image(), DiagnosisEvent::ImageCleared).unwrap();
        assert_eq!(cleared.state, DiagnosisState::Idle);

        let idle = reduce(&DiagnosisSession::new(), DiagnosisEvent::ImageCleared).unwrap();
        assert_eq!(idle, DiagnosisSession::new());
    }

    #[test]
    fn test_blank_crop_deselects() {
        let session = reduce(&with_image(), DiagnosisEvent::CropSelected("Tomato".into())).unwrap();
        let session = reduce(&session, DiagnosisEvent::CropSelected("  ".into())).unwrap();
        assert_eq!(session.selected_crop, None);
    }
}
