//! Diagnosis session driver.
//!
//! Sessions live in memory for as long as the frontend screen is open. The session map is
//! never locked across the analysis await; closing a session cancels its pending analysis.
//! A screen can disappear without closing its session, so idle sessions are evicted when
//! new ones open.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{watch, Mutex};

use super::{reduce, Analyzer, DiagnosisEvent, DiagnosisSession, DiagnosisState};
use crate::errors::AppError;
use crate::models::{ActivityType, DiagnosisResult, HistoryEntry};
use crate::store::HistoryStore;

/// One-shot cancellation signal shared between a session and its running analysis.
#[derive(Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for CancelToken {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once `cancel` has been called.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

/// Sessions untouched for this long are dropped when another session opens.
pub const SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Most sessions kept open at once. Sessions with a running analysis are never evicted.
pub const MAX_SESSIONS: usize = 64;

struct SessionSlot {
    session: DiagnosisSession,
    pending: Option<CancelToken>,
    last_used: Instant,
}

/// Registry of open diagnosis sessions.
pub struct DiagnosisFlow {
    analyzer: Arc<dyn Analyzer>,
    history: HistoryStore,
    sessions: Mutex<HashMap<String, SessionSlot>>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl DiagnosisFlow {
    pub fn new(analyzer: Arc<dyn Analyzer>, history: HistoryStore) -> Self {
        Self {
            analyzer,
            history,
            sessions: Mutex::new(HashMap::new()),
            idle_timeout: SESSION_IDLE_TIMEOUT,
            max_sessions: MAX_SESSIONS,
        }
    }

    /// Override the eviction limits.
    pub fn with_limits(mut self, idle_timeout: Duration, max_sessions: usize) -> Self {
        self.idle_timeout = idle_timeout;
        self.max_sessions = max_sessions.max(1);
        self
    }

    /// Open a fresh session in the idle state.
    pub async fn open_session(&self) -> (String, DiagnosisSession) {
        let id = uuid::Uuid::new_v4().to_string();
        let session = DiagnosisSession::new();

        let mut sessions = self.sessions.lock().await;
        self.evict_stale(&mut sessions);
        sessions.insert(
            id.clone(),
            SessionSlot {
                session: session.clone(),
                pending: None,
                last_used: Instant::now(),
            },
        );
        tracing::debug!("Opened diagnosis session {} ({} open)", id, sessions.len());

        (id, session)
    }

    pub async fn get_session(&self, id: &str) -> Result<DiagnosisSession, AppError> {
        let mut sessions = self.sessions.lock().await;
        let slot = sessions.get_mut(id).ok_or_else(|| not_found(id))?;

        slot.last_used = Instant::now();
        Ok(slot.session.clone())
    }

    /// Apply a user input event (crop or image change) to a session.
    pub async fn apply(
        &self,
        id: &str,
        event: DiagnosisEvent,
    ) -> Result<DiagnosisSession, AppError> {
        let mut sessions = self.sessions.lock().await;
        let slot = sessions.get_mut(id).ok_or_else(|| not_found(id))?;

        slot.last_used = Instant::now();
        slot.session = reduce(&slot.session, event)?;
        Ok(slot.session.clone())
    }

    /// Run the analysis for a session and record the result in history.
    ///
    /// Rejected without side effects when the session has no image or no crop. If the
    /// session is closed while the analysis runs, the result is discarded and nothing
    /// is written.
    pub async fn analyze(&self, id: &str) -> Result<DiagnosisResult, AppError> {
        let (image, crop, token) = {
            let mut sessions = self.sessions.lock().await;
            let slot = sessions.get_mut(id).ok_or_else(|| not_found(id))?;

            let next = reduce(&slot.session, DiagnosisEvent::AnalyzeRequested)?;
            let DiagnosisState::Analyzing { image, crop } = &next.state else {
                return Err(AppError::Internal(
                    "Analyze did not enter the analyzing state".to_string(),
                ));
            };
            let (image, crop) = (image.clone(), crop.clone());

            let token = CancelToken::new();
            slot.session = next;
            slot.pending = Some(token.clone());
            (image, crop, token)
        };

        tracing::info!("Analyzing {} image for session {}", crop, id);

        let outcome = tokio::select! {
            _ = token.cancelled() => None,
            result = self.analyzer.analyze(Some(&crop), &image) => Some(result),
        };

        let mut sessions = self.sessions.lock().await;
        let slot = match sessions.get_mut(id) {
            Some(slot) if !token.is_cancelled() => slot,
            _ => {
                tracing::warn!("Session {} closed during analysis, result discarded", id);
                return Err(AppError::Cancelled(
                    "Diagnosis session was closed before the analysis finished".to_string(),
                ));
            }
        };
        slot.pending = None;
        slot.last_used = Instant::now();

        match outcome {
            Some(Ok(result)) => {
                slot.session = reduce(
                    &slot.session,
                    DiagnosisEvent::AnalysisCompleted(result.clone()),
                )?;

                // The map stays locked until the entry is written; `close_all` waits on it.
                let entry = HistoryEntry::new(
                    ActivityType::Diagnosis,
                    format!("{} diagnosis", crop),
                    result.disease.clone(),
                    serde_json::to_value(&result)?,
                );
                self.history.save_to_history(entry).await?;

                tracing::info!("{} detected in {}", result.disease, crop);
                Ok(result)
            }
            Some(Err(e)) => {
                slot.session = reduce(
                    &slot.session,
                    DiagnosisEvent::AnalysisFailed(e.message()),
                )?;
                tracing::warn!("Analysis failed for session {}: {}", id, e);
                Err(AppError::AnalysisFailed(
                    "Analysis failed. Please try again".to_string(),
                ))
            }
            None => {
                slot.session = reduce(&slot.session, DiagnosisEvent::AnalysisCancelled)?;
                Err(AppError::Cancelled("Analysis was cancelled".to_string()))
            }
        }
    }

    /// Close a session, cancelling any analysis still running for it.
    pub async fn close_session(&self, id: &str) -> Result<(), AppError> {
        let slot = self
            .sessions
            .lock()
            .await
            .remove(id)
            .ok_or_else(|| not_found(id))?;

        if let Some(token) = slot.pending {
            token.cancel();
            tracing::debug!("Cancelled pending analysis for session {}", id);
        }
        Ok(())
    }

    /// Close every session and cancel all running analyses.
    ///
    /// Once this returns, no analysis started before the call will write to history.
    pub async fn close_all(&self) {
        let drained: Vec<_> = self.sessions.lock().await.drain().collect();

        let mut cancelled = 0;
        for (_, slot) in &drained {
            if let Some(token) = &slot.pending {
                token.cancel();
                cancelled += 1;
            }
        }
        tracing::info!(
            "Closed {} diagnosis sessions ({} analyses cancelled)",
            drained.len(),
            cancelled
        );
    }

    /// Drop sessions idle past the timeout, then the least recently used idle ones
    /// until there is room for one more.
    fn evict_stale(&self, sessions: &mut HashMap<String, SessionSlot>) {
        let idle_timeout = self.idle_timeout;
        sessions.retain(|id, slot| {
            let keep = slot.pending.is_some() || slot.last_used.elapsed() < idle_timeout;
            if !keep {
                tracing::debug!("Evicted idle diagnosis session {}", id);
            }
            keep
        });

        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .filter(|(_, slot)| slot.pending.is_none())
                .min_by_key(|(_, slot)| slot.last_used)
                .map(|(id, _)| id.clone());

            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                    tracing::debug!("Evicted diagnosis session {} to make room", id);
                }
                None => break,
            }
        }
    }
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Diagnosis session {} not found", id))
}
