// ============================================================
// APPLICATION STATE
// ============================================================
// Use cases plus the single in-memory analysis session

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info};
use uuid::Uuid;

use crate::application::{InsightsUseCase, ReportUseCase, SurveyAnalysisUseCase};
use crate::domain::error::{AppError, Result};
use crate::domain::insights::AiInsights;
use crate::domain::reflection::ReflectionData;
use crate::domain::survey::{SurveyAnalysis, SurveyVocabulary};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::storage::HistoryStore;

/// One uploaded survey and the reflection written against it
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    pub id: String,
    pub analysis: SurveyAnalysis,
    pub insights: Option<AiInsights>,
    pub is_analyzing: bool,
    pub reflection: ReflectionData,
}

pub struct AppState {
    pub config: AppConfig,
    pub survey_use_case: SurveyAnalysisUseCase,
    pub insights_use_case: InsightsUseCase,
    pub report_use_case: ReportUseCase,
    session: Mutex<Option<AnalysisSession>>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        vocabulary: SurveyVocabulary,
        llm_client: Arc<dyn LLMClient + Send + Sync>,
    ) -> Self {
        let history = HistoryStore::new(&config.data_dir);

        Self {
            survey_use_case: SurveyAnalysisUseCase::new(Arc::new(vocabulary)),
            insights_use_case: InsightsUseCase::new(llm_client),
            report_use_case: ReportUseCase::new(history),
            session: Mutex::new(None),
            config,
        }
    }

    fn lock_session(&self) -> Result<MutexGuard<'_, Option<AnalysisSession>>> {
        self.session
            .lock()
            .map_err(|_| AppError::Internal("Session lock poisoned".to_string()))
    }

    /// Replace any previous session; the reflection starts empty
    pub fn start_session(&self, analysis: SurveyAnalysis) -> Result<AnalysisSession> {
        let session = AnalysisSession {
            id: Uuid::new_v4().to_string(),
            is_analyzing: !analysis.is_empty(),
            analysis,
            insights: None,
            reflection: ReflectionData::default(),
        };

        *self.lock_session()? = Some(session.clone());
        info!(session_id = %session.id, "Started analysis session");
        Ok(session)
    }

    pub fn current_session(&self) -> Result<AnalysisSession> {
        self.lock_session()?
            .clone()
            .ok_or_else(|| AppError::NotFound("No survey has been uploaded".to_string()))
    }

    /// Run `f` against the current session under the lock
    pub fn with_session<R>(&self, f: impl FnOnce(&mut AnalysisSession) -> R) -> Result<R> {
        let mut guard = self.lock_session()?;
        let session = guard
            .as_mut()
            .ok_or_else(|| AppError::NotFound("No survey has been uploaded".to_string()))?;
        Ok(f(session))
    }

    /// Store insights only if `session_id` is still the active session
    pub fn store_insights(&self, session_id: &str, insights: AiInsights) -> Result<bool> {
        let mut guard = self.lock_session()?;
        match guard.as_mut() {
            Some(session) if session.id == session_id => {
                session.insights = Some(insights);
                session.is_analyzing = false;
                Ok(true)
            }
            _ => {
                debug!(session_id, "Dropping insights for a replaced session");
                Ok(false)
            }
        }
    }

    /// Generate insights for `session_id` and store them if it is still current
    pub async fn refresh_insights(&self, session_id: &str) -> Result<bool> {
        let analysis = {
            let guard = self.lock_session()?;
            match guard.as_ref() {
                Some(session) if session.id == session_id => session.analysis.clone(),
                _ => return Ok(false),
            }
        };

        let insights = self
            .insights_use_case
            .generate_insights(&self.config.llm, &analysis)
            .await;

        self.store_insights(session_id, insights)
    }
}
