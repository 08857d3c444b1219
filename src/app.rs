//! Application state and service initialization
//!
//! Builds the database pool, the reasoning backend client and the service
//! graph shared by all Actix-web workers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::db::repository::{BookmarkRepository, StudyRepository, SummaryRepository};
use crate::model::Config;
use crate::service::llm::ENV_ANTHROPIC_API_KEY;
use crate::service::{
    AnthropicClient, ApiCredential, ClaimValidationService, ReasoningBackend, StudyService,
    SummaryService,
};

/// Application state containing all services and shared resources
pub struct AppState {
    /// Database connection pool
    pub db_pool: PgPool,
    /// Claim validation pipeline
    pub claim_service: Arc<ClaimValidationService>,
    /// Study and bookmark catalogue
    pub study_service: Arc<StudyService>,
    /// Study summary generation
    pub summary_service: Arc<SummaryService>,
}

impl AppState {
    /// Initialize all services and build application state
    ///
    /// Fails before any I/O when `ANTHROPIC_API_KEY` is not set, then when the
    /// database is unreachable.
    pub async fn new(config: Config) -> Result<Self, AppError> {
        let credential =
            ApiCredential::from_env().map_err(|_| AppError::MissingConfig(ENV_ANTHROPIC_API_KEY))?;

        let client = AnthropicClient::new(&config.llm, credential)
            .map_err(|e| AppError::InvalidConfig(e.to_string()))?;
        tracing::info!(model = client.model(), "Reasoning backend configured");
        let backend: Arc<dyn ReasoningBackend> = Arc::new(client);

        let db_pool = crate::db::create_pool()
            .await
            .map_err(|e| AppError::DatabaseInit(e.to_string()))?;

        crate::db::init_schema(&db_pool)
            .await
            .map_err(|e| AppError::DatabaseInit(e.to_string()))?;

        let studies = Arc::new(StudyRepository::new(db_pool.clone()));

        let claim_service = Arc::new(ClaimValidationService::new(
            studies.clone(),
            Arc::clone(&backend),
            config.llm.validation_max_tokens,
            config.retrieval.candidate_limit,
        ));

        let study_service = Arc::new(StudyService::new(
            studies.clone(),
            Arc::new(BookmarkRepository::new(db_pool.clone())),
        ));

        let summary_service = Arc::new(SummaryService::new(
            studies,
            Arc::new(SummaryRepository::new(db_pool.clone())),
            backend,
            config.llm.summary_max_tokens,
        ));

        Ok(Self {
            db_pool,
            claim_service,
            study_service,
            summary_service,
        })
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Database initialization failed
    #[error("Database initialization failed: {0}")]
    DatabaseInit(String),

    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(&'static str),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_credential_fails_before_database() {
        // Unreachable port: reaching the database step would surface DatabaseInit
        unsafe {
            std::env::remove_var(ENV_ANTHROPIC_API_KEY);
            std::env::set_var("HRE_POSTGRES_PORT", "9");
        }

        let Err(err) = AppState::new(Config::default()).await else {
            panic!("startup succeeded without a credential");
        };

        assert!(matches!(err, AppError::MissingConfig(ENV_ANTHROPIC_API_KEY)));
        assert_eq!(
            err.to_string(),
            "Missing required configuration: ANTHROPIC_API_KEY"
        );
    }
}
