//! OpenAPI specification endpoints

use actix_web::{HttpResponse, Responder, get};
use utoipa::OpenApi;

use crate::api::error::ApiError;
use crate::api::{claims, health, studies, summaries};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hypertrophy Research Explorer",
        description = "Evidence-based validation of fitness claims against a research study corpus"
    ),
    paths(
        claims::validate_claim,
        studies::list_studies,
        studies::get_study,
        studies::create_study,
        studies::update_study,
        studies::delete_study,
        studies::create_bookmark,
        studies::list_bookmarks,
        summaries::create_summary,
        summaries::get_summary,
        health::root,
        health::liveness,
        health::readiness,
    ),
    components(schemas(
        crate::model::ClaimRequest,
        crate::model::ValidationResult,
        crate::model::Verdict,
        crate::model::Confidence,
        crate::model::EvidenceBreakdown,
        crate::model::KeyStudy,
        crate::model::Study,
        crate::model::NewStudy,
        crate::model::StudyUpdate,
        crate::model::StudyListResponse,
        crate::model::Bookmark,
        crate::model::NewBookmark,
        crate::model::Summary,
        crate::model::SummaryRequest,
        crate::api::error::ErrorResponse,
    )),
    tags(
        (name = "claims", description = "Fitness claim validation"),
        (name = "studies", description = "Research study catalogue"),
        (name = "bookmarks", description = "Saved studies"),
        (name = "summaries", description = "Generated study analyses"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
#[get("/openapi.json")]
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Serve OpenAPI YAML specification
#[get("/openapi.yaml")]
pub async fn openapi_yaml() -> Result<HttpResponse, ApiError> {
    let yaml = ApiDoc::openapi()
        .to_yaml()
        .map_err(|e| ApiError::Internal(format!("Failed to render OpenAPI document: {}", e)))?;
    Ok(HttpResponse::Ok().content_type("text/yaml").body(yaml))
}

/// Configure OpenAPI routes
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(openapi_json).service(openapi_yaml);
}
