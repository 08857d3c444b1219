//! REST API endpoints for study summaries

use actix_web::{HttpResponse, get, post, web};

use crate::api::error::{ApiError, ErrorResponse};
use crate::model::{Summary, SummaryRequest};
use crate::service::SummaryService;

/// Generate a summary for a study, or return the stored one
#[utoipa::path(
    post,
    path = "/api/summaries",
    request_body = SummaryRequest,
    responses(
        (status = 201, description = "Summary available", body = Summary),
        (status = 404, description = "Study not found", body = ErrorResponse),
        (status = 500, description = "Failed to generate summary", body = ErrorResponse)
    ),
    tag = "summaries"
)]
#[post("/api/summaries")]
pub async fn create_summary(
    service: web::Data<SummaryService>,
    body: web::Json<SummaryRequest>,
) -> Result<HttpResponse, ApiError> {
    let summary = service.create_summary(body.study_id).await?;
    Ok(HttpResponse::Created().json(summary))
}

/// Get the stored summary for a study
#[utoipa::path(
    get,
    path = "/api/summaries/{study_id}",
    params(
        ("study_id" = i64, Path, description = "Study ID")
    ),
    responses(
        (status = 200, description = "Summary retrieved successfully", body = Summary),
        (status = 404, description = "Summary not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "summaries"
)]
#[get("/api/summaries/{study_id}")]
pub async fn get_summary(
    service: web::Data<SummaryService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let summary = service.get_summary(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// Configure summary routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_summary).service(get_summary);
}
