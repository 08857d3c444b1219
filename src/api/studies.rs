//! REST API endpoints for studies and bookmarks

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::error::{ApiError, ErrorResponse};
use crate::model::{Bookmark, NewBookmark, NewStudy, Study, StudyListResponse, StudyUpdate};
use crate::service::StudyService;

/// Query parameters for listing studies
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListStudiesParams {
    /// Number of studies to skip (default: 0)
    pub skip: Option<u32>,
    /// Page size (default: 20, max: 100)
    pub limit: Option<u32>,
    /// Case-insensitive match on title, abstract, keywords or authors
    pub search: Option<String>,
}

/// Query parameters for listing bookmarks
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListBookmarksParams {
    /// Only return bookmarks for this user
    pub user_id: Option<String>,
}

/// List studies with pagination and search
#[utoipa::path(
    get,
    path = "/api/studies",
    params(ListStudiesParams),
    responses(
        (status = 200, description = "Studies retrieved successfully", body = StudyListResponse),
        (status = 400, description = "Invalid paging parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "studies"
)]
#[get("/api/studies")]
pub async fn list_studies(
    service: web::Data<StudyService>,
    query: web::Query<ListStudiesParams>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();
    let page = service.list(query.skip, query.limit, query.search).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Get a study by ID
#[utoipa::path(
    get,
    path = "/api/studies/{id}",
    params(
        ("id" = i64, Path, description = "Study ID")
    ),
    responses(
        (status = 200, description = "Study retrieved successfully", body = Study),
        (status = 404, description = "Study not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "studies"
)]
#[get("/api/studies/{id}")]
pub async fn get_study(
    service: web::Data<StudyService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let study = service.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(study))
}

/// Add a study to the corpus
#[utoipa::path(
    post,
    path = "/api/studies",
    request_body = NewStudy,
    responses(
        (status = 201, description = "Study created", body = Study),
        (status = 400, description = "Study with this DOI already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "studies"
)]
#[post("/api/studies")]
pub async fn create_study(
    service: web::Data<StudyService>,
    body: web::Json<NewStudy>,
) -> Result<HttpResponse, ApiError> {
    let study = service.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(study))
}

/// Partially update a study
#[utoipa::path(
    patch,
    path = "/api/studies/{id}",
    params(
        ("id" = i64, Path, description = "Study ID")
    ),
    request_body = StudyUpdate,
    responses(
        (status = 200, description = "Study updated", body = Study),
        (status = 404, description = "Study not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "studies"
)]
#[patch("/api/studies/{id}")]
pub async fn update_study(
    service: web::Data<StudyService>,
    path: web::Path<i64>,
    body: web::Json<StudyUpdate>,
) -> Result<HttpResponse, ApiError> {
    let study = service.update(path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(study))
}

/// Delete a study with its bookmarks and summary
#[utoipa::path(
    delete,
    path = "/api/studies/{id}",
    params(
        ("id" = i64, Path, description = "Study ID")
    ),
    responses(
        (status = 204, description = "Study deleted"),
        (status = 404, description = "Study not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "studies"
)]
#[delete("/api/studies/{id}")]
pub async fn delete_study(
    service: web::Data<StudyService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    service.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Bookmark a study
#[utoipa::path(
    post,
    path = "/api/studies/{id}/bookmarks",
    params(
        ("id" = i64, Path, description = "Study ID")
    ),
    request_body = NewBookmark,
    responses(
        (status = 201, description = "Bookmark created", body = Bookmark),
        (status = 404, description = "Study not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "bookmarks"
)]
#[post("/api/studies/{id}/bookmarks")]
pub async fn create_bookmark(
    service: web::Data<StudyService>,
    path: web::Path<i64>,
    body: web::Json<NewBookmark>,
) -> Result<HttpResponse, ApiError> {
    let bookmark = service
        .bookmark(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(bookmark))
}

/// List bookmarks, optionally for one user
#[utoipa::path(
    get,
    path = "/api/studies/bookmarks/all",
    params(ListBookmarksParams),
    responses(
        (status = 200, description = "Bookmarks retrieved successfully", body = Vec<Bookmark>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "bookmarks"
)]
#[get("/api/studies/bookmarks/all")]
pub async fn list_bookmarks(
    service: web::Data<StudyService>,
    query: web::Query<ListBookmarksParams>,
) -> Result<HttpResponse, ApiError> {
    let bookmarks = service.list_bookmarks(query.user_id.as_deref()).await?;
    Ok(HttpResponse::Ok().json(bookmarks))
}

/// Configure study routes
///
/// `list_bookmarks` is registered before `get_study` so the literal path wins
/// over the `{id}` segment.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_bookmarks)
        .service(list_studies)
        .service(create_study)
        .service(get_study)
        .service(update_study)
        .service(delete_study)
        .service(create_bookmark);
}
