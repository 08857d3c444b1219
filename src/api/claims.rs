//! REST API endpoint for fitness claim validation

use actix_web::{HttpResponse, post, web};

use crate::api::error::{ApiError, ErrorResponse};
use crate::model::{ClaimRequest, ValidationResult};
use crate::service::ClaimValidationService;

/// Validate a fitness claim against the study corpus
#[utoipa::path(
    post,
    path = "/api/claims/validate",
    request_body = ClaimRequest,
    responses(
        (status = 200, description = "Claim validated", body = ValidationResult),
        (status = 400, description = "Claim too short", body = ErrorResponse),
        (status = 500, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "claims"
)]
#[post("/api/claims/validate")]
pub async fn validate_claim(
    service: web::Data<ClaimValidationService>,
    request: web::Json<ClaimRequest>,
) -> Result<HttpResponse, ApiError> {
    let result = service.validate(&request.claim).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// Configure claim routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(validate_claim);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test};

    use super::*;
    use crate::service::claims::retrieval::testing::{InMemoryStudies, study};
    use crate::service::claims::synthesis::testing::{Reply, ScriptedBackend};

    const REPLY: &str = r#"```json
{
    "verdict": "PARTIALLY_SUPPORTED",
    "confidence": "moderate",
    "summary": "Heavier loads help, but not uniquely.",
    "evidence": {"supporting": 1, "mixed": 1, "refuting": 0},
    "key_studies": [{"id": 1, "finding": "Similar growth across loads."}],
    "bottom_line": "Load matters less than effort."
}
```"#;

    fn app_data(reply: Reply) -> web::Data<ClaimValidationService> {
        let studies = Arc::new(InMemoryStudies::new(vec![study(
            5,
            "Low versus high load resistance training",
            Some("Muscle hypertrophy was similar across load conditions."),
        )]));
        let backend = Arc::new(ScriptedBackend::new(reply));
        web::Data::new(ClaimValidationService::new(studies, backend, 2048, 15))
    }

    #[actix_web::test]
    async fn test_validate_claim_ok() {
        let app = test::init_service(
            App::new()
                .app_data(app_data(Reply::Text(REPLY.to_string())))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/claims/validate")
            .set_json(serde_json::json!({"claim": "Heavy load training builds more muscle"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["verdict"], "PARTIALLY_SUPPORTED");
        assert_eq!(body["confidence"], "moderate");
        assert_eq!(body["key_studies"][0]["id"], 5);
        assert_eq!(
            body["key_studies"][0]["title"],
            "Low versus high load resistance training"
        );
    }

    #[actix_web::test]
    async fn test_validate_claim_too_short() {
        let app = test::init_service(
            App::new()
                .app_data(app_data(Reply::Text(REPLY.to_string())))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/claims/validate")
            .set_json(serde_json::json!({"claim": "squats"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "bad_request");
    }

    #[actix_web::test]
    async fn test_validate_claim_upstream_failure() {
        let app = test::init_service(
            App::new()
                .app_data(app_data(Reply::Status(503)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/claims/validate")
            .set_json(serde_json::json!({"claim": "Heavy load training builds more muscle"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: serde_json::Value = test::read_body_json(resp).await;
        let message = body["message"].as_str().unwrap();
        assert!(message.starts_with("Failed to validate claim: "));
    }
}
