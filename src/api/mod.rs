pub mod claims;
pub mod error;
pub mod health;
pub mod openapi;
pub mod studies;
pub mod summaries;

use actix_web::web;

/// Register every route of the service
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(claims::configure)
        .configure(studies::configure)
        .configure(summaries::configure)
        .configure(health::configure)
        .configure(openapi::configure);
}
