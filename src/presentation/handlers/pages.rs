use actix_web::{HttpRequest, HttpResponse, Responder, get, web};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::presentation::guards::AuthenticatedUser;
use crate::presentation::handlers::render_page;
use crate::presentation::views::{Renderer, View};

#[get("/about")]
pub async fn about(
    req: HttpRequest,
    renderer: web::Data<dyn Renderer>,
    viewer: Option<AuthenticatedUser>,
) -> HttpResponse {
    render_page(
        &req,
        renderer.get_ref(),
        viewer.as_ref().map(|v| &v.0),
        View::About,
    )
}

#[get("/contact")]
pub async fn contact(
    req: HttpRequest,
    renderer: web::Data<dyn Renderer>,
    viewer: Option<AuthenticatedUser>,
) -> HttpResponse {
    render_page(
        &req,
        renderer.get_ref(),
        viewer.as_ref().map(|v| &v.0),
        View::Contact,
    )
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}
