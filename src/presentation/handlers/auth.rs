use actix_web::cookie::Cookie;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use tracing::info;

use crate::application::auth_service::AuthService;
use crate::data::user_repository::SqliteUserRepository;
use crate::domain::error::DomainError;
use crate::presentation::dto::{LoginForm, RegisterForm};
use crate::presentation::guards::AuthenticatedUser;
use crate::presentation::handlers::{flash_redirect, removal_cookie, render_page, request_id};
use crate::presentation::middleware::SESSION_COOKIE;
use crate::presentation::views::{Notice, Renderer, View};

/// Redirect that installs a fresh session cookie.
fn session_redirect(location: &str, token: String) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .cookie(
            Cookie::build(SESSION_COOKIE, token)
                .path("/")
                .http_only(true)
                .finish(),
        )
        .finish()
}

#[get("/register")]
pub async fn register_form(
    req: HttpRequest,
    renderer: web::Data<dyn Renderer>,
    viewer: Option<AuthenticatedUser>,
) -> HttpResponse {
    render_page(
        &req,
        renderer.get_ref(),
        viewer.as_ref().map(|v| &v.0),
        View::Register,
    )
}

#[post("/register")]
pub async fn register(
    req: HttpRequest,
    service: web::Data<AuthService<SqliteUserRepository>>,
    form: web::Form<RegisterForm>,
) -> Result<HttpResponse, DomainError> {
    match service
        .register(&form.email, &form.password, &form.name)
        .await
    {
        Ok((user, token)) => {
            info!(
                request_id = %request_id(&req),
                user_id = %user.id,
                "user registered"
            );
            Ok(session_redirect("/", token))
        }
        Err(DomainError::DuplicateEmail(_)) => {
            Ok(flash_redirect("/login", Notice::AlreadyRegistered))
        }
        Err(e) => Err(e),
    }
}

#[get("/login")]
pub async fn login_form(
    req: HttpRequest,
    renderer: web::Data<dyn Renderer>,
    viewer: Option<AuthenticatedUser>,
) -> HttpResponse {
    render_page(
        &req,
        renderer.get_ref(),
        viewer.as_ref().map(|v| &v.0),
        View::Login,
    )
}

#[post("/login")]
pub async fn login(
    req: HttpRequest,
    service: web::Data<AuthService<SqliteUserRepository>>,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, DomainError> {
    match service.login(&form.email, &form.password).await {
        Ok((user, token)) => {
            info!(
                request_id = %request_id(&req),
                user_id = %user.id,
                "user logged in"
            );
            Ok(session_redirect("/", token))
        }
        // One notice for both failure kinds, so responses don't reveal
        // which emails have accounts.
        Err(DomainError::NoSuchEmail) | Err(DomainError::WrongPassword) => {
            Ok(flash_redirect("/login", Notice::BadCredentials))
        }
        Err(e) => Err(e),
    }
}

#[get("/logout")]
pub async fn logout(req: HttpRequest, user: AuthenticatedUser) -> HttpResponse {
    info!(
        request_id = %request_id(&req),
        user_id = %user.0.id,
        "user logged out"
    );
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .cookie(removal_cookie(SESSION_COOKIE))
        .finish()
}
