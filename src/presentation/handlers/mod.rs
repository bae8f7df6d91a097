pub mod auth;
pub mod pages;
pub mod post;

use actix_web::cookie::Cookie;
use actix_web::http::header;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, web};

use crate::domain::user::User;
use crate::presentation::middleware::RequestId;
use crate::presentation::views::{Notice, PageContext, Renderer, View};

pub const FLASH_COOKIE: &str = "flash";

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(post::index)
        .service(post::show_post)
        .service(post::add_comment)
        .service(post::new_post_form)
        .service(post::create_post)
        .service(post::edit_post_form)
        .service(post::update_post)
        .service(post::delete_post)
        .service(auth::register_form)
        .service(auth::register)
        .service(auth::login_form)
        .service(auth::login)
        .service(auth::logout)
        .service(pages::about)
        .service(pages::contact)
        .service(pages::health);
}

pub(crate) fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|rid| rid.0.clone())
        .unwrap_or_else(|| "unknown".into())
}

pub(crate) fn removal_cookie(name: &str) -> Cookie<'static> {
    let mut cookie = Cookie::new(name.to_owned(), "");
    cookie.set_path("/");
    cookie.make_removal();
    cookie
}

pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Redirect carrying a one-shot notice for the next page view.
pub(crate) fn flash_redirect(location: &str, notice: Notice) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .cookie(
            Cookie::build(FLASH_COOKIE, notice.code())
                .path("/")
                .finish(),
        )
        .finish()
}

/// Renders a page through the injected renderer, consuming any pending
/// flash notice.
pub(crate) fn render_page(
    req: &HttpRequest,
    renderer: &dyn Renderer,
    viewer: Option<&User>,
    view: View<'_>,
) -> HttpResponse {
    let notice = req
        .cookie(FLASH_COOKIE)
        .and_then(|c| Notice::from_code(c.value()));
    let html = renderer.render(&PageContext {
        viewer,
        notice,
        view,
    });

    let mut builder = HttpResponse::Ok();
    builder.content_type("text/html; charset=utf-8");
    if notice.is_some() {
        builder.cookie(removal_cookie(FLASH_COOKIE));
    }
    builder.body(html)
}
