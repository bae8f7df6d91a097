use actix_web::dev::Payload;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{Ready, ready};

use crate::domain::error::DomainError;
use crate::domain::user::User;

/// Requires an authenticated session: resolves the identity the session
/// middleware attached, or fails the request with 401.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<User>() {
            Some(user) => ready(Ok(AuthenticatedUser(user.clone()))),
            None => ready(Err(DomainError::Unauthorized.into())),
        }
    }
}

/// Requires the administrator: 401 for anonymous callers, 403 for any
/// authenticated non-admin.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl FromRequest for AdminUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<User>() {
            Some(user) if user.is_admin() => ready(Ok(AdminUser(user.clone()))),
            Some(_) => ready(Err(DomainError::Forbidden.into())),
            None => ready(Err(DomainError::Unauthorized.into())),
        }
    }
}
