//! Bearer-token authentication for HTTP handlers.
//!
//! Handlers take an [`AuthenticatedUser`] argument; the extractor resolves
//! `Authorization: Bearer <token>` through the configured
//! [`TokenVerifier`](crate::domain::ports::TokenVerifier) and rejects the
//! request with 401 before the handler runs.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::ports::TokenVerifierError;
use crate::domain::{Error, UserId};

use super::state::HttpState;

/// Caller identity resolved from the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(UserId);

impl AuthenticatedUser {
    pub fn id(&self) -> UserId {
        self.0
    }

    #[cfg(test)]
    pub(crate) fn for_tests(user: UserId) -> Self {
        Self(user)
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_owned())
}

fn map_verifier_error(error: TokenVerifierError) -> Error {
    match error {
        TokenVerifierError::Connection { message } => {
            Error::service_unavailable(format!("token store unavailable: {message}"))
        }
        TokenVerifierError::Query { message } => {
            Error::internal(format!("token lookup failed: {message}"))
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = bearer_token(req);
        Box::pin(async move {
            let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let Some(token) = token else {
                return Err(Error::unauthorized("missing bearer token"));
            };
            match state.tokens.verify(&token).await.map_err(map_verifier_error)? {
                Some(user) => Ok(Self(user)),
                None => {
                    debug!("bearer token did not resolve to a user");
                    Err(Error::unauthorized("invalid or expired token"))
                }
            }
        })
    }
}
