use actix_web::{
    Error, HttpMessage, ResponseError, web,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::AUTHORIZATION,
    middleware::Next,
};

use crate::config::AuthConfig;
use crate::errors::AppError;
use super::token::verify_token;

/// Pull the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Middleware that requires a valid bearer token.
/// On success the decoded [`Claims`](super::token::Claims) are stored in the
/// request extensions; otherwise a 401 JSON response is returned.
pub async fn require_auth(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let verified = match req.app_data::<web::Data<AuthConfig>>() {
        Some(cfg) => req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))
            .and_then(|token| verify_token(cfg, token)),
        None => {
            log::error!("AuthConfig missing from app data");
            Err(AppError::Unauthorized("Authentication unavailable".to_string()))
        }
    };

    match verified {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.call(req).await.map(|res| res.map_into_left_body())
        }
        Err(e) => {
            let response = e.error_response();
            Ok(req.into_response(response).map_into_right_body())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::bearer_token;

    #[test]
    fn parses_bearer_header() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("bearer   xyz "), Some("xyz"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("abc"), None);
    }
}
