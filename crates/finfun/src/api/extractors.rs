use axum::{
    extract::{FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use log::{debug, warn};
use secrecy::SecretString;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Cookie the platform's login flow stores the session token in
pub const SESSION_COOKIE: &str = "privy-token";
/// Cookie identifying this browser for per-device preferences
pub const DEVICE_COOKIE: &str = "finfun_device";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No authorization header or session cookie")]
    NoAuthHeader,
    #[error("Invalid authorization header")]
    InvalidAuthHeader,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.to_string(),
        }));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// Session token forwarded to the platform API on the user's behalf
#[derive(Debug, Clone)]
pub struct BearerAuth {
    pub token: SecretString,
}

impl BearerAuth {
    fn from_header(value: &str) -> Result<Self, AuthError> {
        let token = value
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::InvalidAuthHeader)?;
        Ok(Self {
            token: SecretString::from(token.to_string()),
        })
    }
}

impl<S> FromRequestParts<S> for BearerAuth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(header) = parts.headers.get(AUTHORIZATION) {
            let value = header.to_str().map_err(|_| AuthError::InvalidAuthHeader)?;
            return BearerAuth::from_header(value);
        }

        let jar = CookieJar::from_headers(&parts.headers);
        match jar.get(SESSION_COOKIE).map(Cookie::value) {
            Some(token) if !token.is_empty() => Ok(Self {
                token: SecretString::from(token.to_string()),
            }),
            _ => {
                debug!("request to {} without session", parts.uri.path());
                Err(AuthError::NoAuthHeader)
            }
        }
    }
}

/// Identity of the browser making the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceId(pub Uuid);

fn device_from_cookie(jar: &CookieJar) -> Option<Uuid> {
    jar.get(DEVICE_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

impl<S> FromRequestParts<S> for DeviceId
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(device) = parts.extensions.get::<DeviceId>() {
            return Ok(*device);
        }
        device_from_cookie(&CookieJar::from_headers(&parts.headers))
            .map(DeviceId)
            .ok_or((StatusCode::BAD_REQUEST, "missing device id"))
    }
}

/// Issues a device cookie on first visit and exposes the id to handlers
pub async fn assign_device_id(jar: CookieJar, mut request: Request, next: Next) -> Response {
    if let Some(device) = device_from_cookie(&jar) {
        request.extensions_mut().insert(DeviceId(device));
        return next.run(request).await;
    }

    if jar.get(DEVICE_COOKIE).is_some() {
        warn!("replacing malformed device cookie");
    }
    let device = Uuid::now_v7();
    request.extensions_mut().insert(DeviceId(device));
    let response = next.run(request).await;

    let cookie = Cookie::build((DEVICE_COOKIE, device.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .permanent();
    (jar.add(cookie), response).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;
    use secrecy::ExposeSecret;

    async fn extract(request: HttpRequest<()>) -> Result<BearerAuth, AuthError> {
        let (mut parts, _) = request.into_parts();
        BearerAuth::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_bearer_from_header() {
        let request = HttpRequest::builder()
            .header(AUTHORIZATION, "Bearer abc.def")
            .body(())
            .unwrap();
        let auth = extract(request).await.unwrap();
        assert_eq!(auth.token.expose_secret(), "abc.def");
    }

    #[tokio::test]
    async fn test_bearer_falls_back_to_session_cookie() {
        let request = HttpRequest::builder()
            .header("cookie", "finfun_device=x; privy-token=from-cookie")
            .body(())
            .unwrap();
        let auth = extract(request).await.unwrap();
        assert_eq!(auth.token.expose_secret(), "from-cookie");
    }

    #[tokio::test]
    async fn test_bearer_rejections() {
        let request = HttpRequest::builder().body(()).unwrap();
        assert!(matches!(extract(request).await, Err(AuthError::NoAuthHeader)));

        let request = HttpRequest::builder()
            .header(AUTHORIZATION, "Basic dXNlcg==")
            .body(())
            .unwrap();
        assert!(matches!(
            extract(request).await,
            Err(AuthError::InvalidAuthHeader)
        ));
    }
}
