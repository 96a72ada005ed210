//! Anonymous session id extraction.
//!
//! Players are not authenticated. A session is identified by the
//! `x-session-id` header or, failing that, the `cq_sid` cookie. Requests
//! carrying neither get a freshly minted id, which the handler returns in a
//! `Set-Cookie` header so the next request carries it.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use chronoquest_shared::{SESSION_COOKIE, SESSION_HEADER};

const MAX_SESSION_ID_LEN: usize = 128;

/// Cookie lifetime, matching the client-side snapshot freshness window.
const COOKIE_MAX_AGE_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId {
    id: String,
    minted: bool,
}

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.id
    }

    /// Whether the id was minted for this request.
    pub fn is_new(&self) -> bool {
        self.minted
    }

    fn from_headers(headers: &HeaderMap) -> Self {
        let from_header = headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|id| is_valid(id));

        let from_cookie = || {
            headers
                .get_all(header::COOKIE)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .flat_map(|raw| raw.split(';'))
                .filter_map(|pair| pair.trim().split_once('='))
                .find(|(name, value)| *name == SESSION_COOKIE && is_valid(value))
                .map(|(_, value)| value)
        };

        match from_header.or_else(from_cookie) {
            Some(id) => Self {
                id: id.to_string(),
                minted: false,
            },
            None => Self {
                id: Uuid::new_v4().to_string(),
                minted: true,
            },
        }
    }

    /// Attach the session cookie to `body` when the id was minted here.
    pub fn respond(&self, body: impl IntoResponse) -> Response {
        let mut response = body.into_response();
        if self.minted {
            let cookie = format!(
                "{SESSION_COOKIE}={}; Path=/; Max-Age={COOKIE_MAX_AGE_SECS}; HttpOnly; SameSite=Lax",
                self.id
            );
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }
        response
    }
}

fn is_valid(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_SESSION_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}
