//! Session cookie parsing and `Set-Cookie` rendering.

use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};
use chrono::DateTime;

pub const SESSION_COOKIE_NAME: &str = "invision_jwt";
/// Shorter than the token TTL; the browser drops the cookie first.
pub const COOKIE_TTL_SECONDS: i64 = 30 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

/// Collect every `name=value` pair from the request's `Cookie` headers.
#[must_use]
pub fn parse_cookies(headers: &HeaderMap) -> Vec<Cookie> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let mut parts = pair.trim().splitn(2, '=');
            let name = parts.next()?.trim();
            let value = parts.next()?.trim();
            if name.is_empty() {
                return None;
            }
            Some(Cookie {
                name: name.to_string(),
                value: value.to_string(),
            })
        })
        .collect()
}

/// First cookie named `name`.
#[must_use]
pub fn find_cookie<'a>(cookies: &'a [Cookie], name: &str) -> Option<&'a str> {
    cookies
        .iter()
        .find(|cookie| cookie.name == name)
        .map(|cookie| cookie.value.as_str())
}

/// Cookie directive carrying a freshly issued token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub value: String,
    pub expires_at: i64,
}

impl SessionCookie {
    #[must_use]
    pub fn new(token: String, now: i64) -> Self {
        Self {
            value: token,
            expires_at: now.saturating_add(COOKIE_TTL_SECONDS),
        }
    }

    /// Render an `HttpOnly` cookie; `secure` adds the `Secure` attribute.
    ///
    /// # Errors
    /// Returns an error if the token contains bytes not allowed in a header.
    pub fn to_header_value(&self, secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut cookie = format!(
            "{SESSION_COOKIE_NAME}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={COOKIE_TTL_SECONDS}",
            self.value
        );
        if let Some(expires) = DateTime::from_timestamp(self.expires_at, 0) {
            cookie.push_str(&format!(
                "; Expires={}",
                expires.format("%a, %d %b %Y %H:%M:%S GMT")
            ));
        }
        if secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie)
    }
}
