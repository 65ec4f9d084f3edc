//! Session cookie plumbing.
//!
//! The cookie carries nothing but the opaque token; all session state
//! lives server-side in [`MemorySessions`](crate::sessions::MemorySessions).

use aula_core::session::SessionToken;
use axum::{
  http::{HeaderMap, HeaderValue, header},
  response::Response,
};

use crate::ServerConfig;

pub const SESSION_COOKIE: &str = "aula_session";

/// Cookie lifetime, matching the server-side inactivity window.
const MAX_AGE_SECONDS: i64 = 24 * 60 * 60;

/// Extract the session token from the request's `Cookie` header.
pub fn bearer(headers: &HeaderMap) -> Option<SessionToken> {
  let raw = headers.get(header::COOKIE)?.to_str().ok()?;
  raw.split(';').find_map(|pair| {
    let (name, value) = pair.trim().split_once('=')?;
    if name == SESSION_COOKIE {
      SessionToken::parse(value.trim())
    } else {
      None
    }
  })
}

/// Attach a (re-)issued session cookie to `response`.
///
/// HttpOnly always; `Secure` only when configured — operators
/// deploying over TLS should set `cookie_secure = true`.
pub fn set_session(
  mut response: Response,
  token: &SessionToken,
  config: &ServerConfig,
) -> Response {
  let mut value = format!(
    "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={MAX_AGE_SECONDS}",
    token.as_str()
  );
  if config.cookie_secure {
    value.push_str("; Secure");
  }
  // Token and attributes are ASCII by construction.
  let value =
    HeaderValue::from_str(&value).expect("cookie value is valid ASCII");
  response.headers_mut().append(header::SET_COOKIE, value);
  response
}

/// Attach an expired session cookie, instructing the client to drop it.
pub fn clear_session(mut response: Response) -> Response {
  let value = HeaderValue::from_static(
    "aula_session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
  );
  response.headers_mut().append(header::SET_COOKIE, value);
  response
}
