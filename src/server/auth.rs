//! HTTP basic-auth gate.
//!
//! Single shared account from `[auth]`. When the gate is off requests pass
//! straight through. Credentials are compared as SHA-256 digests so the
//! comparison cost does not depend on where the strings first differ.

use super::AppState;
use crate::config::AuthConfig;
use axum::extract::{Request, State};
use axum::http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use sha2::{Digest, Sha256};

pub async fn require_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let auth = &state.config.auth;
    if !auth.enabled {
        return next.run(request).await;
    }

    match credentials(request.headers()) {
        Some((username, password)) if verify(auth, &username, &password) => {
            next.run(request).await
        }
        _ => {
            tracing::warn!(path = %request.uri().path(), "rejected unauthenticated request");
            challenge(&auth.realm)
        }
    }
}

/// Decode `Authorization: Basic <base64(user:pass)>`.
fn credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

fn verify(auth: &AuthConfig, username: &str, password: &str) -> bool {
    let username_ok = Sha256::digest(username.as_bytes()) == Sha256::digest(auth.username.as_bytes());
    let password_ok = Sha256::digest(password.as_bytes()) == Sha256::digest(auth.password.as_bytes());
    username_ok & password_ok
}

fn challenge(realm: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(WWW_AUTHENTICATE, format!("Basic realm=\"{realm}\""))],
        "Authentication required.\nPlease log in with your credentials.",
    )
        .into_response()
}
