use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::database::user_repo;

#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub id: String,
}

#[derive(Deserialize)]
struct JwtPayload {
    sub: String,
}

pub async fn require_auth(
    State(pool): State<SqlitePool>,
    mut request: Request,
    next: Next,
) -> Response {
    // Extract the access token from the request cookies
    let token = request
        .headers()
        .get(header::COOKIE)
        .and_then(|hv| hv.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split("; ")
                .find(|c| c.starts_with("access_token="))
                .and_then(|c| c.strip_prefix("access_token="))
        });

    if let Some(token) = token {
        // Parse JWT payload (middle part)
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() == 3 {
            if let Ok(payload_bytes) = general_purpose::URL_SAFE_NO_PAD.decode(parts[1]) {
                if let Ok(payload) = serde_json::from_slice::<JwtPayload>(&payload_bytes) {
                    if let Some(user_id) = resolve_subject(&pool, &payload.sub).await {
                        request
                            .extensions_mut()
                            .insert(AuthenticatedUser { id: user_id });

                        return next.run(request).await;
                    }
                }
            }
        }
    }

    // No valid token, unresolvable subject, or parse error: return 401
    Response::builder()
        .status(401)
        .body(axum::body::Body::from("Unauthorized - Please login"))
        .unwrap()
}

// Tokens minted by the identity provider carry either the user id or the
// account email as subject.
async fn resolve_subject(pool: &SqlitePool, sub: &str) -> Option<String> {
    let lookup = if sub.contains('@') {
        user_repo::load_user_by_email(pool, sub).await
    } else {
        user_repo::load_user_by_id(pool, sub).await
    };

    match lookup {
        Ok(Some(user)) => Some(user.user_id),
        Ok(None) => None,
        Err(e) => {
            warn!("Identity lookup failed for {}: {}", sub, e);
            None
        }
    }
}
