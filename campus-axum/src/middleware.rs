use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use campus::{AccessClaims, AccessToken, Campus, RepositoryProvider};

use crate::error::ApiError;

pub struct AppState<R: RepositoryProvider> {
    pub campus: Arc<Campus<R>>,
}

impl<R: RepositoryProvider> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            campus: self.campus.clone(),
        }
    }
}

/// Reject any request that does not carry a valid bearer token.
///
/// On success the verified [`AccessClaims`] are inserted as a request
/// extension for handlers that want to know who is calling.
pub async fn require_auth<R>(
    State(state): State<AppState<R>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError>
where
    R: RepositoryProvider,
{
    let token = extract_bearer_token(&request).ok_or(ApiError::Unauthorized)?;

    let claims = state
        .campus
        .verify_token(&AccessToken::new(&token))
        .map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            ApiError::Unauthorized
        })?;

    request.extensions_mut().insert(Arc::new(claims));

    Ok(next.run(request).await)
}

fn extract_bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}

/// Verified claims of the calling admin, available behind [`require_auth`].
pub type CallerClaims = Arc<AccessClaims>;
