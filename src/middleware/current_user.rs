use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;

use crate::auth::cookie;
use crate::auth::extractor::CurrentUser;
use crate::auth::sessions;
use crate::error::AppError;
use crate::state::SharedState;

/// Resolve the session cookie once per request and store the result as a
/// [`CurrentUser`] extension. Unknown or stale tokens make the request
/// anonymous; any other store failure aborts the request.
pub async fn resolve_user(
    State(state): State<SharedState>,
    mut req: Request,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(req.headers());
    let user = match cookie::session_token(&jar) {
        Some(token) => match sessions::user(&state.pool, &state.tokens, &token).await {
            Ok(user) => Some(user),
            Err(AppError::Unauthorized(_)) => None,
            Err(e) => return e.into_response(),
        },
        None => None,
    };

    req.extensions_mut().insert(CurrentUser(user));
    next.run(req).await
}
