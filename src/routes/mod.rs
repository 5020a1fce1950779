pub mod galleries;
pub mod users;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use tower_http::limit::RequestBodyLimitLayer;

use crate::state::SharedState;

/// Form submissions. `max_upload_size` caps the body of image uploads.
pub fn form_routes(max_upload_size: usize) -> Router<SharedState> {
    Router::new()
        // Accounts
        .route("/signup", post(users::sign_up))
        .route("/signin", post(users::sign_in))
        .route("/signout", post(users::sign_out))
        .route("/forgot-password", post(users::forgot_password))
        .route("/reset-password", post(users::reset_password))
        // Galleries
        .route("/galleries", post(galleries::create))
        .route("/galleries/{id}/edit", post(galleries::update))
        .route("/galleries/{id}/delete", post(galleries::delete))
        .route(
            "/galleries/{id}/images",
            post(galleries::upload_images)
                .layer::<_, std::convert::Infallible>(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(max_upload_size)),
        )
        .route(
            "/galleries/{id}/images/{filename}/delete",
            post(galleries::delete_image),
        )
}
