pub mod galleries;
pub mod pages;
pub mod users;

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use crate::auth::extractor::CurrentUser;
use crate::error::AppError;
use crate::models::User;
use crate::state::SharedState;

pub fn view_routes() -> Router<SharedState> {
    Router::new()
        // Static pages
        .route("/", get(pages::home))
        .route("/contact", get(pages::contact))
        .route("/faq", get(pages::faq))
        // Accounts
        .route("/signup", get(users::sign_up_page))
        .route("/signin", get(users::sign_in_page))
        .route("/users/me", get(users::current_user_page))
        .route("/forgot-password", get(users::forgot_password_page))
        .route("/reset-password", get(users::reset_password_page))
        // Galleries
        .route("/galleries", get(galleries::index))
        .route("/galleries/new", get(galleries::new_page))
        .route("/galleries/{id}", get(galleries::show))
        .route("/galleries/{id}/edit", get(galleries::edit_page))
        .route("/galleries/{id}/images/{filename}", get(galleries::image))
}

/// Per-request values every page needs, handed to templates explicitly.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub user_email: Option<String>,
    pub errors: Vec<String>,
}

impl RenderContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn for_user(user: Option<&User>) -> Self {
        Self {
            user_email: user.map(|u| u.email.clone()),
            errors: Vec::new(),
        }
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.errors.push(message.into());
        self
    }

    pub fn signed_in(&self) -> bool {
        self.user_email.is_some()
    }

    pub fn email(&self) -> &str {
        self.user_email.as_deref().unwrap_or_default()
    }
}

impl From<&CurrentUser> for RenderContext {
    fn from(current: &CurrentUser) -> Self {
        Self::for_user(current.user())
    }
}

impl From<&User> for RenderContext {
    fn from(user: &User) -> Self {
        Self::for_user(Some(user))
    }
}

pub fn render<T: Template>(template: &T) -> Result<Html<String>, AppError> {
    template
        .render()
        .map(Html)
        .map_err(|e| AppError::Internal(format!("Template render failed: {e}")))
}

/// Render a page with a non-200 status, typically a form shown again with
/// its errors.
pub fn render_with_status<T: Template>(status: StatusCode, template: &T) -> Response {
    match render(template) {
        Ok(html) => (status, html).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    ctx: RenderContext,
    status: u16,
    reason: &'static str,
}

pub fn error_page(status: StatusCode, ctx: RenderContext) -> Response {
    let template = ErrorTemplate {
        ctx,
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Error"),
    };
    match template.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render error page: {e}");
            (status, "Something went wrong.").into_response()
        }
    }
}
