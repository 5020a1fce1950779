use askama::Template;
use axum::extract::Query;
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::auth::extractor::{AuthUser, CurrentUser};
use crate::error::AppError;
use crate::views::{RenderContext, render};

#[derive(Template)]
#[template(path = "users/sign_up.html")]
pub struct SignUpTemplate {
    pub ctx: RenderContext,
    pub email: String,
}

#[derive(Template)]
#[template(path = "users/sign_in.html")]
pub struct SignInTemplate {
    pub ctx: RenderContext,
    pub email: String,
}

#[derive(Template)]
#[template(path = "users/current_user.html")]
struct CurrentUserTemplate {
    ctx: RenderContext,
    email: String,
}

#[derive(Template)]
#[template(path = "users/forgot_password.html")]
pub struct ForgotPasswordTemplate {
    pub ctx: RenderContext,
    pub email: String,
}

#[derive(Template)]
#[template(path = "users/check_your_email.html")]
pub struct CheckYourEmailTemplate {
    pub ctx: RenderContext,
    pub email: String,
}

#[derive(Template)]
#[template(path = "users/reset_password.html")]
pub struct ResetPasswordTemplate {
    pub ctx: RenderContext,
    pub token: String,
}

#[derive(Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct ResetQuery {
    pub token: Option<String>,
}

pub async fn sign_up_page(
    current: CurrentUser,
    Query(q): Query<EmailQuery>,
) -> Result<impl IntoResponse, AppError> {
    render(&SignUpTemplate {
        ctx: RenderContext::from(&current),
        email: q.email.unwrap_or_default(),
    })
}

pub async fn sign_in_page(
    current: CurrentUser,
    Query(q): Query<EmailQuery>,
) -> Result<impl IntoResponse, AppError> {
    render(&SignInTemplate {
        ctx: RenderContext::from(&current),
        email: q.email.unwrap_or_default(),
    })
}

pub async fn current_user_page(AuthUser(user): AuthUser) -> Result<impl IntoResponse, AppError> {
    render(&CurrentUserTemplate {
        ctx: RenderContext::from(&user),
        email: user.email,
    })
}

pub async fn forgot_password_page(
    current: CurrentUser,
    Query(q): Query<EmailQuery>,
) -> Result<impl IntoResponse, AppError> {
    render(&ForgotPasswordTemplate {
        ctx: RenderContext::from(&current),
        email: q.email.unwrap_or_default(),
    })
}

pub async fn reset_password_page(
    current: CurrentUser,
    Query(q): Query<ResetQuery>,
) -> Result<impl IntoResponse, AppError> {
    render(&ResetPasswordTemplate {
        ctx: RenderContext::from(&current),
        token: q.token.unwrap_or_default(),
    })
}
