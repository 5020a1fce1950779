use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::auth::extractor::CurrentUser;
use crate::auth::{accounts, cookie, resets, sessions};
use crate::email;
use crate::error::AppError;
use crate::models::User;
use crate::state::SharedState;
use crate::views::users::{
    CheckYourEmailTemplate, ForgotPasswordTemplate, ResetPasswordTemplate, SignInTemplate,
    SignUpTemplate,
};
use crate::views::{RenderContext, render, render_with_status};

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct CredentialsForm {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ForgotPasswordForm {
    pub email: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ResetPasswordForm {
    pub token: String,
    pub password: String,
}

/// Start a session for the user and send them to their account page.
async fn sign_in_as(state: &SharedState, jar: CookieJar, user: &User) -> Result<Response, AppError> {
    let session = sessions::create(&state.pool, &state.tokens, user.id).await?;
    let jar = cookie::set_session(jar, &session.token, state.config.cookie_secure);
    Ok((jar, Redirect::to("/users/me")).into_response())
}

pub async fn sign_up(
    State(state): State<SharedState>,
    current: CurrentUser,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    let user = match accounts::sign_up(&state.pool, &form.email, &form.password).await {
        Ok(user) => user,
        Err(e) => {
            let template = SignUpTemplate {
                ctx: RenderContext::from(&current).with_error(e.public_message()),
                email: form.email,
            };
            return Ok(render_with_status(e.form_status(), &template));
        }
    };

    tracing::info!(user_id = user.id, "User signed up");
    sign_in_as(&state, jar, &user).await
}

pub async fn sign_in(
    State(state): State<SharedState>,
    current: CurrentUser,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    let user = match accounts::authenticate(&state.pool, &form.email, &form.password).await {
        Ok(user) => user,
        Err(e) => {
            let template = SignInTemplate {
                ctx: RenderContext::from(&current).with_error(e.public_message()),
                email: form.email,
            };
            return Ok(render_with_status(e.form_status(), &template));
        }
    };

    sign_in_as(&state, jar, &user).await
}

pub async fn sign_out(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    if let Some(token) = cookie::session_token(&jar) {
        sessions::delete(&state.pool, &state.tokens, &token).await?;
    }
    Ok((cookie::clear_session(jar), Redirect::to("/signin")).into_response())
}

pub async fn forgot_password(
    State(state): State<SharedState>,
    current: CurrentUser,
    Form(form): Form<ForgotPasswordForm>,
) -> Result<Response, AppError> {
    let ctx = RenderContext::from(&current);
    let form_error = |e: AppError, ctx: RenderContext, email: String| {
        let template = ForgotPasswordTemplate {
            ctx: ctx.with_error(e.public_message()),
            email,
        };
        render_with_status(e.form_status(), &template)
    };

    let reset =
        match resets::create(&state.pool, &state.tokens, &form.email, state.reset_ttl()).await {
            Ok(reset) => reset,
            Err(e) => return Ok(form_error(e, ctx, form.email)),
        };

    let reset_url = email::reset_url(&state.config.base_url, &reset.token);
    match &state.system_mailer {
        Some(mailer) => {
            if let Err(e) = mailer.send_password_reset(&reset.email, &reset_url).await {
                return Ok(form_error(AppError::Internal(e), ctx, form.email));
            }
        }
        None => {
            tracing::warn!("SMTP not configured. Password reset link: {reset_url}");
        }
    }

    Ok(render(&CheckYourEmailTemplate {
        ctx,
        email: reset.email,
    })?
    .into_response())
}

pub async fn reset_password(
    State(state): State<SharedState>,
    current: CurrentUser,
    jar: CookieJar,
    Form(form): Form<ResetPasswordForm>,
) -> Result<Response, AppError> {
    let form_error = |e: AppError, token: String| {
        let template = ResetPasswordTemplate {
            ctx: RenderContext::from(&current).with_error(e.public_message()),
            token,
        };
        render_with_status(e.form_status(), &template)
    };

    if form.password.is_empty() {
        let e = AppError::Validation("Password must not be empty.".to_string());
        return Ok(form_error(e, form.token));
    }

    let user = match resets::consume(&state.pool, &state.tokens, &form.token).await {
        Ok(user) => user,
        Err(e) => return Ok(form_error(e, form.token)),
    };

    accounts::update_password(&state.pool, user.id, &form.password).await?;
    tracing::info!(user_id = user.id, "Password reset completed");

    sign_in_as(&state, jar, &user).await
}
