use axum::extract::{Multipart, Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::policy;
use crate::state::SharedState;
use crate::storage;
use crate::views::galleries::{NewGalleryTemplate, edit_template, find_gallery};
use crate::views::{RenderContext, render_with_status};

/// Form value of the visibility radio that publishes a gallery.
const VISIBILITY_PUBLIC: &str = "public";

/// Multipart field carrying uploaded files.
const IMAGES_FIELD: &str = "images";

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct GalleryForm {
    pub title: String,
    pub visibility: String,
}

fn edit_path(id: i64) -> String {
    format!("/galleries/{id}/edit")
}

fn validate_title(title: &str) -> Result<&str, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Title must not be empty.".to_string()));
    }
    Ok(title)
}

pub async fn create(
    AuthUser(user): AuthUser,
    State(state): State<SharedState>,
    Form(form): Form<GalleryForm>,
) -> Result<Response, AppError> {
    let title = match validate_title(&form.title) {
        Ok(title) => title,
        Err(e) => {
            let template = NewGalleryTemplate {
                ctx: RenderContext::from(&user).with_error(e.public_message()),
                title: form.title.clone(),
            };
            return Ok(render_with_status(e.form_status(), &template));
        }
    };

    let gallery = db::galleries::create(&state.pool, user.id, title).await?;
    tracing::info!(gallery_id = gallery.id, user_id = user.id, "Gallery created");
    Ok(Redirect::to(&edit_path(gallery.id)).into_response())
}

pub async fn update(
    AuthUser(user): AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Form(form): Form<GalleryForm>,
) -> Result<Response, AppError> {
    let gallery = find_gallery(&state, &id).await?;
    policy::must_own_gallery(Some(&user), &gallery)?;

    let title = match validate_title(&form.title) {
        Ok(title) => title,
        Err(e) => {
            let ctx = RenderContext::from(&user).with_error(e.public_message());
            let template = edit_template(&state, ctx, gallery).await?;
            return Ok(render_with_status(e.form_status(), &template));
        }
    };

    let published = form.visibility == VISIBILITY_PUBLIC;
    let gallery = db::galleries::update(&state.pool, gallery.id, title, published).await?;
    Ok(Redirect::to(&edit_path(gallery.id)).into_response())
}

pub async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let gallery = find_gallery(&state, &id).await?;
    policy::must_own_gallery(Some(&user), &gallery)?;

    db::galleries::delete(&state.pool, gallery.id).await?;
    state.images.delete_gallery(gallery.id).await?;

    tracing::info!(gallery_id = gallery.id, "Gallery deleted");
    Ok(Redirect::to("/galleries").into_response())
}

/// Accept one or more files from the `images` field. Every file is checked
/// before the first one is written.
pub async fn upload_images(
    AuthUser(user): AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let gallery = find_gallery(&state, &id).await?;
    policy::must_own_gallery(Some(&user), &gallery)?;

    let mut uploads = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Could not read the upload: {e}")))?
    {
        if field.name() != Some(IMAGES_FIELD) {
            continue;
        }
        // Browsers send an unnamed empty part when no file was picked.
        let Some(filename) = field.file_name().filter(|n| !n.is_empty()).map(str::to_string)
        else {
            continue;
        };
        let contents = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read {filename}: {e}")))?;

        storage::validate_upload(&filename, &contents)?;
        uploads.push((filename, contents));
    }

    for (filename, contents) in &uploads {
        state.images.create(gallery.id, filename, contents).await?;
    }

    Ok(Redirect::to(&edit_path(gallery.id)).into_response())
}

pub async fn delete_image(
    AuthUser(user): AuthUser,
    State(state): State<SharedState>,
    Path((id, filename)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let gallery = find_gallery(&state, &id).await?;
    policy::must_own_gallery(Some(&user), &gallery)?;

    state.images.delete(gallery.id, &filename).await?;
    Ok(Redirect::to(&edit_path(gallery.id)).into_response())
}
