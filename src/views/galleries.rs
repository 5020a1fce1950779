use askama::Template;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::auth::extractor::{AuthUser, CurrentUser};
use crate::db;
use crate::error::AppError;
use crate::models::{Gallery, Image};
use crate::policy;
use crate::state::SharedState;
use crate::views::{RenderContext, render};

#[derive(Template)]
#[template(path = "galleries/index.html")]
struct IndexTemplate {
    ctx: RenderContext,
    galleries: Vec<Gallery>,
}

#[derive(Template)]
#[template(path = "galleries/new.html")]
pub struct NewGalleryTemplate {
    pub ctx: RenderContext,
    pub title: String,
}

#[derive(Template)]
#[template(path = "galleries/show.html")]
struct ShowTemplate {
    ctx: RenderContext,
    title: String,
    images: Vec<ImageLink>,
}

#[derive(Template)]
#[template(path = "galleries/edit.html")]
pub struct EditGalleryTemplate {
    pub ctx: RenderContext,
    pub id: i64,
    pub title: String,
    pub published: bool,
    pub images: Vec<ImageLink>,
}

/// An image as templates see it: the escaped URL plus the display name.
pub struct ImageLink {
    pub filename: String,
    pub url: String,
}

impl From<&Image> for ImageLink {
    fn from(image: &Image) -> Self {
        Self {
            filename: image.filename.clone(),
            url: format!(
                "/galleries/{}/images/{}",
                image.gallery_id,
                urlencoding::encode(&image.filename)
            ),
        }
    }
}

#[derive(Deserialize)]
pub struct NewGalleryQuery {
    pub title: Option<String>,
}

/// Look up a gallery from a raw path segment. Non-numeric ids and unknown
/// galleries are both not found.
pub async fn find_gallery(state: &SharedState, raw_id: &str) -> Result<Gallery, AppError> {
    let id: i64 = raw_id
        .parse()
        .map_err(|_| AppError::NotFound("Gallery not found".to_string()))?;
    db::galleries::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Gallery not found".to_string()))
}

pub async fn edit_template(
    state: &SharedState,
    ctx: RenderContext,
    gallery: Gallery,
) -> Result<EditGalleryTemplate, AppError> {
    let images = state.images.list(gallery.id).await?;
    Ok(EditGalleryTemplate {
        ctx,
        id: gallery.id,
        title: gallery.title,
        published: gallery.published,
        images: images.iter().map(ImageLink::from).collect(),
    })
}

pub async fn index(
    AuthUser(user): AuthUser,
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    let galleries = db::galleries::list_by_user(&state.pool, user.id).await?;
    render(&IndexTemplate {
        ctx: RenderContext::from(&user),
        galleries,
    })
}

pub async fn new_page(
    AuthUser(user): AuthUser,
    Query(q): Query<NewGalleryQuery>,
) -> Result<impl IntoResponse, AppError> {
    render(&NewGalleryTemplate {
        ctx: RenderContext::from(&user),
        title: q.title.unwrap_or_default(),
    })
}

pub async fn show(
    current: CurrentUser,
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let gallery = find_gallery(&state, &id).await?;
    policy::must_own_or_public_gallery(current.user(), &gallery)?;

    let images = state.images.list(gallery.id).await?;
    render(&ShowTemplate {
        ctx: RenderContext::from(&current),
        title: gallery.title,
        images: images.iter().map(ImageLink::from).collect(),
    })
}

pub async fn edit_page(
    AuthUser(user): AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let gallery = find_gallery(&state, &id).await?;
    policy::must_own_gallery(Some(&user), &gallery)?;

    let template = edit_template(&state, RenderContext::from(&user), gallery).await?;
    render(&template)
}

pub async fn image(
    current: CurrentUser,
    State(state): State<SharedState>,
    Path((id, filename)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let gallery = find_gallery(&state, &id).await?;
    policy::must_own_or_public_gallery(current.user(), &gallery)?;

    let image = state.images.find(gallery.id, &filename).await?;
    let contents = tokio::fs::read(&image.path).await?;
    let mime = mime_guess::from_path(&image.path).first_or_octet_stream();

    Ok(([(header::CONTENT_TYPE, mime.to_string())], contents).into_response())
}
