use askama::Template;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::auth::extractor::CurrentUser;
use crate::error::AppError;
use crate::views::{RenderContext, render, render_with_status};

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    ctx: RenderContext,
}

#[derive(Template)]
#[template(path = "contact.html")]
struct ContactTemplate {
    ctx: RenderContext,
}

struct Question {
    question: &'static str,
    answer: &'static str,
}

#[derive(Template)]
#[template(path = "faq.html")]
struct FaqTemplate {
    ctx: RenderContext,
    questions: Vec<Question>,
}

#[derive(Template)]
#[template(path = "not_found.html")]
struct NotFoundTemplate {
    ctx: RenderContext,
}

pub async fn home(current: CurrentUser) -> Result<impl IntoResponse, AppError> {
    render(&HomeTemplate {
        ctx: RenderContext::from(&current),
    })
}

pub async fn contact(current: CurrentUser) -> Result<impl IntoResponse, AppError> {
    render(&ContactTemplate {
        ctx: RenderContext::from(&current),
    })
}

pub async fn faq(current: CurrentUser) -> Result<impl IntoResponse, AppError> {
    let questions = vec![
        Question {
            question: "Is there a free version?",
            answer: "Yes. Galleries and uploads are free while we are in beta.",
        },
        Question {
            question: "Who can see my galleries?",
            answer: "Only you, until you publish a gallery. Published galleries can be viewed by anyone with the link.",
        },
        Question {
            question: "Which files can I upload?",
            answer: "PNG, JPEG and GIF images.",
        },
        Question {
            question: "How do I contact support?",
            answer: "Use the contact page and we will get back to you within a business day.",
        },
    ];
    render(&FaqTemplate {
        ctx: RenderContext::from(&current),
        questions,
    })
}

pub async fn not_found(current: CurrentUser) -> Response {
    render_with_status(
        StatusCode::NOT_FOUND,
        &NotFoundTemplate {
            ctx: RenderContext::from(&current),
        },
    )
}
