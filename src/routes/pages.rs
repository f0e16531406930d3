//! Server-rendered pages. The browser-side script talks to the JSON API.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};

use crate::AppState;

pub fn page_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(home_page))
        .route("/users", get(users_page))
}

fn render(state: &AppState, name: &str) -> Response {
    let Some(templates) = &state.templates else {
        return (StatusCode::INTERNAL_SERVER_ERROR, "Templates not available").into_response();
    };

    match templates.get(name) {
        Some(page) => Html(page.to_owned()).into_response(),
        None => {
            tracing::error!(template = name, "template not found");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server error").into_response()
        }
    }
}

pub async fn home_page(State(state): State<Arc<AppState>>) -> Response {
    render(&state, "pages/index.html")
}

pub async fn users_page(State(state): State<Arc<AppState>>) -> Response {
    render(&state, "pages/users.html")
}
