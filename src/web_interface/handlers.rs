//! Request handlers.
//!
//! Each handler performs at most one storage operation. Mutations answer with
//! `303 See Other` back to `/`, so the browser always re-fetches the list.
//! Failures come back as [`WebError`] and are turned into an error page by
//! [`respond`].

use std::sync::Arc;

use chrono::Utc;
use log::{error, info, warn};
use warp::http::{StatusCode, Uri};
use warp::reply::{self, Response};
use warp::Reply;

use super::types::{CreateForm, DeleteForm, UpdateForm};
use crate::error_handling::types::WebError;
use crate::rendering::template::escape_into;
use crate::rendering::{PageData, PageRenderer};
use crate::storage::{Storage, TodoId};

/// Everything a handler needs, built once at startup and shared by all requests.
pub struct AppContext {
    pub storage: Arc<dyn Storage>,
    pub renderer: PageRenderer,
    pub page_title: String,
}

/// GET /
pub async fn list_todos(ctx: &AppContext) -> Result<Response, WebError> {
    let todos = ctx.storage.find_all_todos().await?;
    let html = ctx.renderer.render(&PageData {
        title: &ctx.page_title,
        todos: &todos,
    })
    .await?;
    Ok(reply::html(html).into_response())
}

/// POST /create-todo
pub async fn create_todo(ctx: &AppContext, form: CreateForm) -> Result<Response, WebError> {
    let id = ctx.storage.insert_todo(&form.title, Utc::now()).await?;
    info!("Created todo {}", id);
    Ok(redirect_home())
}

/// POST /update
pub async fn update_todo(ctx: &AppContext, form: UpdateForm) -> Result<Response, WebError> {
    let id = TodoId::parse(&form.id)?;
    let matched = ctx.storage.update_title(&id, &form.title).await?;
    info!("Updated todo {} ({} matched)", id, matched);
    Ok(redirect_home())
}

/// POST /delete
pub async fn delete_todo(ctx: &AppContext, form: DeleteForm) -> Result<Response, WebError> {
    let id = TodoId::parse(&form.id)?;
    let deleted = ctx.storage.delete_by_id(&id).await?;
    info!("Deleted todo {} ({} removed)", id, deleted);
    Ok(redirect_home())
}

fn redirect_home() -> Response {
    warp::redirect::see_other(Uri::from_static("/")).into_response()
}

/// Collapse a handler outcome into the response sent to the client.
pub fn respond(result: Result<Response, WebError>) -> Response {
    match result {
        Ok(response) => response,
        Err(err) => error_response(&err),
    }
}

fn error_response(err: &WebError) -> Response {
    let (status, message) = if err.is_client_error() {
        warn!("Rejected request: {}", err);
        (StatusCode::BAD_REQUEST, err.to_string())
    } else {
        error!("Request failed: {}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "The server could not complete the request.".to_string(),
        )
    };

    let mut body = String::from("<!DOCTYPE html><html><head><title>");
    body.push_str(status.canonical_reason().unwrap_or("Error"));
    body.push_str("</title></head><body><h1>");
    body.push_str(status.as_str());
    body.push(' ');
    body.push_str(status.canonical_reason().unwrap_or("Error"));
    body.push_str("</h1><p>");
    escape_into(&mut body, &message);
    body.push_str("</p><p><a href=\"/\">Back to the list</a></p></body></html>");

    reply::with_status(reply::html(body), status).into_response()
}
