use std::convert::Infallible;
use std::sync::Arc;

use warp::http::StatusCode;
use warp::path::Tail;
use warp::reply::{self, Response};
use warp::{Filter, Rejection, Reply};

use super::handlers::{self, respond, AppContext};
use super::types::{CreateForm, DeleteForm, FormPairs, UpdateForm};
use crate::rendering;

fn with_context(
    ctx: Arc<AppContext>,
) -> impl Filter<Extract = (Arc<AppContext>,), Error = Infallible> + Clone {
    warp::any().map(move || ctx.clone())
}

/// Decode a urlencoded body as raw pairs, then build the form from them.
/// No length limit is applied, so titles of any size are accepted.
fn form_body<T>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
where
    T: From<FormPairs> + Send,
{
    warp::body::form::<FormPairs>().map(T::from)
}

/// GET /
pub fn list_route(
    ctx: Arc<AppContext>,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    warp::path::end()
        .and(warp::get())
        .and(with_context(ctx))
        .and_then(|ctx: Arc<AppContext>| async move {
            Ok::<_, Rejection>(respond(handlers::list_todos(&ctx).await))
        })
}

/// POST /create-todo
pub fn create_route(
    ctx: Arc<AppContext>,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    warp::path("create-todo")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_context(ctx))
        .and(form_body::<CreateForm>())
        .and_then(|ctx: Arc<AppContext>, form: CreateForm| async move {
            Ok::<_, Rejection>(respond(handlers::create_todo(&ctx, form).await))
        })
}

/// POST /update
pub fn update_route(
    ctx: Arc<AppContext>,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    warp::path("update")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_context(ctx))
        .and(form_body::<UpdateForm>())
        .and_then(|ctx: Arc<AppContext>, form: UpdateForm| async move {
            Ok::<_, Rejection>(respond(handlers::update_todo(&ctx, form).await))
        })
}

/// POST /delete
pub fn delete_route(
    ctx: Arc<AppContext>,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    warp::path("delete")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_context(ctx))
        .and(form_body::<DeleteForm>())
        .and_then(|ctx: Arc<AppContext>, form: DeleteForm| async move {
            Ok::<_, Rejection>(respond(handlers::delete_todo(&ctx, form).await))
        })
}

/// GET /static/<file>
pub fn static_route() -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    warp::path("static")
        .and(warp::path::tail())
        .and(warp::get())
        .map(|tail: Tail| match rendering::asset(tail.as_str()) {
            Some(asset) => reply::with_header(
                asset.data.into_owned(),
                "Content-Type",
                asset.content_type,
            )
            .into_response(),
            None => reply::with_status("Not found", StatusCode::NOT_FOUND).into_response(),
        })
}

/// All routes of the application.
pub fn todo_routes(
    ctx: Arc<AppContext>,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    list_route(ctx.clone())
        .or(create_route(ctx.clone()))
        .unify()
        .or(update_route(ctx.clone()))
        .unify()
        .or(delete_route(ctx))
        .unify()
        .or(static_route())
        .unify()
}
