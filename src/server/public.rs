//! Public pages and the search endpoint

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tera::Context;

use super::{AppError, AppState};
use crate::helpers::{group_by_year, posts_with_tag, search_posts, tag_counts, SearchHit};

pub(super) async fn home(State(state): State<AppState>) -> Result<Response, AppError> {
    let (posts, projects) = state
        .store(|folio| Ok((folio.posts.list_posts()?, folio.projects.list_projects()?)))
        .await?;
    let recent: Vec<_> = posts
        .iter()
        .take(state.folio().config.home_posts)
        .collect();

    let mut context = Context::new();
    context.insert("posts", &recent);
    context.insert("projects", &projects);
    Ok(state.render("home.html", &context)?.into_response())
}

pub(super) async fn blog(State(state): State<AppState>) -> Result<Response, AppError> {
    let posts = state.store(|folio| folio.posts.list_posts()).await?;

    let mut context = Context::new();
    context.insert("years", &group_by_year(&posts));
    Ok(state.render("blog.html", &context)?.into_response())
}

pub(super) async fn post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let lookup = slug.clone();
    let post = match state.store(move |folio| folio.posts.get_post(&lookup)).await {
        Ok(post) => post,
        Err(AppError::Store(err)) if err.is_not_found() => {
            tracing::debug!("No post for slug {}", slug);
            return Ok(state.not_found("That post does not exist."));
        }
        Err(err) => return Err(err),
    };

    let rendered = state.markdown.render_with_toc(&post.content);
    let mut context = Context::new();
    context.insert("post", &post);
    context.insert("body", &rendered.html);
    context.insert("toc", &rendered.toc);
    context.insert("reading_minutes", &post.reading_minutes());
    Ok(state.render("post.html", &context)?.into_response())
}

pub(super) async fn tags(State(state): State<AppState>) -> Result<Response, AppError> {
    let posts = state.store(|folio| folio.posts.list_posts()).await?;

    let mut context = Context::new();
    context.insert("tags", &tag_counts(&posts));
    Ok(state.render("tags.html", &context)?.into_response())
}

pub(super) async fn tag(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> Result<Response, AppError> {
    let posts = state.store(|folio| folio.posts.list_posts()).await?;

    let mut context = Context::new();
    context.insert("tag", &tag);
    context.insert("posts", &posts_with_tag(&posts, &tag));
    Ok(state.render("tag.html", &context)?.into_response())
}

pub(super) async fn projects(State(state): State<AppState>) -> Result<Response, AppError> {
    let projects = state.store(|folio| folio.projects.list_projects()).await?;

    let mut context = Context::new();
    context.insert("projects", &projects);
    Ok(state.render("projects.html", &context)?.into_response())
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct SearchQuery {
    #[serde(default)]
    q: String,
}

pub(super) async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<SearchHit>>, AppError> {
    if query.q.trim().is_empty() {
        return Ok(Json(Vec::new()));
    }

    let posts = state.store(|folio| folio.posts.list_posts()).await?;
    let hits = search_posts(&posts, &query.q, state.folio().config.search_limit)
        .into_iter()
        .map(SearchHit::from)
        .collect();
    Ok(Json(hits))
}

pub(super) async fn fallback(State(state): State<AppState>) -> Response {
    state.not_found("The page you are looking for does not exist.")
}
