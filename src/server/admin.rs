//! Admin panel: login, the session guard, and post/project editing
//!
//! Every mutation answers with a redirect to the dashboard carrying either a
//! `notice` or an `error` message.

use axum::extract::{Multipart, Path, Query, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Local;
use serde::Deserialize;
use tera::Context;

use super::{AppError, AppState};
use crate::auth::AuthError;
use crate::content::{PostInput, ProjectInput};
use crate::helpers::admin_notice_path;
use crate::templates::{gradient_options, PostForm, ProjectForm};

const LOGIN_PATH: &str = "/admin-login";
const DASHBOARD_PATH: &str = "/admin";

impl AppState {
    fn session_token(&self, jar: &CookieJar) -> Option<String> {
        jar.get(&self.folio.config.admin.cookie_name)
            .map(|cookie| cookie.value().to_string())
    }

    fn is_signed_in(&self, jar: &CookieJar) -> bool {
        self.session_token(jar)
            .map(|token| self.sessions.validate(&token))
            .unwrap_or(false)
    }
}

/// Route layer guarding everything under /admin
pub(super) async fn require_admin(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    if !state.is_signed_in(&jar) {
        tracing::debug!("Unauthenticated request to {}", request.uri().path());
        return Redirect::to(LOGIN_PATH).into_response();
    }
    next.run(request).await
}

fn notice(message: &str) -> Redirect {
    Redirect::to(&admin_notice_path("notice", message))
}

fn failure(message: &str) -> Redirect {
    Redirect::to(&admin_notice_path("error", message))
}

/// Turn a store result into the dashboard redirect. Store failures become an
/// `error` message; anything else is a server error.
fn finish<T>(result: Result<T, AppError>, success: &str) -> Result<Redirect, AppError> {
    match result {
        Ok(_) => Ok(notice(success)),
        Err(AppError::Store(err)) => {
            tracing::warn!("Admin action failed: {}", err);
            Ok(failure(&err.to_string()))
        }
        Err(err) => Err(err),
    }
}

// Login

pub(super) async fn login_page(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    if state.is_signed_in(&jar) {
        return Ok(Redirect::to(DASHBOARD_PATH).into_response());
    }
    render_login(&state, None)
}

fn render_login(state: &AppState, error: Option<&str>) -> Result<Response, AppError> {
    let mut context = Context::new();
    context.insert("error", &error);
    Ok(state.render("admin/login.html", &context)?.into_response())
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct LoginForm {
    #[serde(default)]
    password: String,
}

pub(super) async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match state.sessions.login(&form.password) {
        Ok(token) => {
            let cookie = Cookie::build((state.folio.config.admin.cookie_name.clone(), token))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax);
            Ok((jar.add(cookie), Redirect::to(DASHBOARD_PATH)).into_response())
        }
        Err(AuthError::Disabled) => {
            render_login(&state, Some("Admin login is not configured on this server."))
        }
        Err(AuthError::InvalidPassword) => render_login(&state, Some("Incorrect password.")),
    }
}

pub(super) async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(token) = state.session_token(&jar) {
        state.sessions.logout(&token);
    }
    let removal = Cookie::build((state.folio.config.admin.cookie_name.clone(), "")).path("/");
    (jar.remove(removal), Redirect::to(LOGIN_PATH)).into_response()
}

// Dashboard

#[derive(Debug, Default, Deserialize)]
pub(super) struct Flash {
    notice: Option<String>,
    error: Option<String>,
}

pub(super) async fn dashboard(
    State(state): State<AppState>,
    Query(flash): Query<Flash>,
) -> Result<Response, AppError> {
    let (posts, projects) = state
        .store(|folio| Ok((folio.posts.list_posts()?, folio.projects.list_projects()?)))
        .await?;

    let mut context = Context::new();
    context.insert("posts", &posts);
    context.insert("projects", &projects);
    context.insert("notice", &flash.notice);
    context.insert("error", &flash.error);
    Ok(state.render("admin/dashboard.html", &context)?.into_response())
}

// Posts

fn render_post_form(
    state: &AppState,
    original_slug: Option<&str>,
    form: &PostForm,
) -> Result<Response, AppError> {
    let mut context = Context::new();
    context.insert("original_slug", &original_slug);
    context.insert("form", form);
    Ok(state.render("admin/post_form.html", &context)?.into_response())
}

pub(super) async fn new_post(State(state): State<AppState>) -> Result<Response, AppError> {
    let form = PostForm {
        date: Local::now().format("%Y-%m-%d").to_string(),
        ..Default::default()
    };
    render_post_form(&state, None, &form)
}

pub(super) async fn edit_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let lookup = slug.clone();
    match state.store(move |folio| folio.posts.get_post(&lookup)).await {
        Ok(post) => render_post_form(&state, Some(&slug), &PostForm::from(&post)),
        Err(AppError::Store(err)) if err.is_not_found() => {
            Ok(failure("Post not found").into_response())
        }
        Err(err) => Err(err),
    }
}

pub(super) async fn create_post(
    State(state): State<AppState>,
    Form(input): Form<PostInput>,
) -> Result<Redirect, AppError> {
    let result = state.mutate(move |folio| folio.posts.create_post(input)).await;
    finish(result, "Post saved")
}

pub(super) async fn update_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Form(input): Form<PostInput>,
) -> Result<Redirect, AppError> {
    let result = state
        .mutate(move |folio| folio.posts.update_post(&slug, input))
        .await;
    finish(result, "Post updated")
}

pub(super) async fn delete_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Redirect, AppError> {
    let result = state.mutate(move |folio| folio.posts.delete_post(&slug)).await;
    finish(result, "Post deleted")
}

/// An uploaded file pulled out of the import form
struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

async fn read_upload(multipart: &mut Multipart) -> Result<Option<Upload>, String> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| "Invalid form data".to_string())?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(|name| name.trim().to_string())
            .unwrap_or_default();
        let bytes = field
            .bytes()
            .await
            .map_err(|_| "Could not read the uploaded file".to_string())?;
        if filename.is_empty() || bytes.is_empty() {
            return Ok(None);
        }
        return Ok(Some(Upload {
            filename,
            bytes: bytes.to_vec(),
        }));
    }
    Ok(None)
}

pub(super) async fn import_post(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    let upload = match read_upload(&mut multipart).await {
        Ok(Some(upload)) => upload,
        Ok(None) => return Ok(failure("No file uploaded")),
        Err(message) => return Ok(failure(&message)),
    };

    let result = state
        .mutate(move |folio| folio.posts.import_post(&upload.bytes, &upload.filename))
        .await;
    finish(result, "Post imported")
}

// Projects

fn render_project_form(
    state: &AppState,
    project_id: Option<&str>,
    form: &ProjectForm,
) -> Result<Response, AppError> {
    let mut context = Context::new();
    context.insert("project_id", &project_id);
    context.insert("form", form);
    context.insert("gradients", &gradient_options());
    Ok(state.render("admin/project_form.html", &context)?.into_response())
}

pub(super) async fn new_project(State(state): State<AppState>) -> Result<Response, AppError> {
    let form = ProjectForm {
        gradient: crate::content::default_gradient(),
        ..Default::default()
    };
    render_project_form(&state, None, &form)
}

pub(super) async fn edit_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let lookup = id.clone();
    match state.store(move |folio| folio.projects.get_project(&lookup)).await {
        Ok(project) => render_project_form(&state, Some(&id), &ProjectForm::from(&project)),
        Err(AppError::Store(err)) if err.is_not_found() => {
            Ok(failure("Project not found").into_response())
        }
        Err(err) => Err(err),
    }
}

pub(super) async fn create_project(
    State(state): State<AppState>,
    Form(input): Form<ProjectInput>,
) -> Result<Redirect, AppError> {
    let result = state
        .mutate(move |folio| folio.projects.create_project(input))
        .await;
    finish(result, "Project saved")
}

pub(super) async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(input): Form<ProjectInput>,
) -> Result<Redirect, AppError> {
    let result = state
        .mutate(move |folio| folio.projects.update_project(&id, input))
        .await;
    finish(result, "Project updated")
}

pub(super) async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let result = state
        .mutate(move |folio| folio.projects.delete_project(&id))
        .await;
    finish(result, "Project deleted")
}
