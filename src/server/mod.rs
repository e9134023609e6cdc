//! HTTP server: public pages, the search API and the admin panel

mod admin;
mod error;
mod public;

use anyhow::Result;
use axum::{
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tera::Context;
use tokio::sync::Mutex;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use error::AppError;

use crate::auth::SessionStore;
use crate::content::MarkdownRenderer;
use crate::store::StoreError;
use crate::templates::TemplateRenderer;
use crate::Folio;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    folio: Arc<Folio>,
    templates: Arc<TemplateRenderer>,
    markdown: Arc<MarkdownRenderer>,
    sessions: SessionStore,
    /// Serializes store mutations; reads never take it
    write_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(folio: Folio) -> Result<Self> {
        let templates = TemplateRenderer::new(&folio.config)?;
        let password = folio.config.admin_password();
        if password.is_none() {
            tracing::warn!(
                "No admin password configured; set admin.password or {} to enable the admin panel",
                crate::config::ADMIN_PASSWORD_ENV
            );
        }
        let sessions = SessionStore::new(password.as_deref(), folio.config.admin.session_ttl_hours);

        Ok(Self {
            folio: Arc::new(folio),
            templates: Arc::new(templates),
            markdown: Arc::new(MarkdownRenderer::new()),
            sessions,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn folio(&self) -> &Folio {
        &self.folio
    }

    /// Run a blocking store call off the async runtime
    async fn store<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&Folio) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let folio = self.folio.clone();
        Ok(tokio::task::spawn_blocking(move || f(folio.as_ref())).await??)
    }

    /// Like [`AppState::store`], holding the write lock until the blocking
    /// call returns, even if the request future is dropped first
    async fn mutate<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&Folio) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let guard = self.write_lock.clone().lock_owned().await;
        let folio = self.folio.clone();
        Ok(tokio::task::spawn_blocking(move || {
            let _guard = guard;
            f(folio.as_ref())
        })
        .await??)
    }

    fn render(&self, template: &str, context: &Context) -> Result<Html<String>, AppError> {
        Ok(Html(self.templates.render(template, context)?))
    }

    fn not_found(&self, message: &str) -> Response {
        let mut context = Context::new();
        context.insert("message", message);
        match self.render("not_found.html", &context) {
            Ok(page) => (StatusCode::NOT_FOUND, page).into_response(),
            Err(err) => err.into_response(),
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/admin", get(admin::dashboard))
        .route("/admin/logout", post(admin::logout))
        .route("/admin/posts", post(admin::create_post))
        .route("/admin/posts/new", get(admin::new_post))
        .route("/admin/posts/import", post(admin::import_post))
        .route("/admin/posts/:slug", post(admin::update_post))
        .route("/admin/posts/:slug/edit", get(admin::edit_post))
        .route("/admin/posts/:slug/delete", post(admin::delete_post))
        .route("/admin/projects", post(admin::create_project))
        .route("/admin/projects/new", get(admin::new_project))
        .route("/admin/projects/:id", post(admin::update_project))
        .route("/admin/projects/:id/edit", get(admin::edit_project))
        .route("/admin/projects/:id/delete", post(admin::delete_project))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin::require_admin,
        ));

    Router::new()
        .route("/", get(public::home))
        .route("/blog", get(public::blog))
        .route("/blog/:slug", get(public::post))
        .route("/tags", get(public::tags))
        .route("/tags/:tag", get(public::tag))
        .route("/projects", get(public::projects))
        .route("/api/search", get(public::search))
        .route("/admin-login", get(admin::login_page).post(admin::login))
        .merge(admin_routes)
        .nest_service("/static", ServeDir::new(&state.folio.static_dir))
        .fallback(public::fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(folio: Folio, ip: &str, port: u16) -> Result<()> {
    let state = AppState::new(folio)?;
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_lock_outlives_dropped_request() {
        let tmp = TempDir::new().unwrap();
        let state = AppState::new(Folio::new(tmp.path()).unwrap()).unwrap();

        let (started_tx, started_rx) = mpsc::channel::<()>();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let request_state = state.clone();
        let request = tokio::spawn(async move {
            request_state
                .mutate(move |_| {
                    started_tx.send(()).unwrap();
                    release_rx.recv().unwrap();
                    Ok(())
                })
                .await
        });

        tokio::task::spawn_blocking(move || started_rx.recv().unwrap())
            .await
            .unwrap();
        // client went away mid-write
        request.abort();
        let _ = request.await;

        assert!(state.write_lock.try_lock().is_err());

        release_tx.send(()).unwrap();
        let released = tokio::time::timeout(Duration::from_secs(5), state.write_lock.lock()).await;
        assert!(released.is_ok());
    }
}
