//! HTTP surface: view pages, edit them, rename on edit.
//!
//! The handlers are thin plumbing over [`WikiGraph`]: reads take snapshot
//! clones, edits call `write_document` + `reload_one`, and a submitted name
//! that differs from the page's current name triggers `rename` first. Names
//! are validated here before calling into the core, which re-validates
//! regardless.

use axum::{
    extract::{Path as UrlPath, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use std::{future::Future, net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;

use crate::{document::Document, error::WikiError, graph, graph::WikiGraph};

impl IntoResponse for WikiError {
    fn into_response(self) -> Response {
        tracing::warn!("Request failed: {self}");
        (self.status_code(), self.to_string()).into_response()
    }
}

/// Form body for `POST /{name}/edit`. `name` differs from the URL name when
/// the user renamed the page from the edit form.
#[derive(Debug, Deserialize)]
struct EditForm {
    name: String,
    body: String,
}

/// Build the wiki router over a shared graph handle.
pub fn router(graph: Arc<WikiGraph>) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/index") }))
        .route("/today", get(today))
        .route("/:name", get(view_page))
        .route("/:name/edit", get(edit_page).post(post_edit))
        .layer(TraceLayer::new_for_http())
        .with_state(graph)
}

/// Serve the wiki until `shutdown` resolves.
pub async fn serve(
    graph: Arc<WikiGraph>,
    port: u16,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), WikiError> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Wiki server running at http://{addr}");
    axum::serve(listener, router(graph).into_make_service())
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Redirect to the diary page for the current date, e.g. `/2026-08-31`.
async fn today() -> Redirect {
    let name = chrono::Local::now().format("%Y-%m-%d").to_string();
    Redirect::to(&format!("/{name}"))
}

async fn view_page(
    State(graph): State<Arc<WikiGraph>>,
    UrlPath(name): UrlPath<String>,
) -> Result<Response, WikiError> {
    if !graph::is_valid_name(&name) {
        return Err(WikiError::InvalidName(name));
    }
    match graph.get(&name).await {
        Some(doc) => Ok(Html(page_html(&doc)).into_response()),
        // Unknown pages go straight to their edit form, which is how new
        // pages (diary pages included) get created.
        None => Ok(Redirect::to(&format!("/{name}/edit")).into_response()),
    }
}

async fn edit_page(
    State(graph): State<Arc<WikiGraph>>,
    UrlPath(name): UrlPath<String>,
) -> Result<Response, WikiError> {
    if !graph::is_valid_name(&name) {
        return Err(WikiError::InvalidName(name));
    }
    let raw = graph.get(&name).await.map(|doc| doc.raw).unwrap_or_default();
    Ok(Html(edit_html(&name, &raw)).into_response())
}

async fn post_edit(
    State(graph): State<Arc<WikiGraph>>,
    UrlPath(old_name): UrlPath<String>,
    Form(form): Form<EditForm>,
) -> Result<Response, WikiError> {
    if !graph::is_valid_name(&old_name) {
        return Err(WikiError::InvalidName(old_name));
    }
    if !graph::is_valid_name(&form.name) {
        return Err(WikiError::InvalidName(form.name));
    }

    // A changed name is a rename; propagate it before writing the new body.
    if form.name != old_name && graph.get(&old_name).await.is_some() {
        graph.rename(&old_name, &form.name).await?;
    }

    graph.write_document(&form.name, &form.body).await?;
    graph.reload_one(&form.name).await?;
    Ok(Redirect::to(&format!("/{}", form.name)).into_response())
}

fn page_html(doc: &Document) -> String {
    let mut backlinks = String::new();
    for name in &doc.backlinks {
        backlinks.push_str(&format!(
            "<li><a href=\"/{name}\">{}</a></li>",
            escape_html(name)
        ));
    }
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>{title}</title></head>\n<body>\n\
         <nav><a href=\"/index\">index</a> <a href=\"/search\">search</a> \
         <a href=\"/today\">today</a> <a href=\"/{name}/edit\">edit</a></nav>\n\
         <main>{content}</main>\n\
         <aside><h2>Backlinks</h2><ul>{backlinks}</ul></aside>\n\
         </body>\n</html>\n",
        title = escape_html(&doc.title),
        name = doc.name,
        content = doc.rendered.as_str(),
    )
}

fn edit_html(name: &str, raw: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>edit {name_esc}</title></head>\n<body>\n\
         <form method=\"post\" action=\"/{name}/edit\">\n\
         <input type=\"text\" name=\"name\" value=\"{name_esc}\">\n\
         <textarea name=\"body\" rows=\"30\" cols=\"80\">{raw_esc}</textarea>\n\
         <button type=\"submit\">save</button>\n\
         </form>\n</body>\n</html>\n",
        name = name,
        name_esc = escape_html(name),
        raw_esc = escape_html(raw),
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
