use askama::Template;
use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode, Uri};
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Response};

use crate::state::{AppState, JsManifest};
use crate::VERSION;

/// Message carried from a failed handler to the error page.
#[derive(Clone)]
pub struct ErrorMessage(pub String);

#[derive(Template)]
#[template(path = "pages/error.html")]
struct ErrorPageTemplate {
    title: String,
    manifest: JsManifest,
    version: &'static str,
    status_code: u16,
    status_text: &'static str,
    message: String,
    hint: &'static str,
    /// Same request again, offered when the sales source failed.
    retry_href: Option<String>,
}

/// What the dashboard tells the user for one status code.
struct StatusPage {
    text: &'static str,
    message: &'static str,
    hint: &'static str,
}

fn status_page(status: StatusCode) -> StatusPage {
    match status.as_u16() {
        400 => StatusPage {
            text: "Bad Request",
            message: "The filter values could not be understood.",
            hint: "Verifique a região, o ano e a quantidade de vendedores escolhidos.",
        },
        404 => StatusPage {
            text: "Not Found",
            message: "There is no dashboard page at this address.",
            hint: "O dashboard de vendas fica na página inicial.",
        },
        502 => StatusPage {
            text: "Bad Gateway",
            message: "The sales data source is unavailable.",
            hint: "Os dados de vendas não puderam ser carregados. Tente novamente.",
        },
        500..=599 => StatusPage {
            text: "Internal Server Error",
            message: "The dashboard could not be rendered.",
            hint: "Tente novamente em instantes.",
        },
        _ => StatusPage {
            text: "Error",
            message: "",
            hint: "",
        },
    }
}

/// Paths whose failures keep their own body instead of the error page.
fn keeps_own_body(path: &str) -> bool {
    path.starts_with("/api/") || path == "/health"
}

/// Middleware that replaces failed dashboard responses with a full error page.
pub async fn error_page_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let uri = request.uri().clone();
    let response = next.run(request).await;

    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let message = response.extensions().get::<ErrorMessage>().map(|m| m.0.clone());
    tracing::warn!(
        %status,
        path = uri.path(),
        message = message.as_deref().unwrap_or(""),
        "Dashboard request failed"
    );

    if keeps_own_body(uri.path()) {
        return response;
    }
    render_error_page(&state, status, &uri, message)
}

/// Fallback handler for unmatched routes.
pub async fn fallback_handler() -> Response {
    let mut response = StatusCode::NOT_FOUND.into_response();
    response.extensions_mut().insert(ErrorMessage(
        status_page(StatusCode::NOT_FOUND).message.into(),
    ));
    response
}

fn render_error_page(
    state: &AppState,
    status: StatusCode,
    uri: &Uri,
    message: Option<String>,
) -> Response {
    let page = status_page(status);
    let retry_href = (status == StatusCode::BAD_GATEWAY).then(|| {
        uri.path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".into())
    });

    let template = ErrorPageTemplate {
        title: page.text.to_string(),
        manifest: state.manifest.clone(),
        version: VERSION,
        status_code: status.as_u16(),
        status_text: page.text,
        message: message.unwrap_or_else(|| default_message(status)),
        hint: page.hint,
        retry_href,
    };

    match template.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render error page: {}", e);
            (status, page.text).into_response()
        }
    }
}

fn default_message(status: StatusCode) -> String {
    let message = status_page(status).message;
    if message.is_empty() {
        format!("An unexpected error occurred ({}).", status.as_u16())
    } else {
        message.to_string()
    }
}
