use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

use crate::error_pages::ErrorMessage;

#[derive(Error, Debug)]
pub enum AppError {
    /// The sales source could not be reached or answered with a failure status.
    #[error("Data fetch error: {0}")]
    DataFetch(String),

    /// The sales source answered, but not with the expected records.
    #[error("Data format error: {0}")]
    DataFormat(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::DataFormat(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::DataFetch(msg) => {
                tracing::error!("Data fetch error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    format!("Could not load sales data: {}", msg),
                )
            }
            AppError::DataFormat(msg) => {
                tracing::error!("Data format error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    format!("Sales data has an unexpected format: {}", msg),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        let html = format!(
            r#"<div class="alert alert-error">
                <p>{}</p>
            </div>"#,
            html_escape(&message)
        );

        let mut response = (status, Html(html)).into_response();
        response.extensions_mut().insert(ErrorMessage(message));
        response
    }
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

pub type AppResult<T> = Result<T, AppError>;

pub trait RenderHtml {
    fn render_html(self) -> AppResult<Html<String>>;
}

impl<T: Template> RenderHtml for T {
    fn render_html(self) -> AppResult<Html<String>> {
        self.render()
            .map(Html)
            .map_err(|e| AppError::Internal(format!("Template error: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape("<a href=\"x\">Tom & 'Jerry'</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_upstream_errors_map_to_bad_gateway() {
        let response = AppError::DataFetch("connection refused".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = AppError::DataFormat("missing field `lat`".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_error_message_extension() {
        let response = AppError::Validation("Unknown region: Marte".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let message = response.extensions().get::<ErrorMessage>().map(|m| m.0.clone());
        assert_eq!(message.as_deref(), Some("Unknown region: Marte"));
    }
}
