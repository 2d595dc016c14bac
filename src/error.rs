use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::fmt;

#[derive(Debug)]
pub enum Error {
    MissingInput(String),
    NoMatch(String),
    MissingCredentials(String),
    Auth(String),
    Network(String),
    BadRequest(String),
    Internal(String),
    Item { index: usize, source: Box<Error> },
}

impl Error {
    pub fn at_item(self, index: usize) -> Self {
        if matches!(self, Error::Item { .. }) {
            return self;
        }
        Error::Item {
            index,
            source: Box::new(self),
        }
    }

    /// Message without the kind prefix, as reported back in continue-on-fail output.
    pub fn message(&self) -> String {
        match self {
            Error::MissingInput(msg)
            | Error::Auth(msg)
            | Error::Network(msg)
            | Error::BadRequest(msg)
            | Error::Internal(msg) => msg.clone(),
            Error::NoMatch(pattern) => format!("No binary files match the pattern: {pattern}"),
            Error::MissingCredentials(kind) => format!("No credentials configured for {kind}"),
            Error::Item { source, .. } => source.message(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Error::MissingInput(_) | Error::MissingCredentials(_) | Error::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::NoMatch(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Auth(_) => StatusCode::UNAUTHORIZED,
            Error::Network(_) => StatusCode::BAD_GATEWAY,
            Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Item { source, .. } => source.status(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingInput(msg) => write!(f, "missing input: {msg}"),
            Error::NoMatch(pattern) => {
                write!(f, "no match: no binary files match the pattern: {pattern}")
            }
            Error::MissingCredentials(kind) => {
                write!(f, "missing credentials: none configured for {kind}")
            }
            Error::Auth(msg) => write!(f, "authentication failed: {msg}"),
            Error::Network(msg) => write!(f, "network error: {msg}"),
            Error::BadRequest(msg) => write!(f, "bad request: {msg}"),
            Error::Internal(msg) => write!(f, "internal error: {msg}"),
            Error::Item { index, source } => write!(f, "item {index}: {source}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Network(e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Internal(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Internal(e.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = serde_json::json!({ "error": self.to_string() });
        if let Error::Item { index, .. } = &self {
            body["itemIndex"] = serde_json::json!(index);
        }
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_match_message_names_pattern() {
        let err = Error::NoMatch("*.jpg".into());
        assert_eq!(err.message(), "No binary files match the pattern: *.jpg");
        assert!(err.to_string().contains("*.jpg"));
    }

    #[test]
    fn at_item_wraps_once() {
        let err = Error::MissingInput("URL is required".into())
            .at_item(2)
            .at_item(5);
        match &err {
            Error::Item { index, source } => {
                assert_eq!(*index, 2);
                assert!(matches!(**source, Error::MissingInput(_)));
            }
            other => panic!("expected item error, got {other:?}"),
        }
        assert_eq!(err.message(), "URL is required");
        assert_eq!(err.to_string(), "item 2: missing input: URL is required");
    }

    #[test]
    fn status_codes_by_kind() {
        assert_eq!(
            Error::MissingInput("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::NoMatch("x".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(Error::Network("x".into()).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            Error::Auth("x".into()).at_item(0).status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
