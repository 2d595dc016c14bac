//! Local upload target for tests: an axum server on an ephemeral port that
//! echoes back what it received.

use axum::{
    Json, Router,
    body::Bytes,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    routing::any,
};

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<serde_json::Value> {
    let get = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    };
    Json(serde_json::json!({
        "method": method.as_str(),
        "query": uri.query().unwrap_or_default(),
        "contentType": get(header::CONTENT_TYPE.as_str()),
        "authorization": get(header::AUTHORIZATION.as_str()),
        "xTrace": get("x-trace"),
        "body": String::from_utf8_lossy(&body),
    }))
}

/// Returns the base URL, e.g. `http://127.0.0.1:40123`.
pub async fn spawn_receiver() -> String {
    let app = Router::new()
        .route("/echo", any(echo))
        .route("/text", any(|| async { "uploaded" }))
        .route("/unauthorized", any(|| async { StatusCode::UNAUTHORIZED }))
        .route(
            "/fail",
            any(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}
