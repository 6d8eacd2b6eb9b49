pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::profile::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Profile API
        .route("/api/v1/profile/layout", get(handlers::handle_layout))
        .route("/api/v1/profile/load", post(handlers::handle_load))
        .route("/api/v1/profile/import", post(handlers::handle_import))
        .route("/api/v1/profile/build", post(handlers::handle_build))
        .route("/api/v1/profile/build-flat", post(handlers::handle_build_flat))
        .route("/api/v1/profile/merge", post(handlers::handle_merge))
        // Table editing helpers
        .route("/api/v1/tables/add-row", post(handlers::handle_add_row))
        .route("/api/v1/tables/remove-rows", post(handlers::handle_remove_rows))
        .layer(body_limit)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::normalize::FlatFormLayout;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        build_router(AppState {
            config: Config::default(),
        })
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], json!("ok"));
        assert_eq!(body["service"], json!("resumekit-api"));
    }

    #[tokio::test]
    async fn test_layout_reports_total_len() {
        let req = Request::builder()
            .uri("/api/v1/profile/layout")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["total"],
            json!(FlatFormLayout::current().total_len())
        );
    }

    #[tokio::test]
    async fn test_load_returns_flat_slots() {
        let (status, body) = send(post_json(
            "/api/v1/profile/load",
            json!({"full_name": "Ada Lovelace"}),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        let slots = body.as_array().unwrap();
        assert_eq!(slots.len(), FlatFormLayout::current().total_len());
        assert_eq!(slots[0], json!("Ada Lovelace"));
    }

    #[tokio::test]
    async fn test_import_detects_bom_and_rejects_garbage() {
        let mut bytes = b"\xEF\xBB\xBF".to_vec();
        bytes.extend_from_slice(br#"{"full_name": "Bom User"}"#);
        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/profile/import")
            .body(Body::from(bytes))
            .unwrap();
        let (status, body) = send(req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0], json!("Bom User"));

        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/profile/import")
            .body(Body::from("definitely: not json"))
            .unwrap();
        let (status, body) = send(req).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], json!("UNREADABLE_DOCUMENT"));
    }

    #[tokio::test]
    async fn test_build_flat_wrong_length_is_400() {
        let (status, body) = send(post_json("/api/v1/profile/build-flat", json!(["a", "b"]))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
    }

    #[tokio::test]
    async fn test_load_then_build_flat_round_trip() {
        let (_, slots) = send(post_json(
            "/api/v1/profile/load",
            json!({"experience": [{"company": "Acme", "achievements": ["One", "Two"]}]}),
        ))
        .await;
        let (status, record) = send(post_json("/api/v1/profile/build-flat", slots)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(record["experience"][0]["company"], json!("Acme"));
        assert_eq!(record["experience"][0]["achievements"], json!(["One", "Two"]));
    }

    #[tokio::test]
    async fn test_build_from_form() {
        let (status, record) = send(post_json(
            "/api/v1/profile/build",
            json!({"personal": ["Ada"], "skills": [["Languages", "Rust", ""]]}),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(record["personal_info"]["full_name"], json!("Ada"));
        assert_eq!(record["skills"][0]["skills"], json!("Rust"));
    }

    #[tokio::test]
    async fn test_merge_keeps_original_on_wrong_type() {
        let original = json!({
            "personal_info": {"full_name": "Ada", "summary": "Old"},
            "experience": [{"company": "Acme", "position": "Engineer", "achievements": ["X"]}]
        });
        let (status, record) = send(post_json(
            "/api/v1/profile/merge",
            json!({"original": original, "proposed": {"experience": "oops", "summary": "New"}}),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(record["experience"], original["experience"]);
        assert_eq!(record["personal_info"]["summary"], json!("New"));
    }

    #[tokio::test]
    async fn test_table_row_helpers() {
        let (status, rows) = send(post_json(
            "/api/v1/tables/add-row",
            json!({"table": [["a", "b"]], "row": ["c", 1]}),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rows, json!([["a", "b"], ["c", "1"]]));

        let (status, rows) = send(post_json(
            "/api/v1/tables/remove-rows",
            json!({"table": {"data": [["a"], ["b"], ["c"]]}, "indices": [0, 2, 9]}),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rows, json!([["b"]]));
    }
}
