use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Json},
    routing::{get, patch, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Build the full router. Protected method routes carry the auth layer
/// individually, so public GETs can share a path with protected mutations.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let uploads = ServeDir::new(&state.upload_dir);

    let mut router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(post_routes(state.clone()))
        .merge(user_routes(state.clone()))
        .nest_service("/uploads", uploads)
        // Global middleware
        .layer(DefaultBodyLimit::max(config.api.max_request_body_bytes))
        .layer(cors_layer(config));

    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn post_routes(state: AppState) -> Router<AppState> {
    let auth = middleware::from_fn_with_state(state, jwt_auth_middleware);

    Router::new()
        .route(
            "/posts",
            get(public::posts::list_posts)
                .merge(post(protected::posts::create_post).route_layer(auth.clone())),
        )
        .route(
            "/posts/:id",
            get(public::posts::get_post).merge(
                patch(protected::posts::edit_post)
                    .delete(protected::posts::delete_post)
                    .route_layer(auth),
            ),
        )
        .route("/posts/categories/:category", get(public::posts::category_posts))
        .route("/posts/users/:id", get(public::posts::user_posts))
}

fn user_routes(state: AppState) -> Router<AppState> {
    let auth = middleware::from_fn_with_state(state, jwt_auth_middleware);

    Router::new()
        .route("/users", get(public::users::list_authors))
        .route("/users/:id", get(public::users::get_user))
        .route(
            "/users/register",
            get(public::users::unknown_user).post(public::users::register),
        )
        .route(
            "/users/login",
            get(public::users::unknown_user).post(public::users::login),
        )
        .route(
            "/users/change-avatar",
            post(protected::users::change_avatar).route_layer(auth.clone()),
        )
        .route(
            "/users/edit-user",
            patch(protected::users::edit_user).route_layer(auth),
        )
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::very_permissive().allow_origin(AllowOrigin::list(origins))
    }
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "status": "success",
        "name": "Blog API",
        "version": version,
        "endpoints": {
            "posts": "/posts[/:id] (GET public; POST, PATCH, DELETE require bearer token)",
            "post_filters": "/posts/categories/:category, /posts/users/:id (public)",
            "users": "/users[/:id] (public)",
            "auth": "/users/register, /users/login (public)",
            "profile": "/users/change-avatar, /users/edit-user (bearer token)",
            "uploads": "/uploads/:file (public)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    let Some(database) = state.database.as_ref() else {
        return (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "memory"
            })),
        );
    };

    match database.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{MemoryPostStore, MemoryUserStore};
    use crate::storage::LocalFileStore;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn test_app(dir: &std::path::Path) -> Router {
        let mut config = AppConfig::development();
        config.uploads.dir = dir.to_path_buf();
        config.api.enable_request_logging = false;

        let state = AppState::new(
            &config,
            crate::auth::TokenKeys::from_secret("test-secret").unwrap(),
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryPostStore::new()),
            Arc::new(LocalFileStore::open(dir).await.unwrap()),
            None,
        );
        app(state, &config)
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_memory_backend() {
        let dir = tempfile::tempdir().unwrap();
        let response = test_app(dir.path())
            .await
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["database"], "memory");
    }

    #[tokio::test]
    async fn public_listing_needs_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let response = test_app(dir.path())
            .await
            .oneshot(Request::get("/posts").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({ "status": "success", "posts": [] }));
    }

    #[tokio::test]
    async fn mutations_require_token() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path()).await;

        for (method, uri) in [
            ("POST", "/posts"),
            ("PATCH", "/posts/7c9e6679-7425-40de-944b-e07fc1f90ae7"),
            ("DELETE", "/posts/7c9e6679-7425-40de-944b-e07fc1f90ae7"),
            ("POST", "/users/change-avatar"),
            ("PATCH", "/users/edit-user"),
        ] {
            let response = app
                .clone()
                .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{} {}", method, uri);
            assert_eq!(json_body(response).await["statusCode"], 401);
        }
    }

    #[tokio::test]
    async fn invalid_token_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let response = test_app(dir.path())
            .await
            .oneshot(
                Request::delete("/posts/7c9e6679-7425-40de-944b-e07fc1f90ae7")
                    .header("authorization", "Bearer not-a-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_post_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let response = test_app(dir.path())
            .await
            .oneshot(Request::get("/posts/not-a-uuid").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    fn bearer() -> String {
        let keys = crate::auth::TokenKeys::from_secret("test-secret").unwrap();
        let token = keys
            .issue(&crate::auth::Claims::new(uuid::Uuid::new_v4(), "Alice".to_string()))
            .unwrap();
        format!("Bearer {}", token)
    }

    #[tokio::test]
    async fn malformed_bodies_get_json_validation_errors() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path()).await;
        let auth = bearer();

        let cases = [
            Request::post("/users/register")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
            Request::post("/users/login")
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from("email=a%40x.com&password=secret1"))
                .unwrap(),
            Request::patch("/users/edit-user")
                .header("authorization", &auth)
                .body(Body::empty())
                .unwrap(),
            Request::post("/posts")
                .header("authorization", &auth)
                .header("content-type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
            Request::post("/users/change-avatar")
                .header("authorization", &auth)
                .body(Body::empty())
                .unwrap(),
        ];

        for request in cases {
            let uri = request.uri().to_string();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{}", uri);
            let body = json_body(response).await;
            assert_eq!(body["code"], "VALIDATION_ERROR", "{}", uri);
            assert_eq!(body["statusCode"], 422, "{}", uri);
        }
    }

    #[tokio::test]
    async fn get_on_auth_paths_is_unknown_user() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path()).await;

        for uri in ["/users/register", "/users/login"] {
            let response = app
                .clone()
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
            assert_eq!(json_body(response).await["message"], "User not found.");
        }
    }
}
