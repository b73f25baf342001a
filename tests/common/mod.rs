#![allow(dead_code)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tempfile::TempDir;

use blog_api::config::AppConfig;
use blog_api::{app, AppState, Backend};

/// A server running in-process on a free port, backed by in-memory stores
/// and a temporary upload directory
pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    uploads: TempDir,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let uploads = tempfile::tempdir().context("failed to create upload dir")?;

        let mut config = AppConfig::development();
        config.security.jwt_secret = "integration-test-secret".to_string();
        config.uploads.dir = uploads.path().to_path_buf();
        config.api.enable_request_logging = false;

        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let state = AppState::from_config(&config, Backend::Memory).await?;
        let router = app(state, &config);
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test port")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let server = Self {
            base_url,
            client: reqwest::Client::new(),
            uploads,
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn upload_exists(&self, name: &str) -> bool {
        self.uploads.path().join(name).is_file()
    }

    /// Register a user and return the login response body (`token`, `id`, `name`)
    pub async fn register_and_login(&self, name: &str, email: &str, password: &str) -> Result<Value> {
        let res = self
            .client
            .post(self.url("/users/register"))
            .json(&json!({
                "name": name,
                "email": email,
                "password": password,
                "confirmPassword": password
            }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());

        self.login(email, password).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Value> {
        let res = self
            .client
            .post(self.url("/users/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
        Ok(res.json().await?)
    }
}

/// Multipart form with post text fields and an optional thumbnail of `size` bytes
pub fn post_form(title: &str, category: &str, description: &str, thumbnail: Option<usize>) -> Form {
    let form = Form::new()
        .text("title", title.to_string())
        .text("category", category.to_string())
        .text("description", description.to_string());

    match thumbnail {
        Some(size) => form.part(
            "thumbnail",
            Part::bytes(vec![0u8; size]).file_name("thumb.png"),
        ),
        None => form,
    }
}
