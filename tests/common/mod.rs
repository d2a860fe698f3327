#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;

use blog_api::auth::{hash_password, token};
use blog_api::config::AppConfig;
use blog_api::database::models::{Article, Category, NewArticle, NewCategory, NewUser, User};
use blog_api::database::{MemoryStore, Store};
use blog_api::jsonapi::MEDIA_TYPE;
use blog_api::state::AppState;

pub const PASSWORD: &str = "password";
pub const PERMISSIONS: [&str; 3] = ["articles:create", "articles:update", "articles:delete"];

/// One server per test, each with its own in-memory store
pub struct TestApp {
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    pub client: reqwest::Client,
    permission_ids: HashMap<&'static str, i64>,
}

impl TestApp {
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(|_| {}).await
    }

    /// Like `spawn`, with the development config adjusted first
    pub async fn spawn_with(configure: impl FnOnce(&mut AppConfig)) -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let store = Arc::new(MemoryStore::new());
        let mut permission_ids = HashMap::new();
        for name in PERMISSIONS {
            let permission = store.insert_permission(name).await?;
            permission_ids.insert(name, permission.id);
        }

        let mut config = AppConfig::development();
        config.server.enable_request_logging = false;
        configure(&mut config);
        let app = blog_api::app(AppState::new(store.clone(), config));

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind port {}", port))?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let test_app = Self {
            base_url,
            store,
            client: reqwest::Client::new(),
            permission_ids,
        };
        test_app.wait_ready(Duration::from_secs(5)).await?;
        Ok(test_app)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
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

    // Requests

    /// GET with the JSON:API Accept header
    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path)).header(ACCEPT, MEDIA_TYPE)
    }

    /// JSON:API write (POST/PATCH) with an optional bearer token
    pub fn json_api(&self, method: reqwest::Method, path: &str, body: &Value, token: Option<&str>) -> RequestBuilder {
        let request = self
            .client
            .request(method, self.url(path))
            .header(ACCEPT, MEDIA_TYPE)
            .header(CONTENT_TYPE, MEDIA_TYPE)
            .body(body.to_string());
        with_token(request, token)
    }

    pub fn delete(&self, path: &str, token: Option<&str>) -> RequestBuilder {
        with_token(self.client.delete(self.url(path)).header(ACCEPT, MEDIA_TYPE), token)
    }

    /// Plain JSON POST for the auth endpoints
    pub fn post_json(&self, path: &str, body: &Value, token: Option<&str>) -> RequestBuilder {
        with_token(self.client.post(self.url(path)).json(body), token)
    }

    // Factories

    pub async fn create_category(&self, name: &str, slug: &str) -> Result<Category> {
        Ok(self
            .store
            .insert_category(NewCategory {
                name: name.to_string(),
                slug: slug.to_string(),
            })
            .await?)
    }

    /// User with password `PASSWORD` and the given permissions
    pub async fn create_user(&self, name: &str, email: &str, permissions: &[&str]) -> Result<User> {
        let user = self
            .store
            .insert_user(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password: hash_password(PASSWORD, 4)?,
            })
            .await?;
        for name in permissions {
            let id = self.permission_ids.get(name).context("unknown permission")?;
            self.store.grant_permission(user.id, *id).await?;
        }
        Ok(user)
    }

    /// User holding every article permission
    pub async fn create_author(&self, email: &str) -> Result<User> {
        self.create_user("Author", email, &PERMISSIONS).await
    }

    pub async fn create_article(&self, slug: &str, category: &Category, author: &User) -> Result<Article> {
        Ok(self
            .store
            .insert_article(NewArticle {
                title: format!("Title of {}", slug),
                slug: slug.to_string(),
                content: format!("Content of {}", slug),
                category_id: category.id,
                user_id: author.id,
            })
            .await?)
    }

    /// Plain-text personal access token for `user`
    pub async fn token_for(&self, user: &User) -> Result<String> {
        Ok(token::issue(self.store.as_ref(), user, "tests").await?.plain_text)
    }
}

fn with_token(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.header(AUTHORIZATION, format!("Bearer {}", token)),
        None => request,
    }
}

/// Detail messages of a JSON:API error document, in order
pub fn error_details(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e["detail"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// JSON pointers of a JSON:API validation error document
pub fn error_pointers(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e["source"]["pointer"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
