mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use blog_api::auth::token;
use blog_api::database::Store;
use common::TestApp;

#[tokio::test]
async fn can_logout() -> Result<()> {
    let app = TestApp::spawn().await?;
    let user = app.create_user("Jorge", "jorge@example.com", &[]).await?;
    let plain_text = app.token_for(&user).await?;

    let res = app.post_json("/api/v1/logout", &json!({}), Some(&plain_text)).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    assert!(token::find(app.store.as_ref(), &plain_text).await?.is_none());
    assert!(app.store.tokens_for_user(user.id).await?.is_empty());

    // The revoked token no longer authenticates
    let res = app.post_json("/api/v1/logout", &json!({}), Some(&plain_text)).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn logout_only_revokes_the_presented_token() -> Result<()> {
    let app = TestApp::spawn().await?;
    let user = app.create_user("Jorge", "jorge@example.com", &[]).await?;
    let laptop = app.token_for(&user).await?;
    let phone = app.token_for(&user).await?;

    let res = app.post_json("/api/v1/logout", &json!({}), Some(&laptop)).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    assert!(token::find(app.store.as_ref(), &phone).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn guests_cannot_logout() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.post_json("/api/v1/logout", &json!({}), None).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["errors"][0]["title"], "Unauthenticated");

    let res = app
        .post_json("/api/v1/logout", &json!({}), Some("1|not-a-real-token"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
