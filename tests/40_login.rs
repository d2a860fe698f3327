mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use blog_api::auth::token;
use blog_api::database::Store;
use common::{TestApp, PASSWORD};

fn credentials(email: &str) -> Value {
    json!({ "email": email, "password": PASSWORD, "device_name": "My device" })
}

async fn assert_validation_error(app: &TestApp, payload: Value, field: &str) -> Result<Value> {
    let res = app.post_json("/api/v1/login", &payload, None).send().await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "The given data was invalid.");
    assert!(body["errors"][field].is_array(), "no {} error in {}", field, body);
    Ok(body)
}

#[tokio::test]
async fn can_issue_access_tokens() -> Result<()> {
    let app = TestApp::spawn().await?;
    let user = app.create_user("Jorge", "jorge@example.com", &[]).await?;

    let res = app.post_json("/api/v1/login", &credentials("jorge@example.com"), None).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    let plain_text = body["plain-text-token"].as_str().expect("token in response");

    let found = token::find(app.store.as_ref(), plain_text).await?.expect("token is stored");
    assert_eq!(found.user_id, user.id);
    assert_eq!(found.name, "My device");
    Ok(())
}

#[tokio::test]
async fn user_permissions_are_assigned_as_abilities() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.create_user("Jorge", "jorge@example.com", &["articles:create", "articles:update"])
        .await?;

    let body = app
        .post_json("/api/v1/login", &credentials("jorge@example.com"), None)
        .send()
        .await?
        .json::<Value>()
        .await?;
    let plain_text = body["plain-text-token"].as_str().unwrap();

    let found = token::find(app.store.as_ref(), plain_text).await?.unwrap();
    assert!(found.can("articles:create"));
    assert!(found.can("articles:update"));
    assert!(found.cant("articles:delete"));
    Ok(())
}

#[tokio::test]
async fn issued_token_authenticates_requests() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.create_author("jorge@example.com").await?;
    app.create_category("Laravel", "laravel").await?;

    let body = app
        .post_json("/api/v1/login", &credentials("jorge@example.com"), None)
        .send()
        .await?
        .json::<Value>()
        .await?;
    let plain_text = body["plain-text-token"].as_str().unwrap();

    let document = json!({
        "data": {
            "type": "articles",
            "attributes": { "title": "Written after login", "slug": "after-login", "content": "Hi" },
            "relationships": { "category": { "data": { "type": "categories", "id": "laravel" } } }
        }
    });
    let res = app
        .json_api(reqwest::Method::POST, "/api/v1/articles", &document, Some(plain_text))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    Ok(())
}

#[tokio::test]
async fn only_one_access_token_can_be_issued_at_a_time() -> Result<()> {
    let app = TestApp::spawn().await?;
    let user = app.create_user("Jorge", "jorge@example.com", &[]).await?;
    let existing = app.token_for(&user).await?;

    let res = app
        .post_json("/api/v1/login", &credentials("jorge@example.com"), Some(&existing))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.store.tokens_for_user(user.id).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn email_is_required() -> Result<()> {
    let app = TestApp::spawn().await?;
    let body = assert_validation_error(
        &app,
        json!({ "password": PASSWORD, "device_name": "My device" }),
        "email",
    )
    .await?;
    assert_eq!(body["errors"]["email"][0], "The email field is required.");
    Ok(())
}

#[tokio::test]
async fn email_must_be_valid() -> Result<()> {
    let app = TestApp::spawn().await?;
    let body = assert_validation_error(
        &app,
        json!({ "email": "invalid-email", "password": PASSWORD, "device_name": "My device" }),
        "email",
    )
    .await?;
    assert_eq!(body["errors"]["email"][0], "The email must be a valid email address.");
    Ok(())
}

#[tokio::test]
async fn password_is_required() -> Result<()> {
    let app = TestApp::spawn().await?;
    assert_validation_error(
        &app,
        json!({ "email": "jorge@example.com", "device_name": "My device" }),
        "password",
    )
    .await?;
    Ok(())
}

#[tokio::test]
async fn password_must_be_valid() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.create_user("Jorge", "jorge@example.com", &[]).await?;

    let body = assert_validation_error(
        &app,
        json!({ "email": "jorge@example.com", "password": "incorrect", "device_name": "My device" }),
        "email",
    )
    .await?;
    assert_eq!(body["errors"]["email"][0], "These credentials do not match our records.");
    Ok(())
}

#[tokio::test]
async fn unknown_email_gets_the_same_answer() -> Result<()> {
    let app = TestApp::spawn().await?;

    let body = assert_validation_error(&app, credentials("nobody@example.com"), "email").await?;
    assert_eq!(body["errors"]["email"][0], "These credentials do not match our records.");
    Ok(())
}

#[tokio::test]
async fn device_name_is_required() -> Result<()> {
    let app = TestApp::spawn().await?;
    let body = assert_validation_error(
        &app,
        json!({ "email": "jorge@example.com", "password": PASSWORD }),
        "device_name",
    )
    .await?;
    assert_eq!(body["errors"]["device_name"][0], "The device name field is required.");
    Ok(())
}

#[tokio::test]
async fn empty_body_reports_every_missing_field() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.client.post(app.url("/api/v1/login")).send().await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = res.json::<Value>().await?;
    for field in ["email", "password", "device_name"] {
        assert!(body["errors"][field].is_array(), "no {} error in {}", field, body);
    }
    Ok(())
}
