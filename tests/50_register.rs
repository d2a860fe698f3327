mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use blog_api::auth::{token, verify_password};
use blog_api::database::Store;
use common::TestApp;

fn registration(email: &str) -> Value {
    json!({
        "name": "Jorge",
        "email": email,
        "password": "secret-password",
        "password_confirmation": "secret-password",
        "device_name": "My device"
    })
}

#[tokio::test]
async fn can_register() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.post_json("/api/v1/register", &registration("jorge@example.com"), None).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    let plain_text = body["plain-text-token"].as_str().expect("token in response");

    let user = app.store.find_user_by_email("jorge@example.com").await?.expect("user created");
    assert_eq!(user.name, "Jorge");
    assert!(verify_password("secret-password", &user.password));

    let found = token::find(app.store.as_ref(), plain_text).await?.unwrap();
    assert_eq!(found.user_id, user.id);
    assert!(found.abilities.is_empty());
    Ok(())
}

#[tokio::test]
async fn authenticated_users_cannot_register_again() -> Result<()> {
    let app = TestApp::spawn().await?;
    let user = app.create_user("Jorge", "jorge@example.com", &[]).await?;
    let token = app.token_for(&user).await?;

    let res = app
        .post_json("/api/v1/register", &registration("second@example.com"), Some(&token))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(app.store.find_user_by_email("second@example.com").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn email_must_be_unique() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.create_user("Jorge", "jorge@example.com", &[]).await?;

    let res = app.post_json("/api/v1/register", &registration("jorge@example.com"), None).send().await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = res.json::<Value>().await?;
    assert_eq!(body["errors"]["email"][0], "The email has already been taken.");
    Ok(())
}

#[tokio::test]
async fn password_must_be_confirmed() -> Result<()> {
    let app = TestApp::spawn().await?;

    let mut payload = registration("jorge@example.com");
    payload["password_confirmation"] = json!("something-else");

    let res = app.post_json("/api/v1/register", &payload, None).send().await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = res.json::<Value>().await?;
    assert_eq!(body["errors"]["password"][0], "The password confirmation does not match.");
    assert!(app.store.find_user_by_email("jorge@example.com").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn every_field_is_required() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.post_json("/api/v1/register", &json!({}), None).send().await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = res.json::<Value>().await?;
    for field in ["name", "email", "password", "device_name"] {
        assert!(body["errors"][field].is_array(), "no {} error in {}", field, body);
    }
    Ok(())
}
