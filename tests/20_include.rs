mod common;

use anyhow::Result;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{error_details, TestApp};

#[tokio::test]
async fn can_include_category_of_a_single_article() -> Result<()> {
    let app = TestApp::spawn().await?;
    let author = app.create_author("jorge@example.com").await?;
    let category = app.create_category("Laravel", "laravel").await?;
    app.create_article("first-article", &category, &author).await?;

    let res = app.get("/api/v1/articles/first-article?include=category").send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["id"], "first-article");
    assert_eq!(
        body["included"],
        json!([{
            "type": "categories",
            "id": "laravel",
            "attributes": { "name": "Laravel" },
            "links": { "self": "/api/v1/categories/laravel" }
        }])
    );
    Ok(())
}

#[tokio::test]
async fn can_include_categories_of_multiple_articles() -> Result<()> {
    let app = TestApp::spawn().await?;
    let author = app.create_author("jorge@example.com").await?;
    let laravel = app.create_category("Laravel", "laravel").await?;
    let rust = app.create_category("Rust", "rust").await?;
    app.create_article("first-article", &laravel, &author).await?;
    app.create_article("second-article", &rust, &author).await?;

    let res = app.get("/api/v1/articles?include=category").send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    let ids: Vec<&str> = body["data"].as_array().unwrap().iter().map(|a| a["id"].as_str().unwrap()).collect();
    assert_eq!(ids, ["first-article", "second-article"]);

    let included = body["included"].as_array().unwrap();
    assert_eq!(included.len(), 2);
    assert_eq!(included[0]["type"], "categories");
    assert_eq!(included[0]["id"], "laravel");
    assert_eq!(included[0]["attributes"]["name"], "Laravel");
    assert_eq!(included[1]["id"], "rust");
    assert_eq!(included[1]["attributes"]["name"], "Rust");
    Ok(())
}

#[tokio::test]
async fn shared_category_is_repeated_per_article() -> Result<()> {
    let app = TestApp::spawn().await?;
    let author = app.create_author("jorge@example.com").await?;
    let laravel = app.create_category("Laravel", "laravel").await?;
    app.create_article("first-article", &laravel, &author).await?;
    app.create_article("second-article", &laravel, &author).await?;

    let body = app.get("/api/v1/articles?include=category").send().await?.json::<Value>().await?;
    let included = body["included"].as_array().unwrap();
    assert_eq!(included.len(), 2);
    assert_eq!(included[0], included[1]);
    Ok(())
}

#[tokio::test]
async fn can_include_category_and_author() -> Result<()> {
    let app = TestApp::spawn().await?;
    let author = app.create_user("Jorge", "jorge@example.com", &[]).await?;
    let category = app.create_category("Laravel", "laravel").await?;
    app.create_article("first-article", &category, &author).await?;

    let body = app
        .get("/api/v1/articles/first-article?include=author,category")
        .send()
        .await?
        .json::<Value>()
        .await?;

    let included = body["included"].as_array().unwrap();
    assert_eq!(included.len(), 2);
    assert_eq!(included[0]["type"], "authors");
    assert_eq!(included[0]["id"], author.id.to_string());
    assert_eq!(included[0]["attributes"], json!({ "name": "Jorge" }));
    assert_eq!(included[1]["type"], "categories");

    // No email or password hash leaks into the author resource
    assert!(included[0]["attributes"].get("email").is_none());
    assert!(included[0]["attributes"].get("password").is_none());
    Ok(())
}

#[tokio::test]
async fn without_include_there_is_no_included_member() -> Result<()> {
    let app = TestApp::spawn().await?;
    let author = app.create_author("jorge@example.com").await?;
    let category = app.create_category("Laravel", "laravel").await?;
    app.create_article("first-article", &category, &author).await?;

    for path in ["/api/v1/articles/first-article", "/api/v1/articles/first-article?include="] {
        let body = app.get(path).send().await?.json::<Value>().await?;
        assert!(body.get("included").is_none(), "unexpected included for {}", path);
        assert_eq!(body["data"]["attributes"]["slug"], "first-article");
        assert_eq!(
            body["data"]["relationships"]["category"]["links"]["related"],
            "/api/v1/articles/first-article/category"
        );
    }
    Ok(())
}

#[tokio::test]
async fn cannot_include_unknown_relationships() -> Result<()> {
    let app = TestApp::spawn().await?;
    let author = app.create_author("jorge@example.com").await?;
    let category = app.create_category("Laravel", "laravel").await?;
    app.create_article("first-article", &category, &author).await?;

    let res = app.get("/api/v1/articles/first-article?include=unknown,unknown2").send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(
        error_details(&body),
        ["The included relationship 'unknown' is not allowed in the 'articles' resource"]
    );
    assert_eq!(body["errors"][0]["title"], "Bad Request");
    assert!(body.get("data").is_none());

    let res = app.get("/api/v1/articles?include=unknown,unknown2").send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(
        error_details(&body),
        ["The included relationship 'unknown' is not allowed in the 'articles' resource"]
    );
    Ok(())
}

#[tokio::test]
async fn first_invalid_name_wins_after_valid_ones() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.get("/api/v1/articles?include=category,comments").send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(
        error_details(&body),
        ["The included relationship 'comments' is not allowed in the 'articles' resource"]
    );
    Ok(())
}

#[tokio::test]
async fn categories_and_authors_allow_no_includes() -> Result<()> {
    let app = TestApp::spawn().await?;
    let author = app.create_author("jorge@example.com").await?;
    app.create_category("Laravel", "laravel").await?;

    let res = app.get("/api/v1/categories/laravel?include=articles").send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(
        error_details(&body),
        ["The included relationship 'articles' is not allowed in the 'categories' resource"]
    );

    let res = app.get(&format!("/api/v1/authors/{}?include=articles", author.id)).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(
        error_details(&body),
        ["The included relationship 'articles' is not allowed in the 'authors' resource"]
    );

    let res = app.get("/api/v1/categories").send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"][0]["id"], "laravel");
    assert_eq!(body["links"]["self"], "/api/v1/categories");
    Ok(())
}

#[tokio::test]
async fn repeated_requests_are_byte_identical() -> Result<()> {
    let app = TestApp::spawn().await?;
    let author = app.create_author("jorge@example.com").await?;
    let category = app.create_category("Laravel", "laravel").await?;
    app.create_article("first-article", &category, &author).await?;
    app.create_article("second-article", &category, &author).await?;

    let path = "/api/v1/articles?include=category,author";
    let first = app.get(path).send().await?.text().await?;
    let second = app.get(path).send().await?.text().await?;
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn unknown_article_is_not_found() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.get("/api/v1/articles/missing?include=category").send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = res.json::<Value>().await?;
    assert_eq!(
        error_details(&body),
        ["No records found for the id 'missing' in the 'articles' resource."]
    );
    Ok(())
}

#[tokio::test]
async fn malformed_include_query_is_a_json_api_error() -> Result<()> {
    let app = TestApp::spawn().await?;
    let author = app.create_author("jorge@example.com").await?;
    let category = app.create_category("Laravel", "laravel").await?;
    app.create_article("first-article", &category, &author).await?;

    for path in [
        "/api/v1/articles?include=category&include=author",
        "/api/v1/articles/first-article?include=category&include=author",
        "/api/v1/categories?include=a&include=b",
    ] {
        let res = app.get(path).send().await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{}", path);
        assert_eq!(res.headers()[CONTENT_TYPE], "application/vnd.api+json");

        let body = res.json::<Value>().await?;
        assert_eq!(body["errors"][0]["title"], "Bad Request");
        assert_eq!(body["errors"][0]["status"], "400");
        assert!(body.get("data").is_none());
    }
    Ok(())
}
