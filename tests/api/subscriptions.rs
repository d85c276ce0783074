use std::time::Duration;

use anyhow::Result;
use event_landing::web::ClientError;
use reqwest::{Response, StatusCode};
use serde_json::{json, Value};
use wiremock::{
    matchers::{any, body_partial_json, header, method, path},
    Mock, ResponseTemplate,
};

use crate::helpers::{TestApp, API_KEY, GROUP_ID};

async fn error_body(res: Response) -> Result<Value> {
    let body: Value = res.json().await?;
    Ok(body)
}

#[tokio::test]
async fn api_subscribe_ok() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path("/subscribers"))
        .and(method("POST"))
        .and(header("Authorization", format!("Bearer {API_KEY}").as_str()))
        .and(header("Accept", "application/json"))
        .and(body_partial_json(json!({
            "email": "user@example.com",
            "groups": [GROUP_ID],
            "status": "active",
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&app.subscriber_server)
        .await;

    let res = app
        .post_subscribe(&json!({ "email": "user@example.com" }))
        .await?;

    assert_eq!(StatusCode::OK, res.status());
    let body: Value = res.json().await?;
    assert_eq!(json!({ "ok": true }), body);

    Ok(())
}

#[tokio::test]
async fn api_subscribe_normalizes_email() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path("/subscribers"))
        .and(body_partial_json(json!({ "email": "user@example.com" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.subscriber_server)
        .await;

    let res = app
        .post_subscribe(&json!({ "email": "  User@Example.COM  " }))
        .await?;

    assert_eq!(StatusCode::OK, res.status());

    Ok(())
}

#[tokio::test]
async fn api_subscribe_returns_400_for_invalid_email() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.subscriber_server)
        .await;

    let cases = [
        (json!({}), "Empty json"),
        (json!({ "email": null }), "Null email"),
        (json!({ "email": "" }), "Empty email"),
        (json!({ "email": "   " }), "Blank email"),
        (json!({ "email": "not an email" }), "Plain text"),
        (json!({ "email": "user@example" }), "No dot in domain"),
        (json!({ "email": "user@@example.com" }), "Double at sign"),
        (json!({ "name": "John Doe" }), "Missing email"),
    ];

    for (body, description) in cases {
        let res = app.post_subscribe(&body).await?;
        assert_eq!(
            StatusCode::BAD_REQUEST,
            res.status(),
            "The API did not return a 400 BAD REQUEST, the payload was: {description}."
        );

        let body = error_body(res).await?;
        assert_eq!(json!(ClientError::InvalidEmail.to_string()), body["error"]);
        assert!(body.get("details").is_none());
    }

    Ok(())
}

#[tokio::test]
async fn api_subscribe_returns_400_for_bodies_that_are_not_objects() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.subscriber_server)
        .await;

    let cases = [
        (r#"["user@example.com"]"#, "Positional array"),
        ("[]", "Empty array"),
        (r#""user@example.com""#, "Json string"),
        ("5", "Json number"),
        ("true", "Json bool"),
        (
            r#"{"email": "user@example.com", "email": null}"#,
            "Duplicate email ending in null",
        ),
    ];

    for (body, description) in cases {
        let res = app.post_subscribe_raw(body).await?;
        assert_eq!(
            StatusCode::BAD_REQUEST,
            res.status(),
            "The API did not return a 400 BAD REQUEST, the payload was: {description}."
        );

        let body = error_body(res).await?;
        assert_eq!(json!(ClientError::InvalidEmail.to_string()), body["error"]);
        assert!(body.get("details").is_none());
    }

    Ok(())
}

#[tokio::test]
async fn api_subscribe_returns_500_without_credentials() -> Result<()> {
    let app = TestApp::spawn_without_credentials().await?;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.subscriber_server)
        .await;

    let res = app
        .post_subscribe(&json!({ "email": "user@example.com" }))
        .await?;

    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, res.status());
    let body = error_body(res).await?;
    assert_eq!(
        json!(ClientError::IncompleteConfig.to_string()),
        body["error"]
    );

    Ok(())
}

#[tokio::test]
async fn api_subscribe_validates_before_checking_credentials() -> Result<()> {
    let app = TestApp::spawn_without_credentials().await?;

    let res = app.post_subscribe(&json!({ "email": "nope" })).await?;

    assert_eq!(StatusCode::BAD_REQUEST, res.status());

    Ok(())
}

#[tokio::test]
async fn api_subscribe_returns_502_with_upstream_details() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path("/subscribers"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .expect(1)
        .mount(&app.subscriber_server)
        .await;

    let res = app
        .post_subscribe(&json!({ "email": "user@example.com" }))
        .await?;

    assert_eq!(StatusCode::BAD_GATEWAY, res.status());
    let body = error_body(res).await?;
    let expected_error = ClientError::UpstreamRejected {
        details: String::new(),
    }
    .to_string();
    assert_eq!(json!(expected_error), body["error"]);
    assert_eq!(json!("rate limited"), body["details"]);

    Ok(())
}

#[tokio::test]
async fn api_subscribe_returns_500_for_malformed_body() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.subscriber_server)
        .await;

    let cases = [
        ("", "Empty body"),
        ("{", "Truncated json"),
        ("null", "Json null"),
        (r#"{"email": 42}"#, "Email is a number"),
        (r#"{"email": ["user@example.com"]}"#, "Email is an array"),
        (r#"{"email": true}"#, "Email is a bool"),
        ("email=user@example.com", "Form encoded"),
    ];

    for (body, description) in cases {
        let res = app.post_subscribe_raw(body).await?;
        assert_eq!(
            StatusCode::INTERNAL_SERVER_ERROR,
            res.status(),
            "The API did not return a 500, the payload was: {description}."
        );

        let body = error_body(res).await?;
        assert_eq!(json!(ClientError::ServiceError.to_string()), body["error"]);
    }

    Ok(())
}

#[tokio::test]
async fn api_subscribe_duplicate_email_forwards_the_last_one() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path("/subscribers"))
        .and(body_partial_json(json!({ "email": "b@example.com" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.subscriber_server)
        .await;

    let res = app
        .post_subscribe_raw(r#"{"email": "a@example.com", "email": "b@example.com"}"#)
        .await?;

    assert_eq!(StatusCode::OK, res.status());

    Ok(())
}

#[tokio::test]
async fn api_subscribe_accepts_json_without_content_type() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path("/subscribers"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.subscriber_server)
        .await;

    let res = app
        .post_subscribe_raw(r#"{"email": "user@example.com"}"#)
        .await?;

    assert_eq!(StatusCode::OK, res.status());

    Ok(())
}

#[tokio::test]
async fn api_subscribe_returns_500_when_upstream_times_out() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(180)))
        .expect(1)
        .mount(&app.subscriber_server)
        .await;

    let res = app
        .post_subscribe(&json!({ "email": "user@example.com" }))
        .await?;

    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, res.status());
    let body = error_body(res).await?;
    assert_eq!(json!(ClientError::ServiceError.to_string()), body["error"]);

    Ok(())
}

#[tokio::test]
async fn api_subscribe_repeated_submissions_are_forwarded_each_time() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path("/subscribers"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&app.subscriber_server)
        .await;

    for _ in 0..2 {
        let res = app
            .post_subscribe(&json!({ "email": "user@example.com" }))
            .await?;
        assert_eq!(StatusCode::OK, res.status());
    }

    Ok(())
}
