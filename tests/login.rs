mod common;

use common::{login, register_user, spawn_app};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test]
async fn login_succeeds_and_hides_credentials(pool: PgPool) {
    let (address, _) = spawn_app(pool).await;
    let client = reqwest::Client::new();

    register_user(&client, &address, "Ana", "ana@exemplo.com").await;

    let body = login(&client, &address, "ana@exemplo.com", "senha123").await;
    assert_eq!(body["blOk"], json!(true));
    assert_eq!(body["user"]["nome"], json!("Ana"));
    assert_eq!(body["user"]["stusuario"], json!("A"));

    // The stored hash and any reset code must never be serialized
    assert!(body["user"].get("password_hash").is_none());
    assert!(body["user"].get("senha").is_none());
    assert!(body["user"].get("reset_code").is_none());
}

#[sqlx::test]
async fn login_rejects_bad_credentials(pool: PgPool) {
    let (address, _) = spawn_app(pool).await;
    let client = reqwest::Client::new();

    register_user(&client, &address, "Ana", "ana@exemplo.com").await;

    let body = login(&client, &address, "ana@exemplo.com", "senhaerrada").await;
    assert_eq!(body["blOk"], json!(false));
    assert_eq!(body["message"], json!("Incorrect password"));
    assert!(body.get("user").is_none());

    let body = login(&client, &address, "ninguem@exemplo.com", "senha123").await;
    assert_eq!(body["blOk"], json!(false));
    assert_eq!(body["message"], json!("User does not exist"));
}

#[sqlx::test]
async fn send_reset_code_emails_a_code(pool: PgPool) {
    let (address, mock_emailer) = spawn_app(pool).await;
    let client = reqwest::Client::new();

    register_user(&client, &address, "Ana", "ana@exemplo.com").await;

    let response = client
        .post(format!("{address}/login/enviaCodigo"))
        .json(&json!({"email": "ana@exemplo.com"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(mock_emailer.sent_count(), 1);

    let sent_email = mock_emailer.last_sent_email().expect("No email was sent");
    assert_eq!(sent_email.recipient, "ana@exemplo.com");
    assert_eq!(sent_email.subject(), "Password reset");
    assert!(sent_email.body_text().contains(&sent_email.code));

    assert_eq!(sent_email.code.len(), 6);
    assert!(sent_email.code.chars().all(|c| c.is_ascii_digit()));
}

#[sqlx::test]
async fn send_reset_code_unknown_email_is_not_found(pool: PgPool) {
    let (address, mock_emailer) = spawn_app(pool).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{address}/login/enviaCodigo"))
        .json(&json!({"email": "ninguem@exemplo.com"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    assert_eq!(mock_emailer.sent_count(), 0);
}

#[sqlx::test]
async fn send_reset_code_is_rate_limited(pool: PgPool) {
    let (address, mock_emailer) = spawn_app(pool).await;
    let client = reqwest::Client::new();

    register_user(&client, &address, "Ana", "ana@exemplo.com").await;

    let response = client
        .post(format!("{address}/login/enviaCodigo"))
        .json(&json!({"email": "ana@exemplo.com"}))
        .send()
        .await
        .expect("Failed to execute first request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let response = client
        .post(format!("{address}/login/enviaCodigo"))
        .json(&json!({"email": "ana@exemplo.com"}))
        .send()
        .await
        .expect("Failed to execute second request");
    assert_eq!(response.status(), reqwest::StatusCode::TOO_MANY_REQUESTS);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("Rate limit exceeded")
    );

    // Only the first request produced an email
    assert_eq!(mock_emailer.sent_count(), 1);
}

#[sqlx::test]
async fn validate_reset_code_round_trip(pool: PgPool) {
    let (address, mock_emailer) = spawn_app(pool).await;
    let client = reqwest::Client::new();

    register_user(&client, &address, "Ana", "ana@exemplo.com").await;

    let response = client
        .post(format!("{address}/login/enviaCodigo"))
        .json(&json!({"email": "ana@exemplo.com"}))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let code = mock_emailer
        .last_sent_email()
        .expect("No email was sent")
        .code;

    // The real code validates
    let response = client
        .post(format!("{address}/login/validaCodigo"))
        .json(&json!({"code": code}))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], json!("Code validated successfully"));

    // A tampered code does not
    let wrong_code: String = code
        .chars()
        .map(|c| if c == '0' { '1' } else { '0' })
        .collect();
    let response = client
        .post(format!("{address}/login/validaCodigo"))
        .json(&json!({"code": wrong_code}))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["blOk"], json!(false));
}

#[sqlx::test]
async fn update_password_changes_credentials_and_clears_code(pool: PgPool) {
    let (address, mock_emailer) = spawn_app(pool).await;
    let client = reqwest::Client::new();

    register_user(&client, &address, "Ana", "ana@exemplo.com").await;

    let response = client
        .post(format!("{address}/login/enviaCodigo"))
        .json(&json!({"email": "ana@exemplo.com"}))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let code = mock_emailer
        .last_sent_email()
        .expect("No email was sent")
        .code;

    let response = client
        .post(format!("{address}/login/atualizaSenha"))
        .json(&json!({"email": "ana@exemplo.com", "password": "novasenha"}))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    // Old password no longer works, new one does
    let body = login(&client, &address, "ana@exemplo.com", "senha123").await;
    assert_eq!(body["blOk"], json!(false));
    let body = login(&client, &address, "ana@exemplo.com", "novasenha").await;
    assert_eq!(body["blOk"], json!(true));

    // The consumed code is cleared
    let response = client
        .post(format!("{address}/login/validaCodigo"))
        .json(&json!({"code": code}))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}
