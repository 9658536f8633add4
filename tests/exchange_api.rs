mod common;

use common::{
    become_host, create_exchange, login_user_id, register_user, setup_host_with_exchange,
    spawn_app,
};
use serde_json::{Value, json};
use sqlx::PgPool;

#[sqlx::test]
async fn create_exchange_stores_listing_and_images(pool: PgPool) {
    let (address, _) = spawn_app(pool).await;
    let client = reqwest::Client::new();

    register_user(&client, &address, "João", "joao@exemplo.com").await;
    let user_id = login_user_id(&client, &address, "joao@exemplo.com").await;
    let host_id = become_host(&client, &address, user_id).await;

    let response = create_exchange(&client, &address, host_id, "Intercâmbio no centro", 2).await;
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["blOk"], json!(true));
    assert_eq!(body["intercambio"]["titulo"], json!("Intercâmbio no centro"));
    assert_eq!(body["intercambio"]["idhost"], json!(host_id));

    let images = body["intercambio"]["imagens"].as_array().unwrap();
    assert_eq!(images.len(), 2);
    for image in images {
        let path = image.as_str().unwrap();
        assert!(path.starts_with(&format!("/assets/exchanges/host_{host_id}/")));
        assert!(path.ends_with(".png"));
    }
}

#[sqlx::test]
async fn create_exchange_rejects_more_than_ten_images(pool: PgPool) {
    let (address, _) = spawn_app(pool).await;
    let client = reqwest::Client::new();

    register_user(&client, &address, "João", "joao@exemplo.com").await;
    let user_id = login_user_id(&client, &address, "joao@exemplo.com").await;
    let host_id = become_host(&client, &address, user_id).await;

    let response = create_exchange(&client, &address, host_id, "Muitas fotos", 11).await;
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[sqlx::test]
async fn create_exchange_unknown_host_is_not_found(pool: PgPool) {
    let (address, _) = spawn_app(pool).await;
    let client = reqwest::Client::new();

    let response = create_exchange(&client, &address, 424242, "Sem anfitrião", 0).await;
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}

#[sqlx::test]
async fn list_exchanges_includes_host_and_average(pool: PgPool) {
    let (address, _) = spawn_app(pool).await;
    let client = reqwest::Client::new();

    let (_, _, exchange_id) = setup_host_with_exchange(&client, &address).await;

    let response = client
        .get(format!("{address}/intercambios/buscar"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    let listings = body.as_array().expect("Response should be an array");
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0]["idinterc"], json!(exchange_id));
    assert_eq!(listings[0]["contatoHost"]["nmprop"], json!("Casa das Flores"));
    // No finalized ratings yet, the average is defined as zero
    assert_eq!(listings[0]["avaliacao"], json!(0.0));
}

#[sqlx::test]
async fn get_exchange_by_id_works(pool: PgPool) {
    let (address, _) = spawn_app(pool).await;
    let client = reqwest::Client::new();

    let (_, _, exchange_id) = setup_host_with_exchange(&client, &address).await;

    let response = client
        .post(format!("{address}/intercambios/buscarId"))
        .json(&json!({"id": exchange_id}))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["idinterc"], json!(exchange_id));
    assert_eq!(body["titulo"], json!("Intercâmbio no centro"));
    assert_eq!(body["contatoHost"]["cidade"], json!("São Paulo"));
}

#[sqlx::test]
async fn get_exchange_unknown_id_is_not_found(pool: PgPool) {
    let (address, _) = spawn_app(pool).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{address}/intercambios/buscarId"))
        .json(&json!({"id": 424242}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["blOk"], json!(false));
}
