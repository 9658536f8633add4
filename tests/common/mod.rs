#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use hostxchange::services::email::{EmailError, EmailService, ResetCodeEmail};
use reqwest::multipart;
use serde_json::{Value, json};
use sqlx::PgPool;
use tokio::net::TcpListener;

pub fn init_tracing_once() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("hostxchange=debug")
            .with_test_writer()
            .init();
    });
}

/// A mock email service that stores delivered reset emails for testing.
#[derive(Debug, Default)]
pub struct MockEmailer {
    sent_emails: Mutex<Vec<ResetCodeEmail>>,
}

impl MockEmailer {
    pub fn new() -> Self {
        Self {
            sent_emails: Mutex::new(Vec::new()),
        }
    }

    pub fn get_sent_emails(&self) -> Vec<ResetCodeEmail> {
        self.sent_emails.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.sent_emails.lock().unwrap().clear();
    }

    pub fn sent_count(&self) -> usize {
        self.sent_emails.lock().unwrap().len()
    }

    pub fn last_sent_email(&self) -> Option<ResetCodeEmail> {
        self.sent_emails.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl EmailService for MockEmailer {
    async fn deliver(&self, mail: &ResetCodeEmail) -> Result<(), EmailError> {
        self.sent_emails.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

/// Spawns the application and returns its address and mock emailer.
///
/// Returned address format: `http://127.0.0.1:8492`
pub async fn spawn_app(test_db_pool: PgPool) -> (String, Arc<MockEmailer>) {
    dotenvy::from_filename_override("tests/data/.test.env").unwrap();
    init_tracing_once();

    let mock_emailer = Arc::new(MockEmailer::new());
    let mock_cloned = Arc::clone(&mock_emailer);

    // Randomly choose an available port
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port at localhost");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let app = hostxchange::app_with_email_service(test_db_pool, Some(mock_cloned));
        axum::serve(listener, app).await.unwrap();
    });

    let address = format!("http://127.0.0.1:{port}");

    // Wait for server to be ready
    let client = reqwest::Client::new();
    for _ in 0..10 {
        if client
            .get(format!("{address}/health-check"))
            .send()
            .await
            .is_ok()
        {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    }

    (address, mock_emailer)
}

/// Registers a traveler account through the public API.
pub async fn register_user(client: &reqwest::Client, address: &str, name: &str, email: &str) {
    let response = client
        .post(format!("{address}/cadastro/cadastroUsuario"))
        .json(&json!({
            "nome": name,
            "email": email,
            "password": "senha123",
            "cpf": "123.456.789-00",
            "rg": "12.345.678-9",
            "nacionalidade": "Brasileiro"
        }))
        .send()
        .await
        .expect("Failed to register user");
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);
}

/// Logs in and returns the full response body.
pub async fn login(client: &reqwest::Client, address: &str, email: &str, password: &str) -> Value {
    let response = client
        .post(format!("{address}/login"))
        .json(&json!({"email": email, "password": password}))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    response.json().await.expect("Failed to parse login response")
}

/// Logs in and returns the account's user id.
pub async fn login_user_id(client: &reqwest::Client, address: &str, email: &str) -> i64 {
    let body = login(client, address, email, "senha123").await;
    assert_eq!(body["blOk"], json!(true), "login failed: {body}");
    body["user"]["idusuario"]
        .as_i64()
        .expect("Login response should carry the user id")
}

/// Promotes a user to host and returns the new host contact id.
pub async fn become_host(client: &reqwest::Client, address: &str, user_id: i64) -> i64 {
    let response = client
        .post(format!("{address}/cadastro/tornaHost"))
        .json(&json!({
            "idUsuario": user_id,
            "nomePropriedade": "Casa das Flores",
            "rua": "Rua das Flores",
            "numero": "123",
            "cidade": "São Paulo",
            "estado": "SP",
            "cep": "01001-000",
            "telefone": "(11) 1234-5678",
            "tipoPropriedade": "Casa",
            "email": "contato@casadasflores.com",
            "latitude": -23.550520,
            "longitude": -46.633308
        }))
        .send()
        .await
        .expect("Failed to promote user to host");
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse response");
    body["idHost"]
        .as_i64()
        .expect("Promotion response should carry the host id")
}

/// Creates a simple 1x1 PNG image and returns its byte representation.
pub fn create_test_image() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // PNG signature
        0x00, 0x00, 0x00, 0x0D, // IHDR chunk length
        0x49, 0x48, 0x44, 0x52, // IHDR
        0x00, 0x00, 0x00, 0x01, // Width: 1
        0x00, 0x00, 0x00, 0x01, // Height: 1
        0x08, 0x02, 0x00, 0x00,
        0x00, // Bit depth: 8, Color type: 2 (RGB), Compression: 0, Filter: 0, Interlace: 0
        0x90, 0x77, 0x53, 0xDE, // CRC
        0x00, 0x00, 0x00, 0x0C, // IDAT chunk length
        0x49, 0x44, 0x41, 0x54, // IDAT
        0x08, 0x99, 0x01, 0x01, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0x00, 0x00, 0x00, // Image data
        0x02, 0x00, 0x01, 0xE5, // CRC
        0x00, 0x00, 0x00, 0x00, // IEND chunk length
        0x49, 0x45, 0x4E, 0x44, // IEND
        0xAE, 0x42, 0x60, 0x82, // CRC
    ]
}

/// Creates an exchange listing with the given number of images attached and
/// returns the full response.
pub async fn create_exchange(
    client: &reqwest::Client,
    address: &str,
    host_id: i64,
    title: &str,
    image_count: usize,
) -> reqwest::Response {
    let mut form = multipart::Form::new()
        .text("nmlocal", "Casa das Flores")
        .text("titulo", title.to_string())
        .text("descricao", "Uma casa acolhedora no centro da cidade")
        .text("servicos", "Jardinagem, aulas de inglês")
        .text("beneficios", "Quarto privativo, café da manhã")
        .text("duracao", "2 semanas")
        .text("idhost", host_id.to_string());

    for i in 0..image_count {
        form = form.part(
            "images",
            multipart::Part::bytes(create_test_image())
                .file_name(format!("photo_{i}.png"))
                .mime_str("image/png")
                .unwrap(),
        );
    }

    client
        .post(format!("{address}/intercambios/cadastrar"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to create exchange")
}

/// Registers a traveler and a promoted host with one published listing.
///
/// Returns `(traveler_id, host_user_id, exchange_id)`.
pub async fn setup_host_with_exchange(
    client: &reqwest::Client,
    address: &str,
) -> (i64, i64, i64) {
    register_user(client, address, "Ana Viajante", "ana@exemplo.com").await;
    register_user(client, address, "João Anfitrião", "joao@exemplo.com").await;

    let traveler_id = login_user_id(client, address, "ana@exemplo.com").await;
    let host_user_id = login_user_id(client, address, "joao@exemplo.com").await;

    let host_id = become_host(client, address, host_user_id).await;

    let response = create_exchange(client, address, host_id, "Intercâmbio no centro", 1).await;
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    let exchange_id = body["intercambio"]["idinterc"]
        .as_i64()
        .expect("Listing response should carry the exchange id");

    (traveler_id, host_user_id, exchange_id)
}

/// Creates a match between a traveler and an exchange.
pub async fn create_match(
    client: &reqwest::Client,
    address: &str,
    traveler_id: i64,
    exchange_id: i64,
) -> reqwest::Response {
    client
        .post(format!("{address}/match/criarMatch"))
        .json(&json!({"idviajante": traveler_id, "idinterc": exchange_id}))
        .send()
        .await
        .expect("Failed to create match")
}

/// Lists a user's ratings and returns the full response body.
pub async fn list_ratings(client: &reqwest::Client, address: &str, user_id: i64) -> Value {
    let response = client
        .post(format!("{address}/avaliacao/listaAvaliacoes"))
        .json(&json!({"idusuario": user_id}))
        .send()
        .await
        .expect("Failed to list ratings");
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    response.json().await.expect("Failed to parse response")
}

/// Finalizes a rating through the update endpoint.
pub async fn submit_rating(
    client: &reqwest::Client,
    address: &str,
    rating_id: i64,
    score: i32,
    description: &str,
) -> reqwest::Response {
    client
        .post(format!("{address}/avaliacao/atualizaAvaliacao"))
        .json(&json!({
            "idavaliacao": rating_id,
            "avaliacao": score,
            "descricao": description
        }))
        .send()
        .await
        .expect("Failed to update rating")
}
