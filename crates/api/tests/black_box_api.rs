use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use realty_api::config::Config;
use realty_auth::{Claims, Role};
use realty_core::AccountId;
use reqwest::StatusCode;
use serde_json::{Value, json};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(jwt_secret: &str) -> Self {
        Self::spawn_with(Config {
            jwt_secret: jwt_secret.to_string(),
            ..Config::default()
        })
        .await
    }

    async fn spawn_with(config: Config) -> Self {
        // Build app (same router as prod, in-memory store), but bind to an ephemeral port.
        let (app, _worker) = realty_api::app::build_app(&config)
            .await
            .expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(jwt_secret: &str, role: Role, issued_at: chrono::DateTime<Utc>, ttl: ChronoDuration) -> String {
    let claims = Claims::new(AccountId::new(42), role, issued_at, ttl);

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

fn fresh_jwt(jwt_secret: &str, role: Role) -> String {
    mint_jwt(jwt_secret, role, Utc::now(), ChronoDuration::minutes(10))
}

async fn dummy_token(client: &reqwest::Client, srv: &TestServer, role: &str) -> String {
    let res = client
        .get(srv.url("/dummyLogin"))
        .query(&[("user_type", role)])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    body["token"].as_str().unwrap().to_string()
}

async fn create_house(client: &reqwest::Client, srv: &TestServer, token: &str) -> i64 {
    let res = client
        .post(srv.url("/house/create"))
        .bearer_auth(token)
        .json(&json!({ "address": "Oak St", "year": 1990 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["address"], "Oak St");
    assert!(body.get("developer").is_none());
    body["id"].as_i64().unwrap()
}

async fn error_of(res: reqwest::Response) -> (StatusCode, Value) {
    let status = res.status();
    (status, res.json().await.unwrap())
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn("test-secret").await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn("test-secret").await;

    let client = reqwest::Client::new();
    let res = client.get(srv.url("/house/1")).send().await.unwrap();

    let (status, body) = error_of(res).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
    assert_eq!(body["message"], "missing bearer token");
}

#[tokio::test]
async fn expired_and_foreign_tokens_are_rejected() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();

    let expired = mint_jwt(
        jwt_secret,
        Role::Moderator,
        Utc::now() - ChronoDuration::hours(2),
        ChronoDuration::hours(1),
    );
    let res = client.get(srv.url("/house/1")).bearer_auth(expired).send().await.unwrap();
    let (status, body) = error_of(res).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "token expired");

    let not_yet = mint_jwt(
        jwt_secret,
        Role::Moderator,
        Utc::now() + ChronoDuration::hours(1),
        ChronoDuration::hours(1),
    );
    let res = client.get(srv.url("/house/1")).bearer_auth(not_yet).send().await.unwrap();
    let (status, body) = error_of(res).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "token not valid yet");

    let foreign = fresh_jwt("some-other-secret", Role::Moderator);
    let res = client.get(srv.url("/house/1")).bearer_auth(foreign).send().await.unwrap();
    let (status, body) = error_of(res).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "invalid token");
}

#[tokio::test]
async fn client_token_is_forbidden_on_moderator_routes() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();
    let token = fresh_jwt(jwt_secret, Role::Client);

    for (path, body) in [
        ("/house/create", json!({ "address": "Oak St", "year": 1990 })),
        ("/flat/create", json!({ "house_id": 1, "number": 1, "price": 1, "rooms": 1 })),
        ("/flat/update", json!({ "id": 1, "status": "approved" })),
    ] {
        let res = client.post(srv.url(path)).bearer_auth(&token).json(&body).send().await.unwrap();
        let (status, err) = error_of(res).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{path}");
        assert_eq!(err["error"], "forbidden");
    }
}

#[tokio::test]
async fn register_then_login() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/register"))
        .json(&json!({ "email": "a@x.com", "password": "pw123456", "user_type": "client" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["user_id"], 1);

    let res = client
        .post(srv.url("/register"))
        .json(&json!({ "email": "a@x.com", "password": "another-pw", "user_type": "client" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = client
        .post(srv.url("/register"))
        .json(&json!({ "email": "b@x.com", "password": "pw123456", "user_type": "admin" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(srv.url("/login"))
        .json(&json!({ "id": 1, "password": "wrong-password" }))
        .send()
        .await
        .unwrap();
    let (status, wrong) = error_of(res).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let res = client
        .post(srv.url("/login"))
        .json(&json!({ "id": 99, "password": "pw123456" }))
        .send()
        .await
        .unwrap();
    let (status, unknown) = error_of(res).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong, unknown);

    let res = client
        .post(srv.url("/login"))
        .json(&json!({ "id": 1, "password": "pw123456" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let token = body["token"].as_str().unwrap();

    // A client may read listings.
    let res = client.get(srv.url("/house/1")).bearer_auth(token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["flats"], json!([]));
}

#[tokio::test]
async fn oak_street_listing_depends_on_role() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();
    let moderator = dummy_token(&client, &srv, "moderator").await;
    let client_token = dummy_token(&client, &srv, "client").await;

    let house = create_house(&client, &srv, &moderator).await;

    let res = client
        .post(srv.url("/flat/create"))
        .bearer_auth(&moderator)
        .json(&json!({ "house_id": house, "number": 101, "price": 1000, "rooms": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let flat: Value = res.json().await.unwrap();
    assert_eq!(flat["status"], "created");
    assert_eq!(flat["house_id"], house);

    let res = client
        .post(srv.url("/flat/create"))
        .bearer_auth(&moderator)
        .json(&json!({ "house_id": house, "number": 101, "price": 1200, "rooms": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = client
        .post(srv.url("/flat/create"))
        .bearer_auth(&moderator)
        .json(&json!({ "house_id": house + 100, "number": 1, "price": 1, "rooms": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .post(srv.url("/flat/create"))
        .bearer_auth(&moderator)
        .json(&json!({ "house_id": house, "number": 102, "price": 1500, "rooms": 4 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(srv.url("/flat/update"))
        .bearer_auth(&moderator)
        .json(&json!({ "id": flat["id"], "status": "on moderation" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "on_moderation");

    for _ in 0..2 {
        let res = client
            .post(srv.url("/flat/update"))
            .bearer_auth(&moderator)
            .json(&json!({ "id": flat["id"], "status": "approved" }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = client
        .get(srv.url(&format!("/house/{house}")))
        .bearer_auth(&client_token)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    let flats = body["flats"].as_array().unwrap();
    assert_eq!(flats.len(), 1);
    assert_eq!(flats[0]["number"], 101);

    let res = client
        .get(srv.url(&format!("/house/{house}")))
        .bearer_auth(&moderator)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    let numbers: Vec<_> = body["flats"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["number"].as_i64().unwrap())
        .collect();
    assert_eq!(numbers, vec![101, 102]);
}

#[tokio::test]
async fn bad_input_is_a_bad_request() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();
    let moderator = dummy_token(&client, &srv, "moderator").await;
    let house = create_house(&client, &srv, &moderator).await;

    let res = client.get(srv.url("/house/abc")).bearer_auth(&moderator).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(srv.url("/house/create"))
        .bearer_auth(&moderator)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(srv.url("/house/create"))
        .bearer_auth(&moderator)
        .json(&json!({ "address": "Oak St", "year": 1700 }))
        .send()
        .await
        .unwrap();
    let (status, body) = error_of(res).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_failed");

    let res = client
        .post(srv.url("/flat/update"))
        .bearer_auth(&moderator)
        .json(&json!({ "id": 1, "status": "invalid_status" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(srv.url("/flat/update"))
        .bearer_auth(&moderator)
        .json(&json!({ "id": 777, "status": "approved" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .post(srv.url(&format!("/house/{house}/subscribe")))
        .bearer_auth(&moderator)
        .json(&json!({ "email": "nope" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn subscribe_requires_existing_house() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();
    let moderator = dummy_token(&client, &srv, "moderator").await;
    let client_token = dummy_token(&client, &srv, "client").await;
    let house = create_house(&client, &srv, &moderator).await;

    let res = client
        .post(srv.url(&format!("/house/{house}/subscribe")))
        .bearer_auth(&client_token)
        .json(&json!({ "email": "a@x.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(srv.url("/house/999/subscribe"))
        .bearer_auth(&client_token)
        .json(&json!({ "email": "a@x.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dummy_login_validates_role_and_can_be_disabled() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/dummyLogin")).query(&[("user_type", "admin")]).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client.get(srv.url("/dummyLogin")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let disabled = TestServer::spawn_with(Config {
        dummy_login: false,
        ..Config::default()
    })
    .await;
    let res = client
        .get(disabled.url("/dummyLogin"))
        .query(&[("user_type", "client")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
