use repairhub_server::{AppConfig, build_app};
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn start_server(cfg: AppConfig) -> (String, tokio::sync::oneshot::Sender<()>, JoinHandle<()>) {
    let app = build_app(&cfg).expect("build app");

    // Bind to an ephemeral port
    let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = rx.await;
            })
            .await;
    });

    (format!("http://{addr}"), tx, server)
}

fn config_for(upstream: &MockServer) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.upstream.base_url = upstream.uri();
    cfg
}

#[tokio::test]
async fn server_endpoints_work() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "1", "name": "Ana", "email": "a@x.com"}
        ])))
        .expect(1)
        .mount(&upstream)
        .await;

    let (base, shutdown_tx, handle) = start_server(config_for(&upstream)).await;
    let client = reqwest::Client::new();

    // GET /healthz
    let resp = client.get(format!("{base}/healthz")).send().await.unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    // POST /graphql forwards the caller's token
    let resp = client
        .post(format!("{base}/graphql"))
        .header("authorization", "abc123")
        .json(&json!({"query": "{ users { id name role } }"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({"data": {"users": [{"id": "1", "name": "Ana", "role": null}]}})
    );

    // GET /graphql without a query serves the playground
    let resp = client.get(format!("{base}/graphql")).send().await.unwrap();
    assert!(resp.status().is_success());
    let html = resp.text().await.unwrap();
    assert!(html.contains("/graphql"));

    // GET /graphql with a query executes it
    let resp = client
        .get(format!("{base}/graphql"))
        .query(&[("query", "{ __typename }")])
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["__typename"], "QueryRoot");

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn upstream_errors_stay_http_200() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spare-parts"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&upstream)
        .await;

    let (base, shutdown_tx, handle) = start_server(config_for(&upstream)).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/graphql"))
        .json(&json!({"query": "{ spareParts { id } }"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"], json!({"spareParts": null}));
    assert_eq!(body["errors"][0]["extensions"]["code"], "UPSTREAM_STATUS");
    assert_eq!(body["errors"][0]["extensions"]["status"], 503);

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn cors_allows_configured_origin_only() {
    let upstream = MockServer::start().await;
    let (base, shutdown_tx, handle) = start_server(config_for(&upstream)).await;
    let client = reqwest::Client::new();

    let preflight = |origin: &'static str| {
        client
            .request(reqwest::Method::OPTIONS, format!("{base}/graphql"))
            .header("origin", origin)
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "authorization,content-type")
            .send()
    };

    let resp = preflight("http://localhost:5173").await.unwrap();
    assert!(resp.status().is_success());
    let headers = resp.headers();
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(
        headers.get("access-control-allow-credentials").unwrap(),
        "true"
    );

    let resp = preflight("http://evil.example.com").await.unwrap();
    assert!(resp.headers().get("access-control-allow-origin").is_none());

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn playground_can_be_disabled() {
    let upstream = MockServer::start().await;
    let mut cfg = config_for(&upstream);
    cfg.graphql.playground = false;

    let (base, shutdown_tx, handle) = start_server(cfg).await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/graphql")).send().await.unwrap();
    assert_eq!(resp.status(), 404);

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}
