use std::sync::Arc;

use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use shared::{
    domain::{CommittedQuery, FilterCriteria, OfficialId},
    error::ResponseError,
};
use tokio::{net::TcpListener, sync::Mutex};

use super::*;
use crate::config::Settings;

#[derive(Clone, Default)]
struct Recorded {
    queries: Arc<Mutex<Vec<String>>>,
}

impl Recorded {
    async fn queries(&self) -> Vec<String> {
        self.queries.lock().await.clone()
    }
}

async fn spawn_server(app: Router) -> Url {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Url::parse(&format!("http://{addr}/api/v2")).expect("base url")
}

async fn officials_page(
    State(recorded): State<Recorded>,
    RawQuery(query): RawQuery,
) -> Json<serde_json::Value> {
    recorded.queries.lock().await.push(query.unwrap_or_default());
    Json(json!({
        "dados": [
            {"id": 1, "nome": "Ana Paula", "siglaPartido": "PT", "siglaUf": "SP", "urlFoto": "https://img/1.jpg"},
            {"id": 2, "nome": "Ana Clara", "siglaPartido": "PL", "siglaUf": "SP", "urlFoto": "https://img/2.jpg"}
        ],
        "links": [
            {"rel": "self", "href": "https://dadosabertos.camara.leg.br/api/v2/deputados?pagina=1"},
            {"rel": "last", "href": "https://dadosabertos.camara.leg.br/api/v2/deputados?pagina=3"}
        ]
    }))
}

async fn party_list(
    State(recorded): State<Recorded>,
    RawQuery(query): RawQuery,
) -> Json<serde_json::Value> {
    recorded.queries.lock().await.push(query.unwrap_or_default());
    Json(json!({
        "dados": [
            {"id": 36898, "sigla": "AVANTE", "nome": "Avante"},
            {"id": 36899, "sigla": "MDB", "nome": "Movimento Democrático Brasileiro"}
        ],
        "links": []
    }))
}

fn ana_in_sao_paulo() -> DirectoryRequest {
    DirectoryRequest::from_query(&CommittedQuery::with_criteria(FilterCriteria::new(
        "ana", "SP", "",
    )))
}

#[tokio::test]
async fn officials_request_follows_query_contract_and_decodes_page() {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/api/v2/deputados", get(officials_page))
        .with_state(recorded.clone());
    let base = spawn_server(app).await;
    let source = HttpDirectorySource::new(base, QueryDefaults::default());

    let payload = source
        .fetch_officials(&ana_in_sao_paulo())
        .await
        .expect("payload");

    assert_eq!(
        recorded.queries().await,
        ["itens=50&dataInicio=2023-01-01&ordem=ASC&ordenarPor=nome&pagina=1&nome=ana&siglaUf=SP"]
    );
    assert_eq!(payload.officials.len(), 2);
    assert_eq!(payload.officials[0].id, OfficialId(1));
    assert_eq!(payload.officials[1].affiliation(), "PL - SP");
    assert_eq!(payload.links.len(), 2);
}

#[tokio::test]
async fn party_request_uses_sigla_ordering() {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/api/v2/partidos", get(party_list))
        .with_state(recorded.clone());
    let base = spawn_server(app).await;
    let source = HttpDirectorySource::new(base, QueryDefaults::default());

    let codes = source.fetch_party_codes().await.expect("codes");

    assert_eq!(codes, ["AVANTE", "MDB"]);
    assert_eq!(
        recorded.queries().await,
        ["itens=100&ordem=ASC&ordenarPor=sigla"]
    );
}

#[tokio::test]
async fn non_success_status_is_a_response_error() {
    let app = Router::new().route(
        "/api/v2/deputados",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance").into_response() }),
    );
    let base = spawn_server(app).await;
    let source = HttpDirectorySource::new(base, QueryDefaults::default());

    let err = source
        .fetch_officials(&ana_in_sao_paulo())
        .await
        .expect_err("status error");
    assert_eq!(err, DirectoryError::status(503));
}

#[tokio::test]
async fn undecodable_body_is_a_response_error() {
    let app = Router::new().route("/api/v2/deputados", get(|| async { "<html>oops</html>" }));
    let base = spawn_server(app).await;
    let source = HttpDirectorySource::new(base, QueryDefaults::default());

    let err = source
        .fetch_officials(&ana_in_sao_paulo())
        .await
        .expect_err("decode error");
    assert!(matches!(
        err,
        DirectoryError::Response(ResponseError::Malformed(_))
    ));
}

#[tokio::test]
async fn unexpected_shape_fails_closed() {
    let app = Router::new().route(
        "/api/v2/deputados",
        get(|| async { Json(json!({"dados": {"id": 1}, "links": []})) }),
    );
    let base = spawn_server(app).await;
    let source = HttpDirectorySource::new(base, QueryDefaults::default());

    let err = source
        .fetch_officials(&ana_in_sao_paulo())
        .await
        .expect_err("shape error");
    assert_eq!(err.code(), shared::error::ErrorCode::Response);
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let base = Url::parse(&format!("http://{addr}/api/v2")).expect("base url");
    let source = HttpDirectorySource::new(base, QueryDefaults::default());

    let err = source.fetch_party_codes().await.expect_err("network error");
    assert!(matches!(err, DirectoryError::Network(_)));
}

#[tokio::test]
async fn settings_drive_base_url_and_page_size() {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/api/v2/deputados", get(officials_page))
        .with_state(recorded.clone());
    let base = spawn_server(app).await;

    let settings = Settings::from_sources(
        Some(&format!(
            "api_base_url = \"{base}\"\npage_size = 20\nstart_date = \"2019-02-01\"\nrequest_timeout_secs = 5"
        )),
        |_| None,
    )
    .expect("settings");
    let source = HttpDirectorySource::from_settings(&settings).expect("source");
    assert_eq!(source.base_url(), &base);

    source
        .fetch_officials(&DirectoryRequest::from_query(&CommittedQuery::default()))
        .await
        .expect("payload");
    assert_eq!(
        recorded.queries().await,
        ["itens=20&dataInicio=2019-02-01&ordem=ASC&ordenarPor=nome&pagina=1"]
    );
}
