//! HTTP API gateway for Metodo.
//!
//! Exposes the entry repository under `/entries` and `/search`, the
//! assistant under `/agent`, plus the static frontend.
//!
//! Built on Axum; errors are returned as `{"detail": "..."}`.

pub mod agent;
pub mod entries;
pub mod error;
pub mod frontend;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    response::Json,
    routing::{get, post},
};
use metodo_agent::Assistant;
use metodo_config::AppConfig;
use metodo_library::EntryRepository;
use metodo_notion::NotionClient;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::ApiError;

/// Shared application state for the gateway.
pub struct AppState {
    pub repository: EntryRepository,
    pub assistant: Assistant,
}

pub type SharedState = Arc<AppState>;

/// Build the API router (no frontend).
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route(
            "/entries",
            get(entries::list_entries).post(entries::create_entry),
        )
        .route(
            "/entries/{id}",
            get(entries::get_entry)
                .put(entries::update_entry)
                .delete(entries::delete_entry),
        )
        .route("/search", get(entries::search))
        .route("/agent/chat", post(agent::chat))
        .route("/agent/develop", post(agent::develop))
        .route("/agent/absurd", post(agent::absurd))
        .route("/agent/analyze", post(agent::analyze))
        .route("/agent/examples", get(agent::examples))
        .with_state(state)
}

/// Build the full application: API, frontend, and the HTTP layers.
pub fn build_app(state: SharedState, config: &AppConfig) -> Router {
    frontend::attach(build_router(state), &config.gateway.frontend_dir)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Construct the Notion client and LLM provider once and wire them into
/// the shared state.
pub fn build_state(config: &AppConfig) -> Result<SharedState, Box<dyn std::error::Error>> {
    config.require_credentials()?;

    let store = Arc::new(NotionClient::from_config(&config.notion)?);
    let database_id = config.notion.database_id.clone().unwrap_or_default();
    let repository = EntryRepository::new(store, database_id);

    let provider = metodo_providers::build_from_config(&config.llm)?;
    let assistant = Assistant::from_config(provider, repository.clone(), &config.llm);

    Ok(Arc::new(AppState {
        repository,
        assistant,
    }))
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let state = build_state(&config)?;
    info!(
        provider = state.assistant.provider_name(),
        model = state.assistant.model(),
        "Clients ready"
    );

    let app = build_app(state, &config);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct RootResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        status: "ok",
        service: "Metodo API",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use metodo_core::message::Message;
    use metodo_core::provider::{Provider, ProviderRequest, ProviderResponse};
    use metodo_core::error::ProviderError;
    use metodo_notion::InMemoryStore;
    use tower::ServiceExt;

    const DB: &str = "db";

    /// Echoes the last user message back.
    struct EchoProvider;

    #[async_trait::async_trait]
    impl Provider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(
            &self,
            request: ProviderRequest,
        ) -> Result<ProviderResponse, ProviderError> {
            let last = request.messages.last().map(|m| m.content.clone());
            Ok(ProviderResponse {
                message: Message::assistant(last.unwrap_or_default()),
                usage: None,
                model: request.model,
            })
        }
    }

    fn test_app() -> (Arc<InMemoryStore>, Router) {
        let store = Arc::new(InMemoryStore::new());
        let repository = EntryRepository::new(store.clone(), DB);
        let assistant = Assistant::new(Arc::new(EchoProvider), repository.clone());
        let state = Arc::new(AppState {
            repository,
            assistant,
        });
        (store, build_router(state))
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_req(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn root_and_health() {
        let (_, app) = test_app();
        let (status, json) = send(app.clone(), get_req("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["service"], "Metodo API");
        assert_eq!(json["status"], "ok");

        let (status, json) = send(app, get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn entry_lifecycle() {
        let (_, app) = test_app();

        let (status, created) = send(
            app.clone(),
            json_req(
                "POST",
                "/entries",
                serde_json::json!({"titulo": "EJEMPLO uno", "contenido": "A", "tipo": "Análisis"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let id = created["id"].as_str().unwrap().to_string();
        assert!(created["url"].as_str().unwrap().starts_with("https://"));

        let (status, entry) = send(app.clone(), get_req(&format!("/entries/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(entry["titulo"], "EJEMPLO uno");
        assert_eq!(entry["contenido"], "A");

        let (status, updated) = send(
            app.clone(),
            json_req(
                "PUT",
                &format!("/entries/{id}"),
                serde_json::json!({"tags": ["ruptura"]}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated, serde_json::json!({"id": id, "updated": true}));

        let (status, list) = send(app.clone(), get_req("/entries?tipo=An%C3%A1lisis")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list["count"], 1);
        assert_eq!(list["entries"][0]["tags"][0], "ruptura");
        assert!(list["entries"][0].get("contenido").is_none());

        let req = Request::builder()
            .method("DELETE")
            .uri(format!("/entries/{id}"))
            .body(Body::empty())
            .unwrap();
        let (status, archived) = send(app.clone(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(archived["archived"], true);

        let (_, list) = send(app, get_req("/entries")).await;
        assert_eq!(list["count"], 0);
    }

    #[tokio::test]
    async fn unknown_entry_is_404_with_detail() {
        let (_, app) = test_app();
        let (status, json) = send(app, get_req("/entries/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["detail"].is_string());
    }

    #[tokio::test]
    async fn limit_out_of_range_is_400() {
        let (_, app) = test_app();
        let (status, json) = send(app.clone(), get_req("/entries?limit=0")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["detail"].as_str().unwrap().contains("limit"));

        let (status, _) = send(app.clone(), get_req("/entries?limit=101")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(app, get_req("/entries?limit=abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn search_requires_query() {
        let (_, app) = test_app();
        let (status, _) = send(app.clone(), get_req("/search")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = send(app, get_req("/search?q=")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn search_filters_to_database() {
        let (store, app) = test_app();
        let props = |t: &str| {
            metodo_core::store::PropertyMap::from([(
                "Nombre".to_string(),
                metodo_core::store::PropertyWrite::title(t),
            )])
        };
        store.insert_page(DB, props("Gato ninja"), vec![]).await;
        store.insert_page("otra", props("Gato volador"), vec![]).await;

        let (status, json) = send(app, get_req("/search?q=gato")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["count"], 1);
        assert_eq!(json["results"][0]["titulo"], "Gato ninja");
    }

    #[tokio::test]
    async fn store_failure_is_500() {
        let (store, app) = test_app();
        store.fail_on(DB).await;
        let (status, json) = send(app, get_req("/entries")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["detail"].as_str().unwrap().contains("injected"));
    }

    #[tokio::test]
    async fn agent_chat_defaults_to_library() {
        let (store, app) = test_app();
        let (status, json) = send(
            app.clone(),
            json_req("POST", "/agent/chat", serde_json::json!({"message": "hola"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["response"], "hola");
        assert_eq!(store.calls().await, vec![format!("query_database {DB}")]);

        store.clear_calls().await;
        send(
            app,
            json_req(
                "POST",
                "/agent/chat",
                serde_json::json!({"message": "hola", "include_library": false}),
            ),
        )
        .await;
        assert!(store.calls().await.is_empty());
    }

    #[tokio::test]
    async fn agent_templates_echo_inputs() {
        let (_, app) = test_app();

        let (_, json) = send(
            app.clone(),
            json_req("POST", "/agent/develop", serde_json::json!({"concepto": "gato"})),
        )
        .await;
        assert_eq!(json["concepto"], "gato");
        assert!(json["sugerencias"].as_str().unwrap().contains("\"gato\""));

        let (_, json) = send(
            app.clone(),
            json_req(
                "POST",
                "/agent/absurd",
                serde_json::json!({"elemento_mecanico": "caen de pie"}),
            ),
        )
        .await;
        assert_eq!(json["elemento_mecanico"], "caen de pie");
        assert!(json["realidades_absurdas"].is_string());

        let (_, json) = send(
            app.clone(),
            json_req("POST", "/agent/analyze", serde_json::json!({"concepto": "camara"})),
        )
        .await;
        assert_eq!(json["concepto"], "camara");
        assert!(json["analisis"].as_str().unwrap().starts_with("Analiza el concepto"));

        let (_, json) = send(app, get_req("/agent/examples?tecnica=inversion")).await;
        assert_eq!(
            json["response"],
            "Busca en la biblioteca ejemplos de chistes que usen la tecnica: inversion"
        );
    }

    #[tokio::test]
    async fn malformed_body_is_rejected_with_detail() {
        let (_, app) = test_app();
        let (status, json) = send(
            app,
            json_req("POST", "/agent/develop", serde_json::json!({"wrong": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(json["detail"].is_string());
    }
}
