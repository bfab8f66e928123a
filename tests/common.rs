use neblina_server::api::{self, AppState};
use neblina_server::config::{Config, DeliveryConfig, LogFormat, RateLimitConfig, ServerConfig, TelemetryConfig};
use neblina_server::services::contact_service::ContactService;
use neblina_server::services::rate_limit_service::RateLimitService;
use neblina_server::services::relay::Web3FormsRelay;
use std::net::SocketAddr;
use std::sync::Once;
use std::time::Duration;

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("neblina_server=debug".parse().unwrap())
            .add_directive("tower=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        tracing_subscriber::fmt().with_env_filter(filter).init();
    });
}

#[allow(dead_code)]
pub fn get_test_config() -> Config {
    Config {
        server: ServerConfig { host: "127.0.0.1".to_string(), port: 0 },
        rate_limit: RateLimitConfig { limit: 5, window_secs: 3600, cleanup_interval: 100 },
        delivery: DeliveryConfig {
            // Discard port; tests that exercise delivery point this at a stub.
            api_url: "http://127.0.0.1:9/submit".to_string(),
            access_key: Some("test-access-key".to_string()),
            recipient: Some("studio@example.com".to_string()),
            timeout_secs: 1,
        },
        telemetry: TelemetryConfig { log_format: LogFormat::Text, otlp_endpoint: None },
    }
}

pub struct TestApp {
    pub server_url: String,
    pub client: reqwest::Client,
}

impl TestApp {
    #[allow(dead_code)]
    pub async fn spawn_with_config(config: Config) -> Self {
        setup_tracing();

        let relay = Web3FormsRelay::new(&config.delivery).expect("failed to build relay client");
        let state = AppState {
            rate_limit_service: RateLimitService::new(&config.rate_limit),
            contact_service: ContactService::new(std::sync::Arc::new(relay), config.delivery.clone()),
        };

        let router = api::app_router(state);
        let listener = tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port))
            .await
            .expect("failed to bind test listener");
        let addr = listener.local_addr().expect("listener has no local addr");

        tokio::spawn(async move {
            axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
                .await
                .expect("test server crashed");
        });

        Self { server_url: format!("http://{addr}"), client: reqwest::Client::new() }
    }
}

/// Behavior of the stand-in for the Web3Forms API.
#[allow(dead_code)]
#[derive(Clone, Copy, Debug)]
pub enum RelayMode {
    Success,
    Reject,
    Timeout,
    PlainText,
}

/// Spawns a stub relay on an ephemeral port and returns its submit URL.
#[allow(dead_code)]
pub async fn spawn_stub_relay(mode: RelayMode) -> String {
    let router = axum::Router::new().route("/submit", axum::routing::post(move || stub_response(mode)));
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.expect("failed to bind stub relay");
    let addr = listener.local_addr().expect("stub relay has no local addr");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub relay crashed");
    });

    format!("http://{addr}/submit")
}

#[allow(dead_code)]
async fn stub_response(mode: RelayMode) -> axum::response::Response {
    use axum::Json;
    use axum::response::IntoResponse;
    use serde_json::json;

    match mode {
        RelayMode::Success => Json(json!({"success": true, "message": "Email sent"})).into_response(),
        RelayMode::Reject => Json(json!({"success": false, "message": "Invalid access key"})).into_response(),
        RelayMode::Timeout => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"success": true})).into_response()
        }
        RelayMode::PlainText => "everything is fine".into_response(),
    }
}

#[allow(dead_code)]
pub fn valid_payload() -> serde_json::Value {
    serde_json::json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "message": "I would like to talk about a new project.",
    })
}
