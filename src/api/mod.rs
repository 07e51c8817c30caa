//! Painel HTTP Host
//!
//! Serves the dashboard site and the endpoints next to it, built with Axum.
//!
//! # Endpoints
//!
//! ## Oracle
//! - `GET /cgi-bin/oraculo` - Oracle summary (`{"status": "ok", "dados": ...}`)
//!
//! ## Document
//! - `GET /api/v1/document/check` - Validation summary of the served document
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health` - Full health status
//!
//! ## Static
//! - everything else is served from `server.public_dir`
//!
//! # Example
//!
//! ```rust,ignore
//! use painel::api::{serve, AppState};
//! use painel::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = AppState::new(Config::load_default()?);
//!     serve(state).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{http::HeaderValue, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new().route("/document/check", get(routes::document::check));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/", get(routes::health::full_health));

    let static_files = ServeDir::new(&state.config.server.public_dir);
    let cors = cors_layer(&state.config.server.cors_origins);

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .route("/cgi-bin/oraculo", get(routes::oracle::consult))
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// Permissive when no origins are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new().allow_origin(AllowOrigin::list(allowed))
}

/// Start the server
pub async fn serve(state: AppState) -> Result<(), ApiError> {
    let addr = state.config.server.addr();
    let public_dir = state.config.server.public_dir.clone();
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Painel listening on {} (serving {:?})", addr, public_dir);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Painel shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, OracleConfig, ServerConfig};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tempfile::tempdir;
    use tower::util::ServiceExt;

    const DOCUMENT: &str = r#"{
        "meta": {
            "ultima_atualizacao": "2024-05-02 10:15:00",
            "periodo": { "inicio": "2024-04-01", "fim": "2024-04-30" }
        },
        "kpis": {
            "impressoes_30d": 12345,
            "cliques_30d": 678,
            "ctr_medio_pct": 5.5,
            "posicao_media": 3.1,
            "delta_impressoes_pct": 12.4,
            "delta_cliques_pct": -3.6,
            "delta_ctr_pp": 0.25,
            "delta_posicao_pp": -0.4
        },
        "series": {
            "datas": ["2024-04-01", "2024-04-02"],
            "cliques": [20, 25],
            "impressoes": [400, 410],
            "ctr_pct": [5.0, 6.1]
        },
        "dispositivos": { "desktop": 62, "mobile": 35, "tablet": 3 },
        "paises": [
            { "pais": "BR", "impressoes": 10000, "cliques": 600, "ctr_pct": 6.0 },
            { "pais": "PT", "impressoes": 2345, "cliques": 78, "ctr_pct": 3.3 }
        ]
    }"#;

    fn create_test_app() -> (Router, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let public_dir = dir.path().join("public");
        std::fs::create_dir(&public_dir).unwrap();
        std::fs::write(public_dir.join("index.html"), "<h1>Painel</h1>").unwrap();

        let config = Config {
            server: ServerConfig {
                public_dir: public_dir.clone(),
                ..Default::default()
            },
            oracle: OracleConfig {
                clicks_csv: dir.path().join("diagnosticos.csv"),
                impressions_csv: dir.path().join("respostas.csv"),
                history_csv: public_dir.join("historico_oracular.csv"),
            },
            ..Default::default()
        };

        (build_router(AppState::new(config)), dir)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_live() {
        let (app, _dir) = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_reports_missing_document() {
        let (app, _dir) = create_test_app();

        let (status, body) = get_json(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["document_present"], false);
    }

    #[tokio::test]
    async fn test_health_with_document() {
        let (app, dir) = create_test_app();
        std::fs::write(dir.path().join("public/dados_oraculares.json"), DOCUMENT).unwrap();

        let (_, body) = get_json(app, "/health").await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["document_present"], true);
    }

    #[tokio::test]
    async fn test_document_check_valid() {
        let (app, dir) = create_test_app();
        std::fs::write(dir.path().join("public/dados_oraculares.json"), DOCUMENT).unwrap();

        let (status, body) = get_json(app, "/api/v1/document/check").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], true);
        assert_eq!(body["countries"], 2);
        assert_eq!(body["buckets"], 2);
        assert!(body["error"].is_null());
    }

    #[tokio::test]
    async fn test_document_check_invalid() {
        let (app, dir) = create_test_app();
        std::fs::write(dir.path().join("public/dados_oraculares.json"), "{ not json").unwrap();

        let (status, body) = get_json(app, "/api/v1/document/check").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], false);
        assert!(body["error"].as_str().unwrap().starts_with("Malformed document"));
    }

    #[tokio::test]
    async fn test_document_check_missing() {
        let (app, _dir) = create_test_app();

        let (status, body) = get_json(app, "/api/v1/document/check").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert!(body["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_oracle_endpoint() {
        let (app, dir) = create_test_app();
        std::fs::write(dir.path().join("respostas.csv"), "impressoes\n700\n300\n").unwrap();
        std::fs::write(dir.path().join("diagnosticos.csv"), "cliques\n40\n").unwrap();

        let (status, body) = get_json(app, "/cgi-bin/oraculo").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["dados"]["impressoes"], 1000);
        assert_eq!(body["dados"]["cliques"], 40);
        assert_eq!(body["dados"]["ctr_medio"], 4.0);
        assert_eq!(body["dados"]["paises"][0]["impressoes"], 900);

        let history =
            std::fs::read_to_string(dir.path().join("public/historico_oracular.csv")).unwrap();
        assert!(history.starts_with("ts,impressoes,cliques,ctr\n"));
    }

    #[tokio::test]
    async fn test_oracle_failure_answers_erro() {
        let (_, dir) = create_test_app();
        let config = Config {
            oracle: OracleConfig {
                clicks_csv: dir.path().join("diagnosticos.csv"),
                impressions_csv: dir.path().join("respostas.csv"),
                history_csv: dir.path().join("missing/dir/historico.csv"),
            },
            ..Default::default()
        };
        let app = build_router(AppState::new(config));

        let (status, body) = get_json(app, "/cgi-bin/oraculo").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "erro");
        assert!(body["msg"].is_string());
    }

    #[tokio::test]
    async fn test_static_fallback() {
        let (app, _dir) = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/index.html")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"<h1>Painel</h1>");
    }

    #[tokio::test]
    async fn test_static_missing_file() {
        let (app, _dir) = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/nada.html")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
