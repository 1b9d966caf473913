//! App wiring: configuration files, guest id persistence and service commands

use axum::routing::{get, post};
use axum::{Json, Router};
use morph::cli::{App, CliError, Config, TuneArgs};
use morph::identity::GuestId;
use morph::network::ServiceError;
use serde_json::{json, Value};
use tempfile::TempDir;

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn config_for(dir: &TempDir, api_url: &str) -> Config {
    Config {
        api_url: api_url.to_string(),
        data_dir: dir.path().join("data"),
        request_timeout_secs: 1,
        max_attempts: 1,
        retry_base_delay_ms: 0,
        ..Config::default()
    }
}

#[test]
fn test_guest_id_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir, "http://localhost:8000");

    let first = App::with_config(config.clone()).unwrap();
    let second = App::with_config(config.clone()).unwrap();
    assert_eq!(first.guest_id, second.guest_id);
    assert_eq!(
        GuestId::load(&config.data_dir).unwrap(),
        Some(first.guest_id)
    );
}

#[test]
fn test_config_file_drives_app() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    config_for(&temp_dir, "http://bot.internal:9000/")
        .save_to(&path)
        .unwrap();

    let mut config = Config::load_or_create(&path).unwrap();
    config.apply_overrides(None, None);
    let app = App::with_config(config).unwrap();
    assert_eq!(app.client().base_url(), "http://bot.internal:9000");
}

#[tokio::test]
async fn test_health_and_tune_against_service() {
    let app_router = Router::new()
        .route("/health", get(|| async { Json(json!({"status": "ok"})) }))
        .route(
            "/update-config",
            post(|Json(body): Json<Value>| async move {
                Json(json!({"status": "updated", "config": body}))
            }),
        );
    let url = serve(app_router).await;
    let temp_dir = TempDir::new().unwrap();
    let app = App::with_config(config_for(&temp_dir, &url)).unwrap();

    app.handle_health().await.unwrap();
    app.handle_tune(TuneArgs {
        mistake_severe_min: Some(300),
        ..Default::default()
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_health_failure_maps_to_service_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let temp_dir = TempDir::new().unwrap();
    let app = App::with_config(config_for(&temp_dir, &format!("http://{}", addr))).unwrap();

    let err = app.handle_health().await.unwrap_err();
    let cli = CliError::from(err);
    assert!(matches!(cli, CliError::Service(ServiceError::Unreachable(_))));
    assert!(cli.to_string().contains("💡 Suggestion"));
}
