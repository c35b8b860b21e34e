//! # Common Test Utilities
//!
//! This module centralizes the test harness used across the `paraflow-server`
//! integration tests. `TestApp` spawns a real server on a random port, with
//! its upload and output directories in a temp dir and the AI provider
//! pointed at a `wiremock::MockServer` speaking the chat-completions format.

#![allow(unused)]

use anyhow::Result;
use axum::serve;
use paraflow_server::{
    config,
    router,
    state::{build_app_state, AppState},
};
use reqwest::Client;
use serde_json::{json, Value};
use std::{fs::File, io::Write, net::SocketAddr, path::PathBuf};
use tempfile::{tempdir, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub app_state: AppState,
    pub upload_dir: PathBuf,
    pub output_dir: PathBuf,
    _work_dir: TempDir,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the application server and returns a `TestApp` instance.
    pub async fn spawn() -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let mock_server = MockServer::start().await;
        let work_dir = tempdir()?;
        let upload_dir = work_dir.path().join("uploads");
        let output_dir = work_dir.path().join("processed");

        let config_path = work_dir.path().join("config.yml");
        let config_content = format!(
            r#"
port: 0
upload_dir: "{}"
output_dir: "{}"
provider:
  provider: "openrouter"
  api_url: "{}/v1/chat/completions"
  api_key: "test-key"
  model_name: "mock-chat-model"
engine:
  max_chunk_size: 4000
  overlap_size: 200
  pacing_interval_ms: 0
worker:
  max_attempts: 2
  retry_backoff_ms: 10
"#,
            upload_dir.display(),
            output_dir.display(),
            mock_server.uri(),
        );
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let config = config::get_config(Some(config_path.to_str().unwrap()))?;
        let app_state = build_app_state(config).await?;
        let app_state_for_harness = app_state.clone();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            app_state: app_state_for_harness,
            upload_dir,
            output_dir,
            _work_dir: work_dir,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Mounts a chat-completions mock returning `content` for every call.
    pub async fn mock_completion(&self, content: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [
                    { "message": { "role": "assistant", "content": content } }
                ]
            })))
            .mount(&self.mock_server)
            .await;
    }

    /// Uploads a text document and returns the upload response body.
    pub async fn upload_txt(&self, file_name: &str, content: &str) -> Result<Value> {
        let part = reqwest::multipart::Part::bytes(content.as_bytes().to_vec())
            .file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("document", part);
        let response = self
            .client
            .post(format!("{}/upload", self.address))
            .multipart(form)
            .send()
            .await?;
        anyhow::ensure!(
            response.status().is_success(),
            "upload failed: {}",
            response.text().await?
        );
        Ok(response.json().await?)
    }

    /// Starts a paraphrasing job for an uploaded document and returns the
    /// job id.
    pub async fn start_paraphrase(&self, upload: &Value, config: Option<Value>) -> Result<String> {
        let mut body = json!({
            "documentId": upload["documentId"],
            "filePath": upload["filePath"],
            "fileType": upload["fileType"],
        });
        if let Some(config) = config {
            body["config"] = config;
        }
        let response = self
            .client
            .post(format!("{}/paraphrase", self.address))
            .json(&body)
            .send()
            .await?;
        anyhow::ensure!(
            response.status().is_success(),
            "paraphrase failed: {}",
            response.text().await?
        );
        let body: Value = response.json().await?;
        Ok(body["jobId"].as_str().unwrap().to_string())
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
