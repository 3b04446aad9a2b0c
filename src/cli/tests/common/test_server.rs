use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use assert_cmd::assert::Assert;
use assert_cmd::Command;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::task::JoinHandle;

#[derive(Clone, Default)]
struct ServerState {
    endpoints: Arc<Vec<Value>>,
    deliveries: Arc<Mutex<Vec<String>>>,
}

/// Plays both sides of a listen session: the account API that lists webhook
/// endpoints and the local app that receives forwarded events.
pub struct TestServer {
    dir: TempDir,
    handle: JoinHandle<()>,
    addr: SocketAddr,
    deliveries: Arc<Mutex<Vec<String>>>,
}

async fn list_endpoints(State(state): State<ServerState>) -> Json<Value> {
    Json(json!({ "data": state.endpoints.to_vec(), "has_more": false }))
}

async fn receive(State(state): State<ServerState>, uri: Uri) -> StatusCode {
    state.deliveries.lock().unwrap().push(uri.path().to_string());
    StatusCode::OK
}

impl TestServer {
    pub async fn launch(endpoints: Vec<Value>) -> anyhow::Result<Self> {
        let state = ServerState {
            endpoints: Arc::new(endpoints),
            ..Default::default()
        };
        let deliveries = state.deliveries.clone();

        let app = Router::new()
            .route("/v1/webhook_endpoints", get(list_endpoints))
            .fallback(receive)
            .with_state(state);

        // 0: means port will be picked by the OS
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        println!("server listening on {}", addr);

        let handle = tokio::task::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let dir = TempDir::new()?;
        std::fs::write(
            dir.path().join("config.toml"),
            "device_name = \"e2e-runner\"\n",
        )?;

        Ok(Self {
            dir,
            handle,
            addr,
            deliveries,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn api_base(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn config_path(&self) -> String {
        self.dir.path().join("config.toml").display().to_string()
    }

    pub fn deliveries(&self) -> Vec<String> {
        self.deliveries.lock().unwrap().clone()
    }

    pub async fn send_command(&self, command: &[&str], stdin: &str) -> Assert {
        let mut cmd = Command::cargo_bin("hookfwd").unwrap();
        cmd.env("NO_COLOR", "1");
        cmd.env("RUST_BACKTRACE", "1");
        cmd.env_remove("HOOKFWD_API_KEY");
        cmd.env_remove("RUST_LOG");
        cmd.arg("--config").arg(self.config_path());
        cmd.args(command);
        cmd.write_stdin(stdin.to_string());
        cmd.timeout(std::time::Duration::from_secs(30));

        tokio::task::spawn_blocking(move || cmd.assert())
            .await
            .unwrap()
    }

    pub fn finished(self) {
        self.handle.abort();
    }
}
