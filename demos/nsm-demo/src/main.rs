//! Demo client for a running session coordinator.
//!
//! Run with: NSM_URL=osc.udp://localhost:12345/ cargo run -p nsm-demo
//!
//! An optional argument names a JSON file holding a `ClientConfig`.

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use async_trait::async_trait;
use nsm_client::{
    Capabilities, Capability, Client, ClientConfig, ClientStatus, EventChannel, ProtocolError,
    ServerInfo, Session, SessionInfo,
};
use nsm_core::{Methods, handler};
use tokio::sync::{Mutex, mpsc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Session adapter that pretends to load and save a project directory.
struct DemoSession {
    project: Mutex<Option<PathBuf>>,
    dirty: EventChannel<bool>,
    progress: EventChannel<f32>,
    status: EventChannel<ClientStatus>,
}

impl DemoSession {
    fn new() -> Self {
        Self {
            project: Mutex::new(None),
            dirty: EventChannel::new(),
            progress: EventChannel::new(),
            status: EventChannel::new(),
        }
    }
}

#[async_trait]
impl Session for DemoSession {
    async fn announce(&self, info: ServerInfo) -> Result<(), ProtocolError> {
        tracing::info!(
            server = %info.name,
            capabilities = %info.capabilities,
            "Announced: {}",
            info.message
        );
        Ok(())
    }

    async fn open(&self, info: SessionInfo) -> Result<String, ProtocolError> {
        tracing::info!(
            path = %info.project_path.display(),
            client_id = %info.client_id,
            "Opening {}",
            info.display_name
        );
        let progress = self.progress.sender();
        for step in 1..=4u8 {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let _ = progress.send(f32::from(step) / 4.0).await;
        }
        *self.project.lock().await = Some(info.project_path);
        let _ = self
            .status
            .sender()
            .send(ClientStatus::new(1, "project loaded"))
            .await;
        Ok("opened".into())
    }

    async fn save(&self) -> Result<String, ProtocolError> {
        let project = self.project.lock().await;
        let Some(path) = project.as_ref() else {
            return Err(ProtocolError::new(
                nsm_client::Code::NoSessionOpen,
                "no project open",
            ));
        };
        tracing::info!(path = %path.display(), "Saving");
        let _ = self.dirty.sender().send(false).await;
        Ok("saved".into())
    }

    async fn session_is_loaded(&self) {
        tracing::info!("Session loaded");
    }

    fn dirty(&self) -> Option<mpsc::Receiver<bool>> {
        self.dirty.take()
    }

    fn progress(&self) -> Option<mpsc::Receiver<f32>> {
        self.progress.take()
    }

    fn status(&self) -> Option<mpsc::Receiver<ClientStatus>> {
        self.status.take()
    }

    fn methods(&self) -> Methods {
        let dirty = self.dirty.sender();
        let mut methods = Methods::new();
        methods.insert(
            "/demo/touch".into(),
            handler(move |_| {
                let dirty = dirty.clone();
                async move {
                    let _ = dirty.send(true).await;
                    Ok(None)
                }
            }),
        );
        methods
    }
}

fn load_config() -> anyhow::Result<ClientConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(ClientConfig::from_env());
    };
    let raw = std::fs::read_to_string(&path).with_context(|| format!("read {path}"))?;
    let mut config: ClientConfig =
        serde_json::from_str(&raw).with_context(|| format!("parse {path}"))?;
    if config.nsm_url.is_none() {
        config.nsm_url = ClientConfig::from_env().nsm_url;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut config = load_config()?;
    if config.capabilities.is_empty() {
        config.capabilities = [Capability::DIRTY, Capability::PROGRESS, Capability::MESSAGE]
            .into_iter()
            .collect::<Capabilities>();
    }
    if config.name.is_none() {
        config.name = Some("nsm-demo".into());
    }

    let mut client = Client::connect(config, Arc::new(DemoSession::new()))
        .await
        .context("start client")?;
    tracing::info!("Listening on {}", client.local_addr());

    let cancel = client.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, shutting down");
            cancel.cancel();
        }
    });

    client.wait().await.context("client stopped")?;
    client.close().await.context("close client")
}
