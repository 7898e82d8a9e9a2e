//! Mock coordinator and session adapter shared by the integration tests.

#![allow(dead_code)]

use std::{
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use nsm_client::{
    Capabilities, Capability, ClientConfig, ClientStatus, EventChannel, ProtocolError, ServerInfo,
    Session, SessionInfo,
};
use nsm_core::{Methods, address};
use nsm_osc::{Message, Transport, TransportError, UdpTransport};
use tokio::{net::UdpSocket, sync::mpsc};

pub const WAIT: Duration = Duration::from_secs(2);

/// How the mock answers the announce request.
#[derive(Clone)]
pub enum AnnounceReply {
    /// Well-formed reply.
    Standard,
    /// Send this message instead.
    Custom(Message),
    /// Never reply.
    Silent,
}

#[derive(Clone)]
pub struct MockConfig {
    pub reply: AnnounceReply,
    pub delay: Duration,
    /// Sent to the client before the announce reply.
    pub before_reply: Option<Message>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            reply: AnnounceReply::Standard,
            delay: Duration::from_millis(10),
            before_reply: None,
        }
    }
}

pub fn standard_reply() -> Message {
    Message::new(address::REPLY)
        .arg(address::SERVER_ANNOUNCE)
        .arg("session started")
        .arg("mock_nsmd")
        .arg(
            [Capability::BROADCAST, Capability::SERVER_CONTROL]
                .into_iter()
                .collect::<Capabilities>()
                .to_string(),
        )
}

/// A coordinator on a loopback UDP socket.
///
/// Answers announce requests and queues every other inbound message.
pub struct MockCoordinator {
    socket: Arc<UdpSocket>,
    inbox: mpsc::UnboundedReceiver<Message>,
    announces: Arc<Mutex<Vec<Message>>>,
    task: tokio::task::JoinHandle<()>,
}

impl MockCoordinator {
    pub async fn start(config: MockConfig) -> Self {
        let socket = Arc::new(UdpSocket::bind("127.0.0.1:0").await.unwrap());
        let (tx, inbox) = mpsc::unbounded_channel();
        let announces = Arc::new(Mutex::new(Vec::new()));

        let task = tokio::spawn({
            let socket = Arc::clone(&socket);
            let announces = Arc::clone(&announces);
            async move {
                let mut buf = vec![0u8; 65536];
                loop {
                    let Ok((n, from)) = socket.recv_from(&mut buf).await else {
                        return;
                    };
                    let Ok(msg) = Message::decode(&buf[..n]) else {
                        continue;
                    };
                    if msg.address != address::SERVER_ANNOUNCE {
                        let _ = tx.send(msg);
                        continue;
                    }
                    announces.lock().unwrap().push(msg);

                    let socket = Arc::clone(&socket);
                    let config = config.clone();
                    tokio::spawn(async move {
                        if let Some(early) = &config.before_reply {
                            let _ = socket.send_to(&early.encode(), from).await;
                        }
                        tokio::time::sleep(config.delay).await;
                        let reply = match config.reply {
                            AnnounceReply::Standard => standard_reply(),
                            AnnounceReply::Custom(msg) => msg,
                            AnnounceReply::Silent => return,
                        };
                        let _ = socket.send_to(&reply.encode(), from).await;
                    });
                }
            }
        });

        Self {
            socket,
            inbox,
            announces,
            task,
        }
    }

    pub fn url(&self) -> String {
        format!("osc.udp://{}/", self.socket.local_addr().unwrap())
    }

    /// Client config pointing at this coordinator.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_name("test_client")
            .with_capabilities(["switch", "progress"].into_iter().collect())
            .with_nsm_url(self.url())
            .with_listen_addr("127.0.0.1:0")
    }

    pub fn announces(&self) -> Vec<Message> {
        self.announces.lock().unwrap().clone()
    }

    pub async fn send_to(&self, to: SocketAddr, msg: &Message) {
        self.socket.send_to(&msg.encode(), to).await.unwrap();
    }

    /// Next non-announce message from the client.
    pub async fn next(&mut self) -> Message {
        tokio::time::timeout(WAIT, self.inbox.recv())
            .await
            .expect("timed out waiting for client message")
            .expect("mock coordinator stopped")
    }

    /// Assert nothing else arrives within `window`.
    pub async fn assert_quiet(&mut self, window: Duration) {
        if let Ok(Some(msg)) = tokio::time::timeout(window, self.inbox.recv()).await {
            panic!("unexpected message {msg}");
        }
    }
}

impl Drop for MockCoordinator {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Scripted session adapter.
pub struct MockSession {
    pub open_result: Result<String, ProtocolError>,
    pub save_result: Result<String, ProtocolError>,
    pub announce_result: Result<(), ProtocolError>,
    pub opened: Mutex<Vec<SessionInfo>>,
    pub server_info: Mutex<Option<ServerInfo>>,
    pub notices: mpsc::UnboundedSender<String>,
    pub dirty: Option<EventChannel<bool>>,
    pub gui: Option<EventChannel<bool>>,
    pub progress: Option<EventChannel<f32>>,
    pub status: Option<EventChannel<ClientStatus>>,
    pub methods: Mutex<Option<Methods>>,
}

impl MockSession {
    /// A session with every stream absent, plus a receiver of notices
    /// (`"loaded"`, `"gui:true"`, `"gui:false"`).
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (notices, rx) = mpsc::unbounded_channel();
        (
            Self {
                open_result: Ok("started".into()),
                save_result: Ok("saved".into()),
                announce_result: Ok(()),
                opened: Mutex::new(Vec::new()),
                server_info: Mutex::new(None),
                notices,
                dirty: None,
                gui: None,
                progress: None,
                status: None,
                methods: Mutex::new(None),
            },
            rx,
        )
    }

    pub fn with_all_streams(mut self) -> Self {
        self.dirty = Some(EventChannel::new());
        self.gui = Some(EventChannel::new());
        self.progress = Some(EventChannel::new());
        self.status = Some(EventChannel::new());
        self
    }
}

#[async_trait]
impl Session for MockSession {
    async fn announce(&self, info: ServerInfo) -> Result<(), ProtocolError> {
        *self.server_info.lock().unwrap() = Some(info);
        self.announce_result.clone()
    }

    async fn open(&self, info: SessionInfo) -> Result<String, ProtocolError> {
        self.opened.lock().unwrap().push(info);
        self.open_result.clone()
    }

    async fn save(&self) -> Result<String, ProtocolError> {
        self.save_result.clone()
    }

    async fn session_is_loaded(&self) {
        let _ = self.notices.send("loaded".into());
    }

    async fn show_gui(&self, show: bool) {
        let _ = self.notices.send(format!("gui:{show}"));
    }

    fn dirty(&self) -> Option<mpsc::Receiver<bool>> {
        self.dirty.as_ref().and_then(EventChannel::take)
    }

    fn gui_visible(&self) -> Option<mpsc::Receiver<bool>> {
        self.gui.as_ref().and_then(EventChannel::take)
    }

    fn progress(&self) -> Option<mpsc::Receiver<f32>> {
        self.progress.as_ref().and_then(EventChannel::take)
    }

    fn status(&self) -> Option<mpsc::Receiver<ClientStatus>> {
        self.status.as_ref().and_then(EventChannel::take)
    }

    fn methods(&self) -> Methods {
        self.methods.lock().unwrap().take().unwrap_or_default()
    }
}

/// UDP transport whose sends start failing after `ok_sends` successes, or
/// that fails only sends to one address.
pub struct FailingTransport {
    inner: UdpTransport,
    ok_sends: AtomicUsize,
    only: Option<&'static str>,
}

impl FailingTransport {
    pub async fn connect(url: &str, ok_sends: usize) -> Self {
        Self {
            inner: UdpTransport::connect(url, "127.0.0.1:0").await.unwrap(),
            ok_sends: AtomicUsize::new(ok_sends),
            only: None,
        }
    }

    pub async fn failing_on(url: &str, address: &'static str) -> Self {
        Self {
            inner: UdpTransport::connect(url, "127.0.0.1:0").await.unwrap(),
            ok_sends: AtomicUsize::new(0),
            only: Some(address),
        }
    }
}

#[async_trait]
impl Transport for FailingTransport {
    async fn send(&self, msg: &Message) -> Result<(), TransportError> {
        let allowed = match self.only {
            Some(address) => msg.address != address,
            None => self
                .ok_sends
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok(),
        };
        if !allowed {
            return Err(TransportError::Io(std::io::Error::other("fail send")));
        }
        self.inner.send(msg).await
    }

    async fn recv(&self) -> Result<Message, TransportError> {
        self.inner.recv().await
    }

    fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        self.inner.local_addr()
    }
}
