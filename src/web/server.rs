//! WebSocket server for streaming the terminal to browsers.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio_tungstenite::tungstenite::Message;

/// Channel for sending terminal output to all connected clients
pub type OutputSender = broadcast::Sender<Vec<u8>>;

/// Keyboard events from any client
pub type InputReceiver = mpsc::Receiver<KeyEvent>;
pub type InputSender = mpsc::Sender<KeyEvent>;

pub struct WebServer {
    pub output_tx: OutputSender,
    input_rx: Arc<Mutex<InputReceiver>>,
    /// Cloned for each connection
    pub input_tx: InputSender,
}

impl WebServer {
    pub fn new() -> Self {
        let (output_tx, _) = broadcast::channel(100);
        let (input_tx, input_rx) = mpsc::channel(100);

        Self {
            output_tx,
            input_rx: Arc::new(Mutex::new(input_rx)),
            input_tx,
        }
    }

    /// Sender for the tee writer.
    pub fn output_sender(&self) -> OutputSender {
        self.output_tx.clone()
    }

    /// Non-blocking receive for the game loop thread.
    pub fn try_recv_input_sync(&self) -> Option<KeyEvent> {
        if let Ok(mut rx) = self.input_rx.try_lock() {
            rx.try_recv().ok()
        } else {
            None
        }
    }
}

impl Default for WebServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Accept connections on `port` until the runtime shuts down.
pub async fn start_web_server(port: u16, server: Arc<WebServer>) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    log::info!("web server listening on http://localhost:{}", port);

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let server = Arc::clone(&server);
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, addr, server).await {
                        log::warn!("connection error from {}: {}", addr, e);
                    }
                });
            }
            Err(e) => log::warn!("accept error: {}", e),
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    server: Arc<WebServer>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Plain GET / serves the page; anything else is a WebSocket upgrade.
    let mut peek_buf = [0u8; 512];
    let n = stream.peek(&mut peek_buf).await?;
    let request = String::from_utf8_lossy(&peek_buf[..n]);
    if request.starts_with("GET / ") && !request.to_ascii_lowercase().contains("upgrade: websocket")
    {
        serve_html(stream).await?;
        return Ok(());
    }

    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    log::info!("viewer connected: {}", addr);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let mut output_rx = server.output_tx.subscribe();
    let input_tx = server.input_tx.clone();

    let send_task = tokio::spawn(async move {
        loop {
            match output_rx.recv().await {
                Ok(data) => {
                    if ws_sender.send(Message::Binary(data)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
            }
        }
    });

    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                if let Some(key_event) = parse_key_event(&text) {
                    let _ = input_tx.send(key_event).await;
                }
            }
            Ok(Message::Close(_)) | Err(_) => break,
            _ => {}
        }
    }

    send_task.abort();
    log::info!("viewer disconnected: {}", addr);
    Ok(())
}

async fn serve_html(mut stream: TcpStream) -> std::io::Result<()> {
    use tokio::io::AsyncWriteExt;

    let html = include_str!("../../web/index.html");
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        html.len(),
        html
    );
    stream.write_all(response.as_bytes()).await
}

/// Browser key message: `{"key": "ArrowUp", "type": "keydown"}`.
/// `type` defaults to `keydown`.
#[derive(Debug, Deserialize)]
struct BrowserKey {
    key: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

/// Browsers send real key releases, so these events carry their kind.
fn parse_key_event(json: &str) -> Option<KeyEvent> {
    let msg: BrowserKey = serde_json::from_str(json).ok()?;

    let code = match msg.key.as_str() {
        "Enter" => KeyCode::Enter,
        "Escape" => KeyCode::Esc,
        "Backspace" => KeyCode::Backspace,
        "Tab" => KeyCode::Tab,
        "ArrowUp" | "Up" => KeyCode::Up,
        "ArrowDown" | "Down" => KeyCode::Down,
        "ArrowLeft" | "Left" => KeyCode::Left,
        "ArrowRight" | "Right" => KeyCode::Right,
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };
    let kind = match msg.kind.as_deref() {
        Some("keyup") => KeyEventKind::Release,
        _ => KeyEventKind::Press,
    };

    Some(KeyEvent {
        code,
        modifiers: KeyModifiers::empty(),
        kind,
        state: KeyEventState::empty(),
    })
}
