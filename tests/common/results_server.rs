use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use arbitre_live::channel::ChannelEndpoint;
use axum::{
    Router,
    extract::{
        Path, Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
    routing::any,
};
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};

/// What the test wants the server to do on one connection.
#[derive(Debug)]
pub enum ServerAction {
    Text(String),
    /// Close handshake.
    Close,
    /// Drop the connection without a close frame.
    Abort,
}

#[derive(Debug, Clone)]
pub struct ConnectionRecord {
    pub path: String,
    pub token: Option<String>,
    pub closed: bool,
}

#[derive(Default)]
struct Inner {
    connections: Vec<ConnectionRecord>,
    senders: Vec<UnboundedSender<ServerAction>>,
}

#[derive(Clone, Default)]
struct ServerState {
    inner: Arc<Mutex<Inner>>,
}

impl ServerState {
    fn register(
        &self,
        path: String,
        token: Option<String>,
        tx: UnboundedSender<ServerAction>,
    ) -> usize {
        let mut inner = self.inner.lock().unwrap();
        inner.connections.push(ConnectionRecord {
            path,
            token,
            closed: false,
        });
        inner.senders.push(tx);
        inner.connections.len() - 1
    }

    fn mark_closed(&self, index: usize) {
        self.inner.lock().unwrap().connections[index].closed = true;
    }
}

/// In-process submission channel server.
pub struct ResultsServer {
    pub addr: SocketAddr,
    state: ServerState,
}

impl ResultsServer {
    pub async fn start() -> Self {
        let state = ServerState::default();
        let app = Router::new()
            .route("/ws/submission/{exercise_id}", any(own_handler))
            .route("/ws/submission/{exercise_id}/{user_id}", any(user_handler))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server");
        let addr = listener.local_addr().expect("Missing local address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });

        Self { addr, state }
    }

    pub fn endpoint(&self) -> ChannelEndpoint {
        ChannelEndpoint::new(self.addr.to_string(), false)
    }

    pub fn connections(&self) -> Vec<ConnectionRecord> {
        self.state.inner.lock().unwrap().connections.clone()
    }

    pub fn connection_count(&self) -> usize {
        self.state.inner.lock().unwrap().connections.len()
    }

    pub fn closed_count(&self) -> usize {
        self.connections().iter().filter(|c| c.closed).count()
    }

    /// Sends an action to connection `index`. Ignored if that connection is gone.
    pub fn act(&self, index: usize, action: ServerAction) {
        let inner = self.state.inner.lock().unwrap();
        let _ = inner.senders[index].send(action);
    }

    pub fn send_text(&self, index: usize, text: impl Into<String>) {
        self.act(index, ServerAction::Text(text.into()));
    }
}

async fn own_handler(
    ws: WebSocketUpgrade,
    Path(exercise_id): Path<i64>,
    Query(query): Query<HashMap<String, String>>,
    State(state): State<ServerState>,
) -> impl IntoResponse {
    let path = format!("/ws/submission/{exercise_id}");
    let token = query.get("token").cloned();
    ws.on_upgrade(move |socket| handle_socket(socket, state, path, token))
}

async fn user_handler(
    ws: WebSocketUpgrade,
    Path((exercise_id, user_id)): Path<(i64, i64)>,
    Query(query): Query<HashMap<String, String>>,
    State(state): State<ServerState>,
) -> impl IntoResponse {
    let path = format!("/ws/submission/{exercise_id}/{user_id}");
    let token = query.get("token").cloned();
    ws.on_upgrade(move |socket| handle_socket(socket, state, path, token))
}

async fn handle_socket(
    mut socket: WebSocket,
    state: ServerState,
    path: String,
    token: Option<String>,
) {
    let (tx, mut rx) = unbounded_channel();
    let index = state.register(path, token, tx);

    loop {
        tokio::select! {
            action = rx.recv() => match action {
                Some(ServerAction::Text(text)) => {
                    if socket.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Some(ServerAction::Close) => {
                    let _ = socket.send(Message::Close(None)).await;
                }
                Some(ServerAction::Abort) | None => {
                    state.mark_closed(index);
                    return;
                }
            },
            message = socket.recv() => match message {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }
    state.mark_closed(index);
}
