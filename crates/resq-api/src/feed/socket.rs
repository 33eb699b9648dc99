//! Live feed socket handler
//!
//! Lifecycle: `hello`, then the client must `identify` before anything but a
//! heartbeat. After `ready`, three tasks run until the first one ends:
//! the receive loop, the sender, and the feed renderer.

use std::time::Duration;

use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{
    stream::{SplitSink, SplitStream},
    SinkExt, StreamExt,
};
use resq_core::{AdminSession, AlertView};
use resq_service::dto::AdminResponse;
use resq_service::{AlertFeed, FeedState, SessionGuard};
use tokio::sync::{mpsc, watch};
use tokio::time::timeout;

use super::protocol::{ClientFrame, CloseCode, ServerFrame, SnapshotPayload};
use crate::state::AppState;

/// Heartbeat interval advertised in `hello`
pub const HEARTBEAT_INTERVAL_MS: u64 = 45_000;

/// Silence after which the socket is closed
pub const HEARTBEAT_TIMEOUT_MS: u64 = 90_000;

const MESSAGE_BUFFER_SIZE: usize = 32;

const FEED_FAILED: &str = "FEED_FAILED";

type WsSink = SplitSink<WebSocket, Message>;
type WsStream = SplitStream<WebSocket>;

enum Outgoing {
    Frame(ServerFrame),
    Close(CloseCode),
}

/// GET /api/v1/feed
pub async fn feed_handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

async fn handle_socket(state: AppState, socket: WebSocket) {
    let (mut ws_sink, mut ws_stream) = socket.split();

    let hello = ServerFrame::Hello {
        heartbeat_interval: HEARTBEAT_INTERVAL_MS,
    };
    if !send_frame(&mut ws_sink, &hello).await {
        tracing::debug!("Failed to send hello; client gone");
        return;
    }

    let admin = match identify(&state, &mut ws_sink, &mut ws_stream).await {
        Ok(admin) => admin,
        Err(Some(code)) => {
            close_with(&mut ws_sink, code).await;
            return;
        }
        Err(None) => return,
    };

    let ready = ServerFrame::Ready {
        admin: AdminResponse::from(&admin),
    };
    if !send_frame(&mut ws_sink, &ready).await {
        return;
    }

    tracing::info!(admin = %admin.uid, "Live feed opened");

    let (tx, rx) = mpsc::channel::<Outgoing>(MESSAGE_BUFFER_SIZE);
    let (view_tx, view_rx) = watch::channel(AlertView::default());

    let mut send_task = tokio::spawn(send_loop(ws_sink, rx));
    let mut recv_task = tokio::spawn(recv_loop(ws_stream, tx.clone(), view_tx));
    let mut feed_task = tokio::spawn(feed_loop(state, tx, view_rx));

    tokio::select! {
        result = &mut recv_task => {
            if let Ok(Some(code)) = result {
                tracing::debug!(admin = %admin.uid, close_code = %code, "Receive loop ended");
            }
            // Let the sender flush the close frame queued by the receive loop
            feed_task.abort();
            let _ = timeout(Duration::from_secs(1), &mut send_task).await;
        }
        _ = &mut send_task => {
            tracing::debug!(admin = %admin.uid, "Send loop ended");
        }
        _ = &mut feed_task => {
            let _ = timeout(Duration::from_secs(1), &mut send_task).await;
        }
    }

    recv_task.abort();
    send_task.abort();
    feed_task.abort();

    tracing::info!(admin = %admin.uid, "Live feed closed");
}

/// Wait for `identify` and run it through the session guard
///
/// `Err(None)` means the client went away without a reason to report.
async fn identify(
    state: &AppState,
    ws_sink: &mut WsSink,
    ws_stream: &mut WsStream,
) -> Result<AdminSession, Option<CloseCode>> {
    loop {
        let frame = match next_frame(ws_stream).await? {
            Some(frame) => frame,
            None => continue,
        };

        match frame {
            ClientFrame::Heartbeat => {
                if !send_frame(ws_sink, &ServerFrame::HeartbeatAck).await {
                    return Err(None);
                }
            }
            ClientFrame::View(_) => return Err(Some(CloseCode::NotAuthenticated)),
            ClientFrame::Identify { token } => {
                return SessionGuard::new(state.service_context())
                    .authenticate(&token)
                    .await
                    .map_err(|e| {
                        tracing::warn!(error = %e, "Live feed identify rejected");
                        if e.is_access_denied() {
                            Some(CloseCode::AccessDenied)
                        } else {
                            Some(CloseCode::AuthenticationFailed)
                        }
                    });
            }
        }
    }
}

/// Next client frame, bounded by the heartbeat timeout
///
/// `Ok(None)` is a control frame with nothing to act on.
async fn next_frame(ws_stream: &mut WsStream) -> Result<Option<ClientFrame>, Option<CloseCode>> {
    let next = timeout(Duration::from_millis(HEARTBEAT_TIMEOUT_MS), ws_stream.next())
        .await
        .map_err(|_| {
            tracing::warn!("Live feed timed out (no heartbeat)");
            Some(CloseCode::SessionTimeout)
        })?;

    match next {
        None | Some(Ok(Message::Close(_))) => Err(None),
        Some(Ok(Message::Text(text))) => ClientFrame::from_json(&text).map(Some).map_err(|e| {
            tracing::debug!(error = %e, "Failed to parse client frame");
            Some(CloseCode::DecodeError)
        }),
        Some(Ok(Message::Binary(_))) => Err(Some(CloseCode::DecodeError)),
        Some(Ok(Message::Ping(_) | Message::Pong(_))) => Ok(None),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "WebSocket error");
            Err(Some(CloseCode::UnknownError))
        }
    }
}

async fn recv_loop(
    mut ws_stream: WsStream,
    tx: mpsc::Sender<Outgoing>,
    view_tx: watch::Sender<AlertView>,
) -> Option<CloseCode> {
    loop {
        let frame = match next_frame(&mut ws_stream).await {
            Ok(Some(frame)) => frame,
            Ok(None) => continue,
            Err(code) => {
                if let Some(code) = code {
                    let _ = tx.send(Outgoing::Close(code)).await;
                }
                return code;
            }
        };

        match frame {
            ClientFrame::Heartbeat => {
                if tx.send(Outgoing::Frame(ServerFrame::HeartbeatAck)).await.is_err() {
                    return None;
                }
            }
            ClientFrame::View(view) => {
                tracing::debug!(status = %view.status, sort = %view.sort, "View changed");
                view_tx.send_replace(view);
            }
            ClientFrame::Identify { .. } => {
                let code = CloseCode::AlreadyAuthenticated;
                let _ = tx.send(Outgoing::Close(code)).await;
                return Some(code);
            }
        }
    }
}

async fn send_loop(mut ws_sink: WsSink, mut rx: mpsc::Receiver<Outgoing>) {
    while let Some(out) = rx.recv().await {
        match out {
            Outgoing::Frame(frame) => {
                if !send_frame(&mut ws_sink, &frame).await {
                    tracing::warn!("Failed to send frame to WebSocket");
                    break;
                }
            }
            Outgoing::Close(code) => {
                close_with(&mut ws_sink, code).await;
                return;
            }
        }
    }

    let _ = ws_sink.close().await;
}

/// Render the feed through the current view until it fails or the socket goes
async fn feed_loop(
    state: AppState,
    tx: mpsc::Sender<Outgoing>,
    mut view_rx: watch::Receiver<AlertView>,
) {
    let mut feed = AlertFeed::from_context(state.service_context()).spawn();
    let mut view = view_rx.borrow_and_update().clone();
    let mut current = feed.current();

    loop {
        match &current {
            FeedState::Loading => {}
            FeedState::Ready(snapshot) => {
                let frame = ServerFrame::Snapshot(SnapshotPayload::render(snapshot, &view));
                if tx.send(Outgoing::Frame(frame)).await.is_err() {
                    return;
                }
            }
            FeedState::Failed(failure) => {
                tracing::warn!(
                    message = %failure.message,
                    connection_lost = failure.connection_lost,
                    "Live feed failed"
                );
                let _ = tx
                    .send(Outgoing::Frame(ServerFrame::error(
                        FEED_FAILED,
                        failure.message.clone(),
                    )))
                    .await;
                let _ = tx.send(Outgoing::Close(CloseCode::FeedFailed)).await;
                return;
            }
        }

        tokio::select! {
            next = feed.changed() => match next {
                Some(next_state) => current = next_state,
                None => return,
            },
            changed = view_rx.changed() => {
                if changed.is_err() {
                    return;
                }
                view = view_rx.borrow_and_update().clone();
            }
        }
    }
}

async fn send_frame(ws_sink: &mut WsSink, frame: &ServerFrame) -> bool {
    match frame.to_json() {
        Ok(json) => ws_sink.send(Message::Text(json)).await.is_ok(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode server frame");
            true
        }
    }
}

async fn close_with(ws_sink: &mut WsSink, code: CloseCode) {
    let frame = CloseFrame {
        code: code.as_u16(),
        reason: code.description().into(),
    };
    let _ = ws_sink.send(Message::Close(Some(frame))).await;
}
