use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use serde_json::json;
use std::cell::Cell;
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};
use tokio_tungstenite::tungstenite;

use crate::error::Error;
use crate::jsonrpc::{Incoming, Message, RequestId};
use crate::observer::Event;
use crate::Result;

type WSMessage = tokio_tungstenite::tungstenite::Message;
type WSStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

const REGISTER_COMPONENT: &str = "MB.registerComponent";
const UNREGISTER_COMPONENT: &str = "MB.unregisterComponent";
const SUBSCRIBE_TO: &str = "MB.subscribeTo";

/// Outbound half of the bus as seen by a component.
pub trait Transport {
    fn send(&self, message: Message) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct ConnectionMeta {
    pub url: String,
    pub component_name: String,
}

impl ConnectionMeta {
    pub fn new(url: &str, component_name: &str) -> Self {
        Self {
            url: url.to_string(),
            component_name: component_name.to_string(),
        }
    }
}

impl tungstenite::client::IntoClientRequest for &ConnectionMeta {
    fn into_client_request(self) -> tungstenite::Result<tungstenite::handshake::client::Request> {
        self.url.as_str().into_client_request()
    }
}

enum Command {
    Send(Message),
    Unregister(Message),
}

/// WebSocket connection to the message broker, owned by exactly one component.
pub struct Client {
    meta: ConnectionMeta,
    command_tx: Option<mpsc::UnboundedSender<Command>>,
    request_id: Cell<i64>,
}

impl Client {
    pub fn new(meta: ConnectionMeta) -> Self {
        Self {
            meta,
            command_tx: None,
            request_id: Cell::new(0),
        }
    }

    pub fn meta(&self) -> &ConnectionMeta {
        &self.meta
    }

    pub fn is_connected(&self) -> bool {
        self.command_tx.as_ref().is_some_and(|tx| !tx.is_closed())
    }

    /// Open the socket and register with the broker under `component_id`.
    ///
    /// Lifecycle changes and inbound messages arrive on the returned receiver.
    pub async fn connect(&mut self, component_id: i64) -> Result<mpsc::UnboundedReceiver<Event>> {
        if self.command_tx.is_some() {
            self.disconnect();
        }

        let (ws, _) = tokio_tungstenite::connect_async(&self.meta)
            .await
            .map_err(Error::Connect)?;
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        self.request_id.set(component_id);
        let registration_id = RequestId::from(component_id);
        let register = Message::request(
            registration_id.clone(),
            REGISTER_COMPONENT,
            Some(json!({ "componentName": self.meta.component_name })),
        );
        tokio::spawn(Self::background(
            ws,
            registration_id,
            register,
            command_rx,
            event_tx,
        ));
        self.command_tx = Some(command_tx);
        tracing::info!(url = %self.meta.url, component_id, "connecting to bus");
        Ok(event_rx)
    }

    /// Leave the broker and close the socket. No-op when not connected.
    pub fn disconnect(&mut self) {
        let Some(command_tx) = self.command_tx.take() else {
            return;
        };
        let unregister = Message::request(
            self.next_request_id(),
            UNREGISTER_COMPONENT,
            Some(json!({ "componentName": self.meta.component_name })),
        );
        if command_tx.send(Command::Unregister(unregister)).is_err() {
            tracing::debug!("background task already gone");
        }
    }

    /// Ask the broker to forward notifications named `property` to this component.
    pub fn subscribe_to(&self, property: &str) -> Result<()> {
        if self.command_tx.is_none() {
            return Err(Error::NotConnected);
        }
        let id = self.next_request_id();
        self.send(Message::request(
            id,
            SUBSCRIBE_TO,
            Some(json!({ "propertyName": property })),
        ))
    }

    fn next_request_id(&self) -> RequestId {
        let id = self.request_id.get() + 1;
        self.request_id.set(id);
        RequestId::from(id)
    }

    async fn background(
        ws: WSStream,
        registration_id: RequestId,
        register: Message,
        mut command_rx: mpsc::UnboundedReceiver<Command>,
        event_tx: mpsc::UnboundedSender<Event>,
    ) {
        let (mut ws_tx, mut ws_rx) = ws.split();

        if let Err(e) = Self::send_message(&mut ws_tx, &register).await {
            tracing::error!("register error: {e}");
            let _ = event_tx.send(Event::Disconnected);
            return;
        }

        loop {
            tokio::select! {
                command = command_rx.recv() => {
                    match command {
                        Some(Command::Send(message)) => {
                            if let Err(e) = Self::send_message(&mut ws_tx, &message).await {
                                tracing::error!("send message error: {e}");
                                break;
                            }
                        }
                        Some(Command::Unregister(message)) => {
                            if let Err(e) = Self::send_message(&mut ws_tx, &message).await {
                                tracing::warn!("unregister error: {e}");
                            }
                            let _ = event_tx.send(Event::Unregistered);
                            let _ = ws_tx.close().await;
                            break;
                        }
                        None => {
                            tracing::info!("client dropped, closing websocket");
                            let _ = ws_tx.close().await;
                            break;
                        }
                    }
                }
                msg = ws_rx.next() => {
                    let text = match msg {
                        Some(Ok(WSMessage::Text(text))) => text,
                        Some(Ok(WSMessage::Close(_))) | None => {
                            tracing::info!("websocket closed");
                            break;
                        }
                        Some(Ok(other)) => {
                            tracing::debug!("skipping non-text frame: {other:?}");
                            continue;
                        }
                        Some(Err(e)) => {
                            tracing::error!("websocket error: {e}");
                            break;
                        }
                    };
                    if let Some(event) = Self::handle_incoming(&text, &registration_id) {
                        if event_tx.send(event).is_err() {
                            tracing::info!("event receiver dropped, closing websocket");
                            let _ = ws_tx.close().await;
                            break;
                        }
                    }
                }
            }
        }

        tracing::info!("background task shutdown");
        let _ = event_tx.send(Event::Disconnected);
    }

    async fn send_message(
        sink: &mut SplitSink<WSStream, WSMessage>,
        message: &Message,
    ) -> Result<()> {
        let text = serde_json::to_string(message).map_err(Error::Encode)?;
        timeout(SEND_TIMEOUT, sink.send(WSMessage::Text(text.into()))).await??;
        Ok(())
    }

    fn handle_incoming(text: &str, registration_id: &RequestId) -> Option<Event> {
        match serde_json::from_str::<Incoming>(text) {
            Ok(Incoming::Response(response)) if &response.id == registration_id => {
                tracing::info!("registered on bus, broker replied {}", response.result);
                Some(Event::Registered)
            }
            Ok(Incoming::Response(response)) => Some(Event::Result(response)),
            Ok(Incoming::Error(error)) => Some(Event::Error(error)),
            Ok(Incoming::Request(request)) => Some(Event::Request(request)),
            Ok(Incoming::Notification(notification)) => Some(Event::Notification(notification)),
            Err(e) => {
                tracing::warn!("dropping undecodable message: {}", Error::Decode(e));
                None
            }
        }
    }
}

impl Transport for Client {
    fn send(&self, message: Message) -> Result<()> {
        self.command_tx
            .as_ref()
            .ok_or(Error::NotConnected)?
            .send(Command::Send(message))
            .map_err(|_| Error::ChannelSend)
    }
}
