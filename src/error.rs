#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Decode error {0}")]
    Decode(serde_json::Error),
    #[error("Encode error {0}")]
    Encode(serde_json::Error),
    #[error("Connect error {0}")]
    Connect(tokio_tungstenite::tungstenite::error::Error),
    #[error("Not connected to the bus")]
    NotConnected,
    #[error("Message send error")]
    ChannelSend,
    #[error("Send timed out")]
    Timeout(#[from] tokio::time::error::Elapsed),
    #[error("Websocket error {0}")]
    Websocket(#[from] tokio_tungstenite::tungstenite::Error),
}
