mod client;
mod error;
pub mod jsonrpc;
mod model;
mod navigation;
mod observer;
mod result_code;

pub use client::{Client, ConnectionMeta, Transport};
pub use error::Error;
pub use model::NavigationModel;
pub use navigation::{
    Navigation, NavigationMethod, TbtState, COMPONENT_ID, COMPONENT_NAME, STOP_STREAM_NOTIFICATION,
};
pub use observer::{Event, RpcObserver};
pub use result_code::ResultCode;

pub type Result<T> = std::result::Result<T, Error>;
