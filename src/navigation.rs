//! Navigation component endpoint.
//!
//! Answers the `Navigation.*` requests the core sends to the HMI by delegating to a
//! [`NavigationModel`], and reports turn-by-turn client state back to the core.
use serde_json::{json, Value};
use tokio::sync::mpsc;

use crate::client::{Client, Transport};
use crate::jsonrpc::{
    ErrorObject, ErrorResponse, Message, Notification, Request, RequestId, Response,
};
use crate::model::NavigationModel;
use crate::observer::{Event, RpcObserver};
use crate::result_code::ResultCode;
use crate::Result;

/// Identifier of the Navigation component on the bus.
pub const COMPONENT_ID: i64 = 800;
pub const COMPONENT_NAME: &str = "Navigation";
/// Notification asking the HMI to tear down the video stream.
pub const STOP_STREAM_NOTIFICATION: &str = "Navigation.OnStopStream";

const ALERT: &str = "Navigation.Alert";
const ON_TBT_CLIENT_STATE: &str = "Navigation.OnTBTClientState";

/// Requests the Navigation component answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMethod {
    IsReady,
    ShowConstantTbt,
    UpdateTurnList,
    AlertManeuver,
    StartStream,
    StopStream,
}

impl NavigationMethod {
    pub fn new(method: &str) -> Option<Self> {
        match method {
            "Navigation.IsReady" => Some(Self::IsReady),
            "Navigation.ShowConstantTBT" => Some(Self::ShowConstantTbt),
            "Navigation.UpdateTurnList" => Some(Self::UpdateTurnList),
            "Navigation.AlertManeuver" => Some(Self::AlertManeuver),
            "Navigation.StartStream" => Some(Self::StartStream),
            "Navigation.StopStream" => Some(Self::StopStream),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::IsReady => "Navigation.IsReady",
            Self::ShowConstantTbt => "Navigation.ShowConstantTBT",
            Self::UpdateTurnList => "Navigation.UpdateTurnList",
            Self::AlertManeuver => "Navigation.AlertManeuver",
            Self::StartStream => "Navigation.StartStream",
            Self::StopStream => "Navigation.StopStream",
        }
    }

    /// Model operation backing this method. `IsReady` is answered from the endpoint itself.
    fn handler<M: NavigationModel>(self) -> Option<fn(&mut M, &Value)> {
        match self {
            Self::IsReady => None,
            Self::ShowConstantTbt => Some(M::tbt_activate),
            Self::UpdateTurnList => Some(M::tbt_turn_list_update),
            Self::AlertManeuver => Some(M::on_navigation_alert_maneuver),
            Self::StartStream => Some(M::start_stream),
            Self::StopStream => Some(M::stop_stream),
        }
    }
}

/// State of the turn-by-turn client reported with `Navigation.OnTBTClientState`.
#[derive(serde::Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TbtState {
    RouteUpdateRequest,
    RouteAccepted,
    RouteRefused,
    RouteCancelled,
    EtaRequest,
    NextTurnRequest,
    RouteStatusRequest,
    RouteSummaryRequest,
    TripStatusRequest,
    RouteUpdateRequestTimeout,
}

type Validator = Box<dyn Fn(&Request) -> bool + Send>;

pub struct Navigation<M, T = Client> {
    model: M,
    transport: T,
    is_ready: bool,
    // reserved: not read from or checked against requests yet
    app_id: i64,
    validator: Validator,
}

impl<M: NavigationModel, T: Transport> Navigation<M, T> {
    pub fn new(model: M, transport: T) -> Self {
        Self {
            model,
            transport,
            is_ready: false,
            app_id: 1,
            validator: Box::new(|_| true),
        }
    }

    /// Requests failing `validator` are dropped without a reply.
    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Request) -> bool + Send + 'static,
    {
        self.validator = Box::new(validator);
        self
    }

    pub fn is_ready(&self) -> bool {
        self.is_ready
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.is_ready = ready;
    }

    pub fn app_id(&self) -> i64 {
        self.app_id
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send an error reply, unless `result_code` is `SUCCESS`, in which case nothing is sent.
    pub fn send_error(&self, result_code: ResultCode, id: RequestId, method: &str, message: &str) {
        tracing::info!(method, ?result_code, "error response");
        if result_code.is_success() {
            return;
        }
        self.send(Message::error(
            id,
            ErrorObject {
                code: result_code.code(),
                message: message.to_string(),
                data: Some(json!({ "method": method })),
            },
        ));
    }

    /// Send a plain result reply. Only `SUCCESS` produces traffic: any other code is dropped
    /// and the peer never learns the request failed.
    pub fn send_navigation_result(&self, result_code: ResultCode, id: RequestId, method: &str) {
        tracing::info!(method, ?result_code, "navigation response");
        if !result_code.is_success() {
            return;
        }
        self.send(Message::result(
            id,
            json!({ "code": result_code, "method": method }),
        ));
    }

    /// Reply to a `Navigation.Alert` request. Same `SUCCESS`-only rule as
    /// [`send_navigation_result`](Self::send_navigation_result).
    pub fn alert_response(&self, result_code: ResultCode, id: RequestId) {
        tracing::info!(?result_code, "alert response");
        if !result_code.is_success() {
            return;
        }
        self.send(Message::result(
            id,
            json!({ "code": result_code, "method": ALERT }),
        ));
    }

    /// Tell the core the turn-by-turn client changed state.
    ///
    /// `app_id` is accepted but not put on the wire.
    pub fn on_tbt_client_state(&self, state: TbtState, app_id: i64) {
        tracing::info!(?state, app_id, "tbt client state");
        self.send(Message::notification(
            ON_TBT_CLIENT_STATE,
            json!({ "state": state }),
        ));
    }

    fn send_is_ready(&self, id: RequestId) {
        tracing::info!(available = self.is_ready, "is ready response");
        self.send(Message::result(
            id,
            json!({
                "available": self.is_ready,
                "code": ResultCode::Success,
                "method": NavigationMethod::IsReady.as_str(),
            }),
        ));
    }

    fn send(&self, message: Message) {
        if let Err(e) = self.transport.send(message) {
            tracing::warn!("dropping outbound message: {e}");
        }
    }
}

impl<M: NavigationModel> Navigation<M, Client> {
    /// Join the bus as [`COMPONENT_ID`]. Feed the returned events to [`run`](Self::run) or
    /// [`dispatch`](RpcObserver::dispatch).
    pub async fn connect(&mut self) -> Result<mpsc::UnboundedReceiver<Event>> {
        self.transport.connect(COMPONENT_ID).await
    }

    pub fn disconnect(&mut self) {
        self.transport.disconnect();
    }

    /// Ask the broker to deliver the `property` notification, e.g. [`STOP_STREAM_NOTIFICATION`].
    /// Call it once [`Event::Registered`] has been seen.
    pub fn subscribe_to(&self, property: &str) -> Result<()> {
        self.transport.subscribe_to(property)
    }

    /// Handle events one at a time until the connection is gone.
    pub async fn run(&mut self, mut events: mpsc::UnboundedReceiver<Event>) {
        while let Some(event) = events.recv().await {
            let disconnected = event == Event::Disconnected;
            self.dispatch(event);
            if disconnected {
                break;
            }
        }
    }
}

impl<M: NavigationModel, T: Transport> RpcObserver for Navigation<M, T> {
    fn on_registered(&mut self) {
        tracing::info!("navigation registered");
    }

    fn on_unregistered(&mut self) {
        tracing::info!("navigation unregistered");
    }

    // `is_ready` is owned by whoever calls `set_ready`; losing the socket leaves it alone.
    fn on_disconnected(&mut self) {
        tracing::info!("navigation disconnected");
    }

    fn on_result(&mut self, response: &Response) {
        tracing::info!(id = ?response.id, "rpc result");
    }

    fn on_error(&mut self, error: &ErrorResponse) {
        tracing::info!(id = ?error.id, code = error.error.code, "rpc error");
    }

    fn on_notification(&mut self, notification: &Notification) {
        tracing::info!(method = %notification.method, "rpc notification");
        if notification.method == STOP_STREAM_NOTIFICATION {
            self.model.on_stop_stream(&notification.params);
        }
    }

    fn on_request(&mut self, request: &Request) {
        tracing::info!(method = %request.method, "rpc request");
        if !(self.validator)(request) {
            return;
        }
        let Some(method) = NavigationMethod::new(&request.method) else {
            tracing::debug!(method = %request.method, "ignoring unsupported request");
            return;
        };

        match method.handler::<M>() {
            None => self.send_is_ready(request.id.clone()),
            Some(handler) => {
                handler(&mut self.model, &request.params);
                // The model cannot report failure, so the reply is always SUCCESS.
                self.send_navigation_result(
                    ResultCode::Success,
                    request.id.clone(),
                    method.as_str(),
                );
            }
        }
    }
}
