use crate::jsonrpc::{ErrorResponse, Notification, Request, Response};

/// Everything the bus client reports to its owner, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The broker accepted the component; requests may be sent from now on.
    Registered,
    /// The component left the broker; no more requests.
    Unregistered,
    /// The socket is gone.
    Disconnected,
    Request(Request),
    Notification(Notification),
    Result(Response),
    Error(ErrorResponse),
}

/// Hooks a bus component overrides. Every hook defaults to doing nothing.
pub trait RpcObserver {
    /// Subscribe to notifications here.
    fn on_registered(&mut self) {}

    fn on_unregistered(&mut self) {}

    fn on_disconnected(&mut self) {}

    /// Reply to a request this component sent earlier.
    fn on_result(&mut self, _response: &Response) {}

    fn on_error(&mut self, _error: &ErrorResponse) {}

    fn on_notification(&mut self, _notification: &Notification) {}

    fn on_request(&mut self, _request: &Request) {}

    /// Route one event to its hook. Each hook runs to completion before this returns.
    fn dispatch(&mut self, event: Event) {
        match event {
            Event::Registered => self.on_registered(),
            Event::Unregistered => self.on_unregistered(),
            Event::Disconnected => self.on_disconnected(),
            Event::Request(request) => self.on_request(&request),
            Event::Notification(notification) => self.on_notification(&notification),
            Event::Result(response) => self.on_result(&response),
            Event::Error(error) => self.on_error(&error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsonrpc::RequestId;
    use serde_json::Value;

    #[derive(Default)]
    struct Trace(Vec<&'static str>);

    impl RpcObserver for Trace {
        fn on_registered(&mut self) {
            self.0.push("registered");
        }

        fn on_request(&mut self, request: &Request) {
            assert_eq!(request.method, "A.b");
            self.0.push("request");
        }

        fn on_disconnected(&mut self) {
            self.0.push("disconnected");
        }
    }

    #[test]
    fn dispatch_routes_in_order_and_defaults_are_silent() {
        let mut trace = Trace::default();
        trace.dispatch(Event::Registered);
        trace.dispatch(Event::Request(Request {
            id: RequestId::Number(1.into()),
            method: "A.b".into(),
            params: Value::Null,
        }));
        trace.dispatch(Event::Unregistered);
        trace.dispatch(Event::Notification(Notification {
            method: "A.c".into(),
            params: Value::Null,
        }));
        trace.dispatch(Event::Disconnected);
        assert_eq!(trace.0, ["registered", "request", "disconnected"]);
    }
}
