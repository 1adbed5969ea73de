//! https://www.jsonrpc.org/specification
use serde_json::{Number, Value};

pub const VERSION: &str = "2.0";

/// An identifier established by the sender. It MUST contain a String, Number, or NULL value
/// and is echoed verbatim in the response.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum RequestId {
    Number(Number),
    String(String),
    Null,
}

impl From<i64> for RequestId {
    fn from(id: i64) -> Self {
        Self::Number(id.into())
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        Self::String(id.to_string())
    }
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Request {
    pub id: RequestId,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Notification {
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Response {
    pub id: RequestId,
    pub result: Value,
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    pub id: RequestId,
    pub error: ErrorObject,
}

#[serde_with::skip_serializing_none]
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
    pub data: Option<Value>,
}

/// Anything the bus can deliver. Variant order matters: a request is a notification with an id.
#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Incoming {
    Request(Request),
    Notification(Notification),
    Response(Response),
    Error(ErrorResponse),
}

/// Outbound envelope.
#[derive(serde::Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Message {
    Request {
        jsonrpc: &'static str,
        id: RequestId,
        method: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        params: Option<Value>,
    },
    Result {
        jsonrpc: &'static str,
        id: RequestId,
        result: Value,
    },
    Error {
        jsonrpc: &'static str,
        id: RequestId,
        error: ErrorObject,
    },
    Notification {
        jsonrpc: &'static str,
        method: String,
        params: Value,
    },
}

impl Message {
    pub fn request<S: Into<String>>(id: RequestId, method: S, params: Option<Value>) -> Self {
        Self::Request {
            jsonrpc: VERSION,
            id,
            method: method.into(),
            params,
        }
    }

    pub fn result(id: RequestId, result: Value) -> Self {
        Self::Result {
            jsonrpc: VERSION,
            id,
            result,
        }
    }

    pub fn error(id: RequestId, error: ErrorObject) -> Self {
        Self::Error {
            jsonrpc: VERSION,
            id,
            error,
        }
    }

    pub fn notification<S: Into<String>>(method: S, params: Value) -> Self {
        Self::Notification {
            jsonrpc: VERSION,
            method: method.into(),
            params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(text: &str) -> Incoming {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn classifies_inbound_messages() {
        assert_eq!(
            parse(r#"{"jsonrpc":"2.0","id":7,"method":"Navigation.IsReady"}"#),
            Incoming::Request(Request {
                id: RequestId::Number(7.into()),
                method: "Navigation.IsReady".into(),
                params: Value::Null,
            })
        );
        assert_eq!(
            parse(r#"{"jsonrpc":"2.0","method":"Navigation.OnStopStream","params":{"appID":1}}"#),
            Incoming::Notification(Notification {
                method: "Navigation.OnStopStream".into(),
                params: json!({"appID": 1}),
            })
        );
        assert_eq!(
            parse(r#"{"jsonrpc":"2.0","id":"abc","result":800}"#),
            Incoming::Response(Response {
                id: RequestId::String("abc".into()),
                result: json!(800),
            })
        );
        assert_eq!(
            parse(r#"{"jsonrpc":"2.0","id":null,"error":{"code":22,"message":"boom"}}"#),
            Incoming::Error(ErrorResponse {
                id: RequestId::Null,
                error: ErrorObject {
                    code: 22,
                    message: "boom".into(),
                    data: None,
                },
            })
        );
    }

    #[test]
    fn any_json_number_is_a_request_id() {
        for (text, id) in [
            (
                r#"{"jsonrpc":"2.0","id":1.5,"method":"Navigation.IsReady"}"#,
                json!(1.5),
            ),
            (
                r#"{"jsonrpc":"2.0","id":18446744073709551615,"method":"Navigation.StartStream"}"#,
                json!(u64::MAX),
            ),
            (
                r#"{"jsonrpc":"2.0","id":-3,"method":"Navigation.StopStream"}"#,
                json!(-3),
            ),
        ] {
            match parse(text) {
                Incoming::Request(request) => {
                    assert_eq!(serde_json::to_value(&request.id).unwrap(), id);
                    let reply = Message::result(request.id, Value::Null);
                    assert_eq!(serde_json::to_value(reply).unwrap()["id"], id);
                }
                other => panic!("{text} classified as {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_garbage() {
        assert!(serde_json::from_str::<Incoming>(r#"{"jsonrpc":"2.0"}"#).is_err());
        assert!(serde_json::from_str::<Incoming>(r#"{"id":1,"method":5}"#).is_err());
    }

    #[test]
    fn notification_has_no_id() {
        let value = serde_json::to_value(Message::notification(
            "Navigation.OnTBTClientState",
            json!({"state": "ROUTE_ACCEPTED"}),
        ))
        .unwrap();
        assert_eq!(
            value,
            json!({
                "jsonrpc": "2.0",
                "method": "Navigation.OnTBTClientState",
                "params": {"state": "ROUTE_ACCEPTED"}
            })
        );
    }

    #[test]
    fn request_without_params_omits_field() {
        let value =
            serde_json::to_value(Message::request(RequestId::Number(1.into()), "MB.ping", None)).unwrap();
        assert_eq!(value, json!({"jsonrpc": "2.0", "id": 1, "method": "MB.ping"}));
    }

    #[test]
    fn error_data_is_optional() {
        let error = ErrorObject {
            code: 4,
            message: "rejected".into(),
            data: None,
        };
        let value = serde_json::to_value(Message::error("x".into(), error)).unwrap();
        assert_eq!(
            value,
            json!({"jsonrpc": "2.0", "id": "x", "error": {"code": 4, "message": "rejected"}})
        );
    }
}
