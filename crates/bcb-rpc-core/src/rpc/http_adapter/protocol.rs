use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::value::RawValue;

use crate::error::{ResponseError, RpcError};

/// Request `id` sent with every call. Responses are correlated by the HTTP
/// exchange, never by this value.
pub const REQUEST_ID: &str = "jsonrpc-client";

/// Content type expected by BCB nodes (not `application/json`).
pub const CONTENT_TYPE: &str = "text/json";

#[derive(Serialize)]
pub(super) struct JsonRpcRequest<'a> {
    pub(super) jsonrpc: &'static str,
    pub(super) id: &'static str,
    pub(super) method: &'a str,
    pub(super) params: serde_json::Map<String, serde_json::Value>,
}

#[derive(serde::Deserialize)]
pub(super) struct JsonRpcResponse {
    #[serde(default)]
    pub(super) result: Option<Box<RawValue>>,
    #[serde(default)]
    pub(super) error: Option<serde_json::Value>,
}

/// Serialize a named-parameter request envelope.
///
/// `params` must serialize to a JSON object; anything else (or a value serde
/// cannot encode) is a `MarshalRequest` error.
pub(super) fn encode_request<P>(method: &str, params: &P) -> Result<Vec<u8>, RpcError>
where
    P: Serialize + ?Sized,
{
    let marshal_err = |source: serde_json::Error| RpcError::MarshalRequest {
        method: method.to_owned(),
        source,
    };

    let params = match serde_json::to_value(params).map_err(marshal_err)? {
        serde_json::Value::Object(map) => map,
        other => {
            return Err(marshal_err(serde::ser::Error::custom(format!(
                "params must be a JSON object of named parameters, got {}",
                json_type_name(&other)
            ))));
        }
    };

    let request = JsonRpcRequest {
        jsonrpc: "2.0",
        id: REQUEST_ID,
        method,
        params,
    };
    serde_json::to_vec(&request).map_err(marshal_err)
}

/// Decode a response envelope and then its `result` into `T`.
///
/// A non-null `error` wins over any `result`. An absent `result` decodes as
/// JSON `null`.
pub(super) fn decode_response<T>(status: u16, body: &[u8]) -> Result<T, RpcError>
where
    T: DeserializeOwned,
{
    let envelope: JsonRpcResponse =
        serde_json::from_slice(body).map_err(|source| RpcError::DecodeEnvelope {
            status,
            body: String::from_utf8_lossy(body).into_owned(),
            source,
        })?;

    if let Some(err) = envelope.error {
        return Err(RpcError::Remote(ResponseError::from_value(err)));
    }

    let raw = envelope.result.as_deref().map_or("null", RawValue::get);
    serde_json::from_str(raw).map_err(RpcError::DecodeResult)
}

/// Request body as logged: credential-bearing params are masked.
pub(super) fn redacted_request(body: &[u8]) -> String {
    let Ok(mut request) = serde_json::from_slice::<serde_json::Value>(body) else {
        return String::from_utf8_lossy(body).into_owned();
    };
    if let Some(params) = request.get_mut("params").and_then(|p| p.as_object_mut()) {
        for key in REDACTED_PARAMS {
            if let Some(value) = params.get_mut(*key) {
                *value = serde_json::Value::from("<redacted>");
            }
        }
    }
    request.to_string()
}

const REDACTED_PARAMS: &[&str] = &["accessKey"];

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
