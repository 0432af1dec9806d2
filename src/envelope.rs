//! Backend envelope unwrapping.
//!
//! Every backend response arrives as
//! `{"headers": {"responseCode", "customerMessage"}, "body": {"data"}}`.
//! Services call [`unwrap`] instead of digging into that shape themselves.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::http::{ApiError, ApiResponse, ApiResult};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeHeaders {
    #[serde(default)]
    pub response_code: Option<i64>,
    #[serde(default)]
    pub customer_message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EnvelopeBody {
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub headers: EnvelopeHeaders,
    #[serde(default)]
    pub body: Option<EnvelopeBody>,
}

impl Envelope {
    fn parse(raw: Value, status: u16) -> Result<Self, ApiError> {
        if raw.is_null() || raw.as_str() == Some("") {
            return Ok(Self::default());
        }
        serde_json::from_value(raw).map_err(|e| ApiError::Decode {
            status,
            message: e.to_string(),
        })
    }
}

/// Unwrap `body.data` into `T`.
///
/// A transport-level success whose `headers.responseCode` is not 2xx is turned
/// into [`ApiError::Server`] carrying the customer message.
pub fn unwrap<T: DeserializeOwned>(result: ApiResult) -> ApiResult<T> {
    unwrap_with_message(result).map(|(response, _)| response)
}

/// Like [`unwrap`], also returning the backend's customer message
pub fn unwrap_with_message<T: DeserializeOwned>(
    result: ApiResult,
) -> Result<(ApiResponse<T>, Option<String>), ApiError> {
    let response = result?;
    let status = response.status_code;
    let envelope = Envelope::parse(response.data, status)?;

    if let Some(code) = envelope.headers.response_code {
        if !(200..300).contains(&code) {
            let status = u16::try_from(code).unwrap_or(status);
            let message = envelope
                .headers
                .customer_message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| format!("HTTP {} error", status));
            return Err(ApiError::Server { status, message });
        }
    }

    let raw = envelope.body.map(|b| b.data).unwrap_or(Value::Null);
    let data = serde_json::from_value(raw).map_err(|e| ApiError::Decode {
        status,
        message: e.to_string(),
    })?;

    Ok((
        ApiResponse {
            data,
            status_code: status,
        },
        envelope.headers.customer_message,
    ))
}
