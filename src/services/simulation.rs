use serde_json::Value;

use crate::error::{ApiError, AUDIT_FALLBACK_MESSAGE, NETWORK_UNAVAILABLE_MESSAGE, REJECTED_FALLBACK_MESSAGE};
use crate::models::{AuditStatus, RawPayload, SimulationRequest};

/// HTTP client for the loan simulation service. One attempt per call, no
/// retries; the caller decides whether to resubmit.
#[derive(Clone)]
pub struct SimulationClient {
    http: reqwest::Client,
    base_url: String,
}

impl SimulationClient {
    pub fn new(base_url: &str) -> Self {
        SimulationClient {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn submit(&self, request: &SimulationRequest) -> Result<RawPayload, ApiError> {
        let url = format!("{}/api/simulate", self.base_url);
        tracing::debug!(%url, amount = request.amount, rate = request.rate, months = request.months, "submitting simulation");

        let response = self.http.post(&url).json(request).send().await.map_err(|err| {
            tracing::warn!(error = %err, "simulation service unreachable");
            ApiError::NetworkUnavailable
        })?;

        let status = response.status();
        let body = read_json_body(response).await;

        if !status.is_success() {
            let detail = error_detail(&body).unwrap_or_else(|| REJECTED_FALLBACK_MESSAGE.to_string());
            tracing::warn!(status = status.as_u16(), %detail, "simulation rejected");
            return Err(ApiError::ServerRejected {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(unwrap_envelope(body))
    }

    pub async fn fetch_audit_status(&self, simulation_id: &str) -> Result<AuditStatus, ApiError> {
        let url = format!("{}/api/simulations/{}", self.base_url, simulation_id);
        tracing::debug!(%url, "fetching audit status");

        let response = self.http.get(&url).send().await.map_err(|err| {
            tracing::warn!(error = %err, "audit status unreachable");
            ApiError::AuditFetchFailed {
                status: None,
                detail: NETWORK_UNAVAILABLE_MESSAGE.to_string(),
            }
        })?;

        let status = response.status();
        let body = read_json_body(response).await;

        if !status.is_success() {
            return Err(ApiError::AuditFetchFailed {
                status: Some(status.as_u16()),
                detail: error_detail(&body).unwrap_or_else(|| AUDIT_FALLBACK_MESSAGE.to_string()),
            });
        }

        // A malformed body reads as an unknown status rather than a failure.
        Ok(serde_json::from_value(body).unwrap_or_default())
    }
}

async fn read_json_body(response: reqwest::Response) -> Value {
    match response.bytes().await {
        Ok(bytes) if !bytes.is_empty() => serde_json::from_slice(&bytes).unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

fn error_detail(body: &Value) -> Option<String> {
    match body.get("detail") {
        Some(Value::String(detail)) if !detail.is_empty() => return Some(detail.clone()),
        // Validation errors arrive as a list of `{loc, msg, type}` entries.
        Some(Value::Array(entries)) => {
            let messages: Vec<&str> = entries
                .iter()
                .filter_map(|entry| entry.get("msg").and_then(Value::as_str))
                .collect();
            if !messages.is_empty() {
                return Some(messages.join("; "));
            }
        }
        _ => {}
    }
    body.get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

fn unwrap_envelope(body: Value) -> RawPayload {
    let simulation_id = match body.get("simulation_id") {
        Some(Value::Number(id)) => Some(id.to_string()),
        Some(Value::String(id)) if !id.is_empty() => Some(id.clone()),
        _ => None,
    };
    let data = match body {
        Value::Object(mut fields) => match fields.remove("data") {
            Some(data) if !data.is_null() => data,
            Some(_) | None => Value::Object(fields),
        },
        other => other,
    };
    RawPayload { simulation_id, data }
}
