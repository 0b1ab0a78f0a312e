use serde_json::{Map, Value};

use crate::models::{ScheduleRow, SimulationResult};

/// The two success shapes the simulation service has used over time.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationPayload {
    /// `[monthly_payment, total_paid, total_interest, schedule]`
    Sequence([Value; 4]),
    /// `{monthly_payment, total_paid, total_interest, schedule}`
    Object(Map<String, Value>),
}

impl From<Value> for SimulationPayload {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) if items.len() == 4 => match <[Value; 4]>::try_from(items) {
                Ok(fields) => SimulationPayload::Sequence(fields),
                Err(_) => SimulationPayload::Object(Map::new()),
            },
            Value::Object(fields) => SimulationPayload::Object(fields),
            _ => SimulationPayload::Object(Map::new()),
        }
    }
}

impl SimulationPayload {
    pub fn into_result(self) -> SimulationResult {
        match self {
            SimulationPayload::Sequence([monthly_payment, total_paid, total_interest, schedule]) => {
                SimulationResult {
                    monthly_payment: monthly_payment.as_f64(),
                    total_paid: total_paid.as_f64(),
                    total_interest: total_interest.as_f64(),
                    schedule: schedule_rows(schedule),
                }
            }
            SimulationPayload::Object(mut fields) => SimulationResult {
                monthly_payment: fields.get("monthly_payment").and_then(Value::as_f64),
                total_paid: fields.get("total_paid").and_then(Value::as_f64),
                total_interest: fields.get("total_interest").and_then(Value::as_f64),
                schedule: schedule_rows(fields.remove("schedule").unwrap_or(Value::Null)),
            },
        }
    }
}

/// Reduces either accepted payload shape to the canonical result. An empty
/// schedule is returned as is; deciding that it is a failure is up to the caller.
pub fn normalize(payload: Value) -> SimulationResult {
    SimulationPayload::from(payload).into_result()
}

fn schedule_rows(value: Value) -> Vec<ScheduleRow> {
    if value.is_null() {
        return Vec::new();
    }
    match serde_json::from_value::<Vec<ScheduleRow>>(value) {
        Ok(rows) => rows,
        Err(err) => {
            tracing::warn!(error = %err, "discarding unreadable schedule");
            Vec::new()
        }
    }
}
