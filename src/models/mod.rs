use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_AMOUNT: &str = "50000";
pub const DEFAULT_RATE: &str = "24";
pub const DEFAULT_MONTHS: &str = "12";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInputs {
    pub amount: String,
    pub rate: String,
    pub months: String,
}

impl Default for FormInputs {
    fn default() -> Self {
        FormInputs {
            amount: DEFAULT_AMOUNT.to_string(),
            rate: DEFAULT_RATE.to_string(),
            months: DEFAULT_MONTHS.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub amount: f64,
    pub rate: f64,
    pub months: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub month: u32,
    pub payment: f64,
    pub interest: f64,
    pub principal: f64,
    pub balance: f64,
}

/// Canonical form of a simulation response. Totals stay optional because the
/// service is not validated here; rendering shows a placeholder for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub monthly_payment: Option<f64>,
    pub total_paid: Option<f64>,
    pub total_interest: Option<f64>,
    pub schedule: Vec<ScheduleRow>,
}

/// Success body of `/api/simulate` after envelope unwrapping.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPayload {
    pub simulation_id: Option<String>,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditState {
    Pending,
    Success,
    Failed,
    Unrecognized(String),
}

impl From<&str> for AuditState {
    fn from(value: &str) -> Self {
        match value {
            "PENDING" => AuditState::Pending,
            "SUCCESS" => AuditState::Success,
            "FAILED" => AuditState::Failed,
            other => AuditState::Unrecognized(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AuditStatus {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub audit_status: Option<String>,
    #[serde(default)]
    pub audit_error: Option<String>,
}

impl AuditStatus {
    pub fn state(&self) -> AuditState {
        match self.audit_status.as_deref() {
            Some(status) => AuditState::from(status),
            None => AuditState::Unrecognized(String::new()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub emitted_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Submitting,
    Success,
    Failed,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base_url: String,
    pub audit_delay: Duration,
    pub db_path: String,
}
