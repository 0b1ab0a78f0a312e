use anyhow::Result;

use crate::models::AuditState;
use crate::services::simulation::SimulationClient;

pub async fn show_status(client: &SimulationClient, simulation_id: &str) -> Result<()> {
    let status = client.fetch_audit_status(simulation_id).await?;
    let label = match status.state() {
        AuditState::Pending => "PENDING".to_string(),
        AuditState::Success => "SUCCESS".to_string(),
        AuditState::Failed => "FAILED".to_string(),
        AuditState::Unrecognized(other) if other.is_empty() => "unknown".to_string(),
        AuditState::Unrecognized(other) => other,
    };
    let id = match &status.id {
        Some(serde_json::Value::Number(id)) => id.to_string(),
        Some(serde_json::Value::String(id)) => id.clone(),
        _ => simulation_id.to_string(),
    };
    println!("Simulation {}: {}", id, label);
    if let Some(error) = status.audit_error {
        println!("Audit error: {}", error);
    }
    Ok(())
}
