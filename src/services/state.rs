use std::sync::Arc;
use std::time::Duration;

use crate::db::FormStore;
use crate::error::ApiError;
use crate::models::{FormInputs, FormPhase, RawPayload, SimulationRequest, SimulationResult};
use crate::services::audit::{AuditNotifier, AuditTask, Notifier};
use crate::services::response::normalize;
use crate::services::simulation::SimulationClient;
use crate::utils::{build_request, format_money, normalize_amount, normalize_months, normalize_rate};

/// A submission in flight. The request is a copy taken when it started, so
/// edits made while waiting do not reach it.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub token: u64,
    pub request: SimulationRequest,
}

pub struct FormController {
    store: Box<dyn FormStore>,
    client: SimulationClient,
    audit: AuditNotifier,
    audit_delay: Duration,
    inputs: FormInputs,
    phase: FormPhase,
    result: Option<SimulationResult>,
    error: Option<String>,
    latest_token: u64,
    audits: Vec<AuditTask>,
}

impl FormController {
    pub fn new(
        store: Box<dyn FormStore>,
        client: SimulationClient,
        notifier: Arc<dyn Notifier>,
        audit_delay: Duration,
    ) -> Self {
        let inputs = store.load();
        FormController {
            store,
            client,
            audit: AuditNotifier::new(notifier),
            audit_delay,
            inputs,
            phase: FormPhase::Idle,
            result: None,
            error: None,
            latest_token: 0,
            audits: Vec::new(),
        }
    }

    pub fn inputs(&self) -> &FormInputs {
        &self.inputs
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn result(&self) -> Option<&SimulationResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn edit_amount(&mut self, raw: &str) {
        self.inputs.amount = normalize_amount(raw);
        self.result = None;
        self.error = None;
        self.persist();
    }

    pub fn edit_rate(&mut self, raw: &str) {
        self.inputs.rate = normalize_rate(raw);
        self.persist();
    }

    pub fn edit_months(&mut self, raw: &str) {
        self.inputs.months = normalize_months(raw);
        self.persist();
    }

    pub async fn submit(&mut self) -> FormPhase {
        let submission = self.begin_submit();
        let outcome = self.client.submit(&submission.request).await;
        self.complete_submit(&submission, outcome);
        self.phase
    }

    pub fn begin_submit(&mut self) -> Submission {
        self.latest_token += 1;
        self.phase = FormPhase::Submitting;
        self.error = None;
        self.result = None;
        let request = build_request(&self.inputs);
        tracing::info!(token = self.latest_token, ?request, "simulation submitted");
        Submission {
            token: self.latest_token,
            request,
        }
    }

    /// Applies the outcome of `submission`. Returns `false` and leaves the
    /// form untouched when a newer submission has started since.
    pub fn complete_submit(
        &mut self,
        submission: &Submission,
        outcome: Result<RawPayload, ApiError>,
    ) -> bool {
        if submission.token != self.latest_token {
            tracing::debug!(
                token = submission.token,
                latest = self.latest_token,
                "discarding stale simulation outcome"
            );
            return false;
        }

        match outcome.and_then(into_result) {
            Ok((simulation_id, result)) => {
                tracing::info!(rows = result.schedule.len(), "simulation succeeded");
                self.phase = FormPhase::Success;
                self.result = Some(result);
                self.start_audit(simulation_id.as_deref(), submission.request.amount);
            }
            Err(err) => {
                tracing::info!(error = %err, "simulation failed");
                self.phase = FormPhase::Failed;
                self.result = None;
                self.error = Some(err.to_string());
            }
        }
        true
    }

    pub async fn wait_for_audits(&mut self) {
        for task in self.audits.drain(..) {
            task.finished().await;
        }
    }

    pub fn teardown(&mut self) {
        for task in self.audits.drain(..) {
            task.dispose();
        }
    }

    fn start_audit(&mut self, simulation_id: Option<&str>, amount: f64) {
        let client = self.client.clone();
        let task = self.audit.notify(
            simulation_id,
            &format_money(Some(amount)),
            move |id| async move { client.fetch_audit_status(&id).await },
            self.audit_delay,
        );
        self.audits.retain(|pending| !pending.is_finished());
        if let Some(task) = task {
            self.audits.push(task);
        }
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(&self.inputs) {
            tracing::warn!(error = %err, "failed to persist form inputs");
        }
    }
}

impl Drop for FormController {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn into_result(payload: RawPayload) -> Result<(Option<String>, SimulationResult), ApiError> {
    let result = normalize(payload.data);
    if result.schedule.is_empty() {
        return Err(ApiError::EmptyResult);
    }
    Ok((payload.simulation_id, result))
}
