use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{ApiError, AUDIT_FALLBACK_MESSAGE};
use crate::models::{AuditState, AuditStatus, Notification, NotificationLevel};
use crate::utils::now_rfc3339;

pub const DEFAULT_AUDIT_DELAY: Duration = Duration::from_millis(3000);

pub trait Notifier: Send + Sync {
    fn emit(&self, notification: Notification);
}

pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ChannelNotifier { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn emit(&self, notification: Notification) {
        tracing::info!(
            level = ?notification.level,
            at = %notification.emitted_at,
            message = %notification.message,
            "notification"
        );
        let _ = self.tx.send(notification);
    }
}

pub struct AuditTask {
    handle: JoinHandle<()>,
}

impl AuditTask {
    pub fn dispose(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub async fn finished(self) {
        let _ = self.handle.await;
    }
}

#[derive(Clone)]
pub struct AuditNotifier {
    notifier: Arc<dyn Notifier>,
}

impl AuditNotifier {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        AuditNotifier { notifier }
    }

    pub fn notify<F, Fut>(
        &self,
        simulation_id: Option<&str>,
        amount_label: &str,
        fetch_status: F,
        delay: Duration,
    ) -> Option<AuditTask>
    where
        F: FnOnce(String) -> Fut + Send + 'static,
        Fut: Future<Output = Result<AuditStatus, ApiError>> + Send + 'static,
    {
        let simulation_id = match simulation_id {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => return None,
        };

        self.notifier.emit(notification(
            NotificationLevel::Info,
            format!("Risk audit started\nAmount: {}", amount_label),
        ));

        let notifier = self.notifier.clone();
        let amount_label = amount_label.to_string();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::debug!(%simulation_id, "checking audit status");
            let outcome = match fetch_status(simulation_id).await {
                Ok(status) => status_notification(&status, &amount_label),
                Err(err) => {
                    let message = err.to_string();
                    let message = if message.is_empty() {
                        AUDIT_FALLBACK_MESSAGE.to_string()
                    } else {
                        message
                    };
                    notification(NotificationLevel::Error, message)
                }
            };
            notifier.emit(outcome);
        });

        Some(AuditTask { handle })
    }
}

fn status_notification(status: &AuditStatus, amount_label: &str) -> Notification {
    match status.state() {
        AuditState::Success => notification(
            NotificationLevel::Success,
            format!("Audit approved.\nAmount: {}", amount_label),
        ),
        AuditState::Failed => notification(
            NotificationLevel::Error,
            format!("Audit failed.\nAmount: {}", amount_label),
        ),
        AuditState::Pending | AuditState::Unrecognized(_) => {
            notification(NotificationLevel::Info, "Audit still in progress…".to_string())
        }
    }
}

fn notification(level: NotificationLevel, message: String) -> Notification {
    Notification {
        level,
        message,
        emitted_at: now_rfc3339(),
    }
}
