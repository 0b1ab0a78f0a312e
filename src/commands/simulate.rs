use anyhow::{anyhow, Result};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::models::{FormPhase, Notification, NotificationLevel, SimulationResult};
use crate::services::state::FormController;
use crate::utils::format_money;

pub async fn run(
    controller: &mut FormController,
    notifications: &mut UnboundedReceiver<Notification>,
) -> Result<()> {
    controller.submit().await;
    if let Some(result) = controller.result() {
        print!("{}", render_result(result));
    }
    print_notifications(notifications);

    controller.wait_for_audits().await;
    print_notifications(notifications);

    match controller.phase() {
        FormPhase::Failed => Err(anyhow!(controller
            .error()
            .unwrap_or("Simulation failed")
            .to_string())),
        _ => Ok(()),
    }
}

pub fn render_result(result: &SimulationResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("Monthly payment: {}\n", format_money(result.monthly_payment)));
    out.push_str(&format!("Total interest:  {}\n", format_money(result.total_interest)));
    out.push_str(&format!("Total paid:      {}\n\n", format_money(result.total_paid)));
    out.push_str(&format!(
        "{:>5}  {:>16}  {:>16}  {:>16}  {:>16}\n",
        "Month", "Payment", "Interest", "Principal", "Balance"
    ));
    for row in &result.schedule {
        out.push_str(&format!(
            "{:>5}  {:>16}  {:>16}  {:>16}  {:>16}\n",
            row.month,
            format_money(Some(row.payment)),
            format_money(Some(row.interest)),
            format_money(Some(row.principal)),
            format_money(Some(row.balance)),
        ));
    }
    out
}

fn print_notifications(notifications: &mut UnboundedReceiver<Notification>) {
    while let Ok(notification) = notifications.try_recv() {
        let marker = match notification.level {
            NotificationLevel::Info => "[info]",
            NotificationLevel::Success => "[ok]",
            NotificationLevel::Error => "[error]",
        };
        println!("{} {}", marker, notification.message.replace('\n', " "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScheduleRow;

    #[test]
    fn renders_summary_and_rows_in_order() {
        let result = SimulationResult {
            monthly_payment: Some(4728.49),
            total_paid: None,
            total_interest: Some(6741.88),
            schedule: vec![
                ScheduleRow {
                    month: 1,
                    payment: 4728.49,
                    interest: 1000.0,
                    principal: 3728.49,
                    balance: 46271.51,
                },
                ScheduleRow {
                    month: 2,
                    payment: 4728.49,
                    interest: 925.43,
                    principal: 3803.06,
                    balance: 42468.45,
                },
            ],
        };
        let text = render_result(&result);
        assert!(text.contains("Monthly payment: $4,728.49"));
        assert!(text.contains("Total paid:      -"));
        let first = text.find("$46,271.51").unwrap();
        let second = text.find("$42,468.45").unwrap();
        assert!(first < second);
    }
}
