use clap::Args;

use crate::services::state::FormController;

/// Raw field text, fed through the same normalizers as keystrokes.
#[derive(Args, Debug, Default)]
pub struct FieldEdits {
    /// Loan amount, e.g. "50,000"
    #[arg(long)]
    pub amount: Option<String>,
    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<String>,
    /// Term in months
    #[arg(long)]
    pub months: Option<String>,
}

pub fn apply_edits(controller: &mut FormController, edits: &FieldEdits) {
    if let Some(amount) = edits.amount.as_deref() {
        controller.edit_amount(amount);
    }
    if let Some(rate) = edits.rate.as_deref() {
        controller.edit_rate(rate);
    }
    if let Some(months) = edits.months.as_deref() {
        controller.edit_months(months);
    }
}

pub fn show(controller: &FormController) {
    let inputs = controller.inputs();
    println!("Amount:  {}", inputs.amount);
    println!("Rate:    {} %", inputs.rate);
    println!("Months:  {}", inputs.months);
}
