use chrono::Utc;

use crate::models::{FormInputs, SimulationRequest};

const DECIMAL_SEPARATOR: char = '.';
const GROUP_SEPARATOR: char = ',';

pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

pub fn format_decimal(value: f64) -> String {
    format!("{:.2}", value)
}

pub fn format_money(value: Option<f64>) -> String {
    let value = match value {
        Some(v) if v.is_finite() => v,
        _ => return "-".to_string(),
    };
    let text = format_decimal(value.abs());
    let (int_part, frac_part) = text.split_once(DECIMAL_SEPARATOR).unwrap_or((text.as_str(), "00"));
    let sign = if value < 0.0 && text != "0.00" { "-" } else { "" };
    format!("{}${}.{}", sign, group_thousands(int_part), frac_part)
}

/// Digits and at most one decimal point, integer part grouped by thousands.
/// Separators after the first are dropped and their digits join the fraction.
pub fn normalize_amount(raw: &str) -> String {
    let cleaned = only_digits_and_dot(raw);
    match cleaned.split_once(DECIMAL_SEPARATOR) {
        Some((int_part, rest)) => {
            let fraction: String = rest.chars().filter(|c| *c != DECIMAL_SEPARATOR).collect();
            format!("{}{}{}", group_thousands(int_part), DECIMAL_SEPARATOR, fraction)
        }
        None => group_thousands(&cleaned),
    }
}

/// Digits and at most one decimal point with two fraction digits, clamped to
/// [0, 100] once the text is a number. `""` and `"."` pass through untouched.
pub fn normalize_rate(raw: &str) -> String {
    let cleaned = only_digits_and_dot(raw);
    let truncated = match cleaned.split_once(DECIMAL_SEPARATOR) {
        Some((int_part, rest)) => {
            let fraction: String = rest
                .chars()
                .filter(|c| *c != DECIMAL_SEPARATOR)
                .take(2)
                .collect();
            format!("{}{}{}", trim_leading_zeros(int_part), DECIMAL_SEPARATOR, fraction)
        }
        None => trim_leading_zeros(&cleaned).to_string(),
    };
    clamp_number_text(&truncated, 0.0, 100.0)
}

pub fn normalize_months(raw: &str) -> String {
    only_digits(raw)
}

/// Copies the current inputs into the numeric request. Text that does not
/// parse (empty, lone separator) is sent as 0 and left to server validation.
pub fn build_request(inputs: &FormInputs) -> SimulationRequest {
    let amount: String = inputs.amount.chars().filter(|c| *c != GROUP_SEPARATOR).collect();
    SimulationRequest {
        amount: parse_decimal(&amount).unwrap_or(0.0),
        rate: parse_decimal(&inputs.rate).unwrap_or(0.0),
        months: inputs.months.parse::<u64>().unwrap_or(0),
    }
}

pub fn parse_decimal(value: &str) -> Option<f64> {
    if value.is_empty() || value == "." {
        return None;
    }
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn clamp_number_text(text: &str, min: f64, max: f64) -> String {
    if text.is_empty() || text == "." {
        return text.to_string();
    }
    match text.parse::<f64>() {
        Ok(value) if value > max => format!("{}", max),
        Ok(value) if value < min => format!("{}", min),
        _ => text.to_string(),
    }
}

// "007" -> "7", "00" -> "0"; an empty integer part stays empty.
fn trim_leading_zeros(digits: &str) -> &str {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() && !digits.is_empty() {
        "0"
    } else {
        trimmed
    }
}

fn only_digits_and_dot(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == DECIMAL_SEPARATOR)
        .collect()
}

fn only_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

// Input is ASCII digits only.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{any, prop_assert, prop_assert_eq, proptest};

    #[test]
    fn amount_groups_integer_part() {
        assert_eq!(normalize_amount("1234567"), "1,234,567");
        assert_eq!(normalize_amount("1234567.5"), "1,234,567.5");
        assert_eq!(normalize_amount("999"), "999");
        assert_eq!(normalize_amount("1000"), "1,000");
    }

    #[test]
    fn amount_strips_noise_and_regroups() {
        assert_eq!(normalize_amount("$ 50,000"), "50,000");
        assert_eq!(normalize_amount("12,34,5"), "12,345");
        assert_eq!(normalize_amount("abc"), "");
    }

    #[test]
    fn amount_keeps_first_separator_and_merges_the_rest() {
        assert_eq!(normalize_amount("1000.5.25"), "1,000.525");
        assert_eq!(normalize_amount("1.2.3"), "1.23");
    }

    #[test]
    fn amount_in_progress_states_survive() {
        assert_eq!(normalize_amount(""), "");
        assert_eq!(normalize_amount("."), ".");
        assert_eq!(normalize_amount("1234."), "1,234.");
        assert_eq!(normalize_amount(".5"), ".5");
    }

    #[test]
    fn rate_clamps_and_truncates() {
        assert_eq!(normalize_rate("150"), "100");
        assert_eq!(normalize_rate("12.3456"), "12.34");
        assert_eq!(normalize_rate("100.5"), "100");
        assert_eq!(normalize_rate("100"), "100");
        assert_eq!(normalize_rate("0"), "0");
    }

    #[test]
    fn rate_keeps_typing_states() {
        assert_eq!(normalize_rate(""), "");
        assert_eq!(normalize_rate("."), ".");
        assert_eq!(normalize_rate("12."), "12.");
        assert_eq!(normalize_rate("12.50"), "12.50");
        assert_eq!(normalize_rate("%"), "");
    }

    #[test]
    fn rate_drops_leading_zeros() {
        assert_eq!(normalize_rate("007"), "7");
        assert_eq!(normalize_rate("00"), "0");
        assert_eq!(normalize_rate("007.5"), "7.5");
        assert_eq!(normalize_rate("0.5"), "0.5");
        assert_eq!(normalize_rate(".5"), ".5");
        assert_eq!(normalize_rate("0150"), "100");
    }

    #[test]
    fn rate_drops_extra_separators() {
        assert_eq!(normalize_rate("1.2.3"), "1.23");
        assert_eq!(normalize_rate("2..5"), "2.5");
    }

    #[test]
    fn months_keeps_digits_only() {
        assert_eq!(normalize_months("1 2a-b3"), "123");
        assert_eq!(normalize_months("12.5"), "125");
        assert_eq!(normalize_months(""), "");
    }

    #[test]
    fn request_strips_grouping() {
        let inputs = FormInputs {
            amount: "50,000".to_string(),
            rate: "24".to_string(),
            months: "12".to_string(),
        };
        let request = build_request(&inputs);
        assert_eq!(request.amount, 50000.0);
        assert_eq!(request.rate, 24.0);
        assert_eq!(request.months, 12);
    }

    #[test]
    fn request_sends_zero_for_unparsed_text() {
        let inputs = FormInputs {
            amount: ".".to_string(),
            rate: String::new(),
            months: String::new(),
        };
        let request = build_request(&inputs);
        assert_eq!(request.amount, 0.0);
        assert_eq!(request.rate, 0.0);
        assert_eq!(request.months, 0);
    }

    #[test]
    fn money_formats_mxn_style() {
        assert_eq!(format_money(Some(1234.567)), "$1,234.57");
        assert_eq!(format_money(Some(0.0)), "$0.00");
        assert_eq!(format_money(Some(-2500.5)), "-$2,500.50");
        assert_eq!(format_money(Some(1_000_000.0)), "$1,000,000.00");
    }

    #[test]
    fn money_placeholder_for_missing_values() {
        assert_eq!(format_money(None), "-");
        assert_eq!(format_money(Some(f64::NAN)), "-");
        assert_eq!(format_money(Some(f64::INFINITY)), "-");
    }

    proptest! {
        #[test]
        fn prop_amount_is_idempotent(raw in any::<String>()) {
            let once = normalize_amount(&raw);
            prop_assert_eq!(normalize_amount(&once), once);
        }

        #[test]
        fn prop_amount_is_idempotent_on_numeric_noise(raw in "[0-9.,$ a]{0,24}") {
            let once = normalize_amount(&raw);
            prop_assert_eq!(normalize_amount(&once), once.clone());
            prop_assert!(once.chars().filter(|c| *c == '.').count() <= 1);
        }

        #[test]
        fn prop_rate_numeric_output_is_bounded(raw in "[0-9.%a ]{0,16}") {
            let rate = normalize_rate(&raw);
            if let Some(value) = parse_decimal(&rate) {
                prop_assert!((0.0..=100.0).contains(&value), "{} out of range", rate);
            }
            if let Some((_, fraction)) = rate.split_once('.') {
                prop_assert!(fraction.len() <= 2, "{} has too many decimals", rate);
            }
        }

        #[test]
        fn prop_rate_is_idempotent(raw in "[0-9.%a ]{0,16}") {
            let once = normalize_rate(&raw);
            prop_assert_eq!(normalize_rate(&once), once);
        }

        #[test]
        fn prop_months_only_digits(raw in any::<String>()) {
            prop_assert!(normalize_months(&raw).chars().all(|c| c.is_ascii_digit()));
        }
    }
}
