// Display formatting shared by charts, metric cards and tables

/// Largest number of fraction digits shown by `grouped`.
const MAX_FRACTION_DIGITS: usize = 3;

/// Format a number with thousands separators and at most three fraction
/// digits, e.g. `1234.5` -> `"1,234.5"`, `1000000` -> `"1,000,000"`.
pub fn grouped(value: f64) -> String {
    if let Some(special) = non_finite(value) {
        return special;
    }

    let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, value.abs());
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };

    with_sign(value, group_decimal(trimmed))
}

/// Format with thousands separators and exactly `decimals` fraction digits.
pub fn grouped_fixed(value: f64, decimals: usize) -> String {
    if let Some(special) = non_finite(value) {
        return special;
    }

    let fixed = format!("{:.*}", decimals, value.abs());
    with_sign(value, group_decimal(&fixed))
}

/// `$` followed by the grouped number.
pub fn currency(value: f64) -> String {
    format!("${}", grouped(value))
}

/// Optional numeric value as display text; missing values show as `NaN`.
pub fn grouped_or_nan(value: Option<f64>) -> String {
    value.map(grouped).unwrap_or_else(|| "NaN".to_string())
}

/// Cut `label` to `max_chars` characters and append `...` when it is longer.
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    match label.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &label[..byte_idx]),
        None => label.to_string(),
    }
}

/// Convert a snake_case key into a title, e.g. `avg_order_value` -> `Avg Order Value`.
/// Only the first character of each word is touched.
pub fn humanize_key(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut out = String::with_capacity(spaced.len());
    let mut prev_is_word = false;

    for c in spaced.chars() {
        let is_word = c.is_alphanumeric();
        if is_word && !prev_is_word {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev_is_word = is_word;
    }

    out
}

fn non_finite(value: f64) -> Option<String> {
    if value.is_nan() {
        Some("NaN".to_string())
    } else if value.is_infinite() {
        Some(if value > 0.0 { "∞" } else { "-∞" }.to_string())
    } else {
        None
    }
}

fn with_sign(value: f64, body: String) -> String {
    let is_zero = body.chars().all(|c| c == '0' || c == '.' || c == ',');
    if value < 0.0 && !is_zero {
        format!("-{}", body)
    } else {
        body
    }
}

/// Insert separators into the integer part of an unsigned decimal string.
fn group_decimal(unsigned: &str) -> String {
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(f) => format!("{}.{}", grouped, f),
        None => grouped,
    }
}
