//! Display helpers following es-AR conventions: `.` groups thousands and `,`
//! separates decimals. Rounding is half away from zero.

pub fn currency(value: f64) -> String {
    signed(value, 0, |digits| format!("$ {digits}"))
}

pub fn number(value: f64) -> String {
    signed(value, 0, |digits| digits)
}

/// Formats a ratio (`0.64`) as a percentage with two decimals (`64,00 %`).
pub fn percent(ratio: f64) -> String {
    signed(ratio * 100.0, 2, |digits| format!("{digits} %"))
}

pub fn simple_percent(ratio: f64) -> String {
    signed(ratio * 100.0, 0, |digits| format!("{digits} %"))
}

fn signed(value: f64, decimals: u32, decorate: impl FnOnce(String) -> String) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{sign}∞");
    }

    let scale = 10u128.pow(decimals);
    let scaled = (value.abs() * scale as f64).round() as u128;
    let body = decorate(digits(scaled, scale, decimals));
    if value < 0.0 && scaled != 0 {
        format!("-{body}")
    } else {
        body
    }
}

fn digits(scaled: u128, scale: u128, decimals: u32) -> String {
    let grouped = group_thousands(&(scaled / scale).to_string());
    if decimals == 0 {
        grouped
    } else {
        let fraction = scaled % scale;
        format!("{grouped},{fraction:0width$}", width = decimals as usize)
    }
}

fn group_thousands(integer: &str) -> String {
    let mut out = String::with_capacity(integer.len() + integer.len() / 3);
    for (idx, ch) in integer.chars().enumerate() {
        if idx > 0 && (integer.len() - idx) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
