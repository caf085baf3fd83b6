use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const DEFAULT_ICON: &str = "📦";

pub fn category_icon(category: &str) -> &'static str {
    match category {
        "Food" => "🍔",
        "Transportation" => "🚗",
        "Entertainment" => "🎬",
        "Other" => DEFAULT_ICON,
        _ => DEFAULT_ICON,
    }
}

fn format_with_commas(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `$1,234.50`. Always two decimals.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    // -0.001 rounds to 0.00 and must not print a sign
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}{}.{}", sign, symbol, format_with_commas(whole), cents)
}

/// Axis tick label: whole units, no separators.
pub fn format_currency_whole(amount: f64, symbol: &str) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}{}{:.0}", sign, symbol, amount.abs())
}

pub fn format_confidence(confidence: f64) -> String {
    format!("{:.0}%", (confidence * 100.0).clamp(0.0, 100.0))
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local()))
}

/// `Mar 1, 08:15 AM`. Unparseable input is shown as-is.
pub fn format_date(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(ts) => ts.format("%b %-d, %I:%M %p").to_string(),
        None => raw.to_string(),
    }
}

/// `2024-03` -> `Mar 2024`.
pub fn format_month_label(month: &str) -> String {
    NaiveDate::parse_from_str(&format!("{}-01", month.trim()), "%Y-%m-%d")
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_else(|_| month.to_string())
}
