//! Display formatting for amounts, dates and payment methods.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::api::models::PaymentMethod;

/// Group digits with `.` the way the dashboard shows rupiah: `1250000` → `1.250.000`.
///
/// Takes any integer that widens losslessly, so `u64` amounts and signed
/// totals share one path.
pub fn group_thousands(value: impl Into<i128>) -> String {
    let value: i128 = value.into();
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

pub fn format_rupiah(value: impl Into<i128>) -> String {
    format!("Rp {}", group_thousands(value))
}

/// Parse the date part of a backend timestamp. Accepts plain dates,
/// RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS` values.
pub fn parse_backend_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|ts| ts.date())
}

/// `dd-mm-yyyy`, or the input unchanged when it is not a date
pub fn format_date(raw: &str) -> String {
    match parse_backend_date(raw) {
        Some(date) => date.format("%d-%m-%Y").to_string(),
        None => raw.to_string(),
    }
}

/// Table label for a raw `keterangan` value. Anything that is not cash
/// is shown as non-cash.
pub fn payment_label(raw: &str) -> &'static str {
    raw.parse::<PaymentMethod>()
        .unwrap_or(PaymentMethod::NonTunai)
        .label()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1.000");
        assert_eq!(group_thousands(5_000_000), "5.000.000");
        assert_eq!(group_thousands(-1_250_500), "-1.250.500");
        assert_eq!(format_rupiah(75_000), "Rp 75.000");
    }

    #[test]
    fn test_large_amounts_do_not_wrap() {
        assert_eq!(group_thousands(u64::MAX), "18.446.744.073.709.551.615");
        assert_eq!(format_rupiah(i64::MIN), "Rp -9.223.372.036.854.775.808");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2025-03-07"), "07-03-2025");
        assert_eq!(format_date("2025-03-07T00:00:00.000Z"), "07-03-2025");
        assert_eq!(format_date("2025-03-07T10:15:00"), "07-03-2025");
        assert_eq!(format_date("kemarin"), "kemarin");
    }

    #[test]
    fn test_payment_label() {
        assert_eq!(payment_label("TUNAI"), "Tunai");
        assert_eq!(payment_label("NON_TUNAI"), "Non-Tunai");
        assert_eq!(payment_label("transfer"), "Non-Tunai");
    }
}
