//! Indonesian (id-ID) formatting for money, percentages and dates.

use chrono::{Datelike, NaiveDate};

const MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

const WEEKDAYS: [&str; 7] = ["Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu", "Minggu"];

/// Rounded whole number with `.` thousands separators: 9950000.4 → "9.950.000".
pub fn fmt_number(amount: f64) -> String {
    let rounded = if amount.is_finite() { amount.round() } else { 0.0 };
    let digits = format!("{:.0}", rounded.abs());
    let grouped = digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join(".");
    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Rupiah amount without decimals: 10000000 → "Rp 10.000.000".
pub fn idr(amount: f64) -> String {
    let number = fmt_number(amount);
    match number.strip_prefix('-') {
        Some(positive) => format!("-Rp {}", positive),
        None => format!("Rp {}", number),
    }
}

/// Rate as a percentage label: 0.005 → "0,5%", 0.11 → "11%".
pub fn fmt_percent(rate: f64) -> String {
    let percent = (rate * 100.0 * 100.0).round() / 100.0;
    let text = format!("{:.2}", percent);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{}%", text.replace('.', ","))
}

/// "Minggu, 18 Oktober 2026"
pub fn format_long_date(date: &NaiveDate) -> String {
    let weekday = WEEKDAYS[date.weekday().num_days_from_monday() as usize];
    format!(
        "{}, {:02} {} {}",
        weekday,
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

/// "18/10/2026"
pub fn format_short_date(date: &NaiveDate) -> String {
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}

/// ASCII letters and digits joined by `_`, for use in output file names.
pub fn sanitize_filename(name: &str, fallback: &str) -> String {
    let mut result = String::new();
    let mut last_dash = false;

    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            result.push(ch);
            last_dash = false;
        } else if (ch.is_whitespace() || ch == '-' || ch == '_') && !last_dash && !result.is_empty() {
            result.push('_');
            last_dash = true;
        }
    }

    let result = result.trim_matches('_');
    if result.is_empty() {
        fallback.to_string()
    } else {
        result.to_string()
    }
}
