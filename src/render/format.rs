//! Number formatting for KPI cards and bar labels.

/// Insert thousands separators into an integer.
pub fn count(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if n < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Whole-dollar currency: `$1,234`, `$-56`, `$0`.
///
/// Halves round to even (`$2.50` is `$2`). Negative totals that round to
/// zero print as `$0`, never `$-0`.
pub fn currency(v: f64) -> String {
    if !v.is_finite() {
        return format!("${v}");
    }
    let rounded = v.round_ties_even();
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("${}", count(rounded as i64))
}

const PREFIXES: [&str; 9] = ["p", "n", "µ", "m", "", "k", "M", "G", "T"];

/// Two significant digits with an SI suffix: `1.5k`, `12k`, `950`, `2.3M`.
pub fn si(v: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    if v == 0.0 {
        return "0.0".to_string();
    }

    let magnitude = v.abs();
    let mut exponent = magnitude.log10().floor() as i32;
    // Rounding to two digits can carry into the next power (999 -> 1.0k)
    let scale = 10_f64.powi(exponent - 1);
    if (magnitude / scale).round() >= 100.0 {
        exponent += 1;
    }

    let group = exponent.div_euclid(3).clamp(-4, 4);
    let scaled = v / 10_f64.powi(group * 3);
    let decimals = (1 - (exponent - group * 3)).max(0) as usize;
    let prefix = PREFIXES[(group + 4) as usize];

    format!("{scaled:.decimals$}{prefix}")
}
