//! Shared number formatting for the rendering layer.
//!
//! Every chart and table goes through these helpers so the dashboard
//! shows one consistent notation. Values the pipeline surfaced as `None`
//! (missing anchor, zero-anchor percent) render as an em dash.

use crate::types::LabelMode;

/// Compact magnitude notation: `2.10B`, `1.3M`, `12K`.
///
/// Sub-thousand values print as-is. The magnitude is taken from the
/// absolute value, matching the dashboard's historical labels.
pub fn compact(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1.0e9 {
        format!("{:.2}B", abs / 1.0e9)
    } else if abs >= 1.0e6 {
        format!("{:.1}M", abs / 1.0e6)
    } else if abs >= 1.0e3 {
        format!("{:.0}K", abs / 1.0e3)
    } else if abs == abs.trunc() {
        format!("{}", abs as i64)
    } else {
        format!("{}", abs)
    }
}

/// Thousands-grouped notation for table cells: `1,234,567`.
pub fn grouped(value: i64) -> String {
    let digits = value.abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Growth label for a window delta in the selected mode.
///
/// Percent mode renders the floored percent, count mode the raw delta;
/// both keep the sign and prefix gains with `+`. Missing values render
/// as an em dash. Switching modes reformats the same stored numbers,
/// nothing is recomputed.
pub fn growth_label(delta: Option<i64>, percent: Option<i64>, mode: LabelMode) -> String {
    let value = match mode {
        LabelMode::Percent => percent,
        LabelMode::Count => delta,
    };
    let suffix = match mode {
        LabelMode::Percent => "%",
        LabelMode::Count => "",
    };
    match value {
        Some(v) if v >= 0 => format!("+{}{}", v, suffix),
        Some(v) => format!("{}{}", v, suffix),
        None => "—".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_thresholds() {
        assert_eq!(compact(2_100_000_000.0), "2.10B");
        assert_eq!(compact(1_300_000.0), "1.3M");
        assert_eq!(compact(12_400.0), "12K");
        assert_eq!(compact(999.0), "999");
        assert_eq!(compact(0.0), "0");
    }

    #[test]
    fn test_compact_uses_magnitude() {
        assert_eq!(compact(-1_300_000.0), "1.3M");
    }

    #[test]
    fn test_grouped() {
        assert_eq!(grouped(0), "0");
        assert_eq!(grouped(999), "999");
        assert_eq!(grouped(1_000), "1,000");
        assert_eq!(grouped(1_234_567), "1,234,567");
        assert_eq!(grouped(-56_789), "-56,789");
    }

    #[test]
    fn test_growth_label_modes() {
        assert_eq!(growth_label(Some(12), Some(92), LabelMode::Percent), "+92%");
        assert_eq!(growth_label(Some(12), Some(92), LabelMode::Count), "+12");
        assert_eq!(growth_label(Some(-4), Some(-20), LabelMode::Percent), "-20%");
        assert_eq!(growth_label(Some(-4), Some(-20), LabelMode::Count), "-4");
    }

    #[test]
    fn test_growth_label_missing_is_dash() {
        assert_eq!(growth_label(None, None, LabelMode::Percent), "—");
        assert_eq!(growth_label(Some(5), None, LabelMode::Percent), "—");
    }
}
