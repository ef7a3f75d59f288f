//! Shared formatting helpers for table cells and page titles.
//!
//! All functions are pure. Numbers shown in tables are grouped with `,` every
//! three digits; decimals always carry exactly two fractional digits.

// ---------------------------------------------------------------------------
// Numbers
// ---------------------------------------------------------------------------

/// Group a run of ASCII digits every three places from the right.
///
/// `"1234567"` -> `"1,234,567"`. Input is expected to contain digits only.
pub fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format an integer with thousands separators: `-1234567` -> `"-1,234,567"`.
pub fn format_integer(v: i64) -> String {
    let grouped = group_digits(&v.unsigned_abs().to_string());
    if v < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Format a decimal with 2 fractional digits and a grouped integer part.
///
/// `1234.5` -> `"1,234.50"`. Non-finite values fall back to `to_string()`.
pub fn format_decimal(v: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    let fixed = format!("{:.2}", v.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    // `-0.001` rounds to "0.00" and must not keep its sign
    let negative = v < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0');
    format!(
        "{}{}.{}",
        if negative { "-" } else { "" },
        group_digits(int_part),
        frac_part
    )
}

/// Undo [`format_decimal`] grouping for machine-readable output.
///
/// Returns `Some("1234.50")` for `"1,234.50"`; `None` when the input is not a
/// grouped fixed-point decimal, so callers keep the original text.
pub fn plain_decimal(s: &str) -> Option<String> {
    let body = s.strip_prefix('-').unwrap_or(s);
    let (int_part, frac_part) = body.split_once('.')?;
    if int_part.is_empty()
        || frac_part.len() != 2
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
        || !int_part.bytes().all(|b| b.is_ascii_digit() || b == b',')
    {
        return None;
    }
    let groups: Vec<&str> = int_part.split(',').collect();
    let well_formed = groups[0].len() <= 3
        && !groups[0].is_empty()
        && groups[1..].iter().all(|g| g.len() == 3);
    if !well_formed {
        return None;
    }
    Some(s.replace(',', ""))
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

/// Uppercase the first character: `"collections"` -> `"Collections"`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Title derived from the last path segment of a route, query string dropped.
///
/// `"/ops/collections?x=1"` -> `"Collections"`, `"/"` -> `""`.
pub fn title_from_route(route: &str) -> String {
    let path = route.split('?').next().unwrap_or_default();
    let last = path.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
    capitalize(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_integer() {
        assert_eq!(format_integer(0), "0");
        assert_eq!(format_integer(999), "999");
        assert_eq!(format_integer(1000), "1,000");
        assert_eq!(format_integer(1234567), "1,234,567");
        assert_eq!(format_integer(-1234567), "-1,234,567");
        assert_eq!(format_integer(i64::MIN), "-9,223,372,036,854,775,808");
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(1234.5), "1,234.50");
        assert_eq!(format_decimal(0.0), "0.00");
        assert_eq!(format_decimal(12.345678), "12.35");
        assert_eq!(format_decimal(-9876543.21), "-9,876,543.21");
        assert_eq!(format_decimal(-0.001), "0.00");
    }

    #[test]
    fn test_plain_decimal() {
        assert_eq!(plain_decimal("1,234.50").as_deref(), Some("1234.50"));
        assert_eq!(plain_decimal("-1,234,567.00").as_deref(), Some("-1234567.00"));
        assert_eq!(plain_decimal("3.14").as_deref(), Some("3.14"));
        assert_eq!(plain_decimal("1,234"), None);
        assert_eq!(plain_decimal("a,b.cd"), None);
        assert_eq!(plain_decimal("12,34.50"), None);
        assert_eq!(plain_decimal("1.5"), None);
    }

    #[test]
    fn test_title_from_route() {
        assert_eq!(title_from_route("/ops/collections"), "Collections");
        assert_eq!(title_from_route("/ops/collections/"), "Collections");
        assert_eq!(title_from_route("/ops/state?name=a/b"), "State");
        assert_eq!(title_from_route("/"), "");
    }
}
