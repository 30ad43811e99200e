use crate::process::utils::clean_str;

/// Characters removed before an amount is parsed.
const STRIPPED: &[char] = &['$', '€', '£', '¥', ','];

/// Parse a currency-formatted amount ("$1,234.50", "50", "1,000") into cents,
/// rounding half away from zero past the second decimal.
/// Returns `None` for blank, unparseable or out-of-range input.
pub fn parse_amount_cents(raw: &str) -> Option<i64> {
    let s: String = clean_str(raw)
        .chars()
        .filter(|c| !STRIPPED.contains(c) && !c.is_whitespace())
        .collect();
    let (negative, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s.as_str())),
    };
    let (whole, frac) = body.split_once('.').unwrap_or((body, ""));
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
        return None;
    }

    let mut cents: i64 = 0;
    for b in whole.bytes() {
        cents = cents.checked_mul(10)?.checked_add(i64::from(b - b'0'))?;
    }
    let mut frac_digits = frac.bytes().map(|b| i64::from(b - b'0'));
    let tenths = frac_digits.next().unwrap_or(0);
    let hundredths = frac_digits.next().unwrap_or(0);
    let round_up = frac_digits.next().is_some_and(|d| d >= 5);

    cents = cents
        .checked_mul(100)?
        .checked_add(tenths * 10 + hundredths + i64::from(round_up))?;
    Some(if negative { -cents } else { cents })
}

/// Render cents as `$1,234.56`. Negative amounts keep the sign after the
/// symbol (`$-5.00`).
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let dollars = (abs / 100).to_string();
    let frac = abs % 100;

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${sign}{grouped}.{frac:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_currency_strings() {
        assert_eq!(parse_amount_cents("$50"), Some(5000));
        assert_eq!(parse_amount_cents("$1,234.56"), Some(123456));
        assert_eq!(parse_amount_cents(" 19.99 "), Some(1999));
        assert_eq!(parse_amount_cents("$ 1 000.10"), Some(100010));
        assert_eq!(parse_amount_cents("-20.5"), Some(-2050));
    }

    #[test]
    fn rejects_unparseable_amounts() {
        assert_eq!(parse_amount_cents(""), None);
        assert_eq!(parse_amount_cents("$"), None);
        assert_eq!(parse_amount_cents("twelve"), None);
        assert_eq!(parse_amount_cents("NaN"), None);
        assert_eq!(parse_amount_cents("inf"), None);
        assert_eq!(parse_amount_cents("1.2.3"), None);
        assert_eq!(parse_amount_cents("-"), None);
        assert_eq!(parse_amount_cents("."), None);
    }

    #[test]
    fn rounds_past_the_cent() {
        assert_eq!(parse_amount_cents("19.995"), Some(2000));
        assert_eq!(parse_amount_cents("19.994"), Some(1999));
        assert_eq!(parse_amount_cents("-0.125"), Some(-13));
        assert_eq!(parse_amount_cents(".5"), Some(50));
        assert_eq!(parse_amount_cents("7."), Some(700));
    }

    #[test]
    fn out_of_range_amounts_are_unparseable() {
        assert_eq!(parse_amount_cents("$92,233,720,368,547,758.07"), Some(i64::MAX));
        assert_eq!(parse_amount_cents("$92,233,720,368,547,758.08"), None);
        assert_eq!(parse_amount_cents("$99,999,999,999,999,999"), None);
    }

    #[test]
    fn formats_with_thousands_separators() {
        assert_eq!(format_cents(0), "$0.00");
        assert_eq!(format_cents(5000), "$50.00");
        assert_eq!(format_cents(99), "$0.99");
        assert_eq!(format_cents(123456), "$1,234.56");
        assert_eq!(format_cents(100000000), "$1,000,000.00");
        assert_eq!(format_cents(-2050), "$-20.50");
    }
}
