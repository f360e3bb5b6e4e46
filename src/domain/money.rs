use thiserror::Error;

/// Money is represented as integer cents to avoid floating-point precision issues.
/// R$ 50,00 is stored as 5000.
pub type Cents = i64;

/// Format cents as a decimal string.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Parse a decimal string into cents.
///
/// Accepts either `.` or `,` as the decimal separator. Digits beyond the
/// second decimal place are truncated.
/// Example: "50.00" -> 5000, "12,5" -> 1250, "100" -> 10000
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    let (units_str, fraction_str) = match digits.split_once(['.', ',']) {
        Some((units, fraction)) => (units, fraction),
        None => (digits, ""),
    };

    if units_str.is_empty() && fraction_str.is_empty() {
        return Err(ParseCentsError::Empty);
    }
    if !units_str.chars().all(|c| c.is_ascii_digit())
        || !fraction_str.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ParseCentsError::InvalidFormat(input.to_string()));
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str
            .parse()
            .map_err(|_| ParseCentsError::InvalidFormat(input.to_string()))?
    };

    let mut fraction: String = fraction_str.chars().take(2).collect();
    while fraction.len() < 2 {
        fraction.push('0');
    }
    let fraction_cents: i64 = fraction
        .parse()
        .map_err(|_| ParseCentsError::InvalidFormat(input.to_string()))?;

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(fraction_cents))
        .ok_or_else(|| ParseCentsError::InvalidFormat(input.to_string()))?;

    Ok(if negative { -cents } else { cents })
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCentsError {
    #[error("empty money value")]
    Empty,

    #[error("invalid money format: {0}")]
    InvalidFormat(String),
}
