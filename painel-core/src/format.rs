//! Number Formatting
//!
//! Locale-aware display rules for counts, percentages and signed deltas.
//! Everything here is pure so the rules can be checked without a browser.

/// Separators used when printing numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberLocale {
    /// Thousands separator
    pub group: char,
    /// Decimal separator
    pub decimal: char,
}

impl NumberLocale {
    /// Brazilian Portuguese: `12.345,6`
    pub const PT_BR: NumberLocale = NumberLocale {
        group: '.',
        decimal: ',',
    };

    /// US English: `12,345.6`
    pub const EN_US: NumberLocale = NumberLocale {
        group: ',',
        decimal: '.',
    };
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self::PT_BR
    }
}

/// Whether a delta is a relative change or an absolute percentage-point change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaKind {
    /// Relative change in percent, shown without decimals
    Percent,
    /// Percentage points, shown with one decimal
    Points,
}

impl DeltaKind {
    fn decimals(self) -> usize {
        match self {
            DeltaKind::Percent => 0,
            DeltaKind::Points => 1,
        }
    }
}

/// Insert `sep` every three digits from the right
fn group_digits(digits: &str, sep: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

/// Extra digits printed past the rounding position to detect exact ties
const TIE_EXTRA_DIGITS: usize = 24;

/// Print with `.` and `decimals` places, rounding the exact binary value
///
/// Only values that sit exactly halfway (`0.25`, `2.5`) round away from
/// zero; `1.45` is stored below the midpoint and stays `1.4`.
fn fixed(value: f64, decimals: usize) -> String {
    let magnitude = value.abs();
    let unsigned = if is_exact_tie(magnitude, decimals) {
        let half_unit = 0.5 / 10f64.powi(decimals as i32);
        format!("{:.*}", decimals, magnitude + half_unit)
    } else {
        format!("{:.*}", decimals, magnitude)
    };

    if value < 0.0 {
        format!("-{}", unsigned)
    } else {
        unsigned
    }
}

/// True when the digit after `decimals` is a 5 and nothing follows it
fn is_exact_tie(magnitude: f64, decimals: usize) -> bool {
    let exact = format!("{:.*}", decimals + 1 + TIE_EXTRA_DIGITS, magnitude);
    let tail = &exact[exact.len() - 1 - TIE_EXTRA_DIGITS..];
    tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0')
}

/// Integer with locale grouping (`12345` → `12.345`)
pub fn format_count(n: u64, locale: &NumberLocale) -> String {
    group_digits(&n.to_string(), locale.group)
}

/// Percentage value with at most one fraction digit, no `%` sign
///
/// Trailing zero fractions are dropped: `8.0` → `8`, `8.25` → `8,3`.
pub fn format_percent(value: f64, locale: &NumberLocale) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let tenths = (value.abs() * 10.0).round() as u64;
    let whole = tenths / 10;
    let frac = tenths % 10;

    let mut out = String::new();
    if value < 0.0 && tenths > 0 {
        out.push('-');
    }
    out.push_str(&group_digits(&whole.to_string(), locale.group));
    if frac != 0 {
        out.push(locale.decimal);
        out.push_str(&frac.to_string());
    }
    out
}

/// Signed period-over-period delta
///
/// `+` is prepended only for strictly positive values; negative values keep
/// their own `-`. No grouping is applied.
pub fn format_signed_delta(value: f64, kind: DeltaKind, locale: &NumberLocale) -> String {
    let prefix = if value > 0.0 { "+" } else { "" };
    let number = fixed(value, kind.decimals()).replace('.', &locale.decimal.to_string());
    format!("{}{}", prefix, number)
}

/// Average search position, always two decimals with `.`
pub fn format_position(value: f64) -> String {
    fixed(value, 2)
}
