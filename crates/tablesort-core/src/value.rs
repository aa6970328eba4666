use crate::state::Direction;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use feruca::Collator;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Comparable key extracted from a cell's visible text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Value {
    /// Integer-valued number, suffix multiplier already applied.
    Number(Decimal),
    /// Lower-cased text with all whitespace removed.
    Text(String),
}

impl Value {
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => write!(f, "\"{s}\""),
        }
    }
}

/// Suffix letters and the factor they stand for.
const MULTIPLIERS: [(char, i64); 3] = [('g', 1_000_000_000), ('m', 1_000_000), ('k', 1_000)];

/// Classify a cell's text as a number or a normalized string.
///
/// The text counts as numeric when digits and separators make up more than
/// roughly half of it, which lets units and currency symbols through
/// ("$1,000", "10 MB") while keeping labels like "N/A" or "v2 beta" textual.
///
/// Examples:
/// - "42" -> Number(42)
/// - "N/A" -> Text("n/a")
/// - "3.5k" -> Number(3500)
/// - "1,234" -> Number(1234)
pub fn classify(text: &str) -> Value {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let candidate: String = compact
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();

    // candidate + 1 > compact / 2, kept in integers
    let numeric = 2 * (candidate.chars().count() + 1) > compact.chars().count();

    if numeric {
        if let Some(number) = parse_number(&candidate, multiplier(&compact)) {
            return Value::Number(number);
        }
    }

    Value::Text(compact.to_lowercase())
}

thread_local! {
    static COLLATOR: RefCell<Collator> = RefCell::new(Collator::default());
}

/// Unicode collation of two text keys, ties broken by code point.
fn collate(a: &str, b: &str) -> Ordering {
    COLLATOR.with(|collator| collator.borrow_mut().collate(a, b))
}

/// Order two values for the given direction.
///
/// Comparison runs `b` against `a`, so `Ascending` (+1) puts larger numbers
/// first. Numbers rank ahead of text under `Ascending` and behind it under
/// `Descending`, which keeps the order total on mixed columns.
pub fn compare(a: &Value, b: &Value, direction: Direction) -> Ordering {
    let ordering = match (a, b) {
        (Value::Number(x), Value::Number(y)) => y.cmp(x),
        (Value::Text(x), Value::Text(y)) => collate(y, x),
        (Value::Number(_), Value::Text(_)) => Ordering::Less,
        (Value::Text(_), Value::Number(_)) => Ordering::Greater,
    };

    match direction {
        Direction::Ascending => ordering,
        Direction::Descending => ordering.reverse(),
    }
}

/// Multiplier named by the letter right after the last digit, if any.
fn multiplier(compact: &str) -> i64 {
    let lower = compact.to_lowercase();
    let Some(last_digit) = lower.rfind(|c: char| c.is_ascii_digit()) else {
        return 1;
    };

    lower[last_digit + 1..]
        .chars()
        .next()
        .and_then(|suffix| {
            MULTIPLIERS
                .iter()
                .find(|(key, _)| *key == suffix)
                .map(|(_, factor)| *factor)
        })
        .unwrap_or(1)
}

/// Turn the digits/separators candidate into a truncated decimal.
fn parse_number(candidate: &str, multiplier: i64) -> Option<Decimal> {
    if !candidate.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let (integer, fraction) = split_decimal(candidate);
    let integer = if integer.is_empty() { "0".to_string() } else { integer };
    let literal = if fraction.is_empty() {
        integer
    } else {
        format!("{integer}.{fraction}")
    };

    let value = Decimal::from_str(&literal).ok()?;
    let scaled = value.checked_mul(Decimal::from(multiplier))?;
    Some(scaled.trunc().normalize())
}

/// Split a candidate into integer and fraction digits.
///
/// With both separators present the last one is the decimal point. With a
/// single kind, regular three-digit groups mean grouping ("1,234",
/// "1.234.567"), anything else puts the decimal point at the first one.
fn split_decimal(candidate: &str) -> (String, String) {
    let last_dot = candidate.rfind('.');
    let last_comma = candidate.rfind(',');

    let decimal_at = match (last_dot, last_comma) {
        (Some(dot), Some(comma)) => Some(dot.max(comma)),
        (Some(_), None) => {
            if is_grouped(candidate, '.') && candidate.matches('.').count() > 1 {
                None
            } else {
                candidate.find('.')
            }
        }
        (None, Some(_)) => {
            if is_grouped(candidate, ',') {
                None
            } else {
                candidate.find(',')
            }
        }
        (None, None) => None,
    };

    match decimal_at {
        None => (digits(candidate), String::new()),
        Some(at) if last_dot.is_some() && last_comma.is_some() => {
            (digits(&candidate[..at]), digits(&candidate[at + 1..]))
        }
        Some(at) => {
            let rest = &candidate[at + 1..];
            let end = rest.find(['.', ',']).unwrap_or(rest.len());
            (digits(&candidate[..at]), digits(&rest[..end]))
        }
    }
}

/// Whether `separator` splits the candidate into thousands groups.
fn is_grouped(candidate: &str, separator: char) -> bool {
    let mut groups = candidate.split(separator);
    let leading_ok = groups
        .next()
        .map(|lead| (1..=3).contains(&lead.len()) && lead.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false);

    leading_ok && groups.all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()))
}

fn digits(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}
