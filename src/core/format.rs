//! Positional display format templates for lookup columns
//!
//! A template is literal text with placeholders addressing the single raw
//! field value as argument `0`:
//!
//! - `{0}` renders the value's default string form
//! - `{0,8}` / `{0,-8}` right/left align in a field of the given width
//! - `{0:spec}` applies a value format (see below)
//! - `{{` and `}}` are literal braces
//!
//! Value formats:
//!
//! - standard numeric: `D`, `F`, `N`, `P`, `X`/`x` with an optional precision
//!   (`D3`, `F2`, `N0`, `X8`)
//! - custom numeric: `0`, `#`, `,` and `.` patterns such as `00`, `0.00`,
//!   `#,##0.##`
//! - date/time: chrono strftime patterns (`%Y-%m-%d`) or the common
//!   `yyyy-MM-dd HH:mm:ss` token style
//!
//! A numeric format applied to a non-numeric value, or a date format applied
//! to a non-date value, renders the value unformatted.

use crate::core::field::FieldValue;
use chrono::format::{Item, StrftimeItems};
use chrono::NaiveTime;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::OnceLock;

/// A parsed column format template
#[derive(Debug, Clone, PartialEq)]
pub struct FormatTemplate {
    source: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Argument {
        align: Option<i32>,
        spec: Option<ValueFormat>,
    },
}

#[derive(Debug, Clone, PartialEq)]
enum ValueFormat {
    Standard {
        kind: StandardKind,
        precision: Option<usize>,
    },
    Custom(CustomNumber),
    DateTime(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum StandardKind {
    Decimal,
    Fixed,
    Number,
    Percent,
    HexUpper,
    HexLower,
}

#[derive(Debug, Clone, PartialEq)]
struct CustomNumber {
    min_integer_digits: usize,
    grouping: bool,
    min_fraction_digits: usize,
    max_fraction_digits: usize,
}

/// Why a template was rejected
#[derive(Debug, Clone, PartialEq)]
pub struct FormatParseError(pub String);

impl fmt::Display for FormatParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for FormatParseError {}

/// Widest alignment or digit count a template may ask for
const MAX_WIDTH: usize = u16::MAX as usize;

fn standard_regex() -> &'static Regex {
    static STANDARD_REGEX: OnceLock<Regex> = OnceLock::new();
    STANDARD_REGEX.get_or_init(|| Regex::new(r"^([DdFfNnPpXx])(\d{1,2})?$").unwrap())
}

fn custom_number_regex() -> &'static Regex {
    static CUSTOM_REGEX: OnceLock<Regex> = OnceLock::new();
    CUSTOM_REGEX.get_or_init(|| Regex::new(r"^[#,]*0*(\.0*#*)?$").unwrap())
}

fn date_token_regex() -> &'static Regex {
    static DATE_REGEX: OnceLock<Regex> = OnceLock::new();
    DATE_REGEX.get_or_init(|| Regex::new(r"^[yMdHhmst:/\-. ,T]*[yMdHhms][yMdHhmst:/\-. ,T]*$").unwrap())
}

impl FormatTemplate {
    /// Parse a template, rejecting unbalanced braces, argument indexes other
    /// than `0` and unrecognised value formats.
    pub fn parse(source: &str) -> Result<Self, FormatParseError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => {
                    return Err(FormatParseError("unescaped '}'".to_string()));
                }
                '{' => {
                    let mut body = String::new();
                    let mut closed = false;
                    for inner in chars.by_ref() {
                        if inner == '}' {
                            closed = true;
                            break;
                        }
                        body.push(inner);
                    }
                    if !closed {
                        return Err(FormatParseError("unclosed placeholder".to_string()));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(parse_placeholder(&body)?);
                }
                other => literal.push(other),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The template text as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Apply the template to a raw value. Null values render as `None`.
    pub fn render(&self, value: &FieldValue) -> Option<String> {
        if value.is_null() {
            return None;
        }

        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Argument { align, spec } => {
                    let formatted = match spec {
                        Some(spec) => spec.apply(value),
                        None => value.to_string(),
                    };
                    out.push_str(&pad(formatted, *align));
                }
            }
        }

        Some(out)
    }
}

impl fmt::Display for FormatTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Serialize for FormatTemplate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

fn parse_placeholder(body: &str) -> Result<Segment, FormatParseError> {
    let (head, spec) = match body.split_once(':') {
        Some((head, spec)) => (head, Some(spec)),
        None => (body, None),
    };
    let (index, align) = match head.split_once(',') {
        Some((index, align)) => (index, Some(align)),
        None => (head, None),
    };

    if index.trim() != "0" {
        return Err(FormatParseError(format!(
            "placeholder '{{{}}}' must address argument 0",
            body
        )));
    }

    let align = align
        .map(|a| {
            a.trim()
                .parse::<i32>()
                .ok()
                .filter(|width| width.unsigned_abs() <= MAX_WIDTH as u32)
                .ok_or_else(|| FormatParseError(format!("invalid alignment '{}'", a)))
        })
        .transpose()?;

    let spec = spec.map(parse_value_format).transpose()?;

    Ok(Segment::Argument { align, spec })
}

fn parse_value_format(spec: &str) -> Result<ValueFormat, FormatParseError> {
    if spec.contains('%') {
        let valid = StrftimeItems::new(spec).all(|item| !matches!(item, Item::Error));
        if !valid {
            return Err(FormatParseError(format!("invalid date format '{}'", spec)));
        }
        return Ok(ValueFormat::DateTime(spec.to_string()));
    }

    if let Some(caps) = standard_regex().captures(spec) {
        let kind = match &caps[1] {
            "D" | "d" => StandardKind::Decimal,
            "F" | "f" => StandardKind::Fixed,
            "N" | "n" => StandardKind::Number,
            "P" | "p" => StandardKind::Percent,
            "X" => StandardKind::HexUpper,
            _ => StandardKind::HexLower,
        };
        let precision = caps.get(2).and_then(|p| p.as_str().parse().ok());
        return Ok(ValueFormat::Standard { kind, precision });
    }

    if !spec.is_empty() && custom_number_regex().is_match(spec) && spec.contains(['0', '#']) {
        let custom = CustomNumber::parse(spec);
        if custom.min_integer_digits > MAX_WIDTH || custom.max_fraction_digits > MAX_WIDTH {
            return Err(FormatParseError(format!("format '{}' has too many digits", spec)));
        }
        return Ok(ValueFormat::Custom(custom));
    }

    if date_token_regex().is_match(spec) {
        return Ok(ValueFormat::DateTime(translate_date_tokens(spec)));
    }

    Err(FormatParseError(format!("unsupported format '{}'", spec)))
}

/// Translate `yyyy-MM-dd HH:mm` style tokens to strftime
fn translate_date_tokens(spec: &str) -> String {
    let chars: Vec<char> = spec.chars().collect();
    let mut out = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let mut run = 1;
        while i + run < chars.len() && chars[i + run] == c {
            run += 1;
        }

        let token = match (c, run) {
            ('y', 1..=2) => "%y",
            ('y', _) => "%Y",
            ('M', 1..=2) => "%m",
            ('M', 3) => "%b",
            ('M', _) => "%B",
            ('d', 1..=2) => "%d",
            ('d', 3) => "%a",
            ('d', _) => "%A",
            ('H', _) => "%H",
            ('h', _) => "%I",
            ('m', _) => "%M",
            ('s', _) => "%S",
            ('t', _) => "%p",
            _ => {
                for _ in 0..run {
                    out.push(c);
                }
                i += run;
                continue;
            }
        };
        out.push_str(token);
        i += run;
    }

    out
}

impl CustomNumber {
    fn parse(spec: &str) -> Self {
        let (integer, fraction) = match spec.split_once('.') {
            Some((integer, fraction)) => (integer, fraction),
            None => (spec, ""),
        };

        Self {
            min_integer_digits: integer.chars().filter(|c| *c == '0').count(),
            grouping: integer.contains(','),
            min_fraction_digits: fraction.chars().filter(|c| *c == '0').count(),
            max_fraction_digits: fraction.chars().filter(|c| matches!(c, '0' | '#')).count(),
        }
    }

    fn apply(&self, number: f64) -> String {
        let rounded = format!("{:.*}", self.max_fraction_digits, number.abs());
        let (int_part, frac_part) = match rounded.split_once('.') {
            Some((i, f)) => (i.to_string(), f.to_string()),
            None => (rounded, String::new()),
        };

        let mut frac = frac_part;
        while frac.len() > self.min_fraction_digits && frac.ends_with('0') {
            frac.pop();
        }

        let mut int_digits = if int_part == "0" && self.min_integer_digits == 0 {
            String::new()
        } else {
            int_part
        };
        while int_digits.len() < self.min_integer_digits {
            int_digits.insert(0, '0');
        }
        if self.grouping {
            int_digits = group_thousands(&int_digits);
        }

        let is_zero = int_digits.chars().all(|c| c == '0' || c == ',')
            && frac.chars().all(|c| c == '0');
        let mut out = String::new();
        if number < 0.0 && !is_zero {
            out.push('-');
        }
        out.push_str(&int_digits);
        if !frac.is_empty() {
            out.push('.');
            out.push_str(&frac);
        }
        out
    }
}

impl ValueFormat {
    fn apply(&self, value: &FieldValue) -> String {
        match self {
            ValueFormat::Standard { kind, precision } => {
                apply_standard(*kind, *precision, value).unwrap_or_else(|| value.to_string())
            }
            ValueFormat::Custom(custom) => value
                .as_f64()
                .map(|n| custom.apply(n))
                .unwrap_or_else(|| value.to_string()),
            ValueFormat::DateTime(pattern) => match value {
                FieldValue::DateTime(dt) => dt.format(pattern).to_string(),
                // Midnight UTC, so time and offset specifiers stay renderable
                FieldValue::Date(d) => d
                    .and_time(NaiveTime::MIN)
                    .and_utc()
                    .format(pattern)
                    .to_string(),
                other => other.to_string(),
            },
        }
    }
}

fn apply_standard(
    kind: StandardKind,
    precision: Option<usize>,
    value: &FieldValue,
) -> Option<String> {
    match kind {
        StandardKind::Decimal => {
            let i = value.as_integer()?;
            let digits = format!("{:0width$}", i.unsigned_abs(), width = precision.unwrap_or(1));
            Some(if i < 0 { format!("-{}", digits) } else { digits })
        }
        StandardKind::HexUpper => {
            let i = value.as_integer()?;
            Some(format!("{:0width$X}", i, width = precision.unwrap_or(1)))
        }
        StandardKind::HexLower => {
            let i = value.as_integer()?;
            Some(format!("{:0width$x}", i, width = precision.unwrap_or(1)))
        }
        StandardKind::Fixed => {
            let n = value.as_f64()?;
            Some(format!("{:.*}", precision.unwrap_or(2), n))
        }
        StandardKind::Number => {
            let n = value.as_f64()?;
            Some(grouped_fixed(n, precision.unwrap_or(2)))
        }
        StandardKind::Percent => {
            let n = value.as_f64()?;
            Some(format!("{} %", grouped_fixed(n * 100.0, precision.unwrap_or(2))))
        }
    }
}

fn grouped_fixed(number: f64, precision: usize) -> String {
    let fixed = format!("{:.*}", precision, number.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::new();
    let negative = number < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn pad(text: String, align: Option<i32>) -> String {
    match align {
        Some(width) if width > 0 => format!("{:>width$}", text, width = width as usize),
        Some(width) if width < 0 => format!("{:<width$}", text, width = width.unsigned_abs() as usize),
        _ => text,
    }
}
