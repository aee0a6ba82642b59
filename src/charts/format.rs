//! Tick Format Module
//! Number formatting for axis labels, driven by short specifiers such as
//! `",.2f"`, `".0%"` or `".3s"`.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Invalid format specifier '{0}'")]
    InvalidSpecifier(String),
    #[error("Unknown format type '{0}' (expected one of f, d, e, %, s)")]
    UnknownType(char),
}

/// Largest precision a specifier may carry.
pub const MAX_PRECISION: usize = 20;

/// Presentation type of a format specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    /// Shortest representation that round-trips.
    Shortest,
    /// Fixed point.
    Fixed,
    /// Rounded integer.
    Integer,
    /// Exponent notation.
    Exponent,
    /// Multiplied by 100, fixed point, with a percent sign.
    Percent,
    /// SI prefix (k, M, G, m, µ, ...).
    SiPrefix,
}

/// A parsed `[,][.precision][type]` specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpec {
    pub comma: bool,
    pub precision: Option<usize>,
    pub kind: FormatKind,
}

impl FormatSpec {
    /// Fixed-point format with the given number of decimals.
    pub fn fixed(precision: usize, comma: bool) -> Self {
        Self {
            comma,
            precision: Some(precision),
            kind: FormatKind::Fixed,
        }
    }

    pub fn format(&self, value: f64) -> String {
        // avoid printing "-0"
        let value = if value == 0.0 { 0.0 } else { value };
        let precision = |default: usize| self.precision.unwrap_or(default).min(MAX_PRECISION);

        let body = match self.kind {
            FormatKind::Shortest => {
                let mut buffer = ryu_js::Buffer::new();
                buffer.format(value).to_string()
            }
            FormatKind::Fixed => format!("{:.*}", precision(6), value),
            FormatKind::Integer => format!("{:.0}", value.round()),
            FormatKind::Exponent => exponent(value, precision(6)),
            FormatKind::Percent => {
                format!("{:.*}%", precision(0), value * 100.0)
            }
            FormatKind::SiPrefix => si_prefix(value, precision(6)),
        };

        if self.comma {
            group_thousands(&body)
        } else {
            body
        }
    }
}

impl FromStr for FormatSpec {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FormatError::InvalidSpecifier(s.to_string());
        let mut rest = s.trim();

        let comma = rest.starts_with(',');
        if comma {
            rest = &rest[1..];
        }

        let mut precision = None;
        if let Some(after_dot) = rest.strip_prefix('.') {
            let digits: String = after_dot.chars().take_while(|c| c.is_ascii_digit()).collect();
            if digits.is_empty() {
                return Err(invalid());
            }
            let p: usize = digits.parse().map_err(|_| invalid())?;
            if p > MAX_PRECISION {
                return Err(invalid());
            }
            precision = Some(p);
            rest = &after_dot[digits.len()..];
        }

        let mut chars = rest.chars();
        let kind = match (chars.next(), chars.next()) {
            (None, _) => FormatKind::Shortest,
            (Some(c), None) => match c {
                'f' => FormatKind::Fixed,
                'd' => FormatKind::Integer,
                'e' => FormatKind::Exponent,
                '%' => FormatKind::Percent,
                's' => FormatKind::SiPrefix,
                other => return Err(FormatError::UnknownType(other)),
            },
            _ => return Err(invalid()),
        };

        Ok(Self {
            comma,
            precision,
            kind,
        })
    }
}

impl fmt::Display for FormatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.comma {
            write!(f, ",")?;
        }
        if let Some(p) = self.precision {
            write!(f, ".{}", p)?;
        }
        let kind = match self.kind {
            FormatKind::Shortest => "",
            FormatKind::Fixed => "f",
            FormatKind::Integer => "d",
            FormatKind::Exponent => "e",
            FormatKind::Percent => "%",
            FormatKind::SiPrefix => "s",
        };
        write!(f, "{}", kind)
    }
}

/// Label formatter attached to an axis.
#[derive(Clone)]
pub enum TickFormat {
    Spec(FormatSpec),
    Custom(Arc<dyn Fn(f64) -> String + Send + Sync>),
}

impl TickFormat {
    pub fn parse(spec: &str) -> Result<Self, FormatError> {
        spec.parse().map(TickFormat::Spec)
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f64) -> String + Send + Sync + 'static,
    {
        TickFormat::Custom(Arc::new(f))
    }

    pub fn format(&self, value: f64) -> String {
        match self {
            TickFormat::Spec(spec) => spec.format(value),
            TickFormat::Custom(f) => f(value),
        }
    }
}

impl fmt::Debug for TickFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickFormat::Spec(spec) => write!(f, "TickFormat({})", spec),
            TickFormat::Custom(_) => write!(f, "TickFormat(<fn>)"),
        }
    }
}

fn exponent(value: f64, precision: usize) -> String {
    let s = format!("{:.*e}", precision, value);
    // Rust prints 1.5e3 and 1.5e-3; labels read better as 1.5e+3
    match s.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
        _ => s,
    }
}

const SI_PREFIXES: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "µ", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];

fn si_prefix(value: f64, significant: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        let mut buffer = ryu_js::Buffer::new();
        return buffer.format(value).to_string();
    }

    let power = ((value.abs().log10() / 3.0).floor() as i32).clamp(-8, 8);
    let scaled = value / 10f64.powi(power * 3);

    let significant = significant.max(1) as i32;
    let magnitude = scaled.abs().log10().floor() as i32;
    let decimals = (significant - 1 - magnitude).max(0) as usize;

    let mut digits = format!("{:.*}", decimals, scaled);
    if digits.contains('.') {
        digits = digits.trim_end_matches('0').trim_end_matches('.').to_string();
    }
    format!("{}{}", digits, SI_PREFIXES[(power + 8) as usize])
}

fn group_thousands(body: &str) -> String {
    let (sign, unsigned) = match body.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", body),
    };
    let split = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let (int_part, tail) = unsigned.split_at(split);

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}{}{}", sign, grouped, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(spec: &str, value: f64) -> String {
        TickFormat::parse(spec).unwrap().format(value)
    }

    #[test]
    fn fixed_with_grouping() {
        assert_eq!(fmt(",.0f", 1234567.0), "1,234,567");
        assert_eq!(fmt(",.2f", -1234.5), "-1,234.50");
        assert_eq!(fmt(".1f", 0.25), "0.2");
        assert_eq!(fmt(",.0f", 999.0), "999");
    }

    #[test]
    fn percent_and_integer() {
        assert_eq!(fmt(".0%", 0.123), "12%");
        assert_eq!(fmt(".1%", 0.5), "50.0%");
        assert_eq!(fmt("d", 41.6), "42");
    }

    #[test]
    fn exponent_has_explicit_sign() {
        assert_eq!(fmt(".1e", 1500.0), "1.5e+3");
        assert_eq!(fmt(".1e", 0.0015), "1.5e-3");
    }

    #[test]
    fn si_prefix_trims_zeros() {
        assert_eq!(fmt(".2s", 1500.0), "1.5k");
        assert_eq!(fmt("s", 2_000_000.0), "2M");
        assert_eq!(fmt(".3s", 0.00042), "420µ");
    }

    #[test]
    fn shortest_uses_javascript_style() {
        assert_eq!(fmt("", 0.1), "0.1");
        assert_eq!(fmt("", 20.0), "20");
        assert_eq!(fmt(",", 12000.0), "12,000");
    }

    #[test]
    fn negative_zero_prints_as_zero() {
        assert_eq!(fmt(".1f", -0.0), "0.0");
    }

    #[test]
    fn rejects_bad_specifiers() {
        assert_eq!(
            TickFormat::parse(".x").unwrap_err(),
            FormatError::InvalidSpecifier(".x".to_string())
        );
        assert_eq!(TickFormat::parse("q").unwrap_err(), FormatError::UnknownType('q'));
        assert!(TickFormat::parse("ff").is_err());
    }

    #[test]
    fn precision_is_capped() {
        assert_eq!(fmt(".20f", 0.5), format!("{:.20}", 0.5));
        assert_eq!(
            TickFormat::parse(".21f").unwrap_err(),
            FormatError::InvalidSpecifier(".21f".to_string())
        );
        assert!(TickFormat::parse(".999999999f").is_err());
        assert!(TickFormat::parse(".99999999999999999999999f").is_err());
        assert_eq!(FormatSpec::fixed(usize::MAX, false).format(0.5), format!("{:.20}", 0.5));
    }

    #[test]
    fn specifier_displays_back_to_source() {
        for spec in [",.2f", ".0%", "d", ".3s", ""] {
            assert_eq!(spec.parse::<FormatSpec>().unwrap().to_string(), spec);
        }
    }

    #[test]
    fn custom_formatter() {
        let format = TickFormat::custom(|v| format!("${}", v));
        assert_eq!(format.format(3.0), "$3");
    }
}
