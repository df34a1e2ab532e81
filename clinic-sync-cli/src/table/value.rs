//! Cell value representation for tabular records

use chrono::{DateTime, FixedOffset, NaiveDate};

/// A single cell in a tabular record.
///
/// Covers the scalar shapes found in clinic report exports plus the
/// compound shapes produced by decoding remote properties: `DateRange` for
/// date properties carrying an end date, `Json` for property types the
/// decoder does not model.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Missing/empty value
    Null,
    /// Text value
    String(String),
    /// Whole number
    Int(i64),
    /// Floating point
    Float(f64),
    /// Boolean
    Bool(bool),
    /// Instant with a UTC offset
    DateTime(DateTime<FixedOffset>),
    /// Calendar date without a time component
    Date(NaiveDate),
    /// Sequence value (multi-select input)
    List(Vec<CellValue>),
    /// Decoded date range
    DateRange {
        start: Option<String>,
        end: Option<String>,
        time_zone: Option<String>,
    },
    /// Raw property JSON for types without a flattened form
    Json(serde_json::Value),
}

impl CellValue {
    /// Check whether this cell counts as "no data": missing, NaN, or a
    /// string that is empty or whitespace-only.
    pub fn is_null(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(f) => f.is_nan(),
            CellValue::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Truthiness of a non-textual cell, used for checkbox columns.
    pub fn is_truthy(&self) -> bool {
        match self {
            CellValue::Null => false,
            CellValue::Bool(b) => *b,
            CellValue::Int(i) => *i != 0,
            CellValue::Float(f) => *f != 0.0 && !f.is_nan(),
            CellValue::String(s) => !s.is_empty(),
            CellValue::List(items) => !items.is_empty(),
            _ => true,
        }
    }

    /// Try to coerce to a float. Numeric strings (after trimming) coerce,
    /// booleans map to 0/1, everything else fails with `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellValue::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::String(s) => write!(f, "{}", s),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(fl) => write!(f, "{}", fl),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CellValue::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "{}", parts.join(", "))
            }
            CellValue::DateRange { start, end, .. } => {
                // ISO 8601 interval notation
                write!(
                    f,
                    "{}/{}",
                    start.as_deref().unwrap_or(""),
                    end.as_deref().unwrap_or("")
                )
            }
            CellValue::Json(value) => write!(f, "{}", value),
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_equivalents() {
        assert!(CellValue::Null.is_null());
        assert!(CellValue::Float(f64::NAN).is_null());
        assert!(CellValue::String("".to_string()).is_null());
        assert!(CellValue::String("   \t".to_string()).is_null());
        assert!(!CellValue::String("x".to_string()).is_null());
        assert!(!CellValue::Int(0).is_null());
        assert!(!CellValue::Float(0.0).is_null());
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(CellValue::Int(7).as_f64(), Some(7.0));
        assert_eq!(CellValue::String(" 3.5 ".to_string()).as_f64(), Some(3.5));
        assert_eq!(CellValue::Bool(true).as_f64(), Some(1.0));
        assert_eq!(CellValue::String("abc".to_string()).as_f64(), None);
        assert_eq!(CellValue::Date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()).as_f64(), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(CellValue::Bool(true).is_truthy());
        assert!(!CellValue::Bool(false).is_truthy());
        assert!(CellValue::Int(2).is_truthy());
        assert!(!CellValue::Int(0).is_truthy());
        assert!(!CellValue::Float(0.0).is_truthy());
        assert!(CellValue::List(vec![CellValue::Int(1)]).is_truthy());
        assert!(!CellValue::List(vec![]).is_truthy());
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Null.to_string(), "");
        assert_eq!(CellValue::Int(42).to_string(), "42");
        assert_eq!(
            CellValue::List(vec![
                CellValue::String("a".to_string()),
                CellValue::String("b".to_string()),
            ])
            .to_string(),
            "a, b"
        );
        assert_eq!(
            CellValue::DateRange {
                start: Some("2024-01-01".to_string()),
                end: Some("2024-01-05".to_string()),
                time_zone: None,
            }
            .to_string(),
            "2024-01-01/2024-01-05"
        );
    }
}
