//! Named value transforms used inside [`Pattern`](crate::Pattern) chains.
//!
//! A transform either maps a value or returns `None`, which the pattern
//! reads as "no match". Parse failures are therefore rejections, never
//! errors.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

type TransformFn = dyn Fn(&Value) -> Option<Value> + Send + Sync;

/// A fallible value mapping with a name for debugging.
#[derive(Clone)]
pub struct Transform {
    name: Cow<'static, str>,
    f: Arc<TransformFn>,
}

impl Transform {
    /// Wrap a closure.
    pub fn new<F>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    /// The transform's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Apply to a value.
    pub fn apply(&self, value: &Value) -> Option<Value> {
        (self.f)(value)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Transform").field(&self.name).finish()
    }
}

/// Parse a string as a base-10 `i64`. Surrounding whitespace is ignored.
pub fn integer() -> Transform {
    Transform::new("integer", |v| {
        v.as_str()?.trim().parse::<i64>().ok().map(Value::from)
    })
}

/// Parse a string as a finite `f64`. Surrounding whitespace is ignored.
/// `NaN` and infinities have no JSON representation and do not match.
pub fn float() -> Transform {
    Transform::new("float", |v| {
        let n = v.as_str()?.trim().parse::<f64>().ok()?;
        serde_json::Number::from_f64(n).map(Value::Number)
    })
}

/// Parse a date with a chrono format string. Stored as `YYYY-MM-DD`.
pub fn date(format: &'static str) -> Transform {
    Transform::new(format!("date({format})"), move |v| {
        let d = NaiveDate::parse_from_str(v.as_str()?.trim(), format).ok()?;
        serde_json::to_value(d).ok()
    })
}

/// Parse a date-time with a chrono format string. Stored in ISO 8601.
pub fn datetime(format: &'static str) -> Transform {
    Transform::new(format!("datetime({format})"), move |v| {
        let dt = NaiveDateTime::parse_from_str(v.as_str()?.trim(), format).ok()?;
        serde_json::to_value(dt).ok()
    })
}

/// Parse a time of day with a chrono format string. Stored as `HH:MM:SS`.
pub fn time(format: &'static str) -> Transform {
    Transform::new(format!("time({format})"), move |v| {
        let t = NaiveTime::parse_from_str(v.as_str()?.trim(), format).ok()?;
        serde_json::to_value(t).ok()
    })
}

/// Last element of an array; non-arrays and empty arrays pass through.
/// Photo payloads list sizes smallest first, so this picks the largest.
pub fn last() -> Transform {
    Transform::new("last", |v| match v {
        Value::Array(items) => Some(items.last().unwrap_or(v).clone()),
        other => Some(other.clone()),
    })
}

/// Trim surrounding whitespace from a string.
pub fn trim() -> Transform {
    Transform::new("trim", |v| Some(Value::from(v.as_str()?.trim())))
}

/// Lowercase a string.
pub fn lowercase() -> Transform {
    Transform::new("lowercase", |v| Some(Value::from(v.as_str()?.to_lowercase())))
}

/// Character count of a string.
pub fn char_count() -> Transform {
    Transform::new("char_count", |v| {
        Some(Value::from(v.as_str()?.chars().count()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integer_parses_signed_and_trims() {
        let t = integer();
        assert_eq!(t.apply(&json!(" 42 ")), Some(json!(42)));
        assert_eq!(t.apply(&json!("-7")), Some(json!(-7)));
        assert_eq!(t.apply(&json!("+5")), Some(json!(5)));
        assert_eq!(t.apply(&json!("0")), Some(json!(0)));
    }

    #[test]
    fn integer_rejects_garbage_and_non_strings() {
        let t = integer();
        assert_eq!(t.apply(&json!("abc")), None);
        assert_eq!(t.apply(&json!("4.2")), None);
        assert_eq!(t.apply(&json!("99999999999999999999")), None);
        assert_eq!(t.apply(&json!(42)), None);
    }

    #[test]
    fn float_rejects_non_finite() {
        let t = float();
        assert_eq!(t.apply(&json!("2.5")), Some(json!(2.5)));
        assert_eq!(t.apply(&json!("1e3")), Some(json!(1000.0)));
        assert_eq!(t.apply(&json!("NaN")), None);
        assert_eq!(t.apply(&json!("inf")), None);
        assert_eq!(t.apply(&json!("two")), None);
    }

    #[test]
    fn date_formats_are_canonicalized() {
        let t = date("%d.%m.%Y");
        assert_eq!(t.apply(&json!("31.01.2024")), Some(json!("2024-01-31")));
        assert_eq!(t.apply(&json!("31.02.2024")), None);
        assert_eq!(t.apply(&json!("2024-01-31")), None);
    }

    #[test]
    fn datetime_and_time() {
        let dt = datetime("%d.%m.%Y %H:%M");
        assert_eq!(
            dt.apply(&json!("05.03.2024 14:30")),
            Some(json!("2024-03-05T14:30:00"))
        );
        let t = time("%H:%M");
        assert_eq!(t.apply(&json!("09:15")), Some(json!("09:15:00")));
        assert_eq!(t.apply(&json!("25:00")), None);
    }

    #[test]
    fn last_picks_final_element() {
        let t = last();
        assert_eq!(t.apply(&json!([1, 2, 3])), Some(json!(3)));
        assert_eq!(t.apply(&json!([])), None);
        assert_eq!(t.apply(&json!({"id": 1})), Some(json!({"id": 1})));
    }

    #[test]
    fn string_helpers() {
        assert_eq!(trim().apply(&json!("  hi ")), Some(json!("hi")));
        assert_eq!(lowercase().apply(&json!("YES")), Some(json!("yes")));
        assert_eq!(char_count().apply(&json!("héllo")), Some(json!(5)));
        assert_eq!(trim().apply(&json!(1)), None);
    }

    #[test]
    fn debug_shows_name() {
        assert_eq!(format!("{:?}", integer()), "Transform(\"integer\")");
    }
}
