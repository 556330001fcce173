use serde_json::Value;

/// Typed, absence-tolerant lookups over loosely shaped JSON payloads.
///
/// Every accessor walks `path` one object key at a time and yields `None` as soon
/// as a segment is missing, `null`, or of the wrong type. Callers never have to
/// chain `get(..).and_then(..)` by hand or worry about panicking on odd shapes.
pub trait JsonPathExt {
    fn at(&self, path: &[&str]) -> Option<&Value>;

    /// Integer values only; floats and numeric strings are rejected.
    fn int_at(&self, path: &[&str]) -> Option<i64> {
        self.at(path).and_then(Value::as_i64)
    }

    /// Any JSON number, or a string that parses as one.
    fn f64_at(&self, path: &[&str]) -> Option<f64> {
        let v = self.at(path)?;
        if let Some(n) = v.as_f64() {
            return Some(n);
        }
        v.as_str().and_then(|s| s.trim().parse::<f64>().ok())
    }

    fn bool_at(&self, path: &[&str]) -> Option<bool> {
        self.at(path).and_then(Value::as_bool)
    }

    /// Non-empty string values (trimmed).
    fn str_at(&self, path: &[&str]) -> Option<&str> {
        self.at(path)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Objects with at least one key.
    fn object_at(&self, path: &[&str]) -> Option<&Value> {
        self.at(path)
            .filter(|v| v.as_object().is_some_and(|m| !m.is_empty()))
    }
}

impl JsonPathExt for Value {
    fn at(&self, path: &[&str]) -> Option<&Value> {
        let mut cur = self;
        for key in path {
            cur = cur.as_object()?.get(*key)?;
        }
        if cur.is_null() {
            None
        } else {
            Some(cur)
        }
    }
}
