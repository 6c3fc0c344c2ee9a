// Helpers for reading loosely-typed JSON records
use serde_json::Value;

/// Reads the first of `keys` that holds a usable value.
///
/// Every key but the last is skipped when its value is falsy (null, `false`,
/// `0`, `""`); the last key only needs to be non-null. Values that `read`
/// rejects fall through to the next key.
pub fn first_present<'a, T>(
    record: &'a Value,
    keys: &[&str],
    read: impl Fn(&'a Value) -> Option<T>,
) -> Option<T> {
    let last = keys.len().checked_sub(1)?;
    keys.iter().enumerate().find_map(|(index, key)| {
        let value = record.get(*key)?;
        let present = if index == last { !value.is_null() } else { is_truthy(value) };
        if present { read(value) } else { None }
    })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Reads an integer field. Numeric strings are accepted, floats are truncated.
pub fn int_field(record: &Value, key: &str) -> Option<i64> {
    record.get(key).and_then(as_int)
}

/// Integral numbers only; `12.0` counts, `1.5` does not.
pub fn as_integral(value: &Value) -> Option<i64> {
    let Value::Number(n) = value else {
        return None;
    };
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// Textual form of a code for synthesized names; missing or null is `None`.
pub fn code_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "None".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => match as_integral(other) {
            Some(code) => code.to_string(),
            None => other.to_string(),
        },
    }
}

pub fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reads a string field, rendering numbers as text. Missing or null gives `None`.
pub fn string_field(record: &Value, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Like [`string_field`] but falls back to `default`.
pub fn string_or(record: &Value, key: &str, default: &str) -> String {
    string_field(record, key).unwrap_or_else(|| default.to_string())
}

/// Iterates a list field; anything that is not a list yields nothing.
pub fn list_field<'a>(record: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    record
        .get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: &Value) -> Option<Value> {
        Some(value.clone())
    }

    #[test]
    fn first_present_skips_falsy_values() {
        let record = json!({"modelId": "", "flageID": null, "id": 7});
        assert_eq!(first_present(&record, &["modelId", "flageID", "id"], raw), Some(json!(7)));
    }

    #[test]
    fn first_present_respects_key_order() {
        let record = json!({"vendorID": 1, "vendorId": 2});
        assert_eq!(first_present(&record, &["vendorID", "vendorId"], raw), Some(json!(1)));
        assert_eq!(first_present(&record, &["vendorId", "vendorID"], raw), Some(json!(2)));
    }

    #[test]
    fn last_key_only_needs_to_be_non_null() {
        let record = json!({"vendorID": 0, "vendorId": 0});
        assert_eq!(first_present(&record, &["vendorID", "vendorId"], raw), Some(json!(0)));

        let record = json!({"vendorID": 0});
        assert_eq!(first_present(&record, &["vendorID", "vendorId"], raw), None);

        let record = json!({"vendorID": 3, "vendorId": null});
        assert_eq!(first_present(&record, &["vendorId"], raw), None);
    }

    #[test]
    fn rejected_values_fall_through() {
        let record = json!({"modelId": 1.5, "id": 7});
        assert_eq!(first_present(&record, &["modelId", "id"], as_integral), Some(7));
    }

    #[test]
    fn first_present_without_keys() {
        assert_eq!(first_present(&json!({"a": 1}), &[], raw), None);
    }

    #[test]
    fn integral_floats_are_integers() {
        assert_eq!(as_integral(&json!(12.0)), Some(12));
        assert_eq!(as_integral(&json!(-4)), Some(-4));
        assert_eq!(as_integral(&json!(1.5)), None);
        assert_eq!(as_integral(&json!("12")), None);
    }

    #[test]
    fn code_text_keeps_raw_form() {
        assert_eq!(code_text(Some(&json!(999))), "999");
        assert_eq!(code_text(Some(&json!(4.0))), "4");
        assert_eq!(code_text(Some(&json!("999"))), "999");
        assert_eq!(code_text(Some(&json!(2.5))), "2.5");
        assert_eq!(code_text(Some(&Value::Null)), "None");
        assert_eq!(code_text(None), "None");
    }

    #[test]
    fn int_field_accepts_numeric_strings() {
        let record = json!({"a": "12", "b": 3.9, "c": "x"});
        assert_eq!(int_field(&record, "a"), Some(12));
        assert_eq!(int_field(&record, "b"), Some(3));
        assert_eq!(int_field(&record, "c"), None);
        assert_eq!(int_field(&record, "missing"), None);
    }

    #[test]
    fn list_field_ignores_non_lists() {
        let record = json!({"items": {"a": 1}});
        assert_eq!(list_field(&record, "items").count(), 0);
    }
}
