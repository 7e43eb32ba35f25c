use crate::value::Value;

/// Deep right-biased merge. Arrays merge index by index and keep the
/// longer tail; objects take the key union, merging shared keys. Any
/// other pairing is a replacement by `second`.
pub fn merge(first: &Value, second: &Value) -> Value {
    match (first, second) {
        (Value::Array(left), Value::Array(right)) => {
            let length = left.len().max(right.len());
            let mut merged = Vec::with_capacity(length);
            for index in 0..length {
                match (left.get(index), right.get(index)) {
                    (Some(a), Some(b)) => merged.push(merge(a, b)),
                    (Some(only), None) | (None, Some(only)) => merged.push(only.clone()),
                    (None, None) => {}
                }
            }
            Value::Array(merged)
        }
        (Value::Object(left), Value::Object(right)) => {
            let mut merged = left.clone();
            for (key, value) in right {
                let entry = match left.get(key) {
                    Some(existing) => merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), entry);
            }
            Value::Object(merged)
        }
        _ => second.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_objects_right_biased() {
        let merged = merge(
            &Value::from(json!({"keep": 1, "overwrite": 2})),
            &Value::from(json!({"overwrite": 3, "add": 4})),
        );
        assert_eq!(merged, Value::from(json!({"keep": 1, "overwrite": 3, "add": 4})));
    }

    #[test]
    fn test_merge_nested() {
        let merged = merge(
            &Value::from(json!({"a": {"b": 1, "c": [1, 2, 3]}})),
            &Value::from(json!({"a": {"d": 2, "c": [4]}})),
        );
        assert_eq!(
            merged,
            Value::from(json!({"a": {"b": 1, "c": [4, 2, 3], "d": 2}}))
        );
    }

    #[test]
    fn test_merge_mismatched_shapes_replace() {
        assert_eq!(
            merge(&Value::from(3.0), &Value::from(json!({"key": 3}))),
            Value::from(json!({"key": 3}))
        );
        assert_eq!(
            merge(&Value::from(json!([1])), &Value::from(json!({"a": 1}))),
            Value::from(json!({"a": 1}))
        );
    }
}
