//! Structural comparison for `=`, `!`, `<` and `>`

use crate::value::Value;

/// Deep equality. With `allow_superset`, `a` may carry keys (or trailing
/// items) that `b` lacks, at every level. An empty operand is never
/// equal to anything.
pub fn deep_equal(a: &Value, b: &Value, allow_superset: bool) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    equal_values(a, b, allow_superset)
}

/// `a` contains everything in `b` and something more
pub fn is_proper_superset(a: &Value, b: &Value) -> bool {
    deep_equal(a, b, true) && !deep_equal(a, b, false)
}

fn equal_values(a: &Value, b: &Value, allow_superset: bool) -> bool {
    match (a, b) {
        (Value::Empty, Value::Empty) => true,
        (Value::Array(left), Value::Array(right)) => {
            let shape_ok = if allow_superset {
                right.len() <= left.len()
            } else {
                right.len() == left.len()
            };
            shape_ok
                && left
                    .iter()
                    .zip(right)
                    .all(|(x, y)| equal_values(x, y, allow_superset))
        }
        (Value::Object(left), Value::Object(right)) => {
            if !allow_superset && left.len() != right.len() {
                return false;
            }
            right.iter().all(|(key, y)| {
                left.get(key)
                    .map_or(false, |x| equal_values(x, y, allow_superset))
            })
        }
        (Value::Element(left), Value::Element(right)) => left == right,
        (Value::Number(left), Value::Number(right)) => left == right,
        (Value::String(left), Value::String(right)) => left == right,
        (Value::Boolean(left), Value::Boolean(right)) => left == right,
        _ => false,
    }
}
