//! Primitive type inference for field values.
//!
//! Every primitive seen under a field is recorded as an [`Observed`] value in
//! an append-only multiset owned by the field; the field's type is recomputed
//! from that multiset through [`TypeLattice`] whenever it is asked for.
//!
//! - `null` and empty arrays contribute nothing.
//! - Arrays are flattened: nested arrays feed their elements into the same set.
//! - Objects are not observations; the class graph handles them.
pub mod lattice;
pub mod num;

use ordered_float::OrderedFloat;
use serde_json::Value;

pub use lattice::TypeLattice;

// ------------------------------ Observations ------------------------------ //

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Observed {
    Bool(bool),
    Whole(i128),
    Fraction(OrderedFloat<f64>),
    Text(String),
}

impl Observed {
    /// The observation carried by a primitive JSON value, if any.
    pub fn from_value(v: &Value) -> Option<Self> {
        match v {
            Value::Bool(b) => Some(Observed::Bool(*b)),
            Value::Number(n) => Some(num::observe_number(n)),
            Value::String(s) => Some(Observed::Text(s.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

/// Shape of one JSON value as far as a field is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shape {
    pub is_array: bool,
    /// At least one object was found (directly or inside the array).
    pub has_object: bool,
}

/// Collect the primitive observations of `v` into `out` and report its shape.
pub fn observe_value(v: &Value, out: &mut Vec<Observed>) -> Shape {
    match v {
        Value::Array(xs) => {
            let mut has_object = false;
            for el in xs {
                has_object |= observe_value(el, out).has_object;
            }
            Shape { is_array: true, has_object }
        }
        Value::Object(_) => Shape { is_array: false, has_object: true },
        other => {
            out.extend(Observed::from_value(other));
            Shape { is_array: false, has_object: false }
        }
    }
}

/// Every object reachable through `v` by descending into arrays, in order.
pub fn objects_in(v: &Value) -> Vec<&serde_json::Map<String, Value>> {
    let mut out = Vec::new();
    collect_objects(v, &mut out);
    out
}

fn collect_objects<'a>(v: &'a Value, out: &mut Vec<&'a serde_json::Map<String, Value>>) {
    match v {
        Value::Object(m) => out.push(m),
        Value::Array(xs) => xs.iter().for_each(|x| collect_objects(x, out)),
        _ => {}
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_arrays_flatten_into_one_set() {
        let mut seen = Vec::new();
        let shape = observe_value(&json!([[1, 2], [3], []]), &mut seen);
        assert!(shape.is_array);
        assert!(!shape.has_object);
        assert_eq!(seen, vec![Observed::Whole(1), Observed::Whole(2), Observed::Whole(3)]);
    }

    #[test]
    fn null_and_empty_array_contribute_nothing() {
        let mut seen = Vec::new();
        observe_value(&Value::Null, &mut seen);
        let shape = observe_value(&json!([]), &mut seen);
        assert!(seen.is_empty());
        assert!(shape.is_array);
    }

    #[test]
    fn objects_are_found_through_arrays() {
        let v = json!([{"a": 1}, [{"b": 2}], 3]);
        let found = objects_in(&v);
        assert_eq!(found.len(), 2);
        assert!(found[1].contains_key("b"));
    }
}
