//! Evaluation of search predicates against JSON-shaped records.

use pigment_api::{Operator, Predicate};
use serde_json::Value;

/// Looks up a field, descending into nested objects on `.`.
pub fn field_value<'a>(doc: &'a Value, field: &str) -> Option<&'a Value> {
    field
        .split('.')
        .try_fold(doc, |current, key| current.as_object()?.get(key))
}

fn scalar_eq(a: &Value, b: &Value, ignore_case: bool) -> bool {
    match (a, b) {
        (Value::String(a), Value::String(b)) if ignore_case => a.to_lowercase() == b.to_lowercase(),
        _ => a == b,
    }
}

fn any_of(candidates: &Value, target: &Value, ignore_case: bool) -> bool {
    candidates
        .as_array()
        .map(|values| values.iter().any(|v| scalar_eq(v, target, ignore_case)))
        .unwrap_or(false)
}

pub fn matches(doc: &Value, predicate: &Predicate) -> bool {
    let Some(field) = field_value(doc, &predicate.field) else {
        return false;
    };
    let ignore_case = predicate.ignore_case;

    match predicate.operator {
        Operator::Eq => scalar_eq(field, &predicate.value, ignore_case),
        Operator::In => any_of(&predicate.value, field, ignore_case),
        Operator::ArrayContains => any_of(field, &predicate.value, ignore_case),
        Operator::ArrayContainsAny => match predicate.value.as_array() {
            Some(wanted) => wanted.iter().any(|w| any_of(field, w, ignore_case)),
            None => false,
        },
        Operator::Includes => match (field, &predicate.value) {
            (Value::String(haystack), Value::String(needle)) => {
                if ignore_case {
                    haystack.to_lowercase().contains(&needle.to_lowercase())
                } else {
                    haystack.contains(needle.as_str())
                }
            }
            (Value::Array(_), needle) => any_of(field, needle, ignore_case),
            _ => false,
        },
    }
}

pub fn matches_all(doc: &Value, predicates: &[Predicate]) -> bool {
    predicates.iter().all(|p| matches(doc, p))
}
