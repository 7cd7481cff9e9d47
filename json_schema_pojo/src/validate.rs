//! Checks JSON instances against validation directives.
//!
//! Follows bean-validation semantics: a missing or null value satisfies every
//! constraint except `NotNull`, sizes apply to strings, arrays and objects, and
//! a pattern must match the whole string.

use serde_json::Value;

use crate::annotate::{Decorations, Directive, DirectiveTarget};
use crate::model::{TypeGraph, TypeId, TypeRef};

/// A failed constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    /// Dotted property path, with `[i]` for collection elements.
    pub path: String,
    pub message: String,
}

/// Checks one value against the directives of its property.
#[must_use]
pub fn check(directives: &[Directive], path: &str, value: Option<&Value>) -> Vec<ConstraintViolation> {
    let present: Option<&Value> = value.filter(|v| !v.is_null());
    directives
        .iter()
        .filter_map(|directive| match (directive, present) {
            (Directive::NotNull, None) => Some("must not be null".to_string()),
            (_, None) => None,
            (Directive::DecimalMin { value: bound, inclusive }, Some(v)) => {
                out_of_bound(v, bound, *inclusive, Side::Lower)
            }
            (Directive::DecimalMax { value: bound, inclusive }, Some(v)) => {
                out_of_bound(v, bound, *inclusive, Side::Upper)
            }
            (Directive::Size { min, max }, Some(v)) => size_violation(v, *min, *max),
            (Directive::Pattern(pattern), Some(v)) => pattern_violation(v, pattern),
            _ => None,
        })
        .map(|message| ConstraintViolation {
            path: path.to_string(),
            message,
        })
        .collect()
}

/// Checks an instance of a generated type, cascading where a `Valid`
/// directive is attached.
#[must_use]
pub fn check_instance(
    graph: &TypeGraph,
    decorations: &Decorations,
    id: TypeId,
    instance: &Value,
) -> Vec<ConstraintViolation> {
    let mut violations: Vec<ConstraintViolation> = Vec::new();
    walk(graph, decorations, id, instance, "", &mut violations);
    violations
}

fn walk(
    graph: &TypeGraph,
    decorations: &Decorations,
    id: TypeId,
    instance: &Value,
    prefix: &str,
    violations: &mut Vec<ConstraintViolation>,
) {
    let ty = graph.get(id);
    if let Some(TypeRef::Generated(parent)) = &ty.supertype {
        walk(graph, decorations, *parent, instance, prefix, violations);
    }
    for (index, property) in ty.properties.iter().enumerate() {
        let path: String = if prefix.is_empty() {
            property.json_key.clone()
        } else {
            format!("{prefix}.{}", property.json_key)
        };
        let directives: &[Directive] = decorations.on(DirectiveTarget::Property(id, index));
        let value: Option<&Value> = instance.get(&property.json_key);
        violations.extend(check(directives, &path, value));

        let Some(target) = property.type_ref.generated() else {
            continue;
        };
        if !directives.contains(&Directive::Valid) {
            continue;
        }
        match value {
            Some(Value::Array(items)) if property.type_ref.is_collection() => {
                for (i, item) in items.iter().enumerate() {
                    walk(graph, decorations, target, item, &format!("{path}[{i}]"), violations);
                }
            }
            Some(nested @ Value::Object(_)) => walk(graph, decorations, target, nested, &path, violations),
            _ => {}
        }
    }
}

#[derive(Clone, Copy)]
enum Side {
    Lower,
    Upper,
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn out_of_bound(value: &Value, bound: &str, inclusive: bool, side: Side) -> Option<String> {
    let actual: f64 = numeric(value)?;
    let limit: f64 = bound.parse().ok()?;
    let (fails, relation): (bool, &str) = match (side, inclusive) {
        (Side::Lower, true) => (actual < limit, "greater than or equal to"),
        (Side::Lower, false) => (actual <= limit, "greater than"),
        (Side::Upper, true) => (actual > limit, "less than or equal to"),
        (Side::Upper, false) => (actual >= limit, "less than"),
    };
    fails.then(|| format!("must be {relation} {bound}"))
}

fn size_violation(value: &Value, min: Option<u64>, max: Option<u64>) -> Option<String> {
    let len: usize = match value {
        Value::Array(items) => items.len(),
        Value::String(text) => text.chars().count(),
        Value::Object(members) => members.len(),
        _ => return None,
    };
    let len: u64 = u64::try_from(len).unwrap_or(u64::MAX);
    let fails: bool = min.is_some_and(|m| len < m) || max.is_some_and(|m| len > m);
    fails.then(|| {
        let upper: String = max.map_or_else(|| "unbounded".to_string(), |m| m.to_string());
        format!("size must be between {} and {upper}", min.unwrap_or(0))
    })
}

fn pattern_violation(value: &Value, pattern: &str) -> Option<String> {
    let Value::String(text) = value else {
        return None;
    };
    match regress::Regex::new(&format!("^(?:{pattern})$")) {
        Ok(regex) => regex
            .find(text)
            .is_none()
            .then(|| format!("must match \"{pattern}\"")),
        Err(e) => Some(format!("pattern \"{pattern}\" does not compile: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn count(directives: &[Directive], value: &Value) -> usize {
        check(directives, "p", Some(value)).len()
    }

    #[test]
    fn inclusive_minimum() {
        let min = [Directive::DecimalMin {
            value: "1".to_string(),
            inclusive: true,
        }];
        assert_eq!(count(&min, &json!(0.9)), 1);
        assert_eq!(count(&min, &json!(1)), 0);
        assert_eq!(count(&min, &json!(2.0)), 0);
    }

    #[test]
    fn exclusive_maximum() {
        let max = [Directive::DecimalMax {
            value: "10".to_string(),
            inclusive: false,
        }];
        assert_eq!(count(&max, &json!(10)), 1);
        assert_eq!(count(&max, &json!(9.5)), 0);
    }

    #[test]
    fn size_bounds_on_collections() {
        let size = [Directive::Size {
            min: Some(3),
            max: Some(5),
        }];
        assert_eq!(count(&size, &json!([1, 2])), 1);
        assert_eq!(count(&size, &json!([1, 2, 3])), 0);
        assert_eq!(count(&size, &json!([1, 2, 3, 4, 5])), 0);
        assert_eq!(count(&size, &json!([1, 2, 3, 4, 5, 6])), 1);
        assert_eq!(count(&size, &json!("ab")), 1);
    }

    #[test]
    fn null_passes_everything_but_not_null() {
        let directives = [
            Directive::DecimalMin {
                value: "1".to_string(),
                inclusive: true,
            },
            Directive::Pattern("a+".to_string()),
        ];
        assert!(check(&directives, "p", None).is_empty());
        assert!(check(&directives, "p", Some(&Value::Null)).is_empty());
        let violations = check(&[Directive::NotNull], "p", Some(&Value::Null));
        assert_eq!(
            violations,
            vec![ConstraintViolation {
                path: "p".to_string(),
                message: "must not be null".to_string()
            }]
        );
        assert_eq!(count(&[Directive::NotNull], &json!("x")), 0);
    }

    #[test]
    fn pattern_matches_whole_string() {
        let pattern = [Directive::Pattern("[a-z]+".to_string())];
        assert_eq!(count(&pattern, &json!("abc")), 0);
        assert_eq!(count(&pattern, &json!("abc1")), 1);
        assert_eq!(count(&[Directive::Pattern("(".to_string())], &json!("x")), 1);
    }
}
