use serde_json::Value;

use super::Document;

/// Selects documents within a collection.
///
/// Equality against [`Value::Null`] also matches documents that lack the
/// field, and [`Filter::Ne`] is its exact negation. Numbers compare by value,
/// so `0` matches `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All,
    Eq(String, Value),
    Ne(String, Value),
    /// The field is a number strictly greater than the bound
    Gt(String, f64),
    Or(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq(field.into(), value.into())
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Ne(field.into(), value.into())
    }

    pub fn gt(field: impl Into<String>, bound: f64) -> Self {
        Filter::Gt(field.into(), bound)
    }

    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq(field, expected) => field_equals(document, field, expected),
            Filter::Ne(field, expected) => !field_equals(document, field, expected),
            Filter::Gt(field, bound) => document.get(field).and_then(Value::as_f64).is_some_and(|n| n > *bound),
            Filter::Or(filters) => filters.iter().any(|filter| filter.matches(document)),
        }
    }
}

fn field_equals(document: &Document, field: &str, expected: &Value) -> bool {
    match (document.get(field), expected) {
        (actual, Value::Null) => actual.is_none_or(Value::is_null),
        (Some(actual), expected) => same_value(actual, expected),
        (None, _) => false,
    }
}

fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn null_matches_missing_field() {
        let filter = Filter::eq("exam_fee", Value::Null);
        assert!(filter.matches(&doc(json!({"usn": "1"}))));
        assert!(filter.matches(&doc(json!({"exam_fee": null}))));
        assert!(!filter.matches(&doc(json!({"exam_fee": 10}))));
    }

    #[test]
    fn not_equal_includes_missing_field() {
        let filter = Filter::ne("Status", "Resolved");
        assert!(filter.matches(&doc(json!({"Status": "Open"}))));
        assert!(filter.matches(&doc(json!({"ComplaintID": "7"}))));
        assert!(!filter.matches(&doc(json!({"Status": "Resolved"}))));
    }

    #[test]
    fn numbers_compare_by_value() {
        let filter = Filter::eq("exam_fee", 0);
        assert!(filter.matches(&doc(json!({"exam_fee": 0.0}))));
        assert!(!filter.matches(&doc(json!({"exam_fee": "0"}))));
    }

    #[test]
    fn greater_than_skips_non_numbers() {
        let filter = Filter::gt("salary", 50000.0);
        assert!(filter.matches(&doc(json!({"salary": 72000.5}))));
        assert!(!filter.matches(&doc(json!({"salary": 50000}))));
        assert!(!filter.matches(&doc(json!({"salary": "90000"}))));
        assert!(!filter.matches(&doc(json!({}))));
    }

    #[test]
    fn or_matches_any() {
        let filter = Filter::Or(vec![Filter::eq("status", "pending"), Filter::eq("status", "open")]);
        assert!(filter.matches(&doc(json!({"status": "open"}))));
        assert!(!filter.matches(&doc(json!({"status": "closed"}))));
        assert!(!Filter::Or(vec![]).matches(&doc(json!({}))));
    }
}
