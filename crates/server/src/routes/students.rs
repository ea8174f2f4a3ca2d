//! Student exam registrations.
//!
//! Besides the json api on `/students`, a form-post registry stores students
//! with capitalised field names (`Student_name`, `USN`, `Semester`,
//! `Exam_fee`) in the same collection and answers with a redirect.

use chrono::{SecondsFormat, Utc};
use http::{Response, StatusCode};
use micro_ingest::DecodedBody;
use serde_json::{Number, Value};
use tracing::{error, info, warn};

use super::number::{float_prefix, integer_prefix};
use crate::response::{self, ResponseBody};
use crate::store::{Document, DocumentStore, Filter};

pub(crate) const COLLECTION: &str = "students";

const REQUIRED: [&str; 3] = ["student_name", "usn", "semester"];

pub(crate) async fn add(store: &dyn DocumentStore, body: DecodedBody) -> Response<ResponseBody> {
    let missing = body.missing(&REQUIRED);
    if !missing.is_empty() {
        warn!(?missing, "refuse student without required fields");
        return response::message(StatusCode::BAD_REQUEST, "Student Name, USN, and Semester are required.");
    }

    let Some(exam_fee) = exam_fee(body.get("exam_fee")) else {
        return response::message(StatusCode::BAD_REQUEST, "Exam fee must be a number or empty.");
    };

    let mut student = Document::new();
    for field in ["student_name", "usn"] {
        if let Some(value) = body.get(field) {
            student.insert(field.to_string(), value.clone());
        }
    }
    let semester = body.get("semester").and_then(integer_prefix);
    student.insert("semester".to_string(), semester.map_or(Value::Null, Value::from));
    student.insert("exam_fee".to_string(), exam_fee);
    student.insert("submitted_at".to_string(), Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)));

    match store.insert_one(COLLECTION, student).await {
        Ok(stored) => response::json(StatusCode::CREATED, &stored),
        Err(e) => {
            error!(cause = %e, "failed to add student");
            response::message(StatusCode::INTERNAL_SERVER_ERROR, "Failed to add student.")
        }
    }
}

pub(crate) async fn list(store: &dyn DocumentStore) -> Response<ResponseBody> {
    match store.find(COLLECTION, &Filter::All).await {
        Ok(students) => response::json(StatusCode::OK, &students),
        Err(e) => {
            error!(cause = %e, "failed to fetch students");
            response::message(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch students.")
        }
    }
}

/// Removes every student whose exam fee is zero or null.
pub(crate) async fn delete_unpaid(store: &dyn DocumentStore) -> Response<ResponseBody> {
    let unpaid = Filter::Or(vec![Filter::eq("exam_fee", 0), Filter::eq("exam_fee", Value::Null)]);

    match store.delete_many(COLLECTION, &unpaid).await {
        Ok(deleted) => {
            info!(deleted, "deleted unpaid students");
            let message = format!("{deleted} students who did not pay the exam fee were deleted.");
            response::message(StatusCode::OK, &message)
        }
        Err(e) => {
            error!(cause = %e, "failed to delete unpaid students");
            response::message(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete unpaid students.")
        }
    }
}

/// Lists every student, for the registry page.
pub(crate) async fn list_all(store: &dyn DocumentStore) -> Response<ResponseBody> {
    match store.find(COLLECTION, &Filter::All).await {
        Ok(students) => response::json(StatusCode::OK, &students),
        Err(e) => {
            error!(cause = %e, "failed to fetch students");
            response::message(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch students")
        }
    }
}

/// Registers a student from the registry form. Nothing is required; a
/// semester or fee that is not a number is stored as null, and so is a fee
/// of zero.
pub(crate) async fn register(store: &dyn DocumentStore, body: DecodedBody) -> Response<ResponseBody> {
    let mut student = Document::new();
    for field in ["Student_name", "USN"] {
        student.insert(field.to_string(), body.get(field).cloned().unwrap_or(Value::Null));
    }
    let semester = body.get("Semester").and_then(integer_prefix);
    let exam_fee = body.get("Exam_fee").filter(|fee| is_filled(fee)).and_then(integer_prefix);
    student.insert("Semester".to_string(), semester.map_or(Value::Null, Value::from));
    student.insert("Exam_fee".to_string(), exam_fee.map_or(Value::Null, Value::from));

    match store.insert_one(COLLECTION, student).await {
        Ok(_) => response::redirect("/"),
        Err(e) => {
            error!(cause = %e, "failed to register student");
            response::text(StatusCode::INTERNAL_SERVER_ERROR, "Failed to add student")
        }
    }
}

/// Removes the students whose `Exam_fee` is zero or null.
pub(crate) async fn delete_non_payers(store: &dyn DocumentStore) -> Response<ResponseBody> {
    let non_payers = Filter::Or(vec![Filter::eq("Exam_fee", 0), Filter::eq("Exam_fee", Value::Null)]);

    match store.delete_many(COLLECTION, &non_payers).await {
        Ok(deleted) => {
            info!(deleted, "deleted non-paying students");
            response::redirect("/")
        }
        Err(e) => {
            error!(cause = %e, "failed to delete non-paying students");
            response::text(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete students")
        }
    }
}

/// False for the values a form leaves behind when a field is not filled in:
/// nothing, an empty string, zero or `false`.
fn is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// The stored exam fee: `null` for an empty string, otherwise the finite number
/// the value starts with. `None` when the value is neither.
fn exam_fee(value: Option<&Value>) -> Option<Value> {
    match value? {
        Value::String(s) if s.is_empty() => Some(Value::Null),
        Value::String(s) => float_prefix(s).and_then(Number::from_f64).map(Value::Number),
        Value::Number(n) => Some(Value::Number(n.clone())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn exam_fee_values() {
        assert_eq!(exam_fee(Some(&json!(""))), Some(Value::Null));
        assert_eq!(exam_fee(Some(&json!("1500"))), Some(json!(1500.0)));
        assert_eq!(exam_fee(Some(&json!(" 0.5 "))), Some(json!(0.5)));
        assert_eq!(exam_fee(Some(&json!("1500rs"))), Some(json!(1500.0)));
        assert_eq!(exam_fee(Some(&json!(0))), Some(json!(0)));

        assert_eq!(exam_fee(Some(&json!("free"))), None);
        assert_eq!(exam_fee(Some(&json!("inf"))), None);
        assert_eq!(exam_fee(Some(&Value::Null)), None);
        assert_eq!(exam_fee(None), None);
    }

    #[test]
    fn unfilled_form_values() {
        assert!(!is_filled(&json!("")));
        assert!(!is_filled(&json!(0)));
        assert!(!is_filled(&Value::Null));
        assert!(is_filled(&json!("0")));
        assert!(is_filled(&json!(1200)));
    }
}
