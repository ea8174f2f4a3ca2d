//! Employee registration through a query string form.

use http::{Response, StatusCode};
use serde::Deserialize;
use serde_json::{Number, Value};
use tracing::{error, warn};

use super::number::float_prefix;
use crate::response::{self, ResponseBody};
use crate::store::{Document, DocumentStore, Filter};

pub(crate) const COLLECTION: &str = "employees";

/// Employees earning more than this are listed after each registration.
const SALARY_THRESHOLD: f64 = 50_000.0;

#[derive(Deserialize, Debug, Default)]
struct NewEmployee {
    emp_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    hire_date: Option<String>,
    job_title: Option<String>,
    salary: Option<String>,
}

impl NewEmployee {
    fn into_document(self) -> Document {
        let mut document = Document::new();
        let text_fields = [
            ("emp_name", self.emp_name),
            ("email", self.email),
            ("phone", self.phone),
            ("hire_date", self.hire_date),
            ("job_title", self.job_title),
        ];
        for (field, value) in text_fields {
            if let Some(value) = value {
                document.insert(field.to_string(), Value::from(value));
            }
        }

        // a salary that is not a number is kept as null
        let salary = self.salary.as_deref().and_then(float_prefix).and_then(Number::from_f64);
        document.insert("salary".to_string(), salary.map_or(Value::Null, Value::Number));
        document
    }
}

/// Stores the employee described by the query string, then replies with
/// every employee earning more than the threshold.
pub(crate) async fn add(store: &dyn DocumentStore, query: Option<&str>) -> Response<ResponseBody> {
    let employee = match serde_qs::from_str::<NewEmployee>(query.unwrap_or_default()) {
        Ok(employee) => employee,
        Err(e) => {
            warn!(cause = %e, "invalid employee query");
            return response::message(StatusCode::BAD_REQUEST, "invalid query string");
        }
    };

    if let Err(e) = store.insert_one(COLLECTION, employee.into_document()).await {
        error!(cause = %e, "failed to add employee");
        return response::message(StatusCode::INTERNAL_SERVER_ERROR, "Failed to add employee.");
    }

    match store.find(COLLECTION, &Filter::gt("salary", SALARY_THRESHOLD)).await {
        Ok(employees) => response::json(StatusCode::OK, &employees),
        Err(e) => {
            error!(cause = %e, "failed to list employees");
            response::message(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch employees.")
        }
    }
}
