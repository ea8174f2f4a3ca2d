//! Customer complaints: file one, update its status, list the pending ones.
//!
//! Two route sets exist. The first keys complaints by `user_name` and uses a
//! lower case `status`. The second stores the submitted form as is, addresses a
//! complaint by its `ComplaintID` and tracks `Status` until it is `Resolved`.

use http::{Response, StatusCode};
use micro_ingest::DecodedBody;
use serde_json::Value;
use tracing::{error, info};

use crate::response::{self, ResponseBody};
use crate::store::{Document, DocumentStore, Filter};

pub(crate) const COLLECTION: &str = "complaints";

const PENDING: &str = "pending";
const RESOLVED: &str = "Resolved";

pub(crate) async fn insert(store: &dyn DocumentStore, body: DecodedBody) -> Response<ResponseBody> {
    let mut complaint = Document::new();
    for field in ["user_name", "issue"] {
        if let Some(value) = body.get(field) {
            complaint.insert(field.to_string(), value.clone());
        }
    }
    complaint.insert("status".to_string(), Value::from(PENDING));

    match store.insert_one(COLLECTION, complaint).await {
        Ok(_) => response::text(StatusCode::OK, "insert successful"),
        Err(e) => {
            error!(cause = %e, "failed to insert complaint");
            response::message(StatusCode::INTERNAL_SERVER_ERROR, "Failed to insert complaint.")
        }
    }
}

/// Sets the status of the first complaint filed by `user_name` and replies
/// with the updated complaint, or `null` when there is none.
pub(crate) async fn update(store: &dyn DocumentStore, body: DecodedBody) -> Response<ResponseBody> {
    let user_name = body.get("user_name").cloned().unwrap_or(Value::Null);
    let status = body.get("status").cloned().unwrap_or(Value::Null);

    let mut update = Document::new();
    update.insert("status".to_string(), status);

    match store.find_one_and_update(COLLECTION, &Filter::Eq("user_name".to_string(), user_name), update).await {
        Ok(updated) => {
            info!(found = updated.is_some(), "update complaint status");
            response::json(StatusCode::OK, &updated)
        }
        Err(e) => {
            error!(cause = %e, "failed to update complaint");
            response::message(StatusCode::INTERNAL_SERVER_ERROR, "Failed to update complaint.")
        }
    }
}

pub(crate) async fn pending(store: &dyn DocumentStore) -> Response<ResponseBody> {
    match store.find(COLLECTION, &Filter::eq("status", PENDING)).await {
        Ok(complaints) => response::json(StatusCode::OK, &complaints),
        Err(e) => {
            error!(cause = %e, "failed to list pending complaints");
            response::message(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch complaints.")
        }
    }
}

/// Stores the submitted complaint unchanged and sends the client back to the form.
pub(crate) async fn create(store: &dyn DocumentStore, body: DecodedBody) -> Response<ResponseBody> {
    match store.insert_one(COLLECTION, body.into_map()).await {
        Ok(_) => response::redirect("/"),
        Err(e) => {
            error!(cause = %e, "failed to create complaint");
            response::text(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create")
        }
    }
}

pub(crate) async fn set_status(store: &dyn DocumentStore, complaint_id: &str, body: DecodedBody) -> Response<ResponseBody> {
    let mut update = Document::new();
    update.insert("Status".to_string(), body.get("Status").cloned().unwrap_or(Value::Null));

    match store.find_one_and_update(COLLECTION, &Filter::eq("ComplaintID", complaint_id), update).await {
        Ok(Some(_)) => response::message(StatusCode::OK, "Updated"),
        Ok(None) => {
            info!(complaint_id, "no complaint to update");
            response::message(StatusCode::NOT_FOUND, "Not found")
        }
        Err(e) => {
            error!(cause = %e, complaint_id, "failed to update complaint");
            response::text(StatusCode::INTERNAL_SERVER_ERROR, "Failed to update")
        }
    }
}

/// Lists every complaint not yet `Resolved`, including those without a `Status`.
pub(crate) async fn open(store: &dyn DocumentStore) -> Response<ResponseBody> {
    match store.find(COLLECTION, &Filter::ne("Status", RESOLVED)).await {
        Ok(complaints) => response::json(StatusCode::OK, &complaints),
        Err(e) => {
            error!(cause = %e, "failed to list open complaints");
            response::text(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch")
        }
    }
}
