//! The service endpoints and the tables that map them to paths.

mod complaints;
mod employees;
mod number;
mod students;

use std::fmt;
use std::str::FromStr;

use http::{Method, Response};
use micro_ingest::IngestedRequest;
use thiserror::Error;

use crate::response::ResponseBody;
use crate::store::DocumentStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Endpoint {
    InsertComplaint,
    UpdateComplaint,
    PendingComplaints,
    CreateComplaint,
    SetComplaintStatus,
    OpenComplaints,
    AddStudent,
    ListStudents,
    DeleteUnpaidStudents,
    ListAllStudents,
    RegisterStudent,
    DeleteNonPayers,
    AddEmployee,
}

type Route = (&'static str, Method, Endpoint);

const COMPLAINTS_BY_USER: [Route; 3] = [
    ("/insert", Method::POST, Endpoint::InsertComplaint),
    ("/update", Method::POST, Endpoint::UpdateComplaint),
    ("/pending", Method::GET, Endpoint::PendingComplaints),
];

const COMPLAINTS_BY_ID: [Route; 3] = [
    ("/complaints", Method::POST, Endpoint::CreateComplaint),
    ("/complaints/{id}", Method::PUT, Endpoint::SetComplaintStatus),
    ("/pending", Method::GET, Endpoint::OpenComplaints),
];

/// Served whatever the complaint routes are.
const SHARED: [Route; 7] = [
    ("/students", Method::POST, Endpoint::AddStudent),
    ("/students", Method::GET, Endpoint::ListStudents),
    ("/students/unpaid", Method::DELETE, Endpoint::DeleteUnpaidStudents),
    ("/allstudents", Method::GET, Endpoint::ListAllStudents),
    ("/addstudent", Method::POST, Endpoint::RegisterStudent),
    ("/deletenonpayers", Method::POST, Endpoint::DeleteNonPayers),
    ("/add-employee", Method::GET, Endpoint::AddEmployee),
];

/// Which complaint service is mounted. Both answer `GET /pending`, so only
/// one of them can be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComplaintRoutes {
    /// `POST /insert`, `POST /update` and `GET /pending`, keyed by `user_name`
    #[default]
    ByUser,
    /// `POST /complaints`, `PUT /complaints/{id}` and `GET /pending`, keyed by `ComplaintID`
    ById,
}

impl ComplaintRoutes {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintRoutes::ByUser => "by-user",
            ComplaintRoutes::ById => "by-id",
        }
    }

    /// Every route served with this complaint service: path, method and endpoint.
    pub(crate) fn routes(self) -> impl Iterator<Item = Route> {
        let complaints = match self {
            ComplaintRoutes::ByUser => COMPLAINTS_BY_USER,
            ComplaintRoutes::ById => COMPLAINTS_BY_ID,
        };
        complaints.into_iter().chain(SHARED)
    }
}

impl fmt::Display for ComplaintRoutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown complaint routes `{0}`, expected `by-user` or `by-id`")]
pub struct UnknownComplaintRoutes(String);

impl FromStr for ComplaintRoutes {
    type Err = UnknownComplaintRoutes;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "by-user" => Ok(ComplaintRoutes::ByUser),
            "by-id" => Ok(ComplaintRoutes::ById),
            other => Err(UnknownComplaintRoutes(other.to_string())),
        }
    }
}

impl Endpoint {
    /// Serves an ingested request. A request whose body was skipped is
    /// served as if it had an empty body.
    ///
    /// `id` is the `{id}` path segment of the matched route, if it has one.
    pub(crate) async fn serve(
        self,
        store: &dyn DocumentStore,
        id: Option<&str>,
        request: IngestedRequest,
    ) -> Response<ResponseBody> {
        let query = request.uri().query().map(str::to_string);
        let body = request.into_body().unwrap_or_default();

        match self {
            Endpoint::InsertComplaint => complaints::insert(store, body).await,
            Endpoint::UpdateComplaint => complaints::update(store, body).await,
            Endpoint::PendingComplaints => complaints::pending(store).await,
            Endpoint::CreateComplaint => complaints::create(store, body).await,
            Endpoint::SetComplaintStatus => complaints::set_status(store, id.unwrap_or_default(), body).await,
            Endpoint::OpenComplaints => complaints::open(store).await,
            Endpoint::AddStudent => students::add(store, body).await,
            Endpoint::ListStudents => students::list(store).await,
            Endpoint::DeleteUnpaidStudents => students::delete_unpaid(store).await,
            Endpoint::ListAllStudents => students::list_all(store).await,
            Endpoint::RegisterStudent => students::register(store, body).await,
            Endpoint::DeleteNonPayers => students::delete_non_payers(store).await,
            Endpoint::AddEmployee => employees::add(store, query.as_deref()).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complaint_routes_from_str() {
        assert_eq!("by-user".parse(), Ok(ComplaintRoutes::ByUser));
        assert_eq!("by-id".parse(), Ok(ComplaintRoutes::ById));
        assert_eq!("by-id".parse::<ComplaintRoutes>().unwrap().to_string(), "by-id");
        assert!("complaints".parse::<ComplaintRoutes>().is_err());
    }

    #[test]
    fn pending_is_mounted_once() {
        for set in [ComplaintRoutes::ByUser, ComplaintRoutes::ById] {
            let pending = set.routes().filter(|(path, method, _)| *path == "/pending" && *method == Method::GET).count();
            assert_eq!(pending, 1, "{set}");
        }
    }
}
