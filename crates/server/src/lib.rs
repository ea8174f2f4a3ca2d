//! Form and json services built on micro-ingest.
//!
//! Three small services share one http listener:
//!
//! - complaints, one of two route sets picked with [`ComplaintRoutes`]:
//!   - by user: `POST /insert`, `POST /update`, `GET /pending`
//!   - by id: `POST /complaints`, `PUT /complaints/{id}`, `GET /pending`
//! - students: `POST /students`, `GET /students`, `DELETE /students/unpaid`,
//!   and the registry form routes `GET /allstudents`, `POST /addstudent`,
//!   `POST /deletenonpayers`
//! - employees: `GET /add-employee?...`
//!
//! Every request first passes through a [`micro_ingest::PipelineGate`], so
//! handlers only ever see a decoded body. Storage goes through the
//! [`DocumentStore`] handle given to the [`App`] at startup.
//!
//! # Example
//!
//! ```no_run
//! use micro_ingest::IngestConfig;
//! use micro_ingest_server::{App, MemoryStore, Server};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = App::builder()
//!         .ingest_config(IngestConfig::builder().max_body_size(100 * 1024).build())
//!         .store(Arc::new(MemoryStore::new()))
//!         .build()?;
//!
//!     Server::builder().address("127.0.0.1:3000".parse()?).app(app).build()?.start().await?;
//!     Ok(())
//! }
//! ```

mod app;
mod error;
mod response;
mod routes;
mod server;
pub mod store;

pub use app::{App, AppBuilder};
pub use error::{ServeError, StoreError};
pub use response::ResponseBody;
pub use routes::{ComplaintRoutes, UnknownComplaintRoutes};
pub use server::{Server, ServerBuilder};
pub use store::{Document, DocumentStore, Filter, MemoryStore};
