//! Request body ingestion for asynchronous http servers
//!
//! This crate turns the streamed body of an http request into a uniform
//! key/value mapping before the request reaches its handler. It sits between
//! the host http layer, which delivers body fragments as an
//! [`http_body::Body`], and the handlers, which only ever see a complete
//! [`DecodedBody`].
//!
//! # Pipeline
//!
//! For every request the [`PipelineGate`] runs these steps in order:
//!
//! 1. decide whether ingestion applies (method and declared body)
//! 2. aggregate all fragments into one buffer ([`aggregator`])
//! 3. classify the `content-type` header ([`ContentTypeTag`])
//! 4. decode the buffer as json or url-encoded form ([`decoder`])
//! 5. contain decode failures according to the [`RecoveryPolicy`]
//! 6. attach the result and call the continuation exactly once
//!
//! Requests are independent: nothing is shared between two requests except
//! the read-only configuration, so any number of them may be ingested
//! concurrently.
//!
//! # Example
//!
//! ```no_run
//! use bytes::Bytes;
//! use http::Request;
//! use http_body_util::Full;
//! use micro_ingest::{Gated, IngestConfig, PipelineGate, RecoveryPolicy};
//!
//! # async fn run() -> Result<(), micro_ingest::IngestError> {
//! let gate = PipelineGate::new(IngestConfig::builder().policy(RecoveryPolicy::SurfaceError).build());
//!
//! let request = Request::post("/insert")
//!     .header("content-type", "application/json")
//!     .header("content-length", "17")
//!     .body(Full::new(Bytes::from_static(br#"{"user":"ada"}   "#)))
//!     .unwrap();
//!
//! match gate.run(request, |req| async move { req.into_body() }).await? {
//!     Gated::Continued(body) => println!("decoded: {body:?}"),
//!     Gated::Rejected(rejection) => println!("rejected with {}", rejection.status()),
//! }
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
mod config;
mod containment;
mod content_type;
mod decoded;
pub mod decoder;
mod error;
mod gate;
mod outcome;

pub use aggregator::{ChunkAggregator, aggregate};
pub use config::{IngestConfig, IngestConfigBuilder, RecoveryPolicy, UnknownPolicy};
pub use containment::Containment;
pub use content_type::ContentTypeTag;
pub use decoded::DecodedBody;
pub use decoder::{BodyDecoder, DecoderSet, FormDecoder, JsonDecoder};
pub use error::{DecodeError, IngestError};
pub use gate::{Gated, IngestedRequest, PipelineGate};
pub use outcome::{ParseOutcome, Rejection};
